use focusfield_sim::campaign::{Campaign, Progress};
use focusfield_sim::components::{Direction, PairState, SessionEvent};
use focusfield_sim::grid::Coord;
use focusfield_sim::Error;

const LEVELS: &str = r#"[
    {"cols": 3, "rows": 1, "tiles": [["right", null, "up"]]},
    {"cols": 2, "rows": 2, "tiles": [["down!", "right"], ["up", "left!"]]},
    {"tiles": [["left", "bogus", "right"]]}
]"#;

#[test]
fn play_through_first_level_and_unlock_second() {
    let mut campaign = Campaign::from_json(LEVELS).unwrap();
    assert_eq!(campaign.len(), 3);

    let mut session = campaign.start(0).unwrap();
    assert!(!session.is_solved());

    // up -> right -> down -> left: three taps to face (0,0).
    for _ in 0..3 {
        assert!(session.rotate(2, 0));
    }
    let report = session.analysis();
    assert!(report.solved);
    assert_eq!(report.pairs.partner(Coord::new(0, 0)), Some(Coord::new(2, 0)));
    assert!(session.poll_solved());
    assert_eq!(session.moves(), 3);

    let events = session.take_events();
    assert_eq!(events.first(), Some(&SessionEvent::LevelStarted));
    assert_eq!(events.last(), Some(&SessionEvent::Solved));

    let next = campaign.complete_current();
    assert_eq!(next, 1);
    assert_eq!(
        campaign.progress(),
        Progress {
            level_index: 0,
            max_unlocked: 1
        }
    );
    assert!(campaign.start(1).is_ok());
    assert!(matches!(campaign.start(2), Err(Error::LevelLocked { .. })));
}

#[test]
fn locked_tiles_constrain_the_second_level() {
    let mut campaign = Campaign::from_json(LEVELS).unwrap();
    campaign.restore(Progress {
        level_index: 1,
        max_unlocked: 1,
    });
    let mut session = campaign.resume().unwrap();
    assert_eq!(campaign.current_index(), 1);

    // (0,0) down! pairs with (0,1) up; (1,0) right and (1,1) left! do not.
    let report = session.analysis();
    assert!(!report.solved);
    assert_eq!(report.pairs.partner(Coord::new(0, 0)), Some(Coord::new(0, 1)));
    assert_eq!(report.pairs.state(Coord::new(1, 1)), PairState::Unresolved);

    assert!(!session.rotate(1, 1));
    assert!(session.rotate(1, 0)); // right -> down
    assert!(!session.is_solved()); // (1,1) still faces left
    session.undo();
    assert_eq!(
        session.grid().get(1, 0).unwrap().direction(),
        Direction::Right
    );
}

#[test]
fn degraded_level_still_plays() {
    let campaign = Campaign::from_json(LEVELS).unwrap();
    let level = campaign.level(2).unwrap();
    assert_eq!((level.cols(), level.rows()), (3, 1));
    assert!(level.cell(1, 0).is_none());

    let mut campaign = Campaign::new(vec![level.clone()]);
    let mut session = campaign.start(0).unwrap();
    // left at (0,0) faces the edge; right at (2,0) too.
    assert!(!session.is_solved());
    session.rotate(0, 0);
    session.rotate(0, 0); // -> right
    session.rotate(2, 0);
    session.rotate(2, 0); // -> left
    assert!(session.is_solved());

    session.restart();
    assert!(!session.is_solved());
    assert!(!session.can_undo());
}
