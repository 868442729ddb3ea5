use bytemuck::{Pod, Zeroable};

use crate::components::{PairState, SessionEvent, FLAG_LOCKED, FLAG_VISIBLE};
use crate::grid::{Coord, Grid};
use crate::level::LevelSpec;
use crate::systems::history::{MoveHistory, MoveRecord};
use crate::systems::stability::{analyze, StabilityReport};

/// Per-tile data written for the host renderer.
/// 8 floats = 32 bytes stride. Positions are in cell units; the host applies
/// its own layout. `partner_*` is -1 when the tile has no partner.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct TileInstance {
    pub col: f32,
    pub row: f32,
    pub angle: f32,
    pub pair_state: f32, // 0 = unresolved, 1 = paired, 2 = conflicted
    pub flags: f32,      // bit 0 = visible, bit 1 = locked
    pub partner_col: f32,
    pub partner_row: f32,
    pub _pad: f32,
}

/// One level being played: the grid, its move history and solve tracking.
///
/// Commands mutate logical state only and report whether anything changed;
/// how a change is animated or voiced is up to the host.
pub struct PuzzleSession {
    level: LevelSpec,
    grid: Grid,
    history: MoveHistory,
    moves: u32,
    solved_fired: bool,

    // Events emitted since the host last drained them.
    events: Vec<SessionEvent>,

    // Rebuilt on demand, read by the host renderer.
    feedback: Vec<TileInstance>,
}

impl PuzzleSession {
    pub fn new(level: LevelSpec) -> Self {
        let grid = Grid::from_level(&level);
        let capacity = grid.cols() * grid.rows();
        let mut session = PuzzleSession {
            level,
            grid,
            history: MoveHistory::new(),
            moves: 0,
            solved_fired: false,
            events: Vec::with_capacity(8),
            feedback: Vec::with_capacity(capacity),
        };
        session.events.push(SessionEvent::LevelStarted);
        log::info!(
            "level started: {}x{} with {} tiles",
            session.grid.cols(),
            session.grid.rows(),
            session.grid.tile_count()
        );
        session
    }

    /// Throw away all moves and rebuild the grid from the level data.
    pub fn restart(&mut self) {
        self.grid = Grid::from_level(&self.level);
        self.history.clear();
        self.moves = 0;
        self.solved_fired = false;
        self.events.push(SessionEvent::LevelStarted);
        log::info!("level restarted");
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn level(&self) -> &LevelSpec {
        &self.level
    }

    /// Accepted rotations since the level (re)started.
    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Rotate the tile at `(x, y)` one step clockwise.
    /// Empty, locked and out-of-bounds cells are ignored; returns whether the direction changed.
    pub fn rotate(&mut self, x: usize, y: usize) -> bool {
        let Some(tile) = self.grid.get_mut(x, y) else {
            return false;
        };
        if tile.is_locked() {
            log::debug!("({x}, {y}) is locked");
            return false;
        }

        let previous = tile.direction();
        tile.rotate();
        let now = tile.direction();
        self.history.record(MoveRecord {
            coord: Coord::new(x, y),
            previous,
        });
        self.moves += 1;
        self.events.push(SessionEvent::Rotated);
        log::debug!("rotated ({x}, {y}) {} -> {}", previous.as_str(), now.as_str());
        true
    }

    /// Undo the latest rotation. Returns the coordinate that changed.
    pub fn undo(&mut self) -> Option<Coord> {
        let coord = self.history.undo(&mut self.grid)?;
        self.events.push(SessionEvent::Undone);
        log::debug!("undo at ({}, {})", coord.x, coord.y);
        Some(coord)
    }

    /// Redo the latest undone rotation. Returns the coordinate that changed.
    pub fn redo(&mut self) -> Option<Coord> {
        let coord = self.history.redo(&mut self.grid)?;
        self.events.push(SessionEvent::Redone);
        log::debug!("redo at ({}, {})", coord.x, coord.y);
        Some(coord)
    }

    /// Fresh stability analysis of the current grid.
    pub fn analysis(&self) -> StabilityReport {
        analyze(&self.grid)
    }

    pub fn is_solved(&self) -> bool {
        self.analysis().solved
    }

    /// True exactly once per level: on the first poll that finds the grid solved.
    pub fn poll_solved(&mut self) -> bool {
        if self.solved_fired || !self.is_solved() {
            return false;
        }
        self.solved_fired = true;
        self.events.push(SessionEvent::Solved);
        log::info!("level solved in {} moves", self.moves);
        true
    }

    /// Drain the events emitted since the last call.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Rebuild the flat feedback buffer from the current grid and analysis.
    /// Tiles appear in row-major order.
    pub fn rebuild_feedback(&mut self) -> &[TileInstance] {
        let report = analyze(&self.grid);
        self.feedback.clear();

        for tile in self.grid.tiles() {
            let coord = tile.coord();
            let state = report.pairs.state(coord);
            let (partner_col, partner_row) = match state {
                PairState::Paired(p) => (p.x as f32, p.y as f32),
                _ => (-1.0, -1.0),
            };
            let mut flags = FLAG_VISIBLE;
            if tile.is_locked() {
                flags |= FLAG_LOCKED;
            }

            self.feedback.push(TileInstance {
                col: coord.x as f32,
                row: coord.y as f32,
                angle: tile.direction().angle(),
                pair_state: state.code() as f32,
                flags: flags as f32,
                partner_col,
                partner_row,
                _pad: 0.0,
            });
        }

        &self.feedback
    }

    pub fn feedback(&self) -> &[TileInstance] {
        &self.feedback
    }

    /// Pointer to the feedback buffer for direct reads from wasm memory.
    pub fn feedback_ptr(&self) -> *const TileInstance {
        self.feedback.as_ptr()
    }

    /// Feedback as raw bytes.
    pub fn feedback_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.feedback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Direction;

    fn session(rows: &[&[&str]]) -> PuzzleSession {
        PuzzleSession::new(LevelSpec::from_tokens(rows))
    }

    fn dir_at(s: &PuzzleSession, x: usize, y: usize) -> Direction {
        s.grid().get(x, y).unwrap().direction()
    }

    #[test]
    fn session_starts_clean() {
        let mut s = session(&[&["up", "left"]]);
        assert_eq!(s.moves(), 0);
        assert!(!s.can_undo());
        assert!(!s.can_redo());
        assert_eq!(s.take_events(), vec![SessionEvent::LevelStarted]);
        assert!(s.take_events().is_empty());
    }

    #[test]
    fn rotate_then_undo_restores_direction() {
        let mut s = session(&[&["up", "left"]]);
        assert!(s.rotate(0, 0));
        assert_eq!(dir_at(&s, 0, 0), Direction::Right);
        assert!(s.is_solved());

        assert_eq!(s.undo(), Some(Coord::new(0, 0)));
        assert_eq!(dir_at(&s, 0, 0), Direction::Up);
        assert!(!s.is_solved());

        // Nothing left to undo.
        assert_eq!(s.undo(), None);
        assert_eq!(dir_at(&s, 0, 0), Direction::Up);
    }

    #[test]
    fn undo_redo_round_trip() {
        let mut s = session(&[&["up", "left"]]);
        s.rotate(0, 0);
        s.rotate(0, 0);
        assert_eq!(dir_at(&s, 0, 0), Direction::Down);

        s.undo();
        assert_eq!(dir_at(&s, 0, 0), Direction::Right);
        s.redo();
        assert_eq!(dir_at(&s, 0, 0), Direction::Down);
        s.undo();
        s.undo();
        assert_eq!(dir_at(&s, 0, 0), Direction::Up);
        s.redo();
        assert_eq!(dir_at(&s, 0, 0), Direction::Right);
        // Undo/redo do not count as moves.
        assert_eq!(s.moves(), 2);
    }

    #[test]
    fn new_rotation_discards_redo() {
        let mut s = session(&[&["up", "up"]]);
        s.rotate(0, 0);
        s.undo();
        assert!(s.can_redo());
        s.rotate(1, 0);
        assert!(!s.can_redo());
        assert_eq!(s.redo(), None);
        assert_eq!(dir_at(&s, 0, 0), Direction::Up);
    }

    #[test]
    fn locked_empty_and_out_of_bounds_are_ignored() {
        let mut s = session(&[&["up!", ".", "down"]]);
        s.take_events();

        assert!(!s.rotate(0, 0));
        assert_eq!(dir_at(&s, 0, 0), Direction::Up);
        assert!(!s.rotate(1, 0));
        assert!(!s.rotate(3, 0));
        assert!(!s.rotate(0, 7));

        assert_eq!(s.moves(), 0);
        assert!(!s.can_undo());
        assert!(s.take_events().is_empty());
    }

    #[test]
    fn restart_discards_everything() {
        let mut s = session(&[&["up", "left!"]]);
        s.rotate(0, 0);
        s.rotate(0, 0);
        s.undo();
        assert!(s.can_undo() && s.can_redo());

        s.restart();
        assert_eq!(dir_at(&s, 0, 0), Direction::Up);
        assert!(s.grid().get(1, 0).unwrap().is_locked());
        assert!(!s.can_undo());
        assert!(!s.can_redo());
        assert_eq!(s.moves(), 0);
    }

    #[test]
    fn poll_solved_fires_once() {
        let mut s = session(&[&["up", "left"]]);
        assert!(!s.poll_solved());
        s.rotate(0, 0);
        assert!(s.poll_solved());
        assert!(!s.poll_solved());

        let events = s.take_events();
        assert_eq!(events.last(), Some(&SessionEvent::Solved));

        // Restart re-arms the latch.
        s.restart();
        s.rotate(0, 0);
        assert!(s.poll_solved());
    }

    #[test]
    fn feedback_describes_each_tile() {
        let mut s = session(&[&["right", ".", "left!"], &["up", ".", "."]]);
        let feedback = s.rebuild_feedback().to_vec();
        assert_eq!(feedback.len(), 3);

        let first = feedback[0];
        assert_eq!((first.col, first.row), (0.0, 0.0));
        assert_eq!(first.pair_state, 1.0);
        assert_eq!((first.partner_col, first.partner_row), (2.0, 0.0));

        let locked = feedback[1];
        assert_eq!(locked.col, 2.0);
        assert_eq!(locked.flags as u32 & FLAG_LOCKED, FLAG_LOCKED);

        let lone = feedback[2];
        assert_eq!(lone.pair_state, 0.0);
        assert_eq!(lone.partner_col, -1.0);
        assert_eq!(lone.angle, Direction::Up.angle());

        assert_eq!(s.feedback_bytes().len(), 3 * 32);
    }
}
