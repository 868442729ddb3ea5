use std::cell::RefCell;
use wasm_bindgen::prelude::*;

use crate::campaign::{Campaign, Progress};
use crate::state::PuzzleSession;
use crate::systems::layout::BoardLayout;

struct Game {
    campaign: Campaign,
    session: Option<PuzzleSession>,
    layout: BoardLayout,
    // Drained events, kept alive so the host can read them through a pointer.
    events: Vec<u8>,
}

thread_local! {
    static GAME: RefCell<Option<Game>> = RefCell::new(None);
}

fn with_game<R>(f: impl FnOnce(&mut Game) -> R) -> R {
    GAME.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let game = borrow.as_mut().expect("Game not initialized. Call init_game() first.");
        f(game)
    })
}

fn with_session<R: Default>(f: impl FnOnce(&mut PuzzleSession) -> R) -> R {
    with_game(|g| g.session.as_mut().map(f).unwrap_or_default())
}

fn to_js(err: crate::Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Load the level list and saved progress, then start the saved level.
/// `progress_json` may be empty or unreadable; it then starts from scratch.
#[wasm_bindgen]
pub fn init_game(levels_json: &str, progress_json: &str) -> Result<u32, JsValue> {
    let mut campaign = Campaign::from_json(levels_json).map_err(to_js)?;
    let saved: Progress = serde_json::from_str(progress_json).unwrap_or_else(|_| {
        if !progress_json.trim().is_empty() {
            log::warn!("ignoring unreadable progress snapshot");
        }
        Progress::default()
    });
    campaign.restore(saved);
    let session = campaign.resume().ok();
    let index = campaign.current_index() as u32;

    GAME.with(|cell| {
        *cell.borrow_mut() = Some(Game {
            campaign,
            session,
            layout: BoardLayout::default(),
            events: Vec::with_capacity(8),
        });
    });
    log::info!("focusfield-sim: game initialized at level {index}");
    Ok(index)
}

/// Start level `index`. Fails for unknown or still-locked levels.
#[wasm_bindgen]
pub fn start_level(index: u32) -> Result<(), JsValue> {
    with_game(|g| {
        let session = g.campaign.start(index as usize).map_err(to_js)?;
        g.session = Some(session);
        Ok(())
    })
}

#[wasm_bindgen]
pub fn restart_level() {
    with_session(|s| s.restart());
}

/// Mark the current level solved and start the next one. Returns its index.
#[wasm_bindgen]
pub fn advance_level() -> Result<u32, JsValue> {
    with_game(|g| {
        let next = g.campaign.complete_current();
        g.session = Some(g.campaign.start(next).map_err(to_js)?);
        Ok(next as u32)
    })
}

/// Rotate the cell at grid coordinates. Negative or out-of-range input is ignored.
#[wasm_bindgen]
pub fn tap_tile(x: i32, y: i32) -> bool {
    let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
        return false;
    };
    with_session(|s| s.rotate(x, y))
}

/// Rotate whatever cell lies under a canvas point.
#[wasm_bindgen]
pub fn tap_canvas(canvas_w: f32, canvas_h: f32, px: f32, py: f32) -> bool {
    with_game(|g| {
        let Some(session) = g.session.as_mut() else {
            return false;
        };
        let grid = session.grid();
        let picked = g.layout.pick(
            glam::Vec2::new(canvas_w, canvas_h),
            glam::Vec2::new(px, py),
            grid.cols(),
            grid.rows(),
        );
        picked.is_some_and(|c| session.rotate(c.x, c.y))
    })
}

/// Cell under a canvas point packed as `y * cols + x`, or -1.
#[wasm_bindgen]
pub fn pick_cell(canvas_w: f32, canvas_h: f32, px: f32, py: f32) -> i32 {
    with_game(|g| {
        let Some(session) = g.session.as_ref() else {
            return -1;
        };
        let grid = session.grid();
        g.layout
            .pick(
                glam::Vec2::new(canvas_w, canvas_h),
                glam::Vec2::new(px, py),
                grid.cols(),
                grid.rows(),
            )
            .map_or(-1, |c| (c.y * grid.cols() + c.x) as i32)
    })
}

#[wasm_bindgen]
pub fn undo() -> bool {
    with_session(|s| s.undo().is_some())
}

#[wasm_bindgen]
pub fn redo() -> bool {
    with_session(|s| s.redo().is_some())
}

#[wasm_bindgen]
pub fn can_undo() -> bool {
    with_session(|s| s.can_undo())
}

#[wasm_bindgen]
pub fn can_redo() -> bool {
    with_session(|s| s.can_redo())
}

#[wasm_bindgen]
pub fn is_solved() -> bool {
    with_session(|s| s.is_solved())
}

/// True once per level, on the first frame the board is solved.
#[wasm_bindgen]
pub fn poll_solved() -> bool {
    with_session(|s| s.poll_solved())
}

#[wasm_bindgen]
pub fn get_move_count() -> u32 {
    with_session(|s| s.moves())
}

#[wasm_bindgen]
pub fn get_board_cols() -> u32 {
    with_session(|s| s.grid().cols() as u32)
}

#[wasm_bindgen]
pub fn get_board_rows() -> u32 {
    with_session(|s| s.grid().rows() as u32)
}

#[wasm_bindgen]
pub fn get_level_index() -> u32 {
    with_game(|g| g.campaign.current_index() as u32)
}

#[wasm_bindgen]
pub fn get_level_count() -> u32 {
    with_game(|g| g.campaign.len() as u32)
}

#[wasm_bindgen]
pub fn is_level_unlocked(index: u32) -> bool {
    with_game(|g| g.campaign.is_unlocked(index as usize))
}

/// Progress snapshot for the host to persist.
#[wasm_bindgen]
pub fn get_progress_json() -> String {
    with_game(|g| serde_json::to_string(&g.campaign.progress()).unwrap_or_default())
}

/// Rebuild the feedback buffer and return the number of tile instances.
#[wasm_bindgen]
pub fn rebuild_feedback() -> u32 {
    with_session(|s| s.rebuild_feedback().len() as u32)
}

/// Pointer to the feedback buffer (8 f32s per tile).
#[wasm_bindgen]
pub fn get_feedback_ptr() -> *const f32 {
    with_game(|g| {
        g.session
            .as_ref()
            .map_or(std::ptr::null(), |s| s.feedback_ptr() as *const f32)
    })
}

#[wasm_bindgen]
pub fn get_feedback_len() -> u32 {
    with_session(|s| s.feedback().len() as u32)
}

/// Drain session events into the event buffer. Returns how many there are.
#[wasm_bindgen]
pub fn drain_events() -> u32 {
    with_game(|g| {
        g.events.clear();
        if let Some(session) = g.session.as_mut() {
            g.events.extend(session.take_events().into_iter().map(|e| e as u8));
        }
        g.events.len() as u32
    })
}

/// Pointer to the drained events (u8 per event).
#[wasm_bindgen]
pub fn get_events_ptr() -> *const u8 {
    with_game(|g| g.events.as_ptr())
}
