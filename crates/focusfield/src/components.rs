use std::f32::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use crate::grid::Coord;

/// One of the four cardinal directions a tile can point.
/// Clockwise order: Up -> Right -> Down -> Left -> Up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// One clockwise rotation step.
    pub fn rotate_once(self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    /// The direction pointing straight back (180 degrees).
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit step in grid space. Y grows downward.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    /// Resting angle in radians for a renderer with Y-down, 0 = pointing right.
    pub fn angle(self) -> f32 {
        match self {
            Direction::Up => -FRAC_PI_2,
            Direction::Right => 0.0,
            Direction::Down => FRAC_PI_2,
            Direction::Left => PI,
        }
    }

    /// Parse a level-file token. Surrounding whitespace and case are ignored.
    pub fn from_token(token: &str) -> Option<Direction> {
        match token.trim().to_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "right" => Some(Direction::Right),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        }
    }
}

/// Pairing state of one occupied cell after a stability pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairState {
    /// No valid partner found (yet).
    Unresolved,
    /// Mutually paired with the tile at this coordinate.
    Paired(Coord),
    /// Involved in a contested target.
    Conflicted,
}

impl PairState {
    /// Numeric code used in the feedback buffer.
    pub fn code(self) -> u8 {
        match self {
            PairState::Unresolved => 0,
            PairState::Paired(_) => 1,
            PairState::Conflicted => 2,
        }
    }
}

/// Events the session emits for the host to react to (sound, toasts).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionEvent {
    LevelStarted = 0,
    Rotated = 1,
    Undone = 2,
    Redone = 3,
    Solved = 4,
}

/// Logical size of one cell in canvas units.
pub const CELL_SIZE: f32 = 80.0;
/// Padding between the board edge and the first cell.
pub const BOARD_PADDING: f32 = 50.0;
/// Space kept free around the board when fitting it to the canvas.
pub const FIT_MARGIN: f32 = 40.0;
/// Upper bound on level `cols`/`rows`; larger values are clamped.
pub const MAX_LEVEL_DIMENSION: usize = 64;

/// Feedback flag bits.
pub const FLAG_VISIBLE: u32 = 1 << 0;
pub const FLAG_LOCKED: u32 = 1 << 1;
