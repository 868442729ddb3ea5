//! Level data as it arrives from level files.
//!
//! Level files are hand-authored and untrusted, so decoding is lenient: ragged rows,
//! missing dimensions and unknown tokens degrade to empty cells instead of failing.
//! Only a document that is not JSON at all is an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::components::{Direction, MAX_LEVEL_DIMENSION};
use crate::error::Result;
use crate::grid::{Grid, Tile};

/// Suffix marking a locked tile in token form, e.g. `"left!"`.
const LOCK_SUFFIX: char = '!';

/// One occupied cell of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSpec {
    pub direction: Direction,
    #[serde(default)]
    pub locked: bool,
}

impl CellSpec {
    pub fn new(direction: Direction, locked: bool) -> Self {
        CellSpec { direction, locked }
    }

    /// Parse a token such as `"up"`, `" Right "` or `"down!"`.
    pub fn from_token(token: &str) -> Option<CellSpec> {
        let token = token.trim();
        let (token, locked) = match token.strip_suffix(LOCK_SUFFIX) {
            Some(rest) => (rest, true),
            None => (token, false),
        };
        Direction::from_token(token).map(|direction| CellSpec { direction, locked })
    }

    fn from_value(value: &Value) -> Option<CellSpec> {
        match value {
            Value::String(token) => CellSpec::from_token(token),
            Value::Object(obj) => {
                let token = obj
                    .get("direction")
                    .or_else(|| obj.get("dir"))
                    .and_then(Value::as_str)?;
                let mut cell = CellSpec::from_token(token)?;
                if obj.get("locked").and_then(Value::as_bool).unwrap_or(false) {
                    cell.locked = true;
                }
                Some(cell)
            }
            _ => None,
        }
    }
}

/// A normalized, rectangular level: exactly `cols * rows` cells, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSpec {
    cols: usize,
    rows: usize,
    cells: Vec<Option<CellSpec>>,
}

#[derive(Serialize)]
struct CanonicalLevel {
    cols: usize,
    rows: usize,
    tiles: Vec<Vec<Option<CellSpec>>>,
}

impl LevelSpec {
    /// Build from row-major rows, padding or truncating each to `cols` x `rows`.
    pub fn new(cols: usize, rows: usize, data: Vec<Vec<Option<CellSpec>>>) -> Self {
        let cols = clamp_dimension(cols, "cols");
        let rows = clamp_dimension(rows, "rows");
        let mut cells = Vec::with_capacity(cols * rows);
        for y in 0..rows {
            let row = data.get(y);
            for x in 0..cols {
                cells.push(row.and_then(|r| r.get(x).copied().flatten()));
            }
        }
        LevelSpec { cols, rows, cells }
    }

    /// Convenience for hand-written boards: one token per cell, anything
    /// unrecognized (e.g. `"."`) is empty. Width is the longest row.
    pub fn from_tokens(rows: &[&[&str]]) -> Self {
        let cols = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let data: Vec<Vec<Option<CellSpec>>> = rows
            .iter()
            .map(|r| r.iter().map(|t| CellSpec::from_token(t)).collect())
            .collect();
        LevelSpec::new(cols, rows.len(), data)
    }

    /// Decode a level document.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Ok(LevelSpec::from_value(&value))
    }

    /// Decode an already-parsed level document. Never fails.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            log::warn!("level document is not an object; using an empty board");
            return LevelSpec::new(0, 0, Vec::new());
        };

        let raw_rows: &[Value] = obj
            .get("tiles")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let rows = obj
            .get("rows")
            .and_then(dimension)
            .unwrap_or(raw_rows.len());
        let cols = obj.get("cols").and_then(dimension).unwrap_or_else(|| {
            raw_rows
                .iter()
                .map(|r| r.as_array().map_or(0, Vec::len))
                .max()
                .unwrap_or(0)
        });

        let mut degraded = 0usize;
        let data: Vec<Vec<Option<CellSpec>>> = (0..rows.min(MAX_LEVEL_DIMENSION))
            .map(|y| {
                let row = raw_rows.get(y).and_then(Value::as_array);
                (0..cols.min(MAX_LEVEL_DIMENSION))
                    .map(|x| {
                        let raw = row.and_then(|r| r.get(x));
                        let cell = raw.and_then(CellSpec::from_value);
                        if cell.is_none() && raw.is_some_and(|v| !v.is_null()) {
                            degraded += 1;
                        }
                        cell
                    })
                    .collect()
            })
            .collect();

        if degraded > 0 {
            log::warn!("level has {degraded} unreadable cell(s); treating them as empty");
        }

        LevelSpec::new(cols, rows, data)
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The cell at `(x, y)`; out of bounds reads as empty.
    pub fn cell(&self, x: usize, y: usize) -> Option<CellSpec> {
        if x < self.cols && y < self.rows {
            self.cells[y * self.cols + x]
        } else {
            None
        }
    }

    /// Serialize to the canonical object form (`{cols, rows, tiles}`).
    pub fn to_json(&self) -> Result<String> {
        let tiles: Vec<Vec<Option<CellSpec>>> = (0..self.rows)
            .map(|y| (0..self.cols).map(|x| self.cell(x, y)).collect())
            .collect();
        let canonical = CanonicalLevel {
            cols: self.cols,
            rows: self.rows,
            tiles,
        };
        Ok(serde_json::to_string(&canonical)?)
    }
}

fn dimension(value: &Value) -> Option<usize> {
    value.as_u64().map(|n| n as usize).or_else(|| {
        value
            .as_f64()
            .map(|f| if f > 0.0 { f as usize } else { 0 })
    })
}

fn clamp_dimension(n: usize, name: &str) -> usize {
    if n > MAX_LEVEL_DIMENSION {
        log::warn!("level {name} {n} exceeds {MAX_LEVEL_DIMENSION}; clamping");
        MAX_LEVEL_DIMENSION
    } else {
        n
    }
}

impl Grid {
    /// Build a fresh grid for the start (or restart) of a level.
    pub fn from_level(level: &LevelSpec) -> Grid {
        let mut grid = Grid::new(level.cols(), level.rows());
        for y in 0..level.rows() {
            for x in 0..level.cols() {
                if let Some(cell) = level.cell(x, y) {
                    grid.set(x, y, Some(Tile::new(x, y, cell.direction, cell.locked)));
                }
            }
        }
        grid
    }
}
