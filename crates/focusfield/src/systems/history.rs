use crate::components::Direction;
use crate::grid::{Coord, Grid};

/// One reversible step: the tile at `coord` pointed `previous` before the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub coord: Coord,
    pub previous: Direction,
}

/// Linear undo/redo stacks. A new move discards everything that could be redone.
#[derive(Debug, Clone, Default)]
pub struct MoveHistory {
    undo: Vec<MoveRecord>,
    redo: Vec<MoveRecord>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fresh player move.
    pub fn record(&mut self, record: MoveRecord) {
        self.undo.push(record);
        self.redo.clear();
    }

    /// Revert the latest move on `grid`. Returns the touched coordinate, or
    /// `None` when there is nothing to undo or the tile has vanished.
    pub fn undo(&mut self, grid: &mut Grid) -> Option<Coord> {
        let record = self.undo.pop()?;
        let inverse = swap_direction(grid, record)?;
        self.redo.push(inverse);
        Some(record.coord)
    }

    /// Re-apply the latest undone move on `grid`.
    pub fn redo(&mut self, grid: &mut Grid) -> Option<Coord> {
        let record = self.redo.pop()?;
        let inverse = swap_direction(grid, record)?;
        self.undo.push(inverse);
        Some(record.coord)
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }
}

/// Set the tile at `record.coord` to `record.previous`, returning the record that reverses it.
/// Applied instantly and regardless of the lock.
fn swap_direction(grid: &mut Grid, record: MoveRecord) -> Option<MoveRecord> {
    let Some(tile) = grid.at_mut(record.coord) else {
        log::warn!(
            "history refers to empty cell ({}, {}); dropping it",
            record.coord.x,
            record.coord.y
        );
        return None;
    };
    let inverse = MoveRecord {
        coord: record.coord,
        previous: tile.direction(),
    };
    tile.set_direction(record.previous);
    Some(inverse)
}
