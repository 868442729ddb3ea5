use glam::Vec2;

use crate::components::{BOARD_PADDING, CELL_SIZE, FIT_MARGIN};
use crate::grid::Coord;

/// How the board is projected onto the host canvas.
/// The board (cells plus padding) is scaled uniformly to fit and centered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardLayout {
    pub cell: f32,
    pub padding: f32,
    pub margin: f32,
}

impl Default for BoardLayout {
    fn default() -> Self {
        BoardLayout {
            cell: CELL_SIZE,
            padding: BOARD_PADDING,
            margin: FIT_MARGIN,
        }
    }
}

impl BoardLayout {
    /// Unscaled board size including padding.
    pub fn board_size(&self, cols: usize, rows: usize) -> Vec2 {
        Vec2::new(cols as f32, rows as f32) * self.cell + Vec2::splat(self.padding * 2.0)
    }

    /// Uniform scale that fits the board inside `canvas` minus the margin.
    pub fn scale(&self, canvas: Vec2, cols: usize, rows: usize) -> f32 {
        let fit = (canvas - Vec2::splat(self.margin)) / self.board_size(cols, rows);
        fit.min_element()
    }

    /// Canvas position of the board's top-left corner (padding included).
    pub fn origin(&self, canvas: Vec2, cols: usize, rows: usize) -> Vec2 {
        let s = self.scale(canvas, cols, rows);
        (canvas - self.board_size(cols, rows) * s) * 0.5
    }

    /// Map a canvas point to the cell under it. Points over the padding or
    /// beyond the board give `None`.
    pub fn pick(&self, canvas: Vec2, point: Vec2, cols: usize, rows: usize) -> Option<Coord> {
        let s = self.scale(canvas, cols, rows);
        if !(s.is_finite() && s > 0.0) {
            return None;
        }
        let local = (point - self.origin(canvas, cols, rows)) / s - Vec2::splat(self.padding);
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let cell = (local / self.cell).floor();
        let (gx, gy) = (cell.x as usize, cell.y as usize);
        (gx < cols && gy < rows).then_some(Coord::new(gx, gy))
    }

    /// Canvas position of the center of `coord`.
    pub fn cell_center(&self, canvas: Vec2, coord: Coord, cols: usize, rows: usize) -> Vec2 {
        let s = self.scale(canvas, cols, rows);
        let local = Vec2::splat(self.padding)
            + (Vec2::new(coord.x as f32, coord.y as f32) + Vec2::splat(0.5)) * self.cell;
        self.origin(canvas, cols, rows) + local * s
    }
}
