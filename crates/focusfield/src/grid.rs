use crate::components::Direction;

/// A cell address. `x` is the column, `y` the row; (0, 0) is the top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Coord { x, y }
    }

    /// The neighbouring coordinate one step in `dir`, or `None` below zero.
    /// Upper bounds are the grid's business.
    pub fn step(self, dir: Direction) -> Option<Coord> {
        let (dx, dy) = dir.delta();
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(Coord { x, y })
    }
}

/// A single directional tile. Its coordinate is fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    coord: Coord,
    direction: Direction,
    locked: bool,
}

impl Tile {
    pub fn new(x: usize, y: usize, direction: Direction, locked: bool) -> Self {
        Tile {
            coord: Coord::new(x, y),
            direction,
            locked,
        }
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Rotate clockwise by one step. Locked tiles refuse; returns whether the direction changed.
    pub fn rotate(&mut self) -> bool {
        if self.locked {
            return false;
        }
        self.direction = self.direction.rotate_once();
        true
    }

    /// Jump straight to `direction`, ignoring the lock. Used to replay history.
    pub(crate) fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }
}

/// The board grid. Row-major layout: index = y * cols + x.
/// `None` means an empty cell. Out-of-bounds lookups behave like empty cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cols: usize,
    rows: usize,
    tiles: Vec<Option<Tile>>,
}

impl Grid {
    pub fn new(cols: usize, rows: usize) -> Self {
        Grid {
            cols,
            rows,
            tiles: vec![None; cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.cols && y < self.rows
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> Option<usize> {
        self.in_bounds(x, y).then(|| y * self.cols + x)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&Tile> {
        self.idx(x, y).and_then(|i| self.tiles[i].as_ref())
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut Tile> {
        let i = self.idx(x, y)?;
        self.tiles[i].as_mut()
    }

    pub fn at(&self, coord: Coord) -> Option<&Tile> {
        self.get(coord.x, coord.y)
    }

    pub fn at_mut(&mut self, coord: Coord) -> Option<&mut Tile> {
        self.get_mut(coord.x, coord.y)
    }

    /// Place or clear a tile. A placed tile is re-addressed to `(x, y)`.
    /// Out-of-bounds writes are dropped.
    pub fn set(&mut self, x: usize, y: usize, tile: Option<Tile>) {
        let Some(i) = self.idx(x, y) else {
            log::warn!("ignoring tile placement outside {}x{} grid at ({x}, {y})", self.cols, self.rows);
            return;
        };
        self.tiles[i] = tile.map(|t| Tile::new(x, y, t.direction, t.locked));
    }

    /// Visit every cell, empty ones included, in row-major order.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(Option<&Tile>, usize, usize),
    {
        for y in 0..self.rows {
            for x in 0..self.cols {
                visit(self.get(x, y), x, y);
            }
        }
    }

    /// Occupied cells in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.tiles.iter().flatten()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_rotate_cycles() {
        let mut tile = Tile::new(0, 0, Direction::Up, false);
        assert!(tile.rotate());
        assert_eq!(tile.direction(), Direction::Right);
        tile.rotate();
        assert_eq!(tile.direction(), Direction::Down);
        tile.rotate();
        assert_eq!(tile.direction(), Direction::Left);
        tile.rotate();
        assert_eq!(tile.direction(), Direction::Up);
    }

    #[test]
    fn locked_tile_refuses_rotation() {
        let mut tile = Tile::new(2, 1, Direction::Left, true);
        assert!(!tile.rotate());
        assert_eq!(tile.direction(), Direction::Left);
    }

    #[test]
    fn grid_get_set() {
        let mut grid = Grid::new(4, 3);
        assert!(grid.get(0, 0).is_none());

        grid.set(3, 2, Some(Tile::new(0, 0, Direction::Down, false)));
        let t = grid.get(3, 2).unwrap();
        assert_eq!(t.direction(), Direction::Down);
        // Placement re-addresses the tile.
        assert_eq!(t.coord(), Coord::new(3, 2));
        assert_eq!(grid.tile_count(), 1);

        grid.set(3, 2, None);
        assert!(grid.get(3, 2).is_none());
    }

    #[test]
    fn out_of_bounds_is_no_tile() {
        let mut grid = Grid::new(2, 2);
        grid.set(0, 0, Some(Tile::new(0, 0, Direction::Up, false)));
        assert!(grid.get(2, 0).is_none());
        assert!(grid.get(0, 2).is_none());
        assert!(grid.get_mut(5, 5).is_none());

        // No wrap-around into the next row.
        grid.set(2, 0, Some(Tile::new(2, 0, Direction::Up, false)));
        assert!(grid.get(0, 1).is_none());
        assert_eq!(grid.tile_count(), 1);
    }

    #[test]
    fn for_each_is_row_major_and_visits_empty_cells() {
        let mut grid = Grid::new(2, 2);
        grid.set(1, 0, Some(Tile::new(1, 0, Direction::Left, false)));

        let mut seen = Vec::new();
        grid.for_each(|tile, x, y| seen.push((x, y, tile.is_some())));
        assert_eq!(
            seen,
            vec![(0, 0, false), (1, 0, true), (0, 1, false), (1, 1, false)]
        );
    }

    #[test]
    fn coord_step_stops_at_zero() {
        let origin = Coord::new(0, 0);
        assert_eq!(origin.step(Direction::Up), None);
        assert_eq!(origin.step(Direction::Left), None);
        assert_eq!(origin.step(Direction::Right), Some(Coord::new(1, 0)));
        assert_eq!(origin.step(Direction::Down), Some(Coord::new(0, 1)));
    }
}
