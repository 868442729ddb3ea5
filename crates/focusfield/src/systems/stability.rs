use std::collections::BTreeMap;

use crate::components::{Direction, PairState};
use crate::grid::{Coord, Grid};

/// Coordinate-keyed pairing result. Cells without an entry are unresolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairingGraph {
    links: BTreeMap<Coord, PairState>,
}

impl PairingGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// The pairing state at `coord`. Unvisited and empty cells are `Unresolved`.
    pub fn state(&self, coord: Coord) -> PairState {
        self.links
            .get(&coord)
            .copied()
            .unwrap_or(PairState::Unresolved)
    }

    /// The partner of `coord`, if it is in a non-conflicted pair.
    pub fn partner(&self, coord: Coord) -> Option<Coord> {
        match self.state(coord) {
            PairState::Paired(other) => Some(other),
            _ => None,
        }
    }

    /// True once `coord` is either paired or conflicted.
    pub fn is_resolved(&self, coord: Coord) -> bool {
        self.links.contains_key(&coord)
    }

    pub fn has_conflict(&self) -> bool {
        self.links.values().any(|s| *s == PairState::Conflicted)
    }

    /// Resolved entries, ordered by column then row.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, PairState)> + '_ {
        self.links.iter().map(|(c, s)| (*c, *s))
    }

    /// Record that `source` validly pairs with `target`.
    ///
    /// A free target is linked from both sides. A target already linked to a
    /// different tile is contested: the newcomer, the target and the target's
    /// existing partner all become conflicted.
    pub fn claim(&mut self, source: Coord, target: Coord) {
        match self.links.get(&target).copied() {
            None => {
                self.links.insert(source, PairState::Paired(target));
                self.links.insert(target, PairState::Paired(source));
            }
            Some(PairState::Paired(existing)) if existing == source => {}
            Some(PairState::Paired(existing)) => {
                log::debug!(
                    "conflict: ({},{}) contests ({},{}) already paired with ({},{})",
                    source.x, source.y, target.x, target.y, existing.x, existing.y
                );
                self.links.insert(source, PairState::Conflicted);
                self.links.insert(target, PairState::Conflicted);
                self.links.insert(existing, PairState::Conflicted);
            }
            Some(PairState::Conflicted) | Some(PairState::Unresolved) => {
                self.links.insert(source, PairState::Conflicted);
                self.links.insert(target, PairState::Conflicted);
            }
        }
    }
}

/// Outcome of one stability pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StabilityReport {
    pub solved: bool,
    pub pairs: PairingGraph,
    /// Number of occupied cells.
    pub tile_count: usize,
    /// Occupied cells carrying a non-conflicted partner.
    pub paired_count: usize,
    pub conflict: bool,
}

/// The first occupied cell seen when marching from `from` in `dir`.
/// Empty cells are looked through; leaving the grid yields `None`.
pub fn ray_target(grid: &Grid, from: Coord, dir: Direction) -> Option<Coord> {
    let mut cursor = from;
    loop {
        cursor = cursor.step(dir)?;
        if !grid.in_bounds(cursor.x, cursor.y) {
            return None;
        }
        if grid.at(cursor).is_some() {
            return Some(cursor);
        }
    }
}

/// Build the pairing graph for the current grid and decide whether it is solved.
///
/// Pure: the grid is only read. Tiles are visited row-major; a tile already
/// resolved by an earlier visit is skipped so each mutual pair is found once.
pub fn analyze(grid: &Grid) -> StabilityReport {
    let mut pairs = PairingGraph::new();

    for tile in grid.tiles() {
        let here = tile.coord();
        if pairs.is_resolved(here) {
            continue;
        }

        let Some(hit) = ray_target(grid, here, tile.direction()) else {
            continue;
        };
        let Some(target) = grid.at(hit) else {
            continue;
        };

        if target.direction() == tile.direction().opposite() {
            pairs.claim(here, hit);
        }
    }

    summarize(grid, pairs)
}

fn summarize(grid: &Grid, pairs: PairingGraph) -> StabilityReport {
    let mut tile_count = 0;
    let mut paired_count = 0;
    let mut conflict = false;

    for tile in grid.tiles() {
        tile_count += 1;
        match pairs.state(tile.coord()) {
            PairState::Paired(_) => paired_count += 1,
            PairState::Conflicted => conflict = true,
            PairState::Unresolved => {}
        }
    }

    let solved = tile_count > 0 && !conflict && paired_count == tile_count;

    StabilityReport {
        solved,
        pairs,
        tile_count,
        paired_count,
        conflict,
    }
}
