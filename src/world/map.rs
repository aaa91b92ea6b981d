//! Map data structure
//!
//! A rectangular tile grid parsed from the static row strings.

use super::tile::TileKind;
use crate::ecs::Position;

/// A 2D tile grid
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T: TileKind> {
    pub width: i32,
    pub height: i32,
    pub tiles: Vec<T>,
}

impl<T: TileKind> Grid<T> {
    /// Build a grid from one string per row. Unknown characters become `filler`;
    /// short rows are padded with it.
    pub fn parse(rows: &[&str], filler: T) -> Self {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
        let height = rows.len() as i32;
        let mut tiles = Vec::with_capacity((width * height) as usize);
        for row in rows {
            let mut count = 0;
            for c in row.chars() {
                tiles.push(T::from_char(c).unwrap_or(filler));
                count += 1;
            }
            for _ in count..width {
                tiles.push(filler);
            }
        }
        Self { width, height, tiles }
    }

    /// Convert 2D coordinates to 1D index
    #[inline]
    fn xy_to_idx(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Get tile at position
    pub fn get(&self, pos: Position) -> Option<T> {
        if self.in_bounds(pos) {
            self.tiles.get(self.xy_to_idx(pos.x, pos.y)).copied()
        } else {
            None
        }
    }

    /// Check if a position is in bounds and walkable
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.get(pos).is_some_and(|t| t.is_walkable())
    }

    /// First position (row-major) holding `tile`
    pub fn find(&self, tile: T) -> Option<Position> {
        self.tiles
            .iter()
            .position(|t| *t == tile)
            .map(|idx| {
                let idx = idx as i32;
                Position::new(idx % self.width, idx / self.width)
            })
    }

    /// All positions whose tile matches the predicate
    pub fn positions_where(&self, pred: impl Fn(T) -> bool) -> Vec<Position> {
        let mut out = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Position::new(x, y);
                if let Some(tile) = self.get(pos) {
                    if pred(tile) {
                        out.push(pos);
                    }
                }
            }
        }
        out
    }

    /// Rows of tiles, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.tiles.chunks(self.width.max(1) as usize)
    }
}
