//! Tile module - numbered 2048-style tiles
//!
//! A tile carries a power-of-two value in `[2, 2048]`. Tiles are deliberately
//! not `Copy`: a tile is owned by exactly one piece or grid cell at a time and
//! moves between them.

use crate::rng::SimpleRng;
use crate::types::{MAX_TILE_VALUE, SPAWN_TILE_VALUES};

/// A single numbered tile.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tile {
    value: u32,
}

impl Tile {
    /// Create a tile with an explicit value.
    ///
    /// Returns `None` unless `value` is a power of two in `[2, 2048]`.
    pub fn new(value: u32) -> Option<Self> {
        if value >= 2 && value <= MAX_TILE_VALUE && value.is_power_of_two() {
            Some(Self { value })
        } else {
            None
        }
    }

    /// Create a freshly spawned tile (2 or 4, uniformly).
    pub fn random(rng: &mut SimpleRng) -> Self {
        let idx = rng.next_range(SPAWN_TILE_VALUES.len() as u32) as usize;
        Self {
            value: SPAWN_TILE_VALUES[idx],
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Whether this tile has reached the 2048 cap.
    pub fn is_max(&self) -> bool {
        self.value >= MAX_TILE_VALUE
    }

    /// Whether `other` would merge into this tile.
    pub fn can_merge(&self, other: &Tile) -> bool {
        self.value == other.value && self.value * 2 <= MAX_TILE_VALUE
    }

    /// Merge `other` into this tile.
    ///
    /// Doubles this tile and returns the new value (the score delta) when the
    /// values match and the result stays within the cap. Otherwise nothing
    /// changes and 0 is returned. The caller discards `other` on success.
    pub fn merge(&mut self, other: &Tile) -> u32 {
        if !self.can_merge(other) {
            return 0;
        }
        self.value *= 2;
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_non_powers_and_out_of_range() {
        assert!(Tile::new(0).is_none());
        assert!(Tile::new(1).is_none());
        assert!(Tile::new(3).is_none());
        assert!(Tile::new(4096).is_none());
        assert_eq!(Tile::new(2048).map(|t| t.value()), Some(2048));
    }

    #[test]
    fn random_tiles_are_two_or_four() {
        let mut rng = SimpleRng::new(7);
        let mut seen = [false; 2];
        for _ in 0..200 {
            match Tile::random(&mut rng).value() {
                2 => seen[0] = true,
                4 => seen[1] = true,
                v => panic!("unexpected spawn value {v}"),
            }
        }
        assert!(seen[0] && seen[1]);
    }

    #[test]
    fn merge_equal_values_doubles_and_returns_new_value() {
        let mut a = Tile::new(8).unwrap();
        let b = Tile::new(8).unwrap();
        assert_eq!(a.merge(&b), 16);
        assert_eq!(a.value(), 16);
    }

    #[test]
    fn merge_different_values_is_noop() {
        let mut a = Tile::new(8).unwrap();
        let b = Tile::new(4).unwrap();
        assert_eq!(a.merge(&b), 0);
        assert_eq!(a.value(), 8);
    }

    #[test]
    fn merge_past_cap_is_noop() {
        let mut a = Tile::new(2048).unwrap();
        let b = Tile::new(2048).unwrap();
        assert!(!a.can_merge(&b));
        assert_eq!(a.merge(&b), 0);
        assert_eq!(a.value(), 2048);
    }

    #[test]
    fn merging_two_1024_reaches_cap() {
        let mut a = Tile::new(1024).unwrap();
        let b = Tile::new(1024).unwrap();
        assert_eq!(a.merge(&b), 2048);
        assert!(a.is_max());
    }
}
