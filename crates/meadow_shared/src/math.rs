//! Planar vector shared between client and server.
//!
//! World coordinates are measured in tiles; the codec scales them by the tile
//! dimensions only at the wire boundary.

use serde::{Deserialize, Serialize};

/// 2D vector - position or velocity in tile units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
}

impl Vec2 {
    /// Creates a new Vec2
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Returns true if both components are exactly zero.
    ///
    /// Negative zero counts as zero.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_zero() {
        assert!(Vec2::ZERO.is_zero());
        assert!(Vec2::new(-0.0, 0.0).is_zero());
        assert!(!Vec2::new(0.0, 0.001).is_zero());
    }
}
