//! Region-level wire types shared between client and server.
//!
//! Both sides must agree on these definitions.

use serde::{Deserialize, Serialize};

/// Server-assigned entity identifier.
pub type EntityId = u32;

/// Map tile type.
pub type TileType = u8;

/// Coordinate of a spatial region (not of a tile).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionCoord {
    /// Region column
    pub x: u16,
    /// Region row
    pub y: u16,
}

impl RegionCoord {
    /// Creates a region coordinate.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// A single changed tile, in region-local tile coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileDelta {
    /// Region-local column
    pub x: u8,
    /// Region-local row
    pub y: u8,
    /// New tile type
    pub tile_type: TileType,
}

impl TileDelta {
    /// Size on the wire in bytes.
    pub const SIZE: usize = 3;

    /// Creates a tile delta.
    #[must_use]
    pub const fn new(x: u8, y: u8, tile_type: TileType) -> Self {
        Self { x, y, tile_type }
    }
}
