//! # Wire Constants
//!
//! Values baked into both the server and the client binary.
//!
//! **CRITICAL:** These are part of the wire format. Changes require a
//! coordinated client rebuild.

// =============================================================================
// WORLD GEOMETRY
// =============================================================================

/// Width of one map tile in pixels; coordinates are quantized to 1/32 tile.
pub const TILE_WIDTH: f64 = 32.0;

/// Height of one map tile in pixels; coordinates are quantized to 1/24 tile.
pub const TILE_HEIGHT: f64 = 24.0;

/// Largest velocity magnitude (tiles per second) that may be put on the wire.
///
/// The encoder rejects anything at or above this value.
pub const MAX_VELOCITY: f64 = 40.0;

// =============================================================================
// SENTINELS
// =============================================================================

/// Packed expression word meaning "no expression".
///
/// Bit 28 is set, so no 28-bit packing can ever produce it.
pub const EXPRESSION_NONE: u32 = 0x1FFF_FFFF;

/// Flag word that terminates the entity record section of a region update.
///
/// Every real record sets at least one flag bit.
pub const RECORD_TERMINATOR: u16 = 0;
