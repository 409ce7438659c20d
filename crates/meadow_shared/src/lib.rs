//! # MEADOW Shared
//!
//! Types used by both the region encoder (server) and the region decoder
//! (client).
//!
//! ## CRITICAL RULE
//!
//! Anything defined here is part of the wire contract. Changing a constant or a
//! bit layout desynchronizes every connected client, so both sides must be
//! rebuilt together.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod constants;
pub mod expression;
pub mod math;
pub mod protocol;

pub use constants::{
    EXPRESSION_NONE, MAX_VELOCITY, RECORD_TERMINATOR, TILE_HEIGHT, TILE_WIDTH,
};
pub use expression::{decode_expression, encode_expression, is_cancellable, Expression, ExpressionExtra};
pub use math::Vec2;
pub use protocol::{EntityId, RegionCoord, TileDelta, TileType};
