//! # MEADOW Networking - The Region Delta Protocol
//!
//! Byte-exact encoding of "what changed this tick" for one map region.
//!
//! ## Architecture
//!
//! - **Protocol**: flag-driven entity records inside a region envelope
//! - **Quantization**: coordinates and velocities packed into `i16`
//! - **Snapshots**: full region state through the same record codec
//! - **Integration**: the entity view and visibility seam the world fills in
//!
//! ## Data Flow
//!
//! ```text
//! SERVER                                   CLIENT
//!   |                                         |
//!   | RegionDelta ── encode_region_update ──> bytes
//!   |                                         |
//!   |                bytes ── decode_region_update ──> RegionUpdate
//!   |                                         |
//! ```
//!
//! Every call is stateless. Encoders own their output buffer and decoders
//! borrow their input, so any number of regions can be encoded in parallel.
//!
//! ## Example
//!
//! ```rust,ignore
//! use meadow_networking::{
//!     decode_region_update, encode_region_update, CodecConfig, EntityDelta, EntitySnapshot,
//!     RegionDelta, UpdateFlags,
//! };
//! use meadow_shared::{RegionCoord, Vec2};
//!
//! let config = CodecConfig::default();
//! let pony = EntitySnapshot { position: Vec2::new(5.0, 2.0), ..EntitySnapshot::new(42) };
//! let entities = [EntityDelta::new(&pony, UpdateFlags::POSITION)];
//!
//! let bytes = encode_region_update(
//!     &RegionDelta { entities: &entities, ..RegionDelta::empty(RegionCoord::new(3, 7)) },
//!     &config,
//! )?;
//! let update = decode_region_update(&bytes, &config)?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod integration;
pub mod protocol;
pub mod snapshot;

// Re-exports for convenience
pub use config::CodecConfig;
pub use error::{
    ConfigError, DecodeError, DecodeResult, EncodeError, EncodeResult, ProtocolError, ProtocolResult,
};
pub use integration::{EntityDelta, EntitySnapshot, HiddenEntities, ShowAll, VisibilityFilter};
pub use protocol::{
    decode_region_update, derive_flags, encode_region_update, encode_region_update_into, read_entity_update,
    read_region_update, write_entity_update, EntityInfo, EntityUpdate, Field, RegionDelta, RegionUpdate,
    UpdateFlags, Value,
};
pub use snapshot::{encode_region_snapshot, snapshot_flags, SNAPSHOT_FLAGS};
