//! # Region Delta Protocol
//!
//! Byte-exact encoding of per-tick entity and map changes for one region.
//!
//! ## Layering
//!
//! ```text
//! region       envelope: header, records, removes, tiles, tile data
//!   └─ record  one entity: flags, id, fields in canonical order
//!        ├─ quantize  coordinates and velocities ↔ i16
//!        ├─ value     options payload
//!        └─ meadow_shared::expression  packed face word
//! serialization  little-endian primitives under all of the above
//! ```
//!
//! ## Design Philosophy
//!
//! - Encode and decode walk the same field list in the same order
//! - Only changed fields go on the wire; the flag word says which
//! - A zero flag word ends the record section, everything else is length
//!   prefixed
//! - All integers are little-endian

mod flags;
mod quantize;
mod record;
mod region;
mod serialization;
mod value;

pub use flags::{Field, UpdateFlags};
pub use quantize::{
    decode_coord_x, decode_coord_y, decode_velocity, encode_coord_x, encode_coord_y, encode_velocity,
};
pub use record::{derive_flags, read_entity_update, write_entity_update, EntityInfo, EntityUpdate};
pub use region::{
    decode_region_update, encode_region_update, encode_region_update_into, read_region_update, RegionDelta,
    RegionUpdate, REGION_HEADER_SIZE,
};
pub(crate) use region::write_envelope;
pub use serialization::{WireReader, WireWriter, MAX_SHORT_BLOB};
pub use value::{read_value, write_value, Value, MAX_VALUE_DEPTH};
