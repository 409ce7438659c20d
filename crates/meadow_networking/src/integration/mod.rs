//! # World Integration Layer
//!
//! The codec never decides what changed. The world simulation hands it plain
//! entity snapshots plus the flags it wants sent, and a visibility predicate
//! for the full-snapshot path.
//!
//! ## Data Flow
//!
//! ```text
//! World Simulation ──(EntityDelta list)──→ region::encode_region_update
//!        │
//!        └──(EntitySnapshot list + VisibilityFilter)──→ snapshot::encode_region_snapshot
//!                                                             │
//!                                                          bytes → transport
//! ```

pub mod entity;
pub mod traits;

pub use entity::{EntityDelta, EntitySnapshot};
pub use traits::{HiddenEntities, ShowAll, VisibilityFilter};
