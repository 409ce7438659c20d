//! # Entity Snapshots
//!
//! The world's view of one entity at encode time. Owned by the simulation,
//! borrowed by the encoder for the duration of one call.

use meadow_shared::{EntityId, Expression, Vec2};

use crate::protocol::{EntityInfo, UpdateFlags, Value};

/// Every wire-visible property of an entity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntitySnapshot {
    /// Entity id
    pub id: EntityId,
    /// Position in tiles
    pub position: Vec2,
    /// Velocity in tiles per second
    pub velocity: Vec2,
    /// Animation/pose state
    pub state: u8,
    /// Current face, `None` for the default
    pub expression: Option<Expression>,
    /// Type id
    pub entity_type: u16,
    /// Extra per-entity options
    pub options: Option<Value>,
    /// Checksummed info blob
    pub info: Option<EntityInfo>,
    /// One-shot action (emote, boop)
    pub action: u8,
    /// Display name
    pub name: Option<String>,
    /// The name was caught by the profanity filter
    pub name_bad: bool,
    /// Player-only state byte
    pub player_state: u8,
}

impl EntitySnapshot {
    /// A snapshot for `id` with every property at its default.
    #[must_use]
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

/// One entry of a tick's delta: which entity and which of its fields to send.
#[derive(Clone, Copy, Debug)]
pub struct EntityDelta<'a> {
    /// The entity's current state.
    pub entity: &'a EntitySnapshot,
    /// Fields requested by the simulation, before derivation.
    pub flags: UpdateFlags,
}

impl<'a> EntityDelta<'a> {
    /// Creates a delta entry.
    #[must_use]
    pub const fn new(entity: &'a EntitySnapshot, flags: UpdateFlags) -> Self {
        Self { entity, flags }
    }
}
