//! # Integration Traits
//!
//! Interfaces the world layer implements so the codec can stay ignorant of
//! how entities are stored or who is watching.

use std::collections::HashSet;

use meadow_shared::EntityId;

use crate::integration::entity::EntitySnapshot;

// ============================================================================
// VISIBILITY
// ============================================================================

/// Decides whether an entity is hidden from an observer.
///
/// Applied to every entity before a full region snapshot is built. The delta
/// path is not filtered; the simulation only puts visible entities in it.
pub trait VisibilityFilter {
    /// Whoever is looking (usually the receiving client).
    type Observer: ?Sized;

    /// Returns true if `entity` must not be sent to `observer`.
    fn is_entity_hidden_from(&self, observer: &Self::Observer, entity: &EntitySnapshot) -> bool;
}

/// Hides nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShowAll;

impl VisibilityFilter for ShowAll {
    type Observer = ();

    fn is_entity_hidden_from(&self, _observer: &(), _entity: &EntitySnapshot) -> bool {
        false
    }
}

// ============================================================================
// SIMPLE IMPLEMENTATIONS
// ============================================================================

/// Hides a fixed set of entity ids from every observer.
///
/// Useful for tests and for server-wide moderation hides.
#[derive(Clone, Debug, Default)]
pub struct HiddenEntities {
    hidden: HashSet<EntityId>,
}

impl HiddenEntities {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hides `id`.
    pub fn hide(&mut self, id: EntityId) {
        self.hidden.insert(id);
    }

    /// Un-hides `id`.
    pub fn show(&mut self, id: EntityId) {
        self.hidden.remove(&id);
    }
}

impl FromIterator<EntityId> for HiddenEntities {
    fn from_iter<I: IntoIterator<Item = EntityId>>(iter: I) -> Self {
        Self {
            hidden: iter.into_iter().collect(),
        }
    }
}

impl VisibilityFilter for HiddenEntities {
    type Observer = ();

    fn is_entity_hidden_from(&self, _observer: &(), entity: &EntitySnapshot) -> bool {
        self.hidden.contains(&entity.id)
    }
}
