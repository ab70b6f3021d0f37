//! # Entity Registry
//!
//! The mutable collection of live entities. Lookups scan in registration
//! order, so when two entities transiently share a cell the one
//! registered first wins; at the dozens-of-entities scale of a level a
//! linear scan is all the spatial indexing this needs.

use crate::game::{Entity, EntityId, EntityKind, Position};

/// Registry of all live entities of one level.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
}

impl EntityRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entity and returns its id.
    pub fn add(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        self.entities.push(entity);
        id
    }

    /// Removes an entity by id, returning it if it was present.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(index))
    }

    /// Looks up an entity by id.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Looks up an entity by id, mutably.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// The first-registered entity whose cell is `pos`.
    pub fn entity_at(&self, pos: Position) -> Option<&Entity> {
        self.entities.iter().find(|e| e.pos == pos)
    }

    /// The first-registered entity at `pos` matching a kind filter and
    /// not in the exclusion set.
    ///
    /// This is the query monster decisions use to ignore themselves while
    /// checking whether a cell is already claimed by a packmate.
    pub fn entity_at_filtered(
        &self,
        pos: Position,
        kind: Option<EntityKind>,
        exclude: &[EntityId],
    ) -> Option<&Entity> {
        self.entities.iter().find(|e| {
            e.pos == pos
                && kind.map_or(true, |k| e.kind == k)
                && !exclude.contains(&e.id)
        })
    }

    /// Whether any entity at `pos` blocks movement.
    pub fn blocking_at(&self, pos: Position) -> bool {
        self.entities.iter().any(|e| e.pos == pos && e.blocks)
    }

    /// Entities in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Entities in registration order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the registry holds no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
