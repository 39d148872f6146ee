//! Dense per-type component storage.
//!
//! A [`ComponentContainer`] stores every live component of one type in a
//! dense `Vec`, with a parallel `Vec` of owning entities and a side map from
//! entity to slot. All of `has`/`get`/`insert`/`remove` are O(1) amortized;
//! `remove` swap-compacts with the last live slot, which means iteration
//! order is insertion order only until the first removal. Game logic must
//! not assume stable ordering across frames containing deletions.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::EcsError;

// ---------------------------------------------------------------------------
// ComponentContainer
// ---------------------------------------------------------------------------

/// Dense, order-irrelevant collection of `(entity, component)` pairs for one
/// component type.
///
/// Requesting a component that does not exist is a programmer error and
/// panics with a diagnostic naming the component type; callers are expected
/// to [`has`](Self::has)-check first when existence is not guaranteed by
/// invariant.
pub struct ComponentContainer<C> {
    /// Dense component storage.
    components: Vec<C>,
    /// Owning entity for each slot, parallel to `components`.
    entities: Vec<Entity>,
    /// Entity -> slot index.
    index: HashMap<Entity, usize>,
}

impl<C> ComponentContainer<C> {
    /// Create an empty container.
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
            entities: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Insert a component for `entity` and return a mutable reference to the
    /// stored value.
    ///
    /// # Panics
    ///
    /// Panics if the entity already has a component of this type. Use
    /// [`insert_with_duplicates`](Self::insert_with_duplicates) for the rare
    /// per-frame event records (collisions) that legitimately repeat an
    /// owner.
    pub fn insert(&mut self, entity: Entity, component: C) -> &mut C {
        assert!(
            !self.has(entity),
            "entity {entity} already has a {} component",
            std::any::type_name::<C>()
        );
        self.push(entity, component)
    }

    /// Insert without the duplicate check.
    pub fn insert_with_duplicates(&mut self, entity: Entity, component: C) -> &mut C {
        self.push(entity, component)
    }

    fn push(&mut self, entity: Entity, component: C) -> &mut C {
        self.index.insert(entity, self.components.len());
        self.components.push(component);
        self.entities.push(entity);
        self.components.last_mut().unwrap()
    }

    /// O(1) presence check. Never fails.
    #[inline]
    pub fn has(&self, entity: Entity) -> bool {
        self.index.contains_key(&entity)
    }

    /// Shared reference to `entity`'s component.
    ///
    /// # Panics
    ///
    /// Panics if the entity has no component of this type.
    pub fn get(&self, entity: Entity) -> &C {
        match self.index.get(&entity) {
            Some(&slot) => &self.components[slot],
            None => panic!(
                "entity {entity} has no {} component",
                std::any::type_name::<C>()
            ),
        }
    }

    /// Mutable reference to `entity`'s component.
    ///
    /// # Panics
    ///
    /// Panics if the entity has no component of this type.
    pub fn get_mut(&mut self, entity: Entity) -> &mut C {
        match self.index.get(&entity) {
            Some(&slot) => &mut self.components[slot],
            None => panic!(
                "entity {entity} has no {} component",
                std::any::type_name::<C>()
            ),
        }
    }

    /// Remove `entity`'s component if present; no-op otherwise.
    ///
    /// The removed slot is filled by swapping in the last live slot, and the
    /// index entry for the *moved* entity is updated to its new position.
    pub fn remove(&mut self, entity: Entity) {
        let Some(slot) = self.index.remove(&entity) else {
            return;
        };
        self.components.swap_remove(slot);
        self.entities.swap_remove(slot);
        // If something was swapped into `slot`, repoint its index entry.
        if slot < self.entities.len() {
            self.index.insert(self.entities[slot], slot);
        }
    }

    /// Drop all components and reset the index.
    pub fn clear(&mut self) {
        self.components.clear();
        self.entities.clear();
        self.index.clear();
    }

    /// Number of live components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the container holds no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The owning entities, one per slot.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// The dense component storage, parallel to [`entities`](Self::entities).
    pub fn components(&self) -> &[C] {
        &self.components
    }

    /// Mutable access to the dense component storage.
    pub fn components_mut(&mut self) -> &mut [C] {
        &mut self.components
    }

    /// Iterate `(entity, &component)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &C)> {
        self.entities.iter().copied().zip(self.components.iter())
    }

    /// Iterate `(entity, &mut component)` pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut C)> {
        self.entities
            .iter()
            .copied()
            .zip(self.components.iter_mut())
    }

    /// Reorder storage by a caller-supplied comparator over entities (used
    /// for draw-order stability). The entity -> slot index is rebuilt so all
    /// lookups stay correct afterward.
    pub fn sort_by<F>(&mut self, mut cmp: F)
    where
        F: FnMut(Entity, Entity) -> std::cmp::Ordering,
    {
        // Sort the entity list, carrying the old slot along so components can
        // be permuted in one pass without consulting the stale index.
        let mut order: Vec<(Entity, usize)> = self
            .entities
            .iter()
            .copied()
            .enumerate()
            .map(|(slot, e)| (e, slot))
            .collect();
        order.sort_by(|a, b| cmp(a.0, b.0));

        let mut old: Vec<Option<C>> = self.components.drain(..).map(Some).collect();
        self.entities.clear();
        for (entity, slot) in &order {
            self.entities.push(*entity);
            self.components
                .push(old[*slot].take().expect("slot permuted twice"));
        }
        for (new_slot, (entity, _)) in order.iter().enumerate() {
            self.index.insert(*entity, new_slot);
        }
    }
}

impl<C> Default for ComponentContainer<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: fmt::Debug> fmt::Debug for ComponentContainer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentContainer")
            .field("len", &self.len())
            .field("entities", &self.entities)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Serializable pair form
// ---------------------------------------------------------------------------

/// The serializable `(entity, component)` pair form of a container, used by
/// the persistence boundary. Deserialization rebuilds the slot index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerData<C> {
    /// Owning entities, one per component.
    pub entities: Vec<Entity>,
    /// Component values, parallel to `entities`.
    pub components: Vec<C>,
}

impl<C: Clone> ComponentContainer<C> {
    /// Export the container contents in the serializable pair form.
    pub fn to_data(&self) -> ContainerData<C> {
        ContainerData {
            entities: self.entities.clone(),
            components: self.components.clone(),
        }
    }
}

impl<C> ComponentContainer<C> {
    /// Rebuild a container from its pair form, validating that the two
    /// vectors are parallel and that no entity appears twice.
    pub fn from_data(data: ContainerData<C>) -> Result<Self, EcsError> {
        if data.entities.len() != data.components.len() {
            tracing::warn!(
                component = std::any::type_name::<C>(),
                entities = data.entities.len(),
                components = data.components.len(),
                "rejecting pair form with mismatched lengths"
            );
            return Err(EcsError::MalformedContainerData {
                type_name: std::any::type_name::<C>(),
                details: format!(
                    "{} entities vs {} components",
                    data.entities.len(),
                    data.components.len()
                ),
            });
        }
        let mut index = HashMap::with_capacity(data.entities.len());
        for (slot, &entity) in data.entities.iter().enumerate() {
            if index.insert(entity, slot).is_some() {
                tracing::warn!(
                    component = std::any::type_name::<C>(),
                    entity = entity.id(),
                    "rejecting pair form with a duplicate entity"
                );
                return Err(EcsError::MalformedContainerData {
                    type_name: std::any::type_name::<C>(),
                    details: format!("entity {entity} appears twice"),
                });
            }
        }
        Ok(Self {
            components: data.components,
            entities: data.entities,
            index,
        })
    }

    /// Replace this container's contents from the pair form in place.
    pub fn load_data(&mut self, data: ContainerData<C>) -> Result<(), EcsError> {
        *self = Self::from_data(data)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
