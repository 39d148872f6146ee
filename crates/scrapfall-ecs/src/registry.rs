//! Cross-cutting container operations.
//!
//! The game-side registry aggregates one [`ComponentContainer`] per
//! component type. Destroying a game object means removing it from *every*
//! container, without each system knowing about every other container --
//! [`ContainerOps`] is the object-safe seam that makes that sweep possible.

use crate::container::ComponentContainer;
use crate::entity::Entity;

// ---------------------------------------------------------------------------
// ContainerOps
// ---------------------------------------------------------------------------

/// Type-erased view of a component container, for registry-wide sweeps.
///
/// Both [`remove`](Self::remove) and [`clear`](Self::clear) are total: they
/// never fail regardless of which subset of containers an entity is present
/// in.
pub trait ContainerOps {
    /// Drop all components.
    fn clear(&mut self);

    /// Number of live components.
    fn len(&self) -> usize;

    /// Whether the container is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove `entity`'s component if present; no-op otherwise.
    fn remove(&mut self, entity: Entity);

    /// O(1) presence check.
    fn has(&self, entity: Entity) -> bool;

    /// The component type's name, for debug listings.
    fn type_name(&self) -> &'static str;
}

impl<C> ContainerOps for ComponentContainer<C> {
    fn clear(&mut self) {
        ComponentContainer::clear(self);
    }

    fn len(&self) -> usize {
        ComponentContainer::len(self)
    }

    fn remove(&mut self, entity: Entity) {
        ComponentContainer::remove(self, entity);
    }

    fn has(&self, entity: Entity) -> bool {
        ComponentContainer::has(self, entity)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<C>()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
