//! Scrapfall ECS -- dense-storage Entity Component System.
//!
//! This crate provides the storage core for the Scrapfall simulation.
//! Entities are plain monotonically increasing handles; each component type
//! lives in its own [`ComponentContainer`](container::ComponentContainer)
//! with O(1) `has`/`get`/`insert`/`remove` via a side index and swap
//! compaction on removal. The [`ContainerOps`](registry::ContainerOps) trait
//! lets a game-level registry sweep every container for the two
//! cross-cutting operations: remove-all-components-of-entity and
//! clear-everything.
//!
//! # Quick Start
//!
//! ```
//! use scrapfall_ecs::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Health(u32);
//!
//! let mut alloc = EntityAllocator::new();
//! let mut healths: ComponentContainer<Health> = ComponentContainer::new();
//!
//! let e = alloc.allocate();
//! healths.insert(e, Health(100));
//! assert!(healths.has(e));
//! healths.get_mut(e).0 -= 30;
//! assert_eq!(healths.get(e), &Health(70));
//!
//! healths.remove(e);
//! assert!(!healths.has(e));
//! ```

#![deny(unsafe_code)]

pub mod container;
pub mod entity;
pub mod registry;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by the recoverable ECS surface (deserialization of
/// container pair forms). Invariant violations -- `get` on a missing
/// component, duplicate insert -- are panics, not errors: they indicate a
/// caller bug in game logic and must stop execution loudly.
#[derive(Debug, thiserror::Error)]
pub enum EcsError {
    /// A serialized container's pair form was internally inconsistent.
    #[error("malformed container data for {type_name}: {details}")]
    MalformedContainerData {
        type_name: &'static str,
        details: String,
    },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::container::{ComponentContainer, ContainerData};
    pub use crate::entity::{Entity, EntityAllocator};
    pub use crate::registry::ContainerOps;
    pub use crate::EcsError;
}

// ---------------------------------------------------------------------------
// Integration Tests
// ---------------------------------------------------------------------------
