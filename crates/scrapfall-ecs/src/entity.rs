//! Entity identifiers and allocation.
//!
//! An [`Entity`] is an opaque numeric handle with no payload of its own; all
//! game state lives in component containers keyed by entity. Identifiers are
//! strictly increasing for the lifetime of the process and are never reused
//! after deletion, so a dangling handle can never silently alias a newer
//! object.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A monotonically increasing entity handle.
///
/// Id 0 is reserved as a placeholder and is never handed out by the
/// allocator.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity(u32);

impl Entity {
    /// The default, never-allocated handle. Useful for fields that are
    /// assigned a real entity later (e.g. a pickup candidate slot).
    pub const PLACEHOLDER: Entity = Entity(0);

    /// Raw numeric id.
    #[inline]
    pub fn id(self) -> u32 {
        self.0
    }

    /// Reconstruct from a raw id (save files, tests).
    #[inline]
    pub fn from_raw(id: u32) -> Self {
        Entity(id)
    }
}

impl Default for Entity {
    fn default() -> Self {
        Entity::PLACEHOLDER
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// EntityAllocator
// ---------------------------------------------------------------------------

/// Hands out fresh [`Entity`] handles from a monotonic counter.
///
/// Indices of deleted entities are not recycled. This keeps the handle a
/// plain integer: no generations, no free list, and stale handles simply
/// fail every `has()` check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityAllocator {
    next_id: u32,
}

impl EntityAllocator {
    /// Create an allocator whose first handle is `Entity(1)`.
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Allocate a fresh, never-before-seen [`Entity`].
    pub fn allocate(&mut self) -> Entity {
        let e = Entity(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .expect("entity id space exhausted");
        e
    }

    /// The id the next call to [`allocate`](Self::allocate) will return.
    pub fn peek_next(&self) -> u32 {
        self.next_id
    }

    /// Restore the counter from a saved value. The counter never moves
    /// backwards: restoring a smaller value than the current one is ignored
    /// so previously issued handles stay unique.
    pub fn restore(&mut self, next_id: u32) {
        self.next_id = self.next_id.max(next_id).max(1);
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
