//! Movement integration and overlap detection.
//!
//! Runs after the AI pass (velocities are final for the tick) and before
//! collision resolution. Each step integrates positions, clamps them to the
//! playfield, and emits symmetric [`Collision`] records for every
//! overlapping pair. The records are events for the resolution pass, which
//! drains the container before the next step repopulates it.

use scrapfall_ecs::entity::Entity;

use crate::components::{Collision, Motion};
use crate::math::Vec2;
use crate::registry::GameRegistry;

/// Playfield width in pixels.
pub const WINDOW_WIDTH_PX: f32 = 1200.0;
/// Playfield height in pixels.
pub const WINDOW_HEIGHT_PX: f32 = 800.0;

/// Overlap boxes are shrunk to this fraction of the sprite scale; sprites
/// have generous transparent margins.
const BB_SCALE_FACTOR: f32 = 0.35;

/// Vertical fudge on the overlap test so characters can stand "behind" each
/// other a little before colliding, matching the top-down perspective.
const Y_OVERLAP_TOP_FUDGE: f32 = 10.0;
const Y_OVERLAP_BOTTOM_FUDGE: f32 = 35.0;

// ---------------------------------------------------------------------------
// Overlap test
// ---------------------------------------------------------------------------

/// Bounding box of a motion, absolute so a flipped sprite keeps its size.
fn bounding_box(motion: &Motion) -> Vec2 {
    if motion.bb != Vec2::ZERO {
        motion.bb.abs()
    } else {
        motion.scale.abs()
    }
}

/// Ground tiles the player can stand on; they carry a motion for placement
/// but never obstruct.
fn walkable_tile(registry: &GameRegistry, entity: Entity) -> bool {
    registry.tiles.has(entity) && registry.tiles.get(entity).walkable
}

/// Approximate AABB overlap between two motions, with shrunken boxes and a
/// vertical fudge.
pub fn collides(a: &Motion, b: &Motion) -> bool {
    let size_a = bounding_box(a) * BB_SCALE_FACTOR;
    let size_b = bounding_box(b) * BB_SCALE_FACTOR;

    let a_min = a.position - size_a / 2.0;
    let a_max = a.position + size_a / 2.0;
    let b_min = b.position - size_b / 2.0;
    let b_max = b.position + size_b / 2.0;

    let overlap_x = a_min.x <= b_max.x && a_max.x >= b_min.x;
    let overlap_y =
        a_min.y <= b_max.y - Y_OVERLAP_TOP_FUDGE && a_max.y >= b_min.y - Y_OVERLAP_BOTTOM_FUDGE;

    overlap_x && overlap_y
}

// ---------------------------------------------------------------------------
// PhysicsSystem
// ---------------------------------------------------------------------------

/// Position integration plus pairwise overlap detection.
pub struct PhysicsSystem;

impl PhysicsSystem {
    /// Integrate positions and emit this frame's [`Collision`] records.
    pub fn step(registry: &mut GameRegistry, elapsed_ms: f32) {
        let step_seconds = elapsed_ms / 1000.0;

        for motion in registry.motions.components_mut() {
            motion.position += motion.velocity * step_seconds;
            motion.position.x = motion.position.x.clamp(16.0, WINDOW_WIDTH_PX - 16.0);
            motion.position.y = motion.position.y.clamp(0.0, WINDOW_HEIGHT_PX - 32.0);
        }

        // Pairwise pass over the dense storage; each unordered pair is
        // tested once and recorded under both owners so resolution rules
        // can match regardless of which side is "owner". Walkable ground
        // tiles are not obstacles and never take part.
        let mut pairs: Vec<(Entity, Entity)> = Vec::new();
        {
            let entities = registry.motions.entities();
            let components = registry.motions.components();
            for i in 0..components.len() {
                if walkable_tile(registry, entities[i]) {
                    continue;
                }
                for j in (i + 1)..components.len() {
                    if walkable_tile(registry, entities[j]) {
                        continue;
                    }
                    if collides(&components[i], &components[j]) {
                        pairs.push((entities[i], entities[j]));
                    }
                }
            }
        }

        for (a, b) in pairs {
            registry.motions.get_mut(a).velocity = Vec2::ZERO;
            registry.motions.get_mut(b).velocity = Vec2::ZERO;
            registry.collisions.insert_with_duplicates(a, Collision::with(b));
            registry.collisions.insert_with_duplicates(b, Collision::with(a));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
