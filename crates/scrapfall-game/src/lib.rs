//! Scrapfall -- simulation core of a 2D scrapyard action-adventure.
//!
//! The crate owns everything between raw input events and the draw call:
//! the component registry built on [`scrapfall_ecs`], the per-frame
//! pipeline (steering AI, movement and overlap detection, collision
//! resolution, animation machines), the tutorial sequencer and
//! notification queue, level orchestration, and JSON save/load.
//!
//! [`world::WorldSystem`] is the entry point: construct one from a
//! [`world::GameConfig`], forward input through the `on_key` /
//! `on_mouse_*` callbacks, and call `step(dt)` once per frame with the
//! renderer and audio bridges from [`interfaces`].
//!
//! ```
//! use scrapfall_game::prelude::*;
//!
//! let mut world = WorldSystem::new(GameConfig::default());
//! let mut renderer = NullRenderer::default();
//! let mut audio = NullAudio::default();
//!
//! world.on_key(Key::Right, KeyAction::Press, &mut audio);
//! world.step(16.0, &mut renderer, &mut audio);
//! assert!(world.registry.motions.get(world.player()).velocity.x > 0.0);
//! ```

#![deny(unsafe_code)]

pub mod ai;
pub mod animation;
pub mod collision;
pub mod components;
pub mod input;
pub mod interfaces;
pub mod inventory;
pub mod math;
pub mod physics;
pub mod registry;
pub mod save;
pub mod spawn;
pub mod tutorial;
pub mod world;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// The types most callers need.
pub mod prelude {
    pub use crate::animation::{Direction, SpriteAnimation};
    pub use crate::components::{Motion, Player, Robot};
    pub use crate::input::{Key, KeyAction, MouseButton};
    pub use crate::interfaces::{
        AudioOut, NullAudio, NullRenderer, RendererBridge, Sound, UiState,
    };
    pub use crate::inventory::{Inventory, Item};
    pub use crate::math::Vec2;
    pub use crate::registry::GameRegistry;
    pub use crate::save::{load_from_str, save_to_string, SaveError};
    pub use crate::tutorial::{NotificationQueue, TutorialState};
    pub use crate::world::{GameConfig, WorldSystem};

    pub use scrapfall_ecs::entity::Entity;
}
