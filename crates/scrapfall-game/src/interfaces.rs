//! Boundaries with the renderer, audio, and UI layers.
//!
//! The simulation core never owns GPU or audio resources. It talks to them
//! through these traits, and the one piece of genuinely shared mutable
//! state across the boundary is [`UiState`], passed by reference into the
//! passes that read or write it. Tests run against the null
//! implementations.

use scrapfall_ecs::entity::Entity;

use crate::components::GeometryId;
use crate::math::Vec2;

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Opaque handle to a geometry buffer owned by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshHandle(pub u32);

/// What the simulation needs from the renderer: shared mesh references for
/// factories and a camera that follows the player.
pub trait RendererBridge {
    fn mesh(&self, geometry: GeometryId) -> MeshHandle;
    fn update_camera_position(&mut self, position: Vec2);
}

/// Renderer stand-in for headless runs and tests.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub camera_position: Vec2,
}

impl RendererBridge for NullRenderer {
    fn mesh(&self, geometry: GeometryId) -> MeshHandle {
        MeshHandle(geometry as u32)
    }

    fn update_camera_position(&mut self, position: Vec2) {
        self.camera_position = position;
    }
}

// ---------------------------------------------------------------------------
// Audio
// ---------------------------------------------------------------------------

/// Gameplay sound cues; fire-and-forget, never awaited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    Attack,
    Damage,
    Pickup,
    DoorOpen,
    DoorLocked,
    PlayerDeath,
    RobotDeath,
    Reflect,
    Heal,
}

pub trait AudioOut {
    fn play(&mut self, sound: Sound);
}

/// Audio stand-in that records what was requested, for assertions.
#[derive(Debug, Default)]
pub struct NullAudio {
    pub played: Vec<Sound>,
}

impl AudioOut for NullAudio {
    fn play(&mut self, sound: Sound) {
        self.played.push(sound);
    }
}

// ---------------------------------------------------------------------------
// UiState
// ---------------------------------------------------------------------------

/// Mutable UI flags shared between the simulation core and the overlay
/// layer.
#[derive(Debug, Default)]
pub struct UiState {
    /// A capturable robot is in range; the overlay draws the capture
    /// prompt, and projectile interaction is suspended while shown. Both
    /// fields re-arm from contact every frame, like the pickup prompt.
    pub show_capture_ui: bool,
    pub capture_candidate: Option<Entity>,
    pub game_paused: bool,

    pub is_dragging: bool,
    pub dragged_slot: Option<usize>,
    /// Last known cursor position in window coordinates.
    pub cursor: Vec2,

    /// Contact with a pickup only arms these flags; the actual pickup
    /// happens on an explicit interact key-press.
    pub pickup_allowed: bool,
    pub pickup_candidate: Option<Entity>,
    pub pickup_item_label: Option<String>,
}

impl UiState {
    /// Disarm the pickup prompt; called when contact ends or the pickup is
    /// taken.
    pub fn clear_pickup(&mut self) {
        self.pickup_allowed = false;
        self.pickup_candidate = None;
        self.pickup_item_label = None;
    }
}
