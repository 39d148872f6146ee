//! Component records for the Scrapfall simulation.
//!
//! Components are plain serde-derived value types with no identity beyond
//! their owning entity. An entity may carry at most one instance of each
//! type, and a game object is nothing but the union of its components --
//! destroying one means sweeping every container via the registry.

use serde::{Deserialize, Serialize};

use scrapfall_ecs::entity::Entity;

use crate::inventory::{Inventory, Item};
use crate::math::Vec2;

// ---------------------------------------------------------------------------
// Motion and collisions
// ---------------------------------------------------------------------------

/// Shape and motion state shared by every positioned entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Motion {
    pub position: Vec2,
    pub angle: f32,
    pub velocity: Vec2,
    /// Velocity the entity is steering toward; consumed by animation and
    /// movement smoothing.
    pub target_velocity: Vec2,
    pub scale: Vec2,
    pub is_stuck: bool,
    /// Bounding box override; zero means derive from `scale`.
    pub bb: Vec2,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            angle: 0.0,
            velocity: Vec2::ZERO,
            target_velocity: Vec2::ZERO,
            scale: Vec2::splat(10.0),
            is_stuck: false,
            bb: Vec2::ZERO,
        }
    }
}

/// A single-frame overlap record. The owning entity is the container slot's
/// entity; `other` is the second object involved. The whole container is
/// cleared and recomputed every frame -- this is an event, not state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Collision {
    pub other: Entity,
}

impl Collision {
    pub fn with(other: Entity) -> Self {
        Self { other }
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// Player stats, inventory, and dash state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub inventory: Inventory,
    pub speed: f32,
    pub current_health: f32,
    pub max_health: f32,
    pub current_stamina: f32,
    pub max_stamina: f32,
    pub can_sprint: bool,

    /// Slow status applied by ice projectiles; counts down each frame.
    pub slow: bool,
    pub slow_count_down: f32,
    /// Armor absorbs incoming damage before health is touched.
    pub armor_stat: i32,
    /// Damage dealt to enemies.
    pub weapon_stat: i32,

    pub dash_speed: f32,
    pub dash_duration: f32,
    pub dash_timer: f32,
    pub dash_cooldown: f32,
    pub is_dashing: bool,
    pub last_dash_direction: Vec2,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            inventory: Inventory::new(),
            speed: 150.0,
            current_health: 100.0,
            max_health: 100.0,
            current_stamina: 100.0,
            max_stamina: 100.0,
            can_sprint: true,
            slow: false,
            slow_count_down: 0.0,
            armor_stat: 30,
            weapon_stat: 10,
            dash_speed: 200.0,
            dash_duration: 0.5,
            dash_timer: 0.0,
            dash_cooldown: 0.0,
            is_dashing: false,
            last_dash_direction: Vec2::ZERO,
        }
    }
}

// ---------------------------------------------------------------------------
// Robots
// ---------------------------------------------------------------------------

/// Generic ground robot stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Robot {
    pub current_health: f32,
    pub max_health: f32,
    pub should_die: bool,
    pub death_cd: f32,
    /// Whether this robot fires ice projectiles.
    pub ice_proj: bool,
    /// Remaining delay until the robot may fire again, ms.
    pub fire_cooldown_ms: f32,

    pub is_capturable: bool,
    pub show_capture_ui: bool,
    pub speed: f32,
    pub attack: f32,
    pub max_attack: f32,
    pub max_speed: f32,
    pub search_box: Vec2,
    pub attack_box: Vec2,
    pub panic_box: Vec2,

    /// Companion robots fight for the player.
    pub companion: bool,
    /// Items yielded when the robot is disassembled.
    pub disassemble_items: Vec<Item>,
}

impl Default for Robot {
    fn default() -> Self {
        Self {
            current_health: 30.0,
            max_health: 30.0,
            should_die: false,
            death_cd: 0.0,
            ice_proj: false,
            fire_cooldown_ms: 0.0,
            is_capturable: false,
            show_capture_ui: false,
            speed: 100.0,
            attack: 10.0,
            max_attack: 20.0,
            max_speed: 150.0,
            search_box: Vec2::ZERO,
            attack_box: Vec2::ZERO,
            panic_box: Vec2::ZERO,
            companion: false,
            disassemble_items: Vec::new(),
        }
    }
}

/// Boss robot stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossRobot {
    pub current_health: f32,
    pub max_health: f32,
    pub should_die: bool,
    pub death_cd: f32,
    /// Remaining delay until the boss may fire again, ms.
    pub fire_cooldown_ms: f32,
    pub search_box: Vec2,
    pub attack_box: Vec2,
    pub panic_box: Vec2,
}

impl Default for BossRobot {
    fn default() -> Self {
        Self {
            current_health: 350.0,
            max_health: 350.0,
            should_die: false,
            death_cd: 0.0,
            fire_cooldown_ms: 0.0,
            search_box: Vec2::ZERO,
            attack_box: Vec2::ZERO,
            panic_box: Vec2::ZERO,
        }
    }
}

/// Spider robot: a melee attacker with a per-contact cooldown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpiderRobot {
    pub current_health: f32,
    pub max_health: f32,
    /// Damage applied per melee hit.
    pub attack_damage: f32,
    /// Remaining cooldown in ms; a hit lands only when this reaches zero.
    pub attack_cooldown_ms: f32,
    /// Cooldown reset value in ms.
    pub attack_interval_ms: f32,
}

impl Default for SpiderRobot {
    fn default() -> Self {
        Self {
            current_health: 20.0,
            max_health: 20.0,
            attack_damage: 5.0,
            attack_cooldown_ms: 0.0,
            attack_interval_ms: 1000.0,
        }
    }
}

/// Flocking behavior parameters for autonomous agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boid {
    pub avoid_radius: f32,
    pub search_radius: f32,
    pub attack_radius: f32,
    pub max_speed: f32,
    pub max_force: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub chase_weight: f32,
}

impl Default for Boid {
    fn default() -> Self {
        Self {
            avoid_radius: 60.0,
            search_radius: 150.0,
            attack_radius: 80.0,
            max_speed: 150.0,
            max_force: 50.0,
            separation_weight: 1.5,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
            chase_weight: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Projectiles and attacks
// ---------------------------------------------------------------------------

/// Time a projectile lives without hitting anything, ms.
pub const PROJECTILE_TTL_MS: f32 = 4000.0;

/// A fired projectile; ephemeral, destroyed on impact or lifetime expiry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile {
    pub dmg: i32,
    /// Ice projectiles additionally apply a slow status.
    pub ice: bool,
    /// Friendly projectiles damage enemies; hostile ones damage the player
    /// and companion robots.
    pub friendly: bool,
    /// Remaining lifetime in ms; the world removes the projectile at zero.
    pub ttl_ms: f32,
}

impl Default for Projectile {
    fn default() -> Self {
        Self {
            dmg: 10,
            ice: false,
            friendly: false,
            ttl_ms: PROJECTILE_TTL_MS,
        }
    }
}

/// A boss projectile following a sine-wave path.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BossProjectile {
    pub dmg: i32,
    pub amplitude: f32,
    pub frequency: f32,
    pub time: f32,
}

impl Default for BossProjectile {
    fn default() -> Self {
        Self {
            dmg: 0,
            amplitude: 0.0,
            frequency: 1.0,
            time: 0.0,
        }
    }
}

/// Transient melee hit volume.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AttackBox {
    pub position: Vec2,
    pub bb: Vec2,
    pub dmg: i32,
    pub friendly: bool,
}

// ---------------------------------------------------------------------------
// Pickups, doors, tiles
// ---------------------------------------------------------------------------

/// Marker: a key pickup.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Key;

/// Marker: an armor plate pickup.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ArmorPlate;

/// Marker: a health potion pickup.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Potion;

/// Marker: the crashed spaceship.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Spaceship;

/// Door state. Contact evaluates the lock and emits a contextual hint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Door {
    pub is_right_door: bool,
    pub is_locked: bool,
    pub is_open: bool,
    pub in_range: bool,
}

impl Default for Door {
    fn default() -> Self {
        Self {
            is_right_door: true,
            is_locked: true,
            is_open: false,
            in_range: false,
        }
    }
}

/// One grid cell of the level; created at level load, destroyed at level
/// teardown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tile {
    pub tileset_id: i32,
    pub tile_id: i32,
    pub walkable: bool,
    pub atlas: TextureAssetId,
}

/// The tileset a level's tiles index into.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TileSetComponent {
    pub texture: Option<TextureAssetId>,
    pub tile_size: i32,
}

/// The level's logical tile grid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TileMap {
    pub tile_map: Vec<Vec<i32>>,
    pub tile_size: i32,
}

// ---------------------------------------------------------------------------
// Timers, screen, notifications
// ---------------------------------------------------------------------------

/// Attached once when an entity starts dying; counts down to removal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeathTimer {
    pub counter_ms: f32,
}

impl Default for DeathTimer {
    fn default() -> Self {
        Self { counter_ms: 3000.0 }
    }
}

/// Global screen post-processing state (darken on death, fade-in, night).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScreenState {
    pub darken_screen_factor: f32,
    pub fade_in_factor: f32,
    pub fade_in_progress: bool,
    pub is_nighttime: bool,
    pub nighttime_factor: f32,
}

impl Default for ScreenState {
    fn default() -> Self {
        Self {
            darken_screen_factor: -1.0,
            fade_in_factor: 1.0,
            fade_in_progress: true,
            is_nighttime: false,
            nighttime_factor: 0.0,
        }
    }
}

/// A queued user-facing message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub text: String,
    pub duration_ms: f32,
}

impl Notification {
    pub fn new(text: impl Into<String>, duration_ms: f32) -> Self {
        Self {
            text: text.into(),
            duration_ms,
        }
    }
}

/// A short-lived visual particle (smoke, sparks).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle {
    pub lifetime: f32,
    pub max_lifetime: f32,
    pub opacity: f32,
    pub size: f32,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            lifetime: 0.0,
            max_lifetime: 3.0,
            opacity: 1.0,
            size: 15.0,
        }
    }
}

/// Per-entity tint color.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

// ---------------------------------------------------------------------------
// Render request and asset identifiers
// ---------------------------------------------------------------------------

/// Texture asset identifiers. Game logic refers to assets through these
/// enumerators only; the renderer owns the actual GPU resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextureAssetId {
    Robot,
    BossRobot,
    PlayerIdle,
    PlayerFullSheet,
    CrockbotFullSheet,
    BossFullSheet,
    RightDoorSheet,
    BottomDoorSheet,
    HealthPotion,
    TileAtlas,
    TileAtlasLevels,
    Key,
    ArmorPlate,
    Projectile,
    IceProjectile,
    Smoke,
    CompanionCrockbot,
    RobotPart,
    EnergyCore,
    Teleporter,
    IceRobotFullSheet,
    SpiderRobotFullSheet,
}

/// Shader effect identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectAssetId {
    Coloured,
    Textured,
    Screen,
    Box,
    Font,
    Spaceship,
}

/// Geometry buffer identifiers, consumed by the renderer's `mesh` lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryId {
    Sprite,
    Tile,
    DebugLine,
    ScreenTriangle,
    Spaceship,
}

/// Instruction to the renderer for the next draw of this entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RenderRequest {
    pub used_texture: TextureAssetId,
    pub used_effect: EffectAssetId,
    pub used_geometry: GeometryId,
}
