//! Save and load.
//!
//! A save is a single JSON document holding every persistent container in
//! its `{entities, components}` pair form plus the world counters (entity
//! allocator position, level, tutorial stage, notification queue).
//! Frame-scoped containers (collisions, attack boxes) are never persisted.
//!
//! Loading is all-or-nothing: the document's keys are checked against a
//! fixed required-key list and every container is rebuilt and validated
//! before anything is applied, so a rejected document leaves the in-memory
//! state untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use scrapfall_ecs::container::{ComponentContainer, ContainerData};
use scrapfall_ecs::entity::Entity;
use scrapfall_ecs::EcsError;

use crate::animation::{
    BossRobotState, DoorAnimation, IceRobotState, PlayerState, RobotState, SpiderRobotState,
    SpriteAnimation,
};
use crate::components::{
    ArmorPlate, Boid, BossProjectile, BossRobot, Color, DeathTimer, Door, Key, Motion,
    Notification, Particle, Player, Potion, Projectile, RenderRequest, Robot, ScreenState,
    SpiderRobot, Spaceship, Tile, TileMap, TileSetComponent,
};
use crate::tutorial::{NotificationQueue, TutorialState, TutorialSystem};
use crate::world::WorldSystem;

/// Top-level keys a loadable document must carry. Checked before any
/// deserialization is applied.
pub const REQUIRED_KEYS: &[&str] = &[
    "next_entity_id",
    "current_level",
    "tutorial_state",
    "notification_queue",
    "death_timers",
    "motions",
    "players",
    "player_animations",
    "robot_animations",
    "ice_robot_animations",
    "boss_robot_animations",
    "spider_robot_animations",
    "door_animations",
    "doors",
    "render_requests",
    "screen_states",
    "robots",
    "boss_robots",
    "spider_robots",
    "boids",
    "tiles",
    "tilesets",
    "maps",
    "keys",
    "armor_plates",
    "potions",
    "particles",
    "colors",
    "notifications",
    "spaceships",
    "projectiles",
    "boss_projectiles",
];

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save document is missing required key `{key}`")]
    MissingKey { key: &'static str },
    #[error("save document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Container(#[from] EcsError),
}

// ---------------------------------------------------------------------------
// SaveDocument
// ---------------------------------------------------------------------------

/// The serialized world. Field names are the on-disk keys.
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveDocument {
    pub next_entity_id: u32,
    pub current_level: usize,
    pub tutorial_state: TutorialState,
    pub notification_queue: NotificationQueue,

    pub death_timers: ContainerData<DeathTimer>,
    pub motions: ContainerData<Motion>,
    pub players: ContainerData<Player>,
    pub player_animations: ContainerData<SpriteAnimation<PlayerState>>,
    pub robot_animations: ContainerData<SpriteAnimation<RobotState>>,
    pub ice_robot_animations: ContainerData<SpriteAnimation<IceRobotState>>,
    pub boss_robot_animations: ContainerData<SpriteAnimation<BossRobotState>>,
    pub spider_robot_animations: ContainerData<SpriteAnimation<SpiderRobotState>>,
    pub door_animations: ContainerData<DoorAnimation>,
    pub doors: ContainerData<Door>,
    pub render_requests: ContainerData<RenderRequest>,
    pub screen_states: ContainerData<ScreenState>,
    pub robots: ContainerData<Robot>,
    pub boss_robots: ContainerData<BossRobot>,
    pub spider_robots: ContainerData<SpiderRobot>,
    pub boids: ContainerData<Boid>,
    pub tiles: ContainerData<Tile>,
    pub tilesets: ContainerData<TileSetComponent>,
    pub maps: ContainerData<TileMap>,
    pub keys: ContainerData<Key>,
    pub armor_plates: ContainerData<ArmorPlate>,
    pub potions: ContainerData<Potion>,
    pub particles: ContainerData<Particle>,
    pub colors: ContainerData<Color>,
    pub notifications: ContainerData<Notification>,
    pub spaceships: ContainerData<Spaceship>,
    pub projectiles: ContainerData<Projectile>,
    pub boss_projectiles: ContainerData<BossProjectile>,
}

/// Containers that round-trip through the document, named once.
macro_rules! persisted_containers {
    ($m:ident) => {
        $m!(
            death_timers,
            motions,
            players,
            player_animations,
            robot_animations,
            ice_robot_animations,
            boss_robot_animations,
            spider_robot_animations,
            door_animations,
            doors,
            render_requests,
            screen_states,
            robots,
            boss_robots,
            spider_robots,
            boids,
            tiles,
            tilesets,
            maps,
            keys,
            armor_plates,
            potions,
            particles,
            colors,
            notifications,
            spaceships,
            projectiles,
            boss_projectiles
        )
    };
}

// ---------------------------------------------------------------------------
// Save
// ---------------------------------------------------------------------------

/// Capture the world into a document.
pub fn to_document(world: &WorldSystem) -> SaveDocument {
    macro_rules! capture {
        ($($field:ident),*) => {
            SaveDocument {
                next_entity_id: world.registry.allocator().peek_next(),
                current_level: world.current_level(),
                tutorial_state: world.tutorial().state(),
                notification_queue: world.notifications.clone(),
                $($field: world.registry.$field.to_data(),)*
            }
        };
    }
    persisted_containers!(capture)
}

/// Serialize the world to the JSON save form.
pub fn save_to_string(world: &WorldSystem) -> Result<String, SaveError> {
    Ok(serde_json::to_string_pretty(&to_document(world))?)
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Apply a validated document to the world.
pub fn from_document(world: &mut WorldSystem, document: SaveDocument) -> Result<(), SaveError> {
    // Rebuild every container first; nothing is applied until all of them
    // validate.
    macro_rules! rebuild {
        ($($field:ident),*) => {
            {
                $(let $field = ComponentContainer::from_data(document.$field)?;)*
                $(world.registry.$field = $field;)*
            }
        };
    }
    persisted_containers!(rebuild);

    world
        .registry
        .allocator_mut()
        .restore(document.next_entity_id);
    world.registry.collisions.clear();
    world.registry.attack_boxes.clear();

    world.current_level = document.current_level;
    world.tutorial = TutorialSystem::restore(document.tutorial_state, &world.registry);
    world.notifications = document.notification_queue;
    world.ui.clear_pickup();
    world.player = world
        .registry
        .players
        .entities()
        .first()
        .copied()
        .unwrap_or(Entity::PLACEHOLDER);

    tracing::info!(level = world.current_level, "save loaded");
    Ok(())
}

/// Parse and apply a JSON save. The key checklist runs before any typed
/// deserialization, and any failure leaves `world` untouched.
pub fn load_from_str(world: &mut WorldSystem, json: &str) -> Result<(), SaveError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    for &key in REQUIRED_KEYS {
        if value.get(key).is_none() {
            return Err(SaveError::MissingKey { key });
        }
    }
    let document: SaveDocument = serde_json::from_value(value)?;
    from_document(world, document)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
