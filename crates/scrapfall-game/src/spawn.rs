//! Entity factories.
//!
//! Each factory mints a fresh entity and inserts its full component bundle,
//! so a game object is always created whole. Gameplay code never assembles
//! bundles by hand.

use scrapfall_ecs::entity::Entity;

use crate::animation::{
    Direction, DoorAnimation, IceRobotState, RobotState, SpriteAnimation,
};
use crate::components::{
    ArmorPlate, AttackBox, Boid, BossProjectile, BossRobot, Door, EffectAssetId, GeometryId, Key,
    Motion, Player, Potion, Projectile, RenderRequest, Robot, ScreenState, SpiderRobot, Spaceship,
    TextureAssetId, Tile, TileMap, TileSetComponent,
};
use crate::math::Vec2;
use crate::registry::GameRegistry;

pub const PLAYER_BB: Vec2 = Vec2 { x: 120.0, y: 80.8 };
pub const ROBOT_BB: Vec2 = Vec2 { x: 150.0, y: 101.0 };
pub const PICKUP_BB: Vec2 = Vec2 { x: 40.0, y: 40.0 };
pub const PROJECTILE_SCALE: Vec2 = Vec2 { x: 127.0, y: 123.0 };

fn sprite(texture: TextureAssetId) -> RenderRequest {
    RenderRequest {
        used_texture: texture,
        used_effect: EffectAssetId::Textured,
        used_geometry: GeometryId::Sprite,
    }
}

// ---------------------------------------------------------------------------
// Characters
// ---------------------------------------------------------------------------

pub fn create_player(registry: &mut GameRegistry, position: Vec2) -> Entity {
    let entity = registry.create_entity();
    registry.motions.insert(
        entity,
        Motion {
            position,
            scale: PLAYER_BB,
            bb: Vec2::splat(64.0),
            ..Motion::default()
        },
    );
    registry.players.insert(entity, Player::default());
    registry.player_animations.insert(entity, SpriteAnimation::new());
    registry
        .render_requests
        .insert(entity, sprite(TextureAssetId::PlayerFullSheet));
    entity
}

fn robot_bundle(registry: &mut GameRegistry, position: Vec2, robot: Robot) -> Entity {
    let entity = registry.create_entity();
    registry.motions.insert(
        entity,
        Motion {
            position,
            scale: ROBOT_BB,
            bb: Vec2::splat(64.0),
            ..Motion::default()
        },
    );
    registry.robots.insert(
        entity,
        Robot {
            search_box: Vec2::splat(15.0 * 64.0),
            attack_box: Vec2::splat(10.0 * 64.0),
            panic_box: Vec2::splat(4.0 * 64.0),
            ..robot
        },
    );
    entity
}

/// A generic flocking ground robot. Weakened ones can be captured.
pub fn create_robot(registry: &mut GameRegistry, position: Vec2) -> Entity {
    let entity = robot_bundle(
        registry,
        position,
        Robot {
            is_capturable: true,
            ..Robot::default()
        },
    );
    registry.boids.insert(entity, Boid::default());
    let mut animation = SpriteAnimation::new();
    animation.set_state(RobotState::Idle, Direction::Left);
    registry.robot_animations.insert(entity, animation);
    registry
        .render_requests
        .insert(entity, sprite(TextureAssetId::CrockbotFullSheet));
    entity
}

/// A robot firing slowing ice projectiles.
pub fn create_ice_robot(registry: &mut GameRegistry, position: Vec2) -> Entity {
    let entity = robot_bundle(
        registry,
        position,
        Robot {
            ice_proj: true,
            ..Robot::default()
        },
    );
    registry.boids.insert(entity, Boid::default());
    let mut animation: SpriteAnimation<IceRobotState> = SpriteAnimation::new();
    animation.set_state(IceRobotState::Idle, Direction::Left);
    registry.ice_robot_animations.insert(entity, animation);
    registry
        .render_requests
        .insert(entity, sprite(TextureAssetId::IceRobotFullSheet));
    entity
}

/// A captured robot fighting for the player, with stats carried over from
/// the item it was stored as.
pub fn create_companion_robot(
    registry: &mut GameRegistry,
    position: Vec2,
    health: f32,
    attack: f32,
    speed: f32,
) -> Entity {
    let entity = robot_bundle(
        registry,
        position,
        Robot {
            companion: true,
            current_health: health,
            max_health: health,
            attack,
            speed,
            ..Robot::default()
        },
    );
    let mut animation = SpriteAnimation::new();
    animation.set_state(RobotState::Idle, Direction::Left);
    registry.robot_animations.insert(entity, animation);
    registry
        .render_requests
        .insert(entity, sprite(TextureAssetId::CompanionCrockbot));
    entity
}

pub fn create_boss_robot(registry: &mut GameRegistry, position: Vec2) -> Entity {
    let entity = registry.create_entity();
    registry.motions.insert(
        entity,
        Motion {
            position,
            scale: ROBOT_BB * 2.0,
            bb: Vec2::splat(128.0),
            ..Motion::default()
        },
    );
    registry.boss_robots.insert(
        entity,
        BossRobot {
            search_box: Vec2::splat(15.0 * 64.0),
            attack_box: Vec2::splat(10.0 * 64.0),
            panic_box: Vec2::splat(4.0 * 64.0),
            ..BossRobot::default()
        },
    );
    registry.boss_robot_animations.insert(entity, SpriteAnimation::new());
    registry
        .render_requests
        .insert(entity, sprite(TextureAssetId::BossFullSheet));
    entity
}

pub fn create_spider_robot(registry: &mut GameRegistry, position: Vec2) -> Entity {
    let entity = registry.create_entity();
    registry.motions.insert(
        entity,
        Motion {
            position,
            scale: ROBOT_BB * 0.5,
            bb: Vec2::splat(48.0),
            ..Motion::default()
        },
    );
    registry.spider_robots.insert(entity, SpiderRobot::default());
    registry.spider_robot_animations.insert(entity, SpriteAnimation::new());
    registry
        .render_requests
        .insert(entity, sprite(TextureAssetId::SpiderRobotFullSheet));
    entity
}

// ---------------------------------------------------------------------------
// Projectiles and attacks
// ---------------------------------------------------------------------------

pub fn create_projectile(
    registry: &mut GameRegistry,
    position: Vec2,
    velocity: Vec2,
    angle: f32,
    ice: bool,
    friendly: bool,
) -> Entity {
    let entity = registry.create_entity();
    registry.motions.insert(
        entity,
        Motion {
            position,
            angle,
            velocity,
            target_velocity: velocity,
            scale: PROJECTILE_SCALE,
            bb: Vec2::splat(32.0),
            ..Motion::default()
        },
    );
    registry.projectiles.insert(
        entity,
        Projectile {
            dmg: if ice { 5 } else { 10 },
            ice,
            friendly,
            ..Projectile::default()
        },
    );
    let texture = if ice {
        TextureAssetId::IceProjectile
    } else {
        TextureAssetId::Projectile
    };
    registry.render_requests.insert(entity, sprite(texture));
    entity
}

pub fn create_boss_projectile(
    registry: &mut GameRegistry,
    position: Vec2,
    velocity: Vec2,
    dmg: i32,
    amplitude: f32,
    frequency: f32,
) -> Entity {
    let entity = registry.create_entity();
    registry.motions.insert(
        entity,
        Motion {
            position,
            velocity,
            target_velocity: velocity,
            scale: PROJECTILE_SCALE,
            bb: Vec2::splat(32.0),
            ..Motion::default()
        },
    );
    registry.boss_projectiles.insert(
        entity,
        BossProjectile {
            dmg,
            amplitude,
            frequency,
            time: 0.0,
        },
    );
    // The damaging half rides the ordinary projectile rules; the
    // BossProjectile component only drives the sine wobble.
    registry.projectiles.insert(
        entity,
        Projectile {
            dmg,
            ..Projectile::default()
        },
    );
    registry
        .render_requests
        .insert(entity, sprite(TextureAssetId::Projectile));
    entity
}

/// A transient melee hit volume.
pub fn attack_box(position: Vec2, bb: Vec2, dmg: i32, friendly: bool) -> AttackBox {
    AttackBox {
        position,
        bb,
        dmg,
        friendly,
    }
}

// ---------------------------------------------------------------------------
// Pickups
// ---------------------------------------------------------------------------

fn pickup_bundle(
    registry: &mut GameRegistry,
    position: Vec2,
    texture: TextureAssetId,
) -> Entity {
    let entity = registry.create_entity();
    registry.motions.insert(
        entity,
        Motion {
            position,
            scale: PICKUP_BB,
            bb: PICKUP_BB,
            ..Motion::default()
        },
    );
    registry.render_requests.insert(entity, sprite(texture));
    entity
}

pub fn create_key(registry: &mut GameRegistry, position: Vec2) -> Entity {
    let entity = pickup_bundle(registry, position, TextureAssetId::Key);
    registry.keys.insert(entity, Key);
    entity
}

pub fn create_armor_plate(registry: &mut GameRegistry, position: Vec2) -> Entity {
    let entity = pickup_bundle(registry, position, TextureAssetId::ArmorPlate);
    registry.armor_plates.insert(entity, ArmorPlate);
    entity
}

pub fn create_potion(registry: &mut GameRegistry, position: Vec2) -> Entity {
    let entity = pickup_bundle(registry, position, TextureAssetId::HealthPotion);
    registry.potions.insert(entity, Potion);
    entity
}

// ---------------------------------------------------------------------------
// Level furniture
// ---------------------------------------------------------------------------

pub fn create_door(registry: &mut GameRegistry, position: Vec2, is_right_door: bool) -> Entity {
    let entity = registry.create_entity();
    registry.motions.insert(
        entity,
        Motion {
            position,
            scale: Vec2::new(64.0, 96.0),
            bb: Vec2::new(64.0, 96.0),
            ..Motion::default()
        },
    );
    registry.doors.insert(
        entity,
        Door {
            is_right_door,
            ..Door::default()
        },
    );
    registry.door_animations.insert(entity, DoorAnimation::new());
    let texture = if is_right_door {
        TextureAssetId::RightDoorSheet
    } else {
        TextureAssetId::BottomDoorSheet
    };
    registry.render_requests.insert(entity, sprite(texture));
    entity
}

pub fn create_tile(
    registry: &mut GameRegistry,
    position: Vec2,
    tile_size: f32,
    tileset_id: i32,
    tile_id: i32,
    walkable: bool,
) -> Entity {
    let entity = registry.create_entity();
    registry.motions.insert(
        entity,
        Motion {
            position,
            scale: Vec2::new(tile_size, -tile_size),
            bb: Vec2::new(tile_size, -tile_size),
            ..Motion::default()
        },
    );
    registry.tiles.insert(
        entity,
        Tile {
            tileset_id,
            tile_id,
            walkable,
            atlas: TextureAssetId::TileAtlas,
        },
    );
    registry
        .render_requests
        .insert(entity, sprite(TextureAssetId::TileAtlas));
    entity
}

pub fn create_tile_map(
    registry: &mut GameRegistry,
    tile_map: Vec<Vec<i32>>,
    tile_size: i32,
) -> Entity {
    let entity = registry.create_entity();
    registry.maps.insert(
        entity,
        TileMap {
            tile_map,
            tile_size,
        },
    );
    entity
}

pub fn create_tileset(
    registry: &mut GameRegistry,
    texture: TextureAssetId,
    tile_size: i32,
) -> Entity {
    let entity = registry.create_entity();
    registry.tilesets.insert(
        entity,
        TileSetComponent {
            texture: Some(texture),
            tile_size,
        },
    );
    entity
}

pub fn create_spaceship(registry: &mut GameRegistry, position: Vec2) -> Entity {
    let entity = registry.create_entity();
    registry.motions.insert(
        entity,
        Motion {
            position,
            scale: Vec2::new(-300.0, -200.0),
            bb: Vec2::new(300.0, 200.0),
            ..Motion::default()
        },
    );
    registry.spaceships.insert(entity, Spaceship);
    registry.render_requests.insert(
        entity,
        RenderRequest {
            used_texture: TextureAssetId::Teleporter,
            used_effect: EffectAssetId::Spaceship,
            used_geometry: GeometryId::Spaceship,
        },
    );
    entity
}

/// The singleton screen-state entity.
pub fn create_screen_state(registry: &mut GameRegistry) -> Entity {
    let entity = registry.create_entity();
    registry.screen_states.insert(entity, ScreenState::default());
    entity
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
