//! World orchestration: the per-tick pipeline, level lifecycle, and
//! restart.
//!
//! One `step(dt)` call per frame, single-threaded. Pass order is a hard
//! contract: AI integrates velocities, physics integrates positions and
//! detects overlaps, collision resolution drains the records, animation
//! advances, and orchestration (timers, tutorial, notifications, level
//! transitions, camera) runs last. Collision records never survive a tick.

use rand::Rng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use scrapfall_ecs::entity::Entity;

use crate::ai::AiSystem;
use crate::animation::{AnimState, Direction, PlayerState};
use crate::collision::CollisionSystem;
use crate::components::TextureAssetId;
use crate::interfaces::{AudioOut, RendererBridge, UiState};
use crate::math::Vec2;
use crate::physics::{PhysicsSystem, WINDOW_HEIGHT_PX, WINDOW_WIDTH_PX};
use crate::registry::GameRegistry;
use crate::spawn;
use crate::tutorial::{NotificationQueue, TutorialSystem};

/// Distance from the right map edge that counts as a transition attempt.
const LEVEL_EDGE_THRESHOLD: f32 = 20.0;

/// Death sequence length; drives the screen darken ramp.
const DEATH_SEQUENCE_MS: f32 = 3000.0;

/// Delay before the player may dash again, seconds.
const DASH_COOLDOWN_S: f32 = 1.5;

/// Minimum delay between shots from a ground robot, ms.
const ROBOT_FIRE_INTERVAL_MS: f32 = 2500.0;

/// Minimum delay between boss shots, ms.
const BOSS_FIRE_INTERVAL_MS: f32 = 2000.0;

/// Muzzle speed of enemy projectiles, px/s.
const ENEMY_PROJECTILE_SPEED: f32 = 250.0;

/// Shots spawn this far in front of the shooter, clear of its own box.
const MUZZLE_OFFSET: f32 = 50.0;

const BOSS_PROJECTILE_DMG: i32 = 15;
const BOSS_PROJECTILE_AMPLITUDE: f32 = 60.0;
const BOSS_PROJECTILE_FREQUENCY: f32 = 3.0;

// ---------------------------------------------------------------------------
// GameConfig
// ---------------------------------------------------------------------------

/// Tunables the simulation reads at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub seed: u64,
    /// Mean delay between ambient robot spawns, ms.
    pub robot_spawn_delay_ms: f32,
    pub max_robots: usize,
    /// Levels that require tutorial completion before the exit unlocks.
    pub gated_levels: usize,
    pub level_count: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 2024,
            robot_spawn_delay_ms: 5000.0,
            max_robots: 8,
            gated_levels: 1,
            level_count: 3,
        }
    }
}

// ---------------------------------------------------------------------------
// WorldSystem
// ---------------------------------------------------------------------------

/// Owns the registry and runs the simulation pipeline.
pub struct WorldSystem {
    pub registry: GameRegistry,
    pub ui: UiState,
    pub notifications: NotificationQueue,
    pub(crate) tutorial: TutorialSystem,
    ai: AiSystem,
    config: GameConfig,
    rng: Pcg64,

    pub(crate) current_level: usize,
    next_robot_spawn_ms: f32,
    pub(crate) player: Entity,
}

impl WorldSystem {
    pub fn new(config: GameConfig) -> Self {
        let mut world = Self {
            registry: GameRegistry::new(),
            ui: UiState::default(),
            notifications: NotificationQueue::new(),
            tutorial: TutorialSystem::new(),
            ai: AiSystem::new(config.seed),
            rng: Pcg64::new(config.seed as u128, 0xcafef00dd15ea5e5),
            config,
            current_level: 0,
            next_robot_spawn_ms: 0.0,
            player: Entity::PLACEHOLDER,
        };
        world.build_world();
        world
    }

    pub fn current_level(&self) -> usize {
        self.current_level
    }

    pub fn tutorial(&self) -> &TutorialSystem {
        &self.tutorial
    }

    pub fn player(&self) -> Entity {
        self.player
    }

    /// Advance the simulation by one frame.
    pub fn step(
        &mut self,
        elapsed_ms: f32,
        renderer: &mut dyn RendererBridge,
        audio: &mut dyn AudioOut,
    ) {
        if self.ui.game_paused {
            return;
        }

        self.spawn_ambient_robots(elapsed_ms);

        self.ai.step(&mut self.registry, elapsed_ms);
        self.fire_enemy_projectiles(elapsed_ms);
        PhysicsSystem::step(&mut self.registry, elapsed_ms);
        CollisionSystem::resolve(
            &mut self.registry,
            &mut self.ui,
            &mut self.notifications,
            audio,
        );

        self.tick_status_timers(elapsed_ms);
        self.advance_animations(elapsed_ms);

        if self.tick_death_timers(elapsed_ms) {
            // The player's death sequence finished; the world was rebuilt.
            return;
        }

        self.tutorial.step(&self.registry, &mut self.notifications);
        self.notifications.step(elapsed_ms);

        self.check_level_transition();

        if self.registry.motions.has(self.player) {
            renderer.update_camera_position(self.registry.motions.get(self.player).position);
        }
    }

    /// Full reset to the initial state.
    pub fn restart_game(&mut self) {
        self.registry.list_all_components();
        tracing::info!("restarting game");

        self.registry.clear_all_components();
        self.ui = UiState::default();
        self.notifications.clear();
        self.tutorial = TutorialSystem::new();
        self.current_level = 0;
        self.next_robot_spawn_ms = 0.0;
        self.build_world();
    }

    // -- pipeline pieces ----------------------------------------------------

    /// Ambient spawner: a robot appears at a random spot on a randomized
    /// cadence, up to the population cap.
    fn spawn_ambient_robots(&mut self, elapsed_ms: f32) {
        self.next_robot_spawn_ms -= elapsed_ms;
        if self.registry.robots.len() <= self.config.max_robots && self.next_robot_spawn_ms < 0.0 {
            let delay = self.config.robot_spawn_delay_ms;
            self.next_robot_spawn_ms = delay / 2.0 + self.rng.gen::<f32>() * (delay / 2.0);

            let position = Vec2::new(
                50.0 + self.rng.gen::<f32>() * (WINDOW_WIDTH_PX - 100.0),
                50.0 + self.rng.gen::<f32>() * (WINDOW_HEIGHT_PX - 100.0),
            );
            spawn::create_robot(&mut self.registry, position);
        }
    }

    /// Hostile ranged robots and the boss shoot at the player when in
    /// range, on a per-shooter cooldown.
    fn fire_enemy_projectiles(&mut self, elapsed_ms: f32) {
        if !self.registry.motions.has(self.player) || self.registry.death_timers.has(self.player)
        {
            return;
        }
        let player_position = self.registry.motions.get(self.player).position;

        let shooters: Vec<Entity> = self.registry.robots.entities().to_vec();
        for robot in shooters {
            if !self.registry.motions.has(robot) || self.registry.death_timers.has(robot) {
                continue;
            }
            let position = self.registry.motions.get(robot).position;
            let stats = self.registry.robots.get_mut(robot);
            if stats.companion {
                continue;
            }
            stats.fire_cooldown_ms -= elapsed_ms;
            if stats.fire_cooldown_ms > 0.0 {
                continue;
            }
            let to_player = player_position - position;
            if to_player.length() > stats.attack_box.x || to_player == Vec2::ZERO {
                continue;
            }
            stats.fire_cooldown_ms = ROBOT_FIRE_INTERVAL_MS;
            let ice = stats.ice_proj;
            let muzzle = position + to_player.normalize() * MUZZLE_OFFSET;
            let velocity = to_player.normalize() * ENEMY_PROJECTILE_SPEED;
            let angle = to_player.y.atan2(to_player.x);
            spawn::create_projectile(&mut self.registry, muzzle, velocity, angle, ice, false);
        }

        let bosses: Vec<Entity> = self.registry.boss_robots.entities().to_vec();
        for boss in bosses {
            if !self.registry.motions.has(boss) || self.registry.death_timers.has(boss) {
                continue;
            }
            let position = self.registry.motions.get(boss).position;
            let stats = self.registry.boss_robots.get_mut(boss);
            stats.fire_cooldown_ms -= elapsed_ms;
            if stats.fire_cooldown_ms > 0.0 {
                continue;
            }
            let to_player = player_position - position;
            if to_player.length() > stats.attack_box.x || to_player == Vec2::ZERO {
                continue;
            }
            stats.fire_cooldown_ms = BOSS_FIRE_INTERVAL_MS;
            let muzzle = position + to_player.normalize() * MUZZLE_OFFSET;
            let velocity = to_player.normalize() * ENEMY_PROJECTILE_SPEED;
            spawn::create_boss_projectile(
                &mut self.registry,
                muzzle,
                velocity,
                BOSS_PROJECTILE_DMG,
                BOSS_PROJECTILE_AMPLITUDE,
                BOSS_PROJECTILE_FREQUENCY,
            );
        }
    }

    /// Cooldowns and status countdowns, polled per frame.
    fn tick_status_timers(&mut self, elapsed_ms: f32) {
        for spider in self.registry.spider_robots.components_mut() {
            if spider.attack_cooldown_ms > 0.0 {
                spider.attack_cooldown_ms -= elapsed_ms;
            }
        }

        let players: Vec<Entity> = self.registry.players.entities().to_vec();
        for entity in players {
            let player = self.registry.players.get_mut(entity);
            if player.slow {
                player.slow_count_down -= elapsed_ms;
                if player.slow_count_down <= 0.0 {
                    player.slow = false;
                    player.slow_count_down = 0.0;
                }
            }

            if player.is_dashing {
                player.dash_timer -= elapsed_ms / 1000.0;
                if player.dash_timer <= 0.0 {
                    player.is_dashing = false;
                    player.dash_timer = 0.0;
                    player.dash_cooldown = DASH_COOLDOWN_S;
                    // Drop back from dash speed to walking speed, keeping
                    // the travel direction.
                    let walk_speed = if player.slow {
                        player.speed * 0.5
                    } else {
                        player.speed
                    };
                    if self.registry.motions.has(entity) {
                        let motion = self.registry.motions.get_mut(entity);
                        if motion.velocity != Vec2::ZERO {
                            motion.velocity = motion.velocity.normalize() * walk_speed;
                        }
                    }
                }
            } else if player.dash_cooldown > 0.0 {
                player.dash_cooldown = (player.dash_cooldown - elapsed_ms / 1000.0).max(0.0);
            }
        }

        // Unspent projectiles expire.
        let expired: Vec<Entity> = self
            .registry
            .projectiles
            .iter_mut()
            .filter_map(|(e, p)| {
                p.ttl_ms -= elapsed_ms;
                (p.ttl_ms <= 0.0).then_some(e)
            })
            .collect();
        for entity in expired {
            self.registry.remove_all_components_of(entity);
        }

        // Boss projectiles ride a sine wave.
        let bosses: Vec<Entity> = self.registry.boss_projectiles.entities().to_vec();
        for entity in bosses {
            let proj = self.registry.boss_projectiles.get_mut(entity);
            proj.time += elapsed_ms / 1000.0;
            let wobble = (proj.time * proj.frequency).sin() * proj.amplitude;
            if self.registry.motions.has(entity) {
                self.registry.motions.get_mut(entity).velocity.y = wobble;
            }
        }

        let faded: Vec<Entity> = self
            .registry
            .particles
            .iter_mut()
            .filter_map(|(e, p)| {
                p.lifetime += elapsed_ms / 1000.0;
                p.opacity = 1.0 - p.lifetime / p.max_lifetime;
                (p.lifetime >= p.max_lifetime).then_some(e)
            })
            .collect();
        for entity in faded {
            self.registry.remove_all_components_of(entity);
        }
    }

    /// Advance every frame timer and drive walk/idle intent from motion.
    fn advance_animations(&mut self, elapsed_ms: f32) {
        // The player's walk/idle state follows its velocity unless an
        // action or the death sequence owns the machine.
        if self.registry.player_animations.has(self.player) && self.registry.motions.has(self.player)
        {
            let velocity = self.registry.motions.get(self.player).velocity;
            let anim = self.registry.player_animations.get_mut(self.player);
            if !anim.state.is_action() && anim.state != PlayerState::Dead {
                let direction = direction_of(velocity).unwrap_or(anim.direction);
                if velocity == Vec2::ZERO {
                    anim.is_walking = false;
                    anim.set_state(PlayerState::Idle, anim.direction);
                } else {
                    anim.set_state(PlayerState::Walk, direction);
                }
            }
        }

        for anim in self.registry.player_animations.components_mut() {
            anim.update(elapsed_ms);
        }
        for anim in self.registry.robot_animations.components_mut() {
            anim.update(elapsed_ms);
        }
        for anim in self.registry.ice_robot_animations.components_mut() {
            anim.update(elapsed_ms);
        }
        for anim in self.registry.boss_robot_animations.components_mut() {
            anim.update(elapsed_ms);
        }
        for anim in self.registry.spider_robot_animations.components_mut() {
            anim.update(elapsed_ms);
        }
        for anim in self.registry.door_animations.components_mut() {
            anim.update(elapsed_ms);
        }
    }

    /// Count down death timers. Returns true when the player's sequence
    /// expired and the world restarted.
    fn tick_death_timers(&mut self, elapsed_ms: f32) -> bool {
        let mut min_counter_ms = DEATH_SEQUENCE_MS;
        let mut expired: Vec<Entity> = Vec::new();

        for (entity, timer) in self.registry.death_timers.iter_mut() {
            timer.counter_ms -= elapsed_ms;
            if timer.counter_ms < min_counter_ms {
                min_counter_ms = timer.counter_ms;
            }
            if timer.counter_ms < 0.0 {
                expired.push(entity);
            }
        }

        let player_dying = self.registry.death_timers.has(self.player);
        if let Some(screen) = self.registry.screen_states.components_mut().first_mut() {
            screen.darken_screen_factor = if player_dying {
                1.0 - min_counter_ms / DEATH_SEQUENCE_MS
            } else {
                0.0
            };
        }

        for entity in expired {
            if entity == self.player {
                self.restart_game();
                return true;
            }
            self.registry.remove_all_components_of(entity);
        }
        false
    }

    /// Map-edge crossing; gated by tutorial completion on early levels.
    fn check_level_transition(&mut self) {
        if !self.registry.motions.has(self.player) {
            return;
        }
        let x = self.registry.motions.get(self.player).position.x;
        if x < WINDOW_WIDTH_PX - LEVEL_EDGE_THRESHOLD {
            return;
        }
        if self.current_level + 1 >= self.config.level_count {
            return;
        }

        let gated = self.current_level < self.config.gated_levels;
        if gated && !self.tutorial.is_complete() {
            self.notifications
                .queue_unique("Finish repairing your bearings before moving on.", 3000.0);
            return;
        }

        self.advance_level();
    }

    /// Hard teardown of the current level, then rebuild.
    fn advance_level(&mut self) {
        tracing::info!(from = self.current_level, to = self.current_level + 1, "level transition");
        self.current_level += 1;

        // Everything except the player is level-scoped.
        let level_entities: Vec<Entity> = self
            .registry
            .motions
            .entities()
            .iter()
            .copied()
            .filter(|&e| e != self.player)
            .collect();
        for entity in level_entities {
            self.registry.remove_all_components_of(entity);
        }
        // Tile bookkeeping entities carry no motion; clear their containers
        // directly.
        self.registry.maps.clear();
        self.registry.tilesets.clear();
        self.registry.death_timers.clear();
        self.registry.collisions.clear();
        self.notifications.clear();
        self.ui.clear_pickup();

        self.build_level();
        if self.registry.motions.has(self.player) {
            self.registry.motions.get_mut(self.player).position =
                Vec2::new(32.0, WINDOW_HEIGHT_PX / 2.0);
        }
    }

    // -- construction -------------------------------------------------------

    fn build_world(&mut self) {
        spawn::create_screen_state(&mut self.registry);
        self.player = spawn::create_player(
            &mut self.registry,
            Vec2::new(WINDOW_WIDTH_PX / 2.0, WINDOW_HEIGHT_PX - 200.0),
        );
        self.registry
            .colors
            .insert(self.player, crate::components::Color { r: 1.0, g: 0.8, b: 0.8 });
        self.build_level();
    }

    /// Populate the current level's furniture and inhabitants.
    fn build_level(&mut self) {
        let tile_size = 64;
        let cols = (WINDOW_WIDTH_PX as i32) / tile_size;
        let rows = (WINDOW_HEIGHT_PX as i32) / tile_size;
        let grid = vec![vec![0; cols as usize]; rows as usize];

        // One tile entity per grid cell; they live until the next teardown.
        for (row, row_tiles) in grid.iter().enumerate() {
            for (col, &tile_id) in row_tiles.iter().enumerate() {
                let position = Vec2::new(
                    col as f32 * tile_size as f32 + tile_size as f32 / 2.0,
                    row as f32 * tile_size as f32 + tile_size as f32 / 2.0,
                );
                spawn::create_tile(
                    &mut self.registry,
                    position,
                    tile_size as f32,
                    0,
                    tile_id,
                    tile_id == 0,
                );
            }
        }
        spawn::create_tile_map(&mut self.registry, grid, tile_size);
        spawn::create_tileset(&mut self.registry, TextureAssetId::TileAtlas, tile_size);

        match self.current_level {
            0 => {
                spawn::create_spaceship(&mut self.registry, Vec2::new(150.0, 600.0));
                spawn::create_key(&mut self.registry, Vec2::new(300.0, 300.0));
                spawn::create_armor_plate(&mut self.registry, Vec2::new(500.0, 250.0));
                spawn::create_potion(&mut self.registry, Vec2::new(700.0, 350.0));
                spawn::create_door(
                    &mut self.registry,
                    Vec2::new(WINDOW_WIDTH_PX - 48.0, WINDOW_HEIGHT_PX / 2.0),
                    true,
                );
            }
            1 => {
                for i in 0..3 {
                    spawn::create_robot(
                        &mut self.registry,
                        Vec2::new(300.0 + 200.0 * i as f32, 300.0),
                    );
                }
                spawn::create_ice_robot(&mut self.registry, Vec2::new(600.0, 600.0));
                spawn::create_spider_robot(&mut self.registry, Vec2::new(900.0, 200.0));
                spawn::create_potion(&mut self.registry, Vec2::new(200.0, 600.0));
            }
            _ => {
                spawn::create_boss_robot(
                    &mut self.registry,
                    Vec2::new(WINDOW_WIDTH_PX / 2.0, 200.0),
                );
                spawn::create_spider_robot(&mut self.registry, Vec2::new(300.0, 500.0));
                spawn::create_spider_robot(&mut self.registry, Vec2::new(900.0, 500.0));
            }
        }
    }
}

/// Dominant 4-way facing of a velocity; `None` when not moving.
pub(crate) fn direction_of(velocity: Vec2) -> Option<Direction> {
    if velocity == Vec2::ZERO {
        return None;
    }
    Some(if velocity.x.abs() >= velocity.y.abs() {
        if velocity.x >= 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if velocity.y >= 0.0 {
        Direction::Down
    } else {
        Direction::Up
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::{NullAudio, NullRenderer};

    fn quiet_config() -> GameConfig {
        GameConfig {
            // Effectively disable the ambient spawner for deterministic
            // entity counts.
            robot_spawn_delay_ms: f32::MAX,
            ..GameConfig::default()
        }
    }

    #[test]
    fn new_world_has_player_and_level_zero_furniture() {
        let world = WorldSystem::new(quiet_config());
        assert!(world.registry.players.has(world.player()));
        assert_eq!(world.current_level(), 0);
        assert_eq!(world.registry.spaceships.len(), 1);
        assert_eq!(world.registry.keys.len(), 1);
        assert_eq!(world.registry.doors.len(), 1);
        // One tile entity per grid cell plus the map/tileset bookkeeping.
        assert_eq!(world.registry.tiles.len(), (1200 / 64) * (800 / 64));
        assert_eq!(world.registry.maps.len(), 1);
        assert_eq!(world.registry.tilesets.len(), 1);
    }

    #[test]
    fn step_runs_the_whole_pipeline() {
        let mut world = WorldSystem::new(quiet_config());
        let mut renderer = NullRenderer::default();
        let mut audio = NullAudio::default();
        for _ in 0..10 {
            world.step(16.0, &mut renderer, &mut audio);
        }
        // Camera tracked the player.
        assert_eq!(
            renderer.camera_position,
            world.registry.motions.get(world.player()).position
        );
        // Collision records never carry over.
        assert!(world.registry.collisions.is_empty());
    }

    #[test]
    fn pause_freezes_the_simulation() {
        let mut world = WorldSystem::new(quiet_config());
        let mut renderer = NullRenderer::default();
        let mut audio = NullAudio::default();
        world.ui.game_paused = true;
        let before = world.registry.motions.get(world.player()).position;
        world.registry.motions.get_mut(world.player()).velocity = Vec2::new(100.0, 0.0);
        world.step(1000.0, &mut renderer, &mut audio);
        assert_eq!(world.registry.motions.get(world.player()).position, before);
    }

    #[test]
    fn restart_rebuilds_from_scratch() {
        let mut world = WorldSystem::new(quiet_config());
        let old_player = world.player();
        world
            .registry
            .players
            .get_mut(old_player)
            .inventory
            .add_item("Key", 1);

        world.restart_game();

        let new_player = world.player();
        assert_ne!(old_player, new_player, "entity ids are never reused");
        assert!(!world.registry.players.get(new_player).inventory.contains("Key"));
        assert_eq!(world.current_level(), 0);
    }

    #[test]
    fn ungated_level_transition_moves_player_to_left_edge() {
        let mut world = WorldSystem::new(GameConfig {
            gated_levels: 0,
            ..quiet_config()
        });
        world.registry.motions.get_mut(world.player()).position =
            Vec2::new(WINDOW_WIDTH_PX - 5.0, 400.0);
        world.check_level_transition();
        assert_eq!(world.current_level(), 1);
        assert_eq!(
            world.registry.motions.get(world.player()).position.x,
            32.0
        );
        // Level 0 furniture was torn down.
        assert!(world.registry.spaceships.is_empty());
        assert!(world.registry.robots.len() >= 3);
    }

    #[test]
    fn level_transition_tears_down_tiles_map_and_tileset() {
        let mut world = WorldSystem::new(GameConfig {
            gated_levels: 0,
            ..quiet_config()
        });
        let tiles_per_level = world.registry.tiles.len();

        world.registry.motions.get_mut(world.player()).position =
            Vec2::new(WINDOW_WIDTH_PX - 5.0, 400.0);
        world.check_level_transition();

        assert_eq!(world.registry.maps.len(), 1, "old tile map torn down");
        assert_eq!(world.registry.tilesets.len(), 1, "old tileset torn down");
        assert_eq!(world.registry.tiles.len(), tiles_per_level);
    }

    #[test]
    fn ranged_robot_fires_at_player_in_range() {
        let mut world = WorldSystem::new(quiet_config());
        let mut renderer = NullRenderer::default();
        let mut audio = NullAudio::default();
        let player_pos = world.registry.motions.get(world.player()).position;
        spawn::create_robot(&mut world.registry, player_pos + Vec2::new(-200.0, 0.0));

        world.step(16.0, &mut renderer, &mut audio);

        let fired: Vec<_> = world
            .registry
            .projectiles
            .components()
            .iter()
            .filter(|p| !p.friendly)
            .collect();
        assert_eq!(fired.len(), 1);

        // Cooling down: no second shot next frame.
        world.step(16.0, &mut renderer, &mut audio);
        let hostile = world
            .registry
            .projectiles
            .components()
            .iter()
            .filter(|p| !p.friendly)
            .count();
        assert!(hostile <= 1);
    }

    #[test]
    fn boss_fires_wobbling_projectiles() {
        let mut world = WorldSystem::new(quiet_config());
        let mut renderer = NullRenderer::default();
        let mut audio = NullAudio::default();
        let player_pos = world.registry.motions.get(world.player()).position;
        spawn::create_boss_robot(&mut world.registry, player_pos + Vec2::new(-300.0, 0.0));

        world.step(16.0, &mut renderer, &mut audio);

        assert_eq!(world.registry.boss_projectiles.len(), 1);
        let shot = *world.registry.boss_projectiles.entities().first().unwrap();
        assert!(world.registry.projectiles.has(shot), "carries a damaging half");
    }

    #[test]
    fn stray_projectile_expires_by_lifetime() {
        let mut world = WorldSystem::new(quiet_config());
        let mut renderer = NullRenderer::default();
        let mut audio = NullAudio::default();
        let shot = spawn::create_projectile(
            &mut world.registry,
            Vec2::new(100.0, 100.0),
            Vec2::ZERO,
            0.0,
            false,
            true,
        );

        for _ in 0..9 {
            world.step(500.0, &mut renderer, &mut audio);
        }
        assert!(!world.registry.projectiles.has(shot));
        assert!(!world.registry.any_component_of(shot));
    }

    #[test]
    fn gated_transition_blocks_with_notification() {
        let mut world = WorldSystem::new(quiet_config());
        world.registry.motions.get_mut(world.player()).position =
            Vec2::new(WINDOW_WIDTH_PX - 5.0, 400.0);
        world.check_level_transition();
        assert_eq!(world.current_level(), 0);
        assert!(world.notifications.pending() > 0);
    }

    #[test]
    fn player_death_darkens_screen_then_restarts() {
        let mut world = WorldSystem::new(quiet_config());
        let mut renderer = NullRenderer::default();
        let mut audio = NullAudio::default();
        let player = world.player();
        world
            .registry
            .death_timers
            .insert(player, crate::components::DeathTimer::default());

        world.step(1000.0, &mut renderer, &mut audio);
        let screen = world.registry.screen_states.components()[0];
        assert!(screen.darken_screen_factor > 0.0);

        // Run past the full sequence: the world restarts.
        for _ in 0..4 {
            world.step(1000.0, &mut renderer, &mut audio);
        }
        assert_ne!(world.player(), player);
        assert!(!world.registry.death_timers.has(world.player()));
    }

    #[test]
    fn slow_status_counts_down_and_clears() {
        let mut world = WorldSystem::new(quiet_config());
        let player = world.player();
        {
            let stats = world.registry.players.get_mut(player);
            stats.slow = true;
            stats.slow_count_down = 100.0;
        }
        world.tick_status_timers(60.0);
        assert!(world.registry.players.get(player).slow);
        world.tick_status_timers(60.0);
        assert!(!world.registry.players.get(player).slow);
    }

    #[test]
    fn direction_of_picks_dominant_axis() {
        assert_eq!(direction_of(Vec2::new(10.0, 1.0)), Some(Direction::Right));
        assert_eq!(direction_of(Vec2::new(-10.0, 1.0)), Some(Direction::Left));
        assert_eq!(direction_of(Vec2::new(1.0, 10.0)), Some(Direction::Down));
        assert_eq!(direction_of(Vec2::new(1.0, -10.0)), Some(Direction::Up));
        assert_eq!(direction_of(Vec2::ZERO), None);
    }
}
