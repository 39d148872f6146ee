//! Collision resolution.
//!
//! Consumes the frame's [`Collision`](crate::components::Collision) records
//! and applies the gameplay rules: melee damage, projectile hits with
//! allegiance filtering, block-reflection, armor absorption, slow status,
//! pickup arming and door hints. The record list is symmetric (both
//! orderings of a pair may appear) and every rule matches regardless of
//! which side is the owner. The container is fully drained at the end of
//! the pass; records never carry over to the next tick.

use std::ops::ControlFlow;

use scrapfall_ecs::entity::Entity;

use crate::animation::PlayerState;
use crate::components::DeathTimer;
use crate::interfaces::{AudioOut, Sound, UiState};
use crate::registry::GameRegistry;
use crate::tutorial::NotificationQueue;

/// Slow status duration applied by ice projectiles, ms.
const ICE_SLOW_DURATION_MS: f32 = 3000.0;

/// How long a door hint stays on screen, ms.
const DOOR_HINT_DURATION_MS: f32 = 2500.0;

// ---------------------------------------------------------------------------
// CollisionSystem
// ---------------------------------------------------------------------------

pub struct CollisionSystem;

impl CollisionSystem {
    /// Resolve every collision record of this frame, then drain the
    /// container.
    pub fn resolve(
        registry: &mut GameRegistry,
        ui: &mut UiState,
        notifications: &mut NotificationQueue,
        audio: &mut dyn AudioOut,
    ) {
        // Pickup and capture prompts re-arm from scratch each frame;
        // continued contact re-sets them below.
        ui.clear_pickup();
        ui.show_capture_ui = false;
        ui.capture_candidate = None;
        for robot in registry.robots.components_mut() {
            robot.show_capture_ui = false;
        }

        let pairs: Vec<(Entity, Entity)> = registry
            .collisions
            .iter()
            .map(|(owner, c)| (owner, c.other))
            .collect();

        for (a, b) in pairs {
            if dispatch_pair(registry, ui, notifications, audio, a, b).is_break() {
                break;
            }
        }

        resolve_attack_boxes(registry, audio);

        registry.collisions.clear();
        registry.attack_boxes.clear();
    }
}

/// Melee hit volumes live for exactly one resolution pass: damage every
/// overlapping target of the opposing allegiance, then drain.
fn resolve_attack_boxes(registry: &mut GameRegistry, audio: &mut dyn AudioOut) {
    let volumes: Vec<crate::components::AttackBox> =
        registry.attack_boxes.components().to_vec();

    for volume in volumes {
        let victims: Vec<Entity> = registry
            .robots
            .entities()
            .iter()
            .copied()
            .filter(|&robot| {
                registry.robots.get(robot).companion != volume.friendly
                    && registry.motions.has(robot)
                    && overlaps_box(registry, robot, &volume)
            })
            .collect();

        for robot in victims {
            let stats = registry.robots.get_mut(robot);
            stats.current_health -= volume.dmg as f32;
            audio.play(Sound::Damage);
            if stats.current_health <= 0.0 {
                stats.should_die = true;
                start_robot_death(registry, audio, robot);
            }
        }
    }
}

fn overlaps_box(
    registry: &GameRegistry,
    entity: Entity,
    volume: &crate::components::AttackBox,
) -> bool {
    let motion = registry.motions.get(entity);
    let half = motion.bb.abs() / 2.0;
    let vol_half = volume.bb.abs() / 2.0;
    (motion.position.x - volume.position.x).abs() <= half.x + vol_half.x
        && (motion.position.y - volume.position.y).abs() <= half.y + vol_half.y
}

/// Apply every matching rule to one ordered pair. `Break` short-circuits
/// the remaining pairs of the tick (the capture-UI immunity rule).
fn dispatch_pair(
    registry: &mut GameRegistry,
    ui: &mut UiState,
    notifications: &mut NotificationQueue,
    audio: &mut dyn AudioOut,
    a: Entity,
    b: Entity,
) -> ControlFlow<()> {
    // Orient each concern so the rule reads one way.
    if let (Some(player), Some(spider)) = orient(registry, a, b, is_player, is_spider) {
        spider_melee(registry, audio, player, spider);
    }

    if let (Some(projectile), Some(robot)) = orient(registry, a, b, is_projectile, is_robot) {
        return projectile_vs_robot(registry, ui, audio, projectile, robot);
    }

    if let (Some(projectile), Some(boss)) = orient(registry, a, b, is_projectile, is_boss) {
        projectile_vs_boss(registry, audio, projectile, boss);
    }

    if let (Some(projectile), Some(player)) = orient(registry, a, b, is_projectile, is_player) {
        projectile_vs_player(registry, audio, projectile, player);
    }

    if let (Some(player), Some(other)) = orient(registry, a, b, is_player, |_, _| true) {
        player_contact(registry, ui, notifications, audio, player, other);
    }

    ControlFlow::Continue(())
}

/// Match an unordered pair against two predicates, returning it oriented
/// as (first-match, second-match).
fn orient(
    registry: &GameRegistry,
    a: Entity,
    b: Entity,
    first: impl Fn(&GameRegistry, Entity) -> bool,
    second: impl Fn(&GameRegistry, Entity) -> bool,
) -> (Option<Entity>, Option<Entity>) {
    if first(registry, a) && second(registry, b) {
        (Some(a), Some(b))
    } else if first(registry, b) && second(registry, a) {
        (Some(b), Some(a))
    } else {
        (None, None)
    }
}

fn is_player(registry: &GameRegistry, e: Entity) -> bool {
    registry.players.has(e)
}

fn is_spider(registry: &GameRegistry, e: Entity) -> bool {
    registry.spider_robots.has(e)
}

fn is_projectile(registry: &GameRegistry, e: Entity) -> bool {
    registry.projectiles.has(e)
}

fn is_robot(registry: &GameRegistry, e: Entity) -> bool {
    registry.robots.has(e)
}

fn is_boss(registry: &GameRegistry, e: Entity) -> bool {
    registry.boss_robots.has(e)
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Spider melee: a cooldown-gated fixed hit.
fn spider_melee(
    registry: &mut GameRegistry,
    audio: &mut dyn AudioOut,
    player: Entity,
    spider: Entity,
) {
    let spider_stats = registry.spider_robots.get_mut(spider);
    if spider_stats.attack_cooldown_ms > 0.0 {
        return;
    }
    spider_stats.attack_cooldown_ms = spider_stats.attack_interval_ms;
    let damage = spider_stats.attack_damage;

    let player_stats = registry.players.get_mut(player);
    player_stats.current_health -= damage;
    audio.play(Sound::Damage);

    if player_stats.current_health <= 0.0 {
        start_player_death(registry, audio, player);
    }
}

/// Projectile against a ground robot, with allegiance filtering. A robot
/// currently showing its capture prompt is immune, and that immunity
/// short-circuits the remaining pairs of the tick.
fn projectile_vs_robot(
    registry: &mut GameRegistry,
    ui: &mut UiState,
    audio: &mut dyn AudioOut,
    projectile: Entity,
    robot: Entity,
) -> ControlFlow<()> {
    if registry.robots.get(robot).show_capture_ui || ui.show_capture_ui {
        return ControlFlow::Break(());
    }

    let friendly = registry.projectiles.get(projectile).friendly;
    let companion = registry.robots.get(robot).companion;
    // Friendly fire hits enemies only; hostile fire hits companions only.
    if friendly == companion {
        return ControlFlow::Continue(());
    }

    let dmg = registry.projectiles.get(projectile).dmg as f32;
    let stats = registry.robots.get_mut(robot);
    stats.current_health -= dmg;
    let dead = stats.current_health <= 0.0;
    if dead {
        stats.should_die = true;
    }

    registry.remove_all_components_of(projectile);
    audio.play(Sound::Damage);

    if dead {
        start_robot_death(registry, audio, robot);
    }
    ControlFlow::Continue(())
}

fn projectile_vs_boss(
    registry: &mut GameRegistry,
    audio: &mut dyn AudioOut,
    projectile: Entity,
    boss: Entity,
) {
    if !registry.projectiles.get(projectile).friendly {
        return;
    }
    let dmg = registry.projectiles.get(projectile).dmg as f32;
    let stats = registry.boss_robots.get_mut(boss);
    stats.current_health -= dmg;
    let dead = stats.current_health <= 0.0;
    if dead {
        stats.should_die = true;
    }

    registry.remove_all_components_of(projectile);
    audio.play(Sound::Damage);

    if dead && !registry.death_timers.has(boss) {
        registry.death_timers.insert(boss, DeathTimer::default());
        audio.play(Sound::RobotDeath);
    }
}

/// Hostile projectile against the player: block-reflect, else armor-first
/// damage with overflow to health, plus slow status from ice shots.
fn projectile_vs_player(
    registry: &mut GameRegistry,
    audio: &mut dyn AudioOut,
    projectile: Entity,
    player: Entity,
) {
    if registry.projectiles.get(projectile).friendly {
        return;
    }

    let blocking = registry.player_animations.has(player)
        && registry.player_animations.get(player).state == PlayerState::Block;

    if blocking {
        let motion = registry.motions.get_mut(projectile);
        motion.velocity = -motion.velocity;
        motion.angle = -motion.angle;
        registry.projectiles.get_mut(projectile).friendly = true;
        audio.play(Sound::Reflect);
        return;
    }

    let proj = *registry.projectiles.get(projectile);
    let stats = registry.players.get_mut(player);

    // Armor soaks damage first; only the overflow reaches health.
    let dmg = proj.dmg;
    if stats.armor_stat >= dmg {
        stats.armor_stat -= dmg;
    } else {
        let overflow = dmg - stats.armor_stat;
        stats.armor_stat = 0;
        stats.current_health -= overflow as f32;
    }

    if proj.ice {
        stats.slow = true;
        stats.slow_count_down = ICE_SLOW_DURATION_MS;
    }

    let dead = stats.current_health <= 0.0;
    registry.remove_all_components_of(projectile);
    audio.play(Sound::Damage);

    if dead {
        start_player_death(registry, audio, player);
    }
}

/// Player touching pickups, capturable robots, or doors. Contact only arms
/// the interact prompt; nothing is taken automatically.
fn player_contact(
    registry: &mut GameRegistry,
    ui: &mut UiState,
    notifications: &mut NotificationQueue,
    audio: &mut dyn AudioOut,
    player: Entity,
    other: Entity,
) {
    let label = if registry.keys.has(other) {
        Some("Key")
    } else if registry.armor_plates.has(other) {
        Some("Armor Plate")
    } else if registry.potions.has(other) {
        Some("Health Potion")
    } else {
        None
    };

    if let Some(label) = label {
        ui.pickup_allowed = true;
        ui.pickup_candidate = Some(other);
        ui.pickup_item_label = Some(label.to_string());
        return;
    }

    if registry.robots.has(other) {
        let robot = registry.robots.get_mut(other);
        // Only a weakened robot can be captured.
        if robot.is_capturable
            && !robot.companion
            && robot.current_health <= robot.max_health * 0.5
        {
            robot.show_capture_ui = true;
            ui.show_capture_ui = true;
            ui.capture_candidate = Some(other);
        }
        return;
    }

    if registry.doors.has(other) {
        let has_key = registry.players.get(player).inventory.contains("Key");
        let door = registry.doors.get_mut(other);
        door.in_range = true;

        if door.is_open {
            return;
        }
        if door.is_locked && !has_key {
            notifications.queue_unique(
                "The door is locked. Maybe a key would help.",
                DOOR_HINT_DURATION_MS,
            );
            audio.play(Sound::DoorLocked);
        } else {
            ui.pickup_allowed = true;
            ui.pickup_candidate = Some(other);
            notifications.queue_unique("Press E to open the door.", DOOR_HINT_DURATION_MS);
        }
    }
}

// ---------------------------------------------------------------------------
// Death sequences
// ---------------------------------------------------------------------------

/// Start the player death sequence exactly once.
fn start_player_death(registry: &mut GameRegistry, audio: &mut dyn AudioOut, player: Entity) {
    if registry.death_timers.has(player) {
        return;
    }
    registry.death_timers.insert(player, DeathTimer::default());
    if registry.player_animations.has(player) {
        let anim = registry.player_animations.get_mut(player);
        let direction = anim.direction;
        anim.set_state(PlayerState::Dead, direction);
    }
    audio.play(Sound::PlayerDeath);
}

/// Start a robot death sequence exactly once.
fn start_robot_death(registry: &mut GameRegistry, audio: &mut dyn AudioOut, robot: Entity) {
    if registry.death_timers.has(robot) {
        return;
    }
    registry.death_timers.insert(robot, DeathTimer::default());
    if registry.robot_animations.has(robot) {
        let anim = registry.robot_animations.get_mut(robot);
        let direction = anim.direction;
        anim.set_state(crate::animation::RobotState::Dead, direction);
    }
    audio.play(Sound::RobotDeath);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::SpriteAnimation;
    use crate::components::{Collision, Door, Key, Motion, Player, Projectile, Robot, SpiderRobot};
    use crate::interfaces::NullAudio;
    use crate::math::Vec2;

    struct Ctx {
        registry: GameRegistry,
        ui: UiState,
        notifications: NotificationQueue,
        audio: NullAudio,
    }

    impl Ctx {
        fn new() -> Self {
            Self {
                registry: GameRegistry::new(),
                ui: UiState::default(),
                notifications: NotificationQueue::new(),
                audio: NullAudio::default(),
            }
        }

        fn resolve(&mut self) {
            CollisionSystem::resolve(
                &mut self.registry,
                &mut self.ui,
                &mut self.notifications,
                &mut self.audio,
            );
        }

        fn collide(&mut self, a: Entity, b: Entity) {
            self.registry
                .collisions
                .insert_with_duplicates(a, Collision::with(b));
            self.registry
                .collisions
                .insert_with_duplicates(b, Collision::with(a));
        }

        fn spawn_player(&mut self) -> Entity {
            let e = self.registry.create_entity();
            self.registry.players.insert(e, Player::default());
            self.registry.motions.insert(e, Motion::default());
            self.registry
                .player_animations
                .insert(e, SpriteAnimation::new());
            e
        }

        fn spawn_projectile(&mut self, dmg: i32, friendly: bool, ice: bool) -> Entity {
            let e = self.registry.create_entity();
            self.registry.projectiles.insert(
                e,
                Projectile {
                    dmg,
                    ice,
                    friendly,
                    ..Projectile::default()
                },
            );
            self.registry.motions.insert(
                e,
                Motion {
                    velocity: Vec2::new(80.0, 0.0),
                    angle: 0.5,
                    ..Motion::default()
                },
            );
            e
        }

        fn spawn_robot(&mut self) -> Entity {
            let e = self.registry.create_entity();
            self.registry.robots.insert(e, Robot::default());
            self.registry.motions.insert(e, Motion::default());
            e
        }
    }

    #[test]
    fn armor_absorbs_with_overflow_to_health() {
        let mut ctx = Ctx::new();
        let player = ctx.spawn_player();
        ctx.registry.players.get_mut(player).armor_stat = 10;
        let proj = ctx.spawn_projectile(15, false, false);

        ctx.collide(proj, player);
        ctx.resolve();

        let stats = ctx.registry.players.get(player);
        assert_eq!(stats.armor_stat, 0);
        assert_eq!(stats.current_health, 95.0);
    }

    #[test]
    fn armor_fully_soaks_smaller_hits() {
        let mut ctx = Ctx::new();
        let player = ctx.spawn_player();
        let proj = ctx.spawn_projectile(15, false, false);

        ctx.collide(proj, player);
        ctx.resolve();

        let stats = ctx.registry.players.get(player);
        assert_eq!(stats.armor_stat, 15);
        assert_eq!(stats.current_health, 100.0);
        assert!(!ctx.registry.projectiles.has(proj), "projectile destroyed");
    }

    #[test]
    fn block_reflects_instead_of_damaging() {
        let mut ctx = Ctx::new();
        let player = ctx.spawn_player();
        let anim = ctx.registry.player_animations.get_mut(player);
        anim.set_state(PlayerState::Block, crate::animation::Direction::Left);
        let proj = ctx.spawn_projectile(15, false, false);

        ctx.collide(proj, player);
        ctx.resolve();

        assert!(ctx.registry.projectiles.has(proj), "projectile survives");
        assert!(ctx.registry.projectiles.get(proj).friendly, "allegiance flipped");
        let motion = ctx.registry.motions.get(proj);
        assert_eq!(motion.velocity, Vec2::new(-80.0, 0.0));
        assert_eq!(motion.angle, -0.5);
        assert_eq!(ctx.registry.players.get(player).armor_stat, 30);
        assert!(ctx.audio.played.contains(&Sound::Reflect));
    }

    #[test]
    fn ice_projectile_applies_slow() {
        let mut ctx = Ctx::new();
        let player = ctx.spawn_player();
        let proj = ctx.spawn_projectile(5, false, true);

        ctx.collide(proj, player);
        ctx.resolve();

        let stats = ctx.registry.players.get(player);
        assert!(stats.slow);
        assert_eq!(stats.slow_count_down, ICE_SLOW_DURATION_MS);
    }

    #[test]
    fn friendly_projectile_damages_enemy_robot_only() {
        let mut ctx = Ctx::new();
        let robot = ctx.spawn_robot();
        let companion = ctx.spawn_robot();
        ctx.registry.robots.get_mut(companion).companion = true;

        let p1 = ctx.spawn_projectile(10, true, false);
        ctx.collide(p1, robot);
        let p2 = ctx.spawn_projectile(10, true, false);
        ctx.collide(p2, companion);
        ctx.resolve();

        assert_eq!(ctx.registry.robots.get(robot).current_health, 20.0);
        assert_eq!(ctx.registry.robots.get(companion).current_health, 30.0);
        assert!(!ctx.registry.projectiles.has(p1), "hit projectile destroyed");
        assert!(ctx.registry.projectiles.has(p2), "filtered projectile survives");
    }

    #[test]
    fn hostile_projectile_damages_companion_only() {
        let mut ctx = Ctx::new();
        let companion = ctx.spawn_robot();
        ctx.registry.robots.get_mut(companion).companion = true;
        let proj = ctx.spawn_projectile(10, false, false);

        ctx.collide(proj, companion);
        ctx.resolve();

        assert_eq!(ctx.registry.robots.get(companion).current_health, 20.0);
    }

    #[test]
    fn robot_dies_after_three_ten_damage_hits() {
        let mut ctx = Ctx::new();
        let robot = ctx.spawn_robot();

        for _ in 0..3 {
            let proj = ctx.spawn_projectile(10, true, false);
            ctx.collide(proj, robot);
            ctx.resolve();
        }

        let stats = ctx.registry.robots.get(robot);
        assert_eq!(stats.current_health, 0.0);
        assert!(stats.should_die);
        assert!(ctx.registry.death_timers.has(robot));
    }

    #[test]
    fn capture_ui_short_circuits_the_whole_pass() {
        let mut ctx = Ctx::new();
        let player = ctx.spawn_player();
        let shown = ctx.spawn_robot();
        {
            let robot = ctx.registry.robots.get_mut(shown);
            robot.is_capturable = true;
            robot.current_health = 10.0;
        }
        let victim = ctx.spawn_robot();

        // The capture contact is dispatched first; both projectile hits
        // after it are skipped, but the container still drains.
        ctx.collide(player, shown);
        let p1 = ctx.spawn_projectile(10, true, false);
        ctx.collide(p1, shown);
        let p2 = ctx.spawn_projectile(10, true, false);
        ctx.collide(p2, victim);
        ctx.resolve();

        assert!(ctx.ui.show_capture_ui);
        assert_eq!(ctx.ui.capture_candidate, Some(shown));
        assert_eq!(ctx.registry.robots.get(shown).current_health, 10.0);
        assert_eq!(ctx.registry.robots.get(victim).current_health, 30.0);
        assert!(ctx.registry.collisions.is_empty());
    }

    #[test]
    fn capture_immunity_ends_with_contact() {
        let mut ctx = Ctx::new();
        let player = ctx.spawn_player();
        let shown = ctx.spawn_robot();
        {
            let robot = ctx.registry.robots.get_mut(shown);
            robot.is_capturable = true;
            robot.current_health = 10.0;
        }
        ctx.collide(player, shown);
        ctx.resolve();
        assert!(ctx.registry.robots.get(shown).show_capture_ui);

        // No contact this frame: the prompt disarms and hits land again.
        let proj = ctx.spawn_projectile(5, true, false);
        ctx.collide(proj, shown);
        ctx.resolve();

        assert!(!ctx.ui.show_capture_ui);
        assert!(ctx.ui.capture_candidate.is_none());
        assert!(!ctx.registry.robots.get(shown).show_capture_ui);
        assert_eq!(ctx.registry.robots.get(shown).current_health, 5.0);
    }

    #[test]
    fn healthy_robot_does_not_offer_capture() {
        let mut ctx = Ctx::new();
        let player = ctx.spawn_player();
        let robot = ctx.spawn_robot();
        ctx.registry.robots.get_mut(robot).is_capturable = true;

        ctx.collide(player, robot);
        ctx.resolve();

        assert!(!ctx.ui.show_capture_ui);
        assert!(!ctx.registry.robots.get(robot).show_capture_ui);
    }

    #[test]
    fn spider_melee_respects_cooldown() {
        let mut ctx = Ctx::new();
        let player = ctx.spawn_player();
        let spider = ctx.registry.create_entity();
        ctx.registry.spider_robots.insert(spider, SpiderRobot::default());
        ctx.registry.motions.insert(spider, Motion::default());

        ctx.collide(spider, player);
        ctx.resolve();
        assert_eq!(ctx.registry.players.get(player).current_health, 95.0);

        // Still cooling down: second contact does nothing.
        ctx.collide(spider, player);
        ctx.resolve();
        assert_eq!(ctx.registry.players.get(player).current_health, 95.0);

        // Cooldown elapsed: hits again.
        ctx.registry.spider_robots.get_mut(spider).attack_cooldown_ms = 0.0;
        ctx.collide(spider, player);
        ctx.resolve();
        assert_eq!(ctx.registry.players.get(player).current_health, 90.0);
    }

    #[test]
    fn player_death_starts_exactly_once() {
        let mut ctx = Ctx::new();
        let player = ctx.spawn_player();
        ctx.registry.players.get_mut(player).armor_stat = 0;
        ctx.registry.players.get_mut(player).current_health = 5.0;

        let proj = ctx.spawn_projectile(10, false, false);
        ctx.collide(proj, player);
        ctx.resolve();
        assert!(ctx.registry.death_timers.has(player));
        let deaths = ctx
            .audio
            .played
            .iter()
            .filter(|s| **s == Sound::PlayerDeath)
            .count();
        assert_eq!(deaths, 1);

        // A second lethal hit while dying does not restart the sequence.
        let proj = ctx.spawn_projectile(10, false, false);
        ctx.collide(proj, player);
        ctx.resolve();
        let deaths = ctx
            .audio
            .played
            .iter()
            .filter(|s| **s == Sound::PlayerDeath)
            .count();
        assert_eq!(deaths, 1);
    }

    #[test]
    fn melee_volume_damages_overlapping_enemy_and_drains() {
        let mut ctx = Ctx::new();
        let robot = ctx.spawn_robot();
        let volume = ctx.registry.create_entity();
        ctx.registry.attack_boxes.insert(
            volume,
            crate::spawn::attack_box(Vec2::ZERO, Vec2::splat(64.0), 10, true),
        );

        ctx.resolve();

        assert_eq!(ctx.registry.robots.get(robot).current_health, 20.0);
        assert!(ctx.registry.attack_boxes.is_empty(), "volumes are one-shot");
    }

    #[test]
    fn melee_volume_spares_companions() {
        let mut ctx = Ctx::new();
        let companion = ctx.spawn_robot();
        ctx.registry.robots.get_mut(companion).companion = true;
        let volume = ctx.registry.create_entity();
        ctx.registry.attack_boxes.insert(
            volume,
            crate::spawn::attack_box(Vec2::ZERO, Vec2::splat(64.0), 10, true),
        );

        ctx.resolve();
        assert_eq!(ctx.registry.robots.get(companion).current_health, 30.0);
    }

    #[test]
    fn pickup_contact_arms_prompt_without_taking() {
        let mut ctx = Ctx::new();
        let player = ctx.spawn_player();
        let key = ctx.registry.create_entity();
        ctx.registry.keys.insert(key, Key);
        ctx.registry.motions.insert(key, Motion::default());

        ctx.collide(player, key);
        ctx.resolve();

        assert!(ctx.ui.pickup_allowed);
        assert_eq!(ctx.ui.pickup_candidate, Some(key));
        assert_eq!(ctx.ui.pickup_item_label.as_deref(), Some("Key"));
        assert!(ctx.registry.keys.has(key), "nothing auto-picked up");
        assert!(!ctx.registry.players.get(player).inventory.contains("Key"));
    }

    #[test]
    fn locked_door_queues_hint() {
        let mut ctx = Ctx::new();
        let player = ctx.spawn_player();
        let door = ctx.registry.create_entity();
        ctx.registry.doors.insert(door, Door::default());
        ctx.registry.motions.insert(door, Motion::default());

        ctx.collide(player, door);
        ctx.resolve();

        assert!(ctx.registry.doors.get(door).in_range);
        assert!(ctx.notifications.pending() > 0);
        assert!(ctx.audio.played.contains(&Sound::DoorLocked));
        assert!(!ctx.ui.pickup_allowed);
    }

    #[test]
    fn unlocked_door_arms_open_prompt() {
        let mut ctx = Ctx::new();
        let player = ctx.spawn_player();
        ctx.registry
            .players
            .get_mut(player)
            .inventory
            .add_item("Key", 1);
        let door = ctx.registry.create_entity();
        ctx.registry.doors.insert(door, Door::default());
        ctx.registry.motions.insert(door, Motion::default());

        ctx.collide(player, door);
        ctx.resolve();

        assert!(ctx.ui.pickup_allowed);
        assert_eq!(ctx.ui.pickup_candidate, Some(door));
    }
}
