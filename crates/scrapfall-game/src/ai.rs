//! Steering and flocking for autonomous agents.
//!
//! Every entity carrying a [`Boid`](crate::components::Boid) component gets
//! one acceleration per tick, built from the classic separation, alignment
//! and cohesion forces. When the flock forces are weak the agent blends in
//! either a chase-the-player force or a wander force. The result is
//! integrated into the entity's velocity and clamped into a speed band so
//! agents never stall and never overshoot.

use rand::Rng;
use rand_pcg::Pcg64;
use scrapfall_ecs::entity::Entity;

use crate::math::Vec2;
use crate::registry::GameRegistry;

/// Flock forces below this fraction of `max_force` open the chase/wander
/// blend.
const FLOCK_GATE: f32 = 0.7;
/// Chase magnitudes below this are treated as "player out of influence".
const CHASE_EPSILON: f32 = 0.1;
/// Per-tick angular jitter applied to the wander heading.
const WANDER_JITTER: f32 = 0.5;
/// Radius of the wander steering circle.
const WANDER_RADIUS: f32 = 50.0;
/// Magnitude of the produced wander force.
const WANDER_SPEED: f32 = 40.0;
/// Weight of the wander force in the blend.
const WANDER_BLEND: f32 = 0.8;

// ---------------------------------------------------------------------------
// AiSystem
// ---------------------------------------------------------------------------

/// Per-tick steering pass over all Boid-tagged entities.
pub struct AiSystem {
    /// Shared wander heading. Deliberately one angle for the whole flock,
    /// not per-agent: every wandering agent drifts in loose unison.
    wander_angle: f32,
    rng: Pcg64,
}

impl AiSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            wander_angle: 0.0,
            rng: Pcg64::new(seed as u128, 0xa02bdbf7bb3c0a7),
        }
    }

    /// Compute and integrate one acceleration per Boid entity.
    pub fn step(&mut self, registry: &mut GameRegistry, elapsed_ms: f32) {
        let dt = elapsed_ms / 1000.0;
        let agents: Vec<Entity> = registry.boids.entities().to_vec();

        for entity in agents {
            let boid = registry.boids.get(entity).clone();

            let separation = calculate_separation(registry, entity) * boid.separation_weight;
            let alignment = calculate_alignment(registry, entity) * boid.alignment_weight;
            let cohesion = calculate_cohesion(registry, entity) * boid.cohesion_weight;

            let flocking = separation + alignment + cohesion;
            let mut acceleration = flocking;

            if flocking.length() < boid.max_force * FLOCK_GATE {
                let chase = chase_player(registry, entity) * boid.chase_weight;
                let wander = self.calculate_wander(registry, entity) * WANDER_BLEND;

                if chase.length() < CHASE_EPSILON {
                    acceleration += wander;
                } else {
                    acceleration += chase;
                }
            }

            let motion = registry.motions.get_mut(entity);
            motion.velocity += acceleration * dt;

            let speed = motion.velocity.length();
            if speed < boid.max_speed * 0.5 {
                motion.velocity = motion.velocity.normalize() * (boid.max_speed * 0.5);
            } else if speed > boid.max_speed {
                motion.velocity = motion.velocity.normalize() * boid.max_speed;
            }

            motion.target_velocity = motion.velocity;
        }
    }

    /// Random-walk heading producing a circle-tangent force.
    fn calculate_wander(&mut self, registry: &GameRegistry, entity: Entity) -> Vec2 {
        let motion = registry.motions.get(entity);

        self.wander_angle += (self.rng.gen::<f32>() - 0.5) * WANDER_JITTER;

        let circle_center = motion.velocity.normalize();
        let displacement =
            Vec2::new(self.wander_angle.cos(), self.wander_angle.sin()) * WANDER_RADIUS;

        (circle_center + displacement).normalize() * WANDER_SPEED
    }
}

// ---------------------------------------------------------------------------
// Forces
// ---------------------------------------------------------------------------

/// Push away from neighbors closer than `avoid_radius`, weighted inversely
/// by distance. Steering is clamped to `max_force`.
fn calculate_separation(registry: &GameRegistry, entity: Entity) -> Vec2 {
    let entity_motion = registry.motions.get(entity);
    let boid = registry.boids.get(entity);
    let mut steering = Vec2::ZERO;
    let mut count = 0;

    for &other in registry.boids.entities() {
        if other == entity {
            continue;
        }
        let other_motion = registry.motions.get(other);
        let d = (other_motion.position - entity_motion.position).length();
        if d > 0.0 && d < boid.avoid_radius {
            let diff = (entity_motion.position - other_motion.position).normalize() / d;
            steering += diff;
            count += 1;
        }
    }

    if count > 0 {
        steering /= count as f32;
        if steering.length() > 0.0 {
            steering = steering.normalize() * boid.max_speed;
            steering -= entity_motion.velocity;
            if steering.length() > boid.max_force {
                steering = steering.normalize() * boid.max_force;
            }
        }
    }
    steering
}

/// Steer toward the average velocity of neighbors within `search_radius`.
fn calculate_alignment(registry: &GameRegistry, entity: Entity) -> Vec2 {
    let entity_motion = registry.motions.get(entity);
    let boid = registry.boids.get(entity);
    let mut steering = Vec2::ZERO;
    let mut count = 0;

    for &other in registry.boids.entities() {
        if other == entity {
            continue;
        }
        let other_motion = registry.motions.get(other);
        let d = (other_motion.position - entity_motion.position).length();
        if d > 0.0 && d < boid.search_radius {
            steering += other_motion.velocity;
            count += 1;
        }
    }

    if count > 0 {
        steering /= count as f32;
        steering = steering.normalize() * boid.max_speed;
        steering -= entity_motion.velocity;
        if steering.length() > boid.max_force {
            steering = steering.normalize() * boid.max_force;
        }
    }
    steering
}

/// Steer toward the perceived center of mass of neighbors within
/// `search_radius`.
fn calculate_cohesion(registry: &GameRegistry, entity: Entity) -> Vec2 {
    let entity_motion = registry.motions.get(entity);
    let boid = registry.boids.get(entity);
    let mut center = Vec2::ZERO;
    let mut count = 0;

    for &other in registry.boids.entities() {
        if other == entity {
            continue;
        }
        let other_motion = registry.motions.get(other);
        let d = (other_motion.position - entity_motion.position).length();
        if d > 0.0 && d < boid.search_radius {
            center += other_motion.position;
            count += 1;
        }
    }

    if count > 0 {
        center /= count as f32;
        let desired = (center - entity_motion.position).normalize() * boid.max_speed;
        let mut steering = desired - entity_motion.velocity;
        if steering.length() > boid.max_force {
            steering = steering.normalize() * boid.max_force;
        }
        return steering;
    }
    Vec2::ZERO
}

/// Steer toward the player, or away from them when inside `attack_radius`
/// (retreat-to-range). Zero when no player exists.
fn chase_player(registry: &GameRegistry, entity: Entity) -> Vec2 {
    let Some(&player) = registry.players.entities().first() else {
        return Vec2::ZERO;
    };

    let entity_motion = registry.motions.get(entity);
    let boid = registry.boids.get(entity);
    let player_motion = registry.motions.get(player);

    let to_player = player_motion.position - entity_motion.position;
    let dist = to_player.length();

    if dist < boid.attack_radius {
        (-to_player).normalize() * boid.max_speed - entity_motion.velocity
    } else {
        to_player.normalize() * boid.max_speed - entity_motion.velocity
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Boid, Motion, Player};

    fn spawn_boid(reg: &mut GameRegistry, position: Vec2, velocity: Vec2) -> Entity {
        let e = reg.create_entity();
        reg.motions.insert(
            e,
            Motion {
                position,
                velocity,
                ..Motion::default()
            },
        );
        reg.boids.insert(e, Boid::default());
        e
    }

    #[test]
    fn separation_is_clamped_to_max_force() {
        let mut reg = GameRegistry::new();
        // Tight cluster with wild velocities to maximize raw steering.
        let a = spawn_boid(&mut reg, Vec2::new(0.0, 0.0), Vec2::new(-400.0, 300.0));
        for i in 1..6 {
            spawn_boid(&mut reg, Vec2::new(i as f32, 0.5), Vec2::ZERO);
        }

        let force = calculate_separation(&reg, a);
        let max_force = reg.boids.get(a).max_force;
        assert!(force.length() <= max_force + 1e-3);
    }

    #[test]
    fn alignment_and_cohesion_are_clamped_to_max_force() {
        let mut reg = GameRegistry::new();
        let a = spawn_boid(&mut reg, Vec2::ZERO, Vec2::new(500.0, -500.0));
        spawn_boid(&mut reg, Vec2::new(40.0, 0.0), Vec2::new(-300.0, 300.0));
        spawn_boid(&mut reg, Vec2::new(0.0, 40.0), Vec2::new(300.0, -300.0));

        let max_force = reg.boids.get(a).max_force;
        assert!(calculate_alignment(&reg, a).length() <= max_force + 1e-3);
        assert!(calculate_cohesion(&reg, a).length() <= max_force + 1e-3);
    }

    #[test]
    fn lone_agent_gets_no_flock_forces() {
        let mut reg = GameRegistry::new();
        let a = spawn_boid(&mut reg, Vec2::ZERO, Vec2::new(10.0, 0.0));
        assert_eq!(calculate_separation(&reg, a), Vec2::ZERO);
        assert_eq!(calculate_alignment(&reg, a), Vec2::ZERO);
        assert_eq!(calculate_cohesion(&reg, a), Vec2::ZERO);
    }

    #[test]
    fn chase_is_zero_without_a_player() {
        let mut reg = GameRegistry::new();
        let a = spawn_boid(&mut reg, Vec2::ZERO, Vec2::ZERO);
        assert_eq!(chase_player(&reg, a), Vec2::ZERO);
    }

    #[test]
    fn chase_retreats_inside_attack_radius() {
        let mut reg = GameRegistry::new();
        let a = spawn_boid(&mut reg, Vec2::ZERO, Vec2::ZERO);
        let player = reg.create_entity();
        reg.players.insert(player, Player::default());

        // Player just inside attack_radius (80): force points away.
        reg.motions.insert(
            player,
            Motion {
                position: Vec2::new(40.0, 0.0),
                ..Motion::default()
            },
        );
        let retreat = chase_player(&reg, a);
        assert!(retreat.x < 0.0, "agent should back away, got {retreat:?}");

        // Player outside attack_radius: force points toward.
        reg.motions.get_mut(player).position = Vec2::new(400.0, 0.0);
        let approach = chase_player(&reg, a);
        assert!(approach.x > 0.0, "agent should approach, got {approach:?}");
    }

    #[test]
    fn integrated_speed_stays_in_band() {
        let mut reg = GameRegistry::new();
        let mut ai = AiSystem::new(7);
        let slow = spawn_boid(&mut reg, Vec2::ZERO, Vec2::new(1.0, 0.0));
        let fast = spawn_boid(&mut reg, Vec2::new(500.0, 500.0), Vec2::new(900.0, 0.0));

        for _ in 0..10 {
            ai.step(&mut reg, 16.0);
        }

        for e in [slow, fast] {
            let boid = reg.boids.get(e).clone();
            let speed = reg.motions.get(e).velocity.length();
            assert!(
                speed >= boid.max_speed * 0.5 - 1e-3 && speed <= boid.max_speed + 1e-3,
                "speed {speed} outside band for max_speed {}",
                boid.max_speed
            );
        }
    }

    #[test]
    fn step_mirrors_velocity_into_target_velocity() {
        let mut reg = GameRegistry::new();
        let mut ai = AiSystem::new(1);
        let a = spawn_boid(&mut reg, Vec2::ZERO, Vec2::new(5.0, 5.0));
        ai.step(&mut reg, 16.0);
        let motion = reg.motions.get(a);
        assert_eq!(motion.velocity, motion.target_velocity);
    }

    #[test]
    fn seeded_runs_are_deterministic() {
        let run = |seed| {
            let mut reg = GameRegistry::new();
            let mut ai = AiSystem::new(seed);
            let a = spawn_boid(&mut reg, Vec2::ZERO, Vec2::new(10.0, 0.0));
            for _ in 0..20 {
                ai.step(&mut reg, 16.0);
            }
            reg.motions.get(a).velocity
        };
        assert_eq!(run(42), run(42));
    }
}
