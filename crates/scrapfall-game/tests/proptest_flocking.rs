//! Property tests for the steering pass.
//!
//! Two invariants hold for every reachable agent configuration: each
//! post-integration speed sits inside the `[0.5 * max_speed, max_speed]`
//! band, and no amount of stepping produces NaN positions or velocities.

use proptest::prelude::*;

use scrapfall_game::ai::AiSystem;
use scrapfall_game::components::{Boid, Motion, Player};
use scrapfall_game::math::Vec2;
use scrapfall_game::registry::GameRegistry;

#[derive(Debug, Clone)]
struct Agent {
    position: Vec2,
    velocity: Vec2,
}

fn agent_strategy() -> impl Strategy<Value = Agent> {
    (
        -1000.0f32..1000.0,
        -1000.0f32..1000.0,
        -300.0f32..300.0,
        -300.0f32..300.0,
    )
        .prop_map(|(px, py, vx, vy)| Agent {
            position: Vec2::new(px, py),
            velocity: Vec2::new(vx, vy),
        })
}

fn build_flock(agents: &[Agent], with_player: bool) -> GameRegistry {
    let mut registry = GameRegistry::new();
    for agent in agents {
        let e = registry.create_entity();
        registry.motions.insert(
            e,
            Motion {
                position: agent.position,
                velocity: agent.velocity,
                ..Motion::default()
            },
        );
        registry.boids.insert(e, Boid::default());
    }
    if with_player {
        let p = registry.create_entity();
        registry.players.insert(p, Player::default());
        registry.motions.insert(p, Motion::default());
    }
    registry
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn speed_stays_in_band_after_integration(
        agents in proptest::collection::vec(agent_strategy(), 1..12),
        with_player in any::<bool>(),
        seed in any::<u64>(),
        ticks in 1usize..20,
    ) {
        let mut registry = build_flock(&agents, with_player);
        let mut ai = AiSystem::new(seed);

        for _ in 0..ticks {
            ai.step(&mut registry, 16.0);
        }

        for (entity, boid) in registry.boids.iter() {
            let motion = registry.motions.get(entity);
            let speed = motion.velocity.length();
            prop_assert!(
                speed >= boid.max_speed * 0.5 - 1e-3,
                "agent {entity} too slow: {speed}"
            );
            prop_assert!(
                speed <= boid.max_speed + 1e-3,
                "agent {entity} too fast: {speed}"
            );
            prop_assert!(motion.velocity.x.is_finite() && motion.velocity.y.is_finite());
            prop_assert_eq!(motion.velocity, motion.target_velocity);
        }
    }

    #[test]
    fn stepping_never_produces_nan(
        agents in proptest::collection::vec(agent_strategy(), 0..8),
        seed in any::<u64>(),
    ) {
        let mut registry = build_flock(&agents, true);
        let mut ai = AiSystem::new(seed);
        for _ in 0..50 {
            ai.step(&mut registry, 16.0);
        }
        for (_, motion) in registry.motions.iter() {
            prop_assert!(motion.position.x.is_finite());
            prop_assert!(motion.position.y.is_finite());
            prop_assert!(motion.velocity.x.is_finite());
            prop_assert!(motion.velocity.y.is_finite());
        }
    }
}
