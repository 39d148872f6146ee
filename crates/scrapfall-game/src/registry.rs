//! The aggregated component registry.
//!
//! One [`ComponentContainer`] per component type, plus the entity allocator.
//! Object identity is implicit in the union of an entity's components, so
//! [`GameRegistry::remove_all_components_of`] is the only sanctioned way to
//! destroy a game object. Every container is reached through the single
//! [`visit_containers`](GameRegistry::visit_containers) list, so a container
//! cannot be registered for one cross-cutting sweep but forgotten by the
//! other.

use scrapfall_ecs::container::ComponentContainer;
use scrapfall_ecs::entity::{Entity, EntityAllocator};
use scrapfall_ecs::registry::ContainerOps;

use crate::animation::{
    BossRobotState, DoorAnimation, IceRobotState, PlayerState, RobotState, SpiderRobotState,
    SpriteAnimation,
};
use crate::components::{
    ArmorPlate, AttackBox, Boid, BossProjectile, BossRobot, Collision, Color, DeathTimer, Door,
    Key, Motion, Notification, Particle, Player, Potion, Projectile, RenderRequest, Robot,
    ScreenState, SpiderRobot, Spaceship, Tile, TileMap, TileSetComponent,
};

// ---------------------------------------------------------------------------
// GameRegistry
// ---------------------------------------------------------------------------

/// Every component container the game has, in one place.
#[derive(Default)]
pub struct GameRegistry {
    allocator: EntityAllocator,

    pub death_timers: ComponentContainer<DeathTimer>,
    pub motions: ComponentContainer<Motion>,
    pub collisions: ComponentContainer<Collision>,
    pub players: ComponentContainer<Player>,
    pub player_animations: ComponentContainer<SpriteAnimation<PlayerState>>,
    pub robot_animations: ComponentContainer<SpriteAnimation<RobotState>>,
    pub ice_robot_animations: ComponentContainer<SpriteAnimation<IceRobotState>>,
    pub boss_robot_animations: ComponentContainer<SpriteAnimation<BossRobotState>>,
    pub spider_robot_animations: ComponentContainer<SpriteAnimation<SpiderRobotState>>,
    pub door_animations: ComponentContainer<DoorAnimation>,
    pub doors: ComponentContainer<Door>,
    pub render_requests: ComponentContainer<RenderRequest>,
    pub screen_states: ComponentContainer<ScreenState>,
    pub robots: ComponentContainer<Robot>,
    pub boss_robots: ComponentContainer<BossRobot>,
    pub spider_robots: ComponentContainer<SpiderRobot>,
    pub boids: ComponentContainer<Boid>,
    pub tiles: ComponentContainer<Tile>,
    pub tilesets: ComponentContainer<TileSetComponent>,
    pub maps: ComponentContainer<TileMap>,
    pub keys: ComponentContainer<Key>,
    pub armor_plates: ComponentContainer<ArmorPlate>,
    pub potions: ComponentContainer<Potion>,
    pub particles: ComponentContainer<Particle>,
    pub colors: ComponentContainer<Color>,
    pub notifications: ComponentContainer<Notification>,
    pub attack_boxes: ComponentContainer<AttackBox>,
    pub spaceships: ComponentContainer<Spaceship>,
    pub projectiles: ComponentContainer<Projectile>,
    pub boss_projectiles: ComponentContainer<BossProjectile>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh entity handle. Identifiers are strictly increasing and
    /// never reused for the lifetime of the process.
    pub fn create_entity(&mut self) -> Entity {
        self.allocator.allocate()
    }

    /// The entity allocator (save/load needs its counter).
    pub fn allocator(&self) -> &EntityAllocator {
        &self.allocator
    }

    pub fn allocator_mut(&mut self) -> &mut EntityAllocator {
        &mut self.allocator
    }

    /// Visit every container exactly once. Both cross-cutting operations and
    /// the debug listing go through this list.
    fn visit_containers(&mut self, mut f: impl FnMut(&mut dyn ContainerOps)) {
        f(&mut self.death_timers);
        f(&mut self.motions);
        f(&mut self.collisions);
        f(&mut self.players);
        f(&mut self.player_animations);
        f(&mut self.robot_animations);
        f(&mut self.ice_robot_animations);
        f(&mut self.boss_robot_animations);
        f(&mut self.spider_robot_animations);
        f(&mut self.door_animations);
        f(&mut self.doors);
        f(&mut self.render_requests);
        f(&mut self.screen_states);
        f(&mut self.robots);
        f(&mut self.boss_robots);
        f(&mut self.spider_robots);
        f(&mut self.boids);
        f(&mut self.tiles);
        f(&mut self.tilesets);
        f(&mut self.maps);
        f(&mut self.keys);
        f(&mut self.armor_plates);
        f(&mut self.potions);
        f(&mut self.particles);
        f(&mut self.colors);
        f(&mut self.notifications);
        f(&mut self.attack_boxes);
        f(&mut self.spaceships);
        f(&mut self.projectiles);
        f(&mut self.boss_projectiles);
    }

    /// Remove the entity from every container it appears in. Total: never
    /// fails regardless of which subset of containers holds the entity.
    pub fn remove_all_components_of(&mut self, entity: Entity) {
        self.visit_containers(|c| c.remove(entity));
    }

    /// Wipe every container. Used on full game restart.
    pub fn clear_all_components(&mut self) {
        self.visit_containers(|c| c.clear());
    }

    /// Log a summary of all non-empty containers.
    pub fn list_all_components(&mut self) {
        self.visit_containers(|c| {
            if !c.is_empty() {
                tracing::debug!(count = c.len(), component = c.type_name(), "registry entry");
            }
        });
    }

    /// Whether any container still holds a component for `entity`.
    pub fn any_component_of(&mut self, entity: Entity) -> bool {
        let mut found = false;
        self.visit_containers(|c| found |= c.has(entity));
        found
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_all_components_of_sweeps_every_container() {
        let mut reg = GameRegistry::new();
        let e = reg.create_entity();
        reg.motions.insert(e, Motion::default());
        reg.robots.insert(e, Robot::default());
        reg.boids.insert(e, Boid::default());
        reg.render_requests.insert(
            e,
            RenderRequest {
                used_texture: crate::components::TextureAssetId::Robot,
                used_effect: crate::components::EffectAssetId::Textured,
                used_geometry: crate::components::GeometryId::Sprite,
            },
        );

        reg.remove_all_components_of(e);
        assert!(!reg.any_component_of(e));
    }

    #[test]
    fn remove_all_is_total_for_sparse_entities() {
        let mut reg = GameRegistry::new();
        let e = reg.create_entity();
        // Entity present in exactly one container.
        reg.keys.insert(e, Key);
        reg.remove_all_components_of(e);
        assert!(!reg.keys.has(e));

        // Entity present in none: still fine.
        let ghost = reg.create_entity();
        reg.remove_all_components_of(ghost);
    }

    #[test]
    fn clear_all_components_wipes_everything() {
        let mut reg = GameRegistry::new();
        for _ in 0..5 {
            let e = reg.create_entity();
            reg.motions.insert(e, Motion::default());
            reg.tiles.insert(
                e,
                Tile {
                    tileset_id: 0,
                    tile_id: 1,
                    walkable: true,
                    atlas: crate::components::TextureAssetId::TileAtlas,
                },
            );
        }
        reg.clear_all_components();
        assert!(reg.motions.is_empty());
        assert!(reg.tiles.is_empty());
    }
}
