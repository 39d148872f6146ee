//! Tutorial sequencing and user-facing notifications.
//!
//! The tutorial is a poll-based finite-state machine: every tick it
//! inspects world predicates (has the player moved? what does the
//! inventory hold? is the message queue drained?) and advances when the
//! current stage's exit condition holds. Nothing pushes events at it.
//!
//! Notifications are the only user-visible channel for gameplay soft
//! failures and narrative text: a FIFO queue feeding one active message
//! with a duration countdown.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::components::Notification;
use crate::math::Vec2;
use crate::registry::GameRegistry;

/// Default on-screen time for tutorial messages, ms.
const TUTORIAL_MESSAGE_MS: f32 = 4000.0;

/// How far from the spaceship counts as "left it", px.
const LEAVE_SPACESHIP_DISTANCE: f32 = 250.0;

/// Robot parts needed to finish the parts stage.
const ROBOT_PARTS_GOAL: u32 = 5;

// ---------------------------------------------------------------------------
// NotificationQueue
// ---------------------------------------------------------------------------

/// FIFO message queue plus the currently displayed message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationQueue {
    queue: VecDeque<Notification>,
    active: Option<Notification>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&mut self, text: impl Into<String>, duration_ms: f32) {
        self.queue.push_back(Notification::new(text, duration_ms));
    }

    /// Queue unless the same text is already active or waiting. Contact
    /// hints fire every frame; this keeps them from stacking.
    pub fn queue_unique(&mut self, text: &str, duration_ms: f32) {
        let already = self.active.as_ref().is_some_and(|n| n.text == text)
            || self.queue.iter().any(|n| n.text == text);
        if !already {
            self.queue(text, duration_ms);
        }
    }

    /// Count down the active message and promote the next when it expires.
    pub fn step(&mut self, elapsed_ms: f32) {
        if let Some(active) = &mut self.active {
            active.duration_ms -= elapsed_ms;
            if active.duration_ms <= 0.0 {
                self.active = None;
            }
        }
        if self.active.is_none() {
            self.active = self.queue.pop_front();
        }
    }

    /// The message currently on screen.
    pub fn active(&self) -> Option<&Notification> {
        self.active.as_ref()
    }

    /// Queue and active slot both drained.
    pub fn is_idle(&self) -> bool {
        self.active.is_none() && self.queue.is_empty()
    }

    /// Messages still waiting or showing.
    pub fn pending(&self) -> usize {
        self.queue.len() + usize::from(self.active.is_some())
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.active = None;
    }
}

// ---------------------------------------------------------------------------
// Tutorial state machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TutorialState {
    Intro,
    Movement,
    Exploration,
    LeaveSpaceshipHint,
    AttackHint,
    RobotPartsHint,
    Completed,
}

/// Poll-driven tutorial sequencer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorialSystem {
    state: TutorialState,
    stage_announced: bool,

    has_moved: bool,
    picked_key: bool,
    picked_armor: bool,
    picked_potion: bool,
    inventory_was_open: bool,
    inventory_cycle_done: bool,
}

impl TutorialSystem {
    pub fn new() -> Self {
        Self {
            state: TutorialState::Intro,
            stage_announced: false,
            has_moved: false,
            picked_key: false,
            picked_armor: false,
            picked_potion: false,
            inventory_was_open: false,
            inventory_cycle_done: false,
        }
    }

    pub fn state(&self) -> TutorialState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == TutorialState::Completed
    }

    /// Restore a saved sequencer position. The first-time flags are
    /// re-derived from the restored world so hints for things the player
    /// already did are not replayed.
    pub fn restore(state: TutorialState, registry: &GameRegistry) -> Self {
        let mut restored = Self {
            state,
            has_moved: !matches!(state, TutorialState::Intro | TutorialState::Movement),
            ..Self::new()
        };
        if let Some(&player) = registry.players.entities().first() {
            let inventory = &registry.players.get(player).inventory;
            restored.picked_key = inventory.contains("Key");
            restored.picked_armor = inventory.contains("Armor Plate");
            restored.picked_potion = inventory.contains("Health Potion");
        }
        restored
    }

    /// Poll the world and advance at most one stage.
    pub fn step(&mut self, registry: &GameRegistry, notifications: &mut NotificationQueue) {
        self.poll_flags(registry, notifications);

        if !self.stage_announced {
            if let Some(text) = stage_message(self.state) {
                notifications.queue_unique(text, TUTORIAL_MESSAGE_MS);
            }
            self.stage_announced = true;
        }

        let advance = match self.state {
            TutorialState::Intro => notifications.is_idle(),
            TutorialState::Movement => self.has_moved,
            TutorialState::Exploration => {
                (self.picked_key || self.picked_armor || self.picked_potion)
                    && notifications.is_idle()
            }
            TutorialState::LeaveSpaceshipHint => player_left_spaceship(registry),
            TutorialState::AttackHint => player_attacked(registry),
            TutorialState::RobotPartsHint => robot_parts_collected(registry) >= ROBOT_PARTS_GOAL,
            TutorialState::Completed => false,
        };

        if advance {
            self.state = next_state(self.state);
            self.stage_announced = false;
        }
    }

    /// First-time triggers that fire independently of the stage sequence.
    fn poll_flags(&mut self, registry: &GameRegistry, notifications: &mut NotificationQueue) {
        let Some(&player) = registry.players.entities().first() else {
            return;
        };

        if !self.has_moved
            && registry.motions.has(player)
            && registry.motions.get(player).velocity != Vec2::ZERO
        {
            self.has_moved = true;
        }

        let inventory = &registry.players.get(player).inventory;

        for (flag, item, text) in [
            (
                &mut self.picked_key,
                "Key",
                "You found a key. Locked doors are no longer a problem.",
            ),
            (
                &mut self.picked_armor,
                "Armor Plate",
                "Armor plates absorb damage before your health does.",
            ),
            (
                &mut self.picked_potion,
                "Health Potion",
                "Health potions restore you. Use them from the inventory.",
            ),
        ] {
            if !*flag && inventory.contains(item) {
                *flag = true;
                notifications.queue_unique(text, TUTORIAL_MESSAGE_MS);
            }
        }

        // First full open-then-close cycle of the inventory.
        if !self.inventory_cycle_done {
            if inventory.is_open {
                self.inventory_was_open = true;
            } else if self.inventory_was_open {
                self.inventory_cycle_done = true;
                notifications.queue_unique(
                    "Drag items between slots to equip weapons and armor.",
                    TUTORIAL_MESSAGE_MS,
                );
            }
        }
    }
}

impl Default for TutorialSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn next_state(state: TutorialState) -> TutorialState {
    match state {
        TutorialState::Intro => TutorialState::Movement,
        TutorialState::Movement => TutorialState::Exploration,
        TutorialState::Exploration => TutorialState::LeaveSpaceshipHint,
        TutorialState::LeaveSpaceshipHint => TutorialState::AttackHint,
        TutorialState::AttackHint => TutorialState::RobotPartsHint,
        TutorialState::RobotPartsHint | TutorialState::Completed => TutorialState::Completed,
    }
}

fn stage_message(state: TutorialState) -> Option<&'static str> {
    match state {
        TutorialState::Intro => {
            Some("You crash-landed on a scrapyard planet. Find parts to repair your ship.")
        }
        TutorialState::Movement => Some("Use WASD to move."),
        TutorialState::Exploration => Some("Explore the wreck. Pick up anything useful with E."),
        TutorialState::LeaveSpaceshipHint => Some("Head outside and leave the spaceship."),
        TutorialState::AttackHint => Some("Robots roam out here. Attack with the left mouse button."),
        TutorialState::RobotPartsHint => {
            Some("Collect five robot parts to repair your ship.")
        }
        TutorialState::Completed => None,
    }
}

// ---------------------------------------------------------------------------
// World predicates
// ---------------------------------------------------------------------------

fn player_left_spaceship(registry: &GameRegistry) -> bool {
    let Some(&player) = registry.players.entities().first() else {
        return false;
    };
    let Some(&ship) = registry.spaceships.entities().first() else {
        // No spaceship in this level: the stage cannot hold the player.
        return true;
    };
    if !registry.motions.has(player) || !registry.motions.has(ship) {
        return true;
    }
    let player_pos = registry.motions.get(player).position;
    let ship_pos = registry.motions.get(ship).position;
    player_pos.distance(ship_pos) > LEAVE_SPACESHIP_DISTANCE
}

fn player_attacked(registry: &GameRegistry) -> bool {
    use crate::animation::PlayerState;
    let Some(&player) = registry.players.entities().first() else {
        return false;
    };
    registry.player_animations.has(player)
        && matches!(
            registry.player_animations.get(player).state,
            PlayerState::Attack | PlayerState::Second | PlayerState::Proj
        )
}

fn robot_parts_collected(registry: &GameRegistry) -> u32 {
    registry
        .players
        .entities()
        .first()
        .map(|&p| registry.players.get(p).inventory.quantity_of("Robot Part"))
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Direction, PlayerState, SpriteAnimation};
    use crate::components::{Motion, Player, Spaceship};
    use scrapfall_ecs::entity::Entity;

    fn world_with_player() -> (GameRegistry, Entity) {
        let mut reg = GameRegistry::new();
        let player = reg.create_entity();
        reg.players.insert(player, Player::default());
        reg.motions.insert(player, Motion::default());
        reg.player_animations.insert(player, SpriteAnimation::new());
        (reg, player)
    }

    /// Run the queue long enough to drain everything queued so far.
    fn drain(notifications: &mut NotificationQueue) {
        for _ in 0..64 {
            notifications.step(TUTORIAL_MESSAGE_MS + 1.0);
        }
        assert!(notifications.is_idle());
    }

    #[test]
    fn queue_promotes_messages_in_order() {
        let mut q = NotificationQueue::new();
        q.queue("first", 100.0);
        q.queue("second", 100.0);
        assert!(q.active().is_none());

        q.step(16.0);
        assert_eq!(q.active().map(|n| n.text.as_str()), Some("first"));

        q.step(200.0);
        assert_eq!(q.active().map(|n| n.text.as_str()), Some("second"));

        q.step(200.0);
        assert!(q.is_idle());
    }

    #[test]
    fn queue_unique_deduplicates_repeated_hints() {
        let mut q = NotificationQueue::new();
        q.queue_unique("hint", 100.0);
        q.queue_unique("hint", 100.0);
        assert_eq!(q.pending(), 1);

        q.step(16.0);
        // Active message also blocks re-queueing.
        q.queue_unique("hint", 100.0);
        assert_eq!(q.pending(), 1);
    }

    #[test]
    fn full_tutorial_walkthrough() {
        let (mut reg, player) = world_with_player();
        let mut notifications = NotificationQueue::new();
        let mut tutorial = TutorialSystem::new();

        // Intro waits for the queue to drain.
        tutorial.step(&reg, &mut notifications);
        assert_eq!(tutorial.state(), TutorialState::Intro);
        drain(&mut notifications);
        tutorial.step(&reg, &mut notifications);
        assert_eq!(tutorial.state(), TutorialState::Movement);

        // Movement advances once the player actually moves.
        tutorial.step(&reg, &mut notifications);
        assert_eq!(tutorial.state(), TutorialState::Movement);
        reg.motions.get_mut(player).velocity = Vec2::new(100.0, 0.0);
        tutorial.step(&reg, &mut notifications);
        assert_eq!(tutorial.state(), TutorialState::Exploration);

        // Exploration advances on a first pickup with a drained queue.
        reg.players.get_mut(player).inventory.add_item("Key", 1);
        drain(&mut notifications);
        tutorial.step(&reg, &mut notifications);
        drain(&mut notifications);
        tutorial.step(&reg, &mut notifications);
        assert_eq!(tutorial.state(), TutorialState::LeaveSpaceshipHint);

        // Spaceship stage holds until the player walks away.
        let ship = reg.create_entity();
        reg.spaceships.insert(ship, Spaceship);
        reg.motions.insert(ship, Motion::default());
        reg.motions.get_mut(player).position = Vec2::new(10.0, 10.0);
        tutorial.step(&reg, &mut notifications);
        assert_eq!(tutorial.state(), TutorialState::LeaveSpaceshipHint);
        reg.motions.get_mut(player).position = Vec2::new(600.0, 600.0);
        tutorial.step(&reg, &mut notifications);
        assert_eq!(tutorial.state(), TutorialState::AttackHint);

        // Attack stage advances on the first attack animation.
        tutorial.step(&reg, &mut notifications);
        assert_eq!(tutorial.state(), TutorialState::AttackHint);
        reg.player_animations
            .get_mut(player)
            .set_state(PlayerState::Attack, Direction::Right);
        tutorial.step(&reg, &mut notifications);
        assert_eq!(tutorial.state(), TutorialState::RobotPartsHint);

        // Parts stage needs five robot parts.
        reg.players
            .get_mut(player)
            .inventory
            .add_item("Robot Part", 4);
        tutorial.step(&reg, &mut notifications);
        assert_eq!(tutorial.state(), TutorialState::RobotPartsHint);
        reg.players
            .get_mut(player)
            .inventory
            .add_item("Robot Part", 1);
        tutorial.step(&reg, &mut notifications);
        assert_eq!(tutorial.state(), TutorialState::Completed);
        assert!(tutorial.is_complete());
    }

    #[test]
    fn restore_does_not_replay_pickup_hints() {
        let (mut reg, player) = world_with_player();
        reg.players.get_mut(player).inventory.add_item("Key", 1);
        let mut notifications = NotificationQueue::new();
        let mut tutorial = TutorialSystem::restore(TutorialState::Exploration, &reg);

        tutorial.step(&reg, &mut notifications);

        // Only the stage announcement may queue; the key hint already
        // fired before the save.
        assert_eq!(notifications.pending(), 1);
    }

    #[test]
    fn first_pickup_of_each_kind_notifies_once() {
        let (mut reg, player) = world_with_player();
        let mut notifications = NotificationQueue::new();
        let mut tutorial = TutorialSystem::new();

        reg.players.get_mut(player).inventory.add_item("Key", 1);
        tutorial.step(&reg, &mut notifications);
        let after_first = notifications.pending();

        tutorial.step(&reg, &mut notifications);
        assert_eq!(notifications.pending(), after_first, "no duplicate on re-poll");
    }

    #[test]
    fn inventory_open_close_cycle_notifies() {
        let (mut reg, player) = world_with_player();
        let mut notifications = NotificationQueue::new();
        let mut tutorial = TutorialSystem::new();
        drain(&mut notifications);

        reg.players.get_mut(player).inventory.is_open = true;
        tutorial.step(&reg, &mut notifications);
        reg.players.get_mut(player).inventory.is_open = false;
        let before = notifications.pending();
        tutorial.step(&reg, &mut notifications);
        assert!(notifications.pending() > before);
    }
}
