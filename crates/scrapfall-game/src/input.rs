//! Input translation and gating.
//!
//! The platform layer forwards raw key and mouse events; everything else
//! (debouncing, modal gating, the explicit interact path) lives here. The
//! simulation exposes no polling interface.

use crate::animation::{Direction, PlayerState};
use crate::interfaces::{AudioOut, Sound};
use crate::inventory::BASE_SLOTS;
use crate::math::Vec2;
use crate::spawn;
use crate::world::{direction_of, WorldSystem};

/// Health restored by one potion.
const POTION_HEAL: f32 = 30.0;

/// Melee reach of the player's attack volume, px.
const ATTACK_REACH: f32 = 70.0;

/// Where a deployed companion appears relative to the player, px.
const COMPANION_DEPLOY_OFFSET: f32 = 80.0;

/// Logical keys the simulation reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    /// Explicit pickup / open.
    Interact,
    /// Toggle the inventory overlay.
    Inventory,
    /// Consume the selected inventory item.
    UseItem,
    Dash,
    Escape,
    Restart,
    /// Quick-select an inventory slot.
    Slot(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

impl WorldSystem {
    /// Handle one key event.
    pub fn on_key(&mut self, key: Key, action: KeyAction, audio: &mut dyn AudioOut) {
        // Restart works from anywhere, including mid-death and paused.
        if key == Key::Restart && action == KeyAction::Release {
            self.restart_game();
            return;
        }

        if !self.registry.players.has(self.player) {
            return;
        }

        match key {
            Key::Inventory if action == KeyAction::Press => {
                let inventory = &mut self.registry.players.get_mut(self.player).inventory;
                inventory.is_open = !inventory.is_open;
                if !inventory.is_open {
                    self.ui.is_dragging = false;
                    self.ui.dragged_slot = None;
                }
            }
            Key::Escape if action == KeyAction::Press => {
                let inventory = &mut self.registry.players.get_mut(self.player).inventory;
                if inventory.is_open {
                    inventory.is_open = false;
                    self.ui.is_dragging = false;
                    self.ui.dragged_slot = None;
                } else {
                    self.ui.game_paused = !self.ui.game_paused;
                }
            }
            Key::Slot(n) if action == KeyAction::Press => {
                let slot = if n == 0 { 9 } else { (n - 1) as usize };
                if slot < BASE_SLOTS {
                    self.registry
                        .players
                        .get_mut(self.player)
                        .inventory
                        .set_selected_slot(slot);
                }
            }
            _ => {}
        }

        // Everything below acts on the world; modal UI swallows it.
        if self.modal_active() {
            return;
        }

        match (key, action) {
            (Key::Up | Key::Down | Key::Left | Key::Right, _) => {
                self.movement_key(key, action);
            }
            (Key::Interact, KeyAction::Press) => self.interact(audio),
            (Key::UseItem, KeyAction::Press) => self.use_selected_item(audio),
            (Key::Dash, KeyAction::Press) => self.start_dash(),
            _ => {}
        }
    }

    /// Track the cursor for aiming and inventory drag-and-drop.
    pub fn on_mouse_move(&mut self, position: Vec2) {
        self.ui.cursor = position;
    }

    /// Handle a mouse button event: left is melee attack, right is block.
    pub fn on_mouse_button(
        &mut self,
        button: MouseButton,
        action: KeyAction,
        audio: &mut dyn AudioOut,
    ) {
        if self.modal_active() || !self.registry.players.has(self.player) {
            return;
        }
        if !self.registry.player_animations.has(self.player) {
            return;
        }
        if self.registry.death_timers.has(self.player) {
            return;
        }

        match (button, action) {
            (MouseButton::Left, KeyAction::Press) => {
                let facing = self.player_facing();
                let anim = self.registry.player_animations.get_mut(self.player);
                anim.set_state(PlayerState::Attack, facing);
                audio.play(Sound::Attack);
                self.spawn_melee_volume(facing);
            }
            (MouseButton::Right, KeyAction::Press) => {
                let facing = self.player_facing();
                let anim = self.registry.player_animations.get_mut(self.player);
                anim.set_state(PlayerState::Block, facing);
            }
            (MouseButton::Right, KeyAction::Release) => {
                let anim = self.registry.player_animations.get_mut(self.player);
                if anim.state == PlayerState::Block {
                    let facing = anim.direction;
                    anim.can_attack = false;
                    anim.set_state(PlayerState::Idle, facing);
                }
            }
            _ => {}
        }
    }

    // -- helpers ------------------------------------------------------------

    /// Movement is gated off while a modal overlay owns the screen.
    fn modal_active(&self) -> bool {
        if self.ui.game_paused {
            return true;
        }
        self.registry.players.has(self.player)
            && self.registry.players.get(self.player).inventory.is_open
    }

    fn movement_key(&mut self, key: Key, action: KeyAction) {
        if !self.registry.motions.has(self.player) || self.registry.death_timers.has(self.player) {
            return;
        }
        let stats = self.registry.players.get(self.player);
        let mut speed = stats.speed;
        if stats.slow {
            speed *= 0.5;
        }
        if stats.is_dashing {
            speed = stats.dash_speed;
        }

        let velocity = &mut self.registry.motions.get_mut(self.player).velocity;
        match (key, action) {
            (Key::Up, KeyAction::Press) => velocity.y = -speed,
            (Key::Down, KeyAction::Press) => velocity.y = speed,
            (Key::Left, KeyAction::Press) => velocity.x = -speed,
            (Key::Right, KeyAction::Press) => velocity.x = speed,
            (Key::Up | Key::Down, KeyAction::Release) => velocity.y = 0.0,
            (Key::Left | Key::Right, KeyAction::Release) => velocity.x = 0.0,
            _ => {}
        }
    }

    /// The explicit pickup path: consult the flags armed by the collision
    /// pass this frame.
    fn interact(&mut self, audio: &mut dyn AudioOut) {
        if let Some(robot) = self.ui.capture_candidate {
            self.capture_robot(robot, audio);
            return;
        }
        if !self.ui.pickup_allowed {
            return;
        }
        let Some(candidate) = self.ui.pickup_candidate else {
            return;
        };

        if self.registry.doors.has(candidate) {
            self.open_door(candidate, audio);
            return;
        }

        let Some(label) = self.ui.pickup_item_label.clone() else {
            return;
        };
        let added = self
            .registry
            .players
            .get_mut(self.player)
            .inventory
            .add_item(&label, 1);
        if added {
            self.registry.remove_all_components_of(candidate);
            self.ui.clear_pickup();
            audio.play(Sound::Pickup);
        } else {
            self.notifications
                .queue_unique("Your inventory is full.", 2500.0);
        }
    }

    /// Stow a weakened capturable robot as an inventory item. Deploying it
    /// later spawns a companion.
    fn capture_robot(&mut self, robot: scrapfall_ecs::entity::Entity, audio: &mut dyn AudioOut) {
        if !self.registry.robots.has(robot) {
            return;
        }
        let added = self
            .registry
            .players
            .get_mut(self.player)
            .inventory
            .add_item("Captured Robot", 1);
        if !added {
            self.notifications
                .queue_unique("Your inventory is full.", 2500.0);
            return;
        }
        self.registry.remove_all_components_of(robot);
        self.ui.show_capture_ui = false;
        self.ui.capture_candidate = None;
        audio.play(Sound::Pickup);
    }

    fn open_door(&mut self, door: scrapfall_ecs::entity::Entity, audio: &mut dyn AudioOut) {
        let was_locked = self.registry.doors.get(door).is_locked;
        if was_locked {
            let inventory = &mut self.registry.players.get_mut(self.player).inventory;
            if !inventory.remove_item("Key", 1) {
                return;
            }
        }
        let state = self.registry.doors.get_mut(door);
        state.is_locked = false;
        state.is_open = true;
        if self.registry.door_animations.has(door) {
            self.registry.door_animations.get_mut(door).is_opening = true;
        }
        self.ui.clear_pickup();
        audio.play(Sound::DoorOpen);
    }

    /// Consume the selected inventory item. Potions heal; a captured robot
    /// deploys as a companion; anything else declines with a notification.
    fn use_selected_item(&mut self, audio: &mut dyn AudioOut) {
        let selected = self
            .registry
            .players
            .get(self.player)
            .inventory
            .selected_item()
            .map(|i| i.name.clone());
        match selected {
            Some(name) if name == "Health Potion" => {
                let stats = self.registry.players.get_mut(self.player);
                stats.inventory.consume_selected();
                stats.current_health = (stats.current_health + POTION_HEAL).min(stats.max_health);
                audio.play(Sound::Heal);
            }
            Some(name) if name == "Captured Robot" => {
                if !self.registry.motions.has(self.player) {
                    return;
                }
                self.registry
                    .players
                    .get_mut(self.player)
                    .inventory
                    .consume_selected();
                let position = self.registry.motions.get(self.player).position
                    + Vec2::new(COMPANION_DEPLOY_OFFSET, 0.0);
                spawn::create_companion_robot(&mut self.registry, position, 30.0, 10.0, 100.0);
            }
            Some(_) => {
                self.notifications
                    .queue_unique("You can't use that here.", 2500.0);
            }
            None => {}
        }
    }

    fn start_dash(&mut self) {
        if !self.registry.motions.has(self.player) {
            return;
        }
        let velocity = self.registry.motions.get(self.player).velocity;
        let stats = self.registry.players.get_mut(self.player);
        if stats.is_dashing || stats.dash_cooldown > 0.0 || velocity == Vec2::ZERO {
            return;
        }
        stats.is_dashing = true;
        stats.dash_timer = stats.dash_duration;
        stats.last_dash_direction = velocity.normalize();
        let dash_velocity = stats.last_dash_direction * stats.dash_speed;
        self.registry.motions.get_mut(self.player).velocity = dash_velocity;
    }

    fn player_facing(&self) -> Direction {
        let velocity = if self.registry.motions.has(self.player) {
            self.registry.motions.get(self.player).velocity
        } else {
            Vec2::ZERO
        };
        direction_of(velocity).unwrap_or_else(|| {
            if self.registry.player_animations.has(self.player) {
                self.registry.player_animations.get(self.player).direction
            } else {
                Direction::Down
            }
        })
    }

    /// A short-lived hit volume in front of the player.
    fn spawn_melee_volume(&mut self, facing: Direction) {
        let position = self.registry.motions.get(self.player).position;
        let offset = match facing {
            Direction::Up => Vec2::new(0.0, -ATTACK_REACH),
            Direction::Down => Vec2::new(0.0, ATTACK_REACH),
            Direction::Left => Vec2::new(-ATTACK_REACH, 0.0),
            Direction::Right => Vec2::new(ATTACK_REACH, 0.0),
        };
        let dmg = self.registry.players.get(self.player).weapon_stat;
        let volume = spawn::attack_box(position + offset, Vec2::splat(64.0), dmg, true);
        let entity = self.registry.create_entity();
        self.registry.attack_boxes.insert(entity, volume);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
