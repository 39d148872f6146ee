//! Player inventory: a fixed-capacity slot array with two equip slots.
//!
//! Items are named and stackable. Pickup never happens on contact -- the
//! collision layer only flags a candidate, and the input layer calls
//! [`Inventory::add_item`] on an explicit interact key-press. A full
//! inventory is a gameplay soft failure: the caller declines the pickup and
//! queues a notification, nothing propagates as an error.

use serde::{Deserialize, Serialize};

/// Number of general-purpose slots.
pub const BASE_SLOTS: usize = 10;
/// Slot index of the weapon equip slot.
pub const WEAPON_SLOT: usize = BASE_SLOTS;
/// Slot index of the armor equip slot.
pub const ARMOR_SLOT: usize = BASE_SLOTS + 1;
/// Total slot count including the two equip slots.
pub const TOTAL_SLOTS: usize = BASE_SLOTS + 2;

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

/// A named, stackable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub quantity: u32,
}

impl Item {
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// Fixed-capacity slot array holding named, stackable items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<Option<Item>>,
    selected_slot: usize,
    /// Whether the inventory UI is open (a modal state; movement input is
    /// gated off while open).
    pub is_open: bool,
}

impl Inventory {
    /// An empty inventory with all [`TOTAL_SLOTS`] slots free.
    pub fn new() -> Self {
        Self {
            slots: vec![None; TOTAL_SLOTS],
            selected_slot: 0,
            is_open: false,
        }
    }

    /// Add `quantity` of the named item: stack onto an existing stack if one
    /// exists, otherwise claim the first empty general slot.
    ///
    /// Returns `false` (declining the add) when no stack exists and every
    /// general slot is taken. Equip slots are never claimed implicitly.
    pub fn add_item(&mut self, name: &str, quantity: u32) -> bool {
        for slot in self.slots.iter_mut().flatten() {
            if slot.name == name {
                slot.quantity += quantity;
                return true;
            }
        }
        for slot in self.slots.iter_mut().take(BASE_SLOTS) {
            if slot.is_none() {
                *slot = Some(Item::new(name, quantity));
                return true;
            }
        }
        false
    }

    /// Remove up to `quantity` of the named item; the slot is freed when its
    /// stack reaches zero. Returns `false` if the item is not present.
    pub fn remove_item(&mut self, name: &str, quantity: u32) -> bool {
        for slot in self.slots.iter_mut() {
            if let Some(item) = slot {
                if item.name == name {
                    if item.quantity > quantity {
                        item.quantity -= quantity;
                    } else {
                        *slot = None;
                    }
                    return true;
                }
            }
        }
        false
    }

    /// Total quantity of the named item across all slots.
    pub fn quantity_of(&self, name: &str) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|item| item.name == name)
            .map(|item| item.quantity)
            .sum()
    }

    /// Whether any stack of the named item exists.
    pub fn contains(&self, name: &str) -> bool {
        self.quantity_of(name) > 0
    }

    /// All non-empty items, in slot order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.slots.iter().flatten()
    }

    /// The item in `slot`, if any.
    pub fn slot(&self, slot: usize) -> Option<&Item> {
        self.slots.get(slot).and_then(|s| s.as_ref())
    }

    /// Swap the contents of two slots (inventory drag-and-drop). Out-of-range
    /// indices decline the swap.
    pub fn swap_items(&mut self, dragged_slot: usize, target_slot: usize) -> bool {
        if dragged_slot >= self.slots.len() || target_slot >= self.slots.len() {
            return false;
        }
        self.slots.swap(dragged_slot, target_slot);
        true
    }

    /// Select a slot within bounds; out-of-range requests are ignored.
    pub fn set_selected_slot(&mut self, slot: usize) {
        if slot < self.slots.len() {
            self.selected_slot = slot;
        }
    }

    /// Index of the currently selected slot.
    pub fn selected_slot(&self) -> usize {
        self.selected_slot
    }

    /// The item in the currently selected slot, if any.
    pub fn selected_item(&self) -> Option<&Item> {
        self.slot(self.selected_slot)
    }

    /// Consume one unit from the selected slot, returning the item name.
    /// Declines (`None`) when the selected slot is empty.
    pub fn consume_selected(&mut self) -> Option<String> {
        let slot = self.slots.get_mut(self.selected_slot)?;
        let item = slot.as_mut()?;
        let name = item.name.clone();
        if item.quantity > 1 {
            item.quantity -= 1;
        } else {
            *slot = None;
        }
        Some(name)
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_stacks_onto_existing() {
        let mut inv = Inventory::new();
        assert!(inv.add_item("Key", 1));
        assert!(inv.add_item("Key", 2));
        assert_eq!(inv.quantity_of("Key"), 3);
        assert_eq!(inv.items().count(), 1);
    }

    #[test]
    fn add_claims_first_empty_slot() {
        let mut inv = Inventory::new();
        inv.add_item("Key", 1);
        inv.add_item("Potion", 1);
        assert_eq!(inv.slot(0).unwrap().name, "Key");
        assert_eq!(inv.slot(1).unwrap().name, "Potion");
    }

    #[test]
    fn add_declines_when_general_slots_full() {
        let mut inv = Inventory::new();
        for i in 0..BASE_SLOTS {
            assert!(inv.add_item(&format!("item-{i}"), 1));
        }
        assert!(!inv.add_item("one-too-many", 1));
        // Stacking onto an existing item still works when full.
        assert!(inv.add_item("item-0", 5));
        assert_eq!(inv.quantity_of("item-0"), 6);
    }

    #[test]
    fn remove_frees_slot_at_zero() {
        let mut inv = Inventory::new();
        inv.add_item("Potion", 2);
        assert!(inv.remove_item("Potion", 1));
        assert_eq!(inv.quantity_of("Potion"), 1);
        assert!(inv.remove_item("Potion", 5));
        assert!(!inv.contains("Potion"));
        assert!(inv.slot(0).is_none());
    }

    #[test]
    fn remove_missing_declines() {
        let mut inv = Inventory::new();
        assert!(!inv.remove_item("Ghost", 1));
    }

    #[test]
    fn swap_moves_items_between_slots() {
        let mut inv = Inventory::new();
        inv.add_item("Key", 1);
        assert!(inv.swap_items(0, WEAPON_SLOT));
        assert!(inv.slot(0).is_none());
        assert_eq!(inv.slot(WEAPON_SLOT).unwrap().name, "Key");
        assert!(!inv.swap_items(0, TOTAL_SLOTS));
    }

    #[test]
    fn selected_slot_stays_in_bounds() {
        let mut inv = Inventory::new();
        inv.set_selected_slot(ARMOR_SLOT);
        assert_eq!(inv.selected_slot(), ARMOR_SLOT);
        inv.set_selected_slot(TOTAL_SLOTS + 5);
        assert_eq!(inv.selected_slot(), ARMOR_SLOT);
    }

    #[test]
    fn consume_selected_decrements_then_frees() {
        let mut inv = Inventory::new();
        inv.add_item("Potion", 2);
        inv.set_selected_slot(0);
        assert_eq!(inv.consume_selected().as_deref(), Some("Potion"));
        assert_eq!(inv.quantity_of("Potion"), 1);
        assert_eq!(inv.consume_selected().as_deref(), Some("Potion"));
        assert!(inv.consume_selected().is_none());
    }
}
