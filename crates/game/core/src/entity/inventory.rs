use arrayvec::ArrayVec;

use super::EntityHandle;
use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};

/// One carried item and the capacity it occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventorySlot {
    pub item: EntityHandle,
    pub size: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("inventory needs {needed} free units but only {free} remain")]
    Full { needed: u32, free: u32 },

    #[error("no more inventory slots available")]
    NoSlots,

    #[error("item is already carried")]
    AlreadyCarried,

    #[error("item is not in the inventory")]
    Missing,
}

impl GameError for InventoryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Full { .. } | Self::NoSlots => ErrorSeverity::Recoverable,
            Self::AlreadyCarried | Self::Missing => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Full { .. } => "INVENTORY_FULL",
            Self::NoSlots => "INVENTORY_NO_SLOTS",
            Self::AlreadyCarried => "INVENTORY_ALREADY_CARRIED",
            Self::Missing => "INVENTORY_MISSING",
        }
    }
}

/// Item references carried by a character, bounded by total item size.
///
/// The inventory only tracks references; the items themselves stay registered
/// with the scene so their charges survive being picked up.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    capacity: u32,
    slots: ArrayVec<InventorySlot, { GameConfig::MAX_INVENTORY_SLOTS }>,
}

impl Inventory {
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            slots: ArrayVec::new(),
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn used(&self) -> u32 {
        self.slots.iter().map(|slot| slot.size).sum()
    }

    pub fn free(&self) -> u32 {
        self.capacity.saturating_sub(self.used())
    }

    pub fn contains(&self, item: EntityHandle) -> bool {
        self.slots.iter().any(|slot| slot.item == item)
    }

    pub fn add(&mut self, item: EntityHandle, size: u32) -> Result<(), InventoryError> {
        if self.contains(item) {
            return Err(InventoryError::AlreadyCarried);
        }
        let free = self.free();
        if size > free {
            return Err(InventoryError::Full { needed: size, free });
        }
        self.slots
            .try_push(InventorySlot { item, size })
            .map_err(|_| InventoryError::NoSlots)
    }

    pub fn remove(&mut self, item: EntityHandle) -> Result<InventorySlot, InventoryError> {
        let index = self
            .slots
            .iter()
            .position(|slot| slot.item == item)
            .ok_or(InventoryError::Missing)?;
        Ok(self.slots.remove(index))
    }

    /// Carried item handles in pickup order.
    pub fn items(&self) -> impl Iterator<Item = EntityHandle> + '_ {
        self.slots.iter().map(|slot| slot.item)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drops every carried reference, e.g. when duplicating the owner.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn handles(count: usize) -> Vec<EntityHandle> {
        let mut map: SlotMap<EntityHandle, ()> = SlotMap::with_key();
        (0..count).map(|_| map.insert(())).collect()
    }

    #[test]
    fn capacity_is_measured_in_size_units() {
        let items = handles(3);
        let mut inventory = Inventory::new(10);
        inventory.add(items[0], 4).unwrap();
        inventory.add(items[1], 6).unwrap();
        assert_eq!(inventory.free(), 0);
        assert_eq!(
            inventory.add(items[2], 1),
            Err(InventoryError::Full { needed: 1, free: 0 })
        );
    }

    #[test]
    fn duplicate_and_missing_items_are_rejected() {
        let items = handles(2);
        let mut inventory = Inventory::new(10);
        inventory.add(items[0], 1).unwrap();
        assert_eq!(inventory.add(items[0], 1), Err(InventoryError::AlreadyCarried));
        assert_eq!(inventory.remove(items[1]), Err(InventoryError::Missing));

        let removed = inventory.remove(items[0]).unwrap();
        assert_eq!(removed.size, 1);
        assert!(inventory.is_empty());
    }
}
