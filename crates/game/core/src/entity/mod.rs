//! Entity records and the passive collaborators (items, inventory).
//!
//! Every entity in a scene is addressed by an [`EntityHandle`], a generational
//! key: once the entity is removed, the handle stops resolving and any lookup
//! through it fails closed instead of reaching a recycled slot.
mod capabilities;
mod inventory;
mod item;

pub use capabilities::Capabilities;
pub use inventory::{Inventory, InventoryError, InventorySlot};
pub use item::{Item, ItemApplied, ItemEffect, ItemError};

use crate::state::{HitBox, ObjectType, Position, Rect};

slotmap::new_key_type! {
    /// Generational handle to an entity registered with a scene.
    pub struct EntityHandle;
}

impl EntityHandle {
    /// Packs the handle into an integer that survives a round trip through a
    /// script. Stale or forged values simply fail to resolve.
    pub fn to_bits(self) -> u64 {
        slotmap::Key::data(&self).as_ffi()
    }

    pub fn from_bits(bits: u64) -> Self {
        slotmap::KeyData::from_ffi(bits).into()
    }
}

/// Data every entity carries regardless of kind.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityRecord {
    pub name: String,
    pub kind: ObjectType,
    pub position: Position,
    pub hitbox: HitBox,
    pub capabilities: Capabilities,
}

impl EntityRecord {
    /// Creates a record with the default capability set for `kind`.
    pub fn new(name: impl Into<String>, kind: ObjectType, position: Position, hitbox: HitBox) -> Self {
        Self {
            name: name.into(),
            kind,
            position,
            hitbox,
            capabilities: Capabilities::for_kind(kind),
        }
    }

    /// World-space area currently covered by the entity.
    pub fn area(&self) -> Rect {
        self.hitbox.at(self.position)
    }

    pub fn is_passable(&self) -> bool {
        self.capabilities.contains(Capabilities::PASSABLE)
    }

    pub fn can_duplicate(&self) -> bool {
        self.capabilities.contains(Capabilities::DUPLICATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn handle_bits_round_trip_and_stale_handles_miss() {
        let mut map: SlotMap<EntityHandle, &str> = SlotMap::with_key();
        let first = map.insert("first");
        let bits = first.to_bits();
        assert_eq!(EntityHandle::from_bits(bits), first);

        map.remove(first);
        let second = map.insert("second");
        assert_ne!(first, second);
        assert!(map.get(EntityHandle::from_bits(bits)).is_none());
    }

    #[test]
    fn record_area_follows_position() {
        let record = EntityRecord::new(
            "grunt",
            ObjectType::Npc,
            Position::new(5, 5),
            HitBox::new(10, 10),
        );
        assert_eq!(record.area().max, Position::new(15, 15));
        assert!(!record.is_passable());
    }
}
