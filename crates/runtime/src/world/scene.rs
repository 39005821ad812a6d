//! Tick-start snapshot and the scene oracle handed to the action machine.

use slotmap::SecondaryMap;
use skirmish_core::{EntityHandle, EntityView, MapOracle, Rect, SceneOracle, Tick};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub view: EntityView,
    /// Carrier of an item held in an inventory; such items are not in the
    /// world.
    pub carried_by: Option<EntityHandle>,
}

/// Read-only picture of every entity, captured once at tick start.
///
/// All characters in a tick observe the same clock and target positions
/// regardless of update order.
#[derive(Clone, Debug, Default)]
pub struct SceneSnapshot {
    now: Tick,
    entries: SecondaryMap<EntityHandle, SnapshotEntry>,
}

impl SceneSnapshot {
    pub fn new(now: Tick) -> Self {
        Self {
            now,
            entries: SecondaryMap::new(),
        }
    }

    pub fn insert(&mut self, entry: SnapshotEntry) {
        self.entries.insert(entry.view.handle, entry);
    }

    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn entry(&self, handle: EntityHandle) -> Option<&SnapshotEntry> {
        self.entries.get(handle)
    }

    /// Entity as seen in the world; carried items and stale handles miss.
    pub fn observe(&self, handle: EntityHandle) -> Option<EntityView> {
        self.entries
            .get(handle)
            .filter(|entry| entry.carried_by.is_none())
            .map(|entry| entry.view)
    }

    /// In the world and alive.
    pub fn is_live(&self, handle: EntityHandle) -> bool {
        self.observe(handle).is_some_and(|view| view.alive)
    }

    pub fn in_world(&self) -> impl Iterator<Item = &EntityView> {
        self.entries
            .values()
            .filter(|entry| entry.carried_by.is_none())
            .map(|entry| &entry.view)
    }
}

/// [`SceneOracle`] over the snapshot plus live occupancy.
///
/// Passability uses current occupancy, so two characters never step into
/// the same spot within a tick; everything else answers from the snapshot.
pub struct SceneView<'a> {
    map: &'a dyn MapOracle,
    snapshot: &'a SceneSnapshot,
    occupancy: &'a SecondaryMap<EntityHandle, Rect>,
}

impl<'a> SceneView<'a> {
    pub fn new(
        map: &'a dyn MapOracle,
        snapshot: &'a SceneSnapshot,
        occupancy: &'a SecondaryMap<EntityHandle, Rect>,
    ) -> Self {
        Self {
            map,
            snapshot,
            occupancy,
        }
    }
}

impl SceneOracle for SceneView<'_> {
    fn now(&self) -> Tick {
        self.snapshot.now()
    }

    fn is_passable(&self, mover: EntityHandle, area: &Rect) -> bool {
        self.map.admits(area)
            && self
                .occupancy
                .iter()
                .all(|(handle, occupied)| handle == mover || !occupied.intersects(area))
    }

    fn observe(&self, handle: EntityHandle) -> Option<EntityView> {
        self.snapshot.observe(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArenaMap;
    use skirmish_core::{HitBox, ObjectType, Position};
    use slotmap::SlotMap;

    fn view(handle: EntityHandle, kind: ObjectType, position: Position) -> EntityView {
        EntityView {
            handle,
            kind,
            position,
            area: HitBox::new(10, 10).at(position),
            alive: true,
        }
    }

    #[test]
    fn carried_items_are_not_observable() {
        let mut keys: SlotMap<EntityHandle, ()> = SlotMap::with_key();
        let (knight, potion) = (keys.insert(()), keys.insert(()));

        let mut snapshot = SceneSnapshot::new(Tick(3));
        snapshot.insert(SnapshotEntry {
            view: view(knight, ObjectType::Player, Position::ORIGIN),
            carried_by: None,
        });
        snapshot.insert(SnapshotEntry {
            view: view(potion, ObjectType::HealingItem, Position::ORIGIN),
            carried_by: Some(knight),
        });

        assert!(snapshot.is_live(knight));
        assert!(snapshot.observe(potion).is_none());
        assert!(snapshot.entry(potion).is_some());
        assert_eq!(snapshot.in_world().count(), 1);

        keys.remove(knight);
        let stale = keys.insert(());
        assert!(snapshot.observe(stale).is_none());
    }

    #[test]
    fn occupied_space_is_impassable_except_for_its_owner() {
        let mut keys: SlotMap<EntityHandle, ()> = SlotMap::with_key();
        let (a, b) = (keys.insert(()), keys.insert(()));
        let map = ArenaMap::open(100, 100);
        let snapshot = SceneSnapshot::new(Tick(1));
        let mut occupancy = SecondaryMap::new();
        occupancy.insert(a, HitBox::new(10, 10).at(Position::new(20, 20)));

        let scene = SceneView::new(&map, &snapshot, &occupancy);
        let target = HitBox::new(10, 10).at(Position::new(25, 20));
        assert!(!scene.is_passable(b, &target));
        assert!(scene.is_passable(a, &target));
        assert!(scene.is_passable(b, &HitBox::new(10, 10).at(Position::new(30, 20))));
        assert!(!scene.is_passable(b, &HitBox::new(10, 10).at(Position::new(95, 20))));
    }
}
