//! Static arena layout served through [`skirmish_core::MapOracle`].
use skirmish_content::ArenaSpec;
use skirmish_core::{MapDimensions, MapOracle, Rect};

/// MapOracle implementation with static arena data
///
/// Holds the immutable bounds and walls. Characters and items are dynamic
/// and live in the [`World`](crate::World).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaMap {
    dimensions: MapDimensions,
    walls: Vec<Rect>,
}

impl ArenaMap {
    pub fn new(dimensions: MapDimensions, walls: Vec<Rect>) -> Self {
        Self { dimensions, walls }
    }

    /// Open arena without walls.
    pub fn open(width: u32, height: u32) -> Self {
        Self::new(MapDimensions::new(width, height), Vec::new())
    }

    pub fn walls(&self) -> &[Rect] {
        &self.walls
    }
}

impl From<&ArenaSpec> for ArenaMap {
    fn from(spec: &ArenaSpec) -> Self {
        Self::new(spec.dimensions(), spec.walls.clone())
    }
}

impl MapOracle for ArenaMap {
    fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    fn is_open(&self, area: &Rect) -> bool {
        !self.walls.iter().any(|wall| wall.intersects(area))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::{HitBox, Position};

    #[test]
    fn walls_and_bounds_block() {
        let wall = Rect::new(Position::new(10, 0), HitBox::new(5, 50));
        let map = ArenaMap::new(MapDimensions::new(50, 50), vec![wall]);
        let size = HitBox::new(4, 4);

        assert!(map.admits(&size.at(Position::new(0, 0))));
        assert!(!map.admits(&size.at(Position::new(8, 0))));
        assert!(!map.admits(&size.at(Position::new(47, 0))));
        assert!(!map.admits(&size.at(Position::new(-1, 0))));
        assert!(map.admits(&size.at(Position::new(15, 46))));
    }
}
