use crate::state::{Position, Rect};

/// Static arena geometry: bounds plus solid obstacles.
pub trait MapOracle: Send + Sync {
    fn dimensions(&self) -> MapDimensions;

    /// Returns true if `area` overlaps no solid obstacle.
    fn is_open(&self, area: &Rect) -> bool;

    /// Returns true if `area` lies inside the arena and overlaps no obstacle.
    fn admits(&self, area: &Rect) -> bool {
        self.dimensions().bounds().contains(area) && self.is_open(area)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            min: Position::ORIGIN,
            max: Position::new(self.width as i32, self.height as i32),
        }
    }
}
