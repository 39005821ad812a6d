use std::fmt;

/// Integer position in scene units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this position displaced by `(dx, dy)` scaled by `factor`.
    pub fn offset(self, (dx, dy): (i32, i32), factor: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx.saturating_mul(factor)),
            y: self.y.saturating_add(dy.saturating_mul(factor)),
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned hitbox size; the box is anchored at the owner's position
/// (top-left corner).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitBox {
    pub width: u32,
    pub height: u32,
}

impl HitBox {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Places the hitbox at `origin`, producing a world-space rectangle.
    pub fn at(self, origin: Position) -> Rect {
        Rect::new(origin, self)
    }
}

impl Default for HitBox {
    /// Characters default to a 20x20 box.
    fn default() -> Self {
        Self::new(20, 20)
    }
}

/// World-space rectangle; `min` inclusive, `max` exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub min: Position,
    pub max: Position,
}

impl Rect {
    pub fn new(origin: Position, size: HitBox) -> Self {
        Self {
            min: origin,
            max: Position::new(
                origin.x.saturating_add(size.width as i32),
                origin.y.saturating_add(size.height as i32),
            ),
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Returns true if `other` lies entirely inside this rectangle.
    pub fn contains(&self, other: &Rect) -> bool {
        other.min.x >= self.min.x
            && other.min.y >= self.min.y
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
    }

    /// Squared edge-to-edge distance between two rectangles (0 when touching
    /// or overlapping).
    pub fn gap_squared(&self, other: &Rect) -> u64 {
        let dx = axis_gap(self.min.x, self.max.x, other.min.x, other.max.x);
        let dy = axis_gap(self.min.y, self.max.y, other.min.y, other.max.y);
        dx * dx + dy * dy
    }

    /// Returns true if the gap between the rectangles is at most `range`.
    pub fn within_range(&self, other: &Rect, range: u32) -> bool {
        let range = u64::from(range);
        self.gap_squared(other) <= range * range
    }
}

fn axis_gap(a_min: i32, a_max: i32, b_min: i32, b_max: i32) -> u64 {
    if a_max <= b_min {
        (i64::from(b_min) - i64::from(a_max)) as u64
    } else if b_max <= a_min {
        (i64::from(a_min) - i64::from(b_max)) as u64
    } else {
        0
    }
}

/// Discrete time unit of the scene clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Self = Self(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Ticks elapsed since `earlier`, or zero if `earlier` is in the future.
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0.saturating_add(rhs))
    }
}

impl std::ops::AddAssign<u64> for Tick {
    fn add_assign(&mut self, rhs: u64) {
        self.0 = self.0.saturating_add(rhs);
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_rects_have_zero_gap() {
        let a = HitBox::new(10, 10).at(Position::new(0, 0));
        let b = HitBox::new(10, 10).at(Position::new(5, 5));
        assert!(a.intersects(&b));
        assert_eq!(a.gap_squared(&b), 0);
    }

    #[test]
    fn touching_rects_do_not_intersect() {
        let a = HitBox::new(10, 10).at(Position::new(0, 0));
        let b = HitBox::new(10, 10).at(Position::new(10, 0));
        assert!(!a.intersects(&b));
        assert!(a.within_range(&b, 0));
    }

    #[test]
    fn gap_is_euclidean_between_edges() {
        let a = HitBox::new(10, 10).at(Position::new(0, 0));
        let b = HitBox::new(10, 10).at(Position::new(13, 14));
        // dx = 3, dy = 4
        assert_eq!(a.gap_squared(&b), 25);
        assert!(a.within_range(&b, 5));
        assert!(!a.within_range(&b, 4));
    }
}
