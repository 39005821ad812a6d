//! Plain value types shared by every layer: geometry, the scene clock and the
//! closed enumerations scripts can name.
mod common;
mod kinds;

pub use common::{HitBox, Position, Rect, Tick};
pub use kinds::{Action, AttackDirection, AttackType, Direction, MovementType, ObjectType, Parameter};
