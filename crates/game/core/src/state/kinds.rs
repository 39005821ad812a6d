//! Closed enumerations shared by the character rules and the script API.
//!
//! Every enum is `#[repr(u8)]` so scripts can address variants by index
//! (`from_repr`) or by name (`FromStr`, case-insensitive). Unknown indices and
//! names resolve to `None`, which callers treat as "ignore the request".

use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString, FromRepr};

/// Action a character requests or has committed.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
    EnumCount,
    FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum Action {
    Move,
    Attack,
    Block,
    /// Idle; no cost and no effect.
    #[default]
    Empty,
}

/// Facing / movement direction.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
    EnumCount,
    FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
    #[default]
    Unknown,
}

impl Direction {
    /// Unit vector for this direction in screen coordinates (y grows down).
    ///
    /// Returns `None` for [`Direction::Unknown`].
    pub const fn delta(self) -> Option<(i32, i32)> {
        match self {
            Direction::Up => Some((0, -1)),
            Direction::Right => Some((1, 0)),
            Direction::Down => Some((0, 1)),
            Direction::Left => Some((-1, 0)),
            Direction::Unknown => None,
        }
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
    EnumCount,
    FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum AttackType {
    #[default]
    Fast,
    Strong,
}

/// Height band an attack is aimed at, or a block is held at.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
    EnumCount,
    FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum AttackDirection {
    Head,
    #[default]
    Torso,
    Legs,
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
    EnumCount,
    FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum MovementType {
    #[default]
    Default,
    Sprint,
}

/// Leveled stat modifier purchased with skill points.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
    EnumCount,
    FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum Parameter {
    MovementSpeed,
    AttackSpeed,
    AttackRange,
    HitPoints,
    StaminaPoints,
    AttackDamage,
    VisionRange,
    StaminaCostReduction,
    StaminaRegenFrequency,
}

impl Parameter {
    /// Dense index used for parameter tables.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Kind tag carried by every entity.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
    EnumCount,
    FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum ObjectType {
    Player,
    HealingItem,
    ExpItem,
    #[strum(to_string = "NPC", serialize = "Npc")]
    Npc,
}

impl ObjectType {
    pub const fn is_character(self) -> bool {
        matches!(self, ObjectType::Player | ObjectType::Npc)
    }

    pub const fn is_item(self) -> bool {
        matches!(self, ObjectType::HealingItem | ObjectType::ExpItem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("attack".parse::<Action>().ok(), Some(Action::Attack));
        assert_eq!("LEFT".parse::<Direction>().ok(), Some(Direction::Left));
        assert_eq!("npc".parse::<ObjectType>().ok(), Some(ObjectType::Npc));
        assert!("Jump".parse::<Action>().is_err());
    }

    #[test]
    fn out_of_range_repr_is_none() {
        assert_eq!(Action::from_repr(1), Some(Action::Attack));
        assert_eq!(Action::from_repr(4), None);
        assert_eq!(Parameter::from_repr(Parameter::COUNT as u8), None);
    }

    #[test]
    fn parameter_indices_are_dense() {
        for (expected, parameter) in Parameter::iter().enumerate() {
            assert_eq!(parameter.index(), expected);
        }
    }

    #[test]
    fn unknown_direction_has_no_delta() {
        assert_eq!(Direction::Unknown.delta(), None);
        assert_eq!(Direction::Up.delta(), Some((0, -1)));
    }
}
