use strum::IntoEnumIterator;

use crate::config::GameConfig;
use crate::state::Parameter;

/// Level of every [`Parameter`], indexed densely by the enum discriminant.
///
/// Levels are unsigned, so they can never go negative; raising saturates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterLevels([u32; GameConfig::PARAMETER_COUNT]);

impl ParameterLevels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `(parameter, level)` pairs; later pairs win.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Parameter, u32)>,
    {
        let mut levels = Self::default();
        for (parameter, level) in pairs {
            levels.set(parameter, level);
        }
        levels
    }

    pub fn get(&self, parameter: Parameter) -> u32 {
        self.0[parameter.index()]
    }

    pub fn set(&mut self, parameter: Parameter, level: u32) {
        self.0[parameter.index()] = level;
    }

    /// Increments a parameter by one level, returning the new level.
    pub fn raise(&mut self, parameter: Parameter) -> u32 {
        let slot = &mut self.0[parameter.index()];
        *slot = slot.saturating_add(1);
        *slot
    }

    pub fn iter(&self) -> impl Iterator<Item = (Parameter, u32)> + '_ {
        Parameter::iter().map(|parameter| (parameter, self.get(parameter)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_parameter_has_its_own_slot() {
        let mut levels = ParameterLevels::from_pairs([
            (Parameter::HitPoints, 3),
            (Parameter::AttackSpeed, 10),
        ]);
        assert_eq!(levels.get(Parameter::HitPoints), 3);
        assert_eq!(levels.get(Parameter::AttackSpeed), 10);
        assert_eq!(levels.get(Parameter::VisionRange), 0);

        assert_eq!(levels.raise(Parameter::VisionRange), 1);
        assert_eq!(levels.get(Parameter::HitPoints), 3);
        assert_eq!(levels.iter().filter(|(_, level)| *level > 0).count(), 3);
    }
}
