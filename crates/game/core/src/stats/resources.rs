//! HP and stamina pools.
//!
//! Only the current values are stored; maximums always come from
//! [`DerivedStats`](super::DerivedStats) and are passed in on every mutation,
//! which keeps `0 <= current <= max` true by construction.

/// Current HP and stamina of a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resources {
    hit_points: u32,
    stamina: u32,
}

/// Result of applying damage to a pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageTaken {
    pub dealt: u32,
    pub remaining: u32,
    /// True only on the hit that brought HP from positive to zero.
    pub killed: bool,
}

impl Resources {
    /// Creates full pools.
    pub fn full(max_hit_points: u32, max_stamina: u32) -> Self {
        Self {
            hit_points: max_hit_points,
            stamina: max_stamina,
        }
    }

    pub fn hit_points(&self) -> u32 {
        self.hit_points
    }

    pub fn stamina(&self) -> u32 {
        self.stamina
    }

    pub fn is_alive(&self) -> bool {
        self.hit_points > 0
    }

    /// Removes up to `amount` HP, clamping at zero.
    pub fn take_damage(&mut self, amount: u32) -> DamageTaken {
        let was_alive = self.is_alive();
        let dealt = amount.min(self.hit_points);
        self.hit_points -= dealt;
        DamageTaken {
            dealt,
            remaining: self.hit_points,
            killed: was_alive && !self.is_alive(),
        }
    }

    /// Restores HP up to `max`, returning the amount actually healed.
    pub fn gain_hp(&mut self, amount: u32, max: u32) -> u32 {
        let before = self.hit_points;
        self.hit_points = self.hit_points.saturating_add(amount).min(max);
        self.hit_points.saturating_sub(before)
    }

    /// Deducts `cost` if affordable; otherwise leaves stamina untouched.
    pub fn try_spend_stamina(&mut self, cost: u32) -> bool {
        match self.stamina.checked_sub(cost) {
            Some(left) => {
                self.stamina = left;
                true
            }
            None => false,
        }
    }

    /// Drains up to `amount` stamina, clamping at zero.
    pub fn drain_stamina(&mut self, amount: u32) -> u32 {
        let drained = amount.min(self.stamina);
        self.stamina -= drained;
        drained
    }

    /// Restores stamina up to `max`, returning the amount gained.
    pub fn restore_stamina(&mut self, amount: u32, max: u32) -> u32 {
        let before = self.stamina;
        self.stamina = self.stamina.saturating_add(amount).min(max);
        self.stamina.saturating_sub(before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_clamps_and_reports_kill_once() {
        let mut pools = Resources::full(30, 10);
        let first = pools.take_damage(25);
        assert_eq!(first.dealt, 25);
        assert!(!first.killed);

        let lethal = pools.take_damage(100);
        assert_eq!(lethal.dealt, 5);
        assert_eq!(lethal.remaining, 0);
        assert!(lethal.killed);

        let overkill = pools.take_damage(10);
        assert_eq!(overkill.dealt, 0);
        assert!(!overkill.killed);
    }

    #[test]
    fn healing_and_regen_clamp_at_max() {
        let mut pools = Resources::full(50, 20);
        pools.take_damage(10);
        assert_eq!(pools.gain_hp(25, 50), 10);
        assert_eq!(pools.hit_points(), 50);

        assert!(pools.try_spend_stamina(15));
        assert!(!pools.try_spend_stamina(6));
        assert_eq!(pools.stamina(), 5);
        assert_eq!(pools.restore_stamina(100, 20), 15);
    }

    #[test]
    fn drain_never_goes_negative() {
        let mut pools = Resources::full(1, 3);
        assert_eq!(pools.drain_stamina(5), 3);
        assert_eq!(pools.stamina(), 0);
    }
}
