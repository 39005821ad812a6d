//! Cooldown- and stamina-gated action state machine.
//!
//! A requested action is only a candidate. [`CharacterState::evaluate`]
//! commits it iff its cooldown has elapsed and the character can pay its
//! stamina cost; on acceptance the cost is deducted once, the next-allowed
//! time is scheduled and the outcome is returned for the scene to resolve.
//! On rejection nothing changes.

use super::{ActionRejection, AttackPlan};
use crate::character::CharacterState;
use crate::config::RulesConfig;
use crate::entity::EntityHandle;
use crate::env::SceneOracle;
use crate::state::{Action, AttackDirection, Position, Tick};

/// Next-allowed times. Every timer only ever moves forward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionTimers {
    next_move: Tick,
    next_attack: Tick,
    next_stamina_regen: Tick,
    next_item_use: Tick,
}

impl ActionTimers {
    /// All timers ready at `now`, except regeneration which waits one interval.
    pub fn starting_at(now: Tick, regen_interval: u64) -> Self {
        Self {
            next_move: now,
            next_attack: now,
            next_stamina_regen: now + regen_interval,
            next_item_use: now,
        }
    }

    pub fn next_move(&self) -> Tick {
        self.next_move
    }

    pub fn next_attack(&self) -> Tick {
        self.next_attack
    }

    pub fn next_stamina_regen(&self) -> Tick {
        self.next_stamina_regen
    }

    pub fn next_item_use(&self) -> Tick {
        self.next_item_use
    }

    pub(crate) fn schedule_move(&mut self, at: Tick) {
        self.next_move = self.next_move.max(at);
    }

    pub(crate) fn schedule_attack(&mut self, at: Tick) {
        self.next_attack = self.next_attack.max(at);
    }

    pub(crate) fn schedule_stamina_regen(&mut self, at: Tick) {
        self.next_stamina_regen = self.next_stamina_regen.max(at);
    }

    pub(crate) fn schedule_item_use(&mut self, at: Tick) {
        self.next_item_use = self.next_item_use.max(at);
    }
}

/// Committed action and timers of one character.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionMachine {
    timers: ActionTimers,
    committed: Action,
    committed_at: Option<Tick>,
    block_direction: AttackDirection,
    evaluated_at: Option<Tick>,
}

impl ActionMachine {
    pub fn new(timers: ActionTimers) -> Self {
        Self {
            timers,
            ..Self::default()
        }
    }

    pub fn timers(&self) -> &ActionTimers {
        &self.timers
    }

    pub(crate) fn timers_mut(&mut self) -> &mut ActionTimers {
        &mut self.timers
    }

    /// Last action that was accepted.
    pub fn committed(&self) -> Action {
        self.committed
    }

    pub fn committed_at(&self) -> Option<Tick> {
        self.committed_at
    }

    /// Block direction in effect at `now`. A block only covers the tick it
    /// was accepted in.
    pub fn blocking_at(&self, now: Tick) -> Option<AttackDirection> {
        (self.committed == Action::Block && self.committed_at == Some(now))
            .then_some(self.block_direction)
    }

    /// Attack recovery is still running.
    pub fn is_mid_attack(&self, now: Tick) -> bool {
        now < self.timers.next_attack
    }

    fn commit(&mut self, action: Action, now: Tick) {
        self.committed = action;
        self.committed_at = Some(now);
    }
}

/// What an accepted action asks the scene to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Idle,
    Moved { from: Position, to: Position },
    Attacked(AttackPlan),
    Blocked { direction: AttackDirection },
}

impl CharacterState {
    /// Validates the current intent and commits it if allowed.
    ///
    /// At most one evaluation per tick; a second call in the same tick is
    /// rejected so repeated requests never deduct stamina twice.
    pub fn evaluate(
        &mut self,
        me: EntityHandle,
        scene: &dyn SceneOracle,
        rules: &RulesConfig,
    ) -> Result<ActionOutcome, ActionRejection> {
        let now = scene.now();
        if self.machine.evaluated_at == Some(now) {
            return Err(ActionRejection::AlreadyEvaluated { tick: now });
        }
        if !self.is_alive() {
            return Err(ActionRejection::Dead);
        }
        self.machine.evaluated_at = Some(now);

        let intent = self.intent;
        match intent.action {
            Action::Empty => {
                self.machine.commit(Action::Empty, now);
                Ok(ActionOutcome::Idle)
            }
            Action::Move => self.evaluate_move(me, scene, rules, now),
            Action::Attack => self.evaluate_attack(me, scene, rules, now),
            Action::Block => {
                let cost = self.stats(rules).block_stamina_cost();
                self.pay(Action::Block, cost)?;
                self.machine.block_direction = intent.block_direction;
                self.machine.commit(Action::Block, now);
                Ok(ActionOutcome::Blocked {
                    direction: intent.block_direction,
                })
            }
        }
    }

    fn evaluate_move(
        &mut self,
        me: EntityHandle,
        scene: &dyn SceneOracle,
        rules: &RulesConfig,
        now: Tick,
    ) -> Result<ActionOutcome, ActionRejection> {
        let ready_at = self.machine.timers.next_move();
        if now < ready_at {
            return Err(ActionRejection::OnCooldown {
                action: Action::Move,
                ready_at,
            });
        }
        let delta = self
            .intent
            .direction
            .delta()
            .ok_or(ActionRejection::NoDirection)?;

        let movement = self.intent.movement_type;
        let stats = self.stats(rules);
        let cost = stats.move_stamina_cost(movement);
        let cooldown = stats.move_cooldown_for(movement);
        let speed = stats.speed().min(i32::MAX as u32) as i32;

        let from = self.record.position;
        let to = from.offset(delta, speed);
        if !scene.is_passable(me, &self.record.hitbox.at(to)) {
            return Err(ActionRejection::Blocked { destination: to });
        }
        self.pay(Action::Move, cost)?;
        self.machine.timers.schedule_move(now + cooldown);
        self.machine.commit(Action::Move, now);
        self.record.position = to;
        Ok(ActionOutcome::Moved { from, to })
    }

    fn evaluate_attack(
        &mut self,
        me: EntityHandle,
        scene: &dyn SceneOracle,
        rules: &RulesConfig,
        now: Tick,
    ) -> Result<ActionOutcome, ActionRejection> {
        let ready_at = self.machine.timers.next_attack();
        if now < ready_at {
            return Err(ActionRejection::OnCooldown {
                action: Action::Attack,
                ready_at,
            });
        }

        let attack_type = self.intent.attack_type;
        let stats = self.stats(rules);
        let cost = stats.attack_stamina_cost(attack_type);
        let cooldown = stats.attack_cooldown_for(attack_type);
        let damage = stats.attack_damage(attack_type);
        let range = stats.attack_range();

        self.pay(Action::Attack, cost)?;
        self.machine.timers.schedule_attack(now + cooldown);
        self.machine.commit(Action::Attack, now);

        let area = self.record.area();
        let target = self
            .intent
            .target
            .filter(|target| *target != me)
            .and_then(|target| scene.observe(target))
            .filter(|view| view.alive && view.kind.is_character())
            .filter(|view| area.within_range(&view.area, range))
            .map(|view| view.handle);

        Ok(ActionOutcome::Attacked(AttackPlan {
            target,
            damage,
            attack_type,
            direction: self.intent.attack_direction,
        }))
    }

    fn ensure_stamina(&self, action: Action, cost: u32) -> Result<(), ActionRejection> {
        let available = self.resources.stamina();
        if available < cost {
            return Err(ActionRejection::InsufficientStamina {
                action,
                cost,
                available,
            });
        }
        Ok(())
    }

    fn pay(&mut self, action: Action, cost: u32) -> Result<(), ActionRejection> {
        self.ensure_stamina(action, cost)?;
        self.resources.try_spend_stamina(cost);
        Ok(())
    }
}
