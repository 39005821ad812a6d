//! One simulation step.
//!
//! ```text
//! snapshot -> per character: brain -> script commands -> evaluate -> regen
//!          -> resolve attacks -> remove the dead
//! ```
//!
//! Characters update in registry order against the same tick-start
//! snapshot. Attacks land only after every character has decided, so a
//! character killed this tick still gets its own action in.
use std::sync::Arc;

use tracing::{debug, trace, warn};

use skirmish_core::{ActionOutcome, AttackPlan, EntityHandle, KillEvent, mitigate};

use super::{Brain, Entity, SceneSnapshot, SceneView, SnapshotEntry, World};
use crate::events::{ScriptEvent, TickEvent, TickReport, WorldEvent};
use crate::script::{FaultAction, ScriptCommand, ScriptFault, ScriptFrame, signals};

impl World {
    /// Advances the clock by one tick and updates every character.
    ///
    /// The report carries everything that happened since the previous
    /// report, including spawns and commands issued between ticks.
    pub fn tick(&mut self) -> TickReport {
        self.clock += 1;
        let now = self.clock;
        let mut report = TickReport::new(now);
        report.events.append(&mut self.pending);

        let snapshot = Arc::new(self.capture_snapshot());
        let handles: Vec<EntityHandle> = self.characters().map(|(handle, _)| handle).collect();
        let mut attacks = Vec::new();
        for &handle in &handles {
            self.update_character(handle, &snapshot, &mut attacks);
        }
        self.resolve_attacks(attacks);
        if self.remove_dead {
            self.remove_dead_characters();
        }

        report.events.append(&mut self.pending);
        report.events.push(
            TickEvent::Completed {
                tick: now,
                characters: handles.len(),
            }
            .into(),
        );
        trace!(tick = %now, events = report.events.len(), "Tick completed");
        report
    }

    /// Runs `ticks` steps, collecting their reports.
    pub fn run(&mut self, ticks: u64) -> Vec<TickReport> {
        (0..ticks).map(|_| self.tick()).collect()
    }

    fn capture_snapshot(&self) -> SceneSnapshot {
        let mut snapshot = SceneSnapshot::new(self.clock);
        for (handle, entity) in &self.entities {
            snapshot.insert(SnapshotEntry {
                view: entity.view(handle),
                carried_by: entity.carried_by(),
            });
        }
        snapshot
    }

    fn update_character(
        &mut self,
        handle: EntityHandle,
        snapshot: &Arc<SceneSnapshot>,
        attacks: &mut Vec<(EntityHandle, AttackPlan)>,
    ) {
        let now = self.clock;
        let Some(character) = self.entities.get_mut(handle).and_then(Entity::as_character_mut)
        else {
            return;
        };
        if !character.state.is_alive() {
            return;
        }

        if let Some(target) = character.state.intent().target
            && !snapshot.is_live(target)
        {
            character.state.intent_mut().target = None;
            character.brain.raise(signals::TARGET_LOST);
        }

        let mut commands = Vec::new();
        match &mut character.brain {
            Brain::Passive => {}
            Brain::Controller(controller) => {
                if let Some(intent) = controller.decide(handle, &character.state, snapshot) {
                    *character.state.intent_mut() = intent;
                }
            }
            Brain::Script(host) => {
                let frame = ScriptFrame::new(
                    handle,
                    character.state.clone(),
                    Arc::clone(&self.rules),
                    Arc::clone(snapshot),
                );
                match host.run_turn(frame) {
                    Ok(Some(turn)) => {
                        character.state = turn.state;
                        commands = turn.commands;
                    }
                    Ok(None) => {}
                    Err(fault) => {
                        self.handle_fault(handle, fault);
                        return;
                    }
                }
            }
        }

        for command in commands {
            let result = match command {
                ScriptCommand::UseItem(item) => self.use_item(handle, item).map(drop),
                ScriptCommand::TakeItem(item) => self.take_item(handle, item),
            };
            if let Err(error) = result {
                debug!(entity = ?handle, ?command, %error, "Script command refused");
            }
        }

        let Some(character) = self.entities.get_mut(handle).and_then(Entity::as_character_mut)
        else {
            return;
        };
        let scene = SceneView::new(self.map.as_ref(), snapshot, &self.occupancy);
        match character.state.evaluate(handle, &scene, &self.rules) {
            Ok(ActionOutcome::Moved { from, to }) => {
                self.occupancy
                    .insert(handle, character.state.record().area());
                self.pending
                    .push(WorldEvent::Moved { handle, from, to }.into());
            }
            Ok(ActionOutcome::Attacked(plan)) => {
                attacks.push((handle, plan));
                self.pending.push(
                    WorldEvent::Attacked {
                        attacker: handle,
                        target: plan.target,
                        attack_type: plan.attack_type,
                        direction: plan.direction,
                    }
                    .into(),
                );
            }
            Ok(ActionOutcome::Idle | ActionOutcome::Blocked { .. }) => {}
            Err(rejection) => trace!(entity = ?handle, %rejection, "Action rejected"),
        }
        character.state.regen_stamina(now, &self.rules);
    }

    /// Applies the fault policy to a character whose script faulted.
    ///
    /// The character's state is whatever it was before the resume.
    fn handle_fault(&mut self, handle: EntityHandle, fault: ScriptFault) {
        let Some(character) = self.entities.get_mut(handle).and_then(Entity::as_character_mut)
        else {
            return;
        };
        let action = self.fault_policy.on_fault(&fault, character.reloads);
        warn!(entity = ?handle, %fault, %action, "Script faulted");
        self.pending.push(
            ScriptEvent::Faulted {
                handle,
                fault: fault.to_string(),
                action,
            }
            .into(),
        );

        let brain = std::mem::replace(&mut character.brain, Brain::Passive);
        if action == FaultAction::Disable {
            return;
        }
        let Brain::Script(host) = brain else {
            return;
        };
        match host.reload() {
            Ok(fresh) => {
                character.brain = Brain::Script(fresh);
                character.reloads += 1;
                debug!(entity = ?handle, reloads = character.reloads, "Script reloaded");
                self.pending.push(ScriptEvent::Reloaded { handle }.into());
            }
            Err(error) => {
                warn!(entity = ?handle, %error, "Script reload failed; character is passive");
                self.pending.push(
                    ScriptEvent::LoadFailed {
                        handle,
                        error: error.to_string(),
                    }
                    .into(),
                );
            }
        }
    }

    fn resolve_attacks(&mut self, attacks: Vec<(EntityHandle, AttackPlan)>) {
        let now = self.clock;
        for (attacker, plan) in attacks {
            let Some(target) = plan.target else {
                continue;
            };
            let Some(victim) = self.entities.get_mut(target).and_then(Entity::as_character_mut)
            else {
                continue;
            };
            if !victim.state.is_alive() {
                continue;
            }

            let amount = mitigate(
                plan.damage,
                plan.direction,
                victim.state.blocking_at(now),
                &self.rules,
            );
            let taken = victim.state.take_damage(amount);
            victim.brain.raise(signals::DAMAGED);
            self.pending.push(
                WorldEvent::Damaged {
                    target,
                    attacker,
                    amount: taken.dealt,
                    blocked: plan.damage - amount,
                    remaining: victim.state.hit_points(),
                }
                .into(),
            );

            if taken.killed {
                let kill = KillEvent {
                    victim: target,
                    killer: Some(attacker),
                    exp_value: victim.state.exp_value(&self.rules),
                };
                self.occupancy.remove(target);
                debug!(victim = ?target, killer = ?attacker, exp = kill.exp_value, "Character killed");
                self.pending.push(WorldEvent::Killed(kill).into());
                self.credit_kill(kill);
            }
        }
    }

    /// Hands the victim's experience to its killer.
    fn credit_kill(&mut self, kill: KillEvent) {
        let Some(killer) = kill.killer else {
            return;
        };
        let Some(character) = self.entities.get_mut(killer).and_then(Entity::as_character_mut)
        else {
            return;
        };
        let before = character.state.progression().level();
        character.state.gain_exp(kill.exp_value, &self.rules);
        let level = character.state.progression().level();
        if level > before {
            character.brain.raise(signals::LEVEL_UP);
            self.pending
                .push(WorldEvent::LeveledUp { handle: killer, level }.into());
        }
    }

    fn remove_dead_characters(&mut self) {
        let dead: Vec<EntityHandle> = self
            .characters()
            .filter(|(_, character)| !character.state.is_alive())
            .map(|(handle, _)| handle)
            .collect();
        for handle in dead {
            let _ = self.despawn(handle);
        }
    }
}
