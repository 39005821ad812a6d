//! Character state: the record tying stats, resources, progression and the
//! action machine together.
//!
//! A `CharacterState` is a plain value. It owns no interpreter and no scene
//! access; the runtime hands it a [`SceneOracle`](crate::env::SceneOracle)
//! when it needs one. Cloning it is how the script host works on a scratch
//! copy that is only written back if the script's turn succeeds.

use std::sync::Arc;

use crate::action::{ActionIntent, ActionMachine, ActionTimers};
use crate::config::RulesConfig;
use crate::entity::{EntityHandle, EntityRecord, Inventory, Item, ItemApplied, ItemError};
use crate::progression::{ExperiencePolicy, LevelUpError, Progression, policy_for};
use crate::state::{Action, AttackDirection, HitBox, ObjectType, Parameter, Position, Tick};
use crate::stats::{BaseStats, DamageTaken, DerivedStats, ParameterLevels, Resources};

/// Configuration a character is created from, and duplicated from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterTemplate {
    pub name: String,
    pub kind: ObjectType,
    pub hitbox: HitBox,
    pub stats: BaseStats,
    pub parameters: ParameterLevels,
    pub level: u32,
    pub skill_points: u32,
}

impl CharacterTemplate {
    /// Template with default stats and no parameter levels.
    pub fn named(name: impl Into<String>, kind: ObjectType) -> Self {
        Self {
            name: name.into(),
            kind,
            hitbox: HitBox::default(),
            stats: BaseStats::default(),
            parameters: ParameterLevels::default(),
            level: 1,
            skill_points: 0,
        }
    }
}

/// Kill credited to an attacker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KillEvent {
    pub victim: EntityHandle,
    pub killer: Option<EntityHandle>,
    /// Experience the victim is worth under its own policy.
    pub exp_value: u32,
}

#[derive(Clone, Debug)]
pub struct CharacterState {
    pub(crate) record: EntityRecord,
    pub(crate) base: BaseStats,
    pub(crate) parameters: ParameterLevels,
    pub(crate) resources: Resources,
    pub(crate) progression: Progression,
    pub(crate) intent: ActionIntent,
    pub(crate) machine: ActionMachine,
    pub(crate) inventory: Inventory,
    experience: Arc<dyn ExperiencePolicy>,
}

impl CharacterState {
    /// Creates a character at full HP and stamina, every timer ready at `now`.
    pub fn from_template(
        template: &CharacterTemplate,
        position: Position,
        rules: &RulesConfig,
        now: Tick,
    ) -> Self {
        let record = EntityRecord::new(
            template.name.clone(),
            template.kind,
            position,
            template.hitbox,
        );
        let stats = DerivedStats::new(&template.stats, &template.parameters, rules);
        let resources = Resources::full(stats.max_hit_points(), stats.max_stamina());
        let timers = ActionTimers::starting_at(now, stats.stamina_regen_interval());

        Self {
            record,
            base: template.stats,
            parameters: template.parameters,
            resources,
            progression: Progression::new(template.level, template.skill_points, &rules.level_curve),
            intent: ActionIntent::default(),
            machine: ActionMachine::new(timers),
            inventory: Inventory::new(rules.inventory_capacity),
            experience: policy_for(template.kind),
        }
    }

    /// Replaces the experience policy (Player vs. NPC rules by default).
    pub fn with_experience_policy(mut self, policy: Arc<dyn ExperiencePolicy>) -> Self {
        self.experience = policy;
        self
    }

    /// Fresh, independent copy seeded from the same configuration.
    ///
    /// Keeps name, kind, stats, parameters and progression; resets
    /// resources, timers and intent, and starts with an empty inventory.
    pub fn duplicate(&self, position: Position, rules: &RulesConfig, now: Tick) -> Self {
        let stats = self.stats(rules);
        let resources = Resources::full(stats.max_hit_points(), stats.max_stamina());
        let timers = ActionTimers::starting_at(now, stats.stamina_regen_interval());
        let mut record = self.record.clone();
        record.position = position;

        Self {
            record,
            base: self.base,
            parameters: self.parameters,
            resources,
            progression: self.progression,
            intent: ActionIntent::default(),
            machine: ActionMachine::new(timers),
            inventory: Inventory::new(self.inventory.capacity()),
            experience: Arc::clone(&self.experience),
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn record(&self) -> &EntityRecord {
        &self.record
    }

    pub fn position(&self) -> Position {
        self.record.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.record.position = position;
    }

    pub fn kind(&self) -> ObjectType {
        self.record.kind
    }

    pub fn base_stats(&self) -> &BaseStats {
        &self.base
    }

    pub fn parameters(&self) -> &ParameterLevels {
        &self.parameters
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn intent(&self) -> &ActionIntent {
        &self.intent
    }

    pub fn intent_mut(&mut self) -> &mut ActionIntent {
        &mut self.intent
    }

    pub fn machine(&self) -> &ActionMachine {
        &self.machine
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub fn stats<'a>(&'a self, rules: &'a RulesConfig) -> DerivedStats<'a> {
        DerivedStats::new(&self.base, &self.parameters, rules)
    }

    pub fn hit_points(&self) -> u32 {
        self.resources.hit_points()
    }

    pub fn stamina(&self) -> u32 {
        self.resources.stamina()
    }

    pub fn is_alive(&self) -> bool {
        self.resources.is_alive()
    }

    // ------------------------------------------------------------------
    // Resource economy
    // ------------------------------------------------------------------

    pub fn take_damage(&mut self, amount: u32) -> DamageTaken {
        self.resources.take_damage(amount)
    }

    /// Heals up to the effective maximum, returning HP restored.
    pub fn gain_hp(&mut self, amount: u32, rules: &RulesConfig) -> u32 {
        let max = self.stats(rules).max_hit_points();
        self.resources.gain_hp(amount, max)
    }

    /// Drains stamina outside the action machine (never below zero).
    pub fn drain_stamina(&mut self, amount: u32) -> u32 {
        self.resources.drain_stamina(amount)
    }

    /// Regenerates stamina if the regen timer elapsed and neither a block
    /// (this tick) nor an attack recovery is in progress.
    ///
    /// Returns the stamina restored.
    pub fn regen_stamina(&mut self, now: Tick, rules: &RulesConfig) -> u32 {
        if !self.is_alive() || now < self.machine.timers().next_stamina_regen() {
            return 0;
        }
        if !self.regen_enabled(now) {
            return 0;
        }
        let stats = self.stats(rules);
        let (amount, max, interval) = (
            stats.stamina_regen_amount(),
            stats.max_stamina(),
            stats.stamina_regen_interval(),
        );
        let restored = self.resources.restore_stamina(amount, max);
        self.machine
            .timers_mut()
            .schedule_stamina_regen(now + interval);
        restored
    }

    pub fn regen_enabled(&self, now: Tick) -> bool {
        self.machine.blocking_at(now).is_none() && !self.machine.is_mid_attack(now)
    }

    // ------------------------------------------------------------------
    // Progression
    // ------------------------------------------------------------------

    /// Receives experience scaled by this character's policy. Returns the
    /// amount actually banked.
    pub fn gain_exp(&mut self, amount: u32, rules: &RulesConfig) -> u32 {
        let scaled = self.experience.scale_gain(amount, &rules.experience);
        self.progression.gain_exp(scaled, &rules.level_curve);
        scaled
    }

    /// Experience granted to whoever kills this character.
    pub fn exp_value(&self, rules: &RulesConfig) -> u32 {
        self.experience
            .exp_value(self.progression.level(), &rules.experience)
    }

    pub fn parameter_level(&self, parameter: Parameter) -> u32 {
        self.parameters.get(parameter)
    }

    pub fn parameter_level_up_cost(&self, parameter: Parameter, rules: &RulesConfig) -> u32 {
        rules
            .parameter_cost
            .cost(parameter, self.parameters.get(parameter))
    }

    /// Spends skill points to raise `parameter` by one level.
    ///
    /// Returns the new level; with too few points nothing changes.
    pub fn level_up(&mut self, parameter: Parameter, rules: &RulesConfig) -> Result<u32, LevelUpError> {
        let cost = self.parameter_level_up_cost(parameter, rules);
        self.progression.spend_skill_points(parameter, cost)?;
        Ok(self.parameters.raise(parameter))
    }

    // ------------------------------------------------------------------
    // Action queries
    // ------------------------------------------------------------------

    /// Move cooldown elapsed and the current movement type is affordable.
    pub fn can_move(&self, now: Tick, rules: &RulesConfig) -> bool {
        self.is_alive()
            && now >= self.machine.timers().next_move()
            && self.stamina() >= self.stats(rules).move_stamina_cost(self.intent.movement_type)
    }

    /// Attack cooldown elapsed and the current attack type is affordable.
    pub fn can_attack(&self, now: Tick, rules: &RulesConfig) -> bool {
        self.is_alive()
            && now >= self.machine.timers().next_attack()
            && self.stamina() >= self.stats(rules).attack_stamina_cost(self.intent.attack_type)
    }

    /// Whether the currently requested action is waiting on its cooldown.
    pub fn is_on_cooldown(&self, now: Tick) -> bool {
        let timers = self.machine.timers();
        match self.intent.action {
            Action::Move => now < timers.next_move(),
            Action::Attack => now < timers.next_attack(),
            Action::Block | Action::Empty => false,
        }
    }

    pub fn blocking_at(&self, now: Tick) -> Option<AttackDirection> {
        self.machine.blocking_at(now)
    }

    // ------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------

    /// Uses a carried item on this character.
    ///
    /// Requires the item in the inventory, the item cooldown elapsed and
    /// enough stamina. On success the stamina cost is paid and the item
    /// cooldown restarts; on failure nothing changes.
    pub fn use_item(
        &mut self,
        handle: EntityHandle,
        item: &mut Item,
        now: Tick,
        rules: &RulesConfig,
    ) -> Result<ItemApplied, ItemError> {
        if !self.inventory.contains(handle) {
            return Err(ItemError::NotCarried);
        }
        if item.is_exhausted() {
            return Err(ItemError::Exhausted);
        }
        let ready_at = self.machine.timers().next_item_use();
        if now < ready_at {
            return Err(ItemError::OnCooldown { ready_at });
        }
        let available = self.stamina();
        if available < item.stamina_cost {
            return Err(ItemError::InsufficientStamina {
                cost: item.stamina_cost,
                available,
            });
        }

        let applied = item.apply(self, rules)?;
        self.resources.try_spend_stamina(item.stamina_cost);
        self.machine
            .timers_mut()
            .schedule_item_use(now + item.use_cooldown);
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionOutcome, ActionRejection};
    use crate::entity::ItemEffect;
    use crate::env::{EntityView, SceneOracle};
    use crate::state::{Direction, Rect};
    use slotmap::SlotMap;

    struct OpenScene {
        now: Tick,
        views: Vec<EntityView>,
    }

    impl SceneOracle for OpenScene {
        fn now(&self) -> Tick {
            self.now
        }

        fn is_passable(&self, _mover: EntityHandle, area: &Rect) -> bool {
            area.min.x >= 0 && area.min.y >= 0
        }

        fn observe(&self, handle: EntityHandle) -> Option<EntityView> {
            self.views.iter().find(|view| view.handle == handle).copied()
        }
    }

    fn handles(count: usize) -> Vec<EntityHandle> {
        let mut map: SlotMap<EntityHandle, ()> = SlotMap::with_key();
        (0..count).map(|_| map.insert(())).collect()
    }

    fn fighter(rules: &RulesConfig) -> CharacterState {
        let mut template = CharacterTemplate::named("fighter", ObjectType::Npc);
        template.stats = BaseStats {
            max_hit_points: 100,
            max_stamina: 30,
            damage: 10,
            speed: 2,
            attack_range: 5,
            move_cooldown: 2,
            attack_cooldown: 10,
            attack_stamina_cost: 10,
            move_stamina_cost: 1,
            block_stamina_cost: 3,
            sprint_stamina_cost: 2,
            ..BaseStats::default()
        };
        CharacterState::from_template(&template, Position::new(10, 10), rules, Tick::ZERO)
    }

    fn scene(now: u64) -> OpenScene {
        OpenScene {
            now: Tick(now),
            views: Vec::new(),
        }
    }

    #[test]
    fn attack_commits_iff_cooldown_and_stamina_allow() {
        let rules = RulesConfig::default();
        let ids = handles(2);
        let mut me = fighter(&rules);
        me.intent = ActionIntent::attacking(ids[1]);

        let first = me.evaluate(ids[0], &scene(0), &rules).unwrap();
        assert!(matches!(first, ActionOutcome::Attacked(_)));
        assert_eq!(me.stamina(), 20);
        assert_eq!(me.machine().timers().next_attack(), Tick(10));

        let early = me.evaluate(ids[0], &scene(5), &rules).unwrap_err();
        assert_eq!(
            early,
            ActionRejection::OnCooldown {
                action: Action::Attack,
                ready_at: Tick(10)
            }
        );
        assert_eq!(me.stamina(), 20);

        me.evaluate(ids[0], &scene(10), &rules).unwrap();
        me.evaluate(ids[0], &scene(20), &rules).unwrap();
        assert_eq!(me.stamina(), 0);

        let broke = me.evaluate(ids[0], &scene(30), &rules).unwrap_err();
        assert!(matches!(broke, ActionRejection::InsufficientStamina { .. }));
        assert_eq!(me.machine().timers().next_attack(), Tick(30));
        assert_eq!(me.machine().committed_at(), Some(Tick(20)));
    }

    #[test]
    fn repeated_evaluation_in_one_tick_pays_once() {
        let rules = RulesConfig::default();
        let ids = handles(1);
        let mut me = fighter(&rules);
        me.intent = ActionIntent::blocking(AttackDirection::Head);

        me.evaluate(ids[0], &scene(3), &rules).unwrap();
        let again = me.evaluate(ids[0], &scene(3), &rules).unwrap_err();
        assert_eq!(again, ActionRejection::AlreadyEvaluated { tick: Tick(3) });
        assert_eq!(me.stamina(), 27);
        assert_eq!(me.blocking_at(Tick(3)), Some(AttackDirection::Head));
        assert_eq!(me.blocking_at(Tick(4)), None);
    }

    #[test]
    fn move_follows_direction_scaled_by_speed() {
        let rules = RulesConfig::default();
        let ids = handles(1);
        let mut me = fighter(&rules);
        me.intent = ActionIntent::moving(Direction::Left);

        let outcome = me.evaluate(ids[0], &scene(0), &rules).unwrap();
        assert_eq!(
            outcome,
            ActionOutcome::Moved {
                from: Position::new(10, 10),
                to: Position::new(8, 10)
            }
        );
        assert_eq!(me.machine().timers().next_move(), Tick(2));

        me.intent.movement_type = crate::state::MovementType::Sprint;
        me.evaluate(ids[0], &scene(2), &rules).unwrap();
        assert_eq!(me.machine().timers().next_move(), Tick(3));
        assert_eq!(me.stamina(), 30 - 1 - 2);
    }

    #[test]
    fn blocked_or_directionless_move_changes_nothing() {
        let rules = RulesConfig::default();
        let ids = handles(1);
        let mut me = fighter(&rules);
        me.set_position(Position::new(1, 0));
        me.intent = ActionIntent::moving(Direction::Up);

        let blocked = me.evaluate(ids[0], &scene(0), &rules).unwrap_err();
        assert!(matches!(blocked, ActionRejection::Blocked { .. }));

        me.intent = ActionIntent::moving(Direction::Unknown);
        let lost = me.evaluate(ids[0], &scene(1), &rules).unwrap_err();
        assert_eq!(lost, ActionRejection::NoDirection);
        assert_eq!(me.position(), Position::new(1, 0));
        assert_eq!(me.stamina(), 30);
        assert_eq!(me.machine().committed_at(), None);
    }

    #[test]
    fn attack_only_targets_live_characters_in_range() {
        let rules = RulesConfig::default();
        let ids = handles(3);
        let mut me = fighter(&rules);
        let near = EntityView {
            handle: ids[1],
            kind: ObjectType::Player,
            position: Position::new(32, 10),
            area: HitBox::default().at(Position::new(32, 10)),
            alive: true,
        };
        let far = EntityView {
            handle: ids[2],
            position: Position::new(100, 10),
            area: HitBox::default().at(Position::new(100, 10)),
            ..near
        };
        let world = OpenScene {
            now: Tick(0),
            views: vec![near, far],
        };

        me.intent = ActionIntent::attacking(ids[1]);
        let ActionOutcome::Attacked(plan) = me.evaluate(ids[0], &world, &rules).unwrap() else {
            panic!("expected an attack");
        };
        assert_eq!(plan.target, Some(ids[1]));
        assert_eq!(plan.damage, 10);

        let world = OpenScene {
            now: Tick(10),
            ..world
        };
        me.intent.target = Some(ids[2]);
        let ActionOutcome::Attacked(plan) = me.evaluate(ids[0], &world, &rules).unwrap() else {
            panic!("expected an attack");
        };
        assert_eq!(plan.target, None);
    }

    #[test]
    fn regen_waits_for_interval_and_pauses_while_attacking() {
        let rules = RulesConfig::default();
        let ids = handles(2);
        let mut me = fighter(&rules);
        me.drain_stamina(20);

        assert_eq!(me.regen_stamina(Tick(9), &rules), 0);
        assert_eq!(me.regen_stamina(Tick(10), &rules), 5);
        assert_eq!(me.regen_stamina(Tick(15), &rules), 0);

        me.intent = ActionIntent::attacking(ids[1]);
        me.evaluate(ids[0], &scene(20), &rules).unwrap();
        assert_eq!(me.regen_stamina(Tick(20), &rules), 0);
        assert_eq!(me.regen_stamina(Tick(29), &rules), 0);
        assert_eq!(me.regen_stamina(Tick(30), &rules), 5);
        assert!(me.stamina() <= me.stats(&rules).max_stamina());
    }

    #[test]
    fn hp_stays_within_effective_bounds() {
        let rules = RulesConfig::default();
        let mut me = fighter(&rules);
        assert_eq!(me.gain_hp(50, &rules), 0);
        assert!(me.take_damage(250).killed);
        assert_eq!(me.hit_points(), 0);
        assert!(!me.is_alive());
    }

    #[test]
    fn level_up_spends_points_and_raises_parameter() {
        let rules = RulesConfig::default();
        let mut me = fighter(&rules);
        assert!(me.level_up(Parameter::HitPoints, &rules).is_err());

        me.gain_exp(100, &rules);
        assert_eq!(me.progression().skill_points(), 1);
        assert_eq!(me.level_up(Parameter::HitPoints, &rules), Ok(1));
        assert_eq!(me.stats(&rules).max_hit_points(), 110);
        assert_eq!(me.progression().skill_points(), 0);
        assert_eq!(me.hit_points(), 100);
    }

    #[test]
    fn item_use_gates_on_inventory_cooldown_and_stamina() {
        let rules = RulesConfig::default();
        let ids = handles(2);
        let mut me = fighter(&rules);
        me.take_damage(40);
        let mut potion = Item::new("potion", Position::ORIGIN, ItemEffect::Heal(15), 3)
            .with_use_cooldown(5)
            .with_stamina_cost(4);

        assert_eq!(
            me.use_item(ids[1], &mut potion, Tick(0), &rules),
            Err(ItemError::NotCarried)
        );
        me.inventory_mut().add(ids[1], potion.size).unwrap();

        let applied = me.use_item(ids[1], &mut potion, Tick(0), &rules).unwrap();
        assert_eq!(applied.healed, 15);
        assert_eq!(me.stamina(), 26);
        assert_eq!(
            me.use_item(ids[1], &mut potion, Tick(3), &rules),
            Err(ItemError::OnCooldown { ready_at: Tick(5) })
        );
        assert_eq!(potion.charges_left(), 2);
    }

    #[test]
    fn duplicate_shares_no_mutable_state() {
        let rules = RulesConfig::default();
        let ids = handles(2);
        let mut original = fighter(&rules);
        original.intent = ActionIntent::attacking(ids[1]);
        original.evaluate(ids[0], &scene(0), &rules).unwrap();

        let mut copy = original.duplicate(Position::new(50, 50), &rules, Tick(1));
        assert_eq!(copy.stamina(), 30);
        assert_eq!(copy.intent().action, Action::Empty);
        assert_eq!(copy.machine().timers().next_attack(), Tick(1));

        copy.take_damage(10);
        assert_eq!(original.hit_points(), 100);
    }

    #[test]
    fn player_is_worth_more_than_npc() {
        let rules = RulesConfig::default();
        let npc = fighter(&rules);
        let player = CharacterState::from_template(
            &CharacterTemplate::named("hero", ObjectType::Player),
            Position::ORIGIN,
            &rules,
            Tick::ZERO,
        );
        assert_eq!(npc.exp_value(&rules), 75);
        assert_eq!(player.exp_value(&rules), 100);
    }
}
