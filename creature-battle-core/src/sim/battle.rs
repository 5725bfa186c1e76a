use crate::battle_log::{ident, BattleEvent, BattleLog};
use crate::data::moves::MoveData;
use crate::data::registry::Registry;
use crate::error::{BattleError, InvalidAction, Result};
use crate::sim::abilities::{has_intimidate, summoned_weather};
use crate::sim::ai::{BattleAI, RandomAI};
use crate::sim::combatant::Combatant;
use crate::sim::items::{self, EndOfTurnEffect};
use crate::sim::moves::{self, MoveChoice, MoveContext};
use crate::sim::progression::{experience_reward, NoProgression, Progression};
use crate::sim::stat_stages::{effective_stat, StatKey, StatStageEngine};
use crate::sim::status::{apply_status, cure_status, Status};
use crate::sim::switching::{self, SwitchKind};
use crate::sim::weather::{weather_residual_damage, WeatherEngine};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => f.write_str("player"),
            Side::Opponent => f.write_str("opponent"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleResult {
    Ongoing,
    PlayerWin,
    OpponentWin,
    RanAway,
    Captured,
}

impl BattleResult {
    pub fn is_terminal(self) -> bool {
        self != BattleResult::Ongoing
    }
}

/// Consumables from the player's bag.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BagItem {
    Potion { restores: u16 },
    StatusCure,
}

impl BagItem {
    pub const POTION: BagItem = BagItem::Potion { restores: 20 };
    pub const SUPER_POTION: BagItem = BagItem::Potion { restores: 50 };
    pub const FULL_HEAL: BagItem = BagItem::StatusCure;

    pub fn name(self) -> &'static str {
        match self {
            BagItem::Potion { restores } if restores >= 50 => "Super Potion",
            BagItem::Potion { .. } => "Potion",
            BagItem::StatusCure => "Full Heal",
        }
    }

    pub fn has_effect(self, target: &Combatant) -> bool {
        match self {
            BagItem::Potion { .. } => !target.at_full_hp(),
            BagItem::StatusCure => target.status.is_some(),
        }
    }
}

/// One player decision per turn.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Action {
    Attack { move_index: usize },
    Switch { roster_index: usize },
    UseItem { item: BagItem, roster_index: usize },
    Run,
}

fn default_can_run() -> bool {
    true
}

fn default_weather_move_turns() -> u8 {
    5
}

fn default_experience_per_level() -> u32 {
    50
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleConfig {
    #[serde(default)]
    pub wild: bool,
    #[serde(default = "default_can_run")]
    pub can_run: bool,
    /// Duration of weather set by moves; 0 lasts until replaced.
    #[serde(default = "default_weather_move_turns")]
    pub weather_move_turns: u8,
    #[serde(default = "default_experience_per_level")]
    pub experience_per_level: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            wild: false,
            can_run: default_can_run(),
            weather_move_turns: default_weather_move_turns(),
            experience_per_level: default_experience_per_level(),
        }
    }
}

impl BattleConfig {
    pub fn wild() -> Self {
        Self {
            wild: true,
            ..Self::default()
        }
    }

    pub fn trainer() -> Self {
        Self {
            can_run: false,
            ..Self::default()
        }
    }
}

/// Capture chance in percent for a given ball strength.
pub fn capture_chance(target: &Combatant, ball_strength: f64) -> f64 {
    let missing = 1.0 - f64::from(target.current_hp) / f64::from(target.max_hp().max(1));
    (missing * 50.0 + 10.0) * ball_strength
}

pub fn run_chance(player_speed: u32, opponent_speed: u32) -> i64 {
    (50 + i64::from(player_speed) - i64::from(opponent_speed)).clamp(10, 100)
}

/// A battle between the player's roster and an opponent's, resolved one turn
/// per call to [`BattleSession::execute_turn`].
pub struct BattleSession<R: Rng = SmallRng> {
    player: Vec<Combatant>,
    opponent: Vec<Combatant>,
    player_active: usize,
    opponent_active: usize,
    rewarded: Vec<bool>,
    stages: StatStageEngine,
    weather: WeatherEngine,
    log: BattleLog,
    result: BattleResult,
    config: BattleConfig,
    struggle: MoveData,
    turn: u32,
    rng: R,
    opponent_ai: Box<dyn BattleAI>,
    progression: Box<dyn Progression>,
}

impl BattleSession<SmallRng> {
    pub fn seeded(
        player: Vec<Combatant>,
        opponent: Vec<Combatant>,
        config: BattleConfig,
        registry: &Registry,
        seed: u64,
    ) -> Result<Self> {
        Self::new(player, opponent, config, registry, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> BattleSession<R> {
    /// Fails if either roster has nobody able to battle.
    pub fn new(
        mut player: Vec<Combatant>,
        mut opponent: Vec<Combatant>,
        config: BattleConfig,
        registry: &Registry,
        rng: R,
    ) -> Result<Self> {
        let player_active =
            switching::next_available(&player).ok_or(BattleError::Construction { side: Side::Player })?;
        let opponent_active =
            switching::next_available(&opponent).ok_or(BattleError::Construction { side: Side::Opponent })?;
        for member in player.iter_mut().chain(opponent.iter_mut()) {
            member.reset_battle_flags();
        }
        let rewarded = vec![false; opponent.len()];
        let mut session = Self {
            player,
            opponent,
            player_active,
            opponent_active,
            rewarded,
            stages: StatStageEngine::new(),
            weather: WeatherEngine::new(),
            log: BattleLog::new(),
            result: BattleResult::Ongoing,
            config,
            struggle: registry.struggle().clone(),
            turn: 0,
            rng,
            opponent_ai: Box::new(RandomAI),
            progression: Box::new(NoProgression),
        };
        session.open();
        Ok(session)
    }

    pub fn with_opponent_ai(mut self, ai: Box<dyn BattleAI>) -> Self {
        self.opponent_ai = ai;
        self
    }

    pub fn with_progression(mut self, progression: Box<dyn Progression>) -> Self {
        self.progression = progression;
        self
    }

    pub fn result(&self) -> BattleResult {
        self.result
    }

    pub fn log(&self) -> &BattleLog {
        &self.log
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn weather(&self) -> &WeatherEngine {
        &self.weather
    }

    pub fn stages(&self) -> &StatStageEngine {
        &self.stages
    }

    pub fn roster(&self, side: Side) -> &[Combatant] {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    pub fn active_index(&self, side: Side) -> usize {
        match side {
            Side::Player => self.player_active,
            Side::Opponent => self.opponent_active,
        }
    }

    pub fn active(&self, side: Side) -> &Combatant {
        &self.roster(side)[self.active_index(side)]
    }

    /// Hands both rosters back for the save layer.
    pub fn into_rosters(self) -> (Vec<Combatant>, Vec<Combatant>) {
        (self.player, self.opponent)
    }

    /// Every action [`BattleSession::execute_turn`] would accept right now, bag items aside.
    pub fn legal_actions(&self) -> Vec<Action> {
        if self.result.is_terminal() {
            return Vec::new();
        }
        let active = self.active(Side::Player);
        let mut actions: Vec<Action> = if active.locked_move_index().is_some() || !active.has_usable_move() {
            vec![Action::Attack { move_index: 0 }]
        } else {
            active
                .moves
                .iter()
                .enumerate()
                .filter_map(|(idx, slot)| slot.has_pp().then_some(Action::Attack { move_index: idx }))
                .collect()
        };
        actions.extend(
            switching::switch_targets(&self.player, self.player_active)
                .into_iter()
                .map(|roster_index| Action::Switch { roster_index }),
        );
        if self.config.wild && self.config.can_run {
            actions.push(Action::Run);
        }
        actions
    }

    /// Resolves one full turn. Illegal actions are rejected before anything changes.
    pub fn execute_turn(&mut self, action: Action) -> Result<BattleResult> {
        if self.result.is_terminal() {
            return Ok(self.result);
        }
        if let Err(invalid) = self.validate(&action) {
            warn!(%invalid, ?action, "rejected action");
            return Err(invalid.into());
        }

        self.begin_turn();
        match action {
            Action::Run => {
                if self.attempt_run() {
                    return Ok(self.result);
                }
                self.opponent_free_turn();
            }
            Action::Switch { roster_index } => {
                self.switch_in(Side::Player, roster_index, SwitchKind::Voluntary);
                self.opponent_free_turn();
            }
            Action::UseItem { item, roster_index } => {
                self.use_bag_item(item, roster_index);
                self.opponent_free_turn();
            }
            Action::Attack { move_index } => {
                let choice = self.player_choice(move_index);
                self.resolve_attacks(choice);
            }
        }
        self.end_turn();
        Ok(self.result)
    }

    /// Throws a ball at the wild opponent. A failed throw costs the turn.
    pub fn try_capture(&mut self, ball_strength: f64) -> Result<BattleResult> {
        if self.result.is_terminal() {
            return Ok(self.result);
        }
        if !self.config.wild {
            warn!("capture attempted outside a wild battle");
            return Err(InvalidAction::CannotCapture.into());
        }

        self.begin_turn();
        let target = &self.opponent[self.opponent_active];
        let who = ident(Side::Opponent, &target.species);
        let chance = capture_chance(target, ball_strength);
        let roll: f64 = self.rng.gen_range(0.0..100.0);
        debug!(chance, roll, "capture roll");
        if roll < chance {
            self.log.push(BattleEvent::Captured { who });
            self.finish(BattleResult::Captured);
            return Ok(self.result);
        }
        self.log.push(BattleEvent::BrokeFree { who });
        self.opponent_free_turn();
        self.end_turn();
        Ok(self.result)
    }

    fn open(&mut self) {
        let player_lead = self.player[self.player_active].species.clone();
        let opponent_lead = self.opponent[self.opponent_active].species.clone();
        self.log.push(BattleEvent::BattleStart {
            player: player_lead.clone(),
            opponent: opponent_lead.clone(),
            wild: self.config.wild,
        });
        if !self.config.wild {
            self.log.push(BattleEvent::SentOut {
                side: Side::Opponent,
                who: ident(Side::Opponent, &opponent_lead),
            });
        }
        self.log.push(BattleEvent::SentOut {
            side: Side::Player,
            who: ident(Side::Player, &player_lead),
        });
        self.on_entry(Side::Player);
        self.on_entry(Side::Opponent);
    }

    fn validate(&self, action: &Action) -> std::result::Result<(), InvalidAction> {
        match *action {
            Action::Attack { move_index } => {
                let active = self.active(Side::Player);
                if active.moves.is_empty() {
                    return Ok(());
                }
                let slot = active.moves.get(move_index).ok_or(InvalidAction::MoveOutOfRange {
                    index: move_index,
                    available: active.moves.len(),
                })?;
                if active.locked_move_index().is_none() && !slot.has_pp() && active.has_usable_move() {
                    return Err(InvalidAction::NoPp {
                        name: slot.name().to_string(),
                    });
                }
                Ok(())
            }
            Action::Switch { roster_index } => {
                switching::validate_switch(&self.player, self.player_active, roster_index)
            }
            Action::UseItem { item, roster_index } => {
                let target = self.player.get(roster_index).ok_or(InvalidAction::RosterOutOfRange {
                    index: roster_index,
                    size: self.player.len(),
                })?;
                if target.is_fainted() {
                    return Err(InvalidAction::Fainted {
                        name: target.species.clone(),
                    });
                }
                if !item.has_effect(target) {
                    return Err(InvalidAction::NoEffect {
                        item: item.name().to_string(),
                        name: target.species.clone(),
                    });
                }
                Ok(())
            }
            Action::Run => {
                if self.config.wild && self.config.can_run {
                    Ok(())
                } else {
                    Err(InvalidAction::CannotRun)
                }
            }
        }
    }

    fn begin_turn(&mut self) {
        self.turn += 1;
        debug!(turn = self.turn, "turn start");
        self.log.push(BattleEvent::Turn { number: self.turn });
    }

    /// The locked move overrides the selection; an empty slot falls back to Struggle.
    fn player_choice(&self, move_index: usize) -> MoveChoice {
        let active = self.active(Side::Player);
        let index = active.locked_move_index().unwrap_or(move_index);
        match active.moves.get(index) {
            Some(slot) if slot.has_pp() => MoveChoice::Slot(index),
            _ => MoveChoice::Struggle,
        }
    }

    fn opponent_choice(&mut self) -> MoveChoice {
        let active = &self.opponent[self.opponent_active];
        self.opponent_ai.choose_move(active, &mut self.rng)
    }

    fn move_priority(&self, side: Side, choice: MoveChoice) -> i8 {
        match choice {
            MoveChoice::Slot(index) => self
                .active(side)
                .moves
                .get(index)
                .map(|slot| slot.data.priority)
                .unwrap_or(0),
            MoveChoice::Struggle => self.struggle.priority,
        }
    }

    /// Speed used for turn order and escape odds.
    pub fn effective_speed(&self, side: Side) -> u32 {
        let active = self.active(side);
        let stage = self.stages.table(side).get(StatKey::Speed);
        let mut speed = f64::from(effective_stat(active, StatKey::Speed, stage, self.weather.current()));
        speed *= items::speed_modifier(active);
        if active.status == Some(Status::Paralysis) {
            speed *= 0.25;
        }
        (speed.floor() as u32).max(1)
    }

    fn determine_order(&mut self, player_choice: MoveChoice, opponent_choice: MoveChoice) -> Side {
        for side in [Side::Player, Side::Opponent] {
            let active = match side {
                Side::Player => &self.player[self.player_active],
                Side::Opponent => &self.opponent[self.opponent_active],
            };
            if items::quick_claw_activates(active, &mut self.rng) {
                self.log.push(BattleEvent::MovedFirst {
                    who: ident(side, &active.species),
                    item: active.item_name().to_string(),
                });
                return side;
            }
        }

        let player_priority = self.move_priority(Side::Player, player_choice);
        let opponent_priority = self.move_priority(Side::Opponent, opponent_choice);
        if player_priority != opponent_priority {
            return if player_priority > opponent_priority {
                Side::Player
            } else {
                Side::Opponent
            };
        }

        let player_speed = self.effective_speed(Side::Player);
        let opponent_speed = self.effective_speed(Side::Opponent);
        debug!(player_speed, opponent_speed, "speed check");
        match player_speed.cmp(&opponent_speed) {
            std::cmp::Ordering::Greater => Side::Player,
            std::cmp::Ordering::Less => Side::Opponent,
            std::cmp::Ordering::Equal => {
                if self.rng.gen_bool(0.5) {
                    Side::Player
                } else {
                    Side::Opponent
                }
            }
        }
    }

    fn resolve_attacks(&mut self, player_choice: MoveChoice) {
        let opponent_choice = self.opponent_choice();
        let first = self.determine_order(player_choice, opponent_choice);
        debug!(?first, ?player_choice, ?opponent_choice, "turn order");
        for (position, side) in [first, first.opposite()].into_iter().enumerate() {
            if position == 1 && (self.active(side).is_fainted() || self.active(side.opposite()).is_fainted()) {
                debug!(?side, "second action skipped");
                break;
            }
            let choice = match side {
                Side::Player => player_choice,
                Side::Opponent => opponent_choice,
            };
            self.perform_move(side, choice);
        }
    }

    fn opponent_free_turn(&mut self) {
        if self.active(Side::Opponent).is_fainted() || self.active(Side::Player).is_fainted() {
            return;
        }
        let choice = self.opponent_choice();
        self.perform_move(Side::Opponent, choice);
    }

    fn perform_move(&mut self, side: Side, choice: MoveChoice) {
        let player = &mut self.player[self.player_active];
        let opponent = &mut self.opponent[self.opponent_active];
        let (actor, target) = match side {
            Side::Player => (player, opponent),
            Side::Opponent => (opponent, player),
        };
        let mut ctx = MoveContext {
            actor_side: side,
            stages: &mut self.stages,
            weather: &mut self.weather,
            log: &mut self.log,
            rng: &mut self.rng,
            weather_turns: self.config.weather_move_turns,
            struggle: &self.struggle,
        };
        let result = moves::execute_move(actor, target, choice, &mut ctx);
        debug!(?side, ?result, "move resolved");
    }

    fn attempt_run(&mut self) -> bool {
        let chance = run_chance(
            self.effective_speed(Side::Player),
            self.effective_speed(Side::Opponent),
        );
        let roll = self.rng.gen_range(0..100);
        debug!(chance, roll, "escape roll");
        if roll < chance {
            self.log.push(BattleEvent::RanAway);
            self.finish(BattleResult::RanAway);
            true
        } else {
            self.log.push(BattleEvent::RunFailed);
            false
        }
    }

    fn use_bag_item(&mut self, item: BagItem, roster_index: usize) {
        let target = &mut self.player[roster_index];
        let who = ident(Side::Player, &target.species);
        self.log.push(BattleEvent::BagItemUsed {
            item: item.name().to_string(),
            target: who.clone(),
        });
        match item {
            BagItem::Potion { restores } => {
                let amount = target.heal(restores);
                self.log.push(BattleEvent::Healed { who, amount });
            }
            BagItem::StatusCure => {
                if let Some(status) = target.status {
                    cure_status(target);
                    self.log.push(BattleEvent::StatusCured { who, status });
                }
            }
        }
    }

    fn switch_in(&mut self, side: Side, index: usize, kind: SwitchKind) {
        let (roster, active) = match side {
            Side::Player => (&mut self.player, &mut self.player_active),
            Side::Opponent => (&mut self.opponent, &mut self.opponent_active),
        };
        let outgoing = &mut roster[*active];
        items::clear_choice_lock(outgoing);
        if kind == SwitchKind::Voluntary {
            self.log.push(BattleEvent::Withdrew {
                who: ident(side, &outgoing.species),
            });
        }
        *active = index;
        self.stages.reset_stages(side);
        self.log.push(BattleEvent::SentOut {
            side,
            who: ident(side, &roster[index].species),
        });
        debug!(?side, index, ?kind, "switch in");
        self.on_entry(side);
    }

    fn on_entry(&mut self, side: Side) {
        let player = &self.player[self.player_active];
        let opponent = &self.opponent[self.opponent_active];
        let (entrant, foe) = match side {
            Side::Player => (player, opponent),
            Side::Opponent => (opponent, player),
        };
        if entrant.is_fainted() {
            return;
        }
        let who = ident(side, &entrant.species);

        if let Some(weather) = summoned_weather(entrant) {
            if self.weather.current() != Some(weather) || self.weather.turns_remaining() != 0 {
                self.log.push(BattleEvent::AbilityActivated {
                    who: who.clone(),
                    ability: entrant.ability_name().to_string(),
                });
                self.weather.set_weather(weather, 0, &mut self.log);
            }
        }

        if has_intimidate(entrant) && !foe.is_fainted() {
            self.log.push(BattleEvent::AbilityActivated {
                who,
                ability: entrant.ability_name().to_string(),
            });
            let foe_side = side.opposite();
            let foe_name = ident(foe_side, &foe.species);
            self.stages
                .modify_stage(foe_side, StatKey::Attack, -1, foe, &foe_name, &mut self.log);
        }
    }

    fn active_parts(&mut self, side: Side) -> (&mut Combatant, &mut BattleLog, &mut R) {
        let active = match side {
            Side::Player => &mut self.player[self.player_active],
            Side::Opponent => &mut self.opponent[self.opponent_active],
        };
        (active, &mut self.log, &mut self.rng)
    }

    fn end_turn(&mut self) {
        self.handle_faints();
        self.weather_phase();
        self.item_phase();
        self.handle_faints();
        self.check_terminal();
    }

    fn weather_phase(&mut self) {
        let weather = self.weather.current();
        for side in [Side::Player, Side::Opponent] {
            let (active, log, _) = self.active_parts(side);
            let Some((amount, kind)) = weather_residual_damage(active, weather) else {
                continue;
            };
            let who = ident(side, &active.species);
            let lost = active.take_damage(amount);
            log.push(BattleEvent::WeatherDamage {
                who: who.clone(),
                weather: kind,
                amount: lost,
            });
            if active.is_fainted() {
                log.push(BattleEvent::Fainted { who });
            }
        }
        self.weather.tick(&mut self.log);
    }

    fn item_phase(&mut self) {
        for side in [Side::Player, Side::Opponent] {
            let (active, log, rng) = self.active_parts(side);
            match items::end_of_turn_effect(active) {
                Some(EndOfTurnEffect::Heal(amount)) => {
                    let gained = active.heal(amount);
                    log.push(BattleEvent::ItemHeal {
                        who: ident(side, &active.species),
                        item: active.item_name().to_string(),
                        amount: gained,
                    });
                }
                Some(EndOfTurnEffect::InflictStatus(status)) => {
                    apply_status(active, status, rng);
                }
                None => {}
            }
        }
    }

    /// Rewards a fainted opponent and brings in replacements on both sides.
    fn handle_faints(&mut self) {
        if self.opponent[self.opponent_active].is_fainted() && !self.rewarded[self.opponent_active] {
            self.rewarded[self.opponent_active] = true;
            self.grant_experience();
        }
        for side in [Side::Player, Side::Opponent] {
            if !self.active(side).is_fainted() {
                continue;
            }
            if let Some(next) = switching::next_available(self.roster(side)) {
                self.switch_in(side, next, SwitchKind::Forced);
            }
        }
    }

    fn grant_experience(&mut self) {
        let defeated_level = self.opponent[self.opponent_active].level;
        let winner = &mut self.player[self.player_active];
        if winner.is_fainted() {
            return;
        }
        let amount = experience_reward(defeated_level, self.config.experience_per_level);
        winner.experience = winner.experience.saturating_add(amount);
        self.log.push(BattleEvent::ExperienceGained {
            who: ident(Side::Player, &winner.species),
            amount,
        });
        self.progression.experience_gained(winner, amount);
    }

    fn check_terminal(&mut self) {
        let result = if !switching::has_available(&self.player) {
            BattleResult::OpponentWin
        } else if !switching::has_available(&self.opponent) {
            BattleResult::PlayerWin
        } else {
            return;
        };
        self.finish(result);
    }

    fn finish(&mut self, result: BattleResult) {
        if self.result.is_terminal() {
            return;
        }
        info!(?result, turn = self.turn, "battle over");
        self.result = result;
        self.log.push(BattleEvent::Outcome { result });
    }
}
