use crate::sim::battle::{BattleResult, Side};
use crate::sim::stat_stages::StatKey;
use crate::sim::status::Status;
use crate::sim::weather::Weather;
use serde::Serialize;
use serde_json::json;

/// Everything that happens in a battle, in the order it happened.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BattleEvent {
    BattleStart { player: String, opponent: String, wild: bool },
    Turn { number: u32 },
    SentOut { side: Side, who: String },
    Withdrew { who: String },
    UsedMove { who: String, move_name: String },
    OutOfMoves { who: String },
    Missed { who: String },
    NoEffect { target: String },
    SuperEffective,
    NotVeryEffective,
    CriticalHit,
    Damage { target: String, amount: u16, hp: u16, max_hp: u16 },
    HitTimes { hits: u8 },
    Endured { who: String, item: String },
    Recoil { who: String, amount: u16 },
    ItemDamage { who: String, item: String, amount: u16 },
    ItemHeal { who: String, item: String, amount: u16 },
    MovedFirst { who: String, item: String },
    StatusInflicted { target: String, status: Status },
    MoveFailed,
    StatusDamage { who: String, status: Status, amount: u16 },
    FullyParalyzed { who: String },
    FastAsleep { who: String },
    WokeUp { who: String },
    FrozenSolid { who: String },
    Thawed { who: String },
    StatChanged { who: String, stat: StatKey, stages: i8 },
    StatUnchanged { who: String, stat: StatKey, rising: bool },
    WeatherStarted { weather: Weather },
    WeatherCleared { weather: Weather },
    WeatherDamage { who: String, weather: Weather, amount: u16 },
    AbilityActivated { who: String, ability: String },
    Fainted { who: String },
    ExperienceGained { who: String, amount: u32 },
    BagItemUsed { item: String, target: String },
    Healed { who: String, amount: u16 },
    StatusCured { who: String, status: Status },
    RanAway,
    RunFailed,
    Captured { who: String },
    BrokeFree { who: String },
    Outcome { result: BattleResult },
}

impl BattleEvent {
    /// Player-facing English text for this event.
    pub fn narrate(&self) -> String {
        match self {
            BattleEvent::BattleStart { opponent, wild: true, .. } => format!("A wild {opponent} appeared!"),
            BattleEvent::BattleStart { player, opponent, wild: false } => {
                format!("{player} is challenged by {opponent}!")
            }
            BattleEvent::Turn { number } => format!("Turn {number}"),
            BattleEvent::SentOut { side: Side::Player, who } => format!("Go! {who}!"),
            BattleEvent::SentOut { who, .. } => format!("{who} was sent out!"),
            BattleEvent::Withdrew { who } => format!("{who}, come back!"),
            BattleEvent::UsedMove { who, move_name } => format!("{who} used {move_name}!"),
            BattleEvent::OutOfMoves { who } => format!("{who} has no moves left!"),
            BattleEvent::Missed { who } => format!("{who}'s attack missed!"),
            BattleEvent::NoEffect { target } => format!("It doesn't affect {target}..."),
            BattleEvent::SuperEffective => "It's super effective!".to_string(),
            BattleEvent::NotVeryEffective => "It's not very effective...".to_string(),
            BattleEvent::CriticalHit => "A critical hit!".to_string(),
            BattleEvent::Damage {
                target,
                amount,
                hp,
                max_hp,
            } => format!("{target} took {amount} damage ({hp}/{max_hp} HP)."),
            BattleEvent::HitTimes { hits } => format!("Hit {hits} time(s)!"),
            BattleEvent::Endured { who, item } => format!("{who} hung on using its {item}!"),
            BattleEvent::Recoil { who, amount } => format!("{who} is damaged by recoil! (-{amount} HP)"),
            BattleEvent::ItemDamage { who, item, amount } => {
                format!("{who} was hurt by the {item}! (-{amount} HP)")
            }
            BattleEvent::ItemHeal { who, item, amount } => {
                format!("{who} restored a little HP using its {item}! (+{amount} HP)")
            }
            BattleEvent::MovedFirst { who, item } => format!("{who}'s {item} let it move first!"),
            BattleEvent::StatusInflicted { target, status } => format!("{target} is {status}!"),
            BattleEvent::MoveFailed => "But it failed!".to_string(),
            BattleEvent::StatusDamage { who, status, amount } => {
                let cause = match status {
                    Status::Burn => "its burn",
                    _ => "poison",
                };
                format!("{who} is hurt by {cause}! (-{amount} HP)")
            }
            BattleEvent::FullyParalyzed { who } => format!("{who} is paralyzed! It can't move!"),
            BattleEvent::FastAsleep { who } => format!("{who} is fast asleep."),
            BattleEvent::WokeUp { who } => format!("{who} woke up!"),
            BattleEvent::FrozenSolid { who } => format!("{who} is frozen solid!"),
            BattleEvent::Thawed { who } => format!("{who} thawed out!"),
            BattleEvent::StatChanged { who, stat, stages } => {
                let how = match stages {
                    s if *s >= 2 => "rose sharply",
                    s if *s > 0 => "rose",
                    s if *s <= -2 => "harshly fell",
                    _ => "fell",
                };
                format!("{who}'s {stat} {how}!")
            }
            BattleEvent::StatUnchanged { who, stat, rising } => {
                let direction = if *rising { "higher" } else { "lower" };
                format!("{who}'s {stat} won't go any {direction}!")
            }
            BattleEvent::WeatherStarted { weather } => match weather {
                Weather::Rain => "It started to rain!".to_string(),
                Weather::Sun => "The sunlight turned harsh!".to_string(),
                Weather::Sandstorm => "A sandstorm kicked up!".to_string(),
                Weather::Hail => "It started to hail!".to_string(),
            },
            BattleEvent::WeatherCleared { weather } => match weather {
                Weather::Rain => "The rain stopped.".to_string(),
                Weather::Sun => "The harsh sunlight faded.".to_string(),
                Weather::Sandstorm => "The sandstorm subsided.".to_string(),
                Weather::Hail => "The hail stopped.".to_string(),
            },
            BattleEvent::WeatherDamage { who, weather, amount } => {
                format!("{who} is buffeted by the {weather}! (-{amount} HP)")
            }
            BattleEvent::AbilityActivated { who, ability } => format!("[{who}'s {ability}]"),
            BattleEvent::Fainted { who } => format!("{who} fainted!"),
            BattleEvent::ExperienceGained { who, amount } => {
                format!("{who} gained {amount} Exp. Points!")
            }
            BattleEvent::BagItemUsed { item, target } => format!("Used {item} on {target}."),
            BattleEvent::Healed { who, amount } => format!("{who} recovered {amount} HP."),
            BattleEvent::StatusCured { who, status } => format!("{who} is no longer {status}."),
            BattleEvent::RanAway => "Got away safely!".to_string(),
            BattleEvent::RunFailed => "Can't escape!".to_string(),
            BattleEvent::Captured { who } => format!("Gotcha! {who} was caught!"),
            BattleEvent::BrokeFree { who } => format!("Oh no! {who} broke free!"),
            BattleEvent::Outcome { result } => match result {
                BattleResult::PlayerWin => "You won the battle!".to_string(),
                BattleResult::OpponentWin => "You have no creatures left to fight! You blacked out...".to_string(),
                BattleResult::RanAway => "The battle is over.".to_string(),
                BattleResult::Captured => "The battle is over.".to_string(),
                BattleResult::Ongoing => "The battle continues.".to_string(),
            },
        }
    }
}

/// Effectiveness narration for a landed hit, if any.
pub fn effectiveness_event(multiplier: f64) -> Option<BattleEvent> {
    if multiplier > 1.0 {
        Some(BattleEvent::SuperEffective)
    } else if multiplier > 0.0 && multiplier < 1.0 {
        Some(BattleEvent::NotVeryEffective)
    } else {
        None
    }
}

/// Display name for a combatant on a given side.
pub fn ident(side: Side, species: &str) -> String {
    match side {
        Side::Player => species.to_string(),
        Side::Opponent => format!("The opposing {species}"),
    }
}

/// Append-only battle record.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BattleLog {
    events: Vec<BattleEvent>,
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events appended since `cursor`, for incremental rendering.
    pub fn since(&self, cursor: usize) -> &[BattleEvent] {
        &self.events[cursor.min(self.events.len())..]
    }

    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(BattleEvent::narrate).collect()
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "events": self.events,
            "lines": self.lines(),
        })
    }
}
