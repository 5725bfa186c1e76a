use creature_battle_core::battle_log::BattleEvent;
use creature_battle_core::prelude::*;
use creature_battle_core::sim::items::{HeldItem, ItemEffect};
use creature_battle_core::sim::progression::Progression;

fn make(name: &str, types: &[Type], speed: u16, moves: &[&str], registry: &Registry) -> Combatant {
    let slots = moves
        .iter()
        .map(|m| registry.move_slot(m).expect("known move"))
        .collect();
    Combatant::new(
        name,
        30,
        types.to_vec(),
        BaseStats {
            hp: 100,
            attack: 60,
            defense: 60,
            special: 60,
            speed,
        },
        slots,
    )
    .with_ability(registry.ability("Battle Armor").expect("known ability"))
}

fn session(player: Vec<Combatant>, opponent: Vec<Combatant>, config: BattleConfig, registry: &Registry) -> BattleSession {
    BattleSession::seeded(player, opponent, config, registry, 99).expect("valid rosters")
}

fn count(session: &BattleSession, pred: impl Fn(&BattleEvent) -> bool) -> usize {
    session.log().events().iter().filter(|e| pred(e)).count()
}

fn first_mover(session: &BattleSession) -> Option<String> {
    session.log().events().iter().find_map(|e| match e {
        BattleEvent::UsedMove { who, .. } => Some(who.clone()),
        _ => None,
    })
}

fn used_move_by(session: &BattleSession, name: &str) -> usize {
    count(session, |e| matches!(e, BattleEvent::UsedMove { who, .. } if who == name))
}

#[test]
fn construction_requires_a_healthy_member_on_each_side() {
    let registry = Registry::standard();
    let mut fainted = make("Ratling", &[Type::Normal], 50, &["Tackle"], &registry);
    fainted.current_hp = 0;
    let err = BattleSession::seeded(
        vec![make("Pyrofox", &[Type::Flame], 50, &["Ember"], &registry)],
        vec![fainted],
        BattleConfig::wild(),
        &registry,
        1,
    )
    .err()
    .expect("opponent has nobody to send out");
    assert_eq!(err, BattleError::Construction { side: Side::Opponent });
}

#[test]
fn opening_narrates_leads() {
    let registry = Registry::standard();
    let battle = session(
        vec![make("Pyrofox", &[Type::Flame], 50, &["Ember"], &registry)],
        vec![make("Ratling", &[Type::Normal], 50, &["Growl"], &registry)],
        BattleConfig::trainer(),
        &registry,
    );
    let lines = battle.log().lines();
    assert_eq!(lines[0], "Pyrofox is challenged by Ratling!");
    assert_eq!(lines[1], "The opposing Ratling was sent out!");
    assert_eq!(lines[2], "Go! Pyrofox!");
    assert_eq!(battle.turn(), 0);
    assert_eq!(battle.result(), BattleResult::Ongoing);
}

#[test]
fn sandstorm_from_a_move_clears_after_five_turns() {
    let registry = Registry::standard();
    let mut battle = session(
        vec![make("Pebblit", &[Type::Stone], 50, &["Sandstorm", "Growl"], &registry)],
        vec![make("Boulderoo", &[Type::Stone], 40, &["Growl"], &registry)],
        BattleConfig::trainer(),
        &registry,
    );

    battle.execute_turn(Action::Attack { move_index: 0 }).expect("legal");
    assert_eq!(battle.weather().current(), Some(Weather::Sandstorm));
    for _ in 2..=4 {
        battle.execute_turn(Action::Attack { move_index: 1 }).expect("legal");
        assert_eq!(battle.weather().current(), Some(Weather::Sandstorm));
    }
    battle.execute_turn(Action::Attack { move_index: 1 }).expect("legal");
    assert_eq!(battle.weather().current(), None);
    assert_eq!(
        count(&battle, |e| matches!(e, BattleEvent::WeatherCleared { weather: Weather::Sandstorm })),
        1
    );
    assert_eq!(count(&battle, |e| matches!(e, BattleEvent::WeatherDamage { .. })), 0);
}

#[test]
fn sandstorm_chips_creatures_without_immunity() {
    let registry = Registry::standard();
    let mut battle = session(
        vec![make("Pebblit", &[Type::Stone], 50, &["Sandstorm"], &registry)],
        vec![make("Ratling", &[Type::Normal], 40, &["Growl"], &registry)],
        BattleConfig::trainer(),
        &registry,
    );
    battle.execute_turn(Action::Attack { move_index: 0 }).expect("legal");
    assert_eq!(battle.active(Side::Opponent).current_hp, 100 - 100 / 16);
    assert_eq!(battle.active(Side::Player).current_hp, 100);
}

#[test]
fn weather_ability_sets_indefinite_weather_on_entry() {
    let registry = Registry::standard();
    let drizzler = make("Dropling", &[Type::Aqua], 50, &["Growl"], &registry)
        .with_ability(registry.ability("Drizzle").expect("known"));
    let battle = session(
        vec![make("Pyrofox", &[Type::Flame], 50, &["Ember"], &registry)],
        vec![drizzler],
        BattleConfig::wild(),
        &registry,
    );
    assert_eq!(battle.weather().current(), Some(Weather::Rain));
    assert_eq!(battle.weather().turns_remaining(), 0);
}

#[test]
fn intimidate_lowers_foe_attack_on_entry() {
    let registry = Registry::standard();
    let scary = make("Growlhound", &[Type::Shadow], 50, &["Bite"], &registry)
        .with_ability(registry.ability("Intimidate").expect("known"));
    let battle = session(
        vec![make("Pyrofox", &[Type::Flame], 50, &["Ember"], &registry)],
        vec![scary],
        BattleConfig::wild(),
        &registry,
    );
    assert_eq!(battle.stages().table(Side::Player).get(StatKey::Attack), -1);
    assert_eq!(battle.stages().table(Side::Opponent).get(StatKey::Attack), 0);
}

#[test]
fn switching_resets_stages_and_clears_choice_lock() {
    let registry = Registry::standard();
    let banded = make("Pyrofox", &[Type::Flame], 90, &["Swords Dance", "Growl"], &registry)
        .with_item(registry.item("Choice Band").expect("known"));
    let bench = make("Dropling", &[Type::Aqua], 50, &["Water Gun"], &registry);
    let mut battle = session(
        vec![banded, bench],
        vec![make("Ratling", &[Type::Normal], 40, &["Double Team"], &registry)],
        BattleConfig::trainer(),
        &registry,
    );

    battle.execute_turn(Action::Attack { move_index: 0 }).expect("legal");
    assert_eq!(battle.stages().table(Side::Player).get(StatKey::Attack), 2);
    assert_eq!(battle.active(Side::Player).locked_move_index(), Some(0));

    // The lock redirects the second selection back to Swords Dance.
    battle.execute_turn(Action::Attack { move_index: 1 }).expect("legal");
    assert_eq!(battle.stages().table(Side::Player).get(StatKey::Attack), 4);
    assert_eq!(battle.active(Side::Player).moves[1].pp, battle.active(Side::Player).moves[1].max_pp);

    battle.execute_turn(Action::Switch { roster_index: 1 }).expect("legal");
    assert_eq!(battle.active_index(Side::Player), 1);
    assert!(battle.stages().table(Side::Player).is_neutral());
    assert_eq!(battle.roster(Side::Player)[0].choice_lock, None);
    assert!(battle
        .log()
        .lines()
        .contains(&"Pyrofox, come back!".to_string()));
}

#[test]
fn invalid_actions_leave_state_untouched() {
    let registry = Registry::standard();
    let mut fainted = make("Sleepy", &[Type::Normal], 50, &["Tackle"], &registry);
    fainted.current_hp = 0;
    let mut drained = make("Pyrofox", &[Type::Flame], 50, &["Ember", "Growl"], &registry);
    drained.moves[0].pp = 0;
    let mut battle = session(
        vec![drained, fainted],
        vec![make("Ratling", &[Type::Normal], 40, &["Growl"], &registry)],
        BattleConfig::trainer(),
        &registry,
    );
    let log_len = battle.log().len();

    let rejected = [
        (
            Action::Attack { move_index: 4 },
            InvalidAction::MoveOutOfRange { index: 4, available: 2 },
        ),
        (
            Action::Attack { move_index: 0 },
            InvalidAction::NoPp { name: "Ember".into() },
        ),
        (
            Action::Switch { roster_index: 0 },
            InvalidAction::AlreadyActive { name: "Pyrofox".into() },
        ),
        (
            Action::Switch { roster_index: 1 },
            InvalidAction::Fainted { name: "Sleepy".into() },
        ),
        (
            Action::Switch { roster_index: 7 },
            InvalidAction::RosterOutOfRange { index: 7, size: 2 },
        ),
        (
            Action::UseItem {
                item: BagItem::POTION,
                roster_index: 0,
            },
            InvalidAction::NoEffect {
                item: "Potion".into(),
                name: "Pyrofox".into(),
            },
        ),
        (Action::Run, InvalidAction::CannotRun),
    ];
    for (action, expected) in rejected {
        let err = battle.execute_turn(action).expect_err("rejected");
        assert_eq!(err, BattleError::InvalidAction(expected));
    }
    assert_eq!(
        battle.try_capture(1.0).expect_err("trainer battle"),
        BattleError::InvalidAction(InvalidAction::CannotCapture)
    );

    assert_eq!(battle.turn(), 0);
    assert_eq!(battle.log().len(), log_len);
    assert_eq!(battle.roster(Side::Player)[0].moves[1].pp, 40);
    assert_eq!(battle.result(), BattleResult::Ongoing);
}

#[test]
fn out_of_pp_falls_back_to_struggle() {
    let registry = Registry::standard();
    let mut drained = make("Pyrofox", &[Type::Flame], 90, &["Ember"], &registry);
    drained.moves[0].pp = 0;
    let mut battle = session(
        vec![drained],
        vec![make("Ratling", &[Type::Normal], 40, &["Growl"], &registry)],
        BattleConfig::trainer(),
        &registry,
    );
    battle.execute_turn(Action::Attack { move_index: 0 }).expect("struggle is allowed");
    assert!(battle
        .log()
        .lines()
        .contains(&"Pyrofox used Struggle!".to_string()));
    assert!(battle.active(Side::Player).current_hp < 100);
}

#[test]
fn focus_sash_saves_once_then_experience_is_granted() {
    struct Tally(u32);
    impl Progression for Tally {
        fn experience_gained(&mut self, _combatant: &mut Combatant, amount: u32) {
            self.0 += amount;
        }
    }

    let registry = Registry::standard();
    let mut bruiser = make("Brawlbeast", &[Type::Brawl], 120, &["Tackle"], &registry);
    bruiser.level = 50;
    bruiser.stats.attack = 200;
    let mut sashed = make("Ratling", &[Type::Normal], 10, &["Growl"], &registry)
        .with_item(registry.item("Focus Sash").expect("known"));
    sashed.stats.hp = 10;
    sashed.current_hp = 10;
    sashed.stats.defense = 20;
    sashed.level = 12;

    let mut battle = session(vec![bruiser], vec![sashed], BattleConfig::trainer(), &registry)
        .with_progression(Box::new(Tally(0)));

    battle.execute_turn(Action::Attack { move_index: 0 }).expect("legal");
    assert_eq!(battle.active(Side::Opponent).current_hp, 1);
    assert!(battle.active(Side::Opponent).focus_sash_consumed);
    assert_eq!(battle.result(), BattleResult::Ongoing);

    let result = battle.execute_turn(Action::Attack { move_index: 0 }).expect("legal");
    assert_eq!(result, BattleResult::PlayerWin);
    assert_eq!(count(&battle, |e| matches!(e, BattleEvent::Endured { .. })), 1);
    assert_eq!(battle.active(Side::Player).experience, 600);
    assert!(battle
        .log()
        .lines()
        .contains(&"You won the battle!".to_string()));

    // Finished battles ignore further input.
    let log_len = battle.log().len();
    assert_eq!(
        battle.execute_turn(Action::Attack { move_index: 0 }),
        Ok(BattleResult::PlayerWin)
    );
    assert_eq!(battle.log().len(), log_len);
}

#[test]
fn fainted_opponent_is_replaced_by_next_member() {
    let registry = Registry::standard();
    let mut bruiser = make("Brawlbeast", &[Type::Brawl], 120, &["Tackle"], &registry);
    bruiser.level = 50;
    bruiser.stats.attack = 250;
    let mut frail = make("Ratling", &[Type::Normal], 10, &["Growl"], &registry);
    frail.current_hp = 1;
    let reserve = make("Pebblit", &[Type::Stone], 10, &["Growl"], &registry);
    let mut battle = session(vec![bruiser], vec![frail, reserve], BattleConfig::trainer(), &registry);

    let result = battle.execute_turn(Action::Attack { move_index: 0 }).expect("legal");
    assert_eq!(result, BattleResult::Ongoing);
    assert_eq!(battle.active_index(Side::Opponent), 1);
    assert!(battle
        .log()
        .lines()
        .contains(&"The opposing Pebblit was sent out!".to_string()));
}

#[test]
fn potion_heals_and_opponent_still_acts() {
    let registry = Registry::standard();
    let mut hurt = make("Pyrofox", &[Type::Flame], 50, &["Ember"], &registry);
    hurt.current_hp = 10;
    let mut battle = session(
        vec![hurt],
        vec![make("Ratling", &[Type::Normal], 40, &["Growl"], &registry)],
        BattleConfig::wild(),
        &registry,
    );
    battle
        .execute_turn(Action::UseItem {
            item: BagItem::POTION,
            roster_index: 0,
        })
        .expect("legal");
    assert_eq!(battle.active(Side::Player).current_hp, 30);
    assert_eq!(battle.stages().table(Side::Player).get(StatKey::Attack), -1);
}

#[test]
fn fast_runner_always_escapes_wild_battles() {
    let registry = Registry::standard();
    let mut battle = session(
        vec![make("Zipwing", &[Type::Gale], 200, &["Wing Attack"], &registry)],
        vec![make("Ratling", &[Type::Normal], 10, &["Growl"], &registry)],
        BattleConfig::wild(),
        &registry,
    );
    assert_eq!(battle.execute_turn(Action::Run), Ok(BattleResult::RanAway));
    assert!(battle.log().lines().contains(&"Got away safely!".to_string()));
}

#[test]
fn strong_ball_captures_wild_creature() {
    let registry = Registry::standard();
    let mut battle = session(
        vec![make("Pyrofox", &[Type::Flame], 50, &["Ember"], &registry)],
        vec![make("Ratling", &[Type::Normal], 10, &["Growl"], &registry)],
        BattleConfig::wild(),
        &registry,
    );
    assert_eq!(battle.try_capture(10.0), Ok(BattleResult::Captured));
    assert_eq!(battle.legal_actions(), Vec::new());
    let (_, opponent) = battle.into_rosters();
    assert_eq!(opponent[0].species, "Ratling");
}

#[test]
fn battle_scoped_flags_do_not_carry_into_the_next_battle() {
    let registry = Registry::standard();
    let mut bruiser = make("Brawlbeast", &[Type::Brawl], 200, &["Tackle", "Growl"], &registry)
        .with_item(registry.item("Choice Band").expect("known"));
    bruiser.level = 50;
    bruiser.stats.attack = 200;
    let mut sashed = make("Ratling", &[Type::Normal], 10, &["Growl"], &registry)
        .with_item(registry.item("Focus Sash").expect("known"));
    sashed.stats.hp = 10;
    sashed.current_hp = 10;
    sashed.stats.defense = 20;

    let mut first = session(vec![bruiser], vec![sashed], BattleConfig::wild(), &registry);
    first.execute_turn(Action::Attack { move_index: 0 }).expect("legal");
    assert_eq!(count(&first, |e| matches!(e, BattleEvent::Endured { .. })), 1);
    assert_eq!(first.execute_turn(Action::Run), Ok(BattleResult::RanAway));

    let (player, mut opponent) = first.into_rosters();
    assert_eq!(player[0].choice_lock.as_deref(), Some("Tackle"));
    assert!(opponent[0].focus_sash_consumed);
    opponent[0].current_hp = opponent[0].max_hp();

    let mut second = BattleSession::seeded(player, opponent, BattleConfig::wild(), &registry, 7).expect("valid rosters");
    assert_eq!(second.active(Side::Player).choice_lock, None);
    assert!(!second.active(Side::Opponent).focus_sash_consumed);
    assert_eq!(second.active(Side::Player).current_hp, 100);

    second.execute_turn(Action::Attack { move_index: 1 }).expect("legal");
    assert!(second.log().lines().contains(&"Brawlbeast used Growl!".to_string()));
    assert_eq!(second.active(Side::Player).choice_lock.as_deref(), Some("Growl"));
}

#[test]
fn priority_move_beats_faster_foe_and_knockout_cancels_its_reply() {
    let registry = Registry::standard();
    let mut striker = make("Pyrofox", &[Type::Flame], 10, &["Quick Attack"], &registry);
    striker.level = 50;
    striker.stats.attack = 250;
    let mut frail = make("Ratling", &[Type::Normal], 200, &["Tackle"], &registry);
    frail.current_hp = 1;
    let mut battle = session(vec![striker], vec![frail], BattleConfig::trainer(), &registry);

    let result = battle.execute_turn(Action::Attack { move_index: 0 }).expect("legal");
    assert_eq!(result, BattleResult::PlayerWin);
    assert_eq!(first_mover(&battle).as_deref(), Some("Pyrofox"));
    assert_eq!(used_move_by(&battle, "The opposing Ratling"), 0);
    assert_eq!(battle.active(Side::Player).current_hp, 100);
}

#[test]
fn faster_side_moves_first_and_knockout_cancels_slower_action() {
    let registry = Registry::standard();
    let mut frail = make("Pyrofox", &[Type::Flame], 10, &["Tackle"], &registry);
    frail.current_hp = 1;
    let mut striker = make("Ratling", &[Type::Normal], 200, &["Tackle"], &registry);
    striker.level = 50;
    striker.stats.attack = 250;
    let mut battle = session(vec![frail], vec![striker], BattleConfig::trainer(), &registry);

    let result = battle.execute_turn(Action::Attack { move_index: 0 }).expect("legal");
    assert_eq!(result, BattleResult::OpponentWin);
    assert_eq!(first_mover(&battle).as_deref(), Some("The opposing Ratling"));
    assert_eq!(used_move_by(&battle, "Pyrofox"), 0);
}

#[test]
fn quick_claw_overrides_speed_and_only_one_side_wins_the_roll() {
    let registry = Registry::standard();
    let claw = || HeldItem::new("Quick Claw", ItemEffect::QuickClaw { chance: 100 });
    let mut battle = session(
        vec![make("Pyrofox", &[Type::Flame], 10, &["Growl"], &registry).with_item(claw())],
        vec![make("Ratling", &[Type::Normal], 200, &["Growl"], &registry).with_item(claw())],
        BattleConfig::trainer(),
        &registry,
    );

    battle.execute_turn(Action::Attack { move_index: 0 }).expect("legal");
    assert_eq!(count(&battle, |e| matches!(e, BattleEvent::MovedFirst { .. })), 1);
    assert!(battle
        .log()
        .lines()
        .contains(&"Pyrofox's Quick Claw let it move first!".to_string()));
    assert_eq!(first_mover(&battle).as_deref(), Some("Pyrofox"));
}

#[test]
fn choice_scarf_and_paralysis_decide_speed_order() {
    let registry = Registry::standard();

    let mut scarfed = session(
        vec![make("Pyrofox", &[Type::Flame], 50, &["Growl"], &registry)
            .with_item(registry.item("Choice Scarf").expect("known"))],
        vec![make("Ratling", &[Type::Normal], 60, &["Growl"], &registry)],
        BattleConfig::trainer(),
        &registry,
    );
    assert_eq!(scarfed.effective_speed(Side::Player), 75);
    scarfed.execute_turn(Action::Attack { move_index: 0 }).expect("legal");
    assert_eq!(first_mover(&scarfed).as_deref(), Some("Pyrofox"));

    let mut paralyzed = make("Zipwing", &[Type::Gale], 100, &["Growl"], &registry);
    paralyzed.status = Some(Status::Paralysis);
    let mut slowed = session(
        vec![paralyzed],
        vec![make("Ratling", &[Type::Normal], 60, &["Growl"], &registry)],
        BattleConfig::trainer(),
        &registry,
    );
    assert_eq!(slowed.effective_speed(Side::Player), 25);
    slowed.execute_turn(Action::Attack { move_index: 0 }).expect("legal");
    assert_eq!(first_mover(&slowed).as_deref(), Some("The opposing Ratling"));
}

#[test]
fn speed_tie_is_settled_by_a_coin_flip() {
    let registry = Registry::standard();
    let mut player_first = 0;
    let mut opponent_first = 0;
    for seed in 0..40 {
        let mut battle = BattleSession::seeded(
            vec![make("Pyrofox", &[Type::Flame], 50, &["Growl"], &registry)],
            vec![make("Ratling", &[Type::Normal], 50, &["Growl"], &registry)],
            BattleConfig::trainer(),
            &registry,
            seed,
        )
        .expect("valid rosters");
        battle.execute_turn(Action::Attack { move_index: 0 }).expect("legal");
        match first_mover(&battle).as_deref() {
            Some("Pyrofox") => player_first += 1,
            Some(_) => opponent_first += 1,
            None => panic!("nobody moved"),
        }
    }
    assert!(player_first > 0);
    assert!(opponent_first > 0);
}
