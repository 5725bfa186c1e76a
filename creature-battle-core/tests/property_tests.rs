use creature_battle_core::data::types::type_effectiveness;
use creature_battle_core::prelude::*;
use creature_battle_core::sim::damage::{calculate_damage, DamageContext};
use creature_battle_core::sim::stat_stages::{effective_stat, StatStageTable};
use proptest::prelude::*;

fn any_type() -> impl Strategy<Value = Type> {
    prop::sample::select(Type::ALL.to_vec())
}

fn any_weather() -> impl Strategy<Value = Option<Weather>> {
    prop::option::of(prop::sample::select(vec![
        Weather::Rain,
        Weather::Sun,
        Weather::Sandstorm,
        Weather::Hail,
    ]))
}

fn make(ty: Type, level: u8, attack: u16, defense: u16) -> Combatant {
    Combatant::new(
        "Testling",
        level,
        vec![ty],
        BaseStats {
            hp: 100,
            attack,
            defense,
            special: attack,
            speed: 50,
        },
        Vec::new(),
    )
}

proptest! {
    #[test]
    fn effective_stat_never_drops_below_one(
        base in 1u16..=500,
        stage in -6i8..=6,
        weather in any_weather(),
    ) {
        let mon = make(Type::Normal, 50, base, base);
        for stat in StatKey::ALL {
            prop_assert!(effective_stat(&mon, stat, stage, weather) >= 1);
        }
    }

    #[test]
    fn damage_is_at_least_one_unless_immune(
        attacker_type in any_type(),
        defender_type in any_type(),
        move_type in any_type(),
        level in 1u8..=100,
        attack in 1u16..=400,
        defense in 1u16..=400,
        power in 1u16..=250,
        physical in any::<bool>(),
        critical in any::<bool>(),
        weather in any_weather(),
        random_factor in 0.85f64..=1.0,
    ) {
        let attacker = make(attacker_type, level, attack, defense);
        let defender = make(defender_type, level, attack, defense);
        let category = if physical { MoveCategory::Physical } else { MoveCategory::Special };
        let move_data = MoveData::new("Strike", move_type, category, power);
        let stages = StatStageTable::default();
        let ctx = DamageContext {
            attacker: &attacker,
            defender: &defender,
            move_data: &move_data,
            attacker_stages: &stages,
            defender_stages: &stages,
            weather,
            critical,
        };
        let damage = calculate_damage(&ctx, random_factor);
        if type_effectiveness(move_type, &defender.types) == 0.0 {
            prop_assert_eq!(damage, 0);
        } else {
            prop_assert!(damage >= 1);
        }
    }
}
