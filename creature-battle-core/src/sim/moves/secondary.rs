use crate::data::moves::{MoveData, StatChange};
use crate::sim::status::Status;
use rand::Rng;

fn roll_percent(chance: u8, rng: &mut impl Rng) -> bool {
    match chance {
        0 => false,
        c if c >= 100 => true,
        c => rng.gen_range(0..100) < c,
    }
}

/// The status this move inflicts on this use, if its chance comes up.
pub fn roll_status_inflict(move_data: &MoveData, rng: &mut impl Rng) -> Option<Status> {
    let inflict = move_data.status_effect?;
    roll_percent(inflict.chance, rng).then_some(inflict.status)
}

pub fn roll_stat_change(move_data: &MoveData, rng: &mut impl Rng) -> Option<StatChange> {
    let change = move_data.stat_change?;
    roll_percent(change.chance, rng).then_some(change)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::moves::{MoveCategory, StatTarget, StatusInflict};
    use crate::data::types::Type;
    use crate::sim::stat_stages::StatKey;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn guaranteed_effects_always_roll() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut wave = MoveData::new("Thunder Wave", Type::Volt, MoveCategory::Special, 0);
        wave.status_effect = Some(StatusInflict {
            status: Status::Paralysis,
            chance: 100,
        });
        assert!((0..20).all(|_| roll_status_inflict(&wave, &mut rng) == Some(Status::Paralysis)));
    }

    #[test]
    fn ten_percent_effects_are_rare() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut ember = MoveData::new("Ember", Type::Flame, MoveCategory::Special, 40);
        ember.status_effect = Some(StatusInflict {
            status: Status::Burn,
            chance: 10,
        });
        let burns = (0..2_000)
            .filter(|_| roll_status_inflict(&ember, &mut rng).is_some())
            .count();
        assert!((120..280).contains(&burns), "burns = {burns}");
    }

    #[test]
    fn moves_without_effects_roll_nothing() {
        let mut rng = SmallRng::seed_from_u64(1);
        let tackle = MoveData::new("Tackle", Type::Normal, MoveCategory::Physical, 40);
        assert_eq!(roll_status_inflict(&tackle, &mut rng), None);
        assert_eq!(roll_stat_change(&tackle, &mut rng), None);
    }

    #[test]
    fn stat_change_carries_target() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut growl = MoveData::new("Growl", Type::Normal, MoveCategory::Special, 0);
        growl.stat_change = Some(StatChange {
            target: StatTarget::Opponent,
            stat: StatKey::Attack,
            stages: -1,
            chance: 100,
        });
        let rolled = roll_stat_change(&growl, &mut rng).expect("guaranteed");
        assert_eq!(rolled.target, StatTarget::Opponent);
        assert_eq!(rolled.stages, -1);
    }
}
