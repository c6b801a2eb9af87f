use serde::{Deserialize, Serialize};

use crate::domain::schedule::Schedule;

/// Cost of a seat in a required class, whatever its rank.
pub const REQUIRED_CLASS_COST: i64 = 3;

/// Weight of the enrollment spread between instances of one class.
pub const IMBALANCE_WEIGHT: i64 = 10;

/// Knobs of the scoring function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringPolicy {
    /// Whether the spread of required classes counts towards imbalance.
    pub balance_required_classes: bool,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        ScoringPolicy { balance_required_classes: true }
    }
}

/// Scores a schedule. Lower is better. Pure, so repeated calls agree.
pub fn evaluate(schedule: &Schedule, policy: ScoringPolicy) -> i64 {
    preference_cost(schedule) + IMBALANCE_WEIGHT * imbalance(schedule, policy)
}

/// Sum over every camper placement of the class rank, or the flat required cost.
pub fn preference_cost(schedule: &Schedule) -> i64 {
    let catalog = schedule.catalog();
    schedule
        .campers()
        .flat_map(|view| view.state.periods.iter().flatten().map(move |placement| (view, placement.class)))
        .map(|(view, class)| if catalog.get(class).required { REQUIRED_CLASS_COST } else { view.camper.rank_of(class) as i64 })
        .sum()
}

/// Sum over offered classes of the largest minus the smallest instance roster.
pub fn imbalance(schedule: &Schedule, policy: ScoringPolicy) -> i64 {
    let catalog = schedule.catalog();
    let mut total = 0;

    for (class, entry) in catalog.iter() {
        if schedule.is_eliminated(class) || (entry.required && !policy.balance_required_classes) {
            continue;
        }

        let loads = schedule.boards().iter().filter_map(|b| b.instance_of(class)).map(|i| i.load);
        let (min, max) = loads.fold((usize::MAX, 0), |(min, max), load| (min.min(load), max.max(load)));
        if min <= max {
            total += (max - min) as i64;
        }
    }

    total
}
