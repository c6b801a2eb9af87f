use std::collections::BTreeSet;

use crate::domain::catalog::{Catalog, ClassCatalogEntry, ClassIndex};
use crate::domain::engine::trial_context::TrialContext;
use crate::domain::schedule::camper_state::CamperState;

/// Optional classes chosen by fewer campers than this are not offered.
pub const MIN_SUPPORTERS: usize = 5;

/// Outcome of the demand pass over first-round final choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemandPlan {
    /// Final-choice count per class.
    pub counts: Vec<usize>,
    pub eliminated: BTreeSet<ClassIndex>,

    /// Instances wanted per class. Zero for eliminated or unchosen classes.
    pub periods_needed: Vec<usize>,
}

impl DemandPlan {
    pub fn from_choices(catalog: &Catalog, campers: &[CamperState]) -> Self {
        let counts = tally(catalog, campers);

        let mut eliminated = BTreeSet::new();
        let mut periods_needed = vec![0; catalog.len()];
        for (class, entry) in catalog.iter() {
            let count = counts[class];
            if !entry.required && count < MIN_SUPPORTERS {
                log::debug!("Eliminating {} with {} supporters.", entry.title, count);
                eliminated.insert(class);
            } else if count > 0 {
                periods_needed[class] = periods_for(entry, count);
            }
        }

        DemandPlan { counts, eliminated, periods_needed }
    }

    pub fn total_periods(&self) -> usize {
        self.periods_needed.iter().sum()
    }

    pub fn apply(self, ctx: &mut TrialContext) {
        ctx.demand = self.counts;
        ctx.eliminated = self.eliminated;
        ctx.periods_needed = self.periods_needed;
    }
}

/// Number of campers naming each class among their final choices.
pub fn tally(catalog: &Catalog, campers: &[CamperState]) -> Vec<usize> {
    let mut counts = vec![0; catalog.len()];
    for class in campers.iter().flat_map(CamperState::final_choices) {
        counts[class] += 1;
    }
    counts
}

/// Instances a class needs for `count` interested campers.
pub fn periods_for(entry: &ClassCatalogEntry, count: usize) -> usize {
    let cutoff = entry.single_period_cutoff;
    if entry.double_period {
        2
    } else if count > 2 * cutoff {
        3
    } else if count > cutoff {
        2
    } else {
        1
    }
}
