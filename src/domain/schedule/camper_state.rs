use crate::domain::camper::TOP_CHOICES;
use crate::domain::catalog::{ClassCatalogEntry, ClassIndex};
use crate::domain::schedule::NUM_PERIODS;

/// A camper's seat in one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub class: ClassIndex,

    /// Placed beyond the instance cutoff.
    pub forced: bool,
}

/// Mutable per-trial state of one camper. Created fresh for every trial.
#[derive(Debug, Clone, Default)]
pub struct CamperState {
    /// Working set of resolved choices with their original ranks.
    pub buffer: Vec<(ClassIndex, usize)>,

    /// Best, middle, and worst-or-substitute choice.
    pub final_choices: [Option<ClassIndex>; TOP_CHOICES],

    /// Period (0-based) to class.
    pub periods: [Option<Placement>; NUM_PERIODS],
}

impl CamperState {
    pub fn num_enrolled(&self) -> usize {
        self.periods.iter().flatten().count()
    }

    /// Number of periods spent in `class`.
    pub fn periods_in(&self, class: ClassIndex) -> usize {
        self.periods.iter().flatten().filter(|p| p.class == class).count()
    }

    pub fn is_enrolled_in(&self, class: ClassIndex) -> bool {
        self.periods_in(class) > 0
    }

    pub fn is_free(&self, period: usize) -> bool {
        self.periods[period].is_none()
    }

    /// Whether one more period of `class` keeps the camper within its
    /// per-class limit (one period, two for double-period classes).
    pub fn can_join(&self, class: ClassIndex, entry: &ClassCatalogEntry) -> bool {
        let held = self.periods_in(class);
        held == 0 || (entry.double_period && held == 1)
    }

    pub fn within_class_limit(&self, class: ClassIndex, entry: &ClassCatalogEntry) -> bool {
        self.periods_in(class) <= if entry.double_period { 2 } else { 1 }
    }

    /// Periods without a class, earliest first.
    pub fn free_periods(&self) -> Vec<usize> {
        (0..NUM_PERIODS).filter(|&p| self.is_free(p)).collect()
    }

    pub fn final_choices(&self) -> impl Iterator<Item = ClassIndex> + '_ {
        self.final_choices.iter().flatten().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enrollment_counters() {
        let mut state = CamperState::default();
        assert_eq!(state.num_enrolled(), 0);
        assert_eq!(state.free_periods(), vec![0, 1, 2]);

        state.periods[0] = Some(Placement { class: 4, forced: false });
        state.periods[1] = Some(Placement { class: 4, forced: false });

        assert_eq!(state.num_enrolled(), 2);
        assert_eq!(state.periods_in(4), 2);
        assert!(state.is_enrolled_in(4));
        assert!(!state.is_free(1));
        assert_eq!(state.free_periods(), vec![2]);
    }
}
