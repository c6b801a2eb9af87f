use crate::domain::catalog::ClassIndex;
use crate::domain::schedule::NUM_PERIODS;
use crate::domain::schedule::period_instance::PeriodInstance;

/// The class instances offered in one period.
#[derive(Debug, Clone)]
pub struct SlotBoard {
    /// 1-based period number.
    pub period: u8,

    /// Maximum number of instances this period may hold.
    pub budget: usize,
    pub instances: Vec<PeriodInstance>,
}

impl SlotBoard {
    pub fn new(period: u8, budget: usize) -> Self {
        SlotBoard { period, budget, instances: Vec::new() }
    }

    /// One board per period. `total` instances are split as evenly as
    /// possible, earlier periods take the remainder.
    pub fn boards_for(total: usize) -> [SlotBoard; NUM_PERIODS] {
        let base = total / NUM_PERIODS;
        let remainder = total % NUM_PERIODS;
        std::array::from_fn(|i| SlotBoard::new(i as u8 + 1, base + usize::from(i < remainder)))
    }

    pub fn open_slots(&self) -> usize {
        self.budget.saturating_sub(self.instances.len())
    }

    pub fn is_full(&self) -> bool {
        self.open_slots() == 0
    }

    pub fn contains_class(&self, class: ClassIndex) -> bool {
        self.instances.iter().any(|i| i.class == class)
    }

    pub fn instance_of(&self, class: ClassIndex) -> Option<&PeriodInstance> {
        self.instances.iter().find(|i| i.class == class)
    }

    pub fn position_of(&self, class: ClassIndex) -> Option<usize> {
        self.instances.iter().position(|i| i.class == class)
    }

    /// Adds an instance of `class`.
    ///
    /// # Returns
    /// `false` if the board is full or already offers the class.
    pub fn add_instance(&mut self, class: ClassIndex, cutoff: usize) -> bool {
        if self.is_full() {
            log::debug!("Period {} has no open slot left for class #{}.", self.period, class);
            return false;
        }
        if self.contains_class(class) {
            log::warn!("Period {} already offers class #{}.", self.period, class);
            return false;
        }

        self.instances.push(PeriodInstance::new(class, self.period, cutoff));
        true
    }

    pub fn remove_class(&mut self, class: ClassIndex) -> bool {
        match self.position_of(class) {
            Some(position) => {
                self.instances.remove(position);
                true
            }
            None => false,
        }
    }
}
