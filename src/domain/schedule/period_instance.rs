use crate::domain::catalog::ClassIndex;
use crate::domain::roster::CamperIndex;

/// One offering of a class in one period.
#[derive(Debug, Clone)]
pub struct PeriodInstance {
    pub class: ClassIndex,

    /// 1-based period the instance runs in.
    pub period: u8,

    /// Enrollment cap taken from the class cutoff.
    pub cutoff: usize,

    /// Number of campers holding a seat. Kept equal to `roster.len()`.
    pub load: usize,

    /// Campers in enrollment order.
    pub roster: Vec<CamperIndex>,

    /// Number of campers placed beyond the cutoff.
    pub forced: usize,
}

impl PeriodInstance {
    pub fn new(class: ClassIndex, period: u8, cutoff: usize) -> Self {
        PeriodInstance { class, period, cutoff, load: 0, roster: Vec::new(), forced: 0 }
    }

    pub fn is_open(&self) -> bool {
        self.load < self.cutoff
    }

    pub fn contains(&self, camper: CamperIndex) -> bool {
        self.roster.contains(&camper)
    }

    /// Adds a camper, updating load and roster together.
    ///
    /// # Returns
    /// `true` if the camper was added;
    /// `false` if the camper was already present or the instance is full and `force` is off.
    pub fn insert_camper(&mut self, camper: CamperIndex, force: bool) -> bool {
        if self.contains(camper) {
            log::warn!("Camper #{} is already enrolled in class #{} during period {}. Load was not updated.", camper, self.class, self.period);
            return false;
        }

        let over_cutoff = !self.is_open();
        if over_cutoff && !force {
            log::error!(
                "Enrolling camper #{} exceeds the cutoff of class #{} in period {}. Load with request: {} Cutoff: {}",
                camper,
                self.class,
                self.period,
                self.load + 1,
                self.cutoff
            );
            return false;
        }

        self.roster.push(camper);
        self.load += 1;
        if over_cutoff {
            self.forced += 1;
        }
        true
    }
}
