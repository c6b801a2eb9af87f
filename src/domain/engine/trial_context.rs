use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::catalog::{Catalog, ClassIndex};
use crate::domain::engine::evaluator::ScoringPolicy;
use crate::domain::roster::{CamperIndex, Roster};
use crate::domain::schedule::camper_state::{CamperState, Placement};
use crate::domain::schedule::slot_board::SlotBoard;
use crate::domain::schedule::{NUM_PERIODS, Schedule};

/// Whether an enrollment may go beyond the instance cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollMode {
    RespectCutoff,
    AllowForced,
}

/// Address of one period instance: board (0-based period) and position on it.
pub type InstanceRef = (usize, usize);

/// All mutable state of a single trial. Nothing here outlives the trial
/// except through [`TrialContext::into_schedule`].
#[derive(Debug)]
pub struct TrialContext {
    pub catalog: Arc<Catalog>,
    pub roster: Arc<Roster>,

    /// Camper processing order for this trial.
    pub order: Vec<CamperIndex>,
    pub campers: Vec<CamperState>,
    pub eliminated: BTreeSet<ClassIndex>,

    /// Final-choice count per class.
    pub demand: Vec<usize>,

    /// Instances wanted per class, then the number actually placed.
    pub periods_needed: Vec<usize>,
    pub boards: [SlotBoard; NUM_PERIODS],
}

impl TrialContext {
    pub fn new(catalog: Arc<Catalog>, roster: Arc<Roster>, order: Vec<CamperIndex>) -> Self {
        let classes = catalog.len();
        let campers = vec![CamperState::default(); roster.len()];

        TrialContext {
            catalog,
            roster,
            order,
            campers,
            eliminated: BTreeSet::new(),
            demand: vec![0; classes],
            periods_needed: vec![0; classes],
            boards: SlotBoard::boards_for(0),
        }
    }

    pub fn is_eliminated(&self, class: ClassIndex) -> bool {
        self.eliminated.contains(&class)
    }

    /// Instances of `class` ordered by load, then period.
    pub fn instances_by_load(&self, class: ClassIndex) -> Vec<InstanceRef> {
        let mut found: Vec<InstanceRef> =
            self.boards.iter().enumerate().filter_map(|(b, board)| board.position_of(class).map(|slot| (b, slot))).collect();
        found.sort_by_key(|&(b, slot)| (self.boards[b].instances[slot].load, b));
        found
    }

    /// Checks whether `camper` may take a seat in the given instance.
    pub fn can_enroll(&self, camper: CamperIndex, (board, slot): InstanceRef, mode: EnrollMode) -> bool {
        let instance = &self.boards[board].instances[slot];
        let state = &self.campers[camper];

        if !state.is_free(board) || instance.contains(camper) {
            return false;
        }
        if !state.can_join(instance.class, self.catalog.get(instance.class)) {
            return false;
        }
        mode == EnrollMode::AllowForced || instance.is_open()
    }

    /// Places `camper` in the instance. Both the camper's period map and the
    /// instance roster change, or neither does.
    pub fn enroll(&mut self, camper: CamperIndex, at: InstanceRef, mode: EnrollMode) -> bool {
        if !self.can_enroll(camper, at, mode) {
            return false;
        }

        let (board, slot) = at;
        let instance = &mut self.boards[board].instances[slot];
        let forced = !instance.is_open();
        if !instance.insert_camper(camper, forced) {
            return false;
        }

        self.campers[camper].periods[board] = Some(Placement { class: instance.class, forced });
        true
    }

    pub fn into_schedule(self, trial: usize, policy: ScoringPolicy) -> Schedule {
        Schedule::new(self.catalog, self.roster, self.campers, self.boards, self.eliminated, self.demand, trial, policy)
    }
}
