use std::collections::BTreeSet;
use std::sync::Arc;

use crate::api::schedule_dto::{CamperScheduleDto, PeriodClassDto, PeriodDto, PlacementDto, ScheduleDto};
use crate::domain::camper::Camper;
use crate::domain::catalog::{Catalog, ClassIndex};
use crate::domain::engine::evaluator::{self, ScoringPolicy};
use crate::domain::roster::{CamperIndex, Roster};
use crate::domain::schedule::camper_state::CamperState;
use crate::domain::schedule::slot_board::SlotBoard;
use crate::domain::utils::id::ClassId;
use crate::error::{TrialError, TrialResult};

pub mod camper_state;
pub mod period_instance;
pub mod slot_board;

/// Number of class periods in a camp day.
pub const NUM_PERIODS: usize = 3;

/// The frozen result of one successful trial.
#[derive(Debug, Clone)]
pub struct Schedule {
    catalog: Arc<Catalog>,
    roster: Arc<Roster>,
    campers: Vec<CamperState>,
    boards: [SlotBoard; NUM_PERIODS],
    eliminated: BTreeSet<ClassIndex>,

    /// Final-choice count per class from the demand pass.
    demand: Vec<usize>,
    score: i64,
    trial: usize,
}

/// A camper together with its placements in one schedule.
#[derive(Debug, Clone, Copy)]
pub struct CamperView<'a> {
    pub index: CamperIndex,
    pub camper: &'a Camper,
    pub state: &'a CamperState,
}

/// The camper holding the worst-ranked non-required placement.
#[derive(Debug, Clone)]
pub struct WorstAssignment<'a> {
    pub camper: &'a Camper,
    pub class: &'a ClassId,
    pub rank: usize,
}

impl Schedule {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        catalog: Arc<Catalog>,
        roster: Arc<Roster>,
        campers: Vec<CamperState>,
        boards: [SlotBoard; NUM_PERIODS],
        eliminated: BTreeSet<ClassIndex>,
        demand: Vec<usize>,
        trial: usize,
        policy: ScoringPolicy,
    ) -> Self {
        let mut schedule = Schedule { catalog, roster, campers, boards, eliminated, demand, score: 0, trial };
        schedule.score = evaluator::evaluate(&schedule, policy);
        schedule
    }

    /// Lower is better.
    pub fn score(&self) -> i64 {
        self.score
    }

    /// Index of the trial that produced this schedule.
    pub fn trial(&self) -> usize {
        self.trial
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn boards(&self) -> &[SlotBoard; NUM_PERIODS] {
        &self.boards
    }

    pub fn camper(&self, index: CamperIndex) -> CamperView<'_> {
        CamperView { index, camper: self.roster.get(index), state: &self.campers[index] }
    }

    /// Campers in roster order.
    pub fn campers(&self) -> impl Iterator<Item = CamperView<'_>> {
        (0..self.campers.len()).map(|i| self.camper(i))
    }

    pub fn camper_by_name(&self, name: &str) -> Option<CamperView<'_>> {
        self.campers().find(|view| view.camper.name() == name)
    }

    pub fn is_eliminated(&self, class: ClassIndex) -> bool {
        self.eliminated.contains(&class)
    }

    /// Titles of the classes that were not offered, in catalog order.
    pub fn eliminated(&self) -> impl Iterator<Item = &ClassId> {
        self.eliminated.iter().map(|&c| self.catalog.title(c))
    }

    pub fn demand(&self, class: ClassIndex) -> usize {
        self.demand.get(class).copied().unwrap_or(0)
    }

    /// Number of instances of `class` across all periods.
    pub fn instances_of(&self, class: ClassIndex) -> usize {
        self.boards.iter().filter(|b| b.contains_class(class)).count()
    }

    /// Total number of placements beyond a cutoff.
    pub fn forced_count(&self) -> usize {
        self.boards.iter().flat_map(|b| &b.instances).map(|i| i.forced).sum()
    }

    pub fn worst_assignment(&self) -> Option<WorstAssignment<'_>> {
        let mut worst: Option<WorstAssignment<'_>> = None;

        for view in self.campers() {
            for placement in view.state.periods.iter().flatten() {
                let entry = self.catalog.get(placement.class);
                if entry.required {
                    continue;
                }
                let rank = view.camper.rank_of(placement.class);
                if worst.as_ref().is_none_or(|w| rank > w.rank) {
                    worst = Some(WorstAssignment { camper: view.camper, class: &entry.title, rank });
                }
            }
        }

        worst
    }

    /// Re-checks the structural invariants of a finished schedule.
    pub fn verify(&self) -> TrialResult<()> {
        let violation = |message: String| Err(TrialError::InvariantViolation(message));

        for (class, entry) in self.catalog.iter() {
            let instances = self.instances_of(class);
            if self.is_eliminated(class) {
                if instances > 0 {
                    return violation(format!("eliminated class {} still has {} instances", entry.title, instances));
                }
            } else if instances == 0 {
                return violation(format!("class {} is neither eliminated nor offered", entry.title));
            } else if entry.double_period && instances != 2 {
                return violation(format!("double-period class {} runs in {} periods", entry.title, instances));
            }
        }

        for (p, board) in self.boards.iter().enumerate() {
            if board.instances.len() > board.budget {
                return violation(format!("period {} holds {} instances for a budget of {}", board.period, board.instances.len(), board.budget));
            }

            for instance in &board.instances {
                let title = self.catalog.title(instance.class);
                if instance.load != instance.roster.len() {
                    return violation(format!("class {} in period {} counts {} campers but lists {}", title, board.period, instance.load, instance.roster.len()));
                }
                if instance.load.saturating_sub(instance.forced) > instance.cutoff {
                    return violation(format!("class {} in period {} exceeds its cutoff without forcing", title, board.period));
                }
                for &camper in &instance.roster {
                    let holds_seat = self.campers[camper].periods[p].is_some_and(|placement| placement.class == instance.class);
                    if !holds_seat {
                        return violation(format!("{} is listed in {} during period {} without a placement", self.roster.get(camper).id, title, board.period));
                    }
                }
            }
        }

        for view in self.campers() {
            let name = &view.camper.id;

            for (p, placement) in view.state.periods.iter().enumerate() {
                let Some(placement) = placement else { continue };
                let entry = self.catalog.get(placement.class);

                let listed = self.boards[p].instance_of(placement.class).is_some_and(|i| i.contains(view.index));
                if !listed {
                    return violation(format!("{} holds {} in period {} but is not on its roster", name, entry.title, p + 1));
                }
                if !view.state.within_class_limit(placement.class, entry) {
                    return violation(format!("{} holds {} periods of {}", name, view.state.periods_in(placement.class), entry.title));
                }
                if !entry.required && !view.camper.can_take(entry) {
                    return violation(format!("{} is not eligible for {}", name, entry.title));
                }
            }

            let choices: Vec<ClassIndex> = view.state.final_choices().collect();
            for (i, class) in choices.iter().enumerate() {
                if choices[..i].contains(class) {
                    return violation(format!("{} lists {} twice among final choices", name, self.catalog.title(*class)));
                }
            }
        }

        Ok(())
    }

    pub fn to_dto(&self) -> ScheduleDto {
        let title = |class: ClassIndex| self.catalog.title(class).to_string();

        let periods = self
            .boards
            .iter()
            .map(|board| PeriodDto {
                period: board.period,
                budget: board.budget,
                classes: board
                    .instances
                    .iter()
                    .map(|instance| PeriodClassDto {
                        title: title(instance.class),
                        enrolled: instance.load,
                        cutoff: instance.cutoff,
                        forced: instance.forced,
                        campers: instance.roster.iter().map(|&c| self.roster.get(c).name().to_string()).collect(),
                    })
                    .collect(),
            })
            .collect();

        let mut views: Vec<CamperView<'_>> = self.campers().collect();
        views.sort_by(|a, b| a.camper.age.cmp(&b.camper.age).then_with(|| a.camper.name().cmp(b.camper.name())));

        let campers = views
            .into_iter()
            .map(|view| CamperScheduleDto {
                name: view.camper.name().to_string(),
                age: view.camper.age,
                swim_level: view.camper.swim_level,
                final_choices: view.state.final_choices.iter().map(|c| c.map(title)).collect(),
                periods: view
                    .state
                    .periods
                    .iter()
                    .map(|p| p.map(|placement| PlacementDto { title: title(placement.class), forced: placement.forced }))
                    .collect(),
            })
            .collect();

        ScheduleDto {
            score: self.score,
            trial: self.trial,
            eliminated_classes: self.eliminated().map(ToString::to_string).collect(),
            periods,
            campers,
        }
    }

    pub fn log_summary(&self) {
        log::info!("Schedule from trial {} with score {}.", self.trial, self.score);

        for (class, entry) in self.catalog.iter() {
            log::info!(
                "  {:<24} demand {:>3}  instances {}{}",
                entry.title.as_str(),
                self.demand(class),
                self.instances_of(class),
                if self.is_eliminated(class) { "  (eliminated)" } else { "" }
            );
        }

        for board in &self.boards {
            log::info!("Period {} ({} of {} slots used):", board.period, board.instances.len(), board.budget);
            for instance in &board.instances {
                log::info!(
                    "  {:<24} {:>3}/{:<3}{}",
                    self.catalog.title(instance.class).as_str(),
                    instance.load,
                    instance.cutoff,
                    if instance.forced > 0 { format!("  ({} forced)", instance.forced) } else { String::new() }
                );
            }
        }

        if let Some(worst) = self.worst_assignment() {
            log::info!("Worst assignment: {} in {} (rank {}).", worst.camper.name(), worst.class, worst.rank);
        }
    }
}
