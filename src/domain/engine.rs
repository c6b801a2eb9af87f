use std::sync::Arc;

use crate::domain::catalog::Catalog;
use crate::domain::engine::choice_resolver::ChoiceResolver;
use crate::domain::engine::demand_planner::DemandPlan;
use crate::domain::engine::evaluator::ScoringPolicy;
use crate::domain::engine::slot_packer::SlotPacker;
use crate::domain::engine::trial_context::TrialContext;
use crate::domain::roster::{CamperIndex, Roster};
use crate::domain::schedule::Schedule;
use crate::error::TrialResult;

pub mod choice_resolver;
pub mod demand_planner;
pub mod enrollment;
pub mod evaluator;
pub mod slot_packer;
pub mod trial_context;

/// Builds one complete schedule for campers processed in `order`.
///
/// Choices are resolved twice: the first pass sizes demand and decides
/// eliminations, the second re-resolves against them. The result has
/// passed [`Schedule::verify`].
pub fn run_trial(catalog: &Arc<Catalog>, roster: &Arc<Roster>, order: Vec<CamperIndex>, trial: usize, policy: ScoringPolicy) -> TrialResult<Schedule> {
    let mut ctx = TrialContext::new(catalog.clone(), roster.clone(), order);

    ChoiceResolver::resolve_all(&mut ctx)?;
    DemandPlan::from_choices(&ctx.catalog, &ctx.campers).apply(&mut ctx);
    ChoiceResolver::resolve_all(&mut ctx)?;

    SlotPacker::pack(&mut ctx)?;

    enrollment::enroll_essential(&mut ctx)?;
    enrollment::enroll_general(&mut ctx)?;

    let schedule = ctx.into_schedule(trial, policy);
    schedule.verify()?;
    Ok(schedule)
}
