use crate::domain::catalog::ClassIndex;
use crate::domain::engine::trial_context::{EnrollMode, InstanceRef, TrialContext};
use crate::domain::roster::CamperIndex;
use crate::domain::schedule::NUM_PERIODS;
use crate::error::{TrialError, TrialResult};

/// Rounds of the general pass. Each round gives every camper one more class.
const GENERAL_ROUNDS: usize = NUM_PERIODS;

/// Places campers in required and double-period classes before anything else.
///
/// Required classes go to the least-full instance and are forced past the
/// cutoff when every instance is full. Double-period classes take both
/// instances or neither.
pub fn enroll_essential(ctx: &mut TrialContext) -> TrialResult<()> {
    let catalog = ctx.catalog.clone();

    for position in 0..ctx.order.len() {
        let camper = ctx.order[position];
        let choices: Vec<ClassIndex> = ctx.campers[camper].final_choices().collect();

        for class in choices {
            let entry = catalog.get(class);
            if ctx.is_eliminated(class) {
                if entry.required {
                    return Err(TrialError::MissingPeriodInstance { class: entry.title.clone() });
                }
                log::debug!("{} chose eliminated class {}.", ctx.roster.get(camper).id, entry.title);
                continue;
            }

            if entry.required {
                let instances = ctx.instances_by_load(class);
                let Some(&least_full) = instances.first() else {
                    return Err(TrialError::MissingPeriodInstance { class: entry.title.clone() });
                };
                let placed = ctx.enroll(camper, least_full, EnrollMode::RespectCutoff)
                    || instances.iter().any(|&at| ctx.enroll(camper, at, EnrollMode::AllowForced));
                if !placed {
                    log::debug!("{} has no free period for {}.", ctx.roster.get(camper).id, entry.title);
                }
            } else if entry.double_period {
                let instances = ctx.instances_by_load(class);
                if instances.is_empty() {
                    return Err(TrialError::MissingPeriodInstance { class: entry.title.clone() });
                }
                if instances.iter().all(|&at| ctx.can_enroll(camper, at, EnrollMode::RespectCutoff)) {
                    for at in instances {
                        ctx.enroll(camper, at, EnrollMode::RespectCutoff);
                    }
                }
            }
        }
    }

    Ok(())
}

/// Fills the remaining periods of every camper, best-fit first.
pub fn enroll_general(ctx: &mut TrialContext) -> TrialResult<()> {
    for _ in 0..GENERAL_ROUNDS {
        for position in 0..ctx.order.len() {
            let camper = ctx.order[position];
            match ctx.campers[camper].num_enrolled() {
                0 | 1 => match next_attempt(ctx, camper) {
                    Some(attempt) => enroll_with_fallback(ctx, camper, attempt)?,
                    None => fill_missing_period(ctx, camper),
                },
                2 => fill_missing_period(ctx, camper),
                _ => {}
            }
        }
    }

    Ok(())
}

/// Classes the general pass may hand out: offered, optional, single-period,
/// and not yet held by the camper.
fn is_candidate(ctx: &TrialContext, camper: CamperIndex, class: ClassIndex) -> bool {
    let entry = ctx.catalog.get(class);
    !entry.required && !entry.double_period && !ctx.is_eliminated(class) && !ctx.campers[camper].is_enrolled_in(class)
}

/// The open final choice with the fewest instances (first on ties).
fn next_attempt(ctx: &TrialContext, camper: CamperIndex) -> Option<ClassIndex> {
    ctx.campers[camper].final_choices().filter(|&c| is_candidate(ctx, camper, c)).min_by_key(|&c| ctx.periods_needed[c])
}

/// Tries every instance of `attempt` from least to most full, then walks down
/// the camper's ranking until some class takes them.
fn enroll_with_fallback(ctx: &mut TrialContext, camper: CamperIndex, mut attempt: ClassIndex) -> TrialResult<()> {
    loop {
        let instances = ctx.instances_by_load(attempt);
        if instances.is_empty() {
            return Err(TrialError::MissingPeriodInstance { class: ctx.catalog.title(attempt).clone() });
        }
        if instances.into_iter().any(|at| ctx.enroll(camper, at, EnrollMode::RespectCutoff)) {
            return Ok(());
        }

        attempt = next_ranked(ctx, camper, attempt).ok_or_else(|| TrialError::EnrollmentExhausted {
            camper: ctx.roster.get(camper).id.clone(),
            class: ctx.catalog.title(attempt).clone(),
        })?;
    }
}

/// The next class below `after` in the camper's ranking that the camper may take.
fn next_ranked(ctx: &TrialContext, camper: CamperIndex, after: ClassIndex) -> Option<ClassIndex> {
    let profile = ctx.roster.get(camper);
    profile.ranking()[profile.rank_of(after)..]
        .iter()
        .copied()
        .find(|&c| is_candidate(ctx, camper, c) && profile.can_take(ctx.catalog.get(c)))
}

/// Gives a camper with an empty period the best-ranked class running then.
/// Empty periods are tried in order until one of them takes the camper.
/// Prefers instances under their cutoff and forces a seat otherwise.
fn fill_missing_period(ctx: &mut TrialContext, camper: CamperIndex) {
    let free = ctx.campers[camper].free_periods();
    if free.is_empty() {
        return;
    }

    if !free.into_iter().any(|period| fill_period(ctx, camper, period)) {
        log::debug!("No open period can take {}.", ctx.roster.get(camper).id);
    }
}

fn fill_period(ctx: &mut TrialContext, camper: CamperIndex, period: usize) -> bool {
    let profile = ctx.roster.get(camper);
    let mut candidates: Vec<(usize, InstanceRef)> = ctx.boards[period]
        .instances
        .iter()
        .enumerate()
        .filter(|(_, instance)| is_candidate(ctx, camper, instance.class) && profile.can_take(ctx.catalog.get(instance.class)))
        .map(|(slot, instance)| (profile.rank_of(instance.class), (period, slot)))
        .collect();
    candidates.sort_by_key(|&(rank, _)| rank);

    candidates.iter().any(|&(_, at)| ctx.enroll(camper, at, EnrollMode::RespectCutoff))
        || candidates.iter().any(|&(_, at)| ctx.enroll(camper, at, EnrollMode::AllowForced))
}
