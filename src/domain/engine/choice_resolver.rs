use std::collections::BTreeSet;

use crate::domain::camper::{Camper, TOP_CHOICES};
use crate::domain::catalog::{Catalog, ClassIndex};
use crate::domain::engine::trial_context::TrialContext;
use crate::domain::schedule::camper_state::CamperState;
use crate::error::{TrialError, TrialResult};

/// Turns a camper's top choices into three final choices the camper can
/// actually take.
#[derive(Debug, Clone, Copy)]
pub struct ChoiceResolver<'a> {
    catalog: &'a Catalog,

    /// Lowest rank that exists. Walking past it exhausts the ranking.
    rank_ceiling: usize,
}

impl<'a> ChoiceResolver<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        ChoiceResolver { catalog, rank_ceiling: catalog.len() }
    }

    /// Resolves every camper of the trial against the current elimination set.
    pub fn resolve_all(ctx: &mut TrialContext) -> TrialResult<()> {
        let catalog = ctx.catalog.clone();
        let resolver = ChoiceResolver::new(&catalog);

        for &camper in &ctx.order {
            resolver.resolve(ctx.roster.get(camper), &mut ctx.campers[camper], &ctx.eliminated)?;
        }

        Ok(())
    }

    /// Fills the buffer with three acceptable classes and derives the final choices.
    pub fn resolve(&self, camper: &Camper, state: &mut CamperState, eliminated: &BTreeSet<ClassIndex>) -> TrialResult<()> {
        state.buffer.clear();

        for &choice in camper.top_choices() {
            let mut rank = camper.rank_of(choice);
            loop {
                let candidate = match camper.class_at_rank(rank) {
                    Some(class) if rank <= self.rank_ceiling => class,
                    _ => return Err(TrialError::ChoiceExhausted { camper: camper.id.clone() }),
                };

                if self.accepts(camper, state, eliminated, candidate) {
                    state.buffer.push((candidate, rank));
                    break;
                }
                rank += 1;
            }

            if state.buffer.len() == TOP_CHOICES {
                break;
            }
        }

        state.final_choices = self.final_choices(camper, &state.buffer);
        Ok(())
    }

    fn accepts(&self, camper: &Camper, state: &CamperState, eliminated: &BTreeSet<ClassIndex>, class: ClassIndex) -> bool {
        camper.can_take(self.catalog.get(class)) && !eliminated.contains(&class) && !state.buffer.iter().any(|&(c, _)| c == class)
    }

    fn final_choices(&self, camper: &Camper, buffer: &[(ClassIndex, usize)]) -> [Option<ClassIndex>; TOP_CHOICES] {
        let highest = buffer.iter().min_by_key(|&&(_, rank)| rank).map(|&(c, _)| c);
        let lowest = buffer.iter().max_by_key(|&&(_, rank)| rank).map(|&(c, _)| c);
        let middle = buffer.iter().map(|&(c, _)| c).find(|&c| Some(c) != highest && Some(c) != lowest);

        let mut last = lowest;
        if camper.requires_swim_lessons() {
            // Swim lessons take the worst slot unless the camper already asked for them.
            if let Some(required) = self.catalog.first_required() {
                if highest != Some(required) && middle != Some(required) {
                    last = Some(required);
                }
            }
        }

        let is_double = |class: Option<ClassIndex>| class.is_some_and(|c| self.catalog.get(c).double_period);
        if is_double(highest) || is_double(middle) {
            last = None;
        }

        [highest, middle, last]
    }
}
