use crate::domain::catalog::{Catalog, ClassCatalogEntry, ClassIndex};
use crate::domain::engine::trial_context::TrialContext;
use crate::domain::schedule::NUM_PERIODS;
use crate::domain::schedule::slot_board::SlotBoard;
use crate::error::{TrialError, TrialResult};

/// Periods a class may not be placed in. `true` means blocked.
type Mask = [bool; NUM_PERIODS];

/// Distributes class instances over the three period boards.
pub struct SlotPacker<'a> {
    catalog: &'a Catalog,
    periods_needed: &'a [usize],
    boards: &'a mut [SlotBoard; NUM_PERIODS],
}

impl<'a> SlotPacker<'a> {
    /// Sizes the boards from the demand plan and places every wanted class,
    /// then reconciles the plan with what was actually placed.
    pub fn pack(ctx: &mut TrialContext) -> TrialResult<()> {
        let total: usize = ctx.periods_needed.iter().sum();
        ctx.boards = SlotBoard::boards_for(total);

        let mut packer = SlotPacker { catalog: &ctx.catalog, periods_needed: &ctx.periods_needed, boards: &mut ctx.boards };
        for class in packer.packing_order() {
            packer.place_class(class);
        }

        reconcile(ctx)
    }

    /// Required classes first, then by ascending period count, ties in catalog order.
    fn packing_order(&self) -> Vec<ClassIndex> {
        let mut order: Vec<ClassIndex> = self.catalog.indices().filter(|&c| self.periods_needed[c] > 0).collect();
        order.sort_by_key(|&c| (!self.catalog.get(c).required, self.periods_needed[c]));
        order
    }

    fn mask_for(&self, entry: &ClassCatalogEntry) -> Mask {
        std::array::from_fn(|p| {
            let outside_allowed = !entry.can_occur_during(p as u8 + 1);
            let conflicting = self.boards[p].instances.iter().any(|i| entry.conflicts_with(self.catalog.get(i.class)));
            outside_allowed || conflicting
        })
    }

    fn place(&mut self, class: ClassIndex, board: usize) -> bool {
        let cutoff = self.catalog.get(class).single_period_cutoff;
        self.boards[board].add_instance(class, cutoff)
    }

    fn place_class(&mut self, class: ClassIndex) {
        let catalog = self.catalog;
        let entry = catalog.get(class);
        let mask = self.mask_for(entry);
        let open: Vec<usize> = (0..NUM_PERIODS).filter(|&p| !mask[p]).collect();

        if entry.double_period {
            self.place_double(class, &mask, &open);
            return;
        }

        match self.periods_needed[class] {
            3 => {
                for &p in &open {
                    self.place(class, p);
                }
            }
            2 if entry.must_be_consecutive => {
                let pair = self.consecutive_pair(&mask);
                for p in pair {
                    if !mask[p] {
                        self.place(class, p);
                    }
                }
            }
            2 => {
                let pair = self.two_least_filled();
                let mut added = 0;
                for p in pair {
                    if !mask[p] && self.place(class, p) {
                        added += 1;
                    }
                }
                for &p in &open {
                    if added == 2 {
                        break;
                    }
                    if !pair.contains(&p) && self.place(class, p) {
                        added += 1;
                    }
                }
            }
            _ => {
                let mut candidates = vec![self.least_single_period(), self.least_filled()];
                candidates.extend(0..NUM_PERIODS);
                let placed = candidates.into_iter().any(|p| !mask[p] && self.place(class, p));
                if !placed {
                    log::debug!("No period can take {}.", entry.title);
                }
            }
        }
    }

    fn place_double(&mut self, class: ClassIndex, mask: &Mask, open: &[usize]) {
        match open.len() {
            NUM_PERIODS => {
                for p in self.consecutive_pair(mask) {
                    self.place(class, p);
                }
            }
            2 => {
                for &p in open {
                    self.place(class, p);
                }
            }
            _ => log::debug!("Double-period class {} has fewer than two usable periods.", self.catalog.title(class)),
        }
    }

    /// Periods 1+2 when period 1 holds fewer instances than period 3, else 2+3.
    /// A pair that is unmasked with room on both boards wins over one that is not.
    fn consecutive_pair(&self, mask: &Mask) -> [usize; 2] {
        let preferred = if self.boards[0].instances.len() < self.boards[2].instances.len() { [0, 1] } else { [1, 2] };
        let other = if preferred == [0, 1] { [1, 2] } else { [0, 1] };

        let usable = |pair: &[usize; 2]| pair.iter().all(|&p| !mask[p] && !self.boards[p].is_full());
        if !usable(&preferred) && usable(&other) { other } else { preferred }
    }

    /// All boards except the one with the fewest open slots (first on ties).
    fn two_least_filled(&self) -> [usize; 2] {
        let fullest = (0..NUM_PERIODS).min_by_key(|&p| self.boards[p].open_slots()).unwrap_or(0);
        let mut pair = [0; 2];
        for (slot, p) in (0..NUM_PERIODS).filter(|&p| p != fullest).enumerate() {
            pair[slot] = p;
        }
        pair
    }

    /// The board with the most open slots (first on ties).
    fn least_filled(&self) -> usize {
        let mut best = 0;
        for p in 1..NUM_PERIODS {
            if self.boards[p].open_slots() > self.boards[best].open_slots() {
                best = p;
            }
        }
        best
    }

    /// The board holding the fewest single-period classes (first on ties).
    fn least_single_period(&self) -> usize {
        let singles = |p: usize| self.boards[p].instances.iter().filter(|i| self.periods_needed[i.class] == 1).count();
        (0..NUM_PERIODS).min_by_key(|&p| singles(p)).unwrap_or(0)
    }
}

/// Brings the plan in line with the boards: classes without an instance are
/// eliminated, and period counts become the number of instances placed.
/// A double-period class that got only one period is withdrawn.
///
/// # Errors
/// `MissingPeriodInstance` if a required class that campers asked for has
/// no instance. Required classes are never eliminated.
pub fn reconcile(ctx: &mut TrialContext) -> TrialResult<()> {
    for class in ctx.catalog.indices() {
        let entry = ctx.catalog.get(class);
        let mut placed = ctx.boards.iter().filter(|b| b.contains_class(class)).count();

        if entry.double_period && placed == 1 {
            log::debug!("Withdrawing double-period class {} with a single period.", entry.title);
            for board in ctx.boards.iter_mut() {
                board.remove_class(class);
            }
            placed = 0;
        }

        if placed == 0 {
            if entry.required && ctx.demand[class] > 0 {
                log::debug!("Required class {} could not be placed.", entry.title);
                return Err(TrialError::MissingPeriodInstance { class: entry.title.clone() });
            }
            if !ctx.eliminated.contains(&class) && ctx.periods_needed[class] > 0 {
                log::debug!("Class {} could not be placed and is eliminated.", entry.title);
            }
            ctx.eliminated.insert(class);
        }
        ctx.periods_needed[class] = placed;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::class_dto::ClassDto;
    use crate::domain::camper::Camper;
    use crate::domain::roster::Roster;

    fn class(title: &str) -> ClassDto {
        ClassDto {
            title: title.to_string(),
            allowed_periods: Vec::new(),
            double_period: false,
            is_required: false,
            is_10_plus: false,
            must_be_consecutive: false,
            requires_swim_level: false,
            single_period_cutoff: 10,
            restricted_concurrent_classes: Vec::new(),
        }
    }

    fn context(classes: Vec<ClassDto>, periods_needed: Vec<usize>) -> TrialContext {
        let catalog = Catalog::from_dto(classes).unwrap();
        let ranking = catalog.indices().collect();
        let camper = Camper::new("Ada", 12, 4, ranking, catalog.len()).unwrap();
        let roster = Roster::new(vec![camper], &catalog).unwrap();

        let mut ctx = TrialContext::new(Arc::new(catalog), Arc::new(roster), vec![0]);
        ctx.periods_needed = periods_needed;
        ctx
    }

    fn periods_of(ctx: &TrialContext, class: ClassIndex) -> Vec<u8> {
        ctx.boards.iter().filter(|b| b.contains_class(class)).map(|b| b.period).collect()
    }

    #[test]
    fn test_restricted_periods_are_honored() {
        let mut canoe = class("Canoe");
        canoe.allowed_periods = vec![2, 3];
        let mut ctx = context(vec![canoe, class("Archery"), class("Crafts")], vec![2, 1, 1]);

        SlotPacker::pack(&mut ctx).unwrap();

        let periods = periods_of(&ctx, 0);
        assert!(!periods.is_empty());
        assert!(periods.iter().all(|&p| p == 2 || p == 3));
        assert!(!ctx.boards[0].contains_class(0));
    }

    #[test]
    fn test_concurrent_classes_never_share_a_period() {
        let mut canoe = class("Canoe");
        canoe.restricted_concurrent_classes = vec!["Kayak".to_string()];
        let classes = vec![canoe, class("Kayak"), class("Archery"), class("Crafts")];
        let mut ctx = context(classes, vec![1, 1, 2, 2]);

        SlotPacker::pack(&mut ctx).unwrap();

        for board in &ctx.boards {
            assert!(!(board.contains_class(0) && board.contains_class(1)));
        }
        assert_eq!(periods_of(&ctx, 0).len(), 1);
        assert_eq!(periods_of(&ctx, 1).len(), 1);
    }

    #[test]
    fn test_required_classes_fill_every_period() {
        let mut swim = class("Swim");
        swim.is_required = true;
        let mut ctx = context(vec![class("Archery"), class("Canoe"), swim], vec![1, 2, 3]);

        SlotPacker::pack(&mut ctx).unwrap();

        assert_eq!(periods_of(&ctx, 2), vec![1, 2, 3]);
        assert_eq!(ctx.boards.iter().map(|b| b.instances.len()).sum::<usize>(), 6);
        assert_eq!(ctx.periods_needed, vec![1, 2, 3]);
    }

    #[test]
    fn test_double_period_lands_in_consecutive_periods() {
        let mut woodshop = class("Woodshop");
        woodshop.double_period = true;
        let mut ctx = context(vec![woodshop, class("Archery"), class("Crafts")], vec![2, 1, 0]);

        SlotPacker::pack(&mut ctx).unwrap();

        assert_eq!(periods_of(&ctx, 0), vec![2, 3]);
        assert_eq!(periods_of(&ctx, 1), vec![1]);
        assert!(!ctx.eliminated.contains(&0));
    }

    #[test]
    fn test_unplaced_class_is_eliminated() {
        let mut canoe = class("Canoe");
        canoe.allowed_periods = vec![1];
        let mut archery = class("Archery");
        archery.allowed_periods = vec![1];
        // Budgets 1/1/0: only one of the period-1 classes fits.
        let mut ctx = context(vec![canoe, archery, class("Crafts")], vec![1, 1, 0]);

        SlotPacker::pack(&mut ctx).unwrap();

        assert!(ctx.boards[0].contains_class(0));
        assert!(ctx.eliminated.contains(&1));
        assert!(ctx.eliminated.contains(&2));
        assert_eq!(ctx.periods_needed, vec![1, 0, 0]);
    }

    #[test]
    fn test_consecutive_class_takes_adjacent_periods() {
        let mut nature = class("Nature");
        nature.must_be_consecutive = true;
        // Budgets 1/1/0 leave only periods 1 and 2 usable.
        let mut ctx = context(vec![nature, class("Archery"), class("Crafts")], vec![2, 0, 0]);

        SlotPacker::pack(&mut ctx).unwrap();

        assert_eq!(periods_of(&ctx, 0), vec![1, 2]);
        assert_eq!(ctx.periods_needed[0], 2);
    }

    #[test]
    fn test_consecutive_class_without_adjacent_periods_keeps_one() {
        let mut nature = class("Nature");
        nature.must_be_consecutive = true;
        nature.allowed_periods = vec![1, 3];
        let mut ctx = context(vec![nature, class("Archery"), class("Crafts")], vec![2, 1, 1]);

        SlotPacker::pack(&mut ctx).unwrap();

        assert_eq!(periods_of(&ctx, 0), vec![3]);
        assert_eq!(ctx.periods_needed[0], 1);
        assert!(!ctx.eliminated.contains(&0));
    }

    #[test]
    fn test_unplaced_required_class_fails_the_trial() {
        let mut swim = class("Swim");
        swim.is_required = true;
        swim.allowed_periods = vec![3];
        let mut flag = class("Flag");
        flag.is_required = true;
        flag.allowed_periods = vec![3];
        flag.restricted_concurrent_classes = vec!["Swim".to_string()];
        let mut ctx = context(vec![flag, swim, class("Archery")], vec![1, 1, 1]);
        ctx.demand = vec![5, 6, 11];

        let result = SlotPacker::pack(&mut ctx);

        assert!(matches!(result, Err(TrialError::MissingPeriodInstance { class: title }) if title.as_str() == "Swim"));
        assert!(!ctx.eliminated.contains(&1));
    }
}
