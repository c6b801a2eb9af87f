use std::collections::{BTreeSet, HashMap};

use crate::api::class_dto::ClassDto;
use crate::domain::schedule::NUM_PERIODS;
use crate::domain::utils::id::ClassId;
use crate::error::{Error, Result};

/// Position of a class inside its [`Catalog`]. Trials work on indices and
/// iterate in catalog order so that a fixed seed gives a fixed schedule.
pub type ClassIndex = usize;

/// Immutable definition of one class offering.
#[derive(Debug, Clone)]
pub struct ClassCatalogEntry {
    pub title: ClassId,

    /// Periods (1-based) the class may run in. Empty means any period.
    pub allowed_periods: BTreeSet<u8>,
    pub double_period: bool,
    pub required: bool,
    pub ten_plus: bool,
    pub must_be_consecutive: bool,
    pub requires_swim_level: bool,

    /// Per-instance enrollment cap.
    pub single_period_cutoff: usize,

    /// Classes that may not be offered in the same period as this one.
    pub restricted_concurrent: BTreeSet<ClassId>,
}

impl PartialEq for ClassCatalogEntry {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
    }
}

impl Eq for ClassCatalogEntry {}

impl ClassCatalogEntry {
    pub fn from_dto(dto: ClassDto) -> Result<Self> {
        let title = dto.title.trim().to_string();
        if title.is_empty() {
            return Err(Error::InvalidCatalog("class title must not be empty".to_string()));
        }

        if dto.single_period_cutoff == 0 {
            return Err(Error::InvalidCatalog(format!("class '{}' has a single period cutoff of 0", title)));
        }

        let mut allowed_periods = BTreeSet::new();
        for period in dto.allowed_periods {
            if period == 0 || period as usize > NUM_PERIODS {
                return Err(Error::InvalidCatalog(format!("class '{}' lists period {} which does not exist", title, period)));
            }
            if !allowed_periods.insert(period) {
                return Err(Error::InvalidCatalog(format!("class '{}' lists period {} twice", title, period)));
            }
        }

        if dto.double_period && !allowed_periods.is_empty() && allowed_periods.len() < 2 {
            return Err(Error::InvalidCatalog(format!("double-period class '{}' needs at least two allowed periods", title)));
        }

        let restricted_concurrent = dto.restricted_concurrent_classes.into_iter().map(|t| ClassId::new(t.trim())).collect();

        Ok(ClassCatalogEntry {
            title: ClassId::new(title),
            allowed_periods,
            double_period: dto.double_period,
            required: dto.is_required,
            ten_plus: dto.is_10_plus,
            must_be_consecutive: dto.must_be_consecutive,
            requires_swim_level: dto.requires_swim_level,
            single_period_cutoff: dto.single_period_cutoff as usize,
            restricted_concurrent,
        })
    }

    pub fn has_restricted_periods(&self) -> bool {
        !self.allowed_periods.is_empty()
    }

    /// `period` is 1-based.
    pub fn can_occur_during(&self, period: u8) -> bool {
        self.allowed_periods.is_empty() || self.allowed_periods.contains(&period)
    }

    /// Concurrency restrictions hold in both directions.
    pub fn conflicts_with(&self, other: &ClassCatalogEntry) -> bool {
        self.restricted_concurrent.contains(&other.title) || other.restricted_concurrent.contains(&self.title)
    }
}

/// The full set of classes on offer, in input order.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<ClassCatalogEntry>,
    index: HashMap<ClassId, ClassIndex>,
}

impl Catalog {
    pub fn from_dto(dtos: Vec<ClassDto>) -> Result<Self> {
        let entries = dtos.into_iter().map(ClassCatalogEntry::from_dto).collect::<Result<Vec<_>>>()?;
        Catalog::new(entries)
    }

    pub fn new(entries: Vec<ClassCatalogEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::InvalidCatalog("the catalog contains no classes".to_string()));
        }

        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if index.insert(entry.title.clone(), i).is_some() {
                return Err(Error::InvalidCatalog(format!("duplicate class title '{}'", entry.title)));
            }
        }

        for entry in &entries {
            for other in &entry.restricted_concurrent {
                if !index.contains_key(other) {
                    return Err(Error::InvalidCatalog(format!("class '{}' restricts unknown class '{}'", entry.title, other)));
                }
                if other == &entry.title {
                    return Err(Error::InvalidCatalog(format!("class '{}' restricts itself", entry.title)));
                }
            }
        }

        if entries.iter().filter(|e| e.required).count() > 1 {
            log::warn!("More than one required class in the catalog. Swim lessons substitute the first one only.");
        }

        Ok(Catalog { entries, index })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, class: ClassIndex) -> &ClassCatalogEntry {
        &self.entries[class]
    }

    pub fn index_of(&self, title: &str) -> Option<ClassIndex> {
        self.index.get(&ClassId::new(title)).copied()
    }

    pub fn by_title(&self, title: &str) -> Option<&ClassCatalogEntry> {
        self.index_of(title).map(|i| &self.entries[i])
    }

    pub fn title(&self, class: ClassIndex) -> &ClassId {
        &self.entries[class].title
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClassIndex, &ClassCatalogEntry)> {
        self.entries.iter().enumerate()
    }

    pub fn indices(&self) -> std::ops::Range<ClassIndex> {
        0..self.entries.len()
    }

    /// The class swim-lesson campers are moved into, if the catalog has one.
    pub fn first_required(&self) -> Option<ClassIndex> {
        self.entries.iter().position(|e| e.required)
    }
}
