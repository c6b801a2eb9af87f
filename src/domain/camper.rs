use crate::api::camper_dto::CamperDto;
use crate::domain::catalog::{Catalog, ClassCatalogEntry, ClassIndex};
use crate::domain::utils::id::CamperId;
use crate::error::{Error, Result};

/// Campers below this swim level take swim lessons and cannot join
/// classes that require a swim level.
pub const PASSING_SWIM_LEVEL: u8 = 4;

/// Minimum age for classes flagged 10+.
pub const TEN_PLUS_AGE: u32 = 10;

/// Number of top-ranked classes a camper asks for.
pub const TOP_CHOICES: usize = 3;

/// A camper as submitted. Immutable for the whole search; per-trial state
/// lives in [`CamperState`](crate::domain::schedule::camper_state::CamperState).
#[derive(Debug, Clone)]
pub struct Camper {
    pub id: CamperId,
    pub age: u32,
    pub swim_level: u8,

    /// Class indices, best first. Position `i` holds rank `i + 1`.
    ranking: Vec<ClassIndex>,

    /// Rank (1-based) of every class, indexed by class.
    rank_of: Vec<usize>,
}

impl Camper {
    pub fn new(name: impl Into<String>, age: u32, swim_level: u8, ranking: Vec<ClassIndex>, catalog_len: usize) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::InvalidRoster("camper name must not be empty".to_string()));
        }

        if ranking.len() != catalog_len {
            return Err(Error::InvalidRoster(format!(
                "camper '{}' ranks {} classes but the catalog has {}",
                name,
                ranking.len(),
                catalog_len
            )));
        }

        let mut rank_of = vec![0; catalog_len];
        for (position, &class) in ranking.iter().enumerate() {
            if class >= catalog_len {
                return Err(Error::InvalidRoster(format!("camper '{}' ranks unknown class #{}", name, class)));
            }
            if rank_of[class] != 0 {
                return Err(Error::InvalidRoster(format!("camper '{}' ranks class #{} twice", name, class)));
            }
            rank_of[class] = position + 1;
        }

        Ok(Camper { id: CamperId::new(name), age, swim_level, ranking, rank_of })
    }

    pub fn from_dto(dto: CamperDto, catalog: &Catalog) -> Result<Self> {
        let mut ranking = Vec::with_capacity(dto.rankings.len());
        for title in &dto.rankings {
            let class = catalog
                .index_of(title.trim())
                .ok_or_else(|| Error::InvalidRoster(format!("camper '{}' ranks unknown class '{}'", dto.name, title)))?;
            ranking.push(class);
        }

        Camper::new(dto.name, dto.age, dto.swim_level, ranking, catalog.len())
    }

    pub fn name(&self) -> &str {
        self.id.as_str()
    }

    pub fn is_10_plus(&self) -> bool {
        self.age >= TEN_PLUS_AGE
    }

    pub fn requires_swim_lessons(&self) -> bool {
        self.swim_level < PASSING_SWIM_LEVEL
    }

    /// Age and swim gating. Required classes bypass this check at the call sites.
    pub fn can_take(&self, class: &ClassCatalogEntry) -> bool {
        if class.ten_plus && !self.is_10_plus() {
            return false;
        }
        if class.requires_swim_level && self.requires_swim_lessons() {
            return false;
        }
        true
    }

    pub fn ranking(&self) -> &[ClassIndex] {
        &self.ranking
    }

    pub fn top_choices(&self) -> &[ClassIndex] {
        &self.ranking[..TOP_CHOICES.min(self.ranking.len())]
    }

    /// 1-based rank of `class`.
    pub fn rank_of(&self, class: ClassIndex) -> usize {
        self.rank_of[class]
    }

    /// The class at 1-based `rank`, or `None` past the end of the ranking.
    pub fn class_at_rank(&self, rank: usize) -> Option<ClassIndex> {
        rank.checked_sub(1).and_then(|i| self.ranking.get(i)).copied()
    }
}
