use std::collections::HashSet;

use crate::api::camper_dto::CamperDto;
use crate::domain::camper::{Camper, TOP_CHOICES};
use crate::domain::catalog::Catalog;
use crate::error::{Error, Result};

/// Position of a camper inside its [`Roster`].
pub type CamperIndex = usize;

/// All campers of one session, in input order.
#[derive(Debug, Clone)]
pub struct Roster {
    campers: Vec<Camper>,
}

impl Roster {
    pub fn from_dto(dtos: Vec<CamperDto>, catalog: &Catalog) -> Result<Self> {
        let campers = dtos.into_iter().map(|dto| Camper::from_dto(dto, catalog)).collect::<Result<Vec<_>>>()?;
        Roster::new(campers, catalog)
    }

    pub fn new(campers: Vec<Camper>, catalog: &Catalog) -> Result<Self> {
        if campers.is_empty() {
            return Err(Error::InvalidRoster("the roster contains no campers".to_string()));
        }

        if catalog.len() < TOP_CHOICES {
            return Err(Error::InvalidRoster(format!(
                "campers need {} choices but the catalog only offers {} classes",
                TOP_CHOICES,
                catalog.len()
            )));
        }

        let mut seen = HashSet::new();
        for camper in &campers {
            if !seen.insert((camper.name(), camper.age)) {
                return Err(Error::InvalidRoster(format!("camper '{}' (age {}) is listed twice", camper.name(), camper.age)));
            }
        }

        Ok(Roster { campers })
    }

    pub fn len(&self) -> usize {
        self.campers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.campers.is_empty()
    }

    pub fn get(&self, camper: CamperIndex) -> &Camper {
        &self.campers[camper]
    }

    pub fn iter(&self) -> impl Iterator<Item = (CamperIndex, &Camper)> {
        self.campers.iter().enumerate()
    }
}
