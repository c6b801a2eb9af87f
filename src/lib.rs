use std::path::Path;

use crate::domain::catalog::Catalog;
use crate::domain::roster::Roster;
use crate::domain::search::config::SearchConfig;
use crate::domain::search::driver::{SearchOutcome, TrialDriver};
use crate::error::Result;
use crate::loader::parser::{parse_class_file, parse_roster_file};

pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

/// Reads and validates the class catalog and the camper roster.
pub fn load_inputs(classes_path: impl AsRef<Path>, roster_path: impl AsRef<Path>) -> Result<(Catalog, Roster)> {
    let class_dtos = parse_class_file(classes_path)?;
    let catalog = Catalog::from_dto(class_dtos)?;
    log::info!("Class catalog loaded with {} classes.", catalog.len());

    let camper_dtos = parse_roster_file(roster_path)?;
    let roster = Roster::from_dto(camper_dtos, &catalog)?;
    log::info!("Roster loaded with {} campers.", roster.len());

    Ok((catalog, roster))
}

/// Loads both inputs and searches for the best schedule.
pub fn generate_schedule(classes_path: impl AsRef<Path>, roster_path: impl AsRef<Path>, config: &SearchConfig) -> Result<SearchOutcome> {
    let (catalog, roster) = load_inputs(classes_path, roster_path)?;

    let driver = TrialDriver::new(catalog, roster, config.clone())?;
    driver.run()
}
