use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::api::camper_dto::{CamperDto, RosterDto};
use crate::api::class_dto::{CatalogDto, ClassDto};
use crate::error::Result;

/// Parses a JSON file into a given type `T`.
///
/// Errors are converted into `crate::error::Error` variants:
/// - `Error::IoError` if the file cannot be read.
/// - `Error::DeserializationError` if the JSON is malformed.
pub fn parse_json_file<T: DeserializeOwned>(file_path: impl AsRef<Path>) -> Result<T> {
    let data = fs::read_to_string(file_path)?;

    let parsed_data: T = serde_json::from_str(&data)?;

    Ok(parsed_data)
}

/// Reads a class file in either the bare-array or the wrapped layout.
pub fn parse_class_file(file_path: impl AsRef<Path>) -> Result<Vec<ClassDto>> {
    let catalog: CatalogDto = parse_json_file(file_path)?;
    Ok(catalog.into_classes())
}

/// Reads a camper file in either the bare-array or the wrapped layout.
pub fn parse_roster_file(file_path: impl AsRef<Path>) -> Result<Vec<CamperDto>> {
    let roster: RosterDto = parse_json_file(file_path)?;
    Ok(roster.into_campers())
}

/// Writes `value` as pretty-printed JSON, replacing any existing file.
pub fn write_json_file<T: Serialize>(file_path: impl AsRef<Path>, value: &T) -> Result<()> {
    let data = serde_json::to_string_pretty(value)?;
    fs::write(file_path, data)?;
    Ok(())
}
