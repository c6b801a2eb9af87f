use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CamperDto {
    pub name: String,
    pub age: u32,
    pub swim_level: u8,

    /// Class titles, best first. Must name every catalog class exactly once.
    pub rankings: Vec<String>,
}

/// Roster files come either as a bare array or wrapped in `{ "campers": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RosterDto {
    List(Vec<CamperDto>),
    Wrapped { campers: Vec<CamperDto> },
}

impl RosterDto {
    pub fn into_campers(self) -> Vec<CamperDto> {
        match self {
            RosterDto::List(campers) => campers,
            RosterDto::Wrapped { campers } => campers,
        }
    }
}
