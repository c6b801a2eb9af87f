use serde::Serialize;

/// The finished schedule as handed to presentation layers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDto {
    pub score: i64,
    pub trial: usize,
    pub eliminated_classes: Vec<String>,
    pub periods: Vec<PeriodDto>,
    pub campers: Vec<CamperScheduleDto>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodDto {
    pub period: u8,
    pub budget: usize,
    pub classes: Vec<PeriodClassDto>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodClassDto {
    pub title: String,
    pub enrolled: usize,
    pub cutoff: usize,

    /// Number of campers placed beyond the cutoff.
    pub forced: usize,
    pub campers: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CamperScheduleDto {
    pub name: String,
    pub age: u32,
    pub swim_level: u8,
    pub final_choices: Vec<Option<String>>,
    pub periods: Vec<Option<PlacementDto>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementDto {
    pub title: String,
    pub forced: bool,
}
