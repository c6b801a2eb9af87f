use serde::{Deserialize, Serialize};

/// One class as entered by the class input form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDto {
    pub title: String,

    /// Periods (1..=3) the class may run in. Empty means unrestricted.
    /// Older class files call this `restrictedPeriods`.
    #[serde(default, alias = "restrictedPeriods")]
    pub allowed_periods: Vec<u8>,

    #[serde(default)]
    pub double_period: bool,

    #[serde(default)]
    pub is_required: bool,

    #[serde(default, rename = "is10Plus")]
    pub is_10_plus: bool,

    #[serde(default)]
    pub must_be_consecutive: bool,

    #[serde(default)]
    pub requires_swim_level: bool,

    pub single_period_cutoff: u32,

    /// Titles of classes that may not share a period with this one.
    #[serde(default)]
    pub restricted_concurrent_classes: Vec<String>,
}

/// Class files come either as a bare array or wrapped in `{ "classes": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CatalogDto {
    List(Vec<ClassDto>),
    Wrapped { classes: Vec<ClassDto> },
}

impl CatalogDto {
    pub fn into_classes(self) -> Vec<ClassDto> {
        match self {
            CatalogDto::List(classes) => classes,
            CatalogDto::Wrapped { classes } => classes,
        }
    }
}
