use std::path::Path;

use crate::domain::schedule::{NUM_PERIODS, Schedule};
use crate::error::Result;

/// Writes one row per camper (Name, Age, Period 1..3), sorted by age then name.
/// Forced placements are marked with a trailing `*`.
pub fn export_camper_csv(schedule: &Schedule, file_path: impl AsRef<Path>) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(true).from_path(file_path)?;

    let mut header = vec!["Name".to_string(), "Age".to_string()];
    header.extend((1..=NUM_PERIODS).map(|p| format!("Period {}", p)));
    writer.write_record(&header)?;

    let mut views: Vec<_> = schedule.campers().collect();
    views.sort_by(|a, b| a.camper.age.cmp(&b.camper.age).then_with(|| a.camper.name().cmp(b.camper.name())));

    for view in views {
        let mut record = vec![view.camper.name().to_string(), view.camper.age.to_string()];
        for placement in &view.state.periods {
            let cell = match placement {
                Some(p) if p.forced => format!("{}*", schedule.catalog().title(p.class)),
                Some(p) => schedule.catalog().title(p.class).to_string(),
                None => String::new(),
            };
            record.push(cell);
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
