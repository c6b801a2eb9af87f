use std::fs;
use std::path::PathBuf;

use camp_scheduler::domain::search::config::SearchConfig;
use camp_scheduler::error::Error;
use camp_scheduler::loader::export::export_camper_csv;
use camp_scheduler::loader::parser::{parse_json_file, write_json_file};
use camp_scheduler::{generate_schedule, load_inputs};

fn data(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("data").join(file)
}

fn scratch(file: &str) -> PathBuf {
    std::env::temp_dir().join(format!("camp_scheduler_{}_{}", std::process::id(), file))
}

fn config() -> SearchConfig {
    SearchConfig { max_attempts: 10, seed: Some(5), ..SearchConfig::default() }
}

#[test]
fn test_load_inputs() {
    let (catalog, roster) = load_inputs(data("classes.json"), data("roster.json")).expect("fixtures load");

    assert_eq!(catalog.len(), 5);
    assert_eq!(roster.len(), 10);

    let canoe = catalog.by_title("Canoe").expect("Canoe is listed");
    let kayak = catalog.by_title("Kayak").expect("Kayak is listed");
    assert!(canoe.conflicts_with(kayak));
    assert!(kayak.conflicts_with(canoe));
    assert_eq!(catalog.first_required(), catalog.index_of("Swim"));

    let (_, paddler) = roster.iter().find(|(_, c)| c.name() == "Paddler 0").expect("Paddler 0 is listed");
    assert!(paddler.requires_swim_lessons());
    assert_eq!(paddler.class_at_rank(1), catalog.index_of("Kayak"));
}

#[test]
fn test_generate_schedule() {
    let outcome = generate_schedule(data("classes.json"), data("roster.json"), &config()).expect("search succeeds");
    let dto = outcome.best.to_dto();

    // Kayak has four supporters. Paddlers fall back to Canoe and take swim lessons.
    assert_eq!(dto.eliminated_classes, vec!["Kayak".to_string()]);
    assert_eq!(dto.score, 6 * (1 + 2 + 3) + 4 * (2 + 3 + 3));
    assert_eq!(dto.periods.iter().map(|p| p.budget).collect::<Vec<_>>(), vec![2, 1, 1]);

    let names: Vec<&str> = dto.campers.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Regular 0", "Regular 3", "Regular 1", "Regular 4", "Regular 2", "Regular 5", "Paddler 0", "Paddler 1", "Paddler 2", "Paddler 3"]
    );

    let paddler = &dto.campers[6];
    assert_eq!(paddler.final_choices, vec![Some("Archery".to_string()), Some("Canoe".to_string()), Some("Swim".to_string())]);
    assert!(paddler.periods.iter().flatten().all(|p| !p.forced));
}

#[test]
fn test_schedule_exports() {
    let outcome = generate_schedule(data("classes.json"), data("roster.json"), &config()).expect("search succeeds");

    let json_path = scratch("schedule.json");
    write_json_file(&json_path, &outcome.best.to_dto()).expect("json is written");
    let written: serde_json::Value = parse_json_file(&json_path).expect("json reads back");
    assert_eq!(written["eliminatedClasses"], serde_json::json!(["Kayak"]));
    assert_eq!(written["campers"][0]["swimLevel"], 4);

    let csv_path = scratch("schedule.csv");
    export_camper_csv(&outcome.best, &csv_path).expect("csv is written");

    let mut reader = csv::Reader::from_path(&csv_path).expect("csv reads back");
    let header = reader.headers().expect("header row").clone();
    assert_eq!(header.iter().collect::<Vec<_>>(), vec!["Name", "Age", "Period 1", "Period 2", "Period 3"]);

    let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>().expect("rows parse");
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0].iter().collect::<Vec<_>>(), vec!["Regular 0", "9", "Crafts", "Archery", "Canoe"]);
    assert_eq!(rows[9].iter().collect::<Vec<_>>(), vec!["Paddler 3", "13", "Swim", "Archery", "Canoe"]);

    let _ = fs::remove_file(json_path);
    let _ = fs::remove_file(csv_path);
}

#[test]
fn test_missing_file_is_an_io_error() {
    let result = load_inputs(data("no_such_classes.json"), data("roster.json"));

    assert!(matches!(result, Err(Error::IoError(_))));
}

#[test]
fn test_malformed_roster_is_rejected() {
    let path = scratch("malformed_roster.json");
    fs::write(&path, r#"[{"name": "Ada", "age": "twelve"}]"#).expect("fixture is written");

    let result = load_inputs(data("classes.json"), &path);

    assert!(matches!(result, Err(Error::DeserializationError(_))));
    let _ = fs::remove_file(path);
}

#[test]
fn test_roster_with_unknown_class_is_rejected() {
    let path = scratch("unknown_class_roster.json");
    let roster = serde_json::json!([
        { "name": "Ada", "age": 12, "swimLevel": 4, "rankings": ["Archery", "Canoe", "Crafts", "Kayak", "Fencing"] }
    ]);
    fs::write(&path, roster.to_string()).expect("fixture is written");

    let result = load_inputs(data("classes.json"), &path);

    assert!(matches!(result, Err(Error::InvalidRoster(_))));
    let _ = fs::remove_file(path);
}
