use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use camp_scheduler::domain::search::config::SearchConfig;
use camp_scheduler::domain::search::driver::TrialDriver;
use camp_scheduler::domain::search::monitor::LogProgress;
use camp_scheduler::loader::export::export_camper_csv;
use camp_scheduler::loader::parser::{parse_json_file, write_json_file};
use camp_scheduler::{load_inputs, logger};

/// Builds a camp class schedule from a class catalog and a camper roster.
#[derive(Debug, Parser)]
#[command(name = "camp-scheduler", version, about)]
struct Cli {
    /// Class catalog JSON.
    #[arg(long)]
    classes: PathBuf,

    /// Camper roster JSON.
    #[arg(long)]
    roster: PathBuf,

    /// Search configuration JSON. Flags below override single fields.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    attempts: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    threads: Option<usize>,

    /// Wall-clock cap in seconds.
    #[arg(long)]
    time_limit: Option<u64>,

    #[arg(long)]
    max_failure_ratio: Option<f64>,

    /// Where to write the schedule as JSON.
    #[arg(long, short, default_value = "schedule.json")]
    output: PathBuf,

    /// Also write the per-camper table as CSV.
    #[arg(long)]
    csv: Option<PathBuf>,
}

impl Cli {
    fn search_config(&self) -> anyhow::Result<SearchConfig> {
        let mut config = match &self.config {
            Some(path) => parse_json_file::<SearchConfig>(path).with_context(|| format!("reading config {}", path.display()))?,
            None => SearchConfig { progress_step: 10.0, ..SearchConfig::default() },
        };

        if let Some(attempts) = self.attempts {
            config.max_attempts = attempts;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if let Some(secs) = self.time_limit {
            config.time_limit_secs = Some(secs);
        }
        if let Some(ratio) = self.max_failure_ratio {
            config.max_failure_ratio = ratio;
        }

        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    logger::init();

    let cli = Cli::parse();
    let config = cli.search_config()?;

    let (catalog, roster) = load_inputs(&cli.classes, &cli.roster)
        .with_context(|| format!("loading {} and {}", cli.classes.display(), cli.roster.display()))?;

    let driver = TrialDriver::new(catalog, roster, config)?;
    let outcome = driver.run_with_progress(&LogProgress).context("searching for a schedule")?;

    outcome.best.log_summary();

    write_json_file(&cli.output, &outcome.best.to_dto()).with_context(|| format!("writing {}", cli.output.display()))?;
    log::info!("Schedule written to '{}'.", cli.output.display());

    if let Some(csv_path) = &cli.csv {
        export_camper_csv(&outcome.best, csv_path).with_context(|| format!("writing {}", csv_path.display()))?;
        log::info!("Camper table written to '{}'.", csv_path.display());
    }

    Ok(())
}
