mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use eframe::egui;

use app::BidDashboardApp;
use data::terms::{TermAxis, DEFAULT_FIRST_YEAR, DEFAULT_LAST_YEAR, MAX_YEAR, MIN_YEAR};
use state::AppState;

const DEFAULT_DATA_PATH: &str = "data/boss_merge.csv";

#[derive(Parser, Debug)]
#[command(author, version, about = "Course bidding history dashboard", long_about = None)]
struct Cli {
    /// Bidding table (.csv, .tsv, .json or .parquet); asks with a file picker when absent
    #[arg(long, env = "BID_DASHBOARD_DATA", value_hint = clap::ValueHint::FilePath)]
    data: Option<PathBuf>,

    /// First academic year on the term axis
    #[arg(
        long,
        default_value_t = DEFAULT_FIRST_YEAR,
        value_parser = clap::value_parser!(i32).range(i64::from(MIN_YEAR)..=i64::from(MAX_YEAR))
    )]
    first_year: i32,

    /// Last academic year on the term axis (inclusive)
    #[arg(
        long,
        default_value_t = DEFAULT_LAST_YEAR,
        value_parser = clap::value_parser!(i32).range(i64::from(MIN_YEAR)..=i64::from(MAX_YEAR))
    )]
    last_year: i32,
}

impl Cli {
    fn term_axis(&self) -> Result<TermAxis> {
        for year in [self.first_year, self.last_year] {
            if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
                bail!("year {year} is outside {MIN_YEAR}..={MAX_YEAR}");
            }
        }
        if self.first_year > self.last_year {
            bail!(
                "--first-year {} is after --last-year {}",
                self.first_year,
                self.last_year
            );
        }
        Ok(TermAxis::generate(self.first_year, self.last_year))
    }

    /// Explicit path, else the default file if present, else ask the user.
    fn data_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.data {
            return Ok(path.clone());
        }
        let default = Path::new(DEFAULT_DATA_PATH);
        if default.exists() {
            return Ok(default.to_path_buf());
        }
        rfd::FileDialog::new()
            .set_title("Open bidding data")
            .add_filter("Supported files", &["csv", "tsv", "tab", "json", "parquet", "pq"])
            .pick_file()
            .context("no bidding table selected")
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let axis = cli.term_axis()?;
    let path = cli.data_path()?;
    let dataset = data::loader::load_file(&path).map_err(|e| {
        log::error!("Failed to load {}: {e}", path.display());
        e
    })?;
    if dataset.is_empty() {
        log::warn!("{} contains no records", path.display());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    let state = AppState::new(dataset, axis, path);
    eframe::run_native(
        "Course Bidding Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(BidDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow!("{e}"))
}
