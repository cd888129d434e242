// SPDX-License-Identifier: MPL-2.0
use magnet_studio::compositor::{GridSlot, SheetOptions};
use magnet_studio::config::{self, IntakeOrder};
use magnet_studio::error::{Error, Result};
use magnet_studio::intake::{self, Candidate, HttpFetcher, UploadStatus};
use magnet_studio::Studio;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

const HELP: &str = "\
Usage: magnet_studio [OPTIONS] FILES...

Imports photos into a magnet grid and prints the resulting layout.

Options:
  --config PATH       Read settings from PATH instead of the user config
  --url URL           Import a remote photo (repeatable)
  --sheet OUT.png     Render the grid into a print sheet
  --cell PX           Cell size of the print sheet in pixels (1-4096)
  --order ORDER       Intake order: completion (default) or submission
  -h, --help          Show this help
";

struct Args {
    config: Option<PathBuf>,
    urls: Vec<String>,
    sheet: Option<PathBuf>,
    cell: Option<u32>,
    order: Option<IntakeOrder>,
    files: Vec<PathBuf>,
}

fn parse_args() -> Result<Option<Args>> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let to_config_error = |e: pico_args::Error| Error::Config(e.to_string());
    Ok(Some(Args {
        config: args.opt_value_from_str("--config").map_err(to_config_error)?,
        urls: args.values_from_str("--url").map_err(to_config_error)?,
        sheet: args.opt_value_from_str("--sheet").map_err(to_config_error)?,
        cell: args.opt_value_from_str("--cell").map_err(to_config_error)?,
        order: args.opt_value_from_str("--order").map_err(to_config_error)?,
        files: args.finish().into_iter().map(PathBuf::from).collect(),
    }))
}

async fn run(args: Args) -> Result<()> {
    let mut settings = match &args.config {
        Some(path) => config::load_from_path(path)?,
        None => config::load().unwrap_or_else(|err| {
            log::warn!("Using default settings: {err}");
            config::Config::default()
        }),
    };
    if let Some(order) = args.order {
        settings.intake_order = Some(order);
    }

    let mut sheet_options = SheetOptions::default();
    if let Some(cell) = args.cell {
        sheet_options.cell_size = cell;
    }
    if args.sheet.is_some() {
        sheet_options.validate()?;
    }

    let mut studio = Studio::new(settings);
    if !args.urls.is_empty() {
        let fetcher = HttpFetcher::new(studio.config().fetch_timeout())?;
        studio = studio.with_intake(|pipeline| pipeline.with_fetcher(Arc::new(fetcher)));
    }

    let candidates: Vec<Candidate> = args
        .files
        .into_iter()
        .map(Candidate::Path)
        .chain(args.urls.into_iter().map(Candidate::Url))
        .collect();
    if candidates.is_empty() {
        print!("{HELP}");
        return Ok(());
    }

    let token = intake::cancellation_token();
    let report = studio.import(candidates, &token).await?;

    for task in studio.board().tasks() {
        let status = match task.status {
            UploadStatus::Uploading => "uploading",
            UploadStatus::Done => "done",
            UploadStatus::Error => "error",
        };
        match &task.error {
            Some(message) => println!("{status:>9}  {} ({}): {message}", task.name, task.size_label),
            None => println!("{status:>9}  {} ({})", task.name, task.size_label),
        }
    }
    if report.skipped > 0 {
        println!("{} file(s) skipped, the grid is full", report.skipped);
    }

    let layout = studio.layout();
    println!("\nGrid {}x{}:", layout.columns(), layout.rows());
    for (index, slot) in studio.grid().iter().enumerate() {
        match slot {
            GridSlot::Filled(slot) => println!(
                "  [{index}] {}  filter: {}  transform: {}",
                slot.file_name,
                slot.filter,
                slot.transform.css()
            ),
            GridSlot::Empty => println!("  [{index}] (empty)"),
        }
    }

    if let Some(path) = args.sheet {
        let sheet = studio.render_sheet(&sheet_options)?;
        sheet.save(&path)?;
        println!("\nSheet written to {}", path.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("{err}\n\n{HELP}");
            return ExitCode::FAILURE;
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
