//! Command-line interface implementation
//!
//! Stands in for the interactive front end: picks the directory, collects
//! the options and shows notifications on the console.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::compositor::delete_hires_assets;
use crate::config::{load_config, merge_cli_overrides, CliOverrides, StackConfig};
use crate::notify::{ConsoleNotifier, Notice, Notifier};
use crate::options::Resolution;
use crate::pipeline::process;
use crate::report::{AssetOutcome, BatchReport};
use crate::skin_ini::{patch_skin_ini, IniPatch, SKIN_INI};

pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Triple Stack Skin Maker - stack hitcircle overlays and patch skin.ini
#[derive(Parser)]
#[command(name = "triplestack")]
#[command(about = "Triple Stack Skin Maker - stack hitcircle overlays onto osu! skin sprites")]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: nearest triplestack.toml, if any)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Delete @2x assets, stack the overlay onto sprites and patch skin.ini.
    /// BACKUP first, or use --copy.
    Process {
        /// Skin directory
        dir: PathBuf,

        /// Work on a copy named "<dir>@3xStack" instead of in place
        #[arg(long)]
        copy: bool,

        /// Hitcircle resolution: "native" or a pixel size (e.g. 140, 150, 160).
        /// Leave native unless circles come out randomly small or large.
        #[arg(long)]
        resolution: Option<Resolution>,

        /// Also rewrite hitcircleoverlay.png at the forced resolution
        #[arg(long)]
        force_overlay: bool,

        /// HitCircleOverlap value written to skin.ini
        #[arg(long)]
        value: Option<String>,

        /// Print the batch report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Only register HitCircleOverlap in skin.ini
    PatchIni {
        /// Skin directory
        dir: PathBuf,

        /// HitCircleOverlap value
        #[arg(long)]
        value: Option<String>,
    },

    /// Only delete @2x assets
    Clean {
        /// Skin directory
        dir: PathBuf,
    },
}

/// Initialise logging. `RUST_LOG` wins; otherwise the verbosity flags pick
/// the level (default `warn`).
fn init_logging(verbose: u8, quiet: bool) {
    let level = match (verbose, quiet) {
        (0, true) => log::LevelFilter::Error,
        (0, false) => log::LevelFilter::Warn,
        (1, _) => log::LevelFilter::Info,
        (2, _) => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .try_init();
}

fn load(config: Option<&Path>, overrides: &CliOverrides) -> Result<StackConfig, ExitCode> {
    load_config(config).and_then(|c| merge_cli_overrides(c, overrides)).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })
}

/// Run the CLI
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    let notifier = ConsoleNotifier::new(cli.quiet);

    match cli.command {
        Commands::Process { dir, copy, resolution, force_overlay, value, json } => {
            let overrides = CliOverrides {
                copy: copy.then_some(true),
                resolution,
                force_overlay: force_overlay.then_some(true),
                overlap: value,
            };
            let config = match load(cli.config.as_deref(), &overrides) {
                Ok(c) => c,
                Err(code) => return code,
            };
            if json {
                // stdout carries only the report
                run_process(&dir, &config, json, &notifier.with_info_on_stderr())
            } else {
                run_process(&dir, &config, json, &notifier)
            }
        }
        Commands::PatchIni { dir, value } => {
            let overrides = CliOverrides { overlap: value, ..Default::default() };
            let config = match load(cli.config.as_deref(), &overrides) {
                Ok(c) => c,
                Err(code) => return code,
            };
            run_patch_ini(&dir, &config, &notifier)
        }
        Commands::Clean { dir } => {
            let config = match load(cli.config.as_deref(), &CliOverrides::default()) {
                Ok(c) => c,
                Err(code) => return code,
            };
            run_clean(&dir, &config, &notifier)
        }
    }
}

fn run_process(dir: &Path, config: &StackConfig, json: bool, notifier: &dyn Notifier) -> ExitCode {
    let report = match process(dir, config, config.options(), notifier) {
        Ok(report) => report,
        Err(e) => {
            notifier.notify(Notice::error("Processing failed", e.to_string()));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        print_failures(&report, notifier);
        notifier.notify(Notice::info("Summary", summary_line(&report)));
    }

    if report.has_failures() {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}

fn print_failures(report: &BatchReport, notifier: &dyn Notifier) {
    for record in &report.assets {
        match &record.outcome {
            AssetOutcome::Failed(reason) => {
                notifier.notify(Notice::error(record.file.clone(), reason.clone()))
            }
            AssetOutcome::FailedBestEffort(reason) => {
                notifier.notify(Notice::warning(record.file.clone(), reason.clone()))
            }
            _ => {}
        }
    }
}

/// One-line tally of a processing run
fn summary_line(report: &BatchReport) -> String {
    let failed = report.count(|o| matches!(o, AssetOutcome::Failed(_) | AssetOutcome::FailedBestEffort(_)));
    format!(
        "{} asset(s) rewritten, {} deleted, {} failed",
        report.succeeded(),
        report.deleted.len(),
        failed
    )
}

fn run_patch_ini(dir: &Path, config: &StackConfig, notifier: &dyn Notifier) -> ExitCode {
    if !dir.is_dir() {
        eprintln!("Error: '{}' is not a directory", dir.display());
        return ExitCode::from(EXIT_INVALID_ARGS);
    }
    match patch_skin_ini(dir, &IniPatch::hit_circle_overlap(config.ini.overlap.as_str())) {
        Ok(outcome) => {
            notifier.notify(Notice::info(
                "Complete",
                format!("{} updated (line {})", SKIN_INI, outcome.placement.line() + 1),
            ));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            notifier.notify(Notice::error("Patch failed", e.to_string()));
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run_clean(dir: &Path, config: &StackConfig, notifier: &dyn Notifier) -> ExitCode {
    let mut report = BatchReport::new();
    match delete_hires_assets(dir, &config.skin.hires_marker, &mut report) {
        Ok(deleted) => {
            if deleted.is_empty() {
                notifier.notify(Notice::info("Complete", "Nothing to delete."));
            } else {
                notifier.notify(Notice::info("Deleted", deleted.join("\n")));
            }
            print_failures(&report, notifier);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            notifier.notify(Notice::error("Cleanup failed", e.to_string()));
            ExitCode::from(EXIT_ERROR)
        }
    }
}
