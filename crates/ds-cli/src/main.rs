//! CLI entry point for the dirscan directory scanner.
//!
//! This binary starts scans on a background worker, shows progress while
//! they run, and renders or exports the result.
//!
//! # Usage
//!
//! ```bash
//! dirscan [OPTIONS] <COMMAND>
//!
//! # Detail table of every file up to depth 3
//! dirscan scan ./data
//!
//! # Tree view of images only, with the extension breakdown
//! dirscan scan ./data --preset images --view tree --stats
//!
//! # Export the file list as CSV
//! dirscan export ./data --format csv --output files.csv
//!
//! # Spreadsheet with clickable paths
//! dirscan export ./data --format xlsx --output files.xlsx
//!
//! # Write the default settings file
//! dirscan config init
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod render;
mod run;

use std::fs::File;
use std::io::{BufWriter, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{WrapErr, eyre};
use ds_core::{
    Config, ExportFormat, ExportRecord, FilterPreset, ScanConfiguration, ScanSettings, SortColumn,
    SortState, files_only, write_csv, write_json, write_xlsx,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::render::View;
use crate::run::run_scan;

/// Settings file used when `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "dirscan.json";

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Depth-limited directory scanner with filtering, views, and export.
#[derive(Parser)]
#[command(name = "dirscan", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// Settings file (JSON).
    ///
    /// Defaults to `./dirscan.json`; a missing default file is not an error.
    #[arg(short, long, global = true, env = "DIRSCAN_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Scan a directory and display the result.
    Scan {
        #[command(flatten)]
        scan: ScanArgs,

        /// Result view.
        #[arg(long, value_enum, default_value_t = View::Detail)]
        view: View,

        /// Sort by column (name, path, kind, size, modified, extension).
        #[arg(long)]
        sort: Option<SortColumn>,

        /// Sort descending.
        #[arg(long)]
        reverse: bool,

        /// Print totals and the per-extension breakdown.
        #[arg(long)]
        stats: bool,
    },

    /// Scan a directory and export the file list.
    Export {
        #[command(flatten)]
        scan: ScanArgs,

        /// Output format (json, csv, xlsx). Defaults to the settings file value.
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// Output file (defaults to stdout; required for xlsx).
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,

        /// Write JSON on a single line.
        #[arg(long)]
        compact: bool,
    },

    /// Manage the settings file.
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Settings file subcommands.
#[derive(Subcommand)]
enum ConfigCommand {
    /// Write the default settings.
    Init {
        /// Target file (defaults to `--config` or `./dirscan.json`).
        #[arg(long)]
        path: Option<Utf8PathBuf>,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Print the effective settings.
    Show {
        /// Settings file (defaults to `--config` or `./dirscan.json`).
        #[arg(long)]
        path: Option<Utf8PathBuf>,
    },
}

/// Options shared by every scanning command.
#[derive(Args)]
struct ScanArgs {
    /// Directory to scan.
    path: Utf8PathBuf,

    /// Maximum depth below the root (1-50).
    #[arg(short, long)]
    depth: Option<usize>,

    /// Include dot-prefixed files and directories.
    #[arg(long)]
    hidden: bool,

    /// Comma-separated extensions, e.g. `txt,.md`; `*` for all.
    #[arg(short, long, conflicts_with = "preset")]
    ext: Option<String>,

    /// Named extension group.
    #[arg(long)]
    preset: Option<FilterPreset>,

    /// Keep directories without matching files.
    #[arg(long)]
    show_empty: bool,

    /// Descend into symlinked directories.
    #[arg(long)]
    follow_links: bool,
}

impl ScanArgs {
    /// Overlays command-line flags on the persisted settings.
    fn merge(&self, base: &ScanSettings) -> ScanSettings {
        let mut settings = base.clone();
        if let Some(depth) = self.depth {
            settings.max_depth = depth;
        }
        if let Some(ext) = &self.ext {
            settings.extensions.clone_from(ext);
        } else if let Some(preset) = self.preset {
            settings.extensions = preset.extensions().to_owned();
        }
        settings.include_hidden |= self.hidden;
        settings.show_empty_folders |= self.show_empty;
        settings.follow_links |= self.follow_links;
        settings
    }

    /// Builds the immutable configuration for one scan.
    fn configuration(&self, config: &Config) -> color_eyre::Result<ScanConfiguration> {
        let root = self
            .path
            .canonicalize_utf8()
            .unwrap_or_else(|_| self.path.clone());
        let settings = self.merge(&config.scan);
        Ok(ScanConfiguration::from_settings(&root, &settings)?)
    }
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects `RUST_LOG` if set. Otherwise uses `debug` with `--verbose` and
/// `warn` by default, so unreadable entries still surface. Logs go to
/// stderr to keep stdout clean for views and exports.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "warn" };
        EnvFilter::new(level)
    });

    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(use_ansi)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Loads settings from `--config`, or from the default file if present.
fn load_config(explicit: Option<&Utf8Path>) -> color_eyre::Result<Config> {
    match explicit {
        Some(path) => {
            Config::load(path).wrap_err_with(|| format!("Failed to load settings from {path}"))
        }
        None => Ok(Config::load_or_default(Utf8Path::new(DEFAULT_CONFIG_FILE))?),
    }
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Runs a scan and renders the chosen view followed by a summary.
async fn cmd_scan(
    config: &Config,
    args: &ScanArgs,
    view: View,
    sort: SortState,
    show_stats: bool,
) -> color_eyre::Result<()> {
    let scan_config = args.configuration(config)?;
    let root_label = scan_config.root.to_string();
    let report = run_scan(scan_config).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render::render_view(&mut out, view, &root_label, &report.outcome.entries, sort)?;
    if show_stats {
        render::render_stats(&mut out, &report.outcome.stats)?;
    }
    writeln!(out)?;
    render::render_summary(&mut out, &report.outcome, report.diagnostics)?;
    out.flush()?;
    Ok(())
}

/// Runs a scan and writes the files-only export.
async fn cmd_export(
    config: &Config,
    args: &ScanArgs,
    format: Option<ExportFormat>,
    output: Option<&Utf8Path>,
    compact: bool,
) -> color_eyre::Result<()> {
    let scan_config = args.configuration(config)?;
    let root = scan_config.root.clone();
    let format = format.unwrap_or(config.export.format);
    let pretty = config.export.pretty_json && !compact;
    if format == ExportFormat::Xlsx && output.is_none() {
        return Err(eyre!("xlsx export needs --output"));
    }

    let report = run_scan(scan_config).await?;
    if report.outcome.was_cancelled {
        warn!("Scan was stopped; export contains a partial result");
    }

    let records = files_only(&report.outcome.entries, &root);

    match output {
        Some(path) => {
            let file = File::create(path).wrap_err_with(|| format!("Failed to create {path}"))?;
            let mut writer = BufWriter::new(file);
            write_records(&records, format, pretty, &mut writer)?;
            writer.flush()?;
            info!(path = %path, records = records.len(), %format, "Export written");
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            write_records(&records, format, pretty, &mut out)?;
            out.flush()?;
        }
    }

    Ok(())
}

fn write_records(
    records: &[ExportRecord],
    format: ExportFormat,
    pretty: bool,
    writer: &mut impl Write,
) -> color_eyre::Result<()> {
    match format {
        ExportFormat::Json => write_json(records, writer, pretty)?,
        ExportFormat::Csv => write_csv(records, writer)?,
        ExportFormat::Xlsx => write_xlsx(records, writer)?,
    }
    Ok(())
}

/// Writes the default settings file.
fn cmd_config_init(path: &Utf8Path, force: bool) -> color_eyre::Result<()> {
    if path.exists() && !force {
        return Err(eyre!("{path} already exists (use --force to overwrite)"));
    }
    Config::default().save(path)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Wrote default settings to {path}")?;
    Ok(())
}

/// Prints the effective settings as JSON.
fn cmd_config_show(path: &Utf8Path, explicit: bool) -> color_eyre::Result<()> {
    let config = if explicit {
        load_config(Some(path))?
    } else {
        Config::load_or_default(path)?
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &config)?;
    writeln!(out)?;
    Ok(())
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.no_color);

    match &cli.command {
        Commands::Scan {
            scan,
            view,
            sort,
            reverse,
            stats,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let sort = SortState {
                column: *sort,
                descending: *reverse,
            };
            cmd_scan(&config, scan, *view, sort, *stats).await
        }
        Commands::Export {
            scan,
            format,
            output,
            compact,
        } => {
            let config = load_config(cli.config.as_deref())?;
            cmd_export(&config, scan, *format, output.as_deref(), *compact).await
        }
        Commands::Config(ConfigCommand::Init { path, force }) => {
            let path = path
                .as_deref()
                .or(cli.config.as_deref())
                .unwrap_or(Utf8Path::new(DEFAULT_CONFIG_FILE));
            cmd_config_init(path, *force)
        }
        Commands::Config(ConfigCommand::Show { path }) => {
            let explicit = path.as_deref().or(cli.config.as_deref());
            cmd_config_show(
                explicit.unwrap_or(Utf8Path::new(DEFAULT_CONFIG_FILE)),
                explicit.is_some(),
            )
        }
    }
}
