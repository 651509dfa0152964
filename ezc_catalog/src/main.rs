//! # ezc_catalog
//!
//! Keeps translation catalogs in step with the message templates a program
//! declares.
//!
//! # Usage
//!
//! ```bash
//! # Fold exported templates into the German catalog, creating it if needed
//! ezc_catalog merge --templates templates.json --catalog locale/de.toml --locale de
//!
//! # Fail (exit 1) if anything is missing or untranslated
//! ezc_catalog check --templates templates.json --catalog locale/de.toml
//!
//! # Entry counts, verbose JSON logs
//! ezc_catalog stats --catalog locale/de.toml -v --json
//! ```

#![deny(warnings)]

use clap::{Parser, Subcommand};
use ezc::config::{ConfigLoader, LogLevel};
use ezc::consts::DEFAULT_CATALOG_PATH;
use ezc_catalog::{ToolConfig, check, merge, stats};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// ezc_catalog - translation catalog maintenance
#[derive(Parser, Debug)]
#[command(name = "ezc_catalog")]
#[command(version)]
#[command(about = "Merge and check translation catalogs against exported message templates")]
#[command(long_about = None)]
struct Args {
    /// Optional tool configuration file ([shared] and [defaults] tables).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add declared templates missing from the catalog
    Merge {
        /// Template export (JSON) written by the program
        #[arg(short, long)]
        templates: PathBuf,

        /// Catalog file to update
        #[arg(short, long, default_value = DEFAULT_CATALOG_PATH)]
        catalog: PathBuf,

        /// Locale of the catalog, required when it does not exist yet
        #[arg(short, long)]
        locale: Option<String>,

        /// Remove entries whose template is no longer declared
        #[arg(long)]
        prune: bool,
    },

    /// Report missing, untranslated and stale entries
    Check {
        /// Template export (JSON) written by the program
        #[arg(short, long)]
        templates: PathBuf,

        /// Catalog file to check
        #[arg(short, long, default_value = DEFAULT_CATALOG_PATH)]
        catalog: PathBuf,
    },

    /// Print entry counts
    Stats {
        /// Catalog file to inspect
        #[arg(short, long, default_value = DEFAULT_CATALOG_PATH)]
        catalog: PathBuf,
    },
}

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("ezc_catalog failed: {}", e);
            eprintln!("ezc_catalog: {e}");
            std::process::exit(2);
        }
    }
}

/// Returns false when `check` finds an incomplete catalog.
fn run() -> Result<bool, Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let config = ToolConfig::load(path)?;
            config.validate()?;
            Some(config)
        }
        None => None,
    };

    setup_tracing(&args, config.as_ref().map(|c| c.shared.log_level));
    info!("ezc_catalog v{} starting...", env!("CARGO_PKG_VERSION"));

    let defaults = config.map(|c| c.defaults).unwrap_or_default();

    match args.command {
        Command::Merge {
            templates,
            catalog,
            locale,
            prune,
        } => {
            let locale = locale.or(defaults.locale);
            let report = merge(&templates, &catalog, locale.as_deref(), prune || defaults.prune)?;
            println!(
                "{}: {} added, {} stale{}",
                catalog.display(),
                report.added.len(),
                report.stale.len(),
                if report.pruned { " (pruned)" } else { "" }
            );
            Ok(true)
        }
        Command::Check { templates, catalog } => {
            let report = check(&templates, &catalog)?;
            for template in &report.missing {
                println!("missing:      {template:?}");
            }
            for template in &report.untranslated {
                println!("untranslated: {template:?}");
            }
            for template in &report.stale {
                println!("stale:        {template:?}");
            }
            println!(
                "{} [{}]: {} missing, {} untranslated, {} stale",
                catalog.display(),
                report.locale,
                report.missing.len(),
                report.untranslated.len(),
                report.stale.len()
            );
            if !report.is_complete() {
                warn!("Catalog {} is incomplete", catalog.display());
            }
            Ok(report.is_complete())
        }
        Command::Stats { catalog } => {
            let stats = stats(&catalog)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
            Ok(true)
        }
    }
}

/// Setup tracing subscriber based on CLI arguments and optional config.
fn setup_tracing(args: &Args, configured: Option<LogLevel>) {
    let level = if args.verbose {
        LogLevel::Debug
    } else {
        configured.unwrap_or_default()
    };

    let filter = EnvFilter::from_default_env().add_directive(
        level
            .as_str()
            .parse()
            .unwrap_or_else(|_| tracing::Level::INFO.into()),
    );

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
