//! Burndown CLI
//!
//! Generates, compares and publishes web-features burndown snapshots.
//! Settings come from flags, the environment, or a `.env` file in the
//! working directory.

use burndown_core::errors::{ExError, ExErrorKind};
use burndown_core::logging_facility::{init, Profile};
use clap::{Parser, Subcommand, ValueEnum};

mod commands;
mod config;
mod process;

/// Exit status when the user declines to publish
const EXIT_DECLINED: i32 = 2;

#[derive(Debug, Parser)]
#[command(name = "burndown")]
#[command(about = "Burndown - web-features adoption snapshots and deltas", long_about = None)]
struct Cli {
    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Human, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Human,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build today's snapshot, persist it and print the delta to the previous one
    GenerateReport(commands::generate::GenerateArgs),
    /// Compare the snapshots nearest to two dates
    PrintReport(commands::report::PrintReportArgs),
    /// Render Markdown statistics and optionally post them to an issue
    PublishStatistics(commands::publish::PublishArgs),
    /// List compat keys not covered by any feature
    CompatBurndown(commands::burndown::BurndownArgs),
    /// List support-matrix ids not covered by any feature
    CaniuseBurndown(commands::burndown::BurndownArgs),
    /// Load one summary row per snapshot into SQLite
    LoadSqlite(commands::load_sqlite::LoadSqliteArgs),
}

fn exit_code(error: &(dyn std::error::Error + 'static)) -> i32 {
    match error.downcast_ref::<ExError>() {
        Some(e) if e.kind() == ExErrorKind::UserDeclined => EXIT_DECLINED,
        _ => 1,
    }
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init(match cli.log_format {
        LogFormat::Human => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    let result = match cli.command {
        Commands::GenerateReport(args) => commands::generate::execute(args),
        Commands::PrintReport(args) => commands::report::execute(args),
        Commands::PublishStatistics(args) => commands::publish::execute(args),
        Commands::CompatBurndown(args) => commands::burndown::execute_compat(args),
        Commands::CaniuseBurndown(args) => commands::burndown::execute_caniuse(args),
        Commands::LoadSqlite(args) => commands::load_sqlite::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(exit_code(e.as_ref()));
    }
}
