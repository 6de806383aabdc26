use crate::config::ReportsDirArgs;
use burndown_engine::commands::load_sqlite::load_sqlite;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct LoadSqliteArgs {
    /// SQLite database receiving one summary row per snapshot
    #[arg(long, env = "BURNDOWN_DB")]
    pub db: PathBuf,

    #[command(flatten)]
    pub reports: ReportsDirArgs,
}

pub fn execute(args: LoadSqliteArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = args.reports.store()?;
    let rows = load_sqlite(&store, &args.db)?;
    println!("Loaded {} snapshots into {}", rows, args.db.display());
    Ok(())
}
