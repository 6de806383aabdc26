use crate::commands::PipelineWiring;
use crate::config::{CorpusArgs, ReportConfig};
use crate::process::GitCaniuseHistory;
use burndown_core::csv::Delim;
use burndown_engine::commands::burndown::{caniuse_burndown, compat_burndown};
use burndown_engine::{Clock, SystemClock};
use burndown_store::JsonFileCache;
use chrono::{DateTime, FixedOffset};
use clap::Args;

const ADDED_DATES_CACHE_FILE: &str = "caniuse-added-dates.json";

#[derive(Debug, Args)]
pub struct BurndownArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Row format: csv or tsv
    #[arg(long, default_value = "csv")]
    pub format: Delim,
}

fn report_date(config: &ReportConfig) -> DateTime<FixedOffset> {
    config.report_date.unwrap_or_else(|| SystemClock.now())
}

pub fn execute_compat(args: BurndownArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = ReportConfig::from_args(&args.corpus)?;
    let mut wiring = PipelineWiring::new(&config, false)?;
    let rows = compat_burndown(report_date(&config), &mut wiring.ports(), &config.pipeline, args.format)?;
    print!("{}", rows);
    Ok(())
}

pub fn execute_caniuse(args: BurndownArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = ReportConfig::from_args(&args.corpus)?;
    let mut wiring = PipelineWiring::new(&config, false)?;
    let history = GitCaniuseHistory::new(&config.corpora.caniuse_repo_path);
    let mut added_cache = JsonFileCache::open(config.cache_file(ADDED_DATES_CACHE_FILE))?;
    let rows = caniuse_burndown(
        report_date(&config),
        &mut wiring.ports(),
        &config.pipeline,
        &history,
        &mut added_cache,
        args.format,
    )?;
    print!("{}", rows);
    Ok(())
}
