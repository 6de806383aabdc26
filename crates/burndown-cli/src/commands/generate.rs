use crate::commands::PipelineWiring;
use crate::config::{CorpusArgs, ReportConfig};
use crate::process::NpmInstaller;
use burndown_core::render::render_report;
use burndown_engine::commands::generate::generate_report;
use burndown_engine::commands::historic::{generate_historic, HistoricRange};
use burndown_engine::{Clock, FixedClock, SystemClock};
use burndown_store::WriteOutcome;
use clap::Args;

#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Backfill one report per step of FROM..TO (YYYY-MM-DD..YYYY-MM-DD),
    /// installing the compat corpus and catalog releases current at each date
    #[arg(long, value_name = "FROM..TO")]
    pub historic: Option<String>,

    /// Step of a historic backfill, in days
    #[arg(long, value_name = "DAYS", default_value_t = 7)]
    pub every: u32,
}

fn describe(outcome: &WriteOutcome) -> String {
    match outcome {
        WriteOutcome::Written(path) => format!("Wrote {}", path.display()),
        WriteOutcome::Unchanged(path) => format!("Unchanged {}", path.display()),
    }
}

pub fn execute(args: GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = ReportConfig::from_args(&args.corpus)?;
    let store = config.store();

    if let Some(range) = &args.historic {
        let range = HistoricRange::parse(range, args.every)?;
        let mut installer = NpmInstaller::new(config.corpora.npm_prefix()?);
        let mut wiring = PipelineWiring::new(&config, true)?;
        let outcomes = generate_historic(
            &store,
            &range,
            &mut installer,
            &mut wiring.ports(),
            &config.pipeline,
        )?;
        for outcome in &outcomes {
            println!("{}", describe(outcome));
        }
        return Ok(());
    }

    let clock: Box<dyn Clock> = match config.report_date {
        Some(date) => Box::new(FixedClock(date)),
        None => Box::new(SystemClock),
    };
    let mut wiring = PipelineWiring::new(&config, false)?;
    let outcome = generate_report(&store, clock.as_ref(), &mut wiring.ports(), &config.pipeline)?;

    println!("{}", describe(&outcome.written));
    match &outcome.delta {
        Some(delta) => print!("{}", render_report(delta)),
        None => println!("No earlier snapshot to compare with."),
    }
    Ok(())
}
