use crate::config::ReportsDirArgs;
use burndown_core::csv::Delim;
use burndown_engine::commands::compare::{print_report, ReportFormat};
use burndown_store::SnapshotTarget;
use clap::Args;

#[derive(Debug, Args)]
pub struct PrintReportArgs {
    /// Earlier date (`YYYY-MM-DD` or RFC 3339)
    pub from: SnapshotTarget,

    /// Later date (`YYYY-MM-DD` or RFC 3339)
    pub to: SnapshotTarget,

    /// Output format: text, csv, tsv or json
    #[arg(long, default_value = "text", value_parser = parse_format)]
    pub format: ReportFormat,

    #[command(flatten)]
    pub reports: ReportsDirArgs,
}

fn parse_format(value: &str) -> Result<ReportFormat, String> {
    match value.trim() {
        "text" => Ok(ReportFormat::Text),
        "json" => Ok(ReportFormat::Json),
        other => other
            .parse::<Delim>()
            .map(ReportFormat::Rows)
            .map_err(|_| format!("invalid format '{other}', expected one of: text, csv, tsv, json")),
    }
}

pub fn execute(args: PrintReportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = args.reports.store()?;
    let report = print_report(&store, &args.from, &args.to, args.format)?;
    print!("{}", report);
    Ok(())
}
