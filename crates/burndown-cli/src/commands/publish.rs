use crate::config::ReportsDirArgs;
use crate::process::{GhPublisher, StdinConfirm};
use burndown_engine::commands::publish::{post_statistics, render_statistics, PublishWindow};
use burndown_store::SnapshotTarget;
use chrono::Utc;
use clap::Args;

#[derive(Debug, Args)]
pub struct PublishArgs {
    /// Earlier date (default: seven days before TO)
    pub from: Option<SnapshotTarget>,

    /// Later date (default: today)
    pub to: Option<SnapshotTarget>,

    /// Issue to comment on; without it the statistics are only printed
    #[arg(long, env = "ISSUE_URL")]
    pub url: Option<String>,

    /// Append a collapsed section with both corpus references and semantic digests
    #[arg(long)]
    pub verbose: bool,

    /// Post without asking for confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,

    #[command(flatten)]
    pub reports: ReportsDirArgs,
}

pub fn execute(args: PublishArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = args.reports.store()?;
    let window = PublishWindow::resolve(args.from, args.to, Utc::now().date_naive());
    let markdown = render_statistics(&store, &window, args.verbose)?;
    print!("{}", markdown);

    if let Some(url) = &args.url {
        post_statistics(&markdown, url, args.yes, &StdinConfirm, &GhPublisher)?;
        eprintln!("Posted to {}", url);
    }
    Ok(())
}
