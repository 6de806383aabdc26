//! Environment-backed configuration.
//!
//! Every setting is a clap argument bound to an environment variable, so a
//! flag overrides the environment and a `.env` file (loaded in `main`)
//! supplies defaults. Arguments are resolved once into typed config.

use burndown_core::errors::{BurndownError, ExResult};
use burndown_core::sources::traffic::DEFAULT_TOP_N;
use burndown_core::sources::{CatalogLayout, KeyFilter, TrafficRanking, DEFAULT_ROOTS};
use burndown_engine::PipelineOptions;
use burndown_store::{SnapshotStore, SnapshotTarget};
use chrono::{DateTime, FixedOffset, NaiveTime};
use clap::Args;
use std::path::{Path, PathBuf};

const DEFAULT_INVENTORY_CMD: &str = "npx mdn-content-inventory";

fn missing(name: &str) -> BurndownError {
    BurndownError::MissingConfig {
        name: name.to_string(),
    }
}

#[derive(Debug, Clone, Args)]
pub struct ReportsDirArgs {
    /// Directory holding one snapshot per date
    #[arg(long, env = "REPORTS_DIR")]
    pub reports_dir: Option<PathBuf>,
}

impl ReportsDirArgs {
    /// # Errors
    ///
    /// `MissingConfig` when `REPORTS_DIR` is not set.
    pub fn reports_dir(&self) -> ExResult<&Path> {
        Ok(self
            .reports_dir
            .as_deref()
            .ok_or_else(|| missing("REPORTS_DIR"))?)
    }

    /// # Errors
    ///
    /// `MissingConfig` when `REPORTS_DIR` is not set.
    pub fn store(&self) -> ExResult<SnapshotStore> {
        Ok(SnapshotStore::new(self.reports_dir()?))
    }
}

#[derive(Debug, Clone, Args)]
pub struct CorpusArgs {
    #[command(flatten)]
    pub reports: ReportsDirArgs,

    /// Snapshot timestamp override (`YYYY-MM-DD` or RFC 3339)
    #[arg(long, env = "REPORT_DATE")]
    pub report_date: Option<SnapshotTarget>,

    /// Single-file compatibility corpus JSON
    #[arg(long, env = "BCD_DATA_PATH")]
    pub bcd_data_path: Option<PathBuf>,

    /// Commit of the compatibility corpus (default: HEAD of the repository holding the file)
    #[arg(long, env = "BCD_COMMIT_HASH")]
    pub bcd_commit_hash: Option<String>,

    /// Compat corpus roots to walk, comma separated
    #[arg(long, env = "BCD_ROOTS", value_delimiter = ',')]
    pub bcd_roots: Vec<String>,

    /// Keep only standards-track keys
    #[arg(long, env = "STANDARD_TRACK_ONLY")]
    pub standard_track_only: bool,

    /// Drop deprecated keys
    #[arg(long, env = "EXCLUDE_DEPRECATED")]
    pub exclude_deprecated: bool,

    /// Feature catalog JSON
    #[arg(long, env = "WEB_FEATURES_DATA_PATH")]
    pub web_features_data_path: Option<PathBuf>,

    /// Catalog version (default: `version` of the package.json next to the data file)
    #[arg(long, env = "WEB_FEATURES_VERSION")]
    pub web_features_version: Option<String>,

    /// npm prefix historic runs install the compat corpus and catalog into
    /// (default: the directory holding the `node_modules` that contains BCD_DATA_PATH)
    #[arg(long, env = "NPM_PREFIX")]
    pub npm_prefix: Option<PathBuf>,

    /// Catalog document layout: flat or sectioned
    #[arg(long, env = "WEB_FEATURES_LAYOUT", default_value = "sectioned")]
    pub web_features_layout: CatalogLayout,

    /// Support-matrix repository checkout
    #[arg(long, env = "CANIUSE_REPO_PATH")]
    pub caniuse_repo_path: Option<PathBuf>,

    /// Content repository checkout used for citation mining
    #[arg(long, env = "MDN_CONTENT_REPO_PATH")]
    pub mdn_content_repo_path: Option<PathBuf>,

    /// Pin the content commit instead of using the branch tip
    #[arg(long, env = "MDN_CONTENT_HASH")]
    pub mdn_content_hash: Option<String>,

    /// Branch whose tip (or history) selects the content commit
    #[arg(long, env = "MDN_CONTENT_BRANCH", default_value = "main")]
    pub mdn_content_branch: String,

    /// Command printing the content inventory JSON, run inside the content checkout
    #[arg(long, env = "MDN_CONTENT_INVENTORY_CMD", default_value = DEFAULT_INVENTORY_CMD)]
    pub mdn_content_inventory_cmd: String,

    /// Cache directory (default: `<reports-dir>/.cache`)
    #[arg(long, env = "CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Page-view ranking CSV with a `page` column
    #[arg(long, env = "PAGE_VIEW_TRAFFIC_CSV")]
    pub page_view_traffic_csv: Option<PathBuf>,

    /// Number of top-ranked pages counted as high traffic
    #[arg(long, env = "TOP_TRAFFIC_N", default_value_t = DEFAULT_TOP_N)]
    pub top_traffic_n: usize,

    /// Store full compat key lists (false: counts only)
    #[arg(long, env = "LIST_KEYS", default_value_t = true, action = clap::ArgAction::Set)]
    pub list_keys: bool,
}

/// Where each corpus is read from.
#[derive(Debug, Clone)]
pub struct CorpusConfig {
    pub bcd_data_path: PathBuf,
    pub bcd_commit_hash: Option<String>,
    pub web_features_data_path: PathBuf,
    pub web_features_version: Option<String>,
    pub web_features_layout: CatalogLayout,
    pub npm_prefix: Option<PathBuf>,
    pub caniuse_repo_path: PathBuf,
    pub mdn_content_repo_path: PathBuf,
    pub mdn_content_hash: Option<String>,
    pub mdn_content_branch: String,
    pub mdn_content_inventory_cmd: String,
}

impl CorpusConfig {
    /// Where historic runs install packages.
    ///
    /// # Errors
    ///
    /// `MissingConfig` naming `NPM_PREFIX` when it is unset and the compat
    /// corpus path has no `node_modules` ancestor.
    pub fn npm_prefix(&self) -> ExResult<PathBuf> {
        if let Some(prefix) = &self.npm_prefix {
            return Ok(prefix.clone());
        }
        Ok(self
            .bcd_data_path
            .ancestors()
            .find(|dir| dir.file_name().is_some_and(|name| name == "node_modules"))
            .and_then(Path::parent)
            .map(|prefix| {
                if prefix.as_os_str().is_empty() {
                    PathBuf::from(".")
                } else {
                    prefix.to_path_buf()
                }
            })
            .ok_or_else(|| missing("NPM_PREFIX"))?)
    }
}

/// Fully resolved settings of a corpus-reading command.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub reports_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub report_date: Option<DateTime<FixedOffset>>,
    pub traffic_csv: Option<PathBuf>,
    pub corpora: CorpusConfig,
    pub pipeline: PipelineOptions,
}

impl ReportConfig {
    /// # Errors
    ///
    /// `MissingConfig` naming the first required variable that is unset.
    pub fn from_args(args: &CorpusArgs) -> ExResult<Self> {
        let reports_dir = args.reports.reports_dir()?.to_path_buf();
        let required = |value: &Option<PathBuf>, name: &str| -> ExResult<PathBuf> {
            Ok(value.clone().ok_or_else(|| missing(name))?)
        };

        let corpora = CorpusConfig {
            bcd_data_path: required(&args.bcd_data_path, "BCD_DATA_PATH")?,
            bcd_commit_hash: args.bcd_commit_hash.clone(),
            web_features_data_path: required(&args.web_features_data_path, "WEB_FEATURES_DATA_PATH")?,
            web_features_version: args.web_features_version.clone(),
            web_features_layout: args.web_features_layout,
            npm_prefix: args.npm_prefix.clone(),
            caniuse_repo_path: required(&args.caniuse_repo_path, "CANIUSE_REPO_PATH")?,
            mdn_content_repo_path: required(&args.mdn_content_repo_path, "MDN_CONTENT_REPO_PATH")?,
            mdn_content_hash: args.mdn_content_hash.clone(),
            mdn_content_branch: args.mdn_content_branch.clone(),
            mdn_content_inventory_cmd: args.mdn_content_inventory_cmd.clone(),
        };

        let roots = if args.bcd_roots.is_empty() {
            DEFAULT_ROOTS.iter().map(|r| r.to_string()).collect()
        } else {
            args.bcd_roots.iter().map(|r| r.trim().to_string()).collect()
        };

        Ok(Self {
            cache_dir: args
                .cache_dir
                .clone()
                .unwrap_or_else(|| reports_dir.join(".cache")),
            reports_dir,
            report_date: args.report_date.map(|target| match target {
                SnapshotTarget::Day(day) => day.and_time(NaiveTime::default()).and_utc().fixed_offset(),
                SnapshotTarget::Instant(instant) => instant.fixed_offset(),
            }),
            traffic_csv: args.page_view_traffic_csv.clone(),
            corpora,
            pipeline: PipelineOptions {
                roots,
                filter: KeyFilter {
                    standard_track_only: args.standard_track_only,
                    exclude_deprecated: args.exclude_deprecated,
                },
                top_n: args.top_traffic_n,
                list_keys: args.list_keys,
            },
        })
    }

    pub fn store(&self) -> SnapshotStore {
        SnapshotStore::new(&self.reports_dir)
    }

    pub fn cache_file(&self, name: &str) -> PathBuf {
        self.cache_dir.join(name)
    }

    /// The traffic ranking, if configured.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, `InvalidInput` if it has no `page`
    /// column.
    pub fn traffic_ranking(&self) -> ExResult<Option<TrafficRanking>> {
        let Some(path) = &self.traffic_csv else {
            tracing::info!("PAGE_VIEW_TRAFFIC_CSV not configured; top-traffic citations are not computed");
            return Ok(None);
        };
        let text = std::fs::read_to_string(path).map_err(BurndownError::from)?;
        Ok(Some(TrafficRanking::from_csv(&text)?))
    }
}
