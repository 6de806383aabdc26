//! Process-backed ports: `git`, `npm`, the content inventory extractor,
//! `gh`, and the terminal.

use crate::config::CorpusConfig;
use burndown_core::errors::{BurndownError, ExError, ExResult};
use burndown_core::sources::{BcdCorpus, CaniuseCorpus, ContentInventory, ContentRepository, WebFeaturesCatalog};
use burndown_engine::{
    CaniuseHistory, Confirm, CorpusResolver, PackageInstaller, Publisher, ResolvedCorpora,
};
use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, Utc};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

const CANIUSE_FEATURES_DIR: &str = "features-json/";

fn tool_failed(tool: &str, reason: impl Into<String>) -> ExError {
    BurndownError::ExternalToolFailed {
        tool: tool.to_string(),
        reason: reason.into(),
    }
    .into()
}

fn checked_output(tool: &str, command: &mut Command) -> ExResult<Output> {
    let output = command
        .output()
        .map_err(|e| tool_failed(tool, format!("failed to spawn: {e}")))?;
    if !output.status.success() {
        return Err(tool_failed(
            tool,
            format!(
                "exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        ));
    }
    Ok(output)
}

/// `git -C <repo> ...`
#[derive(Debug, Clone)]
pub struct Git {
    repo: PathBuf,
}

impl Git {
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self { repo: repo.into() }
    }

    /// Run a git subcommand and return its trimmed stdout.
    ///
    /// # Errors
    ///
    /// `ExternalTool` if git cannot be spawned or exits non-zero.
    pub fn run(&self, args: &[&str]) -> ExResult<String> {
        tracing::debug!(repo = %self.repo.display(), args = ?args, "git");
        let output = checked_output("git", Command::new("git").arg("-C").arg(&self.repo).args(args))?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// # Errors
    ///
    /// See [`Git::run`].
    pub fn rev_parse(&self, rev: &str) -> ExResult<String> {
        self.run(&["rev-parse", rev])
    }

    /// Last commit on `rev` at or before `date`.
    ///
    /// # Errors
    ///
    /// `ExternalTool` if git fails or the history has no such commit.
    pub fn commit_before(&self, rev: &str, date: &DateTime<FixedOffset>) -> ExResult<String> {
        let before = format!("--before={}", date.to_rfc3339_opts(SecondsFormat::Secs, true));
        let commit = self.run(&["rev-list", "-1", &before, rev])?;
        if commit.is_empty() {
            return Err(tool_failed("git", format!("no commit on {rev} before {date}")));
        }
        Ok(commit)
    }
}

/// Content repository working copy plus the command that prints its
/// inventory.
pub struct ProcessContentRepository {
    git: Git,
    repo: PathBuf,
    extractor: String,
}

impl ProcessContentRepository {
    pub fn new(repo: impl Into<PathBuf>, extractor: impl Into<String>) -> Self {
        let repo = repo.into();
        Self {
            git: Git::new(&repo),
            repo,
            extractor: extractor.into(),
        }
    }
}

impl ContentRepository for ProcessContentRepository {
    fn checkout(&self, commit: &str) -> ExResult<()> {
        self.git.run(&["checkout", "--quiet", commit]).map(|_| ())
    }

    fn extract_inventory(&self) -> ExResult<ContentInventory> {
        let mut parts = self.extractor.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| tool_failed("inventory", "MDN_CONTENT_INVENTORY_CMD is empty"))?;

        tracing::info!(command = %self.extractor, repo = %self.repo.display(), "extracting content inventory");
        let output = checked_output(
            program,
            Command::new(program).args(parts).current_dir(&self.repo),
        )?;
        serde_json::from_slice(&output.stdout)
            .map_err(|e| ExError::from(BurndownError::from(e)).with_op("extract_inventory"))
    }
}

/// Reads the compatibility corpus and feature catalog from files and the
/// support matrix and content commit from git.
///
/// In historic mode the git-backed corpora are resolved at the last commit
/// before each date. The file-backed ones are whatever the historic batch
/// installed for that date, so their references come from the installed
/// package manifests and the `BCD_COMMIT_HASH` / `WEB_FEATURES_VERSION`
/// pins are ignored.
pub struct RepoCorpusResolver {
    config: CorpusConfig,
    historic: bool,
}

impl RepoCorpusResolver {
    pub fn new(config: CorpusConfig) -> Self {
        Self {
            config,
            historic: false,
        }
    }

    pub fn historic(mut self) -> Self {
        self.historic = true;
        self
    }

    fn bcd(&self) -> ExResult<BcdCorpus> {
        let path = &self.config.bcd_data_path;
        let hash = match &self.config.bcd_commit_hash {
            _ if self.historic => installed_version(path)?,
            Some(hash) => hash.clone(),
            None => Git::new(parent_dir(path))
                .rev_parse("HEAD")
                .map_err(|e| {
                    ExError::from(BurndownError::MissingConfig {
                        name: "BCD_COMMIT_HASH".to_string(),
                    })
                    .with_source(e)
                })?,
        };
        let text = std::fs::read_to_string(path).map_err(BurndownError::from)?;
        Ok(BcdCorpus::from_json_str(&text, hash)?)
    }

    fn catalog(&self) -> ExResult<WebFeaturesCatalog> {
        let path = &self.config.web_features_data_path;
        let version = match &self.config.web_features_version {
            _ if self.historic => installed_version(path)?,
            Some(version) => version.clone(),
            None => package_version(&parent_dir(path).join("package.json")).ok_or_else(|| {
                BurndownError::MissingConfig {
                    name: "WEB_FEATURES_VERSION".to_string(),
                }
            })?,
        };
        let text = std::fs::read_to_string(path).map_err(BurndownError::from)?;
        Ok(WebFeaturesCatalog::from_json_str(
            &text,
            version,
            self.config.web_features_layout,
        )?)
    }

    fn caniuse(&self, date: &DateTime<FixedOffset>) -> ExResult<CaniuseCorpus> {
        let git = Git::new(&self.config.caniuse_repo_path);
        let rev = if self.historic {
            git.commit_before("HEAD", date)?
        } else {
            git.rev_parse("HEAD")?
        };
        let version = git.run(&["describe", "--tags", "--always", &rev])?;
        let listing = git.run(&["ls-tree", "--name-only", &rev, CANIUSE_FEATURES_DIR])?;
        let names = listing
            .lines()
            .filter_map(|line| line.strip_prefix(CANIUSE_FEATURES_DIR));
        Ok(CaniuseCorpus::from_file_names(version, names))
    }

    fn content_commit(&self, date: &DateTime<FixedOffset>) -> ExResult<String> {
        let git = Git::new(&self.config.mdn_content_repo_path);
        let branch = self.config.mdn_content_branch.as_str();
        match (&self.config.mdn_content_hash, self.historic) {
            (_, true) => git.commit_before(branch, date),
            (Some(pinned), false) => Ok(pinned.clone()),
            (None, false) => git.rev_parse(branch),
        }
    }
}

impl CorpusResolver for RepoCorpusResolver {
    fn resolve(&mut self, date: &DateTime<FixedOffset>) -> ExResult<ResolvedCorpora> {
        let corpora = ResolvedCorpora {
            bcd: self.bcd()?,
            catalog: self.catalog()?,
            caniuse: self.caniuse(date)?,
            mdn_content_commit: self.content_commit(date)?,
        };
        tracing::info!(
            date = %date,
            bcd = %corpora.bcd.commit_hash(),
            web_features = %corpora.catalog.version(),
            caniuse = %corpora.caniuse.version(),
            content = %corpora.mdn_content_commit,
            "corpora resolved"
        );
        Ok(corpora)
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn package_version(manifest: &Path) -> Option<String> {
    let text = std::fs::read_to_string(manifest).ok()?;
    let value: Value = serde_json::from_str(&text).ok()?;
    value.get("version")?.as_str().map(str::to_string)
}

/// Version of the installed package whose data file is `data_path`.
fn installed_version(data_path: &Path) -> ExResult<String> {
    let manifest = parent_dir(data_path).join("package.json");
    package_version(&manifest).ok_or_else(|| {
        tool_failed(
            "npm",
            format!("no installed package version in {}", manifest.display()),
        )
    })
}

/// Installs packages with `npm install --no-save --prefix <prefix>`.
pub struct NpmInstaller {
    prefix: PathBuf,
}

impl NpmInstaller {
    pub fn new(prefix: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl PackageInstaller for NpmInstaller {
    fn published(&self, package: &str) -> ExResult<BTreeMap<String, DateTime<Utc>>> {
        let output = checked_output(
            "npm",
            Command::new("npm").args(["view", package, "time", "--json"]),
        )?;
        parse_publish_times(&output.stdout)
    }

    fn install(&mut self, package: &str, version: &str) -> ExResult<()> {
        let spec = format!("{package}@{version}");
        checked_output(
            "npm",
            Command::new("npm")
                .args(["install", "--no-save", "--no-audit", "--no-fund", "--prefix"])
                .arg(&self.prefix)
                .arg(&spec),
        )?;
        tracing::info!(package = %spec, prefix = %self.prefix.display(), "package installed");
        Ok(())
    }
}

/// Parse `npm view <pkg> time --json`: version → publish time.
fn parse_publish_times(json: &[u8]) -> ExResult<BTreeMap<String, DateTime<Utc>>> {
    let times: BTreeMap<String, DateTime<Utc>> = serde_json::from_slice(json)
        .map_err(|e| ExError::from(BurndownError::from(e)).with_op("npm_view_time"))?;
    Ok(times)
}

/// Support-matrix history from `git log`.
pub struct GitCaniuseHistory {
    git: Git,
}

impl GitCaniuseHistory {
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self { git: Git::new(repo) }
    }
}

impl CaniuseHistory for GitCaniuseHistory {
    fn head(&self) -> ExResult<String> {
        self.git.rev_parse("HEAD")
    }

    fn added_dates(&self) -> ExResult<BTreeMap<String, NaiveDate>> {
        let log = self.git.run(&[
            "log",
            "--diff-filter=A",
            "--name-only",
            "--format=@%as",
            "--",
            CANIUSE_FEATURES_DIR,
        ])?;
        Ok(parse_added_log(&log))
    }
}

/// Parse `git log --format=@%as --name-only` output into id → earliest
/// addition date.
fn parse_added_log(log: &str) -> BTreeMap<String, NaiveDate> {
    let mut added: BTreeMap<String, NaiveDate> = BTreeMap::new();
    let mut current: Option<NaiveDate> = None;
    for line in log.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(day) = line.strip_prefix('@') {
            current = NaiveDate::parse_from_str(day, "%Y-%m-%d").ok();
            continue;
        }
        let (Some(day), Some(id)) = (
            current,
            line.strip_prefix(CANIUSE_FEATURES_DIR)
                .and_then(|name| name.strip_suffix(".json")),
        ) else {
            continue;
        };
        added
            .entry(id.to_string())
            .and_modify(|existing| *existing = (*existing).min(day))
            .or_insert(day);
    }
    added
}

/// Posts issue comments with `gh issue comment <url> --body-file -`.
pub struct GhPublisher;

impl Publisher for GhPublisher {
    fn post_comment(&self, url: &str, body: &str) -> ExResult<()> {
        let mut child = Command::new("gh")
            .args(["issue", "comment", url, "--body-file", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| tool_failed("gh", format!("failed to spawn: {e}")))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(body.as_bytes())
                .map_err(|e| tool_failed("gh", format!("failed to write comment body: {e}")))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| tool_failed("gh", e.to_string()))?;
        if !output.status.success() {
            return Err(tool_failed(
                "gh",
                format!(
                    "exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }
        tracing::info!(url = %url, "comment posted");
        Ok(())
    }
}

/// Asks on stderr, reads one line from stdin.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> ExResult<bool> {
        eprint!("{prompt} [y/N] ");
        std::io::stderr().flush().map_err(BurndownError::from)?;
        let mut answer = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut answer)
            .map_err(BurndownError::from)?;
        Ok(is_yes(&answer))
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
