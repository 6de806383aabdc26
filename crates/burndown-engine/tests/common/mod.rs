//! Test doubles for every engine port, plus a small set of corpora.
//!
//! Corpus layout:
//! - `api.fetch` and `css.properties.gap`: supported by every core browser
//! - `css.properties.zoom`: not supported in Safari (never baseline)
//! - `html.elements.blink`: no support data (unresolved)

#![allow(dead_code)]

use burndown_core::errors::{ExError, ExErrorKind, ExResult};
use burndown_core::sources::{
    BcdCorpus, CaniuseCorpus, CatalogLayout, ContentInventory, ContentRepository,
    WebFeaturesCatalog,
};
use burndown_engine::{Confirm, CorpusResolver, PackageInstaller, Publisher, ResolvedCorpora};
use chrono::{DateTime, FixedOffset, Utc};
use serde_json::{json, Map, Value};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

pub const CONTENT_COMMIT: &str = "c0ffee0000000000000000000000000000000001";

pub const CORE_BROWSERS: [(&str, &str); 7] = [
    ("chrome", "Blink"),
    ("chrome_android", "Blink"),
    ("edge", "Blink"),
    ("firefox", "Gecko"),
    ("firefox_android", "Gecko"),
    ("safari", "WebKit"),
    ("safari_ios", "WebKit"),
];

pub fn date(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

fn support(except: &[&str]) -> Value {
    let mut table = Map::new();
    for (browser, _) in CORE_BROWSERS {
        let statement = if except.contains(&browser) {
            json!({"version_added": false})
        } else {
            json!({"version_added": "10"})
        };
        table.insert(browser.to_string(), statement);
    }
    Value::Object(table)
}

pub fn bcd_document() -> Value {
    let mut browsers = Map::new();
    for (browser, engine) in CORE_BROWSERS {
        let released = if engine == "WebKit" { "2021-06-01" } else { "2020-01-01" };
        browsers.insert(
            browser.to_string(),
            json!({"releases": {"10": {"release_date": released, "engine": engine}}}),
        );
    }
    let standard = json!({"standard_track": true, "deprecated": false, "experimental": false});

    json!({
        "browsers": browsers,
        "api": {
            "fetch": {"__compat": {"support": support(&[]), "status": standard}}
        },
        "css": {
            "properties": {
                "gap": {"__compat": {"support": support(&[]), "status": standard}},
                "zoom": {"__compat": {
                    "support": support(&["safari", "safari_ios"]),
                    "status": {"standard_track": false, "deprecated": false}
                }}
            }
        },
        "html": {
            "elements": {
                "blink": {"__compat": {"status": {"standard_track": false, "deprecated": true}}}
            }
        }
    })
}

pub fn catalog_document(feature_ids: &[&str]) -> Value {
    let mut features = Map::new();
    for id in feature_ids {
        let feature = match *id {
            "fetch" => json!({"kind": "feature", "compat_features": ["api.fetch"], "caniuse": "fetch"}),
            "gap" => json!({"kind": "feature", "compat_features": ["css.properties.gap"]}),
            other => json!({"kind": "feature", "compat_features": [], "name": other}),
        };
        features.insert(id.to_string(), feature);
    }
    json!({"features": features, "groups": {}, "snapshots": {}})
}

/// Package name → installed version, shared by [`FakeInstaller`] and
/// [`FakeResolver`].
pub type Installed = Rc<RefCell<BTreeMap<String, String>>>;

/// Resolves every date to the fixture corpora, recording the dates asked.
///
/// With `installed` set, the compat corpus reference and catalog version
/// are read from the installed packages, the way the file-backed resolver
/// reads them from the installed package manifests.
pub struct FakeResolver {
    pub feature_ids: Vec<&'static str>,
    pub resolved: Vec<String>,
    pub fail_with: Option<ExErrorKind>,
    pub installed: Option<Installed>,
}

impl FakeResolver {
    pub fn new(feature_ids: &[&'static str]) -> Self {
        Self {
            feature_ids: feature_ids.to_vec(),
            resolved: Vec::new(),
            fail_with: None,
            installed: None,
        }
    }

    fn installed_or(&self, package: &str, default: &str) -> String {
        self.installed
            .as_ref()
            .and_then(|i| i.borrow().get(package).cloned())
            .unwrap_or_else(|| default.to_string())
    }
}

/// Registry with a fixed publish history; installs update `installed`.
pub struct FakeInstaller {
    pub releases: BTreeMap<String, BTreeMap<String, DateTime<Utc>>>,
    pub installed: Installed,
    pub installs: Vec<String>,
}

impl FakeInstaller {
    /// `releases`: (package, version, publish time)
    pub fn new(releases: &[(&str, &str, &str)]) -> Self {
        let mut table: BTreeMap<String, BTreeMap<String, DateTime<Utc>>> = BTreeMap::new();
        for (package, version, at) in releases {
            table
                .entry(package.to_string())
                .or_default()
                .insert(version.to_string(), date(at).with_timezone(&Utc));
        }
        Self {
            releases: table,
            installed: Rc::default(),
            installs: Vec::new(),
        }
    }
}

impl PackageInstaller for FakeInstaller {
    fn published(&self, package: &str) -> ExResult<BTreeMap<String, DateTime<Utc>>> {
        Ok(self.releases.get(package).cloned().unwrap_or_default())
    }

    fn install(&mut self, package: &str, version: &str) -> ExResult<()> {
        self.installs.push(format!("{package}@{version}"));
        self.installed
            .borrow_mut()
            .insert(package.to_string(), version.to_string());
        Ok(())
    }
}

/// Releases covering every date the tests use.
pub fn default_releases() -> FakeInstaller {
    FakeInstaller::new(&[
        ("@mdn/browser-compat-data", "5.5.0", "2023-12-01T00:00:00Z"),
        ("web-features", "2.1.0", "2023-12-01T00:00:00Z"),
    ])
}

impl CorpusResolver for FakeResolver {
    fn resolve(&mut self, date: &DateTime<FixedOffset>) -> ExResult<ResolvedCorpora> {
        if let Some(kind) = self.fail_with {
            return Err(ExError::new(kind)
                .with_op("resolve_corpora")
                .with_message("package install failed"));
        }
        self.resolved.push(date.to_rfc3339());
        Ok(ResolvedCorpora {
            bcd: BcdCorpus::from_value(
                bcd_document(),
                self.installed_or("@mdn/browser-compat-data", "bcd0000001"),
            )?,
            catalog: WebFeaturesCatalog::from_value(
                catalog_document(&self.feature_ids),
                self.installed_or("web-features", "2.1.0"),
                CatalogLayout::Sectioned,
            )?,
            caniuse: CaniuseCorpus::from_file_names(
                "1.0.30001600",
                ["fetch.json", "css-grid.json", "css-zoom.json"],
            ),
            mdn_content_commit: CONTENT_COMMIT.to_string(),
        })
    }
}

/// Content working copy that counts checkouts.
pub struct FakeContentRepo {
    pub checkouts: Cell<usize>,
}

impl FakeContentRepo {
    pub fn new() -> Self {
        Self {
            checkouts: Cell::new(0),
        }
    }
}

impl ContentRepository for FakeContentRepo {
    fn checkout(&self, _commit: &str) -> ExResult<()> {
        self.checkouts.set(self.checkouts.get() + 1);
        Ok(())
    }

    fn extract_inventory(&self) -> ExResult<ContentInventory> {
        let page = |slug: &str, key: &str| {
            json!({
                "path": format!("files/en-us/{}/index.md", slug.to_lowercase()),
                "frontmatter": {"title": slug, "slug": slug, "browser-compat": key}
            })
        };
        Ok(serde_json::from_value(json!({
            "metadata": {
                "commit": CONTENT_COMMIT,
                "commitShort": &CONTENT_COMMIT[..7],
                "authorDate": "2024-01-01T00:00:00Z"
            },
            "inventory": [
                page("Web/API/fetch", "api.fetch"),
                page("Web/CSS/gap", "css.properties.gap"),
                page("Web/CSS/zoom", "css.properties.zoom")
            ]
        }))
        .unwrap())
    }
}

/// Answers every prompt with `answer`, recording the prompts.
pub struct ScriptedConfirm {
    pub answer: bool,
    pub prompts: RefCell<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            prompts: RefCell::new(Vec::new()),
        }
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, prompt: &str) -> ExResult<bool> {
        self.prompts.borrow_mut().push(prompt.to_string());
        Ok(self.answer)
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    pub posts: RefCell<Vec<(String, String)>>,
}

impl Publisher for RecordingPublisher {
    fn post_comment(&self, url: &str, body: &str) -> ExResult<()> {
        self.posts
            .borrow_mut()
            .push((url.to_string(), body.to_string()));
        Ok(())
    }
}
