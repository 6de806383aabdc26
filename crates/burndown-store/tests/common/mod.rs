//! Shared fixtures for store integration tests

use burndown_core::Snapshot;
use serde_json::{json, Value};

/// A minimal snapshot dated `date` whose compat listing is `keys`.
pub fn snapshot(date: &str, keys: &[&str]) -> Snapshot {
    serde_json::from_value(snapshot_value(date, keys)).unwrap()
}

pub fn snapshot_value(date: &str, keys: &[&str]) -> Value {
    json!({
        "meta": {
            "date": date,
            "browserCompatDataCommitHash": "bcd0001",
            "webFeaturesVersion": "2.1.0",
            "caniuseVersion": "1.0.30001600",
            "mdnContentCommitHash": "content0001"
        },
        "browserCompatData": { "keys": keys },
        "mdnContent": { "browserCompatKeys": &keys[..keys.len().min(1)] },
        "caniuse": { "ids": ["flexbox"] },
        "webFeatures": {
            "ids": ["grid"],
            "mdnBrowserCompatDataKeys": &keys[..keys.len().min(1)],
            "caniuseIds": []
        }
    })
}
