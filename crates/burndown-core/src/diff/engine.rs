//! Delta computation.
//!
//! The entry point is [`compute_delta`]. Optional metrics (top-traffic
//! citations, baseline counts) are only compared when both snapshots carry
//! them; comparing a present value against an absent one would report a
//! change that never happened.

use crate::diff::model::{
    CountChange, Delta, DeltaClassification, DeltaIdentity, Metric, Ratio, RatioChange,
};
use crate::diff::percent::percent_change;
use crate::errors::Result;
use crate::snapshot::{compute_semantic_digest, compute_snapshot_digest, Snapshot, SnapshotCounts};

/// Compare an earlier snapshot with a later one.
///
/// # Errors
///
/// `Serialization` if either snapshot cannot be serialized for digesting.
pub fn compute_delta(before: &Snapshot, after: &Snapshot) -> Result<Delta> {
    let identity = DeltaIdentity {
        before_digest: compute_snapshot_digest(before)?,
        before_semantic_digest: compute_semantic_digest(before)?,
        after_digest: compute_snapshot_digest(after)?,
        after_semantic_digest: compute_semantic_digest(after)?,
    };
    let classification = if identity.before_digest == identity.after_digest {
        DeltaClassification::Identical
    } else if identity.before_semantic_digest == identity.after_semantic_digest {
        DeltaClassification::NoChange
    } else {
        DeltaClassification::Changed
    };

    let b = before.counts();
    let a = after.counts();

    Ok(Delta {
        identity,
        classification,
        before_date: before.meta.date,
        after_date: after.meta.date,
        elapsed_days: (after.meta.date - before.meta.date).num_days(),
        before_refs: before.meta.refs.clone(),
        after_refs: after.meta.refs.clone(),
        counts: count_changes(&b, &a),
        ratios: ratio_changes(&b, &a),
    })
}

fn count_change(metric: Metric, before: usize, after: usize) -> CountChange {
    CountChange {
        metric,
        before,
        after,
        net: after as i64 - before as i64,
        percent: percent_change(before, after),
    }
}

fn count_changes(b: &SnapshotCounts, a: &SnapshotCounts) -> Vec<CountChange> {
    let mut out = vec![
        count_change(Metric::CompatKeys, b.compat_keys, a.compat_keys),
        count_change(Metric::FeatureIds, b.feature_ids, a.feature_ids),
        count_change(Metric::CaniuseIds, b.caniuse_ids, a.caniuse_ids),
        count_change(Metric::DocCitedKeys, b.doc_cited_keys, a.doc_cited_keys),
    ];
    if let (Some(before), Some(after)) = (b.top_traffic_cited_keys, a.top_traffic_cited_keys) {
        out.push(count_change(Metric::TopTrafficCitedKeys, before, after));
    }
    out.push(count_change(
        Metric::FeatureCitedKeys,
        b.feature_cited_keys,
        a.feature_cited_keys,
    ));
    out.push(count_change(
        Metric::FeatureCaniuseIds,
        b.feature_caniuse_ids,
        a.feature_caniuse_ids,
    ));
    if let (Some(before), Some(after)) = (&b.baseline, &a.baseline) {
        out.push(count_change(Metric::BaselineLow, before.low, after.low));
        out.push(count_change(Metric::BaselineHigh, before.high, after.high));
        out.push(count_change(Metric::BaselineNever, before.never, after.never));
        out.push(count_change(
            Metric::BaselineUnresolved,
            before.unresolved,
            after.unresolved,
        ));
    }
    out
}

fn ratio_change(metric: Metric, before: Ratio, after: Ratio) -> RatioChange {
    let point_change = match (before.value(), after.value()) {
        (Some(b), Some(a)) => Some(a - b),
        _ => None,
    };
    RatioChange {
        metric,
        before,
        after,
        point_change,
    }
}

/// Coverage numerators count only citations of the snapshot's own keys, so a
/// ratio never exceeds 100%.
fn ratio_changes(b: &SnapshotCounts, a: &SnapshotCounts) -> Vec<RatioChange> {
    let mut out = vec![ratio_change(
        Metric::DocKeyCoverage,
        Ratio::of_covered(b.doc_covered_keys, b.compat_keys),
        Ratio::of_covered(a.doc_covered_keys, a.compat_keys),
    )];
    if b.top_traffic_cited_keys.is_some() && a.top_traffic_cited_keys.is_some() {
        out.push(ratio_change(
            Metric::TopTrafficKeyCoverage,
            Ratio::of_covered(b.top_traffic_covered_keys, b.compat_keys),
            Ratio::of_covered(a.top_traffic_covered_keys, a.compat_keys),
        ));
    }
    out.push(ratio_change(
        Metric::FeatureKeyCoverage,
        Ratio::of_covered(b.feature_covered_keys, b.compat_keys),
        Ratio::of_covered(a.feature_covered_keys, a.compat_keys),
    ));
    out.push(ratio_change(
        Metric::FeatureCaniuseCoverage,
        Ratio::of(b.feature_covered_caniuse_ids, b.caniuse_ids),
        Ratio::of(a.feature_covered_caniuse_ids, a.caniuse_ids),
    ));
    out
}
