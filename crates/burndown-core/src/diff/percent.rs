//! Percentage arithmetic and formatting.
//!
//! Values are rounded to two decimals before the sign is chosen, so a
//! change that rounds to zero prints with the neutral marker.

use crate::diff::model::{PercentChange, Ratio};

/// Marker printed for a change that rounds to exactly zero
pub const NEUTRAL_SIGN: char = '±';

/// Relative change from `before` to `after`.
///
/// `0 → 0` is a 0 % change; `0 → n` is [`PercentChange::New`].
pub fn percent_change(before: usize, after: usize) -> PercentChange {
    if before == 0 {
        if after == 0 {
            PercentChange::Defined(0.0)
        } else {
            PercentChange::New
        }
    } else {
        PercentChange::Defined((after as f64 - before as f64) / before as f64 * 100.0)
    }
}

/// `+5.00`, `-1.20`, `±0.00`
pub fn format_signed(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded > 0.0 {
        format!("+{:.2}", rounded)
    } else if rounded < 0.0 {
        format!("-{:.2}", -rounded)
    } else {
        format!("{}{:.2}", NEUTRAL_SIGN, 0.0)
    }
}

pub fn format_percent_change(change: PercentChange) -> String {
    match change {
        PercentChange::Defined(p) => format!("{}%", format_signed(p)),
        PercentChange::New => "new".to_string(),
    }
}

pub fn format_ratio(ratio: Ratio) -> String {
    match ratio {
        Ratio::Defined(v) => format!("{:.2}%", v),
        Ratio::Undefined => "n/a".to_string(),
    }
}

pub fn format_point_change(points: Option<f64>) -> String {
    points.map_or_else(|| "n/a".to_string(), format_signed)
}

/// `+5`, `-3`, `±0`
pub fn format_net(net: i64) -> String {
    match net {
        n if n > 0 => format!("+{n}"),
        0 => format!("{NEUTRAL_SIGN}0"),
        n => n.to_string(),
    }
}
