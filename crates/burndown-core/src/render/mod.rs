//! Report renderer.
//!
//! Pure formatting of delta and inventory data; nothing here computes a
//! metric.

pub mod burndown;
pub mod markdown;
pub mod report;
pub mod rows;

pub use burndown::{
    caniuse_burndown_rows, compat_burndown_rows, CaniuseAddition, CANIUSE_BURNDOWN_HEADER,
    COMPAT_BURNDOWN_HEADER,
};
pub use markdown::render_markdown;
pub use report::{render_report, summary_line};
pub use rows::{render_rows, render_rows_text, ROW_HEADER};
