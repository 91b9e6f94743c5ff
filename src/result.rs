//! Result types for decoration output.

use std::time::Duration;

use serde::Serialize;

/// What happened while a page was decorated.
///
/// Nothing in here is needed to serve the decorated HTML; it records the
/// side effects a browser would have performed (navigation, delayed script
/// loads) and the enhancements that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecorateReport {
    /// Blocks whose registered handler ran, in document order.
    pub loaded_blocks: Vec<String>,

    /// Blocks with no registered handler (stylesheet linked only).
    pub unhandled_blocks: Vec<String>,

    /// Path of the A/B variant whose content replaced `main`.
    pub ab_variant: Option<String>,

    /// Delay after which marketing scripts should load, if they should.
    pub martech_delay: Option<Duration>,

    /// Location the client should navigate to (tutorial deep link).
    pub redirect: Option<String>,

    /// Non-fatal problems: each one is an enhancement that was skipped.
    pub warnings: Vec<String>,
}

/// Result of decorating an HTML document.
#[derive(Debug, Clone, Default)]
pub struct DecorateResult {
    /// The decorated document.
    pub html: String,

    /// Side effects and skipped enhancements.
    pub report: DecorateReport,
}
