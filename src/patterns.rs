//! Compiled regex patterns used across decoration passes.
//!
//! All patterns are compiled once at first use using `LazyLock`.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Page location
// =============================================================================

/// A locale path segment such as `de-DE` or `zh-Hant-TW`.
pub static LOCALE_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z-]{2}(-[a-zA-Z-]*)?-[A-Z]{2}$").expect("LOCALE_SEGMENT regex")
});

/// Blog posts live under a year folder, e.g. `/express/learn/blog/2021/...`.
pub static BLOG_YEAR_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/20\d\d/").expect("BLOG_YEAR_PATH regex"));

/// User agents that must never be bucketed into an A/B test.
pub static BOT_USER_AGENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)bot|crawl|spider").expect("BOT_USER_AGENT regex"));

// =============================================================================
// Text parsing
// =============================================================================

/// Leading decimal number, as `parseFloat` reads it.
pub static LEADING_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").expect("LEADING_FLOAT regex")
});

/// Leading integer, as `parseInt` reads it.
pub static LEADING_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("LEADING_INT regex"));

/// Anything that is not allowed in a generated class name.
pub static NON_CLASS_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9a-z]").expect("NON_CLASS_CHAR regex"));

/// Posted-on dates are authored as `MM-DD-YYYY`.
pub static POSTED_ON_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d{1,2})-(\d{1,2})-(\d{2,4})\s*$").expect("POSTED_ON_DATE regex")
});

/// Parses the leading number of `s` the way `parseFloat` does.
///
/// Returns `NaN` when no number leads the string.
#[must_use]
pub fn parse_float_prefix(s: &str) -> f64 {
    LEADING_FLOAT
        .captures(s)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// Parses the leading integer of `s` the way `parseInt(s, 10)` does.
#[must_use]
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    LEADING_INT
        .captures(s)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok())
}

/// Turns free text into a class-name-safe token.
///
/// Lower-cases and replaces every character outside `[0-9a-z]` with `-`.
#[must_use]
pub fn to_class_name(name: &str) -> String {
    NON_CLASS_CHAR
        .replace_all(&name.to_lowercase(), "-")
        .into_owned()
}
