//! A/B testing: martech rush for pages under test and variant redirection.
//!
//! A page under test carries an "A/B Test" table listing variant pages and
//! the share of traffic each one gets. One uniform sample picks at most one
//! variant, whose plain HTML then replaces the page's `main`.

use dom_query::Document;
use serde::Deserialize;
use url::Url;

use crate::blocks::loader::load_script;
use crate::dom;
use crate::fetch;
use crate::patterns::{parse_float_prefix, BOT_USER_AGENT};
use crate::session::PageSession;
use crate::url_utils::{path_stem, plain_html_path, PageLocation};
use crate::Result;

/// Script loaded right away for pages listed in the testing index.
pub const RUSH_MARTECH_SCRIPT: &str = "/scripts/martech.js";

const TEST_TABLE_HEADING: &str = "a/b test";

/// One variant of an A/B test.
#[derive(Debug, Clone, PartialEq)]
pub struct TestVariant {
    /// Site path of the variant page.
    pub url: String,
    /// Share of traffic, as a fraction.
    pub traffic: f64,
}

#[derive(Debug, Deserialize)]
struct TestingRecord {
    #[serde(rename = "Test URLs", default)]
    test_urls: String,
}

/// Whether the testing index lists the page.
///
/// Paths are compared without their extension. Records whose URL does not
/// parse are ignored.
pub fn check_testing(session: &PageSession<'_>) -> Result<bool> {
    let page = path_stem(session.location().pathname());
    let records: Vec<TestingRecord> =
        fetch::fetch_index(session.fetcher(), &session.options().testing_index)?;
    Ok(records.iter().any(|r| {
        Url::parse(r.test_urls.trim()).is_ok_and(|url| path_stem(url.path()) == page)
    }))
}

/// Whether a visitor may be bucketed into a test.
///
/// Only production hosts run tests, and a hash in the URL suppresses them;
/// `?test` forces them on. Bots never run tests.
#[must_use]
pub fn should_run_test(location: &PageLocation, user_agent: &str, production_host: &str) -> bool {
    let mut run = location.host().contains(production_host);
    if !location.hash().is_empty() {
        run = false;
    }
    if location.search() == "?test" {
        run = true;
    }
    if BOT_USER_AGENT.is_match(user_agent) {
        run = false;
    }
    run
}

/// Variants listed in the page's A/B test table.
///
/// The table is the first one with a header cell reading "A/B Test". Rows
/// whose first cell has no link are skipped.
#[must_use]
pub fn parse_test_table(doc: &Document, location: &PageLocation) -> Vec<TestVariant> {
    let table = dom::query_selector_all(&doc.select("html"), "table th")
        .into_iter()
        .find(|th| dom::text_content(th).trim().to_lowercase() == TEST_TABLE_HEADING)
        .and_then(|th| dom::closest(&th, |s| dom::is_tag(s, "table")));
    let Some(table) = table else {
        return Vec::new();
    };

    let mut variants = Vec::new();
    for row in dom::query_selector_all(&table, "tr") {
        let cells = dom::element_children(&row);
        let Some(name) = cells.first() else {
            continue;
        };
        let Some(href) = dom::get_attribute(&name.select("a").first(), "href") else {
            continue;
        };
        let Some(url) = location.resolve(&href) else {
            continue;
        };
        let traffic = cells
            .get(1)
            .map_or(f64::NAN, |c| parse_float_prefix(&dom::text_content(c)))
            / 100.0;
        variants.push(TestVariant {
            url: url.path().to_string(),
            traffic,
        });
    }
    variants
}

/// The variant whose cumulative traffic interval contains `sample`.
///
/// Variants take consecutive slices of `[0, 1)` in table order; a sample
/// past the last slice selects nothing.
#[must_use]
pub fn select_variant(variants: &[TestVariant], sample: f64) -> Option<&TestVariant> {
    let mut remaining = sample;
    for variant in variants {
        if remaining >= 0.0 && remaining < variant.traffic {
            return Some(variant);
        }
        remaining -= variant.traffic;
    }
    None
}

/// Run the page's A/B test, if any.
pub fn decorate_testing(doc: &Document, session: &mut PageSession<'_>) -> Result<()> {
    match check_testing(session) {
        Ok(true) => {
            tracing::debug!("page under test, rushing martech");
            load_script(doc, RUSH_MARTECH_SCRIPT, Some("module"));
        }
        Ok(false) => {}
        Err(err) => tracing::debug!(error = %err, "testing index unavailable"),
    }

    let options = session.options();
    if !should_run_test(session.location(), &options.user_agent, &options.production_host) {
        tracing::debug!("A/B test not run for this request");
        return Ok(());
    }

    let variants = parse_test_table(doc, session.location());
    if variants.is_empty() {
        return Ok(());
    }
    let sample = session.sample();
    let Some(variant) = select_variant(&variants, sample) else {
        tracing::debug!(sample, "no A/B variant selected");
        return Ok(());
    };

    let html = session.fetcher().fetch_text(&plain_html_path(&variant.url))?;
    dom::set_inner_html(&doc.select("main"), &html);
    tracing::debug!(variant = %variant.url, sample, "A/B variant applied");
    session.report.ab_variant = Some(variant.url.clone());
    Ok(())
}
