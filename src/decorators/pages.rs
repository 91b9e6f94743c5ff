//! Migrated-pages filter: a searchable listing over the site's page indexes.

use dom_query::Document;
use serde::{Deserialize, Serialize};

use super::card_html;
use crate::blocks::table::read_block_config;
use crate::dom;
use crate::session::PageSession;
use crate::{Error, Result};

/// One record of a page index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PageEntry {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: String,
}

impl PageEntry {
    /// Site path of the page: leading `/`, no `.html`.
    #[must_use]
    pub fn site_path(&self) -> String {
        let path = if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };
        path.replacen(".html", "", 1)
    }
}

/// Index locations listed in an `indices` config value.
///
/// The value is a run of `.json` locations, e.g.
/// `/express/query-index.json/drafts/query-index.json`.
#[must_use]
pub fn split_indices(value: &str) -> Vec<String> {
    value
        .split(".json")
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(|e| format!("{e}.json"))
        .collect()
}

/// Cards and count of the entries whose path contains `filter`.
///
/// Occurrences of the filter in the displayed path are set in bold.
#[must_use]
pub fn render_page_results(entries: &[PageEntry], filter: &str) -> (String, usize) {
    let mut html = String::new();
    let mut count = 0;
    for page in entries.iter().filter(|p| p.path.contains(filter)) {
        count += 1;
        let path = page.site_path();
        let marked = if filter.is_empty() {
            dom::escape_html(&path)
        } else {
            let needle = dom::escape_html(filter);
            dom::escape_html(&path)
                .split(needle.as_str())
                .collect::<Vec<_>>()
                .join(&format!("<b>{needle}</b>"))
        };
        html.push_str(&card_html(&path, &page.image, &page.title, &marked));
    }
    (html, count)
}

/// Stats line for a result count.
#[must_use]
pub fn stats_text(count: usize) -> String {
    format!("{count} page{} found", if count == 1 { "" } else { "s" })
}

/// Replace `main .filter-pages` with a filter input and its results.
///
/// The indexes named by the block's `indices` entry are merged once per
/// session. Results are rendered for the configured page filter.
pub fn decorate_migrated_pages(doc: &Document, session: &PageSession<'_>) -> Result<()> {
    let block = doc.select("main .filter-pages").first();
    if !block.exists() {
        return Ok(());
    }
    let config = read_block_config(&block, session.location());
    let indices = config
        .get("indices")
        .map(|v| split_indices(v))
        .ok_or_else(|| Error::shape("filter-pages", "an \"indices\" row"))?;
    let entries = session.full_index(&indices)?;

    let filter = &session.options().page_filter;
    let (results, count) = render_page_results(entries, filter);
    tracing::debug!(entries = entries.len(), count, "migrated pages filtered");

    let mut input_attrs = vec![
        ("type", "text"),
        ("id", "page-filter"),
        ("placeholder", "type to filter"),
    ];
    if !filter.is_empty() {
        input_attrs.push(("value", filter.as_str()));
    }
    let stats = stats_text(count);
    let html = format!(
        "{}{}{}",
        dom::create_tag("input", &input_attrs, ""),
        dom::create_tag("div", &[("class", "stats"), ("id", "page-filter-stats")], &stats),
        dom::create_tag("div", &[("class", "results"), ("id", "page-filter-results")], &results),
    );
    dom::set_inner_html(&block, &html);
    Ok(())
}
