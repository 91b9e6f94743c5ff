//! Blog post listings and blog article bylines.

use std::collections::BTreeMap;

use chrono::Month;
use dom_query::{Document, Selection};
use serde::{Deserialize, Serialize};

use super::card_html;
use super::sections::decorate_legacy_links;
use crate::blocks::table::{read_block_config, BlockConfig};
use crate::dom;
use crate::patterns::POSTED_ON_DATE;
use crate::session::PageSession;
use crate::{Error, Result};

/// One record of the blog index.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct BlogPost {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub teaser: String,
    #[serde(default)]
    pub image: String,
    /// Any further index columns, available to listing filters.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl BlogPost {
    /// Value of an index column as text.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<String> {
        match name {
            "path" => Some(self.path.clone()),
            "title" => Some(self.title.clone()),
            "teaser" => Some(self.teaser.clone()),
            "image" => Some(self.image.clone()),
            _ => match self.extra.get(name)? {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                serde_json::Value::Bool(b) => Some(b.to_string()),
                _ => None,
            },
        }
    }
}

/// Posts matching every filter of a listing.
///
/// A post matches a filter when its column of that name contains the
/// filter value, ignoring case. A post without the column does not match.
#[must_use]
pub fn filter_blog_posts<'p>(posts: &'p [BlogPost], filters: &BlockConfig) -> Vec<&'p BlogPost> {
    let filters: Vec<(&str, String)> = filters
        .iter()
        .map(|(name, value)| (name.as_str(), value.trim().to_lowercase()))
        .collect();
    posts
        .iter()
        .filter(|post| {
            filters.iter().all(|(name, value)| {
                post.field(name)
                    .is_some_and(|field| field.to_lowercase().contains(value.as_str()))
            })
        })
        .collect()
}

fn post_card(post: &BlogPost) -> String {
    card_html(
        &format!("/{}", post.path),
        &post.image,
        &post.title,
        &dom::escape_html(&post.teaser),
    )
}

/// Replace every `main .blog-posts` block with cards of the matching posts.
pub fn decorate_blog_posts(doc: &Document, session: &PageSession<'_>) -> Result<()> {
    let blocks = dom::query_selector_all(&doc.select("html"), "main .blog-posts");
    if blocks.is_empty() {
        return Ok(());
    }
    let posts = session.blog_index()?;
    for block in &blocks {
        let config = read_block_config(block, session.location());
        let matches = filter_blog_posts(posts, &config);
        tracing::debug!(filters = config.len(), posts = matches.len(), "blog posts listed");
        let cards: String = matches.into_iter().map(post_card).collect();
        dom::set_inner_html(block, &cards);
    }
    Ok(())
}

/// Turn the author and date paragraphs of a blog article into a byline.
///
/// Looks in the second section for the first paragraphs starting with
/// `by ` and `posted on ` (any case). The date is authored `MM-DD-YYYY`.
pub fn decorate_blog_page(doc: &Document) -> Result<()> {
    if !doc.select("body").has_class("blog-page") {
        return Ok(());
    }
    let sections = dom::query_selector_all(&doc.select("html"), "main > div.section-wrapper > div");
    let body = sections
        .get(1)
        .ok_or_else(|| Error::shape("blog page", "a second section holding the article"))?;

    let mut by: Option<Selection> = None;
    let mut posted_on: Option<Selection> = None;
    for p in dom::query_selector_all(body, "p") {
        let text = dom::text_content(&p).to_lowercase();
        if by.is_none() && text.starts_with("by ") {
            by = Some(p.clone());
        }
        if posted_on.is_none() && text.starts_with("posted on ") {
            posted_on = Some(p);
        }
    }
    let by = by.ok_or_else(|| Error::shape("blog page", "a paragraph starting with \"by \""))?;
    let posted_on =
        posted_on.ok_or_else(|| Error::shape("blog page", "a paragraph starting with \"posted on \""))?;

    let author = dom::text_content(&by).get(3..).unwrap_or_default().to_string();
    let date = dom::text_content(&posted_on).get(10..).unwrap_or_default().to_string();
    let (month, day, year) = parse_posted_on(&date)
        .ok_or_else(|| Error::shape("blog page", format!("a MM-DD-YYYY date, found {date:?}")))?;

    let byline = format!(
        r#"<img src="/icons/user.svg"> {} | {} {day}, {year} "#,
        dom::escape_html(&author),
        month.name()
    );
    dom::set_inner_html(&by, &dom::create_tag("span", &[("class", "byline")], &byline));
    dom::remove(&posted_on);
    decorate_legacy_links(doc);
    Ok(())
}

/// Split an authored `MM-DD-YYYY` date, keeping day and year as written.
fn parse_posted_on(date: &str) -> Option<(Month, String, String)> {
    let caps = POSTED_ON_DATE.captures(date)?;
    let month: u8 = caps.get(1)?.as_str().parse().ok()?;
    let month = Month::try_from(month).ok()?;
    Some((month, caps.get(2)?.as_str().to_string(), caps.get(3)?.as_str().to_string()))
}
