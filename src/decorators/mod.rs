//! Page-level decoration passes.
//!
//! Each submodule owns one enhancement of the page as a whole (as opposed to
//! a single block type). Passes take the document and, when they need
//! fetched data or report side effects, the [`PageSession`].
//!
//! [`PageSession`]: crate::session::PageSession

pub mod blog;
pub mod footer;
pub mod hero;
pub mod howto;
pub mod martech;
pub mod metadata;
pub mod pages;
pub mod sections;
pub mod testing;
pub mod tutorials;

use crate::dom;

/// Markup of a clickable listing card.
///
/// `title` is escaped; `body_html` is inserted as is.
pub(crate) fn card_html(href: &str, image: &str, title: &str, body_html: &str) -> String {
    let image = dom::create_tag("img", &[("loading", "lazy"), ("src", image)], "");
    let title = dom::create_tag("h3", &[], &dom::escape_html(title));
    let body = dom::create_tag("p", &[], body_html);
    dom::create_tag(
        "div",
        &[("class", "card"), ("data-href", href)],
        &format!(
            "{}{}",
            dom::create_tag("div", &[("class", "card-image")], &image),
            dom::create_tag("div", &[("class", "card-body")], &format!("{title}{body}")),
        ),
    )
}
