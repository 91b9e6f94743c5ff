//! Sections, header, page template, buttons, legacy links and do-more embeds.

use dom_query::{Document, Selection};

use crate::dom;
use crate::patterns::BLOG_YEAR_PATH;
use crate::url_utils::PageLocation;
use crate::{Error, Result};

const LEGACY_BLOG: &str = "https://blog.adobespark.com/";

/// Wrap every `selector` match without an `id` in a `div.section-wrapper`.
///
/// Wrappers are appended to the matched element's parent, so processing the
/// matches in document order keeps their order. Returns the number wrapped.
pub fn wrap_sections(doc: &Document, selector: &str) -> usize {
    let mut wrapped = 0;
    for div in dom::query_selector_all(&doc.select("html"), selector) {
        if div.has_attr("id") {
            continue;
        }
        let parent = div.parent();
        let wrapper = dom::create_tag("div", &[("class", "section-wrapper")], &dom::outer_html(&div));
        dom::remove(&div);
        dom::append_html(&parent, &wrapper);
        wrapped += 1;
    }
    wrapped
}

/// Add `classes[i]` to the i-th match of `selector` under `root`.
pub(crate) fn add_nth_classes(root: &Selection, selector: &str, classes: &[&str]) {
    for (el, class) in dom::query_selector_all(root, selector).iter().zip(classes) {
        dom::add_classes(el, &[*class]);
    }
}

/// Classify the header paragraphs as logo and sign-in, and make the sign-in
/// link a button.
pub fn decorate_header(doc: &Document) -> Result<()> {
    let header = doc.select("header").first();
    if !header.exists() {
        return Err(Error::shape("header", "a <header> element"));
    }
    add_nth_classes(&header, "header > p", &["logo", "susi"]);
    let sign_in = header.select(".susi a").first();
    if sign_in.exists() {
        dom::add_classes(&sign_in, &["button"]);
    }
    Ok(())
}

/// Body classes derived from the page path.
pub fn decorate_template(doc: &Document, location: &PageLocation) {
    let body = doc.select("body");
    let path = location.pathname();
    if path.contains("/make/") {
        dom::add_classes(&body, &["make-page"]);
    }
    if BLOG_YEAR_PATH.is_match(path) {
        dom::add_classes(&body, &["blog-page"]);
    }
}

/// Turn links that stand alone in a paragraph into buttons.
///
/// A bare link is a secondary button, a bold one a primary button. Image
/// links are left alone.
pub fn decorate_buttons(doc: &Document) {
    for link in dom::query_selector_all(&doc.select("html"), "main a") {
        if link.select("img").exists() {
            continue;
        }
        let up = link.parent();
        let two_up = up.parent();
        let sole_child = |sel: &Selection| dom::child_nodes(sel).len() == 1;
        if sole_child(&up) && dom::is_tag(&up, "p") {
            link.set_attr("class", "button secondary");
        }
        if sole_child(&up) && dom::is_tag(&up, "strong") && sole_child(&two_up) && dom::is_tag(&two_up, "p") {
            link.set_attr("class", "button primary");
        }
    }
}

/// Rewrite links into the retired blog host to site-relative paths.
pub fn decorate_legacy_links(doc: &Document) -> usize {
    let links = dom::query_selector_all(&doc.select("html"), &format!(r#"a[href^="{LEGACY_BLOG}"]"#));
    for link in &links {
        let href = dom::get_attribute(link, "href").unwrap_or_default();
        link.set_attr("href", &legacy_link_path(&href));
    }
    links.len()
}

/// `https://blog.adobespark.com/2020/01/post/` becomes `/2020/01/post`.
fn legacy_link_path(href: &str) -> String {
    let mut trimmed = href.to_string();
    trimmed.pop();
    trimmed
        .get(LEGACY_BLOG.len() - 1..)
        .unwrap_or_default()
        .to_string()
}

/// Collect the paragraphs of each do-more embed into a trailing `div.actions`.
pub fn decorate_do_more_embed(doc: &Document) {
    for domore in dom::query_selector_all(&doc.select("html"), "div.embed-internal-domore > div") {
        let paragraphs: Vec<Selection> = dom::element_children(&domore)
            .into_iter()
            .filter(|c| dom::is_tag(c, "p"))
            .collect();
        let moved: String = paragraphs.iter().map(|p| dom::outer_html(p).to_string()).collect();
        for p in &paragraphs {
            dom::remove(p);
        }
        dom::append_html(&domore, &dom::create_tag("div", &[("class", "actions")], &moved));
    }
}
