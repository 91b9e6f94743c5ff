//! Block loading: tagging, stylesheet linking and handler dispatch.
//!
//! Loading runs in two steps, mirroring when the browser applies them:
//! [`prepare_blocks`] tags every block and links its stylesheet as soon as
//! the hero is painted, and [`run_blocks`] invokes the handlers once the
//! remaining page passes are done. Prepared blocks carry
//! `data-block-status="loading"` in between.

use dom_query::{Document, Selection};

use super::registry::BlockRegistry;
use super::table;
use crate::dom;
use crate::session::PageSession;

/// Top-level content blocks.
pub const BLOCK_SELECTOR: &str = "main div.section-wrapper > div > div";

const STATUS_ATTR: &str = "data-block-status";
const NAME_ATTR: &str = "data-block-name";

/// Link a stylesheet in `<head>` unless it is already linked.
///
/// Returns whether a link was added.
pub fn load_css(doc: &Document, href: &str) -> bool {
    let existing = doc.select(&format!(r#"head > link[href="{href}"]"#));
    if existing.exists() {
        return false;
    }
    dom::append_html(
        &doc.select("head"),
        &dom::create_tag("link", &[("rel", "stylesheet"), ("href", href)], ""),
    );
    true
}

/// Append a script tag to `<head>`.
pub fn load_script(doc: &Document, src: &str, script_type: Option<&str>) {
    let mut attrs = vec![("src", src)];
    if let Some(t) = script_type {
        attrs.push(("type", t));
    }
    dom::append_html(&doc.select("head"), &dom::create_tag("script", &attrs, ""));
}

/// Tag every block for loading and link its stylesheet.
///
/// Returns the number of blocks prepared.
pub fn prepare_blocks(doc: &Document, registry: &BlockRegistry, session: &PageSession<'_>) -> usize {
    let mut prepared = 0;
    for block in dom::query_selector_all(&doc.select("html"), BLOCK_SELECTOR) {
        if block.has_attr(STATUS_ATTR) {
            continue;
        }
        let Some(raw) = table::block_name(&block) else {
            tracing::debug!("skipping block without a class");
            continue;
        };
        if let Some(section) = dom::closest_with_class(&block, "section-wrapper") {
            dom::add_classes(&section, &[&format!("{raw}-container")]);
        }

        let name = registry.parse_name(&raw);
        if !name.options.is_empty() {
            let mut classes: Vec<&str> = vec![name.base.as_str()];
            classes.extend(name.options.iter().map(String::as_str));
            dom::add_classes(&block, &classes);
        }
        dom::add_classes(&block, &["block"]);
        block.set_attr(NAME_ATTR, &name.base);
        block.set_attr(STATUS_ATTR, "loading");

        let root = &session.options().block_root;
        load_css(doc, &format!("{root}/{0}/{0}.css", name.base));
        prepared += 1;
    }
    prepared
}

/// Run the registered handler of every prepared block.
///
/// Handler failures and unknown block types are logged and recorded in the
/// report; they never abort the page.
pub fn run_blocks(doc: &Document, registry: &BlockRegistry, session: &mut PageSession<'_>) {
    let pending: Vec<Selection> =
        dom::query_selector_all(&doc.select("html"), &format!(r#"[{STATUS_ATTR}="loading"]"#));
    for block in pending {
        let name = dom::get_attribute(&block, NAME_ATTR).unwrap_or_default();
        match registry.handler(&name) {
            Some(handler) => match handler.decorate(&block, session) {
                Ok(()) => {
                    tracing::debug!(block = %name, "block decorated");
                    block.set_attr(STATUS_ATTR, "loaded");
                    session.report.loaded_blocks.push(name);
                }
                Err(err) => {
                    block.set_attr(STATUS_ATTR, "failed");
                    session.warn(&format!("block {name}"), &err);
                }
            },
            None => {
                tracing::debug!(block = %name, "no handler registered, stylesheet only");
                block.set_attr(STATUS_ATTR, "unhandled");
                session.report.unhandled_blocks.push(name);
            }
        }
    }
}
