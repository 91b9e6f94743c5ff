//! Authored page metadata: the `metadata` block rewrites `<title>` and the
//! social meta tags, then removes itself.

use dom_query::Document;

use crate::blocks::table::read_block_config;
use crate::dom;
use crate::url_utils::PageLocation;

/// Meta tags each metadata key is copied to.
const META_MAPPING: &[(&str, &[&str])] = &[
    ("title", &["og:title", "twitter:title"]),
    ("description", &["og:description", "twitter:description", "description"]),
];

fn meta_selector(name: &str) -> String {
    if name.contains(':') {
        format!(r#"head meta[property="{name}"]"#)
    } else {
        format!(r#"head meta[name="{name}"]"#)
    }
}

/// Apply and remove the page's `main .metadata` block.
///
/// Returns whether a metadata block was found.
pub fn decorate_metadata(doc: &Document, location: &PageLocation) -> bool {
    let block = doc.select("main .metadata").first();
    if !block.exists() {
        return false;
    }
    let config = read_block_config(&block, location);

    if let Some(title) = config.get("title").filter(|t| !t.is_empty()) {
        let element = doc.select("head title").first();
        if element.exists() {
            dom::set_inner_html(&element, &dom::escape_html(title));
        } else {
            dom::append_html(&doc.select("head"), &dom::create_tag("title", &[], &dom::escape_html(title)));
        }
    }

    for (key, names) in META_MAPPING {
        let Some(value) = config.get(*key).filter(|v| !v.is_empty()) else {
            continue;
        };
        for name in *names {
            let meta = doc.select(&meta_selector(name)).first();
            if meta.exists() {
                meta.set_attr("content", value);
            }
        }
    }

    tracing::debug!(entries = config.len(), "metadata applied");
    dom::remove(&block);
    true
}
