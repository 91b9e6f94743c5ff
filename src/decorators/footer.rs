//! The lazily loaded site footer.

use dom_query::Document;

use super::sections::{add_nth_classes, wrap_sections};
use crate::dom;
use crate::session::PageSession;
use crate::url_utils::strip_trailing_slash;
use crate::{Error, Result};

const LEGACY_FOOTER_HOST: &str = "spark.adobe.com";

/// Fill `<footer>` from the footer fragment.
///
/// Links into the legacy host become site-relative, the footer rows are
/// wrapped into sections themed dark, grey, grey, and everything but the
/// first entry of the dark section is folded into a hidden drawer.
pub fn load_lazy_footer(doc: &Document, session: &PageSession<'_>) -> Result<()> {
    let footer = doc.select("footer").first();
    if !footer.exists() {
        return Err(Error::shape("footer", "a <footer> element"));
    }
    let fragment = session.fetcher().fetch_text(&session.options().footer_fragment)?;
    dom::set_inner_html(&footer, &fragment);

    for link in dom::query_selector_all(&footer, "a") {
        let Some(href) = dom::get_attribute(&link, "href") else {
            continue;
        };
        let Some(url) = session.location().resolve(&href) else {
            continue;
        };
        if url.host_str() == Some(LEGACY_FOOTER_HOST) {
            link.set_attr("href", strip_trailing_slash(url.path()));
        }
    }

    wrap_sections(doc, "footer > div");
    add_nth_classes(&footer, "footer > div", &["dark", "grey", "grey"]);

    let dark = doc.select("footer .dark > div").first();
    if !dark.exists() {
        return Err(Error::shape("footer", "a first footer row to hold the drawer"));
    }
    let rest: Vec<_> = dom::element_children(&dark).into_iter().skip(1).collect();
    let moved: String = rest.iter().map(|e| dom::outer_html(e).to_string()).collect();
    for e in &rest {
        dom::remove(e);
    }
    dom::append_html(&dark, &dom::create_tag("div", &[("class", "hidden")], &moved));
    tracing::debug!(moved = rest.len(), "lazy footer loaded");
    Ok(())
}
