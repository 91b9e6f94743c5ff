//! DOM Operations Adapter
//!
//! Provides browser-DOM-style operations using the `dom_query` crate.
//! Decorators use these helpers instead of reaching into `dom_query`
//! directly, so the handful of structural edits they need (prepend, insert
//! before, wrap, move) are expressed once, on top of HTML serialisation.
//!
//! Structural edits that go through `replace_with_html` create new nodes:
//! a `Selection` taken before such an edit must be re-selected afterwards.

// Re-export core types for external use
pub use dom_query::{Document, NodeRef, Selection};

pub use tendril::StrTendril;

// === Attribute Operations ===

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// The element's class list, in attribute order.
///
/// Equivalent of `Array.from(el.classList)`.
#[must_use]
pub fn class_list(sel: &Selection) -> Vec<String> {
    sel.attr("class")
        .map(|c| c.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Add classes that are not present yet, keeping attribute order.
pub fn add_classes(sel: &Selection, classes: &[&str]) {
    for class in classes.iter().filter(|c| !c.is_empty()) {
        if !sel.has_class(class) {
            sel.add_class(class);
        }
    }
}

/// Replace one class with another, if the first is present.
///
/// Equivalent of `el.classList.replace(old, new)`.
pub fn replace_class(sel: &Selection, old: &str, new: &str) {
    if sel.has_class(old) {
        let classes: Vec<String> = class_list(sel)
            .into_iter()
            .map(|c| if c == old { new.to_string() } else { c })
            .collect();
        let mut deduped: Vec<String> = Vec::with_capacity(classes.len());
        for class in classes {
            if !deduped.contains(&class) {
                deduped.push(class);
            }
        }
        sel.set_attr("class", &deduped.join(" "));
    }
}

// === Tag/Node Information ===

/// Get tag name (lowercase)
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(dom_query::NodeRef::node_name)
        .map(|t| t.to_string())
}

/// Whether the first node of the selection is a `tag` element.
#[must_use]
pub fn is_tag(sel: &Selection, tag: &str) -> bool {
    tag_name(sel).is_some_and(|t| t.eq_ignore_ascii_case(tag))
}

// === Text Content ===

/// Get all text content of node and descendants
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

/// Get inner HTML content
#[inline]
#[must_use]
pub fn inner_html(sel: &Selection) -> StrTendril {
    sel.inner_html()
}

/// Get outer HTML content
#[inline]
#[must_use]
pub fn outer_html(sel: &Selection) -> StrTendril {
    sel.html()
}

/// Escape text for use as HTML character data.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

// === Tree Navigation ===

/// Direct element children as individual selections.
#[must_use]
pub fn element_children<'a>(sel: &Selection<'a>) -> Vec<Selection<'a>> {
    sel.children()
        .nodes()
        .iter()
        .map(|n| Selection::from(*n))
        .collect()
}

/// All child nodes, including text nodes.
///
/// Equivalent of `el.childNodes`.
#[must_use]
pub fn child_nodes<'a>(sel: &Selection<'a>) -> Vec<NodeRef<'a>> {
    let mut nodes = Vec::new();
    if let Some(node) = sel.nodes().first() {
        let mut child = node.first_child();
        while let Some(c) = child {
            child = c.next_sibling();
            nodes.push(c);
        }
    }
    nodes
}

/// Whether the element has no child nodes at all (CSS `:empty`).
#[must_use]
pub fn is_empty_element(sel: &Selection) -> bool {
    sel.nodes().first().is_some_and(|n| n.first_child().is_none())
}

/// Get next sibling node, which may be a text node
#[must_use]
pub fn next_sibling_node<'a>(sel: &Selection<'a>) -> Option<NodeRef<'a>> {
    sel.nodes().first().and_then(NodeRef::next_sibling)
}

/// Get previous element sibling (skipping text nodes)
#[must_use]
pub fn previous_element_sibling<'a>(sel: &Selection<'a>) -> Option<Selection<'a>> {
    sel.nodes().first().and_then(|node| {
        let mut sibling = node.prev_sibling();
        while let Some(s) = sibling {
            if s.is_element() {
                return Some(Selection::from(s));
            }
            sibling = s.prev_sibling();
        }
        None
    })
}

/// Nearest ancestor-or-self matching `pred`.
///
/// Equivalent of `el.closest(selector)` with the selector written as a
/// predicate.
#[must_use]
pub fn closest<'a>(sel: &Selection<'a>, pred: impl Fn(&Selection<'a>) -> bool) -> Option<Selection<'a>> {
    let mut current = sel.clone();
    while current.exists() {
        if tag_name(&current).is_some() && pred(&current) {
            return Some(current);
        }
        current = current.parent();
    }
    None
}

/// Nearest ancestor-or-self carrying `class`.
#[must_use]
pub fn closest_with_class<'a>(sel: &Selection<'a>, class: &str) -> Option<Selection<'a>> {
    closest(sel, |s| s.has_class(class))
}

// === Querying ===

/// Query all elements by CSS selector, one selection per match
#[must_use]
pub fn query_selector_all<'a>(sel: &Selection<'a>, selector: &str) -> Vec<Selection<'a>> {
    sel.select(selector)
        .nodes()
        .iter()
        .map(|n| Selection::from(*n))
        .collect()
}

// === Tree Manipulation ===

/// Remove elements from tree
#[inline]
pub fn remove(sel: &Selection) {
    sel.remove();
}

/// Remove a single node, which may be a text node
pub fn remove_node(node: &NodeRef) {
    Selection::from(*node).remove();
}

/// Set HTML content
#[inline]
pub fn set_inner_html(sel: &Selection, html: &str) {
    sel.set_html(html);
}

/// Append HTML content
#[inline]
pub fn append_html(sel: &Selection, html: &str) {
    sel.append_html(html);
}

/// Insert HTML as the first children of the element.
///
/// Re-parses the element's content; selections inside it must be re-selected.
pub fn prepend_html(sel: &Selection, html: &str) {
    let inner = inner_html(sel);
    sel.set_html(format!("{html}{inner}"));
}

/// Replace element with HTML
#[inline]
pub fn replace_with_html(sel: &Selection, html: &str) {
    sel.replace_with_html(html);
}

/// Insert HTML right before the element.
pub fn insert_html_before(sel: &Selection, html: &str) {
    let outer = outer_html(sel);
    sel.replace_with_html(format!("{html}{outer}"));
}

/// Serialise one node the way `outerHTML` would, text nodes included.
///
/// Comments and other non-content nodes serialise to nothing.
#[must_use]
pub fn node_html(node: &NodeRef) -> String {
    if node.is_element() {
        outer_html(&Selection::from(*node)).to_string()
    } else if node.is_text() {
        escape_html(&node.text())
    } else {
        String::new()
    }
}

// === Element Construction ===

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
];

/// Build the markup of a new element.
///
/// Equivalent of `createTag(name, attrs)` followed by setting `innerHTML`.
/// Attribute values are escaped; `inner` is inserted as HTML and ignored for
/// void elements.
#[must_use]
pub fn create_tag(name: &str, attrs: &[(&str, &str)], inner: &str) -> String {
    let mut html = format!("<{name}");
    for (key, value) in attrs {
        html.push_str(&format!(" {key}=\"{}\"", escape_html(value)));
    }
    html.push('>');
    if VOID_ELEMENTS.contains(&name) {
        return html;
    }
    html.push_str(inner);
    html.push_str(&format!("</{name}>"));
    html
}

// === Parsing ===

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}
