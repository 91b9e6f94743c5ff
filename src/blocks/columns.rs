//! The `columns` block.
//!
//! Lays out a block table as side-by-side columns: numbered step labels,
//! icon lists, linked or animated pictures, button variants and heading
//! scaling for headings that wrap past three lines.

use dom_query::{NodeRef, Selection};

use super::table;
use crate::dom;
use crate::layout::{scale_heading, HeadingLevel, Measurer};
use crate::patterns::parse_int_prefix;
use crate::session::PageSession;
use crate::Result;

const HEADING_SELECTOR: &str =
    "main .columns h1, main .columns h2, main .columns h3, main .columns h4, main .columns h5";

/// Decorate a `columns` block.
pub fn decorate(block: &Selection<'_>, session: &mut PageSession<'_>) -> Result<()> {
    if let Some(measurer) = session.measurer() {
        if let Some(root) = dom::closest(block, |s| dom::is_tag(s, "html")) {
            scale_headings(&root, measurer);
        }
    }

    let rows = table::rows(block);
    if rows.len() > 1 {
        dom::add_classes(block, &["table"]);
    }
    let columns = rows.first().map_or(0, |row| table::cells(row).len());
    if columns > 0 {
        dom::add_classes(block, &[&format!("width-{columns}-columns")]);
    }

    let numbered = block.has_class("numbered");
    let total = if numbered { numbered_total(block, rows.len()) } else { 0 };
    let fullsize = block.has_class("fullsize");

    for (row_num, row) in rows.iter().enumerate() {
        for (cell_num, cell) in table::cells(row).iter().enumerate() {
            if cell.select("img.icon, svg.icon").exists() {
                decorate_icon_list(cell);
            }
            if cell_num == 0 && numbered {
                let label = numbered_label(row_num + 1, total);
                dom::prepend_html(cell, &dom::create_tag("span", &[("class", "num")], &label));
            }

            unwrap_single_picture(cell);

            let link = cell.select("a").first();
            if cell.select("picture").exists()
                && link.exists()
                && dom::text_content(&link).starts_with("https://")
            {
                let href = dom::get_attribute(&link, "href").unwrap_or_default();
                if href.ends_with(".mp4") {
                    transform_link_to_animation(&link);
                } else {
                    link_image(cell);
                }
            }

            decorate_button(cell, fullsize);

            for p in dom::query_selector_all(cell, "p") {
                if dom::is_empty_element(&p) {
                    dom::remove(&p);
                }
            }

            dom::add_classes(cell, &["column"]);
            let first = cell.children().first();
            if dom::is_tag(&first, "picture") {
                dom::add_classes(cell, &["column-picture"]);
            }

            for p in dom::query_selector_all(cell, "p") {
                if dom::text_content(&p).contains("Powered by") {
                    dom::add_classes(&p, &["powered-by"]);
                }
            }
        }
    }
    Ok(())
}

/// Number of steps a numbered block counts to.
///
/// Blocks with more than four classes carry the total in their fourth class;
/// otherwise it is the row count.
fn numbered_total(block: &Selection, rows: usize) -> i64 {
    let classes = dom::class_list(block);
    let rows = i64::try_from(rows).unwrap_or(i64::MAX);
    if classes.len() > 4 {
        parse_int_prefix(&classes[3]).unwrap_or(rows)
    } else {
        rows
    }
}

/// Label of step `num` (1-based) out of `total`.
///
/// `3.` for short lists, `03/12 —` once there are more than nine steps.
#[must_use]
pub fn numbered_label(num: usize, total: i64) -> String {
    if total > 9 {
        let label = format!("{num}/{total} \u{2014}");
        if num < 10 {
            format!("0{label}")
        } else {
            label
        }
    } else {
        format!("{num}.")
    }
}

fn is_icon(node: &NodeRef) -> bool {
    if !node.is_element() {
        return false;
    }
    let sel = Selection::from(*node);
    (dom::is_tag(&sel, "img") || dom::is_tag(&sel, "svg")) && sel.has_class("icon")
}

/// Turn the icons of a cell into a brand mark or an icon list.
///
/// A lone icon is a brand mark. Several icons become rows of icon plus
/// description, where the description is whatever node follows the icon.
/// The list goes where the first icon was, but only when something precedes
/// that icon in its parent; otherwise the icons and descriptions are dropped.
fn decorate_icon_list(cell: &Selection) {
    for p in dom::query_selector_all(cell, "p") {
        if dom::is_empty_element(&p) {
            dom::remove(&p);
        }
    }

    let icons = dom::query_selector_all(cell, "img.icon, svg.icon");
    match icons.len() {
        0 => return,
        1 => {
            dom::add_classes(&icons[0], &["brand"]);
            return;
        }
        _ => {}
    }

    let mut rows = String::new();
    let mut descriptions = Vec::new();
    for icon in &icons {
        let description = dom::next_sibling_node(icon).filter(|n| !is_icon(n));
        let description_html = description.as_ref().map(dom::node_html).unwrap_or_default();
        if let Some(node) = description {
            descriptions.push(node);
        }
        let icon_cell = dom::create_tag("div", &[("class", "columns-iconlist-icon")], &dom::outer_html(icon));
        let text_cell = dom::create_tag("div", &[("class", "columns-iconlist-description")], &description_html);
        rows.push_str(&dom::create_tag("div", &[], &format!("{icon_cell}{text_cell}")));
    }
    let list = dom::create_tag("div", &[("class", "columns-iconlist")], &rows);
    let anchored = icons[0].nodes().first().and_then(NodeRef::prev_sibling).is_some();

    for node in &descriptions {
        dom::remove_node(node);
    }
    for icon in &icons[1..] {
        dom::remove(icon);
    }
    if anchored {
        dom::replace_with_html(&icons[0], &list);
    } else {
        tracing::debug!(icons = icons.len(), "icon list has no anchor, dropping icons");
        dom::remove(&icons[0]);
    }
}

/// Move a lone `<picture>` out of its `<p>` wrapper, right before it.
fn unwrap_single_picture(cell: &Selection) {
    let pictures = cell.select("picture");
    if pictures.length() != 1 {
        return;
    }
    let wrapper = pictures.parent();
    if !dom::is_tag(&wrapper, "p") {
        return;
    }
    let html = dom::outer_html(&pictures).to_string();
    dom::remove(&pictures);
    dom::insert_html_before(&wrapper, &html);
}

/// The link's own paragraph, when the link is its only content.
fn sole_link_paragraph<'a>(link: &Selection<'a>) -> Option<Selection<'a>> {
    let parent = link.parent();
    (dom::is_tag(&parent, "p") && dom::child_nodes(&parent).len() == 1).then_some(parent)
}

/// Wrap the cell's picture in the cell's first link and drop the link text.
pub fn link_image(cell: &Selection) {
    let picture = cell.select("picture").first();
    let link = cell.select("a").first();
    if !picture.exists() || !link.exists() {
        return;
    }
    let href = dom::get_attribute(&link, "href").unwrap_or_default();
    let linked = dom::create_tag("a", &[("href", &href)], &dom::outer_html(&picture));

    match sole_link_paragraph(&link) {
        Some(p) => dom::remove(&p),
        None => dom::remove(&link),
    }
    dom::replace_with_html(&picture, &linked);
}

/// Replace a link to an `.mp4` with an autoplaying, muted, looping video.
pub fn transform_link_to_animation(link: &Selection) {
    let href = dom::get_attribute(link, "href").unwrap_or_default();
    let source = dom::create_tag("source", &[("src", &href), ("type", "video/mp4")], "");
    let video = dom::create_tag(
        "video",
        &[("playsinline", ""), ("autoplay", ""), ("loop", ""), ("muted", "")],
        &source,
    );
    match sole_link_paragraph(link) {
        Some(p) => dom::replace_with_html(&p, &video),
        None => dom::replace_with_html(link, &video),
    }
}

fn decorate_button(cell: &Selection, fullsize: bool) {
    let link = cell.select("a").first();
    if !link.exists() || !link.has_class("button") {
        return;
    }
    if fullsize {
        dom::add_classes(&link, &["xlarge"]);
    } else if link.has_class("light") {
        dom::replace_class(&link, "accent", "primary");
    }
}

/// Shrink column headings that wrap to more than three lines.
pub fn scale_headings(root: &Selection, measurer: &dyn Measurer) {
    for heading in dom::query_selector_all(root, HEADING_SELECTOR) {
        let Some(level) = dom::tag_name(&heading).and_then(|t| HeadingLevel::from_tag(&t)) else {
            continue;
        };
        let text = dom::text_content(&heading);
        let Some(metrics) = measurer.measure(level, text.trim()) else {
            continue;
        };
        if let Some(scaled) = scale_heading(level, metrics) {
            tracing::debug!(?level, font_size = scaled.font_size, "scaling column heading");
            heading.set_attr("style", &scaled.style());
        }
    }
}
