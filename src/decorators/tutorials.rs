//! Tutorial listings: tag filter chips, per-category groups and video deep
//! links.
//!
//! A tutorials block sits in a section whose `h2`s name categories. The block
//! itself becomes a row of tag chips plus a results area; every category
//! heading gets the cards of its category right after it. Selecting tags
//! hides the category groups and shows the tutorials carrying all selected
//! tags in the block's own results.

use dom_query::{Document, Selection};
use serde::Serialize;
use url::Url;

use crate::blocks::table;
use crate::dom;
use crate::patterns::to_class_name;
use crate::session::PageSession;
use crate::url_utils::PageLocation;
use crate::{Error, Result};

const YOUTUBE_ALLOW: &str =
    "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture";

/// One tutorial row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tutorial {
    pub title: String,
    pub link: String,
    pub time: String,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub img: Option<String>,
}

impl Tutorial {
    /// Whether the tutorial carries every tag in `selected`.
    #[must_use]
    pub fn has_tags(&self, selected: &[String]) -> bool {
        selected.iter().all(|t| self.tags.contains(t))
    }
}

/// Items of a list cell: its element children, or the items of a single
/// list inside it.
fn list_items(cell: &Selection) -> Vec<String> {
    let mut items = dom::element_children(cell);
    if items.len() == 1 && (dom::is_tag(&items[0], "ul") || dom::is_tag(&items[0], "ol")) {
        items = dom::element_children(&items[0]);
    }
    items
        .iter()
        .map(|i| dom::text_content(i).trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Parse the rows of a tutorials block.
///
/// Rows hold five cells: title with link, duration, categories, tags and an
/// optional image.
pub fn parse_tutorials(block: &Selection, location: &PageLocation) -> Result<Vec<Tutorial>> {
    let mut tutorials = Vec::new();
    for row in table::rows(block) {
        let cells = table::expect_cells(&row, 5, "tutorials")?;
        let href = dom::get_attribute(&cells[0].select("a").first(), "href")
            .ok_or_else(|| Error::shape("tutorials", "a link in the title cell"))?;
        let link = location.resolve(&href).map_or(href, |u| u.to_string());
        let img = dom::get_attribute(&cells[4].select("img").first(), "src")
            .map(|src| location.resolve(&src).map_or(src, |u| u.to_string()));
        tutorials.push(Tutorial {
            title: dom::text_content(&cells[0]).trim().to_string(),
            link,
            time: dom::text_content(&cells[1]).trim().to_string(),
            categories: list_items(&cells[2]),
            tags: list_items(&cells[3]),
            img,
        });
    }
    Ok(tutorials)
}

/// Distinct tags in first-seen order.
#[must_use]
pub fn all_tags(tutorials: &[Tutorial]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in tutorials.iter().flat_map(|t| &t.tags) {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}

/// Card markup of one tutorial.
#[must_use]
pub fn tutorial_card(tutorial: &Tutorial) -> String {
    let title = dom::escape_html(&tutorial.title);
    let (image, img_class) = match &tutorial.img {
        Some(src) => (dom::create_tag("img", &[("src", src)], ""), "tutorial-card-img"),
        None => (
            format!(
                "{}{}",
                dom::create_tag("div", &[("class", "badge")], ""),
                dom::create_tag("div", &[("class", "title")], &title)
            ),
            "tutorial-card-img noimg",
        ),
    };
    let duration = dom::create_tag("div", &[("class", "duration")], &dom::escape_html(&tutorial.time));
    let tags: String = tutorial
        .tags
        .iter()
        .map(|t| dom::create_tag("span", &[], &dom::escape_html(t)))
        .collect();

    let inner = [
        dom::create_tag("div", &[("class", "tutorial-card-image")], ""),
        dom::create_tag("div", &[("class", img_class)], &format!("{image}{duration}")),
        dom::create_tag("div", &[("class", "tutorial-card-title")], &format!("<h3>{title}</h3>")),
        dom::create_tag("div", &[("class", "tutorial-card-tags")], &tags),
    ]
    .concat();
    dom::create_tag("div", &[("class", "tutorial-card"), ("data-href", &tutorial.link)], &inner)
}

fn cards<'t>(tutorials: impl Iterator<Item = &'t Tutorial>) -> String {
    tutorials.map(tutorial_card).collect()
}

fn results_html(cards: &str) -> String {
    dom::create_tag("div", &[("class", "results")], cards)
}

/// The `.section-wrapper > div` a block lives in.
fn section_of<'a>(block: &Selection<'a>) -> Option<Selection<'a>> {
    dom::closest(block, |s| dom::is_tag(s, "div") && s.parent().has_class("section-wrapper"))
}

/// Show or hide everything after the tutorials block in its section.
fn toggle_categories(section: &Selection, show: bool) {
    let mut after_tutorials = false;
    for child in dom::element_children(section) {
        if after_tutorials {
            if show {
                child.remove_class("hidden");
            } else {
                dom::add_classes(&child, &["hidden"]);
            }
        }
        if child.has_class("tutorials") {
            after_tutorials = true;
        }
    }
}

/// Apply a tag selection to a decorated tutorials block.
///
/// With tags selected the category groups are hidden and the block's results
/// list the tutorials carrying all of them. With none selected the results
/// are emptied and the groups shown again.
pub fn apply_tag_selection(block: &Selection, tutorials: &[Tutorial], selected: &[String]) {
    for chip in dom::query_selector_all(block, ".filters .tag-filter") {
        let tag = dom::text_content(&chip).to_string();
        if selected.contains(&tag) {
            dom::add_classes(&chip, &["selected"]);
        } else {
            chip.remove_class("selected");
        }
    }

    let results = block.select(".results").first();
    let section = section_of(block);
    if selected.is_empty() {
        if let Some(section) = &section {
            toggle_categories(section, true);
        }
        dom::set_inner_html(&results, "");
    } else {
        if let Some(section) = &section {
            toggle_categories(section, false);
        }
        let matches = tutorials.iter().filter(|t| t.has_tags(selected));
        dom::set_inner_html(&results, &cards(matches));
    }
}

/// Give each category heading of the section the cards of its category.
///
/// A category's results go right before the next heading; the last one's are
/// appended to the section.
fn group_by_category(section: &Selection, tutorials: &[Tutorial]) {
    let by_category = |category: &str| {
        results_html(&cards(tutorials.iter().filter(|t| t.categories.iter().any(|c| c == category))))
    };

    let mut current: Option<String> = None;
    for child in dom::element_children(section) {
        if !dom::is_tag(&child, "h2") {
            continue;
        }
        let heading = dom::text_content(&child).trim().to_string();
        if let Some(category) = current.take() {
            dom::insert_html_before(&child, &by_category(&category));
        }
        current = Some(heading);
    }
    if let Some(category) = current {
        dom::append_html(section, &by_category(&category));
    }
}

/// YouTube video id of a link, from `?v=` or the short-link path.
#[must_use]
pub fn youtube_video_id(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == "v")
        .map(|(_, v)| v.into_owned())
        .or_else(|| url.path().get(1..).map(str::to_string))
        .filter(|v| !v.is_empty())
}

/// Open a tutorial: YouTube links play in an overlay, anything else is a
/// navigation the client has to perform.
fn display_tutorial(doc: &Document, tutorial: &Tutorial, session: &mut PageSession<'_>) {
    if tutorial.link.contains("youtu") {
        let Some(vid) = youtube_video_id(&tutorial.link) else {
            return;
        };
        let src = format!("https://www.youtube.com/embed/{vid}?feature=oembed");
        let iframe = dom::create_tag(
            "iframe",
            &[
                ("width", "720"),
                ("height", "405"),
                ("src", &src),
                ("frameborder", "0"),
                ("allow", YOUTUBE_ALLOW),
                ("allowfullscreen", ""),
            ],
            "",
        );
        let video = dom::create_tag("div", &[("class", "overlay-video"), ("id", "overlay-video")], &iframe);
        dom::append_html(&doc.select("main"), &dom::create_tag("div", &[("class", "overlay")], &video));
        tracing::debug!(video = %vid, "tutorial overlay opened");
    } else {
        session.report.redirect = Some(tutorial.link.clone());
    }
}

/// Decorate every `main .tutorials` block.
pub fn decorate_tutorials(doc: &Document, session: &mut PageSession<'_>) -> Result<()> {
    for block in dom::query_selector_all(&doc.select("html"), "main .tutorials") {
        let section = section_of(&block)
            .ok_or_else(|| Error::shape("tutorials", "the block inside a .section-wrapper > div"))?;
        let tutorials = parse_tutorials(&block, session.location())?;

        let chips: String = all_tags(&tutorials)
            .iter()
            .map(|tag| dom::create_tag("span", &[("class", "tag-filter")], &dom::escape_html(tag)))
            .collect();
        let filters = dom::create_tag("div", &[("class", "filters")], &chips);
        dom::set_inner_html(&block, &format!("{filters}{}", results_html("")));

        group_by_category(&section, &tutorials);
        apply_tag_selection(&block, &tutorials, &session.options().selected_tags);
        tracing::debug!(tutorials = tutorials.len(), "tutorials decorated");

        let hash = session.location().hash();
        if let Some(video) = hash.strip_prefix('#').filter(|v| !v.is_empty()) {
            for tutorial in tutorials.iter().filter(|t| to_class_name(&t.title) == video) {
                display_tutorial(doc, tutorial, session);
            }
        }
    }
    Ok(())
}
