//! How-To steps and their schema.org markup.

use dom_query::Document;
use serde::Serialize;

use crate::blocks::table;
use crate::dom;
use crate::{Error, Result};

/// schema.org `HowTo` record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HowTo {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub kind: String,
    pub name: String,
    pub step: Vec<HowToStep>,
}

/// One numbered step of a [`HowTo`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HowToStep {
    #[serde(rename = "@type")]
    pub kind: String,
    pub position: usize,
    pub name: String,
    #[serde(rename = "itemListElement")]
    pub item_list_element: HowToDirection,
}

/// Instruction text of a [`HowToStep`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HowToDirection {
    #[serde(rename = "@type")]
    pub kind: String,
    pub text: String,
}

impl HowTo {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            context: "http://schema.org".to_string(),
            kind: "HowTo".to_string(),
            name: name.to_string(),
            step: Vec::new(),
        }
    }

    /// Append a step; positions count from 1.
    pub fn push_step(&mut self, name: &str, text: &str) {
        self.step.push(HowToStep {
            kind: "HowToStep".to_string(),
            position: self.step.len() + 1,
            name: name.to_string(),
            item_list_element: HowToDirection {
                kind: "HowToDirection".to_string(),
                text: text.to_string(),
            },
        });
    }

    /// JSON safe to embed in a `<script>` element.
    pub fn to_script_json(&self) -> Result<String> {
        let json = serde_json::to_string(self).map_err(|source| Error::Json {
            location: "how-to schema".to_string(),
            source,
        })?;
        Ok(json.replace("</", "<\\/"))
    }
}

/// Number the steps of every `main .how-to-steps` block and publish them as
/// `HowTo` JSON-LD in `<head>`.
///
/// The block's heading is the element right before it. Each row holds the
/// step name and its instructions; the name becomes an `h3` inside the
/// instructions cell. Every block is checked before any is changed, so one
/// malformed block leaves all of them as authored.
pub fn decorate_how_to(doc: &Document) -> Result<usize> {
    let head = doc.select("head");
    let blocks = dom::query_selector_all(&doc.select("html"), "main .how-to-steps");

    let mut checked = Vec::with_capacity(blocks.len());
    for block in &blocks {
        let heading = dom::previous_element_sibling(block)
            .ok_or_else(|| Error::shape("how-to-steps", "a heading right before the block"))?;
        let rows = table::rows(block);
        let mut cells = Vec::with_capacity(rows.len());
        let mut schema = HowTo::new(dom::text_content(&heading).trim());
        for row in &rows {
            let row_cells = table::expect_cells(row, 2, "how-to-steps")?;
            schema.push_step(
                dom::text_content(&row_cells[0]).trim(),
                dom::text_content(&row_cells[1]).trim(),
            );
            cells.push(row_cells);
        }
        let json = schema.to_script_json()?;
        checked.push((rows, cells, schema, json));
    }

    for (rows, cells, schema, json) in &checked {
        for ((row, row_cells), step) in rows.iter().zip(cells).zip(&schema.step) {
            let tip = &row_cells[1];
            dom::prepend_html(tip, &dom::create_tag("h3", &[], &dom::escape_html(&step.name)));
            dom::add_classes(tip, &["tip"]);
            dom::remove(&row_cells[0]);
            let number = dom::create_tag("span", &[], &step.position.to_string());
            dom::prepend_html(row, &dom::create_tag("div", &[("class", "number")], &number));
        }
        dom::append_html(
            &head,
            &dom::create_tag("script", &[("type", "application/ld+json")], json),
        );
        tracing::debug!(steps = schema.step.len(), "how-to schema added");
    }
    Ok(blocks.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head></head><body><main><div>
        <h2>How to make a flyer</h2>
        <div class="how-to-steps">
            <div><div>Pick a template</div><div>Browse the gallery.</div></div>
            <div><div>Customize</div><div>Add your <b>text</b>.</div></div>
        </div>
    </div></main></body></html>"#;

    #[test]
    fn steps_are_numbered_and_titled() {
        let doc = dom::parse(PAGE);
        assert_eq!(decorate_how_to(&doc).unwrap_or_else(|e| panic!("{e}")), 1);

        let numbers: Vec<String> = dom::query_selector_all(&doc.select("main"), ".number span")
            .iter()
            .map(|s| dom::text_content(s).to_string())
            .collect();
        assert_eq!(numbers, vec!["1", "2"]);
        assert_eq!(doc.select(".how-to-steps > div > div.tip > h3").length(), 2);
        assert_eq!(doc.select(".how-to-steps > div > div").length(), 4);
    }

    #[test]
    fn schema_is_published_in_head() {
        let doc = dom::parse(PAGE);
        decorate_how_to(&doc).unwrap_or_else(|e| panic!("{e}"));

        let script = doc.select(r#"head > script[type="application/ld+json"]"#);
        let json: serde_json::Value =
            serde_json::from_str(&dom::text_content(&script)).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(json["@type"], "HowTo");
        assert_eq!(json["name"], "How to make a flyer");
        assert_eq!(json["step"][1]["position"], 2);
        assert_eq!(json["step"][1]["itemListElement"]["text"], "Add your text.");
    }

    #[test]
    fn script_json_cannot_close_the_script() {
        let mut schema = HowTo::new("a </script> b");
        schema.push_step("x", "y");
        let json = schema.to_script_json().unwrap_or_else(|e| panic!("{e}"));

        assert!(!json.contains("</"));
    }

    #[test]
    fn malformed_rows_leave_the_block_alone() {
        let doc = dom::parse(
            r#"<main><h2>T</h2><div class="how-to-steps"><div><div>only a name</div></div></div></main>"#,
        );
        assert!(matches!(decorate_how_to(&doc), Err(Error::Shape { .. })));
        assert!(!doc.select(".how-to-steps .number").exists());
    }

    #[test]
    fn a_malformed_later_block_leaves_earlier_blocks_alone() {
        let doc = dom::parse(
            r#"<html><head></head><body><main><div>
                <h2>First</h2>
                <div class="how-to-steps">
                    <div><div>Pick</div><div>Browse.</div></div>
                </div>
                <h2>Second</h2>
                <div class="how-to-steps">
                    <div><div>only a name</div></div>
                </div>
            </div></main></body></html>"#,
        );

        assert!(matches!(decorate_how_to(&doc), Err(Error::Shape { .. })));
        assert!(!doc.select(".how-to-steps .number").exists());
        assert!(!doc.select(".how-to-steps .tip").exists());
        assert_eq!(doc.select(".how-to-steps > div > div").length(), 3);
        assert!(!doc.select(r#"head > script[type="application/ld+json"]"#).exists());
    }

    #[test]
    fn every_block_gets_its_own_schema() {
        let doc = dom::parse(
            r#"<html><head></head><body><main><div>
                <h2>First</h2>
                <div class="how-to-steps"><div><div>A</div><div>a.</div></div></div>
                <h2>Second</h2>
                <div class="how-to-steps"><div><div>B</div><div>b.</div></div></div>
            </div></main></body></html>"#,
        );

        assert_eq!(decorate_how_to(&doc).unwrap_or_else(|e| panic!("{e}")), 2);
        assert_eq!(doc.select(r#"head > script[type="application/ld+json"]"#).length(), 2);
        assert_eq!(doc.select(".how-to-steps .tip > h3").length(), 2);
    }
}
