//! Typed access to the block table convention.
//!
//! Authored blocks are nested-div tables: rows are the block's element
//! children and cells are the rows' element children. Decorators read them
//! through these helpers so a block with the wrong shape fails with a
//! descriptive [`Error::Shape`] before anything is mutated.

use std::collections::BTreeMap;

use dom_query::Selection;

use crate::dom;
use crate::patterns::to_class_name;
use crate::url_utils::PageLocation;
use crate::{Error, Result};

/// Key/value configuration authored as a two-column block.
pub type BlockConfig = BTreeMap<String, String>;

/// Rows of a block.
#[must_use]
pub fn rows<'a>(block: &Selection<'a>) -> Vec<Selection<'a>> {
    dom::element_children(block)
}

/// Cells of a row.
#[must_use]
pub fn cells<'a>(row: &Selection<'a>) -> Vec<Selection<'a>> {
    dom::element_children(row)
}

/// Cells of a row that must have at least `count` of them.
pub fn expect_cells<'a>(row: &Selection<'a>, count: usize, block: &str) -> Result<Vec<Selection<'a>>> {
    let cells = cells(row);
    if cells.len() < count {
        return Err(Error::shape(
            block,
            format!("rows with {count} cells, found a row with {}", cells.len()),
        ));
    }
    Ok(cells)
}

/// Block type name: the first class of the block element.
#[must_use]
pub fn block_name(block: &Selection) -> Option<String> {
    dom::class_list(block).into_iter().next()
}

/// Read a configuration block.
///
/// Every row with at least two cells contributes one entry. The key is the
/// first cell's text as a class name; the value is the first link of the
/// second cell resolved against the page, or else that cell's text.
#[must_use]
pub fn read_block_config(block: &Selection, location: &PageLocation) -> BlockConfig {
    let mut config = BlockConfig::new();
    for row in rows(block) {
        let cells = cells(&row);
        if cells.len() < 2 {
            continue;
        }
        let name = to_class_name(dom::text_content(&cells[0]).trim());
        let link = cells[1].select("a").first();
        let value = match dom::get_attribute(&link, "href") {
            Some(href) => location
                .resolve(&href)
                .map_or(href, |u| u.to_string()),
            None => dom::text_content(&cells[1]).trim().to_string(),
        };
        config.insert(name, value);
    }
    config
}
