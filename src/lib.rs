//! # express-decorate
//!
//! Progressive enhancement of Adobe Express marketing pages, performed on
//! the server.
//!
//! Authored pages arrive as semantically plain HTML: sections of divs,
//! "blocks" written as nested-div tables tagged with a class, and a few
//! conventions (a heading before a How-To, a table headed "A/B Test"). This
//! crate turns such a page into the decorated markup the site's stylesheets
//! expect: sections and hero, buttons, block classes and stylesheets, card
//! listings for blog posts, tutorials and migrated pages, schema.org
//! markup, and A/B variant selection.
//!
//! ## Quick Start
//!
//! ```rust
//! use express_decorate::{decorate, MemoryFetcher, Options};
//!
//! let html = r#"<html><head></head><body><header></header>
//! <main><div><h1>Make a flyer</h1></div></main><footer></footer></body></html>"#;
//!
//! let result = decorate(html, &Options::default(), &MemoryFetcher::new())?;
//! assert!(result.html.contains("hero-noimage"));
//! # Ok::<(), express_decorate::Error>(())
//! ```
//!
//! ## Inputs
//!
//! What a browser knows implicitly is passed in explicitly:
//!
//! - **Location and client**: [`Options::url`] and [`Options::user_agent`]
//! - **Fetched resources**: a [`Fetcher`] (content checkout on disk, or
//!   in-memory fixtures)
//! - **Rendered sizes**: an optional [`Measurer`] for heading scaling
//! - **Randomness**: [`Options::ab_seed`] makes A/B sampling repeatable
//!
//! Side effects a browser would perform later (navigation, delayed script
//! loads) and skipped enhancements are collected in a [`DecorateReport`].

mod error;
mod options;
mod result;

/// DOM operations adapter providing browser-DOM-style operations.
pub mod dom;

/// Compiled regex patterns and `parseFloat`-style text parsing.
pub mod patterns;

/// Page location, locale and path helpers.
pub mod url_utils;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Fetching of index JSON and plain-HTML fragments.
pub mod fetch;

/// Heading metrics and scaling.
pub mod layout;

/// Per-page state: caches, A/B sampling and the report.
pub mod session;

/// Block table parsing, registry, loader and block decorators.
pub mod blocks;

/// Page-level decoration passes.
pub mod decorators;

/// The decoration pipeline.
pub mod page;

// Public API - re-exports
pub use blocks::{BlockDecorator, BlockRegistry};
pub use error::{Error, Result};
pub use fetch::{DirectoryFetcher, Fetcher, MemoryFetcher};
pub use layout::{HeadingLevel, HeadingMetrics, Measurer};
pub use options::Options;
pub use page::PageDecorator;
pub use result::{DecorateReport, DecorateResult};

/// Decorates a page with the built-in block handlers.
///
/// # Arguments
///
/// * `html` - The authored page
/// * `options` - Page location, client and rendering state
/// * `fetcher` - Source of indexes and plain-HTML fragments
///
/// # Returns
///
/// The decorated document and a report of side effects and skipped
/// enhancements. Fails only when `options.url` is not a valid URL.
pub fn decorate(html: &str, options: &Options, fetcher: &dyn Fetcher) -> Result<DecorateResult> {
    PageDecorator::new(options.clone()).decorate(html, fetcher)
}

/// Decorates a page given as raw bytes, detecting its character encoding.
///
/// The encoding is taken from a byte order mark or a `<meta>` charset
/// declaration, defaulting to UTF-8.
///
/// # Example
///
/// ```rust
/// use express_decorate::{decorate_bytes, MemoryFetcher, Options};
///
/// let html = b"<html><head><meta charset=\"ISO-8859-1\"></head><body><main><div><h1>Caf\xE9</h1></div></main></body></html>";
/// let result = decorate_bytes(html, &Options::default(), &MemoryFetcher::new())?;
/// assert!(result.html.contains("Café"));
/// # Ok::<(), express_decorate::Error>(())
/// ```
pub fn decorate_bytes(html: &[u8], options: &Options, fetcher: &dyn Fetcher) -> Result<DecorateResult> {
    decorate(&encoding::decode_html(html), options, fetcher)
}
