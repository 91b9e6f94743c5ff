//! Configuration options for page decoration.
//!
//! The `Options` struct carries everything the browser would otherwise
//! provide implicitly: the page location, the user agent, and the interactive
//! state (selected tutorial tags, page filter text) to render.

/// Configuration options for page decoration.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use express_decorate::Options;
///
/// let options = Options {
///     url: "https://www.adobe.com/de-DE/express/create/flyer".to_string(),
///     ab_seed: Some(7),
///     ..Options::default()
/// };
/// assert_eq!(options.production_host, "adobe.com");
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Full URL of the page being decorated, including query and hash.
    ///
    /// Default: `https://www.adobe.com/express/`
    pub url: String,

    /// User agent of the requesting client. Used for bot detection.
    ///
    /// Default: empty
    pub user_agent: String,

    /// Host substring a page must be served from for A/B tests to run.
    ///
    /// Default: `adobe.com`
    pub production_host: String,

    /// Seed for the A/B sampling RNG. `None` draws from OS entropy.
    ///
    /// Default: `None`
    pub ab_seed: Option<u64>,

    /// Root under which block stylesheets live (`{root}/{name}/{name}.css`).
    ///
    /// Default: `/express/blocks`
    pub block_root: String,

    /// Tutorial tags to render as selected.
    ///
    /// Default: empty (grouped-by-category listing)
    pub selected_tags: Vec<String>,

    /// Filter text for the migrated-pages listing.
    ///
    /// Default: empty (every page)
    pub page_filter: String,

    /// Delay before marketing scripts load when the query does not override it.
    ///
    /// Default: `2000`
    pub martech_delay_ms: u64,

    /// Location of the blog post index.
    ///
    /// Default: `/blog-index.json`
    pub blog_index: String,

    /// Location of the A/B test page list.
    ///
    /// Default: `/testing.json`
    pub testing_index: String,

    /// Location of the footer fragment.
    ///
    /// Default: `/lazy-footer.plain.html`
    pub footer_fragment: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            url: "https://www.adobe.com/express/".to_string(),
            user_agent: String::new(),
            production_host: "adobe.com".to_string(),
            ab_seed: None,
            block_root: "/express/blocks".to_string(),
            selected_tags: Vec::new(),
            page_filter: String::new(),
            martech_delay_ms: 2000,
            blog_index: "/blog-index.json".to_string(),
            testing_index: "/testing.json".to_string(),
            footer_fragment: "/lazy-footer.plain.html".to_string(),
        }
    }
}
