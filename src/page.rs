//! Page decoration pipeline.
//!
//! Runs the enhancement passes over a document in the order the site's
//! page script applies them:
//!
//! 1. A/B testing (may replace `main` before anything else sees it)
//! 2. section wrapping, header, hero
//! 3. post-LCP setup: lazy stylesheet, block preparation
//! 4. page template, buttons, How-To, migrated pages, blog page, tutorials,
//!    metadata, do-more embeds
//! 5. deferred post-LCP work: block handlers, lazy footer, martech, blog
//!    posts, template lists and hero image inheritance
//!
//! Every pass is best-effort. A failing pass is logged and recorded in the
//! report, and the remaining passes still run.

use dom_query::Document;

use crate::blocks::{loader, BlockRegistry};
use crate::decorators::{blog, footer, hero, howto, martech, metadata, pages, sections, testing, tutorials};
use crate::fetch::Fetcher;
use crate::layout::Measurer;
use crate::session::PageSession;
use crate::{DecorateResult, Options, Result};

/// Stylesheet linked once the hero is on screen.
pub const LAZY_STYLES: &str = "/express/styles/lazy-styles.css";

/// Decorates pages with a fixed set of options and block handlers.
#[derive(Debug, Default)]
pub struct PageDecorator {
    options: Options,
    registry: BlockRegistry,
}

impl PageDecorator {
    /// A decorator with the built-in block handlers.
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self {
            options,
            registry: BlockRegistry::with_defaults(),
        }
    }

    /// Use `registry` for block dispatch.
    #[must_use]
    pub fn with_registry(mut self, registry: BlockRegistry) -> Self {
        self.registry = registry;
        self
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    #[must_use]
    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// Decorate one page.
    ///
    /// Fails only when `options.url` is not a valid URL; problems inside
    /// passes end up in the report.
    pub fn decorate(&self, html: &str, fetcher: &dyn Fetcher) -> Result<DecorateResult> {
        let session = PageSession::new(&self.options, fetcher)?;
        Ok(self.run(html, session))
    }

    /// Decorate one page, measuring headings with `measurer`.
    pub fn decorate_with_measurer(
        &self,
        html: &str,
        fetcher: &dyn Fetcher,
        measurer: &dyn Measurer,
    ) -> Result<DecorateResult> {
        let session = PageSession::new(&self.options, fetcher)?.with_measurer(measurer);
        Ok(self.run(html, session))
    }

    fn run(&self, html: &str, mut session: PageSession<'_>) -> DecorateResult {
        let doc = Document::from(html);
        tracing::debug!(url = %session.location().url(), "decorating page");

        run_pass(&mut session, "testing", |s| testing::decorate_testing(&doc, s));
        sections::wrap_sections(&doc, "main > div");
        run_pass(&mut session, "header", |_| sections::decorate_header(&doc));
        run_pass(&mut session, "hero", |_| hero::decorate_hero(&doc));

        loader::load_css(&doc, LAZY_STYLES);
        let prepared = loader::prepare_blocks(&doc, &self.registry, &session);
        tracing::debug!(blocks = prepared, "blocks prepared");

        sections::decorate_template(&doc, session.location());
        sections::decorate_buttons(&doc);
        run_pass(&mut session, "how-to", |_| howto::decorate_how_to(&doc).map(drop));
        run_pass(&mut session, "migrated pages", |s| pages::decorate_migrated_pages(&doc, s));
        run_pass(&mut session, "blog page", |_| blog::decorate_blog_page(&doc));
        run_pass(&mut session, "tutorials", |s| tutorials::decorate_tutorials(&doc, s));
        metadata::decorate_metadata(&doc, session.location());
        sections::decorate_do_more_embed(&doc);

        loader::run_blocks(&doc, &self.registry, &mut session);
        run_pass(&mut session, "lazy footer", |s| footer::load_lazy_footer(&doc, s));
        martech::schedule_martech(&doc, &mut session);
        run_pass(&mut session, "blog posts", |s| blog::decorate_blog_posts(&doc, s));
        run_pass(&mut session, "template lists", |s| hero::decorate_template_lists(&doc, s));
        run_pass(&mut session, "hero image", |s| hero::inherit_hero_image(&doc, s));

        DecorateResult {
            html: doc.html().to_string(),
            report: session.report,
        }
    }
}

fn run_pass<'a>(
    session: &mut PageSession<'a>,
    name: &str,
    pass: impl FnOnce(&mut PageSession<'a>) -> Result<()>,
) {
    tracing::debug!(pass = name, "running pass");
    if let Err(err) = pass(session) {
        session.warn(name, &err);
    }
}
