//! Per-page decoration state.
//!
//! A `PageSession` lives for the decoration of one document. It owns the
//! lazily populated index caches, the A/B sampling RNG and the report that
//! collects side effects; decorators receive it explicitly.

use std::cell::OnceCell;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::decorators::blog::BlogPost;
use crate::decorators::pages::PageEntry;
use crate::fetch::{self, Fetcher};
use crate::layout::Measurer;
use crate::result::DecorateReport;
use crate::url_utils::PageLocation;
use crate::{Error, Options, Result};

/// Fetched data shared by all decorators of one page.
///
/// Each slot is filled at most once. A failed fetch leaves its slot empty so
/// a later decorator may try again.
#[derive(Debug, Default)]
pub struct SessionCache {
    blog_index: OnceCell<Vec<BlogPost>>,
    full_index: OnceCell<Vec<PageEntry>>,
    blueprint: OnceCell<String>,
}

/// State of one page decoration.
pub struct PageSession<'a> {
    options: &'a Options,
    location: PageLocation,
    fetcher: &'a dyn Fetcher,
    measurer: Option<&'a dyn Measurer>,
    cache: SessionCache,
    rng: StdRng,
    /// Side effects and skipped enhancements collected so far.
    pub report: DecorateReport,
}

impl<'a> PageSession<'a> {
    /// Start a session for the page at `options.url`.
    pub fn new(options: &'a Options, fetcher: &'a dyn Fetcher) -> Result<Self> {
        let location = PageLocation::parse(&options.url)?;
        let rng = match options.ab_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            options,
            location,
            fetcher,
            measurer: None,
            cache: SessionCache::default(),
            rng,
            report: DecorateReport::default(),
        })
    }

    /// Measure headings with `measurer`.
    #[must_use]
    pub fn with_measurer(mut self, measurer: &'a dyn Measurer) -> Self {
        self.measurer = Some(measurer);
        self
    }

    #[must_use]
    pub fn options(&self) -> &'a Options {
        self.options
    }

    #[must_use]
    pub fn location(&self) -> &PageLocation {
        &self.location
    }

    #[must_use]
    pub fn fetcher(&self) -> &'a dyn Fetcher {
        self.fetcher
    }

    #[must_use]
    pub fn measurer(&self) -> Option<&'a dyn Measurer> {
        self.measurer
    }

    /// One uniform sample in `[0, 1)`.
    pub fn sample(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Record a skipped enhancement.
    pub fn warn(&mut self, pass: &str, err: &Error) {
        tracing::warn!(pass, error = %err, "enhancement skipped");
        self.report.warnings.push(format!("{pass}: {err}"));
    }

    /// Schedule marketing scripts after `delay`.
    pub fn schedule_martech(&mut self, delay: Duration) {
        self.report.martech_delay = Some(delay);
    }

    // === Cached resources ===

    /// The blog post index, fetched on first use.
    pub fn blog_index(&self) -> Result<&[BlogPost]> {
        if let Some(posts) = self.cache.blog_index.get() {
            return Ok(posts);
        }
        let posts: Vec<BlogPost> = fetch::fetch_index(self.fetcher, &self.options.blog_index)?;
        tracing::debug!(posts = posts.len(), "blog index loaded");
        Ok(self.cache.blog_index.get_or_init(|| posts))
    }

    /// The merged page index, fetched from `indices` on first use.
    ///
    /// Each index is sorted by path, ignoring case, and stripped of entries
    /// without one.
    pub fn full_index(&self, indices: &[String]) -> Result<&[PageEntry]> {
        if let Some(entries) = self.cache.full_index.get() {
            return Ok(entries);
        }
        let mut merged = Vec::new();
        for location in indices {
            let mut entries: Vec<PageEntry> = fetch::fetch_index(self.fetcher, location)?;
            tracing::debug!(location = %location, entries = entries.len(), "page index loaded");
            entries.sort_by_cached_key(|e| (e.path.to_lowercase(), e.path.clone()));
            merged.extend(entries.into_iter().filter(|e| !e.path.is_empty()));
        }
        Ok(self.cache.full_index.get_or_init(|| merged))
    }

    /// Plain HTML of this page's blueprint, fetched on first use.
    pub fn blueprint(&self) -> Result<&str> {
        if let Some(html) = self.cache.blueprint.get() {
            return Ok(html);
        }
        let path = self.location.blueprint_path();
        let html = self.fetcher.fetch_text(&path)?;
        tracing::debug!(path = %path, "blueprint loaded");
        Ok(self.cache.blueprint.get_or_init(|| html))
    }

    /// The blueprint, only if an earlier decorator already fetched it.
    #[must_use]
    pub fn cached_blueprint(&self) -> Option<&str> {
        self.cache.blueprint.get().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemoryFetcher;
    use std::cell::Cell;

    struct CountingFetcher {
        inner: MemoryFetcher,
        calls: Cell<usize>,
    }

    impl Fetcher for CountingFetcher {
        fn fetch_text(&self, location: &str) -> Result<String> {
            self.calls.set(self.calls.get() + 1);
            self.inner.fetch_text(location)
        }
    }

    #[test]
    fn blog_index_is_fetched_once() {
        let fetcher = CountingFetcher {
            inner: MemoryFetcher::new().with(
                "/blog-index.json",
                r#"{"data":[{"path":"a","title":"A","teaser":"t","image":"/i.png"}]}"#,
            ),
            calls: Cell::new(0),
        };
        let options = Options::default();
        let session = PageSession::new(&options, &fetcher).unwrap_or_else(|e| panic!("{e}"));

        assert_eq!(session.blog_index().map(<[BlogPost]>::len).ok(), Some(1));
        assert_eq!(session.blog_index().map(<[BlogPost]>::len).ok(), Some(1));
        assert_eq!(fetcher.calls.get(), 1);
    }

    #[test]
    fn failed_fetch_leaves_slot_empty() {
        let fetcher = MemoryFetcher::new();
        let options = Options::default();
        let session = PageSession::new(&options, &fetcher).unwrap_or_else(|e| panic!("{e}"));

        assert!(session.blueprint().is_err());
        assert!(session.cached_blueprint().is_none());
    }

    #[test]
    fn full_index_sorts_each_index_and_drops_pathless_entries() {
        let fetcher = MemoryFetcher::new()
            .with("/a.json", r#"{"data":[{"path":"z"},{"path":""},{"path":"b"}]}"#)
            .with("/b.json", r#"{"data":[{"path":"a"}]}"#);
        let options = Options::default();
        let session = PageSession::new(&options, &fetcher).unwrap_or_else(|e| panic!("{e}"));

        let indices = vec!["/a.json".to_string(), "/b.json".to_string()];
        let paths: Vec<String> = session
            .full_index(&indices)
            .map(|entries| entries.iter().map(|e| e.path.clone()).collect())
            .unwrap_or_default();
        assert_eq!(paths, vec!["b", "z", "a"]);
    }

    #[test]
    fn full_index_ignores_case_when_sorting() {
        let fetcher = MemoryFetcher::new().with(
            "/a.json",
            r#"{"data":[{"path":"/express/Zine"},{"path":"/express/banner"},{"path":"/express/Card"}]}"#,
        );
        let options = Options::default();
        let session = PageSession::new(&options, &fetcher).unwrap_or_else(|e| panic!("{e}"));

        let paths: Vec<String> = session
            .full_index(&["/a.json".to_string()])
            .map(|entries| entries.iter().map(|e| e.path.clone()).collect())
            .unwrap_or_default();
        assert_eq!(paths, vec!["/express/banner", "/express/Card", "/express/Zine"]);
    }

    #[test]
    fn seeded_sampling_is_repeatable() {
        let fetcher = MemoryFetcher::new();
        let options = Options {
            ab_seed: Some(42),
            ..Options::default()
        };
        let mut first = PageSession::new(&options, &fetcher).unwrap_or_else(|e| panic!("{e}"));
        let mut second = PageSession::new(&options, &fetcher).unwrap_or_else(|e| panic!("{e}"));

        let a: Vec<f64> = (0..5).map(|_| first.sample()).collect();
        let b: Vec<f64> = (0..5).map(|_| second.sample()).collect();
        assert_eq!(a, b);
        assert!(a.iter().all(|x| (0.0..1.0).contains(x)));
    }

    #[test]
    fn invalid_page_url_fails_the_session() {
        let fetcher = MemoryFetcher::new();
        let options = Options {
            url: "nope".to_string(),
            ..Options::default()
        };
        assert!(matches!(PageSession::new(&options, &fetcher), Err(Error::Url(_))));
    }
}
