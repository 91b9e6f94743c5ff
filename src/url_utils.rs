//! Page location and URL helpers.
//!
//! `PageLocation` stands in for `window.location`: decorators ask it for the
//! path, query flags, hash and locale of the page being decorated, and use it
//! to resolve authored links the way the browser resolves `a.href`.

use url::Url;

use crate::patterns::LOCALE_SEGMENT;
use crate::Result;

/// Locale used when the path carries none.
pub const DEFAULT_LOCALE: &str = "en-US";

/// The parsed URL of the page being decorated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    url: Url,
}

impl PageLocation {
    /// Parse an absolute page URL.
    pub fn parse(url: &str) -> Result<Self> {
        Ok(Self {
            url: Url::parse(url.trim())?,
        })
    }

    /// The underlying URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Path component, always starting with `/`.
    #[must_use]
    pub fn pathname(&self) -> &str {
        self.url.path()
    }

    /// Query string including the leading `?`, or empty.
    #[must_use]
    pub fn search(&self) -> String {
        match self.url.query() {
            Some(q) if !q.is_empty() => format!("?{q}"),
            _ => String::new(),
        }
    }

    /// Fragment including the leading `#`, or empty.
    #[must_use]
    pub fn hash(&self) -> String {
        match self.url.fragment() {
            Some(f) if !f.is_empty() => format!("#{f}"),
            _ => String::new(),
        }
    }

    /// Host with port, as `location.host` reports it.
    #[must_use]
    pub fn host(&self) -> String {
        match (self.url.host_str(), self.url.port()) {
            (Some(h), Some(p)) => format!("{h}:{p}"),
            (Some(h), None) => h.to_string(),
            _ => String::new(),
        }
    }

    /// First value of a query parameter.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    /// Locale taken from the first path segment, `en-US` if there is none.
    #[must_use]
    pub fn locale(&self) -> String {
        let first = self.pathname().split('/').nth(1).unwrap_or_default();
        if LOCALE_SEGMENT.is_match(first) {
            first.to_string()
        } else {
            DEFAULT_LOCALE.to_string()
        }
    }

    /// Resolve an authored link against the page, like `a.href` does.
    #[must_use]
    pub fn resolve(&self, href: &str) -> Option<Url> {
        self.url.join(href.trim()).ok()
    }

    /// Location of the blueprint for this page.
    ///
    /// The blueprint is the page's counterpart without its leading locale
    /// segment, served as plain HTML.
    #[must_use]
    pub fn blueprint_path(&self) -> String {
        let pathname = self.pathname();
        let rest = pathname
            .get(1..)
            .and_then(|p| p.find('/'))
            .map_or(pathname, |i| &pathname[i + 1..]);
        format!("{}.plain.html", path_stem(rest))
    }
}

/// The part of a path before its first `.`.
#[must_use]
pub fn path_stem(path: &str) -> &str {
    path.split('.').next().unwrap_or(path)
}

/// Drop one trailing `/`, if present.
#[must_use]
pub fn strip_trailing_slash(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}

/// Location of the plain-HTML rendition of a page path.
#[must_use]
pub fn plain_html_path(path: &str) -> String {
    format!("{}.plain.html", path.replacen(".html", "", 1))
}
