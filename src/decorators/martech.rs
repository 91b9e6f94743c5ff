//! Deferred loading of marketing scripts.

use std::time::Duration;

use dom_query::Document;

use crate::session::PageSession;

/// Script whose presence means martech is already wired into the page.
pub const MARTECH_SCRIPT: &str = "/express/scripts/martech.js";

/// Delay before martech loads, or `None` when it must not load.
///
/// `?nomartech` turns it off, as does a page that already includes the
/// script. A `delay` query parameter overrides the default in milliseconds;
/// a value that is not a number means no delay.
#[must_use]
pub fn martech_delay(doc: &Document, session: &PageSession<'_>) -> Option<Duration> {
    let location = session.location();
    let included = doc.select(&format!(r#"head script[src="{MARTECH_SCRIPT}"]"#)).exists();
    if location.search() == "?nomartech" || included {
        return None;
    }
    let ms = match location.query_param("delay").filter(|d| !d.is_empty()) {
        Some(delay) => delay.trim().parse::<f64>().unwrap_or(0.0),
        None => session.options().martech_delay_ms as f64,
    };
    Some(Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::ZERO))
}

/// Record when martech should load.
pub fn schedule_martech(doc: &Document, session: &mut PageSession<'_>) {
    match martech_delay(doc, session) {
        Some(delay) => {
            tracing::debug!(delay_ms = delay.as_millis(), "martech scheduled");
            session.schedule_martech(delay);
        }
        None => tracing::debug!("martech disabled for this page"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;
    use crate::fetch::MemoryFetcher;
    use crate::Options;

    fn delay_for(url: &str, head: &str) -> Option<Duration> {
        let fetcher = MemoryFetcher::new();
        let options = Options {
            url: url.to_string(),
            ..Options::default()
        };
        let session = PageSession::new(&options, &fetcher).unwrap_or_else(|e| panic!("{e}"));
        let doc = dom::parse(&format!("<html><head>{head}</head><body></body></html>"));
        martech_delay(&doc, &session)
    }

    #[test]
    fn default_delay_is_two_seconds() {
        assert_eq!(delay_for("https://www.adobe.com/express/", ""), Some(Duration::from_secs(2)));
    }

    #[test]
    fn delay_parameter_overrides() {
        assert_eq!(
            delay_for("https://www.adobe.com/express/?delay=500", ""),
            Some(Duration::from_millis(500))
        );
        assert_eq!(delay_for("https://www.adobe.com/express/?delay=soon", ""), Some(Duration::ZERO));
    }

    #[test]
    fn martech_can_be_disabled() {
        assert_eq!(delay_for("https://www.adobe.com/express/?nomartech", ""), None);
        assert_eq!(
            delay_for(
                "https://www.adobe.com/express/",
                r#"<script src="/express/scripts/martech.js"></script>"#
            ),
            None
        );
    }
}
