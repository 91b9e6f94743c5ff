//! Hero promotion, localized template lists and hero image inheritance.

use dom_query::Document;

use crate::dom;
use crate::session::PageSession;
use crate::url_utils::DEFAULT_LOCALE;
use crate::{Error, Result};

/// Promote the page's first `h1` (and the picture next to it) to the hero.
///
/// A page whose `main` holds a single section gets a new hero section in
/// front; otherwise the section holding the `h1` becomes the hero.
pub fn decorate_hero(doc: &Document) -> Result<()> {
    let main = doc.select("main").first();
    if !main.exists() {
        return Err(Error::shape("hero", "a <main> element"));
    }
    let h1 = main.select("h1").first();
    if !h1.exists() {
        return Err(Error::shape("hero", "an <h1> inside <main>"));
    }
    let picture = h1.parent().select("picture").first();
    let has_picture = picture.exists();
    let single_section = dom::element_children(&main).len() == 1;
    let existing_section = if single_section {
        None
    } else {
        Some(
            dom::closest_with_class(&h1, "section-wrapper")
                .ok_or_else(|| Error::shape("hero", "the <h1> inside a .section-wrapper"))?,
        )
    };

    if has_picture {
        dom::add_classes(&picture, &["hero-bg"]);
    }
    let image_class = if has_picture { None } else { Some("hero-noimage") };

    match existing_section {
        Some(section) => {
            dom::add_classes(&section, &["hero"]);
            if let Some(class) = image_class {
                dom::add_classes(&section, &[class]);
            }
        }
        None => {
            let picture_html = if has_picture { dom::outer_html(&picture).to_string() } else { String::new() };
            let h1_html = dom::outer_html(&h1).to_string();
            dom::remove(&picture);
            dom::remove(&h1);
            let class = match image_class {
                Some(c) => format!("section-wrapper hero {c}"),
                None => "section-wrapper hero".to_string(),
            };
            let inner = dom::create_tag("div", &[], &format!("{picture_html}{h1_html}"));
            dom::prepend_html(&main, &dom::create_tag("div", &[("class", &class)], &inner));
        }
    }
    tracing::debug!(has_picture, single_section, "hero decorated");
    Ok(())
}

/// Fill empty template lists of localized pages from the blueprint.
///
/// The i-th empty `.template-list` takes the content of the blueprint's i-th
/// `.template-list`. Pages in the default locale are left alone.
pub fn decorate_template_lists(doc: &Document, session: &PageSession<'_>) -> Result<()> {
    let lists = dom::query_selector_all(&doc.select("html"), "main .template-list");
    let locale = session.location().locale();
    if locale == DEFAULT_LOCALE {
        return Ok(());
    }

    let mut blueprint: Option<Document> = None;
    for (i, list) in lists.iter().enumerate() {
        if !dom::element_children(list).is_empty() {
            continue;
        }
        if blueprint.is_none() {
            blueprint = Some(dom::parse(session.blueprint()?));
        }
        let Some(bp) = blueprint.as_ref() else {
            continue;
        };
        let source = dom::query_selector_all(&bp.select("html"), ".template-list");
        let Some(source) = source.get(i) else {
            return Err(Error::shape(
                "template-list",
                format!("at least {} template lists in the blueprint", i + 1),
            ));
        };
        dom::set_inner_html(list, &dom::inner_html(source));
        tracing::debug!(index = i, locale = %locale, "template list filled from blueprint");
    }
    Ok(())
}

/// Give an imageless hero the blueprint's first image.
///
/// Only applies when an earlier pass already fetched the blueprint.
pub fn inherit_hero_image(doc: &Document, session: &PageSession<'_>) -> Result<()> {
    if doc.select(".hero-bg").exists() {
        return Ok(());
    }
    let Some(blueprint) = session.cached_blueprint() else {
        return Ok(());
    };
    let bp = dom::parse(blueprint);
    let image = bp.select("div:first-of-type img").first();
    if !image.exists() {
        return Ok(());
    }
    let hero_div = doc.select("main .hero > div").first();
    if !hero_div.exists() {
        return Err(Error::shape("hero", "a main .hero > div to place the inherited image in"));
    }

    let picture = dom::create_tag("picture", &[("class", "hero-bg")], &dom::outer_html(&image));
    doc.select("main .hero").first().remove_class("hero-noimage");
    dom::prepend_html(&hero_div, &dom::create_tag("p", &[], &picture));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemoryFetcher;
    use crate::Options;

    #[test]
    fn single_section_pages_get_a_new_hero() {
        let doc = dom::parse(
            r#"<main><div class="section-wrapper"><div><p><picture><img src="/h.jpg"></picture></p><h1>Make it</h1><p>more</p></div></div></main>"#,
        );
        decorate_hero(&doc).unwrap_or_else(|e| panic!("{e}"));

        let hero = doc.select("main > div.section-wrapper.hero");
        assert!(hero.exists());
        assert!(hero.select("div > picture.hero-bg").exists());
        assert!(hero.select("div > h1").exists());
        assert_eq!(doc.select("main > div").length(), 2);
        assert!(!hero.has_class("hero-noimage"));
    }

    #[test]
    fn multi_section_pages_mark_the_h1_section() {
        let doc = dom::parse(
            r#"<main><div class="section-wrapper"><div><h1>Title</h1></div></div><div class="section-wrapper"><div>rest</div></div></main>"#,
        );
        decorate_hero(&doc).unwrap_or_else(|e| panic!("{e}"));

        let hero = doc.select("main .hero");
        assert_eq!(hero.length(), 1);
        assert!(hero.has_class("hero-noimage"));
    }

    #[test]
    fn missing_h1_is_reported() {
        let doc = dom::parse("<main><div><p>no heading</p></div></main>");
        assert!(matches!(decorate_hero(&doc), Err(Error::Shape { .. })));
        assert!(!doc.select(".hero").exists());
    }

    fn localized_session<'a>(options: &'a Options, fetcher: &'a MemoryFetcher) -> PageSession<'a> {
        PageSession::new(options, fetcher).unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn template_lists_fall_back_to_the_blueprint() {
        let fetcher = MemoryFetcher::new().with(
            "/express/create/flyer.plain.html",
            r#"<div><p><picture><img src="/bp-hero.jpg"></picture></p></div>
               <div><div class="template-list"><div><div>one</div></div></div>
               <div class="template-list"><div><div>two</div></div></div></div>"#,
        );
        let options = Options {
            url: "https://www.adobe.com/de-DE/express/create/flyer".to_string(),
            ..Options::default()
        };
        let session = localized_session(&options, &fetcher);
        let doc = dom::parse(
            r#"<main><div class="section-wrapper hero hero-noimage"><div><h1>Flyer</h1></div></div>
               <div><div class="template-list"><div><div>authored</div></div></div>
               <div class="template-list"></div></div></main>"#,
        );

        decorate_template_lists(&doc, &session).unwrap_or_else(|e| panic!("{e}"));
        let lists = dom::query_selector_all(&doc.select("main"), ".template-list");
        assert_eq!(dom::text_content(&lists[0]).trim(), "authored");
        assert_eq!(dom::text_content(&lists[1]).trim(), "two");

        inherit_hero_image(&doc, &session).unwrap_or_else(|e| panic!("{e}"));
        let hero = doc.select("main .hero");
        assert!(!hero.has_class("hero-noimage"));
        assert_eq!(
            dom::get_attribute(&hero.select("p > picture.hero-bg > img"), "src").as_deref(),
            Some("/bp-hero.jpg")
        );
    }

    #[test]
    fn default_locale_never_fetches_the_blueprint() {
        let fetcher = MemoryFetcher::new();
        let options = Options::default();
        let session = localized_session(&options, &fetcher);
        let doc = dom::parse(r#"<main><div class="template-list"></div></main>"#);

        assert!(decorate_template_lists(&doc, &session).is_ok());
        assert!(session.cached_blueprint().is_none());
        assert!(inherit_hero_image(&doc, &session).is_ok());
    }
}
