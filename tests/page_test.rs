use std::fs;
use std::time::Duration;

use express_decorate::dom::Document;
use express_decorate::{decorate, decorate_bytes, DirectoryFetcher, MemoryFetcher, Options};

const LANDING: &str = r#"<html><head>
    <title>Draft</title>
    <meta property="og:title" content="draft">
    <meta property="twitter:title" content="draft">
    <meta name="description" content="draft">
</head><body>
<header><p>Adobe Express</p><p><a href="/signin">Sign in</a></p></header>
<main>
    <div><h1>Make a flyer</h1><p><a href="/express/create">Start now</a></p></div>
    <div>
        <h2>How to make a flyer</h2>
        <div class="how-to-steps">
            <div><div>Pick a template</div><div>Browse the gallery.</div></div>
            <div><div>Customize</div><div>Add your text.</div></div>
        </div>
        <div class="template-list"></div>
    </div>
    <div>
        <div class="blog-posts">
            <div><div>Category</div><div>Design</div></div>
        </div>
        <div class="filter-pages">
            <div><div>Indices</div><div>/express/query-index.json</div></div>
        </div>
        <div class="metadata">
            <div><div>Title</div><div>Flyer maker</div></div>
            <div><div>Description</div><div>Make flyers fast.</div></div>
        </div>
    </div>
</main>
<footer></footer>
</body></html>"#;

const BLOG_INDEX: &str = r#"{"data":[
    {"path":"express/learn/blog/flyers","title":"Flyers that pop","teaser":"Tips & tricks","image":"/media/flyer.png","category":"Design Tips"},
    {"path":"express/learn/blog/logos","title":"Logo ideas","teaser":"Brand it","image":"/media/logo.png","category":"Branding"}
]}"#;

const QUERY_INDEX: &str = r#"{"data":[
    {"path":"/express/create/poster.html","title":"Poster","image":"/media/poster.png"},
    {"path":"","title":"No path"},
    {"path":"/express/create/flyer.html","title":"Flyer","image":"/media/flyer.png"}
]}"#;

const BLUEPRINT: &str = r#"<div><p><picture><img src="/media/blueprint-hero.png"></picture></p><h1>Make a flyer</h1></div>
<div><div class="template-list"><div><div>Template A</div></div></div></div>"#;

const FOOTER: &str = r#"<div><h2>Adobe Express</h2><p><a href="https://spark.adobe.com/about/">About</a></p><p>More links</p></div>
<div><p>Products</p></div>
<div><p>Legal</p></div>"#;

fn site() -> MemoryFetcher {
    MemoryFetcher::new()
        .with("/blog-index.json", BLOG_INDEX)
        .with("/express/query-index.json", QUERY_INDEX)
        .with("/express/create/flyer.plain.html", BLUEPRINT)
        .with("/lazy-footer.plain.html", FOOTER)
}

fn localized() -> Options {
    Options {
        url: "https://www.adobe.com/de-DE/express/create/flyer?delay=500".to_string(),
        ab_seed: Some(3),
        ..Options::default()
    }
}

#[test]
fn landing_page_is_fully_decorated() {
    let result = decorate(LANDING, &localized(), &site()).expect("decoration failed");
    assert!(result.report.warnings.is_empty(), "warnings: {:?}", result.report.warnings);
    let doc = Document::from(result.html.as_str());

    // sections, header, hero, buttons
    assert_eq!(doc.select("main > div.section-wrapper").length(), 3);
    assert!(doc.select("header p.susi a.button").exists());
    assert!(doc.select("main > .section-wrapper.hero h1").exists());
    assert!(doc.select(r#"main a.button.secondary[href="/express/create"]"#).exists());
    assert!(!doc.select("body.blog-page").exists());

    // the localized hero inherits the blueprint image and template list
    assert!(doc.select("main .hero picture.hero-bg img").exists());
    assert!(!doc.select("main .hero-noimage").exists());
    assert_eq!(doc.select("main .template-list").text().trim(), "Template A");

    // how-to
    assert_eq!(doc.select(".how-to-steps .number span").length(), 2);
    let schema = doc.select(r#"head script[type="application/ld+json"]"#).text().to_string();
    let schema: serde_json::Value = serde_json::from_str(&schema).expect("valid json-ld");
    assert_eq!(schema["@type"], "HowTo");
    assert_eq!(schema["name"], "How to make a flyer");
    assert_eq!(schema["step"][1]["name"], "Customize");

    // blog posts
    let cards: Vec<String> = doc
        .select(".blog-posts .card h3")
        .iter()
        .map(|h| h.text().to_string())
        .collect();
    assert_eq!(cards, vec!["Flyers that pop"]);
    assert!(doc.select(r#".blog-posts .card[data-href="/express/learn/blog/flyers"]"#).exists());

    // migrated pages
    assert_eq!(doc.select("#page-filter-stats").text().trim(), "2 pages found");
    assert_eq!(doc.select("#page-filter-results .card").length(), 2);

    // metadata
    assert_eq!(doc.select("head title").text().trim(), "Flyer maker");
    assert!(doc.select(r#"head meta[property="og:title"][content="Flyer maker"]"#).exists());
    assert!(doc.select(r#"head meta[property="twitter:title"][content="Flyer maker"]"#).exists());
    assert!(doc.select(r#"head meta[name="description"][content="Make flyers fast."]"#).exists());
    assert!(!doc.select("main .metadata").exists());

    // footer
    assert!(doc.select("footer .section-wrapper.dark .hidden").exists());
    assert!(doc.select(r#"footer a[href="/about"]"#).exists());

    // deferred side effects
    assert_eq!(result.report.martech_delay, Some(Duration::from_millis(500)));
    assert!(result.report.ab_variant.is_none());
    assert!(result.report.unhandled_blocks.contains(&"blog-posts".to_string()));
}

#[test]
fn missing_resources_only_skip_their_enhancements() {
    let result = decorate(LANDING, &localized(), &MemoryFetcher::new()).expect("decoration failed");
    let doc = Document::from(result.html.as_str());

    let warned = |pass: &str| result.report.warnings.iter().any(|w| w.starts_with(pass));
    assert!(warned("blog posts"));
    assert!(warned("migrated pages"));
    assert!(warned("lazy footer"));
    assert!(warned("template lists"));

    assert!(doc.select("main .hero-noimage").exists());
    assert_eq!(doc.select(".how-to-steps .number").length(), 2);
    assert_eq!(doc.select("head title").text().trim(), "Flyer maker");
}

#[test]
fn nomartech_disables_marketing_scripts() {
    let options = Options {
        url: "https://www.adobe.com/express/?nomartech".to_string(),
        ..Options::default()
    };
    let result = decorate(LANDING, &options, &site()).expect("decoration failed");
    assert!(result.report.martech_delay.is_none());
}

#[test]
fn blog_articles_get_a_byline() {
    let html = r#"<html><head></head><body><header></header><main>
        <div><h1>Flyers that pop</h1></div>
        <div>
            <p>By Ann Author</p>
            <p>Posted on 05-21-2021</p>
            <p>Read the <a href="https://blog.adobespark.com/2020/old-post">old post</a>.</p>
        </div>
    </main><footer></footer></body></html>"#;
    let options = Options {
        url: "https://www.adobe.com/express/learn/blog/2021/flyers".to_string(),
        ..Options::default()
    };
    let result = decorate(html, &options, &MemoryFetcher::new()).expect("decoration failed");
    let doc = Document::from(result.html.as_str());

    assert!(doc.select("body.blog-page").exists());
    let byline = doc.select("span.byline").text().to_string();
    assert_eq!(byline.trim(), "Ann Author | May 21, 2021");
    assert!(!result.html.contains("Posted on"));
    assert!(doc.select(r#"a[href="/2020/old-post"]"#).exists());
}

#[test]
fn pages_decorate_from_a_content_directory() {
    let root = tempfile::tempdir().expect("temp dir");
    fs::write(root.path().join("blog-index.json"), BLOG_INDEX).expect("write index");
    fs::write(root.path().join("lazy-footer.plain.html"), FOOTER).expect("write footer");
    let express = root.path().join("express");
    fs::create_dir_all(express.join("create")).expect("create dirs");
    fs::write(express.join("query-index.json"), QUERY_INDEX).expect("write query index");
    fs::write(express.join("create/flyer.plain.html"), BLUEPRINT).expect("write blueprint");

    let page_path = root.path().join("page.html");
    fs::write(&page_path, LANDING).expect("write page");
    let bytes = fs::read(&page_path).expect("read page");

    let fetcher = DirectoryFetcher::new(root.path());
    let from_disk = decorate_bytes(&bytes, &localized(), &fetcher).expect("decoration failed");
    let from_memory = decorate(LANDING, &localized(), &site()).expect("decoration failed");

    assert_eq!(from_disk.html, from_memory.html);
    assert_eq!(from_disk.report, from_memory.report);
}

#[test]
fn directory_fetcher_refuses_to_leave_its_root() {
    use express_decorate::{Error, Fetcher};

    let root = tempfile::tempdir().expect("temp dir");
    let fetcher = DirectoryFetcher::new(root.path());
    assert!(matches!(fetcher.fetch_text("/../etc/passwd"), Err(Error::Fetch { .. })));
    assert!(matches!(
        fetcher.fetch_text("/missing.json"),
        Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound
    ));
}
