use express_decorate::{decorate_bytes, DirectoryFetcher, MemoryFetcher, Options};

fn page(head: &str, title: &str) -> Vec<u8> {
    let mut html = Vec::new();
    html.extend_from_slice(b"<html><head>");
    html.extend_from_slice(head.as_bytes());
    html.extend_from_slice(b"</head><body><header></header><main><div><h1>");
    html.extend_from_slice(title.as_bytes());
    html.extend_from_slice(b"</h1></div></main><footer></footer></body></html>");
    html
}

#[test]
fn utf8_pages_keep_their_characters() {
    let html = page(r#"<meta charset="utf-8">"#, "Caf\u{e9} espa\u{f1}ol \u{4e2d}\u{6587}");
    let result = decorate_bytes(&html, &Options::default(), &MemoryFetcher::new()).expect("decoration failed");

    assert!(result.html.contains("Café español 中文"));
}

#[test]
fn iso88591_pages_are_transcoded() {
    let html = b"<html><head><meta charset=\"ISO-8859-1\"></head><body><main>\
        <div><h1>Caf\xE9 M\xFCnchen</h1></div></main></body></html>";
    let result = decorate_bytes(html, &Options::default(), &MemoryFetcher::new()).expect("decoration failed");

    assert!(result.html.contains("Café München"));
    assert!(result.html.contains("hero-noimage"));
}

#[test]
fn windows1252_smart_quotes_are_transcoded() {
    let html = b"<html><head><meta http-equiv=\"Content-Type\" content=\"text/html; charset=windows-1252\">\
        </head><body><main><div><h1>\x93Quoted\x94</h1></div></main></body></html>";
    let result = decorate_bytes(html, &Options::default(), &MemoryFetcher::new()).expect("decoration failed");

    assert!(result.html.contains("\u{201c}Quoted\u{201d}"));
}

#[test]
fn byte_order_mark_wins_over_declarations() {
    let mut html = vec![0xEF, 0xBB, 0xBF];
    html.extend(page(r#"<meta charset="ISO-8859-1">"#, "Caf\u{e9}"));
    let result = decorate_bytes(&html, &Options::default(), &MemoryFetcher::new()).expect("decoration failed");

    assert!(result.html.contains("Café"));
    assert!(!result.html.contains('\u{feff}'));
}

#[test]
fn fragments_from_disk_are_transcoded() {
    let root = tempfile::tempdir().expect("temp dir");
    std::fs::write(
        root.path().join("lazy-footer.plain.html"),
        b"<meta charset=\"ISO-8859-1\"><div><p>\xA9 Adobe</p></div>".as_slice(),
    )
    .expect("write footer");

    let html = page("", "Footer");
    let fetcher = DirectoryFetcher::new(root.path());
    let result = decorate_bytes(&html, &Options::default(), &fetcher).expect("decoration failed");

    assert!(result.html.contains("© Adobe"));
    assert!(result.report.warnings.is_empty(), "warnings: {:?}", result.report.warnings);
}
