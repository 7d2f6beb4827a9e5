// tests/feed_ingest.rs
use rfp_intelligence::ingest::{normalize_text, parse_feed, parse_published, FeedFile};
use rfp_intelligence::source_weights::apply_source_weighting;
use serde_json::json;

const RSS_XML: &str = include_str!("fixtures/tenders_rss.xml");

#[test]
fn rss_fixture_parses_linked_items() {
    let feed_url = "https://tenders.example.org/rss";
    let items = parse_feed(RSS_XML, feed_url).expect("rss parse ok");

    // six items, one without a link
    assert_eq!(items.len(), 5);
    assert!(items.iter().all(|e| e.source == feed_url));
    assert!(items.iter().all(|e| e.source_name == "Development Tenders"));
    assert_eq!(items[1].title, "Baseline survey - nutrition project");
    assert_eq!(items[2].published.as_deref(), Some("2026-02-20T10:00:00Z"));
}

#[test]
fn atom_fixture_parses_from_disk() {
    let xml = std::fs::read_to_string("tests/fixtures/grants_atom.xml").expect("fixture");
    let items = parse_feed(&xml, "https://grants.example.net/atom").expect("atom parse ok");
    assert_eq!(items.len(), 2);

    let first = &items[0];
    assert_eq!(first.title, "Monitoring & evaluation framework, Nepal");
    assert_eq!(first.link, "https://grants.example.net/opp/77");
    assert_eq!(
        normalize_text(&first.description),
        "Budget: 1.5 million USD over three years."
    );
    assert_eq!(first.source_name, "Grants Portal");
    assert!(items[1].published.is_none());
}

#[test]
fn every_fixture_date_resolves() {
    let items = parse_feed(RSS_XML, "x").unwrap();
    for it in &items {
        let raw = it.published.as_deref().expect("dated");
        assert!(parse_published(raw).is_some(), "unparsed date {raw}");
    }
}

#[test]
fn broken_xml_is_reported() {
    let err = parse_feed("<rss><channel><item>", "https://broken.example/rss").unwrap_err();
    assert!(format!("{err:#}").contains("https://broken.example/rss"));
}

#[test]
fn feed_url_argument_drives_domain_weights() {
    let weights = match json!({"sam.gov": 0.95, "default": 0.4}) {
        serde_json::Value::Object(m) => m,
        _ => unreachable!(),
    };

    let feed = FeedFile::parse("tests/fixtures/tenders_rss.xml=https://sam.gov/api/rss");
    let xml = std::fs::read_to_string(&feed.path).expect("fixture");
    let items = parse_feed(&xml, &feed.url).expect("rss parse ok");
    assert!(items.iter().all(|e| e.source == "https://sam.gov/api/rss"));
    assert_eq!(apply_source_weighting(&items[0].source, &weights), 0.95);

    // A bare path falls back to the default weight.
    let bare = FeedFile::parse("tests/fixtures/tenders_rss.xml");
    let items = parse_feed(&xml, &bare.url).expect("rss parse ok");
    assert_eq!(apply_source_weighting(&items[0].source, &weights), 0.4);
}
