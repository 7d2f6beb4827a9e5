// src/ingest/rss.rs
//! RSS 2.0 / Atom documents → `RawEntry`.

use anyhow::{Context, Result};
use quick_xml::de::from_str;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::entry::RawEntry;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(default)]
    title: Option<String>,
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "pubDate", default)]
    pub_date: Option<String>,
    #[serde(rename = "date", alias = "dc:date", default)]
    dc_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(default)]
    title: Option<AtomText>,
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    #[serde(default)]
    title: Option<AtomText>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    #[serde(default)]
    summary: Option<AtomText>,
    #[serde(default)]
    content: Option<AtomText>,
    #[serde(default)]
    published: Option<String>,
    #[serde(default)]
    updated: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomText {
    #[serde(rename = "$text", default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href", default)]
    href: Option<String>,
    #[serde(rename = "@rel", default)]
    rel: Option<String>,
}

impl AtomEntry {
    /// `rel="alternate"` (or no rel) wins over other link kinds.
    fn best_link(&self) -> Option<String> {
        let alternate = self
            .links
            .iter()
            .find(|l| l.rel.as_deref().map_or(true, |r| r == "alternate"));
        alternate
            .or_else(|| self.links.first())
            .and_then(|l| l.href.clone())
    }
}

/// Parse an RSS 2.0 or Atom document.
///
/// `source` of every entry is `feed_url`; `source_name` is the channel/feed title
/// (falling back to `feed_url`). Entries without a link are skipped.
pub fn parse_feed(xml: &str, feed_url: &str) -> Result<Vec<RawEntry>> {
    let xml = scrub_html_entities_for_xml(xml);

    let entries = if is_atom(&xml) {
        let atom: AtomFeed =
            from_str(&xml).with_context(|| format!("parsing atom feed {feed_url}"))?;
        from_atom(atom, feed_url)
    } else {
        let rss: Rss = from_str(&xml).with_context(|| format!("parsing rss feed {feed_url}"))?;
        from_rss(rss, feed_url)
    };

    debug!(target: "ingest", feed = feed_url, entries = entries.len(), "feed parsed");
    Ok(entries)
}

fn from_rss(rss: Rss, feed_url: &str) -> Vec<RawEntry> {
    let source_name = non_empty(rss.channel.title).unwrap_or_else(|| feed_url.to_string());
    let mut out = Vec::with_capacity(rss.channel.items.len());
    for it in rss.channel.items {
        let Some(link) = non_empty(it.link) else {
            warn!(target: "ingest", feed = feed_url, "skipping item without link");
            continue;
        };
        out.push(RawEntry {
            title: it.title.unwrap_or_default().trim().to_string(),
            link,
            description: it.description.unwrap_or_default(),
            published: non_empty(it.pub_date).or_else(|| non_empty(it.dc_date)),
            source: feed_url.to_string(),
            source_name: source_name.clone(),
        });
    }
    out
}

fn from_atom(feed: AtomFeed, feed_url: &str) -> Vec<RawEntry> {
    let source_name =
        non_empty(feed.title.map(|t| t.value)).unwrap_or_else(|| feed_url.to_string());
    let mut out = Vec::with_capacity(feed.entries.len());
    for e in feed.entries {
        let Some(link) = non_empty(e.best_link()) else {
            warn!(target: "ingest", feed = feed_url, "skipping entry without link");
            continue;
        };
        let description = e
            .summary
            .or(e.content)
            .map(|t| t.value)
            .unwrap_or_default();
        out.push(RawEntry {
            title: e.title.map(|t| t.value).unwrap_or_default().trim().to_string(),
            link,
            description,
            published: non_empty(e.published).or_else(|| non_empty(e.updated)),
            source: feed_url.to_string(),
            source_name: source_name.clone(),
        });
    }
    out
}

/// Atom documents have a `<feed>` root; everything else is treated as RSS.
fn is_atom(xml: &str) -> bool {
    xml.match_indices('<')
        .map(|(i, _)| &xml[i + 1..])
        .find(|rest| !rest.starts_with('?') && !rest.starts_with('!'))
        .is_some_and(|root| root.starts_with("feed"))
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// HTML entities that are not valid XML; feeds routinely ship them unescaped.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&hellip;", "...")
        .replace("&euro;", "€")
}
