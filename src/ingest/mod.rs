// src/ingest/mod.rs
//! Feed-side collaborator: turns feed documents into `RawEntry` records and
//! provides the text/date normalization every later stage relies on.

pub mod rss;

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use time::{format_description::well_known::Rfc2822, OffsetDateTime};
use url::Url;

pub use crate::ingest::rss::parse_feed;

static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// A local feed file plus the URL it was downloaded from.
///
/// Parsed from `path=url`; the URL becomes every entry's `source`, so
/// domain rules in `source_weights` apply. Without a URL the path is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedFile {
    pub path: PathBuf,
    pub url: String,
}

impl FeedFile {
    pub fn parse(arg: &str) -> Self {
        if let Some((path, url)) = arg.split_once('=') {
            let is_web_url = Url::parse(url)
                .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
                .unwrap_or(false);
            if is_web_url && !path.is_empty() {
                return Self {
                    path: PathBuf::from(path),
                    url: url.to_string(),
                };
            }
        }
        Self {
            path: PathBuf::from(arg),
            url: arg.to_string(),
        }
    }
}

/// Decode entities, strip tags, normalize curly quotes and collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let out = html_escape::decode_html_entities(s);

    // 2) Strip HTML tags (a tag separates words)
    let out = RE_TAGS.replace_all(&out, " ");

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    let out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    RE_WS.replace_all(&out, " ").trim().to_string()
}

/// Resolve a raw feed date to UTC.
///
/// Accepts RFC 3339, RFC 2822, `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS`
/// (taken as UTC) and bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = parse_rfc2822(s) {
        return Some(dt);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_rfc2822(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(odt) = OffsetDateTime::parse(s, &Rfc2822) {
        return DateTime::from_timestamp(odt.unix_timestamp(), odt.nanosecond());
    }
    // Named US zones (EST, PDT, ...) that `time` rejects.
    DateTime::parse_from_rfc2822(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn normalize_text_strips_markup_and_collapses_ws() {
        let s = "  <p>Hello,&nbsp;&nbsp; <b>world</b>!</p>  ";
        assert_eq!(normalize_text(s), "Hello, world !");
        assert_eq!(normalize_text("<li>Kenya</li><li>Ghana</li>"), "Kenya Ghana");
    }

    #[test]
    fn normalize_text_quotes() {
        assert_eq!(normalize_text("\u{201C}Terms\u{201D} and \u{2018}x\u{2019}"), "\"Terms\" and 'x'");
    }

    #[test]
    fn parses_supported_date_forms() {
        let expected = Utc.with_ymd_and_hms(2026, 2, 3, 14, 5, 0).unwrap();
        assert_eq!(parse_published("2026-02-03T14:05:00Z"), Some(expected));
        assert_eq!(parse_published("2026-02-03T15:05:00+01:00"), Some(expected));
        assert_eq!(parse_published("Tue, 03 Feb 2026 14:05:00 GMT"), Some(expected));
        assert_eq!(parse_published("Tue, 03 Feb 2026 09:05:00 -0500"), Some(expected));
        assert_eq!(parse_published("Tue, 03 Feb 2026 09:05:00 EST"), Some(expected));
        assert_eq!(parse_published("2026-02-03 14:05:00"), Some(expected));
        assert_eq!(
            parse_published("2026-02-03"),
            Some(Utc.with_ymd_and_hms(2026, 2, 3, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn feed_file_argument_forms() {
        let f = FeedFile::parse("feeds/sam.xml=https://sam.gov/api/rss");
        assert_eq!(f.path, PathBuf::from("feeds/sam.xml"));
        assert_eq!(f.url, "https://sam.gov/api/rss");

        let f = FeedFile::parse("feeds/local.xml");
        assert_eq!(f.path, PathBuf::from("feeds/local.xml"));
        assert_eq!(f.url, "feeds/local.xml");

        // `=` that is not followed by a web URL stays part of the path.
        let f = FeedFile::parse("feeds/a=b.xml");
        assert_eq!(f.path, PathBuf::from("feeds/a=b.xml"));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_published(""), None);
        assert_eq!(parse_published("not a date"), None);
        assert_eq!(parse_published("2026-13-45"), None);
    }
}
