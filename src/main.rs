//! Command-line entrypoint: score local feed files and print the ranked JSON report.
//!
//! Usage: `rfp-intelligence <feed.xml[=https://feed/url]>...`
//! The optional URL is recorded as each entry's source; without it the file path is used.
//! Config comes from `$RFP_CONFIG_PATH` or `config/rfp.{toml,yml,json}`.

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rfp_intelligence::ingest::{self, FeedFile};
use rfp_intelligence::{pipeline, Config, RawEntry};

/// Logs go to stderr so stdout stays a clean JSON document.
/// `RFP_LOG_FORMAT=json` switches to structured JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rfp_intelligence=info,warn"));

    let json = std::env::var("RFP_LOG_FORMAT")
        .ok()
        .is_some_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

fn read_feed(feed: &FeedFile) -> Result<Vec<RawEntry>> {
    let xml = std::fs::read_to_string(&feed.path)
        .with_context(|| format!("reading feed {}", feed.path.display()))?;
    ingest::parse_feed(&xml, &feed.url)
}

fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let feeds: Vec<String> = std::env::args().skip(1).collect();
    if feeds.is_empty() {
        bail!("usage: rfp-intelligence <feed.xml[=https://feed/url]>...");
    }

    // Config errors abort before any feed is touched.
    let config = Config::load_default().context("loading configuration")?;

    let mut raw = Vec::new();
    for f in &feeds {
        match read_feed(&FeedFile::parse(f)) {
            Ok(mut entries) => raw.append(&mut entries),
            Err(e) => warn!(target: "ingest", feed = %f, error = ?e, "feed skipped"),
        }
    }
    info!(target: "ingest", feeds = feeds.len(), entries = raw.len(), "feeds parsed");

    let output = pipeline::run_now(raw, &config);
    let json = serde_json::to_string_pretty(&output).context("serializing report")?;
    println!("{json}");
    Ok(())
}
