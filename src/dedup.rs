// src/dedup.rs
//! Link-based deduplication with an optional content-hash pass.

use std::collections::HashSet;

use sha2::{Digest, Sha256};

use crate::entry::Entry;
use crate::ingest::normalize_text;

/// Drop entries whose non-empty `link` was already seen; first occurrence wins.
/// Returns the survivors and the number removed.
pub fn dedup_by_link(entries: Vec<Entry>) -> (Vec<Entry>, usize) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut removed = 0usize;
    let mut keep = Vec::with_capacity(entries.len());
    for e in entries {
        if !e.link.is_empty() && !seen.insert(e.link.clone()) {
            removed += 1;
            continue;
        }
        keep.push(e);
    }
    (keep, removed)
}

/// Drop entries whose normalized `title + description` was already seen.
/// Entries with no text at all are never treated as duplicates.
pub fn dedup_by_content(entries: Vec<Entry>) -> (Vec<Entry>, usize) {
    let mut seen: HashSet<[u8; 32]> = HashSet::new();
    let mut removed = 0usize;
    let mut keep = Vec::with_capacity(entries.len());
    for e in entries {
        if let Some(h) = content_hash(&e) {
            if !seen.insert(h) {
                removed += 1;
                continue;
            }
        }
        keep.push(e);
    }
    (keep, removed)
}

/// Link pass, then the content pass when `content` is set.
pub fn deduplicate(entries: Vec<Entry>, content: bool) -> (Vec<Entry>, usize) {
    let (entries, by_link) = dedup_by_link(entries);
    if !content {
        return (entries, by_link);
    }
    let (entries, by_content) = dedup_by_content(entries);
    (entries, by_link + by_content)
}

fn content_hash(e: &Entry) -> Option<[u8; 32]> {
    let title = normalize_text(&e.title).to_lowercase();
    let description = normalize_text(&e.description).to_lowercase();
    if title.is_empty() && description.is_empty() {
        return None;
    }
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update([0u8]);
    hasher.update(description.as_bytes());
    Some(hasher.finalize().into())
}
