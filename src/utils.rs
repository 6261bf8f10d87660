//! Small text and path helpers shared across the compiler.

use crate::meta::{CHALLENGE_META_FILE, GROUP_META_FILE};
use regex::Regex;
use std::{
    path::{Component, Path},
    sync::LazyLock,
};

/// Hidden markdown files (e.g. `.solving-guide.md`) are author-only
/// documentation, excluded from build output and directory listings.
static HIDDEN_MD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^\..+\.md$").unwrap());

/// True for author-only hidden markdown names (`.<something>.md`).
pub fn is_hidden_markdown(name: &str) -> bool {
    HIDDEN_MD_RE.is_match(name)
}

/// True for compiler metadata sidecars (`.challenge.json`, `.group.json`).
pub fn is_metadata_file(name: &str) -> bool {
    name == CHALLENGE_META_FILE || name == GROUP_META_FILE
}

/// Minimal HTML/JS-safe escaping for text interpolated into templates.
pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Turn a directory slug into a display title: separators become spaces
/// and each word is capitalized (`crypto-warmup_2` -> `Crypto Warmup 2`).
pub fn title_case(slug: &str) -> String {
    let spaced = slug.replace(['-', '_'], " ");
    let mut out = String::with_capacity(spaced.len());
    let mut at_word_start = true;
    for ch in spaced.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
                at_word_start = false;
            } else {
                out.extend(ch.to_lowercase());
            }
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

/// URL prefix for a file given its path relative to the served/compiled
/// root: the URL path of its containing directory, always ending in `/`.
///
/// `sub/dir/index.html` -> `/sub/dir/`, `index.html` -> `/`.
pub fn url_prefix_for(rel: &Path) -> String {
    let mut prefix = String::from("/");
    if let Some(parent) = rel.parent() {
        for component in parent.components() {
            if let Component::Normal(part) = component {
                prefix.push_str(&part.to_string_lossy());
                prefix.push('/');
            }
        }
    }
    prefix
}

// ============================================================================
// Tests
// ============================================================================
