//! `html_minify` and `json_minify` applicators.
//!
//! The HTML minifier is deliberately lightweight and idempotent: running
//! it over its own output is a fixed point. Contents of `<pre>`,
//! `<script>`, `<style>` and `<textarea>` are swapped out before
//! whitespace collapsing and restored verbatim afterwards.

use super::{DirectiveError, HTML_DIRECTIVE_RE, LINE_DIRECTIVE_RE};
use anyhow::{Context, Result};
use regex::{Captures, Regex};
use std::{fs, path::Path, sync::LazyLock};

/// Elements whose contents must survive minification untouched.
static PROTECTED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:pre|script|style|textarea)\b[^>]*>.*?</(?:pre|script|style|textarea)>")
        .unwrap()
});

/// HTML comments. Conditional comments (`<!--[if ...`) are kept.
static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static AROUND_GT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*>\s*").unwrap());
static AROUND_LT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*<\s*").unwrap());

// ============================================================================
// html_minify
// ============================================================================

/// Minify the HTML file at `path`, stripping its directive line.
pub fn apply_html(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(minify_html(&content))
}

/// The transformation itself, separated from file I/O.
fn minify_html(content: &str) -> String {
    // Strip the directive line
    let content = HTML_DIRECTIVE_RE.replace(content, "");

    // Swap out <pre>/<script>/<style>/<textarea> blocks so the whitespace
    // passes cannot mangle them
    let mut protected: Vec<String> = Vec::new();
    let content = PROTECTED_RE.replace_all(&content, |caps: &Captures| {
        let key = format!("\u{0}PROTECT_{}\u{0}", protected.len());
        protected.push(caps[0].to_owned());
        key
    });

    // Strip comments, preserving conditional-comment syntax
    let content = COMMENT_RE.replace_all(&content, |caps: &Captures| {
        if caps[0].starts_with("<!--[") {
            caps[0].to_owned()
        } else {
            String::new()
        }
    });

    // Collapse whitespace and remove it around tag brackets
    let content = WHITESPACE_RE.replace_all(&content, " ");
    let content = AROUND_GT_RE.replace_all(&content, ">");
    let mut content = AROUND_LT_RE.replace_all(&content, "<").into_owned();

    // Restore protected blocks verbatim
    for (index, block) in protected.iter().enumerate() {
        content = content.replace(&format!("\u{0}PROTECT_{index}\u{0}"), block);
    }

    format!("{}\n", content.trim())
}

// ============================================================================
// json_minify
// ============================================================================

/// Minify the JSON file at `path`: strip the directive line, parse, and
/// re-serialize compactly preserving key order.
///
/// A parse failure is fatal for this file and propagates to the caller.
pub fn apply_json(path: &Path) -> Result<String> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    // Strip the directive line
    let raw = LINE_DIRECTIVE_RE.replace(&raw, "");
    let raw = raw.trim_start_matches('\n');

    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|err| DirectiveError::Json(path.to_path_buf(), err))?;
    Ok(format!("{}\n", serde_json::to_string(&value)?))
}

// ============================================================================
// Tests
// ============================================================================
