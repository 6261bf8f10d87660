//! `challenge_page` - wrap challenge body content in the shared page shell.
//!
//! The source file starts with `<!-- COMPILER: challenge_page -->` followed
//! by the challenge-specific HTML body (briefing, notes, hints). The
//! template supplies the full page: back button, difficulty badge, flag
//! submission form wired to the client-side SHA-256 check.
//!
//! Metadata comes from `.challenge.json` in the challenge root, which is
//! the parent of the directory holding the directive file (typically
//! `<challenge>/challenge/index.html`). Missing or invalid metadata
//! degrades to defaults rather than failing.

use crate::assets;
use crate::config::SiteConfig;
use crate::meta::{ChallengeInfo, difficulty_color};
use crate::template;
use crate::utils::html_escape;
use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Full page shell (embedded at compile time).
const CHALLENGE_TEMPLATE: &str = include_str!("../embed/challenge.html");

/// Apply the directive to the file at `path`.
pub fn apply(path: &Path, config: &SiteConfig) -> Result<String> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let (_directive_line, rest) = content
        .split_once('\n')
        .unwrap_or((content.as_str(), ""));
    let body = rest.trim();

    // Challenge root is the parent of the directory holding the page
    let challenge_root = path
        .parent()
        .and_then(Path::parent)
        .with_context(|| format!("{} has no enclosing challenge directory", path.display()))?;
    let info = ChallengeInfo::load(challenge_root);

    let html = template::render(
        CHALLENGE_TEMPLATE,
        &[
            ("TITLE", &html_escape(&info.title)),
            ("DIFFICULTY", &html_escape(&info.difficulty)),
            // Color and flag hash are trusted values, inserted unescaped
            ("DIFF_COLOR", difficulty_color(&info.difficulty)),
            ("SLUG", &html_escape(&info.slug)),
            ("FLAG_HASH", &info.flag_hash),
            ("BODY", body),
        ],
    );

    Ok(assets::apply_shared_placeholders(&html, config))
}

// ============================================================================
// Tests
// ============================================================================
