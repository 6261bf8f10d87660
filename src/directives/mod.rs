//! Directive detection and dispatch.
//!
//! A directive is a comment on the very first line of a file naming a
//! transformation to apply during compilation or serving:
//!
//! ```text
//! HTML:  <!-- COMPILER: directory_listing -->
//!        <!-- COMPILER: html_minify -->
//!        <!-- COMPILER: challenge_page -->
//! JSON:  // COMPILER: json_minify
//! Skip:  // COMPILER: no_include           (file is excluded from output)
//! Bundle:// COMPILER: base64_bundle <file> (base64-encodes referenced file
//!                                           and appends eval(atob(...)))
//! ```
//!
//! Both the batch compiler (`build`) and the dev server (`serve`) consume
//! this module - [`detect`] classifies a file, [`apply`] produces the
//! transformed text. Neither driver carries its own directive-to-output
//! mapping.

pub mod bundle;
pub mod challenge;
pub mod listing;
pub mod minify;

use crate::config::SiteConfig;
use anyhow::Result;
use regex::Regex;
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::{Path, PathBuf},
    sync::LazyLock,
};
use thiserror::Error;

/// Upper bound on the first-line read during detection. Keeps detection
/// from pulling a whole large binary into memory.
const MAX_DIRECTIVE_LINE: u64 = 4096;

/// HTML-comment directive form: `<!-- COMPILER: <name> -->`
static HTML_DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*<!--\s*COMPILER:\s*(\w+)\s*-->").unwrap());

/// Line-comment directive form: `// COMPILER: <name>`
static LINE_DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*//\s*COMPILER:\s*(\w+)").unwrap());

// ============================================================================
// Directive Kinds
// ============================================================================

/// The closed set of supported directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    DirectoryListing,
    HtmlMinify,
    JsonMinify,
    NoInclude,
    Base64Bundle,
    ChallengePage,
}

impl DirectiveKind {
    /// Map a directive name to its kind. Unknown names yield `None`,
    /// which callers treat as "no directive", never as an error.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "directory_listing" => Some(Self::DirectoryListing),
            "html_minify" => Some(Self::HtmlMinify),
            "json_minify" => Some(Self::JsonMinify),
            "no_include" => Some(Self::NoInclude),
            "base64_bundle" => Some(Self::Base64Bundle),
            "challenge_page" => Some(Self::ChallengePage),
            _ => None,
        }
    }

    /// Canonical directive name as written in source files.
    pub const fn name(self) -> &'static str {
        match self {
            Self::DirectoryListing => "directory_listing",
            Self::HtmlMinify => "html_minify",
            Self::JsonMinify => "json_minify",
            Self::NoInclude => "no_include",
            Self::Base64Bundle => "base64_bundle",
            Self::ChallengePage => "challenge_page",
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while applying a directive.
///
/// These are fatal for the file being processed: the batch driver aborts
/// the whole compile, the dev server turns them into a 500 response.
#[derive(Debug, Error)]
pub enum DirectiveError {
    #[error("invalid JSON in `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("base64_bundle directive in `{0}` is missing a filename argument")]
    BundleArgMissing(PathBuf),

    #[error("base64_bundle: referenced file not found: `{0}`")]
    BundleRefNotFound(PathBuf),

    /// `no_include` is a sentinel the caller intercepts before dispatch;
    /// reaching the dispatcher with it is a bug in the driver.
    #[error("no_include files must be skipped by the caller, never applied")]
    NoIncludeDispatched,
}

// ============================================================================
// Detection
// ============================================================================

/// Return the directive on the first line of `path`, or `None`.
///
/// Reads at most [`MAX_DIRECTIVE_LINE`] bytes. Any I/O failure or
/// non-UTF-8 content is treated as "no directive" - detection never
/// aborts a tree walk or a request.
pub fn detect(path: &Path) -> Option<DirectiveKind> {
    let first_line = read_first_line(path)?;
    let caps = HTML_DIRECTIVE_RE
        .captures(&first_line)
        .or_else(|| LINE_DIRECTIVE_RE.captures(&first_line))?;
    DirectiveKind::from_name(&caps[1])
}

/// Bounded read of the first line, lossily decoded.
fn read_first_line(path: &Path) -> Option<String> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file).take(MAX_DIRECTIVE_LINE);
    let mut buf = Vec::new();
    reader.read_until(b'\n', &mut buf).ok()?;
    Some(String::from_utf8_lossy(&buf).into_owned())
}

// ============================================================================
// Dispatch
// ============================================================================

/// Apply `kind` to the file at `path` and return the transformed content.
///
/// `url_prefix` is the slash-terminated URL path of the file's containing
/// directory (used by the directory listing). Applicator errors propagate
/// unchanged - no recovery happens here.
pub fn apply(
    kind: DirectiveKind,
    path: &Path,
    url_prefix: &str,
    config: &SiteConfig,
) -> Result<String> {
    match kind {
        DirectiveKind::DirectoryListing => listing::apply(path, url_prefix),
        DirectiveKind::HtmlMinify => minify::apply_html(path),
        DirectiveKind::JsonMinify => minify::apply_json(path),
        DirectiveKind::Base64Bundle => bundle::apply(path),
        DirectiveKind::ChallengePage => challenge::apply(path, config),
        DirectiveKind::NoInclude => Err(DirectiveError::NoIncludeDispatched.into()),
    }
}

// ============================================================================
// Tests
// ============================================================================
