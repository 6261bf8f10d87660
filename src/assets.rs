//! Shared asset store.
//!
//! `shared.css` and `shared.js` are inlined into the challenge-page and
//! homepage templates via `{{SHARED_CSS}}` / `{{SHARED_JS}}` placeholders.
//! The text is resolved at most once per process: embedded defaults unless
//! an `[assets]` override points at a file on disk.
//!
//! The cells are read-mostly, written once, and safe under concurrent
//! readers; a race where two server threads populate the same cell with
//! identical content is harmless.

use crate::config::SiteConfig;
use crate::log;
use crate::template;
use std::{fs, path::Path, sync::OnceLock};

const DEFAULT_CSS: &str = include_str!("embed/shared.css");
const DEFAULT_JS: &str = include_str!("embed/shared.js");

static SHARED_CSS: OnceLock<String> = OnceLock::new();
static SHARED_JS: OnceLock<String> = OnceLock::new();

/// Return the shared stylesheet text, loading it on first use.
pub fn shared_css(config: &SiteConfig) -> &'static str {
    SHARED_CSS.get_or_init(|| load_asset(config.assets.css.as_deref(), DEFAULT_CSS))
}

/// Return the shared script text, loading it on first use.
pub fn shared_js(config: &SiteConfig) -> &'static str {
    SHARED_JS.get_or_init(|| load_asset(config.assets.js.as_deref(), DEFAULT_JS))
}

/// Replace `{{SHARED_CSS}}` and `{{SHARED_JS}}` in rendered HTML.
pub fn apply_shared_placeholders(html: &str, config: &SiteConfig) -> String {
    template::render(
        html,
        &[
            ("SHARED_CSS", shared_css(config)),
            ("SHARED_JS", shared_js(config)),
        ],
    )
}

/// Read an override file, falling back to the embedded default.
fn load_asset(override_path: Option<&Path>, fallback: &'static str) -> String {
    match override_path {
        Some(path) => fs::read_to_string(path).unwrap_or_else(|err| {
            log!("error"; "failed to read {}: {err}, using embedded asset", path.display());
            fallback.to_owned()
        }),
        None => fallback.to_owned(),
    }
}

// ============================================================================
// Tests
// ============================================================================
