//! `[assets]` section configuration.
//!
//! Optional on-disk overrides for the shared CSS/JS that the compiler
//! inlines into challenge pages and the homepage. When unset, the
//! defaults embedded in the binary are used.

use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[assets]` section in ctfc.toml - shared asset overrides.
///
/// # Example
/// ```toml
/// [assets]
/// css = "branding/shared.css"
/// js = "branding/shared.js"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct AssetsConfig {
    /// Replacement for the embedded `shared.css` (resolved against the
    /// project root when relative).
    #[serde(default)]
    pub css: Option<PathBuf>,

    /// Replacement for the embedded `shared.js`.
    #[serde(default)]
    pub js: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use std::path::PathBuf;

    #[test]
    fn test_assets_config() {
        let config = r#"
            [assets]
            css = "theme/site.css"
        "#;
        let config = SiteConfig::from_str(config).unwrap();

        assert_eq!(config.assets.css, Some(PathBuf::from("theme/site.css")));
        assert!(config.assets.js.is_none());
    }

    #[test]
    fn test_assets_config_defaults() {
        let config = SiteConfig::from_str("").unwrap();

        assert!(config.assets.css.is_none());
        assert!(config.assets.js.is_none());
    }
}
