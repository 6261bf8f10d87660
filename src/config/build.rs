//! `[build]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in ctfc.toml - compiler output settings.
///
/// # Example
/// ```toml
/// [build]
/// output = "dist"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Output root directory. Each compiled challenge is written to
    /// `<output>/<challenge_name>/`, and `compile-all` places the homepage
    /// at `<output>/index.html`.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use std::path::PathBuf;

    #[test]
    fn test_build_config() {
        let config = r#"
            [build]
            output = "public"
        "#;
        let config = SiteConfig::from_str(config).unwrap();

        assert_eq!(config.build.output, PathBuf::from("public"));
    }

    #[test]
    fn test_build_config_defaults() {
        let config = SiteConfig::from_str("").unwrap();

        assert_eq!(config.build.output, PathBuf::from("dist"));
    }

    #[test]
    fn test_unknown_field_rejection() {
        let config = r#"
            [build]
            unknown_field = "should_fail"
        "#;
        let result = SiteConfig::from_str(config);

        assert!(result.is_err());
    }
}
