//! `base64_bundle` - embed a sibling source file as runtime-decoded code.
//!
//! The source file looks like:
//!
//! ```text
//! // COMPILER: base64_bundle _ci-runner-src.js
//! /**
//!  * ... comment block preserved in output ...
//!  */
//! ```
//!
//! The directive line is stripped; everything after it is kept verbatim
//! and `eval(atob("..."));` is appended, carrying the referenced file's
//! full text. A leading `no_include` directive line in the referenced
//! file is stripped so its exclusion marker does not leak into the bundle.

use super::DirectiveError;
use anyhow::{Context, Result};
use base64::{Engine as _, prelude::BASE64_STANDARD};
use regex::Regex;
use std::{fs, path::Path, sync::LazyLock};

/// Extracts the filename argument from a bundle directive line.
static BUNDLE_ARG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*//\s*COMPILER:\s*base64_bundle\s+(\S+)").unwrap());

/// A leading `no_include` directive line in the referenced file.
static NO_INCLUDE_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*//\s*COMPILER:\s*no_include[^\n]*\n?").unwrap());

/// Apply the directive to the file at `path`.
pub fn apply(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let (first_line, rest) = content
        .split_once('\n')
        .unwrap_or((content.as_str(), ""));

    let caps = BUNDLE_ARG_RE
        .captures(first_line)
        .ok_or_else(|| DirectiveError::BundleArgMissing(path.to_path_buf()))?;

    let ref_path = path
        .parent()
        .with_context(|| format!("{} has no parent directory", path.display()))?
        .join(&caps[1]);
    if !ref_path.is_file() {
        return Err(DirectiveError::BundleRefNotFound(ref_path).into());
    }

    let source = fs::read_to_string(&ref_path)
        .with_context(|| format!("failed to read {}", ref_path.display()))?;
    // Strip a leading no_include directive line from the source if present
    let source = NO_INCLUDE_LINE_RE.replace(&source, "");

    let encoded = BASE64_STANDARD.encode(source.as_bytes());
    Ok(format!("{rest}eval(atob(\"{encoded}\"));\n"))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_bundle_encodes_reference() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("_src.js"), "console.log('hi');\n").unwrap();
        let loader = dir.path().join("loader.js");
        fs::write(
            &loader,
            "// COMPILER: base64_bundle _src.js\n/* loader stub */\n",
        )
        .unwrap();

        let out = apply(&loader).unwrap();

        // Everything after the directive line is kept verbatim
        assert!(out.starts_with("/* loader stub */\n"));
        // Decoding the payload reproduces the referenced file exactly
        let encoded = out
            .split("eval(atob(\"")
            .nth(1)
            .and_then(|s| s.split('"').next())
            .unwrap();
        let decoded = BASE64_STANDARD.decode(encoded).unwrap();
        assert_eq!(decoded, b"console.log('hi');\n");
        assert!(out.ends_with("\"));\n"));
    }

    #[test]
    fn test_bundle_strips_no_include_from_reference() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("_hidden.js"),
            "// COMPILER: no_include\nsecret();\n",
        )
        .unwrap();
        let loader = dir.path().join("loader.js");
        fs::write(&loader, "// COMPILER: base64_bundle _hidden.js\n").unwrap();

        let out = apply(&loader).unwrap();

        let encoded = out
            .split("eval(atob(\"")
            .nth(1)
            .and_then(|s| s.split('"').next())
            .unwrap();
        let decoded = BASE64_STANDARD.decode(encoded).unwrap();
        assert_eq!(decoded, b"secret();\n");
    }

    #[test]
    fn test_bundle_missing_argument_is_fatal() {
        let dir = tempdir().unwrap();
        let loader = dir.path().join("loader.js");
        fs::write(&loader, "// COMPILER: base64_bundle\nrest\n").unwrap();

        let err = apply(&loader).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DirectiveError>(),
            Some(DirectiveError::BundleArgMissing(_))
        ));
    }

    #[test]
    fn test_bundle_missing_reference_is_fatal() {
        let dir = tempdir().unwrap();
        let loader = dir.path().join("loader.js");
        fs::write(&loader, "// COMPILER: base64_bundle _absent.js\n").unwrap();

        let err = apply(&loader).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DirectiveError>(),
            Some(DirectiveError::BundleRefNotFound(_))
        ));
    }
}
