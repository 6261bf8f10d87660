//! Batch compiler - the `compile` subcommand.
//!
//! Walks the source directory, copies every file into the destination,
//! and applies compiler directives where found.
//!
//! The walk is sequential and sorted, so repeated builds of the same
//! source produce identical output trees. A single file's directive
//! failure aborts the whole compile with a non-zero exit.

use crate::config::SiteConfig;
use crate::directives::{self, DirectiveKind};
use crate::log;
use crate::utils::{is_hidden_markdown, is_metadata_file, url_prefix_for};
use anyhow::{Context, Result};
use std::{fs, path::Path};
use walkdir::WalkDir;

/// Build the static site from `source` into `dest`.
///
/// `dest` is wiped clean before every build so the output is always a
/// faithful snapshot of the source with directives applied.
pub fn compile_site(source: &Path, dest: &Path, config: &SiteConfig) -> Result<()> {
    if dest.exists() {
        fs::remove_dir_all(dest)
            .with_context(|| format!("failed to clear output directory {}", dest.display()))?;
    }
    fs::create_dir_all(dest)
        .with_context(|| format!("failed to create output directory {}", dest.display()))?;

    for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(source)
            .expect("walked entry is always under the source root");
        let dst = dest.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dst)?;
            continue;
        }

        let name = entry.file_name().to_string_lossy();

        // Hidden markdown (.*.md) is author-only documentation
        if is_hidden_markdown(&name) {
            log!("skip"; "{}  (hidden markdown)", rel.display());
            continue;
        }

        // Compiler metadata sidecars never reach the output
        if is_metadata_file(&name) {
            log!("skip"; "{}  (metadata)", rel.display());
            continue;
        }

        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }

        match directives::detect(entry.path()) {
            Some(DirectiveKind::NoInclude) => {
                log!("skip"; "{}", rel.display());
            }
            None => {
                // No directive - straight copy (preserves binary files too)
                fs::copy(entry.path(), &dst)
                    .with_context(|| format!("failed to copy {}", rel.display()))?;
                log!("copy"; "{}", rel.display());
            }
            Some(kind) => {
                let url_prefix = url_prefix_for(rel);
                let transformed = directives::apply(kind, entry.path(), &url_prefix, config)
                    .with_context(|| format!("applying {} to {}", kind.name(), rel.display()))?;
                fs::write(&dst, transformed)
                    .with_context(|| format!("failed to write {}", dst.display()))?;
                log!(kind.name(); "{}", rel.display());
            }
        }
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn compile_fixture(populate: impl FnOnce(&Path)) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let source = dir.path().join("src");
        let dest = dir.path().join("out");
        fs::create_dir(&source).unwrap();
        populate(&source);
        let config = SiteConfig::default();
        compile_site(&source, &dest, &config).unwrap();
        (dir, dest)
    }

    #[test]
    fn test_copy_fidelity_for_plain_files() {
        let (_dir, dest) = compile_fixture(|src| {
            fs::write(src.join("text.txt"), "hello\n").unwrap();
            fs::write(src.join("blob.bin"), [0u8, 255, 13, 10, 0]).unwrap();
        });

        assert_eq!(fs::read(dest.join("text.txt")).unwrap(), b"hello\n");
        assert_eq!(
            fs::read(dest.join("blob.bin")).unwrap(),
            [0u8, 255, 13, 10, 0]
        );
    }

    #[test]
    fn test_no_include_absent_from_output() {
        let (_dir, dest) = compile_fixture(|src| {
            fs::write(src.join("secret.js"), "// COMPILER: no_include\nflag();\n").unwrap();
            fs::write(src.join("public.js"), "ok();\n").unwrap();
        });

        assert!(!dest.join("secret.js").exists());
        assert!(dest.join("public.js").exists());
    }

    #[test]
    fn test_hidden_markdown_and_metadata_excluded() {
        let (_dir, dest) = compile_fixture(|src| {
            fs::write(src.join(".walkthrough.md"), "# spoilers").unwrap();
            fs::write(src.join(".challenge.json"), "{}").unwrap();
            fs::write(src.join("README.md"), "# public").unwrap();
        });

        assert!(!dest.join(".walkthrough.md").exists());
        assert!(!dest.join(".challenge.json").exists());
        assert!(dest.join("README.md").exists());
    }

    #[test]
    fn test_directory_structure_mirrored() {
        let (_dir, dest) = compile_fixture(|src| {
            fs::create_dir_all(src.join("a/b")).unwrap();
            fs::write(src.join("a/b/deep.txt"), "x").unwrap();
            fs::create_dir(src.join("empty")).unwrap();
        });

        assert!(dest.join("a/b/deep.txt").is_file());
        assert!(dest.join("empty").is_dir());
    }

    #[test]
    fn test_directive_applied_and_stripped() {
        let (_dir, dest) = compile_fixture(|src| {
            fs::write(
                src.join("page.html"),
                "<!-- COMPILER: html_minify -->\n<p>\n  hi\n</p>\n",
            )
            .unwrap();
        });

        let out = fs::read_to_string(dest.join("page.html")).unwrap();
        assert_eq!(out, "<p>hi</p>\n");
    }

    #[test]
    fn test_listing_prefix_derived_from_parent_path() {
        let (_dir, dest) = compile_fixture(|src| {
            fs::create_dir_all(src.join("files")).unwrap();
            fs::write(src.join("files/a.txt"), "abc").unwrap();
            fs::write(
                src.join("files/index.html"),
                "<!-- COMPILER: directory_listing -->\n",
            )
            .unwrap();
        });

        let out = fs::read_to_string(dest.join("files/index.html")).unwrap();
        assert!(out.contains("<title>Index of /files/</title>"));
        assert!(out.contains("a.txt"));
    }

    #[test]
    fn test_output_wiped_before_build() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("src");
        let dest = dir.path().join("out");
        fs::create_dir(&source).unwrap();
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("stale.txt"), "old").unwrap();
        fs::write(source.join("fresh.txt"), "new").unwrap();

        let config = SiteConfig::default();
        compile_site(&source, &dest, &config).unwrap();

        assert!(!dest.join("stale.txt").exists());
        assert!(dest.join("fresh.txt").exists());
    }

    #[test]
    fn test_one_bad_file_aborts_whole_compile() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("src");
        let dest = dir.path().join("out");
        fs::create_dir(&source).unwrap();
        fs::write(
            source.join("broken.json"),
            "// COMPILER: json_minify\n{not valid\n",
        )
        .unwrap();
        fs::write(source.join("zz-fine.txt"), "ok").unwrap();

        let config = SiteConfig::default();
        let result = compile_site(&source, &dest, &config);

        assert!(result.is_err());
    }
}
