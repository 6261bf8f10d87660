//! Challenge and group discovery.
//!
//! Walks the project root looking for **group directories** (containing a
//! `.group.json` sidecar with challenge subdirectories inside) and
//! **standalone challenges** (top-level directories with their own
//! `.challenge.json`). Standalone challenges land in an implicit
//! "Ungrouped" group so the homepage always has something to render.

use crate::meta::{CHALLENGE_META_FILE, GROUP_META_FILE, GroupInfo};
use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Directories at the project root that are never challenge or group
/// sources.
const IGNORE_DIRS: &[&str] = &[".git", ".github", "dist", "node_modules", "target"];

/// A named group of challenges (e.g. from a `.group.json` directory).
#[derive(Debug, Clone)]
pub struct ChallengeGroup {
    pub name: String,
    pub description: String,
    pub slug: String,
    pub challenges: Vec<PathBuf>,
}

/// Walk `root` and return grouped challenge directories, sorted by name.
pub fn discover_groups(root: &Path) -> Result<Vec<ChallengeGroup>> {
    let mut groups = Vec::new();
    let mut ungrouped = Vec::new();

    let mut entries: Vec<PathBuf> = fs::read_dir(root)
        .with_context(|| format!("failed to read project root {}", root.display()))?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .collect();
    entries.sort();

    for entry in entries {
        if !entry.is_dir() || is_ignored(&entry) {
            continue;
        }

        if entry.join(GROUP_META_FILE).exists() {
            // This is a group directory - discover challenges inside it
            let info = GroupInfo::load(&entry);
            let challenges = subdirectories(&entry)?;
            if !challenges.is_empty() {
                groups.push(ChallengeGroup {
                    name: info.name,
                    description: info.description,
                    slug: dir_name(&entry),
                    challenges,
                });
            }
        } else if entry.join(CHALLENGE_META_FILE).exists() {
            // Top-level standalone challenge
            ungrouped.push(entry);
        }
    }

    if !ungrouped.is_empty() {
        groups.push(ChallengeGroup {
            name: "Ungrouped".to_owned(),
            description: String::new(),
            slug: "_ungrouped".to_owned(),
            challenges: ungrouped,
        });
    }

    Ok(groups)
}

/// Non-hidden subdirectories of `dir`, sorted.
fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_dir() && !dir_name(p).starts_with('.'))
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn is_ignored(path: &Path) -> bool {
    let name = dir_name(path);
    name.starts_with('.') || IGNORE_DIRS.contains(&name.as_str())
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// ============================================================================
// Tests
// ============================================================================
