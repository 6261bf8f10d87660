//! Challenge and group metadata sidecars.
//!
//! `.challenge.json` and `.group.json` are optional: a missing or
//! unparseable file degrades to defaults derived from the directory name,
//! never an error. The flag hash is a hex SHA-256 digest checked
//! client-side; the compiler only passes it through.

use crate::utils::title_case;
use serde::Deserialize;
use std::{fs, path::Path};

/// File name of the challenge metadata sidecar.
pub const CHALLENGE_META_FILE: &str = ".challenge.json";

/// File name of the group metadata sidecar.
pub const GROUP_META_FILE: &str = ".group.json";

// ============================================================================
// Difficulty Colors
// ============================================================================

/// Badge color for a difficulty label (case-insensitive).
///
/// Unknown difficulties fall back to a neutral gray.
pub fn difficulty_color(difficulty: &str) -> &'static str {
    match difficulty.to_ascii_lowercase().as_str() {
        "easy" => "#22c55e",
        "medium" => "#e05a33",
        "hard" => "#ef4444",
        "insane" => "#a855f7",
        _ => "#6b7280",
    }
}

// ============================================================================
// Challenge Metadata
// ============================================================================

/// Raw shape of `.challenge.json` - every field optional.
#[derive(Debug, Default, Deserialize)]
struct RawChallengeMeta {
    title: Option<String>,
    difficulty: Option<String>,
    summary: Option<String>,
    flag_hash: Option<String>,
}

/// Resolved challenge metadata with all defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeInfo {
    /// Directory name of the challenge, used in URLs and as a JS key.
    pub slug: String,
    pub title: String,
    pub difficulty: String,
    pub summary: String,
    /// Hex SHA-256 digest of the flag; empty when unset.
    pub flag_hash: String,
}

impl ChallengeInfo {
    /// Load metadata for the challenge rooted at `dir`.
    ///
    /// The sidecar is `<dir>/.challenge.json`; when it is missing or
    /// invalid the record is derived from the directory name.
    pub fn load(dir: &Path) -> Self {
        let slug = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match read_json::<RawChallengeMeta>(&dir.join(CHALLENGE_META_FILE)) {
            Some(raw) => Self {
                title: raw.title.unwrap_or_else(|| title_case(&slug)),
                difficulty: raw.difficulty.unwrap_or_else(|| "Unknown".to_owned()),
                summary: raw.summary.unwrap_or_default(),
                flag_hash: raw.flag_hash.unwrap_or_default(),
                slug,
            },
            None => Self {
                title: title_case(&slug),
                difficulty: "Unknown".to_owned(),
                summary: "No description available.".to_owned(),
                flag_hash: String::new(),
                slug,
            },
        }
    }
}

// ============================================================================
// Group Metadata
// ============================================================================

/// Raw shape of `.group.json` - every field optional.
#[derive(Debug, Default, Deserialize)]
struct RawGroupMeta {
    name: Option<String>,
    description: Option<String>,
}

/// Resolved group metadata with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupInfo {
    pub name: String,
    pub description: String,
}

impl GroupInfo {
    /// Load metadata for the group rooted at `dir`, defaulting the name
    /// to the title-cased directory name.
    pub fn load(dir: &Path) -> Self {
        let slug = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let raw = read_json::<RawGroupMeta>(&dir.join(GROUP_META_FILE)).unwrap_or_default();

        Self {
            name: raw.name.unwrap_or_else(|| title_case(&slug)),
            description: raw.description.unwrap_or_default(),
        }
    }
}

/// Read and parse a JSON sidecar; any failure yields `None`.
fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
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
    fn test_difficulty_color_known() {
        assert_eq!(difficulty_color("easy"), "#22c55e");
        assert_eq!(difficulty_color("Medium"), "#e05a33");
        assert_eq!(difficulty_color("HARD"), "#ef4444");
        assert_eq!(difficulty_color("insane"), "#a855f7");
    }

    #[test]
    fn test_difficulty_color_unknown_is_gray() {
        assert_eq!(difficulty_color("Unknown"), "#6b7280");
        assert_eq!(difficulty_color(""), "#6b7280");
        assert_eq!(difficulty_color("extreme"), "#6b7280");
    }

    #[test]
    fn test_challenge_info_from_sidecar() {
        let dir = tempdir().unwrap();
        let challenge = dir.path().join("buffer-overflow");
        fs::create_dir(&challenge).unwrap();
        fs::write(
            challenge.join(".challenge.json"),
            r#"{"title": "Smash the Stack", "difficulty": "Hard", "summary": "Classic pwn.", "flag_hash": "ab12"}"#,
        )
        .unwrap();

        let info = ChallengeInfo::load(&challenge);
        assert_eq!(info.slug, "buffer-overflow");
        assert_eq!(info.title, "Smash the Stack");
        assert_eq!(info.difficulty, "Hard");
        assert_eq!(info.summary, "Classic pwn.");
        assert_eq!(info.flag_hash, "ab12");
    }

    #[test]
    fn test_challenge_info_missing_sidecar() {
        let dir = tempdir().unwrap();
        let challenge = dir.path().join("crypto_warmup");
        fs::create_dir(&challenge).unwrap();

        let info = ChallengeInfo::load(&challenge);
        assert_eq!(info.title, "Crypto Warmup");
        assert_eq!(info.difficulty, "Unknown");
        assert_eq!(info.summary, "No description available.");
        assert_eq!(info.flag_hash, "");
    }

    #[test]
    fn test_challenge_info_invalid_json_degrades() {
        let dir = tempdir().unwrap();
        let challenge = dir.path().join("web-intro");
        fs::create_dir(&challenge).unwrap();
        fs::write(challenge.join(".challenge.json"), "{not json").unwrap();

        let info = ChallengeInfo::load(&challenge);
        assert_eq!(info.title, "Web Intro");
        assert_eq!(info.difficulty, "Unknown");
    }

    #[test]
    fn test_challenge_info_partial_fields() {
        let dir = tempdir().unwrap();
        let challenge = dir.path().join("re-101");
        fs::create_dir(&challenge).unwrap();
        fs::write(challenge.join(".challenge.json"), r#"{"difficulty": "Easy"}"#).unwrap();

        let info = ChallengeInfo::load(&challenge);
        assert_eq!(info.title, "Re 101");
        assert_eq!(info.difficulty, "Easy");
        // Sidecar present but field absent: empty, not the placeholder text
        assert_eq!(info.summary, "");
    }

    #[test]
    fn test_group_info_from_sidecar() {
        let dir = tempdir().unwrap();
        let group = dir.path().join("web");
        fs::create_dir(&group).unwrap();
        fs::write(
            group.join(".group.json"),
            r#"{"name": "Web Exploitation", "description": "Client and server side."}"#,
        )
        .unwrap();

        let info = GroupInfo::load(&group);
        assert_eq!(info.name, "Web Exploitation");
        assert_eq!(info.description, "Client and server side.");
    }

    #[test]
    fn test_group_info_missing_sidecar() {
        let dir = tempdir().unwrap();
        let group = dir.path().join("binary-exploitation");
        fs::create_dir(&group).unwrap();

        let info = GroupInfo::load(&group);
        assert_eq!(info.name, "Binary Exploitation");
        assert_eq!(info.description, "");
    }
}
