//! Homepage generator.
//!
//! Renders the root `index.html` listing all discovered challenges in
//! collapsible groups, with one card per challenge and a flag submission
//! form that verifies flags client-side via SHA-256 hashing. The compiler
//! never verifies flags server-side; only the hex digests are embedded.

use crate::assets;
use crate::config::SiteConfig;
use crate::discover::ChallengeGroup;
use crate::log;
use crate::meta::{ChallengeInfo, difficulty_color};
use crate::template;
use crate::utils::html_escape;
use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Homepage shell (embedded at compile time).
const HOMEPAGE_TEMPLATE: &str = include_str!("embed/homepage.html");

/// Generate `<dest>/index.html` with collapsible grouped challenge cards.
pub fn generate_homepage(groups: &[ChallengeGroup], dest: &Path, config: &SiteConfig) -> Result<()> {
    let mut sections = Vec::new();
    let mut hash_entries = Vec::new();
    let mut total_challenges = 0;

    for group in groups {
        let mut cards = Vec::new();
        for challenge_dir in &group.challenges {
            let info = ChallengeInfo::load(challenge_dir);
            if !info.flag_hash.is_empty() {
                hash_entries.push(format!("    \"{}\": \"{}\"", info.slug, info.flag_hash));
            }
            cards.push(render_card(&info));
            total_challenges += 1;
        }
        sections.push(render_group(group, &cards));
    }

    // Group membership map for JS: { slug: [challenge1, ...] }
    let group_map: Vec<String> = groups
        .iter()
        .map(|group| {
            let slugs: Vec<String> = group
                .challenges
                .iter()
                .filter_map(|c| c.file_name().map(|n| format!("\"{}\"", n.to_string_lossy())))
                .collect();
            format!(
                "    \"{}\": [{}]",
                html_escape(&group.slug),
                slugs.join(", ")
            )
        })
        .collect();

    let html = template::render(
        HOMEPAGE_TEMPLATE,
        &[
            ("GROUPS", &sections.join("\n\n")),
            ("HASHES", &hash_entries.join(",\n")),
            ("COUNT", &total_challenges.to_string()),
            ("GROUP_MAP", &group_map.join(",\n")),
        ],
    );
    let html = assets::apply_shared_placeholders(&html, config);

    fs::create_dir_all(dest)
        .with_context(|| format!("failed to create output directory {}", dest.display()))?;
    fs::write(dest.join("index.html"), html)
        .with_context(|| format!("failed to write homepage to {}", dest.display()))?;
    log!(
        "homepage";
        "index.html  ({total_challenges} challenge(s) in {} group(s))",
        groups.len()
    );

    Ok(())
}

/// One challenge card: difficulty badge, title link, summary, flag form.
fn render_card(info: &ChallengeInfo) -> String {
    let slug = &info.slug;
    let title = html_escape(&info.title);
    let difficulty = html_escape(&info.difficulty);
    let color = difficulty_color(&info.difficulty);
    let summary = html_escape(&info.summary);

    format!(
        r#"          <div class="challenge-card" data-slug="{slug}">
            <div class="card-header">
              <span class="difficulty" style="color:{color};background:{color}22">{difficulty}</span>
              <a class="card-title" href="./{slug}/challenge/">{title}</a>
            </div>
            <p class="card-summary">{summary}</p>
            <div class="card-footer">
              <a class="card-link" href="./{slug}/challenge/" target="_blank">Open challenge &rarr;</a>
              <form class="flag-form" data-slug="{slug}" onsubmit="return _checkFlag(event)">
                <input type="text" class="flag-input" placeholder="flag{{...}}" autocomplete="off" spellcheck="false" />
                <button type="submit" class="flag-btn">Submit</button>
              </form>
              <div class="flag-result" data-result="{slug}"></div>
            </div>
          </div>"#
    )
}

/// A collapsible group section wrapping its challenge cards.
fn render_group(group: &ChallengeGroup, cards: &[String]) -> String {
    let slug = html_escape(&group.slug);
    let name = html_escape(&group.name);
    let count = group.challenges.len();
    let cards_block = cards.join("\n");
    let description = if group.description.is_empty() {
        String::new()
    } else {
        format!(
            "\n          <p class=\"group-description\">{}</p>",
            html_escape(&group.description)
        )
    };

    format!(
        r#"        <div class="group" data-group="{slug}">
          <div class="group-header" onclick="_toggleGroup(this)">
            <div class="group-header-left">
              <span class="group-chevron">&#9662;</span>
              <h2 class="group-title">{name}</h2>
              <span class="group-count">{count}</span>
            </div>
            <span class="group-progress" data-group-progress="{slug}"></span>
          </div>{description}
          <div class="group-body">
{cards_block}
          </div>
        </div>"#
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn group_with_challenge(root: &Path, meta: &str) -> ChallengeGroup {
        let challenge = root.join("demo-chall");
        fs::create_dir_all(&challenge).unwrap();
        fs::write(challenge.join(".challenge.json"), meta).unwrap();
        ChallengeGroup {
            name: "Demo".to_owned(),
            description: "A demo group".to_owned(),
            slug: "demo".to_owned(),
            challenges: vec![challenge],
        }
    }

    #[test]
    fn test_homepage_renders_cards_and_count() {
        let dir = tempdir().unwrap();
        let groups = vec![group_with_challenge(
            dir.path(),
            r#"{"title": "Demo Challenge", "difficulty": "Easy", "flag_hash": "cafe01"}"#,
        )];
        let dest = dir.path().join("out");
        let config = SiteConfig::default();

        generate_homepage(&groups, &dest, &config).unwrap();
        let html = fs::read_to_string(dest.join("index.html")).unwrap();

        assert!(html.contains("Demo Challenge"));
        assert!(html.contains(r#"data-slug="demo-chall""#));
        assert!(html.contains(r#""demo-chall": "cafe01""#));
        assert!(html.contains("A demo group"));
        // Count placeholder resolved
        assert!(!html.contains("{{COUNT}}"));
        assert!(!html.contains("{{GROUPS}}"));
        assert!(!html.contains("{{SHARED_CSS}}"));
    }

    #[test]
    fn test_homepage_omits_empty_flag_hashes() {
        let dir = tempdir().unwrap();
        let groups = vec![group_with_challenge(dir.path(), r#"{"title": "No Flag"}"#)];
        let dest = dir.path().join("out");
        let config = SiteConfig::default();

        generate_homepage(&groups, &dest, &config).unwrap();
        let html = fs::read_to_string(dest.join("index.html")).unwrap();

        assert!(!html.contains(r#""demo-chall": """#));
    }

    #[test]
    fn test_homepage_escapes_metadata() {
        let dir = tempdir().unwrap();
        let groups = vec![group_with_challenge(
            dir.path(),
            r#"{"title": "<img src=x>", "summary": "a & b"}"#,
        )];
        let dest = dir.path().join("out");
        let config = SiteConfig::default();

        generate_homepage(&groups, &dest, &config).unwrap();
        let html = fs::read_to_string(dest.join("index.html")).unwrap();

        assert!(html.contains("&lt;img src=x&gt;"));
        assert!(html.contains("a &amp; b"));
    }

    #[test]
    fn test_homepage_group_membership_map() {
        let dir = tempdir().unwrap();
        let groups = vec![group_with_challenge(dir.path(), "{}")];
        let dest = dir.path().join("out");
        let config = SiteConfig::default();

        generate_homepage(&groups, &dest, &config).unwrap();
        let html = fs::read_to_string(dest.join("index.html")).unwrap();

        assert!(html.contains(r#""demo": ["demo-chall"]"#));
    }
}
