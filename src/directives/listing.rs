//! `directory_listing` - nginx-style autoindex generation.
//!
//! Emulates a conventional web-server autoindex page: directories first,
//! fixed-width columns, parent-directory link on top. The same renderer
//! backs the directive and the dev server's fallback listing for
//! directories without an `index.html`.

use crate::utils::{is_hidden_markdown, is_metadata_file};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::{
    ffi::OsStr,
    fs,
    path::Path,
    time::SystemTime,
};

/// Column width the entry name is padded to inside the link.
const NAME_COLUMN: usize = 50;

/// Size column shown for directories instead of a byte count.
const DIR_SIZE_PLACEHOLDER: &str = "   -";

/// An entry of the listed directory. Ephemeral - collected, sorted,
/// rendered, discarded.
struct DirectoryEntry {
    name: String,
    is_dir: bool,
    mtime: SystemTime,
    size: u64,
}

/// Apply the directive: list the directory containing `index_path`,
/// excluding the index file itself.
pub fn apply(index_path: &Path, url_prefix: &str) -> Result<String> {
    let directory = index_path
        .parent()
        .with_context(|| format!("{} has no parent directory", index_path.display()))?;
    render(directory, index_path.file_name(), url_prefix)
}

/// Render an autoindex page for `directory`.
///
/// `skip_name` is the name of the listing file itself (absent for the dev
/// server's fallback listing of a bare directory).
pub fn render(directory: &Path, skip_name: Option<&OsStr>, url_prefix: &str) -> Result<String> {
    let mut entries = collect_entries(directory, skip_name)?;
    entries.sort_by_key(|e| e.name.to_lowercase());

    // Directories first, then files - matching typical nginx behaviour
    let mut lines = vec![r#"<a href="../">../</a>"#.to_owned()];
    let (dirs, files): (Vec<_>, Vec<_>) = entries.into_iter().partition(|e| e.is_dir);
    for entry in dirs.into_iter().chain(files) {
        lines.push(render_entry(&entry));
    }
    let pre_block = lines.join("\n");

    let mut url_prefix = url_prefix.to_owned();
    if !url_prefix.ends_with('/') {
        url_prefix.push('/');
    }

    Ok(format!(
        "<!doctype html>\n\
         <html>\n\
         \x20 <head>\n\
         \x20   <title>Index of {url_prefix}</title>\n\
         \x20 </head>\n\
         \x20 <body>\n\
         \x20   <h1>Index of {url_prefix}</h1>\n\
         \x20   <hr />\n\
         \x20   <pre>{pre_block}\n\
         </pre>\n\
         \x20   <hr />\n\
         \x20   <address>nginx/1.25.3</address>\n\
         \x20 </body>\n\
         </html>\n"
    ))
}

/// Collect visible entries, skipping the listing file itself, hidden
/// markdown and metadata sidecars.
fn collect_entries(directory: &Path, skip_name: Option<&OsStr>) -> Result<Vec<DirectoryEntry>> {
    let mut entries = Vec::new();
    for dir_entry in fs::read_dir(directory)
        .with_context(|| format!("failed to read directory {}", directory.display()))?
    {
        let dir_entry = dir_entry?;
        if skip_name.is_some_and(|skip| dir_entry.file_name() == skip) {
            continue;
        }
        let name = dir_entry.file_name().to_string_lossy().into_owned();
        if is_hidden_markdown(&name) || is_metadata_file(&name) {
            continue;
        }

        let metadata = dir_entry.metadata()?;
        entries.push(DirectoryEntry {
            name,
            is_dir: metadata.is_dir(),
            mtime: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            size: metadata.len(),
        });
    }
    Ok(entries)
}

/// One `<pre>` line: padded link, modification date, size column.
fn render_entry(entry: &DirectoryEntry) -> String {
    let display_name = if entry.is_dir {
        format!("{}/", entry.name)
    } else {
        entry.name.clone()
    };
    let display_len = display_name.chars().count();

    let mut padded_name = display_name.clone();
    for _ in display_len..NAME_COLUMN {
        padded_name.push(' ');
    }

    let padding = " ".repeat((NAME_COLUMN + 1).saturating_sub(display_len).max(1));
    let date_str = format_mtime(entry.mtime);
    let size_str = if entry.is_dir {
        DIR_SIZE_PLACEHOLDER.to_owned()
    } else {
        format!("{:>7}", entry.size)
    };

    format!(r#"<a href="{display_name}">{padded_name}</a>{padding}{date_str} {size_str}"#)
}

/// `dd-Mon-yyyy HH:MM` in UTC, nginx autoindex style.
fn format_mtime(mtime: SystemTime) -> String {
    let datetime: DateTime<Utc> = mtime.into();
    datetime.format("%d-%b-%Y %H:%M").to_string()
}

// ============================================================================
// Tests
// ============================================================================
