//! The line source: reads a script file and hands the parser an ordered
//! sequence of trimmed, non-empty, non-comment lines. Original 1-based
//! line numbers ride along for error messages.

use std::path::Path;

use anyhow::{Context, Result};

use crate::model::SourceLine;

/// Read a script from disk. A path without an extension gets `.txt`
/// appended, so `tale my_story` finds `my_story.txt`.
pub fn load_file(path: &Path) -> Result<Vec<SourceLine>> {
    let path = if path.extension().is_none() {
        path.with_extension("txt")
    } else {
        path.to_path_buf()
    };

    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("Reading {}", path.display()))?;
    Ok(clean_lines(&raw))
}

/// Trim every line, drop blanks and `#` comments, keep line numbers.
pub fn clean_lines(raw: &str) -> Vec<SourceLine> {
    raw.lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let text = line.trim();
            if text.is_empty() || text.starts_with('#') {
                None
            } else {
                Some(SourceLine {
                    number: i + 1,
                    text: text.to_string(),
                })
            }
        })
        .collect()
}
