//! Headless subcommands sharing the explorer core with the GUI.
use std::path::Path;

use anyhow::{Result, bail};
use unicode_width::UnicodeWidthStr;

use crate::explorer::Explorer;

pub mod dump;
pub mod search;
pub mod tree;

/// Load `file`, reporting a partial read on stderr without failing.
fn open_explorer(file: &Path) -> Result<Explorer> {
    let mut explorer = Explorer::new();
    let report = explorer.open(file)?;
    if let Some(err) = report.error {
        eprintln!("warning: {}", err);
        if report.chunks == 0 {
            bail!("no chunks could be read from {}", file.display());
        }
    }
    Ok(explorer)
}

/// Pad a &str to a target display width (columns) using unicode-width.
fn pad_to_width(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    if w >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - w))
    }
}

/// Dotted child-index path, e.g. `0.3.1`.
fn format_path(path: &[usize]) -> String {
    path.iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(".")
}
