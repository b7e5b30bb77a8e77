use std::path::Path;

use anyhow::Result;
use unicode_width::UnicodeWidthStr;

use super::{format_path, open_explorer, pad_to_width};
use crate::explorer::Explorer;
use crate::explorer::tree::Highlight;

/// A highlighted node: dotted tree path, label and why it is highlighted.
#[derive(Debug, PartialEq, Eq)]
pub struct MatchRow {
    pub path: String,
    pub label: String,
    pub reason: &'static str,
}

fn reason(highlight: Highlight) -> Option<&'static str> {
    match highlight {
        Highlight::None => None,
        Highlight::Label => Some("label"),
        Highlight::Info => Some("contents"),
        Highlight::Descendant => Some("descendant"),
    }
}

/// Run the search and list every highlighted node in tree order.
pub fn match_rows(explorer: &mut Explorer, query: &str) -> Vec<MatchRow> {
    explorer.search(query);
    let tree = explorer.tree();
    tree.walk()
        .into_iter()
        .filter_map(|(id, _)| {
            let node = tree.node(id)?;
            Some(MatchRow {
                path: format_path(&tree.path_of(id)?),
                label: node.label().to_string(),
                reason: reason(node.highlight())?,
            })
        })
        .collect()
}

pub fn search_file(file: &Path, query: &str) -> Result<()> {
    let mut explorer = open_explorer(file)?;
    let rows = match_rows(&mut explorer, query);
    if rows.is_empty() {
        println!("no matches for '{}'", query);
        return Ok(());
    }

    let path_w = rows
        .iter()
        .map(|r| UnicodeWidthStr::width(r.path.as_str()))
        .max()
        .unwrap_or(0)
        .max(UnicodeWidthStr::width("Path"));
    let label_w = rows
        .iter()
        .map(|r| UnicodeWidthStr::width(r.label.as_str()))
        .max()
        .unwrap_or(0)
        .max(UnicodeWidthStr::width("Node"));

    println!("{}  {}  Match", pad_to_width("Path", path_w), pad_to_width("Node", label_w));
    for row in &rows {
        println!(
            "{}  {}  {}",
            pad_to_width(&row.path, path_w),
            pad_to_width(&row.label, label_w),
            row.reason
        );
    }
    Ok(())
}
