use std::path::Path;

use anyhow::{Context, Result, anyhow};

use super::open_explorer;
use crate::explorer::display::DisplayMode;

/// Parse a dotted child-index path. Empty input names the file's root chunk.
pub fn parse_chunk_path(text: &str) -> Result<Vec<usize>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split('.')
        .map(|part| {
            part.trim()
                .parse::<usize>()
                .with_context(|| format!("invalid path component '{}' in '{}'", part, text))
        })
        .collect()
}

/// Select the chunk at `chunk_path` below the file root and print what the viewer would show.
pub fn dump_chunk(file: &Path, chunk_path: Option<&str>) -> Result<()> {
    let path = parse_chunk_path(chunk_path.unwrap_or(""))?;
    let mut explorer = open_explorer(file)?;

    // The tree's first level holds the file's root chunk.
    let mut tree_path = vec![0];
    tree_path.extend(&path);
    let node = explorer
        .tree()
        .find_path(&tree_path)
        .ok_or_else(|| anyhow!("no chunk at path '{}'", chunk_path.unwrap_or("")))?;
    explorer.select(node)?;

    if let Some(info) = explorer.info() {
        println!("{}", info);
        println!();
    }
    let display = explorer.display();
    match display.mode() {
        DisplayMode::Image => {
            if let Some(image) = display.image() {
                println!(
                    "Image: {} x {} ({} RGB bytes)",
                    image.width(),
                    image.height(),
                    image.rgb().len()
                );
            }
            // The dump is still useful alongside the pixel summary.
            if let Some(id) = explorer.lookup(node) {
                if let Some(container) = explorer.container() {
                    println!("{}", container.to_text(id)?);
                }
            }
        }
        DisplayMode::Text => println!("{}", display.text()),
        DisplayMode::None => {}
    }
    Ok(())
}
