use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, ContentArrangement, Table, presets::NOTHING};

use super::open_explorer;
use crate::explorer::Explorer;

/// Print every node of the projected tree with its chunk's position and sizes.
pub fn print_tree(file: &Path) -> Result<()> {
    let explorer = open_explorer(file)?;

    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_content_arrangement(ContentArrangement::Disabled);
    table.set_header(vec![
        Cell::new("Chunk"),
        Cell::new("Position"),
        Cell::new("Data size"),
        Cell::new("Full size"),
    ]);
    for row in tree_rows(&explorer) {
        table.add_row(row.iter().map(Cell::new).collect::<Vec<_>>());
    }
    println!("{}", table);
    Ok(())
}

/// One row per tree node, indented by depth. The synthetic root has no sizes.
pub fn tree_rows(explorer: &Explorer) -> Vec<[String; 4]> {
    let tree = explorer.tree();
    let mut rows = Vec::with_capacity(tree.len());
    for (id, depth) in tree.walk() {
        let Some(node) = tree.node(id) else {
            continue;
        };
        let label = format!("{}{}", "  ".repeat(depth), node.label());
        let chunk = explorer
            .lookup(id)
            .and_then(|c| explorer.container().and_then(|container| container.chunk(c)));
        rows.push(match chunk {
            Some(chunk) => [
                label,
                format!("0x{:08X}", chunk.position()),
                chunk.data_size().to_string(),
                chunk.full_size().to_string(),
            ],
            None => [label, String::new(), String::new(), String::new()],
        });
    }
    rows
}
