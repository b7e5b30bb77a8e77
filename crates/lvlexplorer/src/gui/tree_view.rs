//! Chunk tree drawn from the tree model.
//!
//! Drawing only reads the model. Clicks are collected as [`TreeAction`]s and
//! applied by the caller once the frame's drawing is done.
use eframe::egui;

use crate::explorer::tree::{NodeId, TreeModel};

const TOGGLE_WIDTH: f32 = 16.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeAction {
    Select(NodeId),
    Toggle(NodeId),
}

/// Draw the whole tree, returning what the user clicked.
pub fn show_tree(ui: &mut egui::Ui, tree: &TreeModel, selected: Option<NodeId>) -> Vec<TreeAction> {
    let mut actions = Vec::new();
    if let Some(root) = tree.root() {
        draw_node(ui, tree, root, selected, &mut actions);
    }
    actions
}

fn draw_node(
    ui: &mut egui::Ui,
    tree: &TreeModel,
    id: NodeId,
    selected: Option<NodeId>,
    actions: &mut Vec<TreeAction>,
) {
    let Some(node) = tree.node(id) else {
        return;
    };
    let colors = node.colors();
    let has_children = !node.children().is_empty();

    ui.horizontal(|ui| {
        if has_children {
            let arrow = if node.is_expanded() { "-" } else { "+" };
            let toggle = ui.add_sized(
                [TOGGLE_WIDTH, TOGGLE_WIDTH],
                egui::Button::new(egui::RichText::new(arrow).monospace()).small(),
            );
            if toggle.clicked() {
                actions.push(TreeAction::Toggle(id));
            }
        } else {
            ui.add_space(TOGGLE_WIDTH + ui.spacing().item_spacing.x);
        }

        let text = egui::RichText::new(node.label())
            .monospace()
            .color(colors.foreground)
            .background_color(colors.background);
        let label = ui.add(egui::SelectableLabel::new(selected == Some(id), text));
        if label.clicked() {
            actions.push(TreeAction::Select(id));
        }
        if has_children && label.double_clicked() {
            actions.push(TreeAction::Toggle(id));
        }
    });

    if has_children && node.is_expanded() {
        ui.indent(id, |ui| {
            for &child in node.children() {
                draw_node(ui, tree, child, selected, actions);
            }
        });
    }
}
