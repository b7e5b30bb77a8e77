//! Toolkit-independent tree model backing the chunk tree view.
//!
//! Nodes live in an arena owned by [`TreeModel`]. Every [`NodeId`] carries
//! the generation of the tree it was issued by; clearing the tree bumps the
//! generation so ids from a previous file never resolve against the next one.
use std::collections::HashMap;

use eframe::egui::Color32;
use swbfchunk::ChunkId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    generation: u32,
    index: usize,
}

/// Node colors reflecting search state.
pub mod palette {
    use eframe::egui::Color32;

    pub const ITEM: Color32 = Color32::from_rgb(0, 0, 0);
    pub const ITEM_BACKGROUND: Color32 = Color32::from_rgb(255, 255, 255);
    pub const FOUND: Color32 = Color32::from_rgb(0, 220, 0);
    pub const FOUND_IN_INFO: Color32 = Color32::from_rgb(200, 100, 100);
    pub const FOUND_BACKGROUND: Color32 = Color32::from_rgb(32, 32, 32);
    pub const FOUND_CHILDREN: Color32 = Color32::from_rgb(220, 220, 0);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeColors {
    pub foreground: Color32,
    pub background: Color32,
}

/// Search classification of a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Highlight {
    /// Not matched, or no search active.
    #[default]
    None,
    /// The node's label contains the query.
    Label,
    /// The chunk's text dump contains the query.
    Info,
    /// Only descendants matched.
    Descendant,
}

impl Highlight {
    pub fn colors(self) -> NodeColors {
        let (foreground, background) = match self {
            Highlight::None => (palette::ITEM, palette::ITEM_BACKGROUND),
            Highlight::Label => (palette::FOUND, palette::FOUND_BACKGROUND),
            Highlight::Info => (palette::FOUND_IN_INFO, palette::FOUND_BACKGROUND),
            Highlight::Descendant => (palette::FOUND_CHILDREN, palette::FOUND_BACKGROUND),
        };
        NodeColors {
            foreground,
            background,
        }
    }
}

#[derive(Clone, Debug)]
pub struct TreeNode {
    label: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    highlight: Highlight,
    expanded: bool,
}

impl TreeNode {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn highlight(&self) -> Highlight {
        self.highlight
    }

    pub fn colors(&self) -> NodeColors {
        self.highlight.colors()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }
}

#[derive(Debug, Default)]
pub struct TreeModel {
    generation: u32,
    nodes: Vec<TreeNode>,
    root: Option<NodeId>,
}

impl TreeModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every node. Ids issued before the call stop resolving.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Replace the tree with a single root labelled `label`.
    pub fn add_root(&mut self, label: impl Into<String>) -> NodeId {
        self.clear();
        let id = self.push(label.into(), None);
        self.root = Some(id);
        id
    }

    /// Append a child under `parent`. Returns `None` when `parent` is stale.
    pub fn append(&mut self, parent: NodeId, label: impl Into<String>) -> Option<NodeId> {
        self.node(parent)?;
        let id = self.push(label.into(), Some(parent));
        self.nodes[parent.index].children.push(id);
        Some(id)
    }

    fn push(&mut self, label: String, parent: Option<NodeId>) -> NodeId {
        let id = NodeId {
            generation: self.generation,
            index: self.nodes.len(),
        };
        self.nodes.push(TreeNode {
            label,
            parent,
            children: Vec::new(),
            highlight: Highlight::None,
            expanded: false,
        });
        id
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        if id.generation != self.generation {
            return None;
        }
        self.nodes.get(id.index)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        if id.generation != self.generation {
            return None;
        }
        self.nodes.get_mut(id.index)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(TreeNode::children).unwrap_or(&[])
    }

    pub fn set_highlight(&mut self, id: NodeId, highlight: Highlight) {
        if let Some(node) = self.node_mut(id) {
            node.highlight = highlight;
        }
    }

    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) {
        if let Some(node) = self.node_mut(id) {
            node.expanded = expanded;
        }
    }

    pub fn toggle_expanded(&mut self, id: NodeId) {
        if let Some(node) = self.node_mut(id) {
            node.expanded = !node.expanded;
        }
    }

    /// Follow child indices from the root.
    pub fn find_path(&self, path: &[usize]) -> Option<NodeId> {
        let mut current = self.root?;
        for &i in path {
            current = *self.children(current).get(i)?;
        }
        Some(current)
    }

    /// Child indices leading from the root to `id`.
    pub fn path_of(&self, id: NodeId) -> Option<Vec<usize>> {
        let mut path = Vec::new();
        let mut current = id;
        while let Some(parent) = self.node(current)?.parent {
            let index = self.children(parent).iter().position(|&c| c == current)?;
            path.push(index);
            current = parent;
        }
        path.reverse();
        Some(path)
    }

    /// Pre-order walk yielding each node with its depth below the root.
    pub fn walk(&self) -> Vec<(NodeId, usize)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|r| (r, 0)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            out.push((id, depth));
            for &child in self.children(id).iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        out
    }
}

/// Tree node to chunk handle mapping, rebuilt per loaded file.
#[derive(Debug, Default)]
pub struct ChunkLookup {
    map: HashMap<NodeId, ChunkId>,
}

impl ChunkLookup {
    pub fn insert(&mut self, node: NodeId, chunk: ChunkId) {
        self.map.insert(node, chunk);
    }

    pub fn get(&self, node: NodeId) -> Option<ChunkId> {
        self.map.get(&node).copied()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (TreeModel, NodeId, NodeId, NodeId) {
        let mut t = TreeModel::new();
        let root = t.add_root("file.lvl");
        let a = t.append(root, "[0] ucfb").unwrap();
        t.append(a, "[0] tex_").unwrap();
        let c = t.append(a, "[1] scr_").unwrap();
        (t, root, a, c)
    }

    #[test]
    fn paths_round_trip() {
        let (t, root, a, c) = sample();
        assert_eq!(t.path_of(root), Some(vec![]));
        assert_eq!(t.path_of(c), Some(vec![0, 1]));
        assert_eq!(t.find_path(&[0, 1]), Some(c));
        assert_eq!(t.find_path(&[0]), Some(a));
        assert_eq!(t.find_path(&[0, 2]), None);
    }

    #[test]
    fn clearing_invalidates_old_ids() {
        let (mut t, root, a, _) = sample();
        t.clear();
        assert!(t.node(root).is_none());
        let new_root = t.add_root("other.lvl");
        let new_a = t.append(new_root, "[0] ucfb").unwrap();
        assert!(t.node(a).is_none());
        assert!(t.append(a, "stale").is_none());
        assert_ne!(a, new_a);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn walk_is_preorder_with_depth() {
        let (t, ..) = sample();
        let labels: Vec<(String, usize)> = t
            .walk()
            .into_iter()
            .map(|(id, d)| (t.node(id).unwrap().label().to_string(), d))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("file.lvl".to_string(), 0),
                ("[0] ucfb".to_string(), 1),
                ("[0] tex_".to_string(), 2),
                ("[1] scr_".to_string(), 2),
            ]
        );
    }

    #[test]
    fn highlight_colors_follow_palette() {
        assert_eq!(
            Highlight::Descendant.colors(),
            NodeColors {
                foreground: palette::FOUND_CHILDREN,
                background: palette::FOUND_BACKGROUND,
            }
        );
        assert_eq!(Highlight::None.colors().background, palette::ITEM_BACKGROUND);
    }
}
