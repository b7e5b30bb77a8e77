//! Substring search over the chunk tree.
//!
//! The walk is post-order: every child is searched before its parent so a
//! parent knows whether anything below it matched. A node matches itself
//! when its label contains the query or, failing that, when its chunk's text
//! dump does. Dumps are only rendered for nodes whose label did not match.
use swbfchunk::{ChunkError, Container};
use tracing::debug;

use super::tree::{ChunkLookup, Highlight, NodeId, TreeModel};

/// Source of text dumps for tree nodes.
pub trait DumpSource {
    /// Dump of the chunk behind `node`; `None` when the node has no chunk.
    fn dump(&self, node: NodeId) -> Option<Result<String, ChunkError>>;
}

/// Dumps rendered from the loaded container.
pub struct ContainerDumps<'a> {
    pub container: Option<&'a Container>,
    pub lookup: &'a ChunkLookup,
}

impl DumpSource for ContainerDumps<'_> {
    fn dump(&self, node: NodeId) -> Option<Result<String, ChunkError>> {
        let chunk = self.lookup.get(node)?;
        Some(self.container?.to_text(chunk))
    }
}

/// Highlight `node` and its subtree for `query`; returns whether anything matched.
///
/// An empty query resets every node to the default look, collapsed.
pub fn search<D: DumpSource + ?Sized>(tree: &mut TreeModel, dumps: &D, node: NodeId, query: &str) -> bool {
    let children = tree.children(node).to_vec();
    let mut in_descendants = false;
    for child in children {
        // No short-circuit: every subtree needs its colors updated.
        in_descendants |= search(tree, dumps, child, query);
    }

    if query.is_empty() {
        tree.set_highlight(node, Highlight::None);
        tree.set_expanded(node, false);
        return false;
    }

    let self_match = match_self(tree, dumps, node, query);
    let highlight = match (self_match, in_descendants) {
        (Some(kind), _) => kind,
        (None, true) => Highlight::Descendant,
        (None, false) => Highlight::None,
    };
    tree.set_highlight(node, highlight);
    tree.set_expanded(node, in_descendants);

    self_match.is_some() || in_descendants
}

fn match_self<D: DumpSource + ?Sized>(tree: &TreeModel, dumps: &D, node: NodeId, query: &str) -> Option<Highlight> {
    let is_root = tree.root() == Some(node);
    let label = tree.node(node)?.label();
    if label.contains(query) {
        return Some(Highlight::Label);
    }
    if is_root {
        return None;
    }
    match dumps.dump(node)? {
        Ok(text) if text.contains(query) => Some(Highlight::Info),
        Ok(_) => None,
        Err(err) => {
            debug!("no dump for {:?} while searching: {}", node, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use swbfchunk::{D3DFormat, TextureError};

    use super::*;

    #[derive(Default)]
    struct FakeDumps {
        texts: HashMap<NodeId, String>,
        failing: Vec<NodeId>,
        calls: Cell<usize>,
    }

    impl DumpSource for FakeDumps {
        fn dump(&self, node: NodeId) -> Option<Result<String, ChunkError>> {
            self.calls.set(self.calls.get() + 1);
            if self.failing.contains(&node) {
                return Some(Err(TextureError::UnsupportedFormat(D3DFormat::Unknown(0)).into()));
            }
            Some(Ok(self.texts.get(&node).cloned().unwrap_or_default()))
        }
    }

    struct Sample {
        tree: TreeModel,
        root: NodeId,
        a: NodeId,
        b: NodeId,
        c: NodeId,
        d: NodeId,
    }

    /// root -> A -> [B -> [D], C]
    fn sample() -> Sample {
        let mut tree = TreeModel::new();
        let root = tree.add_root("file.lvl");
        let a = tree.append(root, "[0] A").unwrap();
        let b = tree.append(a, "[0] B").unwrap();
        let d = tree.append(b, "[0] D").unwrap();
        let c = tree.append(a, "[1] C").unwrap();
        Sample { tree, root, a, b, c, d }
    }

    fn state(tree: &TreeModel, id: NodeId) -> (Highlight, bool) {
        let node = tree.node(id).unwrap();
        (node.highlight(), node.is_expanded())
    }

    #[test]
    fn descendant_match_expands_ancestors() {
        let mut s = sample();
        let dumps = FakeDumps::default();
        assert!(search(&mut s.tree, &dumps, s.root, "D"));

        assert_eq!(state(&s.tree, s.d), (Highlight::Label, false));
        assert_eq!(state(&s.tree, s.b), (Highlight::Descendant, true));
        assert_eq!(state(&s.tree, s.a), (Highlight::Descendant, true));
        assert_eq!(state(&s.tree, s.c), (Highlight::None, false));
        assert_eq!(state(&s.tree, s.root), (Highlight::Descendant, true));
    }

    #[test]
    fn dump_match_uses_info_variant() {
        let mut s = sample();
        let mut dumps = FakeDumps::default();
        dumps.texts.insert(s.c, "Value: \"needle\"".to_string());
        assert!(search(&mut s.tree, &dumps, s.root, "needle"));
        assert_eq!(state(&s.tree, s.c), (Highlight::Info, false));
        assert_eq!(state(&s.tree, s.a), (Highlight::Descendant, true));
    }

    #[test]
    fn self_and_descendant_match_expands_with_self_color() {
        let mut s = sample();
        let dumps = FakeDumps::default();
        // Every label but the root's contains "]".
        assert!(search(&mut s.tree, &dumps, s.root, "]"));
        assert_eq!(state(&s.tree, s.a), (Highlight::Label, true));
        assert_eq!(state(&s.tree, s.b), (Highlight::Label, true));
        assert_eq!(state(&s.tree, s.d), (Highlight::Label, false));
    }

    #[test]
    fn dumps_render_only_when_label_misses() {
        let mut s = sample();
        let dumps = FakeDumps::default();
        search(&mut s.tree, &dumps, s.root, "[");
        // All four chunk labels match; the root never consults a dump.
        assert_eq!(dumps.calls.get(), 0);

        search(&mut s.tree, &dumps, s.root, "zzz");
        assert_eq!(dumps.calls.get(), 4);
    }

    #[test]
    fn dump_errors_count_as_no_match() {
        let mut s = sample();
        let mut dumps = FakeDumps::default();
        dumps.failing.push(s.b);
        assert!(!search(&mut s.tree, &dumps, s.root, "zzz"));
        assert_eq!(state(&s.tree, s.b), (Highlight::None, false));
    }

    #[test]
    fn empty_query_resets_everything() {
        let mut s = sample();
        let dumps = FakeDumps::default();
        search(&mut s.tree, &dumps, s.root, "D");
        assert!(!search(&mut s.tree, &dumps, s.root, ""));
        for id in [s.root, s.a, s.b, s.c, s.d] {
            assert_eq!(state(&s.tree, id), (Highlight::None, false));
        }
    }

    #[test]
    fn search_is_idempotent() {
        let mut s = sample();
        let dumps = FakeDumps::default();
        let first = search(&mut s.tree, &dumps, s.root, "B");
        let snapshot: Vec<_> = s.tree.walk().into_iter().map(|(id, _)| state(&s.tree, id)).collect();
        let second = search(&mut s.tree, &dumps, s.root, "B");
        let again: Vec<_> = s.tree.walk().into_iter().map(|(id, _)| state(&s.tree, id)).collect();
        assert_eq!(first, second);
        assert_eq!(snapshot, again);
    }

    #[test]
    fn root_label_matches_but_root_dump_is_never_read() {
        let mut s = sample();
        let mut dumps = FakeDumps::default();
        dumps.texts.insert(s.root, "secret".to_string());
        assert!(!search(&mut s.tree, &dumps, s.root, "secret"));
        assert!(search(&mut s.tree, &dumps, s.root, "file.lvl"));
        assert_eq!(state(&s.tree, s.root), (Highlight::Label, false));
    }
}
