//! Mirrors a container's chunk graph into the tree model.
use swbfchunk::{ChunkId, Container};
use tracing::warn;

use super::tree::{ChunkLookup, NodeId, TreeModel};

/// Deepest chunk nesting mirrored into the tree.
pub const MAX_PROJECT_DEPTH: usize = 256;

/// Tree label for the chunk at `child_index` under its parent.
pub fn node_label(child_index: usize, header: &str) -> String {
    format!("[{}] {}", child_index, header)
}

pub struct TreeProjector<'a> {
    container: &'a Container,
    tree: &'a mut TreeModel,
    lookup: &'a mut ChunkLookup,
    max_depth: usize,
    truncated: bool,
}

impl<'a> TreeProjector<'a> {
    pub fn new(container: &'a Container, tree: &'a mut TreeModel, lookup: &'a mut ChunkLookup) -> Self {
        Self {
            container,
            tree,
            lookup,
            max_depth: MAX_PROJECT_DEPTH,
            truncated: false,
        }
    }

    /// Stop descending below `max_depth` levels under the projected chunk.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Add `chunk` and its subtree under `parent`, labelled with `child_index`.
    ///
    /// Returns the node created for `chunk`, or `None` if `chunk` or
    /// `parent` no longer resolve.
    pub fn project(&mut self, chunk: ChunkId, parent: NodeId, child_index: usize) -> Option<NodeId> {
        self.project_at(chunk, parent, child_index, 0)
    }

    /// Whether any subtree was cut off at the depth limit.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    fn project_at(&mut self, chunk: ChunkId, parent: NodeId, child_index: usize, depth: usize) -> Option<NodeId> {
        let container = self.container;
        let info = container.chunk(chunk)?;
        let node = self
            .tree
            .append(parent, node_label(child_index, &info.header_name()))?;
        self.lookup.insert(node, chunk);

        if depth >= self.max_depth {
            if !info.children().is_empty() {
                warn!(
                    "chunk at 0x{:08X} nested deeper than {} levels; children not shown",
                    info.position(),
                    self.max_depth
                );
                self.truncated = true;
            }
            return Some(node);
        }

        for (i, &child) in info.children().iter().enumerate() {
            self.project_at(child, node, i, depth + 1);
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use swbfchunk::{ChunkBuilder, ContainerKind};

    use super::*;

    fn load(builder: ChunkBuilder) -> Container {
        let mut c = Container::create(ContainerKind::Level);
        c.read_from_bytes(builder.to_bytes()).unwrap();
        c
    }

    fn project_all(c: &Container) -> (TreeModel, ChunkLookup) {
        let mut tree = TreeModel::new();
        let mut lookup = ChunkLookup::default();
        let root = tree.add_root("test.lvl");
        TreeProjector::new(c, &mut tree, &mut lookup).project(c.root().unwrap(), root, 0);
        (tree, lookup)
    }

    fn sample() -> Container {
        load(
            ChunkBuilder::ucfb()
                .with_child(
                    ChunkBuilder::new(b"scr_")
                        .with_child(ChunkBuilder::string(b"NAME", "geo1"))
                        .with_child(ChunkBuilder::new(b"BODY").with_data(vec![9u8; 12])),
                )
                .with_child(ChunkBuilder::new(b"DATA").with_data(vec![1, 2, 3])),
        )
    }

    #[test]
    fn one_node_per_chunk_plus_root() {
        let c = sample();
        let (tree, lookup) = project_all(&c);
        assert_eq!(tree.len(), c.len() + 1);
        assert_eq!(lookup.len(), c.len());
        assert!(lookup.get(tree.root().unwrap()).is_none());
    }

    #[test]
    fn labels_carry_child_index_and_header() {
        let c = sample();
        let (tree, _) = project_all(&c);
        let labels: Vec<String> = tree
            .walk()
            .into_iter()
            .map(|(id, depth)| format!("{}{}", "  ".repeat(depth), tree.node(id).unwrap().label()))
            .collect();
        assert_eq!(
            labels,
            vec![
                "test.lvl",
                "  [0] ucfb",
                "    [0] scr_",
                "      [0] NAME",
                "      [1] BODY",
                "    [1] DATA",
            ]
        );
    }

    #[test]
    fn lookup_maps_back_to_the_same_chunk_path() {
        let c = sample();
        let (tree, lookup) = project_all(&c);
        for (id, _) in c.iter() {
            // Tree path below the synthetic root is [0] followed by the chunk path.
            let mut chunk_path = Vec::new();
            let mut cur = id;
            while let Some(parent) = c.chunk(cur).unwrap().parent() {
                let index = c.children(parent).iter().position(|&x| x == cur).unwrap();
                chunk_path.push(index);
                cur = parent;
            }
            chunk_path.reverse();

            let mut tree_path = vec![0];
            tree_path.extend(&chunk_path);
            let node = tree.find_path(&tree_path).unwrap();
            assert_eq!(lookup.get(node), Some(id));
        }
    }

    #[test]
    fn parser_nesting_cap_fits_inside_projection_limit() {
        let mut builder = ChunkBuilder::new(b"DEEP").with_data(vec![7u8; 4]);
        for _ in 0..(swbfchunk::MAX_PARSE_DEPTH + 8) {
            builder = ChunkBuilder::new(b"WRAP").with_child(builder);
        }
        let c = load(ChunkBuilder::ucfb().with_child(builder));

        let mut tree = TreeModel::new();
        let mut lookup = ChunkLookup::default();
        let root = tree.add_root("deep.lvl");
        let mut projector = TreeProjector::new(&c, &mut tree, &mut lookup);
        projector.project(c.root().unwrap(), root, 0);
        assert!(!projector.truncated());
        assert_eq!(lookup.len(), c.len());
    }

    #[test]
    fn subtrees_below_the_depth_limit_are_cut() {
        // ucfb / WRAP x9 / LEAF: eleven chunks, depths 0 to 10.
        let mut builder = ChunkBuilder::new(b"LEAF").with_data(vec![7u8; 4]);
        for _ in 0..9 {
            builder = ChunkBuilder::new(b"WRAP").with_child(builder);
        }
        let c = load(ChunkBuilder::ucfb().with_child(builder));
        assert_eq!(c.len(), 11);

        let mut tree = TreeModel::new();
        let mut lookup = ChunkLookup::default();
        let root = tree.add_root("deep.lvl");
        let mut projector = TreeProjector::new(&c, &mut tree, &mut lookup).with_max_depth(3);
        projector.project(c.root().unwrap(), root, 0);
        assert!(projector.truncated());

        // Depths 0 to 3 are kept.
        assert_eq!(lookup.len(), 4);
        assert_eq!(tree.len(), 5);
        let cut = tree.find_path(&[0, 0, 0, 0]).unwrap();
        assert_eq!(tree.node(cut).unwrap().label(), "[0] WRAP");
        assert!(tree.children(cut).is_empty());
    }
}
