//! The viewer core: one loaded file projected into a tree model, searched and
//! inspected without any dependency on a window.
//!
//! [`Explorer`] owns the loaded [`Container`] together with the tree and the
//! node to chunk lookup built from it. Closing a file clears the tree and the
//! lookup before the container is dropped, so no node ever resolves to a
//! chunk that no longer exists.
use std::fmt;
use std::path::Path;

use swbfchunk::{ChunkId, Container, ContainerKind, ImageFormat, LoadError};
use thiserror::Error;
use tracing::{error, info, warn};

pub mod display;
pub mod projector;
pub mod search;
pub mod tree;

use display::{DisplayPane, ImageBuffer};
use projector::TreeProjector;
use search::ContainerDumps;
use tree::{ChunkLookup, NodeId, TreeModel};

#[derive(Debug, Error)]
pub enum OpenError {
    #[error("unsupported file type: {}", .0)]
    UnknownExtension(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectError {
    #[error("no chunk behind tree node {0:?}")]
    LookupMiss(NodeId),
}

/// Outcome of loading a file into the explorer.
#[derive(Debug)]
pub struct LoadReport {
    pub root: NodeId,
    pub chunks: usize,
    /// Set when the file could only be read partially (or not at all).
    pub error: Option<LoadError>,
}

/// Position and sizes of the selected chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkInfo {
    pub position: usize,
    pub data_size: u32,
    pub full_size: usize,
}

impl fmt::Display for ChunkInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Position: 0x{:08X}   Data size: {}   Full size: {}",
            self.position, self.data_size, self.full_size
        )
    }
}

/// A loaded file.
struct Session {
    file_name: String,
    container: Container,
}

#[derive(Default)]
pub struct Explorer {
    session: Option<Session>,
    tree: TreeModel,
    lookup: ChunkLookup,
    display: DisplayPane,
    info: Option<ChunkInfo>,
    selected: Option<NodeId>,
    query: String,
}

impl Explorer {
    pub fn new() -> Self {
        let mut explorer = Self::default();
        explorer.display.show_text(String::new());
        explorer
    }

    /// Load `path`, replacing whatever was open.
    ///
    /// Read failures do not fail the call: the report carries the error and
    /// whatever was parsed before it is still projected.
    pub fn open(&mut self, path: &Path) -> Result<LoadReport, OpenError> {
        let kind = ContainerKind::from_path(path)
            .ok_or_else(|| OpenError::UnknownExtension(path.display().to_string()))?;
        self.close();

        let mut container = Container::create(kind);
        let result = container.read_from_file(path);
        if let Err(err) = &result {
            error!("errors occurred while opening {}: {}", path.display(), err);
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(self.install(file_name, container, result.err()))
    }

    /// Load an in-memory file, replacing whatever was open.
    pub fn open_bytes(&mut self, file_name: &str, kind: ContainerKind, bytes: Vec<u8>) -> LoadReport {
        self.close();
        let mut container = Container::create(kind);
        let result = container.read_from_bytes(bytes);
        if let Err(err) = &result {
            error!("errors occurred while opening {}: {}", file_name, err);
        }
        self.install(file_name.to_string(), container, result.err())
    }

    fn install(&mut self, file_name: String, container: Container, error: Option<LoadError>) -> LoadReport {
        let root = self.tree.add_root(file_name.as_str());
        if let Some(chunk_root) = container.root() {
            let mut projector = TreeProjector::new(&container, &mut self.tree, &mut self.lookup);
            projector.project(chunk_root, root, 0);
        }
        info!(
            "{}: {} chunks, {} tree nodes",
            file_name,
            container.len(),
            self.tree.len()
        );
        let chunks = container.len();
        self.session = Some(Session {
            file_name,
            container,
        });

        if !self.query.is_empty() {
            let query = std::mem::take(&mut self.query);
            self.search(&query);
        }
        LoadReport {
            root,
            chunks,
            error,
        }
    }

    /// Drop the loaded file. Tree and lookup are cleared before the container goes.
    pub fn close(&mut self) {
        self.tree.clear();
        self.lookup.clear();
        self.selected = None;
        self.info = None;
        self.display.reset();
        self.session = None;
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.file_name.as_str())
    }

    pub fn container(&self) -> Option<&Container> {
        self.session.as_ref().map(|s| &s.container)
    }

    pub fn tree(&self) -> &TreeModel {
        &self.tree
    }

    pub fn toggle_expanded(&mut self, node: NodeId) {
        self.tree.toggle_expanded(node);
    }

    pub fn lookup(&self, node: NodeId) -> Option<ChunkId> {
        self.lookup.get(node)
    }

    pub fn display(&self) -> &DisplayPane {
        &self.display
    }

    pub fn info(&self) -> Option<ChunkInfo> {
        self.info
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Highlight the tree for `query`; returns whether anything matched.
    pub fn search(&mut self, query: &str) -> bool {
        self.query = query.to_string();
        let Some(root) = self.tree.root() else {
            return false;
        };
        let dumps = ContainerDumps {
            container: self.session.as_ref().map(|s| &s.container),
            lookup: &self.lookup,
        };
        search::search(&mut self.tree, &dumps, root, query)
    }

    /// Show the chunk behind `node`: its image when it has one, its dump otherwise.
    pub fn select(&mut self, node: NodeId) -> Result<(), SelectError> {
        let miss = || {
            error!("tree node {:?} has no chunk", node);
            SelectError::LookupMiss(node)
        };
        let chunk_id = self.lookup.get(node).ok_or_else(miss)?;
        let container = self.session.as_ref().map(|s| &s.container).ok_or_else(miss)?;
        let chunk = container.chunk(chunk_id).ok_or_else(miss)?;

        self.selected = Some(node);
        self.info = Some(ChunkInfo {
            position: chunk.position(),
            data_size: chunk.data_size(),
            full_size: chunk.full_size(),
        });

        if let Some(source) = container.image_source(chunk_id) {
            match source.image_data(ImageFormat::R8G8B8A8) {
                Ok(image) => {
                    let buffer = ImageBuffer::from_rgba(image.width, image.height, &image.pixels);
                    self.display.show_image(buffer);
                    return Ok(());
                }
                Err(err) => warn!(
                    "cannot decode texture at 0x{:08X}: {}",
                    chunk.position(),
                    err
                ),
            }
        }

        let text = match container.to_text(chunk_id) {
            Ok(text) => text,
            Err(err) => {
                warn!("cannot dump chunk at 0x{:08X}: {}", chunk.position(), err);
                format!("Error: {}", err)
            }
        };
        self.display.show_text(text);
        Ok(())
    }
}
