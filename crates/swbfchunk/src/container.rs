//! Container handles: one per loaded file, owning every chunk parsed from it.
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::binutil::ParseError;
use crate::chunk::{Chunk, ChunkError, ChunkId, ChunkKind};
use crate::dump;
use crate::parser;
use crate::texture::ImageSource;

/// Which kind of file a container represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// `.lvl` levels and `.zafbin`/`.zaabin` animation banks.
    Level,
    /// `.bnk` sound banks.
    SoundBank,
}

impl ContainerKind {
    /// File extensions accepted by [`ContainerKind::from_extension`].
    pub const EXTENSIONS: [&'static str; 4] = ["lvl", "bnk", "zafbin", "zaabin"];

    /// Map a file extension (case-insensitive, without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "lvl" | "zafbin" | "zaabin" => Some(ContainerKind::Level),
            "bnk" => Some(ContainerKind::SoundBank),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn name(self) -> &'static str {
        match self {
            ContainerKind::Level => "level",
            ContainerKind::SoundBank => "sound bank",
        }
    }
}

/// Failure while populating a container.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {kind} file: {source}")]
    Malformed {
        kind: &'static str,
        #[source]
        source: ParseError,
    },
}

/// Owner of one file's chunk tree.
///
/// Create with [`Container::create`], populate with
/// [`read_from_file`](Container::read_from_file) or
/// [`read_from_bytes`](Container::read_from_bytes). A failed read leaves
/// whatever was parsed before the error in place. Dropping the container
/// invalidates every [`ChunkId`] it handed out.
#[derive(Debug)]
pub struct Container {
    kind: ContainerKind,
    bytes: Vec<u8>,
    chunks: Vec<Chunk>,
    root: Option<ChunkId>,
}

impl Container {
    pub fn create(kind: ContainerKind) -> Self {
        Self {
            kind,
            bytes: Vec::new(),
            chunks: Vec::new(),
            root: None,
        }
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    /// Read and parse `path`. Previous contents are discarded first.
    pub fn read_from_file(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let path = path.as_ref();
        self.reset();
        let bytes = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("reading {} ({} bytes)", path.display(), bytes.len());
        self.read_from_bytes(bytes)
    }

    /// Parse an in-memory file. Previous contents are discarded first.
    pub fn read_from_bytes(&mut self, bytes: Vec<u8>) -> Result<(), LoadError> {
        self.reset();
        let out = parser::parse(&bytes);
        self.bytes = bytes;
        self.chunks = out.chunks;
        self.root = out.root;
        debug!(
            "{} container holds {} chunks",
            self.kind.name(),
            self.chunks.len()
        );
        match out.error {
            None => Ok(()),
            Some(source) => Err(LoadError::Malformed {
                kind: self.kind.name(),
                source,
            }),
        }
    }

    fn reset(&mut self) {
        self.bytes.clear();
        self.chunks.clear();
        self.root = None;
    }

    /// The file's `ucfb` chunk, if one was read.
    pub fn root(&self) -> Option<ChunkId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunk(&self, id: ChunkId) -> Option<&Chunk> {
        self.chunks.get(id.0)
    }

    /// Children of `id` in file order; empty for unknown handles.
    pub fn children(&self, id: ChunkId) -> &[ChunkId] {
        self.chunk(id).map(Chunk::children).unwrap_or(&[])
    }

    /// All chunks in parse (pre-order) order.
    pub fn iter(&self) -> impl Iterator<Item = (ChunkId, &Chunk)> {
        self.chunks.iter().enumerate().map(|(i, c)| (ChunkId(i), c))
    }

    /// Payload bytes of `id`.
    pub fn data(&self, id: ChunkId) -> Option<&[u8]> {
        let chunk = self.chunk(id)?;
        let start = chunk.data_position().min(self.bytes.len());
        let end = (start + chunk.data_size() as usize).min(self.bytes.len());
        Some(&self.bytes[start..end])
    }

    /// Resolve a path of child indices starting below the root.
    ///
    /// An empty path names the root itself.
    pub fn find_path(&self, path: &[usize]) -> Option<ChunkId> {
        let mut current = self.root?;
        for &index in path {
            current = *self.children(current).get(index)?;
        }
        Some(current)
    }

    /// Human-readable dump of a chunk.
    pub fn to_text(&self, id: ChunkId) -> Result<String, ChunkError> {
        let chunk = self.chunk(id).ok_or(ChunkError::UnknownChunk(id))?;
        let data = self.data(id).unwrap_or(&[]);
        let parent_tag = chunk
            .parent()
            .and_then(|p| self.chunk(p))
            .map(|p| p.header.as_bytes());
        dump::render(chunk, data, parent_tag)
    }

    /// Image capability of `id`; `None` unless it is a texture body.
    pub fn image_source(&self, id: ChunkId) -> Option<ImageSource<'_>> {
        match self.chunk(id)?.kind() {
            ChunkKind::TextureBody(body) => Some(ImageSource::new(body, self.data(id)?)),
            ChunkKind::Generic => None,
        }
    }
}
