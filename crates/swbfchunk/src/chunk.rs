//! Chunk records held by a [`Container`](crate::Container).
//!
//! Chunks live in a flat arena owned by the container and refer to each
//! other through [`ChunkId`] handles. A handle is only meaningful for the
//! container that produced it; once the container is dropped every handle
//! it issued is stale.
use std::fmt;

use thiserror::Error;

use crate::binutil::ParseError;
use crate::texture::{TextureBody, TextureError};

/// A four-character chunk tag such as `ucfb`, `tex_` or `BODY`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const UCFB: FourCC = FourCC(*b"ucfb");

    pub const fn new(tag: &[u8; 4]) -> Self {
        FourCC(*tag)
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Whether every byte is a character that appears in real chunk tags.
    pub fn is_plausible(&self) -> bool {
        self.0
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || *b == b'_' || *b == b' ')
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCC(\"{}\")", self)
    }
}

impl PartialEq<&[u8; 4]> for FourCC {
    fn eq(&self, other: &&[u8; 4]) -> bool {
        &self.0 == *other
    }
}

/// Non-owning handle to a chunk inside a container's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkId(pub(crate) usize);

impl ChunkId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Variant-specific payload of a chunk.
#[derive(Clone, Debug, PartialEq)]
pub enum ChunkKind {
    /// Any chunk without a specialised interpretation.
    Generic,
    /// Pixel data of one mip level of a texture face.
    TextureBody(TextureBody),
}

/// One chunk of a parsed file.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    pub(crate) header: FourCC,
    pub(crate) position: usize,
    pub(crate) data_size: u32,
    pub(crate) full_size: usize,
    pub(crate) parent: Option<ChunkId>,
    pub(crate) children: Vec<ChunkId>,
    pub(crate) kind: ChunkKind,
}

impl Chunk {
    pub fn header(&self) -> FourCC {
        self.header
    }

    /// Header tag rendered as text.
    pub fn header_name(&self) -> String {
        self.header.to_string()
    }

    /// Byte offset of the chunk tag within the file.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Value of the chunk's size field (payload bytes, excluding the header).
    pub fn data_size(&self) -> u32 {
        self.data_size
    }

    /// Bytes occupied by the chunk in the file: header, payload and padding.
    pub fn full_size(&self) -> usize {
        self.full_size
    }

    /// Offset of the first payload byte.
    pub fn data_position(&self) -> usize {
        self.position + 8
    }

    pub fn parent(&self) -> Option<ChunkId> {
        self.parent
    }

    /// Child handles in file order.
    pub fn children(&self) -> &[ChunkId] {
        &self.children
    }

    pub fn kind(&self) -> &ChunkKind {
        &self.kind
    }
}

/// Errors surfaced by chunk accessors after a file has been loaded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChunkError {
    /// The handle does not belong to this container (or the container was reset).
    #[error("unknown chunk handle {0:?}")]
    UnknownChunk(ChunkId),

    /// A typed field could not be decoded while rendering the chunk.
    #[error("failed to decode '{tag}' at 0x{position:X}: {source}")]
    Decode {
        tag: String,
        position: usize,
        #[source]
        source: ParseError,
    },

    /// The texture payload could not be converted to pixels.
    #[error(transparent)]
    Texture(#[from] TextureError),
}
