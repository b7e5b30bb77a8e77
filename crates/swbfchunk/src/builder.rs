//! Chunk tree builder.
//!
//! `ChunkBuilder` assembles a tree of chunks in memory and serializes it to
//! UCFB bytes that [`Container::read_from_bytes`](crate::Container::read_from_bytes)
//! reads back. It is mainly used to produce fixtures.
//!
//! ```
//! use swbfchunk::{ChunkBuilder, Container, ContainerKind};
//!
//! let bytes = ChunkBuilder::ucfb()
//!     .with_child(ChunkBuilder::string(b"NAME", "kas2"))
//!     .to_bytes();
//!
//! let mut container = Container::create(ContainerKind::Level);
//! container.read_from_bytes(bytes).unwrap();
//! assert_eq!(container.len(), 2);
//! ```
use crate::chunk::FourCC;
use crate::texture::{D3DFormat, FormatInfo, LevelInfo};

#[derive(Clone, Debug)]
pub struct ChunkBuilder {
    tag: FourCC,
    prefix: Vec<u8>,
    data: Vec<u8>,
    children: Vec<ChunkBuilder>,
}

impl ChunkBuilder {
    pub fn new(tag: &[u8; 4]) -> Self {
        Self {
            tag: FourCC(*tag),
            prefix: Vec::new(),
            data: Vec::new(),
            children: Vec::new(),
        }
    }

    /// The file root.
    pub fn ucfb() -> Self {
        Self::new(b"ucfb")
    }

    /// A leaf holding a NUL-terminated string.
    pub fn string(tag: &[u8; 4], value: &str) -> Self {
        let mut data = value.as_bytes().to_vec();
        data.push(0);
        Self::new(tag).with_data(data)
    }

    /// Raw payload bytes, written before any children.
    pub fn with_data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.data = data.into();
        self
    }

    /// Bytes written ahead of everything else in the payload (the `lvl_`
    /// name hash and size, for instance).
    pub fn with_prefix(mut self, prefix: impl Into<Vec<u8>>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_child(mut self, child: ChunkBuilder) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = ChunkBuilder>) -> Self {
        self.children.extend(children);
        self
    }

    /// A `tex_` chunk with one format and one face whose mip levels hold `levels`.
    pub fn texture(name: &str, format: D3DFormat, width: u16, height: u16, levels: Vec<Vec<u8>>) -> Self {
        let info = FormatInfo {
            format,
            width,
            height,
            depth: 1,
            mip_count: levels.len() as u16,
            detail_bias: 0,
        };
        let face = ChunkBuilder::new(b"FACE").with_children(levels.into_iter().enumerate().map(
            |(mip, body)| {
                let level = LevelInfo {
                    mip_level: mip as u32,
                    body_size: body.len() as u32,
                };
                ChunkBuilder::new(b"LVL_")
                    .with_child(ChunkBuilder::new(b"INFO").with_data(level.to_bytes().to_vec()))
                    .with_child(ChunkBuilder::new(b"BODY").with_data(body))
            },
        ));
        ChunkBuilder::new(b"tex_")
            .with_child(ChunkBuilder::string(b"NAME", name))
            .with_child(
                ChunkBuilder::new(b"INFO")
                    .with_data([1u32.to_le_bytes(), format.to_u32().to_le_bytes()].concat()),
            )
            .with_child(
                ChunkBuilder::new(b"FMT_")
                    .with_child(ChunkBuilder::new(b"INFO").with_data(info.to_bytes().to_vec()))
                    .with_child(face),
            )
    }

    /// Serialize the chunk, including trailing padding to a four-byte boundary.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut payload = Vec::new();
        payload.extend_from_slice(&self.prefix);
        payload.extend_from_slice(&self.data);
        for child in &self.children {
            payload.extend(child.to_bytes());
        }

        let mut out = Vec::with_capacity(8 + payload.len() + 3);
        out.extend_from_slice(self.tag.as_bytes());
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend(payload);
        while out.len() % 4 != 0 {
            out.push(0);
        }
        out
    }
}
