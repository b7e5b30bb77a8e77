//! swbfchunk: chunk-tree reader for Star Wars Battlefront II (2005) containers
//!
//! Level files (`.lvl`), sound banks (`.bnk`) and animation banks
//! (`.zafbin`, `.zaabin`) share the UCFB chunk framing: a four-character
//! tag, a little-endian `u32` payload size and the payload, padded to four
//! bytes, nesting arbitrarily. This crate reads that framing into an
//! in-memory tree and exposes it through a small handle-based API:
//!
//! - [`Container`] owns one file's chunks. It is created per file, populated
//!   with [`Container::read_from_file`] and dropped to release everything.
//!   A failed read keeps the chunks parsed before the error.
//! - [`ChunkId`] is a non-owning handle into a container. Accessors on the
//!   container give position, data size, full size, header tag, ordered
//!   children and a text dump ([`Container::to_text`]).
//! - Texture bodies (`tex_/FMT_/FACE/LVL_/BODY`) additionally expose an
//!   [`ImageSource`] through [`Container::image_source`], which decodes the
//!   pixels to a fixed channel layout.
//! - [`ChunkBuilder`] writes chunk trees back to bytes, which is handy for
//!   fixtures.
//!
//! Beyond the framing and texture bodies the payloads are not interpreted.
//!
//! Example: walking a file
//!
//! ```rust
//! use swbfchunk::{ChunkBuilder, ChunkId, Container, ContainerKind};
//!
//! let bytes = ChunkBuilder::ucfb()
//!     .with_child(
//!         ChunkBuilder::new(b"scr_")
//!             .with_child(ChunkBuilder::string(b"NAME", "geo1")),
//!     )
//!     .to_bytes();
//!
//! let mut container = Container::create(ContainerKind::Level);
//! container.read_from_bytes(bytes).expect("well-formed fixture");
//!
//! fn walk(c: &Container, id: ChunkId, depth: usize, out: &mut Vec<String>) {
//!     let chunk = c.chunk(id).unwrap();
//!     out.push(format!("{}{}", "  ".repeat(depth), chunk.header_name()));
//!     for &child in chunk.children() {
//!         walk(c, child, depth + 1, out);
//!     }
//! }
//!
//! let mut lines = Vec::new();
//! walk(&container, container.root().unwrap(), 0, &mut lines);
//! assert_eq!(lines, vec!["ucfb", "  scr_", "    NAME"]);
//! ```
mod binutil;
mod builder;
mod chunk;
mod container;
mod dump;
mod parser;
pub mod texture;

pub use binutil::ParseError;
pub use builder::ChunkBuilder;
pub use chunk::{Chunk, ChunkError, ChunkId, ChunkKind, FourCC};
pub use container::{Container, ContainerKind, LoadError};
pub use dump::HEX_PREVIEW_LIMIT;
pub use parser::{MAX_PARSE_DEPTH, tiles_as_chunks};
pub use texture::{D3DFormat, ImageData, ImageFormat, ImageSource, TextureBody, TextureError};
