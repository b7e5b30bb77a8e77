//! UCFB chunk framing.
//!
//! Every chunk is a four-byte tag, a little-endian `u32` payload size and
//! the payload itself, padded to a four-byte boundary. Whether a payload
//! holds nested chunks is not recorded in the file, so the parser decides
//! per chunk:
//!
//! - `ucfb` always holds children, `lvl_` holds children after an 8-byte
//!   (name hash, size) prefix,
//! - `BODY`, `INFO`, `NAME` and `DATA` never do,
//! - anything else holds children when its payload tiles exactly into
//!   plausible chunks (see [`tiles_as_chunks`]).
//!
//! A malformed chunk stops parsing of its siblings but keeps everything read
//! before it, so callers still get a partial tree together with the error.
use tracing::{debug, warn};

use crate::binutil::{ParseError, align4, read_tag_at, read_u32_le_at};
use crate::chunk::{Chunk, ChunkId, ChunkKind, FourCC};
use crate::texture::{FormatInfo, LevelInfo, TextureBody};

/// Nesting limit for chunk parsing.
pub const MAX_PARSE_DEPTH: usize = 64;

const HEADER_SIZE: usize = 8;

/// Result of a parse: the arena (possibly partial) and the first error met.
#[derive(Debug, Default)]
pub(crate) struct ParseOutput {
    pub chunks: Vec<Chunk>,
    pub root: Option<ChunkId>,
    pub error: Option<ParseError>,
}

/// Offset within the payload where child chunks start, or `None` when the
/// payload must be left as raw data.
fn child_offset(tag: FourCC, data: &[u8]) -> Option<usize> {
    match tag.as_bytes() {
        b"ucfb" => Some(0),
        b"lvl_" => Some(HEADER_SIZE),
        b"BODY" | b"INFO" | b"NAME" | b"DATA" => None,
        _ if tiles_as_chunks(data) => Some(0),
        _ => None,
    }
}

/// Whether `data` is exactly a sequence of plausible chunks, allowing up to
/// seven bytes of zero padding at the end.
pub fn tiles_as_chunks(data: &[u8]) -> bool {
    let mut off = 0usize;
    let mut count = 0usize;
    while off + HEADER_SIZE <= data.len() {
        let tag = match read_tag_at(data, off) {
            Ok(t) => FourCC(t),
            Err(_) => return false,
        };
        if !tag.is_plausible() {
            return false;
        }
        let size = match read_u32_le_at(data, off + 4) {
            Ok(s) => s as usize,
            Err(_) => return false,
        };
        let end = match (off + HEADER_SIZE).checked_add(size) {
            Some(e) if e <= data.len() => e,
            _ => return false,
        };
        count += 1;
        off = align4(end).min(data.len());
    }
    count > 0 && data[off..].iter().all(|&b| b == 0)
}

struct ChunkParser<'a> {
    bytes: &'a [u8],
    chunks: Vec<Chunk>,
    error: Option<ParseError>,
}

impl<'a> ChunkParser<'a> {
    fn record_error(&mut self, err: ParseError) {
        warn!("chunk parse error: {}", err);
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn push(&mut self, chunk: Chunk) -> ChunkId {
        let id = ChunkId(self.chunks.len());
        if let Some(parent) = chunk.parent {
            self.chunks[parent.0].children.push(id);
        }
        self.chunks.push(chunk);
        id
    }

    /// Parse the chunks laid out in `bytes[start..end]` as children of `parent`.
    fn parse_children(&mut self, parent: ChunkId, start: usize, end: usize, depth: usize) {
        if depth > MAX_PARSE_DEPTH {
            warn!(
                "chunk nesting deeper than {} at 0x{:X}, not descending",
                MAX_PARSE_DEPTH, start
            );
            return;
        }

        let mut off = start;
        while off + HEADER_SIZE <= end {
            let tag = match read_tag_at(self.bytes, off) {
                Ok(t) => FourCC(t),
                Err(e) => {
                    self.record_error(e.with_context("chunk header"));
                    return;
                }
            };
            if !tag.is_plausible() {
                if self.bytes[off..end].iter().all(|&b| b == 0) {
                    // trailing padding
                    return;
                }
                self.record_error(ParseError::InvalidIdent(tag.0));
                return;
            }
            let size = match read_u32_le_at(self.bytes, off + 4) {
                Ok(s) => s,
                Err(e) => {
                    self.record_error(e.with_context("chunk size"));
                    return;
                }
            };
            let data_start = off + HEADER_SIZE;
            let data_end = match data_start.checked_add(size as usize) {
                Some(e) if e <= end => e,
                _ => {
                    self.record_error(ParseError::ChunkOverrun {
                        tag: tag.to_string(),
                        position: off,
                        size,
                        available: end - data_start,
                    });
                    return;
                }
            };
            let full_size = align4(data_end).min(end) - off;

            let id = self.push(Chunk {
                header: tag,
                position: off,
                data_size: size,
                full_size,
                parent: Some(parent),
                children: Vec::new(),
                kind: ChunkKind::Generic,
            });

            let data = &self.bytes[data_start..data_end];
            if let Some(skip) = child_offset(tag, data) {
                self.parse_children(id, data_start + skip.min(data.len()), data_end, depth + 1);
            }

            off += full_size;
        }
    }
}

/// Parse a whole UCFB file into a chunk arena.
pub(crate) fn parse(bytes: &[u8]) -> ParseOutput {
    let mut out = ParseOutput::default();

    let tag = match read_tag_at(bytes, 0) {
        Ok(t) => FourCC(t),
        Err(e) => {
            out.error = Some(e.with_context("ucfb header"));
            return out;
        }
    };
    if tag != FourCC::UCFB {
        out.error = Some(ParseError::InvalidIdent(tag.0));
        return out;
    }
    let declared = match read_u32_le_at(bytes, 4) {
        Ok(s) => s,
        Err(e) => {
            out.error = Some(e.with_context("ucfb header"));
            return out;
        }
    };

    let mut parser = ChunkParser {
        bytes,
        chunks: Vec::new(),
        error: None,
    };

    let available = bytes.len() - HEADER_SIZE;
    let data_end = if declared as usize > available {
        parser.record_error(ParseError::ChunkOverrun {
            tag: tag.to_string(),
            position: 0,
            size: declared,
            available,
        });
        bytes.len()
    } else {
        HEADER_SIZE + declared as usize
    };

    let root = parser.push(Chunk {
        header: tag,
        position: 0,
        data_size: declared,
        full_size: align4(data_end).min(bytes.len()),
        parent: None,
        children: Vec::new(),
        kind: ChunkKind::Generic,
    });
    parser.parse_children(root, HEADER_SIZE, data_end, 1);

    resolve_textures(bytes, &mut parser.chunks);
    debug!("parsed {} chunks", parser.chunks.len());

    out.chunks = parser.chunks;
    out.root = Some(root);
    out.error = parser.error;
    out
}

fn payload<'b>(bytes: &'b [u8], chunk: &Chunk) -> &'b [u8] {
    let start = chunk.data_position().min(bytes.len());
    let end = (start + chunk.data_size as usize).min(bytes.len());
    &bytes[start..end]
}

fn child_with_tag(chunks: &[Chunk], parent: ChunkId, tag: &[u8; 4]) -> Option<ChunkId> {
    chunks[parent.0]
        .children
        .iter()
        .copied()
        .find(|c| chunks[c.0].header == tag)
}

fn children_with_tag<'c>(
    chunks: &'c [Chunk],
    parent: ChunkId,
    tag: &'c [u8; 4],
) -> impl Iterator<Item = ChunkId> + 'c {
    chunks[parent.0]
        .children
        .iter()
        .copied()
        .filter(move |c| chunks[c.0].header == tag)
}

/// Attach [`TextureBody`] metadata to every resolvable `tex_/FMT_/FACE/LVL_/BODY`.
fn resolve_textures(bytes: &[u8], chunks: &mut [Chunk]) {
    let mut bodies: Vec<(ChunkId, TextureBody)> = Vec::new();

    let textures = (0..chunks.len())
        .map(ChunkId)
        .filter(|id| chunks[id.0].header == b"tex_");
    for tex in textures {
        for fmt in children_with_tag(chunks, tex, b"FMT_") {
            let Some(info_id) = child_with_tag(chunks, fmt, b"INFO") else {
                continue;
            };
            let info = match FormatInfo::parse(payload(bytes, &chunks[info_id.0])) {
                Ok(info) => info,
                Err(e) => {
                    debug!(
                        "skipping FMT_ at 0x{:X}: {}",
                        chunks[fmt.0].position,
                        e.with_context("FMT_ INFO")
                    );
                    continue;
                }
            };
            for face in children_with_tag(chunks, fmt, b"FACE") {
                for level in children_with_tag(chunks, face, b"LVL_") {
                    let mip_level = child_with_tag(chunks, level, b"INFO")
                        .and_then(|i| LevelInfo::parse(payload(bytes, &chunks[i.0])).ok())
                        .map(|l| l.mip_level);
                    let (Some(mip_level), Some(body)) =
                        (mip_level, child_with_tag(chunks, level, b"BODY"))
                    else {
                        continue;
                    };
                    bodies.push((
                        body,
                        TextureBody::for_level(info.format, info.width, info.height, mip_level),
                    ));
                }
            }
        }
    }

    for (id, body) in bodies {
        chunks[id.0].kind = ChunkKind::TextureBody(body);
    }
}
