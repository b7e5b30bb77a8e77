//! Textual rendering of chunks.
use std::fmt::Write;

use crate::binutil::ParseError;
use crate::chunk::{Chunk, ChunkError, ChunkKind};
use crate::texture::{FormatInfo, LevelInfo};

/// Number of payload bytes shown in a hex preview.
pub const HEX_PREVIEW_LIMIT: usize = 1024;

/// Render `chunk` (whose payload is `data`, parent tag `parent_tag`) as text.
pub(crate) fn render(
    chunk: &Chunk,
    data: &[u8],
    parent_tag: Option<&[u8; 4]>,
) -> Result<String, ChunkError> {
    let mut out = String::new();
    let _ = writeln!(out, "Header:    {}", chunk.header);
    let _ = writeln!(
        out,
        "Position:  0x{:08X} ({})",
        chunk.position, chunk.position
    );
    let _ = writeln!(out, "Data size: {}", chunk.data_size);
    let _ = writeln!(out, "Full size: {}", chunk.full_size);
    let _ = writeln!(out, "Children:  {}", chunk.children.len());

    let decode_err = |source: ParseError| ChunkError::Decode {
        tag: chunk.header.to_string(),
        position: chunk.position,
        source,
    };

    if let ChunkKind::TextureBody(body) = &chunk.kind {
        let _ = writeln!(out);
        let _ = writeln!(out, "Format:    {:?}", body.format);
        let _ = writeln!(out, "Width:     {}", body.width);
        let _ = writeln!(out, "Height:    {}", body.height);
        let _ = writeln!(out, "Mip level: {}", body.mip_level);
        return Ok(out);
    }

    if chunk.header == b"INFO" {
        match parent_tag {
            Some(b"FMT_") => {
                let info = FormatInfo::parse(data)
                    .map_err(|e| decode_err(e.with_context("FMT_ INFO")))?;
                let _ = writeln!(out);
                let _ = writeln!(out, "Format:      {:?}", info.format);
                let _ = writeln!(out, "Width:       {}", info.width);
                let _ = writeln!(out, "Height:      {}", info.height);
                let _ = writeln!(out, "Depth:       {}", info.depth);
                let _ = writeln!(out, "Mip count:   {}", info.mip_count);
                let _ = writeln!(out, "Detail bias: {}", info.detail_bias);
                return Ok(out);
            }
            Some(b"LVL_") => {
                let info = LevelInfo::parse(data)
                    .map_err(|e| decode_err(e.with_context("LVL_ INFO")))?;
                let _ = writeln!(out);
                let _ = writeln!(out, "Mip level: {}", info.mip_level);
                let _ = writeln!(out, "Body size: {}", info.body_size);
                return Ok(out);
            }
            _ => {}
        }
    }

    if chunk.children.is_empty() && !data.is_empty() {
        let _ = writeln!(out);
        match as_c_string(data) {
            Some(s) => {
                let _ = writeln!(out, "Value: \"{}\"", s);
            }
            None => hex_preview(&mut out, data),
        }
    }

    Ok(out)
}

/// Interpret `data` as a NUL-terminated printable string followed only by
/// zero padding.
pub fn as_c_string(data: &[u8]) -> Option<&str> {
    let nul = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    let (text, rest) = data.split_at(nul);
    if text.is_empty() || !rest.iter().all(|&b| b == 0) {
        return None;
    }
    if !text.iter().all(|&b| b.is_ascii_graphic() || b == b' ') {
        return None;
    }
    std::str::from_utf8(text).ok()
}

/// Append a 16-bytes-per-line offset/hex/ASCII listing of `data`.
fn hex_preview(out: &mut String, data: &[u8]) {
    let shown = &data[..data.len().min(HEX_PREVIEW_LIMIT)];
    for (line, row) in shown.chunks(16).enumerate() {
        let _ = write!(out, "{:08X}  ", line * 16);
        for i in 0..16 {
            match row.get(i) {
                Some(b) => {
                    let _ = write!(out, "{:02X} ", b);
                }
                None => out.push_str("   "),
            }
        }
        out.push(' ');
        for &b in row {
            out.push(if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            });
        }
        out.push('\n');
    }
    if data.len() > shown.len() {
        let _ = writeln!(out, "... ({} more bytes)", data.len() - shown.len());
    }
}
