//! Binary grid exchange codec.
//!
//! The interop format external routing engines speak:
//!
//! ```text
//! offset  size            content
//! 0       8               ASCII magic "ACCESSGR"
//! 8       7 * 4           i32 LE header: version, zoom, west, north,
//!                         width, height, depth
//! 36      w*h*d * 4       i32 LE body, depth-major; each depth slice is
//!                         delta-encoded along its flattened pixel order
//! ..      rest            UTF-8 JSON metadata trailer
//! ```
//!
//! Decoding prefix-sums each slice back to absolute values; encoding is the
//! exact inverse and round-trips byte-identically.

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

use crate::error::{FormatError, FormatResult};

/// 8-byte magic opening every payload.
pub const GRID_MAGIC: &[u8; 8] = b"ACCESSGR";

/// The single supported format version.
pub const GRID_VERSION: i32 = 0;

const HEADER_INTS: usize = 7;
const HEADER_LEN: usize = GRID_MAGIC.len() + HEADER_INTS * 4;

// ── GridBinaryPayload ─────────────────────────────────────────────────────────

/// Decoded grid payload with absolute (prefix-summed) values.
///
/// `values[d]` is depth slice `d`, row-major `width * height` long.  Never
/// mutated in place: decode on ingestion, encode on export.
#[derive(Clone, Debug, PartialEq)]
pub struct GridBinaryPayload {
    pub zoom: i32,
    pub west: i32,
    pub north: i32,
    pub width: i32,
    pub height: i32,
    pub depth: i32,
    pub values: Vec<Vec<i32>>,
    /// Metadata trailer; `{}` when the trailer was empty.
    pub metadata: serde_json::Value,
}

impl GridBinaryPayload {
    fn slice_len(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

// ── Decode ────────────────────────────────────────────────────────────────────

/// Decode a payload, prefix-summing each depth slice to absolute values.
pub fn decode(bytes: &[u8]) -> FormatResult<GridBinaryPayload> {
    if bytes.len() < HEADER_LEN {
        return Err(FormatError::Truncated {
            expected: HEADER_LEN,
            actual: bytes.len(),
        });
    }
    if &bytes[..GRID_MAGIC.len()] != GRID_MAGIC {
        return Err(FormatError::BadMagic);
    }

    let mut header = [0i32; HEADER_INTS];
    LittleEndian::read_i32_into(&bytes[GRID_MAGIC.len()..HEADER_LEN], &mut header);
    let [version, zoom, west, north, width, height, depth] = header;

    if version != GRID_VERSION {
        return Err(FormatError::UnsupportedVersion(version));
    }
    if width < 0 || height < 0 || depth < 0 {
        return Err(FormatError::BadDimensions(format!(
            "negative dimension in {width}x{height}x{depth}"
        )));
    }

    let slice_len = width as usize * height as usize;
    let body_len = slice_len * depth as usize * 4;
    if bytes.len() < HEADER_LEN + body_len {
        return Err(FormatError::Truncated {
            expected: HEADER_LEN + body_len,
            actual: bytes.len(),
        });
    }

    let mut values = Vec::with_capacity(depth as usize);
    let mut offset = HEADER_LEN;
    for _ in 0..depth {
        let mut slice = vec![0i32; slice_len];
        LittleEndian::read_i32_into(&bytes[offset..offset + slice_len * 4], &mut slice);
        offset += slice_len * 4;

        // Cumulative sum turns per-pixel deltas into absolute values.
        let mut acc = 0i32;
        for v in &mut slice {
            acc = acc.wrapping_add(*v);
            *v = acc;
        }
        values.push(slice);
    }

    let trailer = &bytes[offset..];
    let metadata = if trailer.is_empty() {
        serde_json::json!({})
    } else {
        serde_json::from_slice(trailer)?
    };

    Ok(GridBinaryPayload {
        zoom,
        west,
        north,
        width,
        height,
        depth,
        values,
        metadata,
    })
}

// ── Encode ────────────────────────────────────────────────────────────────────

/// Encode a payload, delta-encoding each depth slice.  Exact inverse of
/// [`decode`].
pub fn encode(payload: &GridBinaryPayload) -> FormatResult<Vec<u8>> {
    let slice_len = payload.slice_len();
    if payload.values.len() != payload.depth as usize {
        return Err(FormatError::BadDimensions(format!(
            "{} slices for depth {}",
            payload.values.len(),
            payload.depth
        )));
    }
    for (d, slice) in payload.values.iter().enumerate() {
        if slice.len() != slice_len {
            return Err(FormatError::BadDimensions(format!(
                "slice {d} has {} values, expected {slice_len}",
                slice.len()
            )));
        }
    }

    let metadata = serde_json::to_vec(&payload.metadata)?;
    let mut out =
        Vec::with_capacity(HEADER_LEN + slice_len * payload.values.len() * 4 + metadata.len());

    out.extend_from_slice(GRID_MAGIC);
    for v in [
        GRID_VERSION,
        payload.zoom,
        payload.west,
        payload.north,
        payload.width,
        payload.height,
        payload.depth,
    ] {
        // Writing into a Vec cannot fail.
        let _ = out.write_i32::<LittleEndian>(v);
    }

    for slice in &payload.values {
        let mut prev = 0i32;
        for &v in slice {
            let _ = out.write_i32::<LittleEndian>(v.wrapping_sub(prev));
            prev = v;
        }
    }

    out.extend_from_slice(&metadata);
    Ok(out)
}
