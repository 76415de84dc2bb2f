//! BER-TLV tree decoder for EMV data objects.
//!
//! EMV cards hand back records encoded as nested tag-length-value units:
//! one or two tag bytes, a short- or long-form length, and a value which
//! may itself contain further TLV units when the constructed bit of the
//! tag is set. This crate decodes such a buffer into an owned tree of
//! [`TlvNode`]s that can be searched by tag.
//!
//! The decoder is pure: it performs no I/O, holds no shared state, and
//! never reads past the end of the buffer it is given. Malformed input
//! yields a [`TlvError`], never a panic.

use thiserror::Error;

pub mod tags;

/// Maximum nesting depth accepted by the decoder.
///
/// Real EMV records nest two or three levels deep; the cap exists so that
/// adversarial input cannot drive unbounded recursion.
pub const MAX_DEPTH: usize = 16;

/// Errors produced while decoding a TLV buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TlvError {
    /// The buffer was empty where a TLV unit was expected.
    #[error("empty input, expected a TLV tag")]
    Empty,

    /// A tag, length, or value field would extend past the end of the
    /// buffer.
    #[error("truncated TLV at offset {offset}: {needed} more byte(s) required")]
    Truncated { offset: usize, needed: usize },

    /// Constructed values nested deeper than [`MAX_DEPTH`] levels.
    #[error("TLV nesting exceeds {MAX_DEPTH} levels")]
    DepthExceeded,
}

/// One decoded tag-length-value unit.
///
/// `value` always holds exactly `length` bytes, copied out of the source
/// buffer. For constructed nodes `children` holds the nested units, in
/// encounter order, and their encoded sizes sum to `length`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlvNode {
    /// Tag identifier; two-byte tags (e.g. `9F46`) are packed big-endian.
    pub tag: u16,
    /// Number of bytes the tag occupied in the source buffer (1 or 2).
    pub tag_size: u8,
    /// Whether the constructed bit (`0x20`) of the first tag byte is set.
    pub constructed: bool,
    /// Decoded content length.
    pub length: usize,
    /// Number of bytes the length field occupied (1 short form, 1+N long).
    pub length_size: u8,
    /// The content bytes, exactly `length` of them.
    pub value: Vec<u8>,
    /// Nested units, populated only for constructed nodes.
    pub children: Vec<TlvNode>,
}

impl TlvNode {
    /// Total number of bytes this node occupied in its source buffer.
    pub fn encoded_len(&self) -> usize {
        self.tag_size as usize + self.length_size as usize + self.length
    }

    /// Re-encode this node (tag, length, value) into `out`.
    ///
    /// The length field is written back in the same form it was decoded
    /// from, so a decode/encode round trip reproduces the source bytes.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        if self.tag_size == 2 {
            out.push((self.tag >> 8) as u8);
        }
        out.push(self.tag as u8);

        if self.length_size == 1 {
            out.push(self.length as u8);
        } else {
            let n = self.length_size - 1;
            out.push(0x80 | n);
            for i in (0..n).rev() {
                out.push((self.length >> (8 * i as usize)) as u8);
            }
        }

        out.extend_from_slice(&self.value);
    }

    /// Depth-first pre-order search for `tag`: this node first, then each
    /// child in order. Returns the first match.
    pub fn find(&self, tag: u16) -> Option<&TlvNode> {
        if self.tag == tag {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(tag))
    }
}

/// Search a sequence of sibling roots (as returned by [`decode_tree`]) in
/// order, descending into each; returns the first node carrying `tag`.
pub fn find(nodes: &[TlvNode], tag: u16) -> Option<&TlvNode> {
    nodes.iter().find_map(|node| node.find(tag))
}

/// Decode a single TLV unit from the front of `buf`.
///
/// Returns the node (children populated recursively for constructed
/// values) and the number of bytes consumed. Trailing bytes beyond the
/// first unit are left for the caller.
pub fn decode_one(buf: &[u8]) -> Result<(TlvNode, usize), TlvError> {
    decode_at(buf, 0)
}

/// Decode an entire buffer as a sequence of sibling TLV units.
///
/// Card responses may carry several top-level data objects back to back;
/// each becomes one root node. An empty buffer yields an empty sequence.
pub fn decode_tree(buf: &[u8]) -> Result<Vec<TlvNode>, TlvError> {
    let mut nodes = Vec::new();
    let mut offset = 0;
    while offset < buf.len() {
        let (node, consumed) = decode_at(&buf[offset..], 0)?;
        nodes.push(node);
        offset += consumed;
    }
    Ok(nodes)
}

fn decode_at(buf: &[u8], depth: usize) -> Result<(TlvNode, usize), TlvError> {
    if depth >= MAX_DEPTH {
        return Err(TlvError::DepthExceeded);
    }
    if buf.is_empty() {
        return Err(TlvError::Empty);
    }

    // Tag: low five bits all set means the tag continues into a second
    // byte; bit 0x20 marks a constructed value.
    let first = buf[0];
    let constructed = first & 0x20 != 0;
    let (tag, tag_size) = if first & 0x1F == 0x1F {
        let second = *buf.get(1).ok_or(TlvError::Truncated {
            offset: 1,
            needed: 1,
        })?;
        (u16::from_be_bytes([first, second]), 2u8)
    } else {
        (first as u16, 1u8)
    };

    let mut index = tag_size as usize;

    // Length: high bit clear is the length itself; high bit set gives the
    // count of following big-endian length bytes.
    let len_byte = *buf.get(index).ok_or(TlvError::Truncated {
        offset: index,
        needed: 1,
    })?;
    index += 1;

    let (length, length_size) = if len_byte & 0x80 == 0 {
        (len_byte as usize, 1u8)
    } else {
        let n = (len_byte & 0x7F) as usize;
        if buf.len() < index + n {
            return Err(TlvError::Truncated {
                offset: buf.len(),
                needed: index + n - buf.len(),
            });
        }
        // Saturate: a declared length near usize::MAX can only fail the
        // bounds check below, it must never wrap around it.
        let mut len = 0usize;
        for &b in &buf[index..index + n] {
            len = len.saturating_mul(256).saturating_add(b as usize);
        }
        index += n;
        (len, (1 + n) as u8)
    };

    // `index` never exceeds `buf.len()` at this point.
    let remaining = buf.len() - index;
    if length > remaining {
        return Err(TlvError::Truncated {
            offset: buf.len(),
            needed: length - remaining,
        });
    }
    let value = buf[index..index + length].to_vec();
    index += length;

    let children = if constructed {
        decode_children(&value, depth + 1)?
    } else {
        Vec::new()
    };

    Ok((
        TlvNode {
            tag,
            tag_size,
            constructed,
            length,
            length_size,
            value,
            children,
        },
        index,
    ))
}

fn decode_children(value: &[u8], depth: usize) -> Result<Vec<TlvNode>, TlvError> {
    let mut children = Vec::new();
    let mut offset = 0;
    while offset < value.len() {
        let (child, consumed) = decode_at(&value[offset..], depth)?;
        children.push(child);
        offset += consumed;
    }
    Ok(children)
}
