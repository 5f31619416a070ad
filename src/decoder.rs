use bitvec::prelude::*;

use crate::error::{Error, Result};
use crate::header;
use crate::tree::Node;

/// Walks a reconstructed tree to turn bits back into symbols.
#[derive(Debug, Clone)]
pub struct Decoder {
    root: Node,
}

impl Decoder {
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    /// Rebuilds the decoding tree from a stored header.
    pub fn from_header(header: &[u8]) -> Result<Self> {
        let entries = header::parse(header)?;
        Ok(Self::new(Node::from_codes(&entries)?))
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Decodes `input`, which must hold exactly the meaningful bits.
    ///
    /// Leaves are detected before each bit is applied, and once more after
    /// the last one, so the final symbol is flushed without reading past the
    /// end.
    pub fn decode(&self, input: &BitSlice<u8, Msb0>) -> Result<Vec<u8>> {
        let mut out = Vec::new();

        if self.root.is_leaf() {
            if input.is_empty() {
                return Ok(out);
            }
            return Err(Error::CorruptStream {
                bit: 0,
                reason: "bits present but the header lists no codes",
            });
        }

        let mut cursor = &self.root;
        for (i, b) in input.iter().by_vals().enumerate() {
            if cursor.is_leaf() {
                out.push(leaf_symbol(cursor, i)?);
                cursor = &self.root;
            }

            cursor = cursor.child(b).ok_or(Error::CorruptStream {
                bit: i,
                reason: "bit leads outside the code tree",
            })?;
        }

        if cursor.is_leaf() {
            out.push(leaf_symbol(cursor, input.len())?);
        } else if !std::ptr::eq(cursor, &self.root) {
            return Err(Error::CorruptStream {
                bit: input.len(),
                reason: "stream ends in the middle of a code",
            });
        }

        Ok(out)
    }
}

fn leaf_symbol(node: &Node, bit: usize) -> Result<u8> {
    node.symbol().ok_or(Error::CorruptStream {
        bit,
        reason: "reached an unlabeled leaf",
    })
}
