//! Textual header listing every symbol next to its code.
//!
//! The header is a run of `<symbol> 0x1E <code> 0x1E` groups, where `symbol`
//! is one raw byte and `code` is its bits spelled as ASCII `0`/`1`. Groups
//! appear in code table order, but readers accept any order.

use crate::encoder::CodeTable;
use crate::error::{Error, Result};
use crate::Bits;

/// ASCII record separator, reserved as the field delimiter.
pub const DELIMITER: u8 = 0x1e;

/// One `(symbol, code)` pair read back from a header, with the byte offset
/// its group starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeEntry {
    pub offset: usize,
    pub symbol: u8,
    pub code: Bits,
}

pub fn write(table: &CodeTable) -> Vec<u8> {
    let mut out = Vec::new();
    for (symbol, code) in table.iter() {
        out.push(symbol);
        out.push(DELIMITER);
        out.extend(code.iter().by_vals().map(|b| if b { b'1' } else { b'0' }));
        out.push(DELIMITER);
    }

    out
}

pub fn parse(header: &[u8]) -> Result<Vec<CodeEntry>> {
    let mut entries = Vec::new();
    let mut pos = 0;

    while pos < header.len() {
        let offset = pos;
        let corrupt = |reason| Error::CorruptHeader { offset, reason };

        let symbol = header[pos];
        if symbol == DELIMITER {
            return Err(corrupt("missing symbol"));
        }
        match header.get(pos + 1) {
            Some(&DELIMITER) => {}
            Some(_) => return Err(corrupt("symbol field longer than one byte")),
            None => return Err(corrupt("truncated group")),
        }
        pos += 2;

        let len = header[pos..]
            .iter()
            .position(|&b| b == DELIMITER)
            .ok_or_else(|| corrupt("code is not terminated"))?;

        let mut code = Bits::with_capacity(len);
        for &c in &header[pos..pos + len] {
            match c {
                b'0' => code.push(false),
                b'1' => code.push(true),
                _ => return Err(corrupt("code contains a character other than 0 or 1")),
            }
        }
        pos += len + 1;

        entries.push(CodeEntry {
            offset,
            symbol,
            code,
        });
    }

    Ok(entries)
}
