use bitvec::prelude::*;
use std::collections::BTreeMap;
use tracing::warn;

use crate::error::{Error, Result};
use crate::header;
use crate::Bits;

/// Symbol to code mapping, enumerated in ascending symbol order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<u8, Bits>,
}

impl CodeTable {
    pub fn insert(&mut self, symbol: u8, code: Bits) -> Option<Bits> {
        self.codes.insert(symbol, code)
    }

    pub fn get(&self, symbol: u8) -> Option<&BitSlice<u8, Msb0>> {
        self.codes.get(&symbol).map(|c| c.as_bitslice())
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &BitSlice<u8, Msb0>)> + '_ {
        self.codes.iter().map(|(&s, c)| (s, c.as_bitslice()))
    }

    /// True when no code is a prefix of another one.
    ///
    /// Sorting the codes lexicographically puts every code directly before
    /// the codes it prefixes, so neighbours are all that need checking.
    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<_> = self.codes.values().map(|c| c.as_bitslice()).collect();
        codes.sort();
        codes.windows(2).all(|w| !w[1].starts_with(w[0]))
    }
}

impl FromIterator<(u8, Bits)> for CodeTable {
    fn from_iter<I: IntoIterator<Item = (u8, Bits)>>(iter: I) -> Self {
        Self {
            codes: iter.into_iter().collect(),
        }
    }
}

/// What to do with a content byte that has no code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SymbolPolicy {
    /// Fail on the first unknown byte.
    #[default]
    Abort,
    /// Log and drop unknown bytes, encoding the rest.
    Skip,
}

/// Bits produced for some content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub bits: Bits,
    /// Number of symbols that made it into `bits`.
    pub symbols: u64,
}

#[derive(Debug, Clone)]
pub struct Encoder {
    table: CodeTable,
    policy: SymbolPolicy,
}

impl Encoder {
    pub fn new(table: CodeTable) -> Self {
        Self {
            table,
            policy: SymbolPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: SymbolPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn table(&self) -> &CodeTable {
        &self.table
    }

    /// Serialized code table, as stored in front of the bitstream.
    pub fn header(&self) -> Vec<u8> {
        header::write(&self.table)
    }

    pub fn encode(&self, content: &[u8]) -> Result<Encoded> {
        let mut out = Bits::new();
        let mut symbols = 0;

        for (offset, &s) in content.iter().enumerate() {
            match self.table.get(s) {
                Some(code) => {
                    out.extend_from_bitslice(code);
                    symbols += 1;
                }
                None => {
                    let err = Error::UnknownSymbol { symbol: s, offset };
                    match self.policy {
                        SymbolPolicy::Abort => return Err(err),
                        SymbolPolicy::Skip => warn!("{err}, skipping"),
                    }
                }
            }
        }

        Ok(Encoded { bits: out, symbols })
    }
}
