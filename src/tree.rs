use bitvec::prelude::*;
use derivative::Derivative;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::encoder::CodeTable;
use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::header::CodeEntry;
use crate::Bits;

/// A node of a Huffman tree. Leaves carry a symbol, internal nodes own
/// exactly two children (a reconstructed tree may have internal nodes with a
/// single child when its code is not complete).
///
/// Nodes order by `(weight, seq)` only, which is what the builder's min-heap
/// needs: among equal weights the node created first comes out first.
#[derive(Debug, Clone, Derivative)]
#[derivative(PartialEq, Eq, PartialOrd, Ord)]
pub struct Node {
    weight: u64,

    seq: u64,

    #[derivative(PartialEq = "ignore")]
    #[derivative(PartialOrd = "ignore")]
    #[derivative(Ord = "ignore")]
    symbol: Option<u8>,

    #[derivative(PartialEq = "ignore")]
    #[derivative(PartialOrd = "ignore")]
    #[derivative(Ord = "ignore")]
    left: Option<Box<Node>>,

    #[derivative(PartialEq = "ignore")]
    #[derivative(PartialOrd = "ignore")]
    #[derivative(Ord = "ignore")]
    right: Option<Box<Node>>,
}

impl Node {
    fn leaf(symbol: u8, weight: u64, seq: u64) -> Self {
        Self {
            weight,
            seq,
            symbol: Some(symbol),
            left: None,
            right: None,
        }
    }

    fn from_children(left: Node, right: Node, seq: u64) -> Self {
        Self {
            weight: left.weight + right.weight,
            seq,
            symbol: None,
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        }
    }

    /// Unlabeled placeholder used while rebuilding a tree from stored codes.
    fn sentinel() -> Self {
        Self {
            weight: 0,
            seq: 0,
            symbol: None,
            left: None,
            right: None,
        }
    }

    pub fn weight(&self) -> u64 {
        self.weight
    }

    pub fn symbol(&self) -> Option<u8> {
        self.symbol
    }

    pub fn left(&self) -> Option<&Node> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&Node> {
        self.right.as_deref()
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Child reached by following `bit` (`false` = left, `true` = right).
    pub fn child(&self, bit: bool) -> Option<&Node> {
        if bit {
            self.right()
        } else {
            self.left()
        }
    }

    /// Assigns every leaf the path leading to it, `0` for left and `1` for
    /// right. A tree that is a single leaf gets the one-bit code `0`, since an
    /// empty code could never be read back out of a bitstream.
    pub fn code_table(&self) -> CodeTable {
        fn traverse(node: &Node, path: &mut Bits, table: &mut CodeTable) {
            if node.is_leaf() {
                if let Some(sym) = node.symbol {
                    table.insert(sym, path.clone());
                }
                return;
            }

            if let Some(left) = &node.left {
                path.push(false);
                traverse(left, path, table);
                path.pop();
            }

            if let Some(right) = &node.right {
                path.push(true);
                traverse(right, path, table);
                path.pop();
            }
        }

        let mut table = CodeTable::default();
        match self.symbol {
            Some(sym) if self.is_leaf() => {
                table.insert(sym, bitvec![u8, Msb0; 0]);
            }
            _ => traverse(self, &mut Bits::new(), &mut table),
        }

        table
    }

    /// Rebuilds a decoding tree from stored `(symbol, code)` pairs, creating
    /// the internal nodes along each code's path as they are first needed.
    ///
    /// No entries gives a bare sentinel root, which decodes only the empty
    /// bitstream.
    pub fn from_codes(entries: &[CodeEntry]) -> Result<Self> {
        let mut root = Node::sentinel();
        let mut seen = [false; 256];

        for entry in entries {
            let corrupt = |reason| Error::CorruptHeader {
                offset: entry.offset,
                reason,
            };

            if entry.code.is_empty() {
                return Err(corrupt("empty code"));
            }
            if std::mem::replace(&mut seen[entry.symbol as usize], true) {
                return Err(corrupt("symbol listed twice"));
            }

            let mut cursor = &mut root;
            for bit in entry.code.iter().by_vals() {
                if cursor.symbol.is_some() {
                    return Err(corrupt("code extends another symbol's code"));
                }
                let child = if bit { &mut cursor.right } else { &mut cursor.left };
                cursor = &mut **child.get_or_insert_with(|| Box::new(Node::sentinel()));
            }

            if cursor.symbol.is_some() {
                return Err(corrupt("code assigned to two symbols"));
            }
            if !cursor.is_leaf() {
                return Err(corrupt("code is a prefix of another symbol's code"));
            }
            cursor.symbol = Some(entry.symbol);
        }

        Ok(root)
    }
}

/// Builds the Huffman tree for `freq`, or `None` when the table is empty.
///
/// Leaves are seeded in ascending symbol order and numbered as they are
/// created, merged nodes continue the numbering; the heap pops the smallest
/// `(weight, seq)`, so ties always resolve the same way. The first node
/// popped becomes the left child.
pub fn huffman(freq: &FrequencyTable) -> Option<Node> {
    let mut pq: BinaryHeap<_> = freq
        .sorted()
        .into_iter()
        .zip(0..)
        .map(|((s, count), seq)| Reverse(Node::leaf(s, count, seq)))
        .collect();

    let mut seq = pq.len() as u64;
    while pq.len() > 1 {
        let Reverse(left) = pq.pop()?;
        let Reverse(right) = pq.pop()?;
        pq.push(Reverse(Node::from_children(left, right, seq)));
        seq += 1;
    }

    pq.pop().map(|r| r.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header;

    fn weights_consistent(node: &Node) -> bool {
        match (node.left(), node.right()) {
            (None, None) => node.symbol.is_some(),
            (Some(l), Some(r)) => {
                node.weight == l.weight + r.weight
                    && weights_consistent(l)
                    && weights_consistent(r)
            }
            _ => false,
        }
    }

    fn entry(symbol: u8, code: &str) -> CodeEntry {
        CodeEntry {
            offset: 0,
            symbol,
            code: code.chars().map(|c| c == '1').collect(),
        }
    }

    #[test]
    fn node_from_children() {
        let left = Node::leaf(b'a', 5, 0);
        let right = Node::leaf(b'b', 3, 1);

        let n = Node::from_children(left, right, 2);

        assert_eq!(n.weight(), 8);
        assert_eq!(n.symbol(), None);
        assert!(!n.is_leaf());
        assert_eq!(n.left().and_then(Node::symbol), Some(b'a'));
        assert_eq!(n.right().and_then(Node::symbol), Some(b'b'));
    }

    #[test]
    fn node_compare_ignores_symbol() {
        let a = Node::leaf(b'a', 4, 7);
        let b = Node::leaf(b'b', 4, 7);

        assert_eq!(a, b);
    }

    #[test]
    fn node_compare_weight_then_seq() {
        assert!(Node::leaf(b'z', 1, 9) < Node::leaf(b'a', 2, 0));
        assert!(Node::leaf(b'z', 2, 0) < Node::leaf(b'a', 2, 1));
    }

    #[test]
    fn empty_table_has_no_tree() {
        assert!(huffman(&FrequencyTable::default()).is_none());
    }

    #[test]
    fn single_symbol_tree_is_leaf() {
        let tree = huffman(&FrequencyTable::from_bytes(b"aaaa")).unwrap();

        assert!(tree.is_leaf());
        assert_eq!(tree.symbol(), Some(b'a'));
        assert_eq!(tree.weight(), 4);

        let table = tree.code_table();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(b'a').unwrap(), bits![u8, Msb0; 0]);
    }

    #[test]
    fn aab_codes() {
        let tree = huffman(&FrequencyTable::from_bytes(b"aab")).unwrap();
        assert_eq!(tree.weight(), 3);

        let table = tree.code_table();
        assert_eq!(table.get(b'b').unwrap(), bits![u8, Msb0; 0]);
        assert_eq!(table.get(b'a').unwrap(), bits![u8, Msb0; 1]);
    }

    #[test]
    fn weight_invariant() {
        let s = "This is a really long message, I sure do hope it encodes and decodes properly.";
        let freq = FrequencyTable::from_bytes(s.as_bytes());
        let tree = huffman(&freq).unwrap();

        assert!(weights_consistent(&tree));
        assert_eq!(tree.weight(), freq.total());
    }

    #[test]
    fn codes_are_prefix_free() {
        let s = b"abracadabra alakazam, the quick brown fox jumps over the lazy dog";
        let table = huffman(&FrequencyTable::from_bytes(s)).unwrap().code_table();

        assert!(table.is_prefix_free());
        for (a, ca) in table.iter() {
            for (b, cb) in table.iter() {
                if a != b {
                    assert!(!cb.starts_with(ca), "{a} is a prefix of {b}");
                }
            }
        }
    }

    #[test]
    fn frequent_symbols_get_shorter_codes() {
        let table = huffman(&FrequencyTable::from_bytes(b"eeeeeeeeeeeetaoin"))
            .unwrap()
            .code_table();

        let e = table.get(b'e').unwrap().len();
        assert!(table.iter().all(|(_, c)| c.len() >= e));
    }

    #[test]
    fn ties_are_deterministic() {
        let freq = FrequencyTable::from_bytes(b"abcdefgh");
        let first = huffman(&freq).unwrap().code_table();

        for _ in 0..10 {
            let again = FrequencyTable::from_bytes(b"hgfedcba");
            assert_eq!(huffman(&again).unwrap().code_table(), first);
        }
    }

    #[test]
    fn rebuilt_tree_gives_same_codes() {
        let s = b"she sells sea shells by the sea shore";
        let table = huffman(&FrequencyTable::from_bytes(s)).unwrap().code_table();

        let entries = header::parse(&header::write(&table)).unwrap();
        let rebuilt = Node::from_codes(&entries).unwrap();

        assert_eq!(rebuilt.code_table(), table);
    }

    #[test]
    fn rebuild_single_symbol() {
        let rebuilt = Node::from_codes(&[entry(b'x', "0")]).unwrap();

        assert!(!rebuilt.is_leaf());
        assert_eq!(rebuilt.left().and_then(Node::symbol), Some(b'x'));
        assert!(rebuilt.right().is_none());
    }

    #[test]
    fn rebuild_empty() {
        let rebuilt = Node::from_codes(&[]).unwrap();
        assert!(rebuilt.is_leaf());
        assert_eq!(rebuilt.symbol(), None);
    }

    #[test]
    fn rebuild_rejects_prefix_codes() {
        let err = Node::from_codes(&[entry(b'a', "0"), entry(b'b', "01")]).unwrap_err();
        assert!(matches!(err, Error::CorruptHeader { .. }));

        let err = Node::from_codes(&[entry(b'b', "01"), entry(b'a', "0")]).unwrap_err();
        assert!(matches!(err, Error::CorruptHeader { .. }));
    }

    #[test]
    fn rebuild_rejects_duplicates() {
        let err = Node::from_codes(&[entry(b'a', "10"), entry(b'b', "10")]).unwrap_err();
        assert!(matches!(err, Error::CorruptHeader { .. }));

        let err = Node::from_codes(&[entry(b'a', "0"), entry(b'a', "1")]).unwrap_err();
        assert!(matches!(err, Error::CorruptHeader { .. }));
    }

    #[test]
    fn rebuild_rejects_empty_code() {
        let err = Node::from_codes(&[entry(b'a', "")]).unwrap_err();
        assert!(matches!(err, Error::CorruptHeader { .. }));
    }
}
