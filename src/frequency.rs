use std::collections::HashMap;

/// Occurrence count of every byte value seen in some content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<u8, u64>,
}

impl FrequencyTable {
    /// Counts `content` in one pass.
    pub fn from_bytes(content: &[u8]) -> Self {
        let mut counts = HashMap::new();
        for &b in content {
            *counts.entry(b).or_default() += 1;
        }

        Self { counts }
    }

    pub fn get(&self, symbol: u8) -> u64 {
        self.counts.get(&symbol).copied().unwrap_or(0)
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, i.e. the length of the counted content.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Entries in ascending symbol order.
    pub fn sorted(&self) -> Vec<(u8, u64)> {
        let mut entries: Vec<_> = self.counts.iter().map(|(&s, &c)| (s, c)).collect();
        entries.sort_unstable_by_key(|&(s, _)| s);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_exact() {
        let content = b"mississippi";
        let table = FrequencyTable::from_bytes(content);

        assert_eq!(table.len(), 4);
        assert_eq!(table.get(b'm'), 1);
        assert_eq!(table.get(b'i'), 4);
        assert_eq!(table.get(b's'), 4);
        assert_eq!(table.get(b'p'), 2);
        assert_eq!(table.get(b'z'), 0);
        assert_eq!(table.total(), content.len() as u64);
    }

    #[test]
    fn empty_content_gives_empty_table() {
        let table = FrequencyTable::from_bytes(b"");
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
        assert!(table.sorted().is_empty());
    }

    #[test]
    fn sorted_is_by_symbol() {
        let table = FrequencyTable::from_bytes(b"zzyxa");
        assert_eq!(
            table.sorted(),
            vec![(b'a', 1), (b'x', 1), (b'y', 1), (b'z', 2)]
        );
    }

    #[test]
    fn every_byte_value() {
        let content: Vec<u8> = (0..=255u8).chain(0..=255u8).collect();
        let table = FrequencyTable::from_bytes(&content);

        assert_eq!(table.len(), 256);
        assert!((0..=255u8).all(|b| table.get(b) == 2));
    }
}
