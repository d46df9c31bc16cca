//! RuleTable — maps a neighborhood bit pattern to the next state of a cell

use super::MetaRule;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    entries: Vec<bool>,
}

impl RuleTable {
    /// Build the `2^n` entry table for a MetaRule.
    ///
    /// For `n == 3` entry `i` is bit `7 − i` of the core rule (the elementary
    /// CA table). Larger tables repeat the core rule's bits modulo 8, MSB-first
    /// over the table, and XOR them with the modulation byte laid out the same
    /// way. The table is then rotated left by `temporal mod 2^n`.
    pub fn build(rule: &MetaRule) -> Self {
        let n = rule.neighborhood_size();
        let size = 1usize << n;
        let core = rule.core_rule();

        let mut entries: Vec<bool> = if n == 3 {
            (0..size).map(|i| (core >> (7 - i)) & 1 == 1).collect()
        } else {
            let modulation = rule.modulation();
            (0..size)
                .map(|i| {
                    let shift = (size - 1 - i) % 8;
                    ((core >> shift) ^ (modulation >> shift)) & 1 == 1
                })
                .collect()
        };

        entries.rotate_left(usize::from(rule.temporal()) % size);
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for `pattern`, reduced modulo the table size.
    pub fn lookup(&self, pattern: usize) -> bool {
        self.entries[pattern % self.entries.len()]
    }

    pub fn entries(&self) -> &[bool] {
        &self.entries
    }
}
