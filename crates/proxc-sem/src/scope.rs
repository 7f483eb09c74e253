//! A single lexical scope: a fixed-size hash bucket array of symbols.

use proxc_util::Symbol as Name;

use crate::SymbolEntry;

/// Number of hash buckets per scope.
pub const BUCKET_COUNT: usize = 128;

/// djb2: start at 5381, fold each byte via `hash * 33 + byte`.
pub fn bucket_index(name: &str) -> usize {
    let mut hash: u32 = 5381;
    for &byte in name.as_bytes() {
        hash = hash.wrapping_mul(33).wrapping_add(byte as u32);
    }
    hash as usize % BUCKET_COUNT
}

/// One lexical scope. Scopes are created on entry and destroyed on exit;
/// destroying a scope drops every symbol chained in its buckets.
pub struct Scope {
    /// Nesting level; the global scope is level 0.
    pub level: u32,

    /// Hash buckets; collisions chain within a bucket.
    buckets: Vec<Vec<SymbolEntry>>,

    /// Total number of symbols in this scope.
    pub symbol_count: usize,

    /// Bytes allocated to variables and parameters so far.
    pub next_offset: i32,

    /// Insertion-order slots handed to function and process symbols.
    pub next_slot: i32,
}

impl Scope {
    pub fn new(level: u32) -> Self {
        let mut buckets = Vec::with_capacity(BUCKET_COUNT);
        buckets.resize_with(BUCKET_COUNT, Vec::new);
        Self {
            level,
            buckets,
            symbol_count: 0,
            next_offset: 0,
            next_slot: 0,
        }
    }

    /// Chain `symbol` into its bucket.
    pub fn insert(&mut self, symbol: SymbolEntry) {
        let index = bucket_index(symbol.name.as_str());
        self.buckets[index].push(symbol);
        self.symbol_count += 1;
    }

    /// Find a symbol by name in this scope only.
    pub fn find(&self, name: Name) -> Option<&SymbolEntry> {
        self.buckets[bucket_index(name.as_str())]
            .iter()
            .find(|sym| sym.name == name)
    }

    /// Iterate over all symbols in bucket order.
    pub fn symbols(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.buckets.iter().flatten()
    }
}
