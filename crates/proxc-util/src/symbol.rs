//! String interning for identifier names.
//!
//! A [`Symbol`] is a 4-byte handle to an interned string. Interning makes
//! name comparison an integer compare and stores each distinct identifier
//! once, no matter how often it appears in the source.
//!
//! Interned strings live for the lifetime of the process. That is acceptable
//! for a compiler: the total is bounded by the size of the source text, and
//! it lets `as_str` hand out `&'static str` without lifetime plumbing.
//!
//! # Example
//!
//! ```
//! use proxc_util::Symbol;
//!
//! let a = Symbol::intern("counter");
//! let b = Symbol::intern("counter");
//! assert_eq!(a, b);
//! assert_eq!(a.as_str(), "counter");
//! ```

use std::fmt;
use std::sync::{OnceLock, RwLock};

use dashmap::DashMap;

/// Compact handle to an interned string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

static_assertions::assert_eq_size!(Symbol, u32);

struct Interner {
    map: DashMap<&'static str, u32, ahash::RandomState>,
    strings: RwLock<Vec<&'static str>>,
}

fn table() -> &'static Interner {
    static TABLE: OnceLock<Interner> = OnceLock::new();
    TABLE.get_or_init(|| Interner {
        map: DashMap::with_hasher(ahash::RandomState::new()),
        strings: RwLock::new(Vec::new()),
    })
}

impl Symbol {
    /// Intern `text`, returning the canonical handle for it.
    pub fn intern(text: &str) -> Symbol {
        let table = table();

        if let Some(id) = table.map.get(text) {
            return Symbol(*id);
        }

        let mut strings = table.strings.write().expect("interner poisoned");

        // Another thread may have won the race while we waited for the lock.
        if let Some(id) = table.map.get(text) {
            return Symbol(*id);
        }

        let stored: &'static str = Box::leak(text.to_owned().into_boxed_str());
        let id = strings.len() as u32;
        strings.push(stored);
        table.map.insert(stored, id);

        Symbol(id)
    }

    /// The interned string this symbol refers to.
    pub fn as_str(&self) -> &'static str {
        table().strings.read().expect("interner poisoned")[self.0 as usize]
    }

    /// Raw index of this symbol in the intern table.
    #[inline]
    pub fn index(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}
