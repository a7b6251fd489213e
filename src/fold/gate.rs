//! Per-document "contains IR dumps" cache.

use std::fmt;
use std::hash::Hash;

use dashmap::DashMap;
use tracing::debug;

use super::patterns::is_dump_header;
use super::LineSource;

/// Number of leading lines scanned for a dump header.
pub const DEFAULT_SCAN_LIMIT: usize = 10_000;

/// Memoized answer to "does this document contain any dump headers".
///
/// Only the first `scan_limit` lines are searched. A header further down in
/// an otherwise unmarked document is never found. Entries live until
/// [`DumpGate::invalidate`] is called; ordinary edits do not refresh them.
#[derive(Debug)]
pub struct DumpGate<K: Eq + Hash> {
    scan_limit: usize,
    cache: DashMap<K, bool>,
}

impl<K: Eq + Hash> Default for DumpGate<K> {
    fn default() -> Self {
        Self::new(DEFAULT_SCAN_LIMIT)
    }
}

impl<K: Eq + Hash> DumpGate<K> {
    pub fn new(scan_limit: usize) -> Self {
        Self {
            scan_limit,
            cache: DashMap::new(),
        }
    }

    pub fn scan_limit(&self) -> usize {
        self.scan_limit
    }

    /// Cached check, computed from `doc` on first use for `key`.
    pub fn has_dumps<D>(&self, key: &K, doc: &D) -> bool
    where
        K: Clone + fmt::Debug,
        D: LineSource + ?Sized,
    {
        if let Some(cached) = self.cache.get(key) {
            return *cached;
        }
        // The entry guard holds the shard lock across the scan.
        let entry = self.cache.entry(key.clone()).or_insert_with(|| {
            let found = scan(doc, self.scan_limit);
            debug!(?key, found, scan_limit = self.scan_limit, "computed dump gate");
            found
        });
        *entry
    }

    /// Drop the cached answer for `key`; the next `has_dumps` rescans.
    pub fn invalidate(&self, key: &K)
    where
        K: fmt::Debug,
    {
        if self.cache.remove(key).is_some() {
            debug!(?key, "invalidated dump gate");
        }
    }

    #[cfg(test)]
    fn cached(&self, key: &K) -> Option<bool> {
        self.cache.get(key).map(|r| *r)
    }
}

/// Search the first `limit` lines for a dump header.
pub fn scan<D: LineSource + ?Sized>(doc: &D, limit: usize) -> bool {
    let end = doc.line_count().min(limit);
    (0..end).any(|i| doc.line(i).is_some_and(is_dump_header))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "// -----// IR Dump After Foo (foo-pass) //----- //";

    #[test]
    fn detects_header() {
        let gate = DumpGate::default();
        let doc = vec!["hello", HEADER, "module {"];
        assert!(gate.has_dumps(&"a", &doc));
    }

    #[test]
    fn plain_document_has_no_dumps() {
        let gate = DumpGate::default();
        let doc = vec!["hello", "world"];
        assert!(!gate.has_dumps(&"a", &doc));
        assert_eq!(gate.cached(&"a"), Some(false));
    }

    #[test]
    fn empty_document_has_no_dumps() {
        let gate = DumpGate::default();
        let doc: Vec<&str> = Vec::new();
        assert!(!gate.has_dumps(&"a", &doc));
    }

    #[test]
    fn answer_is_memoized_until_invalidated() {
        let gate = DumpGate::default();
        let mut doc = vec!["plain".to_string()];
        assert!(!gate.has_dumps(&"a", &doc));

        doc.push(HEADER.to_string());
        // Edits alone do not refresh the cached answer.
        assert!(!gate.has_dumps(&"a", &doc));

        gate.invalidate(&"a");
        assert_eq!(gate.cached(&"a"), None);
        assert!(gate.has_dumps(&"a", &doc));

        doc.clear();
        gate.invalidate(&"a");
        assert!(!gate.has_dumps(&"a", &doc));
    }

    #[test]
    fn entries_are_per_key() {
        let gate = DumpGate::default();
        assert!(gate.has_dumps(&"dump", &vec![HEADER]));
        assert!(!gate.has_dumps(&"plain", &vec!["x"]));
        gate.invalidate(&"plain");
        assert_eq!(gate.cached(&"dump"), Some(true));
    }

    #[test]
    fn scan_is_bounded() {
        let mut doc = vec!["filler".to_string(); DEFAULT_SCAN_LIMIT];
        doc.push(HEADER.to_string());
        let gate = DumpGate::default();
        assert!(!gate.has_dumps(&"a", &doc));

        doc[DEFAULT_SCAN_LIMIT - 1] = HEADER.to_string();
        gate.invalidate(&"a");
        assert!(gate.has_dumps(&"a", &doc));
    }

    #[test]
    fn zero_limit_never_detects() {
        let gate = DumpGate::new(0);
        assert!(!gate.has_dumps(&"a", &vec![HEADER]));
    }

    #[test]
    fn concurrent_callers_agree() {
        let gate = std::sync::Arc::new(DumpGate::default());
        let doc = std::sync::Arc::new(vec![HEADER.to_string()]);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let gate = std::sync::Arc::clone(&gate);
                let doc = std::sync::Arc::clone(&doc);
                std::thread::spawn(move || gate.has_dumps(&1u32, &*doc))
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
