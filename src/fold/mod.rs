//! Fold classification for IR dump logs.
//!
//! This module provides:
//! - `patterns` with the per-line recognizers (dump headers, diagnostics, crash markers)
//! - `classify` deciding whether a line must stay visible, from itself and its two neighbours
//! - `DumpGate`, the cached "does this document contain dumps at all" check
//! - `fold_level` and region materialization built on top of the above
//! - `summarize` for the label shown in place of a folded region

mod classify;
mod gate;
mod level;
pub mod patterns;
mod summary;

pub use classify::{classify, explain, ProtectReason, Protection};
pub use gate::{DumpGate, DEFAULT_SCAN_LIMIT};
pub use level::{
    collapsible_ranges, fold_level, fold_levels, regions, CollapsibleRange, FoldLevel, Region,
};
pub use summary::{dump_title, summarize};

/// Read-only, line-indexed access to a document's text.
///
/// Lines are addressed from 0 and never include their line terminator.
pub trait LineSource {
    /// Number of lines in the document.
    fn line_count(&self) -> usize;

    /// Text of the line at `index`, or `None` past the end of the document.
    fn line(&self, index: usize) -> Option<&str>;
}

impl<S: AsRef<str>> LineSource for [S] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line(&self, index: usize) -> Option<&str> {
        self.get(index).map(AsRef::as_ref)
    }
}

impl<S: AsRef<str>> LineSource for Vec<S> {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line(&self, index: usize) -> Option<&str> {
        self.get(index).map(AsRef::as_ref)
    }
}

/// Line text for context lookups: anything outside the document reads as empty.
pub(crate) fn line_or_empty<D: LineSource + ?Sized>(doc: &D, index: Option<usize>) -> &str {
    index.and_then(|i| doc.line(i)).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_and_vecs_are_line_sources() {
        let owned = vec!["a".to_string(), "b".to_string()];
        assert_eq!(owned.line_count(), 2);
        assert_eq!(owned.line(1), Some("b"));
        assert_eq!(owned.line(2), None);

        let borrowed: &[&str] = &["x"];
        assert_eq!(borrowed.line_count(), 1);
        assert_eq!(borrowed.line(0), Some("x"));
    }

    #[test]
    fn missing_neighbours_read_as_empty() {
        let doc = vec!["only"];
        assert_eq!(line_or_empty(&doc, None), "");
        assert_eq!(line_or_empty(&doc, Some(0)), "only");
        assert_eq!(line_or_empty(&doc, Some(1)), "");
    }
}
