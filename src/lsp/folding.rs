//! Folding ranges for dump-log documents.

use std::fmt;
use std::hash::Hash;

use tower_lsp::lsp_types::{FoldingRange, FoldingRangeKind};

use crate::fold::{collapsible_ranges, CollapsibleRange, DumpGate, LineSource};

/// Convert one collapsible run to an LSP folding range.
///
/// Only runs hanging off a dump header get a collapsed label; runs anchored on
/// a protected line leave that line's own text on screen.
fn to_folding_range<D: LineSource + ?Sized>(range: &CollapsibleRange, doc: &D) -> FoldingRange {
    let collapsed_text = range
        .is_header_anchored()
        .then(|| range.region.label(doc));

    FoldingRange {
        start_line: saturating_line(range.anchor),
        start_character: None,
        end_line: saturating_line(range.end),
        end_character: None,
        kind: Some(FoldingRangeKind::Region),
        collapsed_text,
    }
}

/// LSP lines are `u32`; longer documents clamp to the last addressable line.
fn saturating_line(line: usize) -> u32 {
    u32::try_from(line).unwrap_or(u32::MAX)
}

/// Folding ranges for a whole document.
pub fn folding_ranges<K, D>(gate: &DumpGate<K>, key: &K, doc: &D) -> Vec<FoldingRange>
where
    K: Eq + Hash + Clone + fmt::Debug,
    D: LineSource + ?Sized,
{
    collapsible_ranges(gate, key, doc)
        .iter()
        .map(|range| to_folding_range(range, doc))
        .collect()
}
