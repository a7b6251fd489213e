//! Per-line fold levels and the regions they imply.
//!
//! Folding is flat: a dump header starts a region, every following foldable
//! line continues it, and protected lines stay visible without ending it.

use std::fmt;
use std::hash::Hash;

use super::classify::{classify, Protection};
use super::gate::DumpGate;
use super::patterns::is_dump_header;
use super::summary::summarize;
use super::LineSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldLevel {
    /// Never folded.
    NoFold,
    /// First line of a region (a dump header).
    Start,
    /// Folded into the most recent region.
    Continue,
}

impl fmt::Display for FoldLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            FoldLevel::NoFold => "none",
            FoldLevel::Start => "start",
            FoldLevel::Continue => "continue",
        })
    }
}

/// Fold level of one line.
///
/// Documents the gate reports as dump-free get `NoFold` everywhere, as do
/// indices past the end of the document.
pub fn fold_level<K, D>(gate: &DumpGate<K>, key: &K, doc: &D, line: usize) -> FoldLevel
where
    K: Eq + Hash + Clone + fmt::Debug,
    D: LineSource + ?Sized,
{
    if !gate.has_dumps(key, doc) {
        return FoldLevel::NoFold;
    }
    level_of(doc, line)
}

/// Level of a line once the document is known to contain dumps.
fn level_of<D: LineSource + ?Sized>(doc: &D, line: usize) -> FoldLevel {
    let Some(text) = doc.line(line) else {
        return FoldLevel::NoFold;
    };
    if is_dump_header(text) {
        return FoldLevel::Start;
    }
    match classify(doc, line) {
        Protection::Protected => FoldLevel::NoFold,
        Protection::Unprotected => FoldLevel::Continue,
    }
}

/// Fold levels for every line of the document.
pub fn fold_levels<K, D>(gate: &DumpGate<K>, key: &K, doc: &D) -> Vec<FoldLevel>
where
    K: Eq + Hash + Clone + fmt::Debug,
    D: LineSource + ?Sized,
{
    let count = doc.line_count();
    if !gate.has_dumps(key, doc) {
        return vec![FoldLevel::NoFold; count];
    }
    (0..count).map(|line| level_of(doc, line)).collect()
}

/// A foldable region: a dump header and everything up to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// The dump header line.
    pub start: usize,
    /// Last line, inclusive.
    pub end: usize,
}

impl Region {
    /// Number of lines, header included.
    pub fn line_count(&self) -> usize {
        self.end - self.start + 1
    }

    /// Label shown in place of the region when it is folded.
    pub fn label<D: LineSource + ?Sized>(&self, doc: &D) -> String {
        summarize(doc.line(self.start).unwrap_or(""), self.line_count())
    }
}

/// A run of foldable lines inside a region, anchored on the visible line
/// right above it.
///
/// Lines `anchor + 1 ..= end` are hidden when collapsed. The anchor is the
/// region's header for the first run and a protected line for later runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollapsibleRange {
    pub anchor: usize,
    pub end: usize,
    pub region: Region,
}

impl CollapsibleRange {
    /// Whether the anchor is the region's dump header.
    pub fn is_header_anchored(&self) -> bool {
        self.anchor == self.region.start
    }

    pub fn hidden_lines(&self) -> usize {
        self.end - self.anchor
    }
}

/// All regions of the document, in order.
///
/// Lines before the first dump header belong to no region.
pub fn regions<K, D>(gate: &DumpGate<K>, key: &K, doc: &D) -> Vec<Region>
where
    K: Eq + Hash + Clone + fmt::Debug,
    D: LineSource + ?Sized,
{
    regions_from_levels(&fold_levels(gate, key, doc))
}

fn regions_from_levels(levels: &[FoldLevel]) -> Vec<Region> {
    let mut regions = Vec::new();
    let mut open: Option<usize> = None;

    for (line, level) in levels.iter().enumerate() {
        if *level == FoldLevel::Start {
            if let Some(start) = open {
                regions.push(Region {
                    start,
                    end: line - 1,
                });
            }
            open = Some(line);
        }
    }
    if let Some(start) = open {
        regions.push(Region {
            start,
            end: levels.len() - 1,
        });
    }

    regions
}

/// Every collapsible run in the document. Protected lines are never inside
/// a run.
pub fn collapsible_ranges<K, D>(gate: &DumpGate<K>, key: &K, doc: &D) -> Vec<CollapsibleRange>
where
    K: Eq + Hash + Clone + fmt::Debug,
    D: LineSource + ?Sized,
{
    let levels = fold_levels(gate, key, doc);
    let mut ranges = Vec::new();

    for region in regions_from_levels(&levels) {
        let mut anchor = region.start;
        let mut run_end: Option<usize> = None;

        for line in region.start + 1..=region.end {
            match levels[line] {
                FoldLevel::Continue => run_end = Some(line),
                FoldLevel::NoFold | FoldLevel::Start => {
                    if let Some(end) = run_end.take() {
                        ranges.push(CollapsibleRange { anchor, end, region });
                    }
                    anchor = line;
                }
            }
        }
        if let Some(end) = run_end {
            ranges.push(CollapsibleRange { anchor, end, region });
        }
    }

    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "// -----// IR Dump After Foo (foo-pass) //----- //";

    fn levels(lines: &[&str]) -> Vec<FoldLevel> {
        let gate = DumpGate::default();
        fold_levels(&gate, &0u8, lines)
    }

    #[test]
    fn no_dumps_means_no_folds() {
        let lines = ["module {", "  %0 = arith.constant 0 : i32", "}"];
        let gate = DumpGate::default();
        for line in 0..lines.len() {
            assert_eq!(fold_level(&gate, &0u8, &lines[..], line), FoldLevel::NoFold);
        }
        assert!(regions(&gate, &0u8, &lines[..]).is_empty());
        assert!(collapsible_ranges(&gate, &0u8, &lines[..]).is_empty());
    }

    #[test]
    fn header_starts_and_body_continues() {
        let lines = ["// -----// IR Dump After Foo (foo-pass)", "module {", "}"];
        assert_eq!(levels(&lines), vec![
            FoldLevel::Start,
            FoldLevel::Continue,
            FoldLevel::Continue,
        ]);
    }

    #[test]
    fn protected_lines_are_not_folded() {
        let lines = [
            HEADER,
            "module {",
            "/abs/path/file.mlir:12:3: error: x",
            "  %0 = \"foo.op\"() : () -> i32",
            "}",
        ];
        assert_eq!(levels(&lines), vec![
            FoldLevel::Start,
            FoldLevel::Continue,
            FoldLevel::NoFold,
            FoldLevel::NoFold,
            FoldLevel::Continue,
        ]);
    }

    #[test]
    fn out_of_range_is_no_fold() {
        let lines = [HEADER];
        let gate = DumpGate::default();
        assert_eq!(fold_level(&gate, &0u8, &lines[..], 5), FoldLevel::NoFold);
    }

    #[test]
    fn fold_level_is_idempotent() {
        let lines = [HEADER, "module {", "", "iree-compile: error: x"];
        let gate = DumpGate::default();
        for line in 0..lines.len() {
            let first = fold_level(&gate, &0u8, &lines[..], line);
            let second = fold_level(&gate, &0u8, &lines[..], line);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn regions_split_on_headers() {
        let lines = [
            "preamble",
            HEADER,
            "module {",
            "}",
            "// -----// IR Dump After Bar (bar-pass) //----- //",
            "module {",
        ];
        let gate = DumpGate::default();
        assert_eq!(regions(&gate, &0u8, &lines[..]), vec![
            Region { start: 1, end: 3 },
            Region { start: 4, end: 5 },
        ]);
    }

    #[test]
    fn runs_restart_after_protected_lines() {
        let lines = [
            HEADER,                               // 0
            "module {",                           // 1
            "/abs/path/file.mlir:12:3: error: x", // 2
            "          ^",                        // 3
            "  %1 = arith.addi %0, %0 : i32",     // 4
            "}",                                  // 5
        ];
        let gate = DumpGate::default();
        let region = Region { start: 0, end: 5 };
        assert_eq!(collapsible_ranges(&gate, &0u8, &lines[..]), vec![
            CollapsibleRange { anchor: 0, end: 1, region },
            CollapsibleRange { anchor: 3, end: 5, region },
        ]);
    }

    #[test]
    fn header_without_body_has_no_run() {
        let lines = [HEADER, "// -----// IR Dump After Bar (bar-pass) //----- //"];
        let gate = DumpGate::default();
        assert_eq!(regions(&gate, &0u8, &lines[..]).len(), 2);
        assert!(collapsible_ranges(&gate, &0u8, &lines[..]).is_empty());
    }

    #[test]
    fn trailing_protected_line_closes_run() {
        let lines = [HEADER, "module {", "}", "Stack dump:"];
        let gate = DumpGate::default();
        let ranges = collapsible_ranges(&gate, &0u8, &lines[..]);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].end, 2);
        assert!(ranges[0].is_header_anchored());
        assert_eq!(ranges[0].hidden_lines(), 2);
    }

    #[test]
    fn region_label_uses_header() {
        let lines = ["// -----// IR Dump After Foo (foo-pass)"];
        let region = Region { start: 0, end: 9 };
        let label = region.label(&lines[..]);
        assert!(label.contains("IR Dump After Foo"), "{label}");
        assert!(label.contains("10 lines"), "{label}");
    }
}
