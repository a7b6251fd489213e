//! Plain-text renderings of fold decisions, for the command line.
//!
//! Line numbers are printed 1-based.

use std::fmt::{self, Write};
use std::hash::Hash;

use crate::fold::{
    collapsible_ranges, explain, fold_levels, regions, DumpGate, FoldLevel, LineSource,
};

/// One row per line: number, fold level, protecting rule and text.
pub fn render_levels<K, D>(gate: &DumpGate<K>, key: &K, doc: &D) -> String
where
    K: Eq + Hash + Clone + fmt::Debug,
    D: LineSource + ?Sized,
{
    let levels = fold_levels(gate, key, doc);
    let has_dumps = gate.has_dumps(key, doc);
    let width = levels.len().to_string().len();
    let mut out = String::new();

    for (line, level) in levels.iter().enumerate() {
        let reason = match level {
            FoldLevel::NoFold if has_dumps => explain(doc, line).map(|r| r.as_str()),
            _ => None,
        };
        let reason = reason.unwrap_or("");
        let text = doc.line(line).unwrap_or("");
        let row = format!("{:>width$} {level:<8} {reason:<25} | {text}", line + 1);
        let _ = writeln!(out, "{}", row.trim_end());
    }

    out
}

/// One block per region with its label and the line spans it hides.
pub fn render_regions<K, D>(gate: &DumpGate<K>, key: &K, doc: &D) -> String
where
    K: Eq + Hash + Clone + fmt::Debug,
    D: LineSource + ?Sized,
{
    let regions = regions(gate, key, doc);
    if regions.is_empty() {
        return "no IR dumps detected\n".to_string();
    }

    let ranges = collapsible_ranges(gate, key, doc);
    let mut out = String::new();

    for region in regions {
        let _ = writeln!(
            out,
            "{}-{}: {}",
            region.start + 1,
            region.end + 1,
            region.label(doc)
        );
        for range in ranges.iter().filter(|r| r.region == region) {
            let _ = writeln!(
                out,
                "  hides {}-{} below line {}",
                range.anchor + 2,
                range.end + 1,
                range.anchor + 1
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    #[test]
    fn levels_of_plain_document() {
        let lines = ["hello", "", "world"];
        let gate = DumpGate::default();
        let actual = render_levels(&gate, &(), &lines[..]);
        let expected = expect![[r#"
            1 none                               | hello
            2 none                               |
            3 none                               | world
        "#]];
        expected.assert_eq(&actual);
    }

    #[test]
    fn regions_of_plain_document() {
        let lines = ["hello"];
        let gate = DumpGate::default();
        assert_eq!(render_regions(&gate, &(), &lines[..]), "no IR dumps detected\n");
    }
}
