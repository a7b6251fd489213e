//! Labels for folded regions.

use super::patterns::DUMP_MARKER;

/// Closing decoration MLIR appends to dump headers.
const DUMP_TRAILER: &str = "//----- //";

/// The pass description of a dump header, e.g. `IR Dump After CSE (cse)`.
///
/// Returns `None` when the line carries no dump marker or nothing follows it.
pub fn dump_title(line: &str) -> Option<&str> {
    let (_, rest) = line.split_once(DUMP_MARKER)?;
    let rest = rest.trim();
    let title = rest.strip_suffix(DUMP_TRAILER).unwrap_or(rest).trim();
    (!title.is_empty()).then_some(title)
}

/// Label for a folded region of `line_count` lines starting at `header`.
///
/// Falls back to the trimmed header text when no title can be isolated.
pub fn summarize(header: &str, line_count: usize) -> String {
    let title = dump_title(header).unwrap_or_else(|| header.trim());
    let noun = if line_count == 1 { "line" } else { "lines" };
    format!("{title} ({line_count} {noun})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_without_trailer() {
        assert_eq!(
            dump_title("// -----// IR Dump After Foo (foo-pass)"),
            Some("IR Dump After Foo (foo-pass)")
        );
    }

    #[test]
    fn title_with_trailer() {
        assert_eq!(
            dump_title("// -----// IR Dump Before CSE (cse) //----- //"),
            Some("IR Dump Before CSE (cse)")
        );
        assert_eq!(
            dump_title("// -----// IR Dump After Inliner Failed (inline) //----- //  "),
            Some("IR Dump After Inliner Failed (inline)")
        );
    }

    #[test]
    fn no_title() {
        assert_eq!(dump_title("module {"), None);
        assert_eq!(dump_title("// -----// "), None);
        assert_eq!(dump_title("// -----// //----- //"), None);
    }

    #[test]
    fn summarizes_header() {
        let label = summarize("// -----// IR Dump After Foo (foo-pass)", 10);
        assert_eq!(label, "IR Dump After Foo (foo-pass) (10 lines)");
    }

    #[test]
    fn singular_line() {
        assert_eq!(
            summarize("// -----// IR Dump After Foo (foo-pass)", 1),
            "IR Dump After Foo (foo-pass) (1 line)"
        );
    }

    #[test]
    fn falls_back_to_raw_text() {
        assert_eq!(summarize("  something else  ", 3), "something else (3 lines)");
        assert_eq!(summarize("", 0), " (0 lines)");
    }
}
