//! Line recognizers for IR dump logs.
//!
//! Every recognizer is a pure `&str -> bool` over a single line. Regexes are
//! compiled once and match in linear time.

use regex::Regex;
use std::sync::LazyLock;

/// Decorative rule that MLIR prints ahead of every IR dump.
pub const DUMP_MARKER: &str = "// -----// ";

/// `// -----// IR Dump Before|After <pass> [Failed]`.
static DUMP_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^// -----// IR Dump").unwrap());

/// `/abs/path/file.mlir:12:3:` diagnostic prefix.
static FILE_LOCATION_ERROR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/[^:\s]*\.(?:mlir|cpp|cc|cxx|c|hpp|h|td|inc|py):\d+:\d+:").unwrap()
});

/// A lone column pointer under a diagnostic.
static CARET_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\^\s*$").unwrap());

/// `iree-compile: error: ...`, `mlir-opt- ...`, any lowercase tool name.
static COMPILER_ERROR_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z-]*[:-]").unwrap());

/// `#3 0x00007f1234567890 in ...` from a symbolized backtrace.
static STACK_FRAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#\d+\s+0x[0-9a-fA-F]+").unwrap());

static ASSERTION_FAILURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Assertion.*failed").unwrap());

pub fn is_dump_header(line: &str) -> bool {
    DUMP_HEADER.is_match(line)
}

pub fn is_file_location_error(line: &str) -> bool {
    FILE_LOCATION_ERROR.is_match(line)
}

pub fn is_caret_marker(line: &str) -> bool {
    CARET_MARKER.is_match(line)
}

pub fn is_compiler_error_prefix(line: &str) -> bool {
    COMPILER_ERROR_PREFIX.is_match(line)
}

pub fn is_stack_frame(line: &str) -> bool {
    STACK_FRAME.is_match(line)
}

/// Empty or whitespace-only.
pub fn is_blank(line: &str) -> bool {
    line.chars().all(char::is_whitespace)
}

pub fn is_assertion_failure(line: &str) -> bool {
    ASSERTION_FAILURE.is_match(line)
}

/// `Stack dump:` banner, or a core-dump banner.
pub fn is_stack_dump_start(line: &str) -> bool {
    line.starts_with("Stack dump:") || is_core_dump(line)
}

pub fn is_core_dump(line: &str) -> bool {
    line.starts_with("core dump")
}

/// Any line that announces a crash: assertion, stack dump, core dump or a frame.
pub fn is_crash_marker(line: &str) -> bool {
    is_assertion_failure(line) || is_stack_dump_start(line) || is_stack_frame(line)
}

/// Crash banners only, without individual frames.
pub(crate) fn is_crash_banner(line: &str) -> bool {
    is_assertion_failure(line) || is_stack_dump_start(line)
}

pub(crate) fn starts_with_whitespace(line: &str) -> bool {
    line.starts_with(char::is_whitespace)
}
