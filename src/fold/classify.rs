//! Decides which lines must stay visible no matter how the document is folded.
//!
//! A verdict depends on the line itself and at most one line on either side.
//! Lines outside the document read as the empty string.

use std::fmt;

use super::patterns::{
    is_blank, is_caret_marker, is_compiler_error_prefix, is_crash_banner, is_crash_marker,
    is_file_location_error, is_stack_frame, starts_with_whitespace,
};
use super::{line_or_empty, LineSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protection {
    /// Must stay visible regardless of fold state.
    Protected,
    Unprotected,
}

/// The rule that protected a line, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtectReason {
    /// `/path/file.mlir:L:C:` diagnostic.
    FileLocation,
    /// Column pointer under a diagnostic.
    Caret,
    /// Assertion, stack dump, core dump or stack frame.
    CrashMarker,
    /// Blank separator right before a tool error line.
    BlankBeforeToolError,
    /// Blank line right after a diagnostic.
    BlankAfterFileLocation,
    /// Tool error line right after a blank separator.
    ToolErrorAfterBlank,
    /// Indented detail under a diagnostic.
    FileLocationDetail,
    /// Indented line or blank separator closing a stack trace.
    StackTraceTail,
    /// First line after an assertion or dump banner.
    AfterCrashMarker,
}

impl ProtectReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ProtectReason::FileLocation => "file-location",
            ProtectReason::Caret => "caret",
            ProtectReason::CrashMarker => "crash-marker",
            ProtectReason::BlankBeforeToolError => "blank-before-tool-error",
            ProtectReason::BlankAfterFileLocation => "blank-after-file-location",
            ProtectReason::ToolErrorAfterBlank => "tool-error-after-blank",
            ProtectReason::FileLocationDetail => "file-location-detail",
            ProtectReason::StackTraceTail => "stack-trace-tail",
            ProtectReason::AfterCrashMarker => "after-crash-marker",
        }
    }
}

impl fmt::Display for ProtectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Classify a single line.
pub fn classify<D: LineSource + ?Sized>(doc: &D, line: usize) -> Protection {
    match explain(doc, line) {
        Some(_) => Protection::Protected,
        None => Protection::Unprotected,
    }
}

/// The first rule that protects `line`, or `None` if it may be folded.
///
/// Lines past the end of the document are never protected.
pub fn explain<D: LineSource + ?Sized>(doc: &D, line: usize) -> Option<ProtectReason> {
    let current = doc.line(line)?;
    let prev = line_or_empty(doc, line.checked_sub(1));
    let next = line_or_empty(doc, line.checked_add(1));

    if is_file_location_error(current) {
        return Some(ProtectReason::FileLocation);
    }
    if is_caret_marker(current) {
        return Some(ProtectReason::Caret);
    }
    if is_crash_marker(current) {
        return Some(ProtectReason::CrashMarker);
    }

    let blank = is_blank(current);
    if blank {
        if is_compiler_error_prefix(next) {
            return Some(ProtectReason::BlankBeforeToolError);
        }
        if is_file_location_error(prev) {
            return Some(ProtectReason::BlankAfterFileLocation);
        }
        // Still eligible for the stack trace rules below.
    } else {
        if is_compiler_error_prefix(current) && is_blank(prev) {
            return Some(ProtectReason::ToolErrorAfterBlank);
        }
        if is_file_location_error(prev) && starts_with_whitespace(current) {
            return Some(ProtectReason::FileLocationDetail);
        }
    }

    if is_stack_frame(prev) && (blank || starts_with_whitespace(current)) {
        return Some(ProtectReason::StackTraceTail);
    }
    if is_crash_banner(prev) {
        return Some(ProtectReason::AfterCrashMarker);
    }

    None
}
