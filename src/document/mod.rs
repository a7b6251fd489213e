//! Document state management and text utilities.
//!
//! This module provides:
//! - `LineIndex` for line-indexed access to document text
//! - `DocumentState` and `DocumentStore` for document lifecycle management

mod state;
mod text;

pub use state::{DocumentState, DocumentStore};
pub use text::LineIndex;
