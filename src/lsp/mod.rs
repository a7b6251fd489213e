//! LSP protocol feature implementations.
//!
//! This module provides folding ranges that collapse IR dumps while leaving
//! diagnostics and crash traces on screen.

mod folding;

pub use folding::folding_ranges;
