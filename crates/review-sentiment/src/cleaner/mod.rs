//! Text cleaning for review bodies.
//!
//! This module provides:
//! - Lowercasing and URL removal
//! - Stripping everything that is not a lowercase ASCII letter
//! - Whitespace collapsing

mod normalizer;

pub use normalizer::{normalize_column, normalize_text};
