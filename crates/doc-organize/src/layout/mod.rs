//! Layout calculation modules
//!
//! This module handles the geometric work of organizing a document:
//! - Artboard packing (row detection and row-major repacking)
//! - Column flow for the table of contents
//! - Vertical flow of measured rows for callout lists
//!
//! The planning functions are pure; the `apply`/`pack` entry points write
//! the result into a [`crate::Document`].

mod columns;
mod flow;
mod pack;
mod types;

pub use columns::*;
pub use flow::*;
pub use pack::*;
pub use types::*;
