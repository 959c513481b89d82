//! Parser for flattened VyOS configurations
//!
//! A flattened configuration is the output of `show configuration commands`:
//! one `set` line per configured leaf. [`parser::Parser`] turns such a file
//! into an [`ast::Configuration`] and collects an error for every line it had
//! to skip. The functions re-exported from the pipeline read and parse whole
//! files and render the errors against their source.

pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod parser;
mod pipeline;

pub use pipeline::*;
