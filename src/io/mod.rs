//! Streaming reader and writer.
//!
//! This module provides:
//! - `Records`: Lazy record stream over text, any `Read`, or a file
//! - File writing with truncate/append semantics and conditional headers

mod reader;
mod writer;

pub(crate) use reader::open_records;
pub use reader::Records;
pub(crate) use writer::{header_names, write_file, write_lines};
