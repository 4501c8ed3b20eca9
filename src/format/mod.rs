//! Line codec for delimited rows.
//!
//! This module provides:
//! - `encode` / `encode_row`: Field values to one delimited line
//! - `decode`: One delimited line to schema-width field values
//!
//! Quoting follows the usual CSV convention: a field containing the
//! separator, the quote character or a line break is wrapped in quote
//! characters, and quote characters inside it are doubled. The separator may
//! be any non-empty string (`","`, `"|"`, `"\t"`, `"::"`, ...).

mod decode;
mod encode;

pub use decode::decode;
pub(crate) use decode::{RawField, decode_at, finish_fields, split_fields};
pub use encode::{encode, encode_header, encode_row, needs_quotes};
