//! # flatrec
//!
//! Typed records over delimited flat files (CSV, PSV, TSV and friends).
//!
//! ## Overview
//!
//! flatrec provides:
//! - **Record types**: A fixed column schema bound to per-type options
//! - **Inheritable options**: A derived type starts from a copy of its parent's
//!   options and is independent from then on
//! - **Line codec**: Quoting, any-length delimiters, optional numeric conversion
//! - **Streaming reads**: Lazy record iterators over text, readers and files
//! - **Writes**: Truncate or append, with a header row only where it belongs
//! - **Leniency**: Liberal parsing pads ragged rows and keeps malformed fields
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use flatrec::{Converter, Headers, define_schema};
//!
//! fn main() -> flatrec::Result<()> {
//!     let people = define_schema(["name", "age"]);
//!     people.update_options(|o| {
//!         o.col_sep = "|".into();
//!         o.headers = Headers::FirstRow;
//!         o.write_headers = true;
//!         o.converters = vec![Converter::Numeric];
//!     });
//!
//!     let alice = people.record(["alice", "31"])?;
//!     people.write("people.psv", [&alice], false)?;
//!
//!     for record in people.read_each("people.psv")? {
//!         let record = record?;
//!         println!("{}", record.to_line(false));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Options resolution
//!
//! Options are materialized the first time a type needs them. A root type
//! gets [`Options::default`]; a type created with [`RecordType::derive`] gets a
//! copy of its parent's options at that moment. The handle returned by
//! [`RecordType::options`] is live: changes made through it apply to every
//! later operation of that type, and only that type.
//!
//! ## Features
//!
//! - `yaml` - Load options from YAML documents
//! - `miette` - Pretty error reporting with miette
//!
//! ## Concurrency
//!
//! Everything is synchronous. Options of one type are shared, mutable state:
//! callers that mutate them while another thread reads or writes records of
//! that type must serialize those operations. Nothing coordinates separate
//! processes writing the same file.

// Core modules
pub mod config;
pub mod error;
pub mod format;
pub mod io;
pub mod record;
pub mod schema;
pub mod value;

// Re-exports for convenience
pub use config::{Converter, Headers, Options, OptionsRegistry, SharedOptions, TypeId};
pub use error::{FlatError, Result, Stage};
pub use io::Records;
pub use record::{Record, RecordType};
pub use schema::Schema;
pub use value::Value;

/// Define a root record type in the process-wide registry.
pub fn define_schema<I, S>(columns: I) -> RecordType
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    OptionsRegistry::global().define(columns)
}

// Miette re-exports
#[cfg(feature = "miette")]
pub use error::FlatDiagnostic;
