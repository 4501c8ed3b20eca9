//! Configuration of record types.
//!
//! This module provides:
//! - `Options`: Codec settings of one record type
//! - `Headers`: Header policy (none, first row, explicit names)
//! - `Converter`: Best-effort field converters
//! - `OptionsRegistry`: Lazy per-type resolution with inheritance by clone

mod options;
mod registry;

pub use options::{Converter, Headers, Options};
pub use registry::{OptionsRegistry, SharedOptions, TypeId};
