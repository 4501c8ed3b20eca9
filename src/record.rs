//! Record types and records.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::ops::Index;
use std::path::Path;
use std::sync::{Arc, PoisonError};

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::config::{Options, OptionsRegistry, SharedOptions, TypeId};
use crate::error::{FlatError, Result, Stage};
use crate::format;
use crate::io::{self, Records};
use crate::schema::Schema;
use crate::value::Value;

/// A record type: a schema bound to an options slot in a registry.
///
/// Cloning is cheap and yields a handle to the same type (same id, same
/// options). Use [`RecordType::derive`] to create a distinct type that starts
/// from a copy of this one's options.
#[derive(Clone)]
pub struct RecordType {
    id: TypeId,
    schema: Schema,
    registry: Arc<OptionsRegistry>,
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordType")
            .field("id", &self.id)
            .field("schema", &self.schema)
            .finish()
    }
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RecordType {}

impl RecordType {
    pub(crate) fn from_parts(id: TypeId, schema: Schema, registry: Arc<OptionsRegistry>) -> Self {
        Self {
            id,
            schema,
            registry,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Column names in declaration order.
    pub fn columns(&self) -> &[String] {
        self.schema.columns()
    }

    /// Registry holding this type's options.
    pub fn registry(&self) -> &Arc<OptionsRegistry> {
        &self.registry
    }

    /// Parent this type was derived from, if any.
    pub fn parent(&self) -> Option<TypeId> {
        self.registry.parent_of(self.id)
    }

    /// Create a new record type with the same schema whose options start as a
    /// copy of this type's options.
    ///
    /// The copy is taken when the derived type's options are first accessed.
    pub fn derive(&self) -> RecordType {
        let id = self.registry.register(Some(self.id));
        RecordType::from_parts(id, self.schema.clone(), Arc::clone(&self.registry))
    }

    /// The live options of this type, resolved on first access.
    ///
    /// ```rust,ignore
    /// let people = flatrec::define_schema(["name", "age"]);
    /// people.options().write().unwrap().col_sep = "|".into();
    /// ```
    pub fn options(&self) -> SharedOptions {
        self.registry.get(self.id)
    }

    /// Replace this type's options wholesale.
    pub fn set_options(&self, options: Options) {
        self.registry.set(self.id, options);
    }

    /// Update this type's options in place.
    pub fn update_options<F>(&self, f: F)
    where
        F: FnOnce(&mut Options),
    {
        let shared = self.options();
        let mut opts = shared.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut *opts);
    }

    pub(crate) fn options_snapshot(&self) -> Options {
        self.registry.snapshot(self.id)
    }

    pub fn delimiter(&self) -> String {
        self.registry.delimiter(self.id)
    }

    pub fn set_delimiter(&self, delimiter: impl Into<String>) {
        self.registry.set_delimiter(self.id, delimiter);
    }

    /// Names written in a header row: explicit header names if configured,
    /// otherwise the schema's columns.
    pub fn header_names(&self) -> Vec<String> {
        let opts = self.options_snapshot();
        io::header_names(&opts, &self.schema).to_vec()
    }

    /// Build a record from values in column order.
    ///
    /// Missing trailing values are `Null`; more values than columns is a
    /// `ColumnCountMismatch`.
    pub fn record<I, V>(&self, values: I) -> Result<Record>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let expected = self.schema.len();
        if values.len() > expected {
            return Err(FlatError::ColumnCountMismatch {
                line: 0,
                expected,
                found: values.len(),
            });
        }
        values.resize(expected, Value::Null);
        Ok(Record::from_values(self.clone(), values))
    }

    /// Decode one line into a record.
    pub fn parse_line(&self, line: &str) -> Result<Record> {
        let opts = self.options_snapshot();
        opts.validate()?;
        let values = format::decode_at(line, &opts, self.schema.len(), 1)?;
        Ok(Record::from_values(self.clone(), values))
    }

    /// Lazily decode records from any reader.
    pub fn parse_each<R: Read>(&self, source: R) -> Records<BufReader<R>> {
        Records::new(self.clone(), BufReader::new(source), "-")
    }

    /// Lazily decode records from in-memory text.
    pub fn parse_str<'a>(&self, text: &'a str) -> Records<&'a [u8]> {
        Records::new(self.clone(), text.as_bytes(), "-")
    }

    /// Decode every record from a reader.
    pub fn parse<R: Read>(&self, source: R) -> Result<Vec<Record>> {
        self.parse_each(source).collect_all()
    }

    /// Lazily read records from a file. The file stays open until the
    /// returned stream is dropped.
    pub fn read_each(&self, path: impl AsRef<Path>) -> Result<Records<BufReader<File>>> {
        io::open_records(self.clone(), path.as_ref())
    }

    /// Read every record from a file.
    pub fn read(&self, path: impl AsRef<Path>) -> Result<Vec<Record>> {
        self.read_each(path)?.collect_all()
    }

    /// Write records to `path`, truncating it unless `append` is set.
    ///
    /// A header row is emitted when `write_headers` is on and the file is
    /// being truncated, does not exist yet, or is empty. Returns the number of
    /// records written.
    pub fn write<'a, P, I>(&self, path: P, records: I, append: bool) -> Result<usize>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = &'a Record>,
    {
        let opts = self.options_snapshot();
        io::write_file(&self.schema, &opts, path.as_ref(), records, append)
    }

    /// Append records to `path`; same as `write(path, records, true)`.
    pub fn append<'a, P, I>(&self, path: P, records: I) -> Result<usize>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = &'a Record>,
    {
        self.write(path, records, true)
    }

    /// Write records to any writer, with the same line format as
    /// [`RecordType::write`].
    pub fn write_to<'a, W, I>(&self, writer: &mut W, records: I, write_header: bool) -> Result<usize>
    where
        W: Write + ?Sized,
        I: IntoIterator<Item = &'a Record>,
    {
        let opts = self.options_snapshot();
        opts.validate()?;
        io::write_lines(writer, &self.schema, &opts, records, write_header)
            .map_err(|e| FlatError::file_access(Stage::Write, "-", e))
    }
}

/// One row of a record type: exactly one value per column.
#[derive(Debug, Clone)]
pub struct Record {
    ty: RecordType,
    values: Vec<Value>,
}

impl Record {
    /// `values.len()` must equal the schema width.
    pub(crate) fn from_values(ty: RecordType, values: Vec<Value>) -> Self {
        debug_assert_eq!(values.len(), ty.schema().len());
        Self { ty, values }
    }

    pub fn record_type(&self) -> &RecordType {
        &self.ty
    }

    pub fn schema(&self) -> &Schema {
        self.ty.schema()
    }

    /// Values in column order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.values.get_mut(index)
    }

    /// Value of the first column called `name`.
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.schema().index_of(name).map(|i| &self.values[i])
    }

    /// Replace the value of the first column called `name`.
    pub fn set_by_name(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let index = self
            .schema()
            .index_of(name)
            .ok_or_else(|| FlatError::UnknownColumn(name.to_string()))?;
        self.values[index] = value.into();
        Ok(())
    }

    /// Encode this record with its type's current options.
    ///
    /// The row terminator is appended only when `eol` is set. With `eol` the
    /// output is byte-identical to the line [`RecordType::write`] produces for
    /// this record, so appending records one at a time matches a bulk write.
    pub fn to_line(&self, eol: bool) -> String {
        let opts = self.ty.options_snapshot();
        if eol {
            format::encode_row(&self.values, &opts)
        } else {
            format::encode(&self.values, &opts)
        }
    }

    /// Column name → value object.
    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        for (column, value) in self.schema().columns().iter().zip(&self.values) {
            let json = match value {
                Value::Null => serde_json::Value::Null,
                Value::Int(i) => serde_json::Value::from(*i),
                Value::Float(f) => serde_json::Number::from_f64(*f)
                    .map_or(serde_json::Value::Null, serde_json::Value::Number),
                Value::Str(s) => serde_json::Value::String(s.clone()),
            };
            obj.insert(column.clone(), json);
        }
        serde_json::Value::Object(obj)
    }
}

/// Records are equal when they have the same schema and the same values,
/// regardless of which (possibly derived) type produced them.
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.schema() == other.schema() && self.values == other.values
    }
}

impl Index<usize> for Record {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.values[index]
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line(false))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.schema().columns().iter().zip(&self.values) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
