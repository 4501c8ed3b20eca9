//! Per-record-type codec options.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{FlatError, Result};

/// Header policy for reading and writing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "HeadersRepr", into = "HeadersRepr")]
pub enum Headers {
    /// No header row
    #[default]
    None,
    /// The first row is a header; written rows use the schema's column names
    FirstRow,
    /// Explicit header names; metadata only, never consumed from input
    Names(Vec<String>),
}

impl Headers {
    /// Returns `true` when the reader must consume a leading header row.
    pub fn consumes_first_row(&self) -> bool {
        matches!(self, Headers::FirstRow)
    }

    /// Explicit header names, if configured.
    pub fn names(&self) -> Option<&[String]> {
        match self {
            Headers::Names(names) => Some(names),
            _ => None,
        }
    }
}

/// `headers` is written in config documents as `true`/`false` or a list.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum HeadersRepr {
    Flag(bool),
    Names(Vec<String>),
}

impl From<HeadersRepr> for Headers {
    fn from(repr: HeadersRepr) -> Self {
        match repr {
            HeadersRepr::Flag(true) => Headers::FirstRow,
            HeadersRepr::Flag(false) => Headers::None,
            HeadersRepr::Names(names) => Headers::Names(names),
        }
    }
}

impl From<Headers> for HeadersRepr {
    fn from(headers: Headers) -> Self {
        match headers {
            Headers::None => HeadersRepr::Flag(false),
            Headers::FirstRow => HeadersRepr::Flag(true),
            Headers::Names(names) => HeadersRepr::Names(names),
        }
    }
}

/// Field converters applied to decoded strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Converter {
    Integer,
    Float,
    /// `Integer`, then `Float`
    Numeric,
}

impl Converter {
    /// Parse a converter name.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "integer" | "int" => Some(Converter::Integer),
            "float" => Some(Converter::Float),
            "numeric" | "number" => Some(Converter::Numeric),
            _ => None,
        }
    }
}

/// Configuration of one record type.
///
/// Every field has a default, so a config document only needs the keys it
/// changes:
///
/// ```rust,ignore
/// let opts = Options::from_json_str(r#"{"col_sep": "|", "headers": true}"#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Field separator, any non-empty length
    pub col_sep: String,
    /// Character wrapping fields that need quoting
    pub quote_char: char,
    /// Row terminator for written lines and line separator for reading
    pub row_sep: String,
    /// Ignore empty input lines
    pub skip_blanks: bool,
    /// Tolerate malformed quoting and ragged rows
    pub liberal_parsing: bool,
    #[serde(deserialize_with = "one_or_many")]
    pub converters: Vec<Converter>,
    pub headers: Headers,
    /// Emit a header row on write
    pub write_headers: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            col_sep: ",".into(),
            quote_char: '"',
            row_sep: "\n".into(),
            skip_blanks: false,
            liberal_parsing: false,
            converters: Vec::new(),
            headers: Headers::None,
            write_headers: false,
        }
    }
}

impl Options {
    /// Create the built-in default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON document and validate them.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let opts: Options =
            serde_json::from_str(s).map_err(|e| FlatError::InvalidOptions(e.to_string()))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Parse options from a YAML document and validate them.
    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let opts: Options =
            serde_yaml::from_str(s).map_err(|e| FlatError::InvalidOptions(e.to_string()))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Serialize the options as a JSON document.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| FlatError::InvalidOptions(e.to_string()))
    }

    /// Check the invariants the codec relies on.
    pub fn validate(&self) -> Result<()> {
        if self.col_sep.is_empty() {
            return Err(FlatError::InvalidOptions("col_sep must not be empty".into()));
        }
        if self.row_sep.is_empty() {
            return Err(FlatError::InvalidOptions("row_sep must not be empty".into()));
        }
        if self.col_sep.contains(self.quote_char) {
            return Err(FlatError::InvalidOptions(format!(
                "col_sep {:?} must not contain the quote character {:?}",
                self.col_sep, self.quote_char
            )));
        }
        Ok(())
    }

    /// Returns `true` if any converter is configured.
    pub fn converts(&self) -> bool {
        !self.converters.is_empty()
    }

    /// Set the field separator (builder pattern).
    pub fn with_col_sep(mut self, col_sep: impl Into<String>) -> Self {
        self.col_sep = col_sep.into();
        self
    }

    pub fn with_quote_char(mut self, quote_char: char) -> Self {
        self.quote_char = quote_char;
        self
    }

    pub fn with_row_sep(mut self, row_sep: impl Into<String>) -> Self {
        self.row_sep = row_sep.into();
        self
    }

    pub fn with_skip_blanks(mut self, skip: bool) -> Self {
        self.skip_blanks = skip;
        self
    }

    pub fn with_liberal_parsing(mut self, liberal: bool) -> Self {
        self.liberal_parsing = liberal;
        self
    }

    /// Append a converter (builder pattern). Duplicates are ignored.
    pub fn with_converter(mut self, converter: Converter) -> Self {
        if !self.converters.contains(&converter) {
            self.converters.push(converter);
        }
        self
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_write_headers(mut self, write: bool) -> Self {
        self.write_headers = write;
        self
    }
}

/// Accept `"numeric"` as well as `["integer", "float"]`.
fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<Converter>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(Converter),
        Many(Vec<Converter>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(c) => vec![c],
        OneOrMany::Many(cs) => cs,
    })
}
