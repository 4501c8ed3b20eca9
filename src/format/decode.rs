//! Line → field decoding.

use crate::config::Options;
use crate::error::{FlatError, Result};
use crate::value::Value;

/// One field as it appeared in the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawField {
    pub text: String,
    pub quoted: bool,
}

impl RawField {
    fn into_value(self) -> Value {
        if !self.quoted && self.text.is_empty() {
            Value::Null
        } else {
            Value::Str(self.text)
        }
    }
}

enum Quoted {
    Closed { text: String, end: usize, at_sep: bool },
    Unterminated,
    TrailingText,
}

/// Split one logical line into raw fields.
///
/// Returns `Ok(None)` when a quoted field is still open at the end of `line`
/// and `at_end` is false, meaning the caller should join the next physical
/// line and try again. At the end of input an open quote is malformed, or kept
/// verbatim under liberal parsing.
pub(crate) fn split_fields(
    line: &str,
    opts: &Options,
    at_end: bool,
    line_no: usize,
) -> Result<Option<Vec<RawField>>> {
    if line.is_empty() {
        return Ok(Some(Vec::new()));
    }

    let sep = opts.col_sep.as_str();
    let q = opts.quote_char;
    let liberal = opts.liberal_parsing;
    let mut fields = Vec::new();
    let mut pos = 0;

    loop {
        let rest = &line[pos..];

        if rest.starts_with(q) {
            match scan_quoted(rest, q, sep) {
                Quoted::Closed { text, end, at_sep } => {
                    fields.push(RawField { text, quoted: true });
                    if !at_sep {
                        break;
                    }
                    pos += end + sep.len();
                    continue;
                }
                Quoted::Unterminated if !at_end => return Ok(None),
                Quoted::Unterminated if !liberal => {
                    return Err(malformed(line_no, "unclosed quoted field"));
                }
                Quoted::TrailingText if !liberal => {
                    return Err(malformed(line_no, "unexpected text after closing quote"));
                }
                // liberal: take the field verbatim up to the next separator
                _ => {}
            }
        }

        let end = rest.find(sep).unwrap_or(rest.len());
        let text = &rest[..end];
        if !liberal && text.contains(q) {
            return Err(malformed(line_no, "quote character in unquoted field"));
        }
        fields.push(RawField {
            text: text.to_string(),
            quoted: false,
        });
        if end == rest.len() {
            break;
        }
        pos += end + sep.len();
    }

    Ok(Some(fields))
}

fn scan_quoted(rest: &str, q: char, sep: &str) -> Quoted {
    let q_len = q.len_utf8();
    let mut text = String::new();
    let mut i = q_len;
    loop {
        let Some(offset) = rest[i..].find(q) else {
            return Quoted::Unterminated;
        };
        text.push_str(&rest[i..i + offset]);
        let after = i + offset + q_len;
        let tail = &rest[after..];
        if tail.starts_with(q) {
            // doubled quote is an escaped quote
            text.push(q);
            i = after + q_len;
        } else if tail.is_empty() {
            return Quoted::Closed {
                text,
                end: after,
                at_sep: false,
            };
        } else if tail.starts_with(sep) {
            return Quoted::Closed {
                text,
                end: after,
                at_sep: true,
            };
        } else {
            return Quoted::TrailingText;
        }
    }
}

/// Turn raw fields into schema-width values, applying arity rules and
/// converters.
pub(crate) fn finish_fields(
    raw: Vec<RawField>,
    opts: &Options,
    expected: usize,
    line_no: usize,
) -> Result<Vec<Value>> {
    // A one-column row holding Null is written as an empty line.
    let raw = if raw.is_empty() && expected == 1 {
        vec![RawField {
            text: String::new(),
            quoted: false,
        }]
    } else {
        raw
    };

    let found = raw.len();
    if found != expected && !opts.liberal_parsing {
        return Err(FlatError::ColumnCountMismatch {
            line: line_no,
            expected,
            found,
        });
    }

    let mut values: Vec<Value> = raw
        .into_iter()
        .take(expected)
        .map(|f| {
            let value = f.into_value();
            if opts.converts() {
                value.convert(&opts.converters)
            } else {
                value
            }
        })
        .collect();
    values.resize(expected, Value::Null);
    Ok(values)
}

/// Decode one complete line into exactly `expected` values.
pub(crate) fn decode_at(
    line: &str,
    opts: &Options,
    expected: usize,
    line_no: usize,
) -> Result<Vec<Value>> {
    // at_end = true, so an open quote is reported rather than deferred
    let raw = split_fields(line, opts, true, line_no)?.unwrap_or_default();
    finish_fields(raw, opts, expected, line_no)
}

/// Decode one line into exactly `expected` values.
///
/// Quoted fields may contain the separator, doubled quote characters and line
/// breaks. Under strict parsing, malformed quoting and a field count other
/// than `expected` are errors; under liberal parsing malformed fields are kept
/// verbatim, short rows are padded with `Null` and long rows are truncated.
pub fn decode(line: &str, opts: &Options, expected: usize) -> Result<Vec<Value>> {
    opts.validate()?;
    decode_at(line, opts, expected, 1)
}

fn malformed(line: usize, reason: &str) -> FlatError {
    FlatError::MalformedRow {
        line,
        reason: reason.to_string(),
    }
}
