//! Record → line encoding.

use crate::config::Options;
use crate::value::Value;

/// Encode field values into one delimited line, without a terminator.
pub fn encode<'a, I>(values: I, opts: &Options) -> String
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut line = String::new();
    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            line.push_str(&opts.col_sep);
        }
        let text = value.to_field_text();
        // An empty string is quoted so it reads back as "" rather than Null.
        let empty_str = matches!(value, Value::Str(s) if s.is_empty());
        push_field(&mut line, &text, empty_str, opts);
    }
    line
}

/// Encode field values and append `opts.row_sep`.
pub fn encode_row<'a, I>(values: I, opts: &Options) -> String
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut line = encode(values, opts);
    line.push_str(&opts.row_sep);
    line
}

/// Encode a header row from plain names, terminated by `opts.row_sep`.
pub fn encode_header<S: AsRef<str>>(names: &[S], opts: &Options) -> String {
    let values: Vec<Value> = names.iter().map(|n| Value::from(n.as_ref())).collect();
    encode_row(&values, opts)
}

/// Returns `true` if `text` has to be wrapped in quote characters.
pub fn needs_quotes(text: &str, opts: &Options) -> bool {
    overlaps(text, &opts.col_sep)
        || text.contains(opts.quote_char)
        || text.contains(['\r', '\n'])
        || overlaps(text, &opts.row_sep)
}

/// Returns `true` if `sep` placed right after `text` would be found starting
/// inside `text`: either `text` contains `sep`, or it ends with a proper
/// prefix of it (`"a:"` before `"::"`).
fn overlaps(text: &str, sep: &str) -> bool {
    text.contains(sep)
        || (1..sep.len())
            .filter(|&n| sep.is_char_boundary(n))
            .any(|n| text.ends_with(&sep[..n]))
}

fn push_field(line: &mut String, text: &str, force_quotes: bool, opts: &Options) {
    if !force_quotes && !needs_quotes(text, opts) {
        line.push_str(text);
        return;
    }
    let q = opts.quote_char;
    line.push(q);
    for ch in text.chars() {
        if ch == q {
            line.push(q);
        }
        line.push(ch);
    }
    line.push(q);
}
