//! Decoding tests: quoting, arity, leniency and conversion.

use crate::config::{Converter, Options};
use crate::error::FlatError;
use crate::format::decode;
use crate::value::Value;

fn s(text: &str) -> Value {
    Value::Str(text.to_string())
}

#[test]
fn quoted_delimiter_stays_in_field() {
    let values = decode("x,\"y,z\",w", &Options::default(), 3).expect("decode");
    assert_eq!(values, vec![s("x"), s("y,z"), s("w")]);
}

#[test]
fn doubled_quotes_unescape() {
    let values = decode("\"a \"\"b\"\" c\",d", &Options::default(), 2).expect("decode");
    assert_eq!(values, vec![s("a \"b\" c"), s("d")]);
}

#[test]
fn empty_unquoted_is_null_and_quoted_empty_is_string() {
    let values = decode("a,,\"\"", &Options::default(), 3).expect("decode");
    assert_eq!(values, vec![s("a"), Value::Null, s("")]);
}

#[test]
fn trailing_separator_yields_trailing_null() {
    let values = decode("a,b,", &Options::default(), 3).expect("decode");
    assert_eq!(values, vec![s("a"), s("b"), Value::Null]);
}

#[test]
fn strict_rejects_short_and_long_rows() {
    let err = decode("a,b", &Options::default(), 3).unwrap_err();
    assert!(matches!(
        err,
        FlatError::ColumnCountMismatch {
            line: 1,
            expected: 3,
            found: 2
        }
    ));

    let err = decode("a,b,c,d", &Options::default(), 3).unwrap_err();
    assert!(matches!(
        err,
        FlatError::ColumnCountMismatch { found: 4, .. }
    ));
}

#[test]
fn liberal_pads_short_rows_and_truncates_long_rows() {
    let opts = Options::new().with_liberal_parsing(true);

    let short = decode("a", &opts, 3).expect("decode short");
    assert_eq!(short, vec![s("a"), Value::Null, Value::Null]);

    let long = decode("a,b,c,d", &opts, 3).expect("decode long");
    assert_eq!(long, vec![s("a"), s("b"), s("c")]);
}

#[test]
fn strict_rejects_quote_in_unquoted_field() {
    let err = decode("a,b\"c,d", &Options::default(), 3).unwrap_err();
    assert!(matches!(err, FlatError::MalformedRow { line: 1, .. }));
}

#[test]
fn strict_rejects_unclosed_quote() {
    let err = decode("\"abc,d", &Options::default(), 2).unwrap_err();
    assert!(matches!(err, FlatError::MalformedRow { .. }));
}

#[test]
fn strict_rejects_text_after_closing_quote() {
    let err = decode("\"ab\"c,d", &Options::default(), 2).unwrap_err();
    assert!(matches!(err, FlatError::MalformedRow { .. }));
}

#[test]
fn liberal_keeps_malformed_fields_verbatim() {
    let opts = Options::new().with_liberal_parsing(true);

    let stray = decode("a,b\"c,d", &opts, 3).expect("stray quote");
    assert_eq!(stray, vec![s("a"), s("b\"c"), s("d")]);

    let unclosed = decode("\"abc,d", &opts, 2).expect("unclosed quote");
    assert_eq!(unclosed, vec![s("\"abc"), s("d")]);

    let trailing = decode("\"ab\"c,d", &opts, 2).expect("text after quote");
    assert_eq!(trailing, vec![s("\"ab\"c"), s("d")]);
}

#[test]
fn multi_char_delimiter_splits_only_on_full_separator() {
    let opts = Options::new().with_col_sep("::");
    let values = decode("a:b::c::\"d::e\"", &opts, 3).expect("decode");
    assert_eq!(values, vec![s("a:b"), s("c"), s("d::e")]);
}

#[test]
fn tab_and_pipe_delimiters() {
    let tsv = Options::new().with_col_sep("\t");
    assert_eq!(
        decode("a b\tc", &tsv, 2).expect("tsv"),
        vec![s("a b"), s("c")]
    );

    let psv = Options::new().with_col_sep("|");
    assert_eq!(
        decode("a,b|c", &psv, 2).expect("psv"),
        vec![s("a,b"), s("c")]
    );
}

#[test]
fn custom_quote_character() {
    let opts = Options::new().with_quote_char('\'');
    let values = decode("'a,b','it''s',\"x\"", &opts, 3).expect("decode");
    assert_eq!(values, vec![s("a,b"), s("it's"), s("\"x\"")]);
}

#[test]
fn quoted_field_may_contain_line_breaks() {
    let values = decode("\"one\ntwo\",x", &Options::default(), 2).expect("decode");
    assert_eq!(values, vec![s("one\ntwo"), s("x")]);
}

#[test]
fn numeric_converter_parses_integers_then_floats() {
    let opts = Options::new().with_converter(Converter::Numeric);
    let values = decode("1,2.5,abc,,-7,1e3,\"42\",+5", &opts, 8).expect("decode");
    assert_eq!(
        values,
        vec![
            Value::Int(1),
            Value::Float(2.5),
            s("abc"),
            Value::Null,
            Value::Int(-7),
            Value::Float(1000.0),
            Value::Int(42),
            Value::Int(5),
        ]
    );
}

#[test]
fn numeric_converter_leaves_non_numbers_alone() {
    let opts = Options::new().with_converter(Converter::Numeric);
    let values = decode("inf,NaN,-,1.2.3,0x1A", &opts, 5).expect("decode");
    assert_eq!(
        values,
        vec![s("inf"), s("NaN"), s("-"), s("1.2.3"), s("0x1A")]
    );
}

#[test]
fn integer_converter_does_not_touch_floats() {
    let opts = Options::new().with_converter(Converter::Integer);
    let values = decode("3,2.5", &opts, 2).expect("decode");
    assert_eq!(values, vec![Value::Int(3), s("2.5")]);
}

#[test]
fn no_conversion_without_converters() {
    let values = decode("1,2.5", &Options::default(), 2).expect("decode");
    assert_eq!(values, vec![s("1"), s("2.5")]);
}

#[test]
fn empty_line_has_no_fields() {
    let err = decode("", &Options::default(), 2).unwrap_err();
    assert!(matches!(
        err,
        FlatError::ColumnCountMismatch { found: 0, .. }
    ));

    let liberal = Options::new().with_liberal_parsing(true);
    assert_eq!(
        decode("", &liberal, 2).expect("liberal"),
        vec![Value::Null, Value::Null]
    );
}

#[test]
fn empty_line_is_one_null_field_for_a_single_column() {
    assert_eq!(
        decode("", &Options::default(), 1).expect("decode"),
        vec![Value::Null]
    );
    assert_eq!(
        decode("\"\"", &Options::default(), 1).expect("decode"),
        vec![s("")]
    );
}

#[test]
fn invalid_options_are_rejected() {
    let opts = Options::new().with_col_sep("");
    assert!(matches!(
        decode("a", &opts, 1),
        Err(FlatError::InvalidOptions(_))
    ));
}
