//! Property-based tests for the tokenizer.
//!
//! Random records are encoded (or joined naively when they contain no
//! special bytes) and fed back through the tokenizer, which must reproduce
//! them exactly.

use fastcsv::{CsvEncoder, Dialect, Tokenizer};
use proptest::prelude::*;

fn tokenize(input: &[u8], dialect: Dialect) -> Vec<Vec<String>> {
    let mut tokenizer = Tokenizer::new(input, dialect);
    tokenizer.records().collect::<Result<_, _>>().unwrap()
}

/// A bare CR would merge with an LF ending an empty next record, so only
/// LF and CRLF are mixed here
fn terminator_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("\n"), Just("\r\n")]
}

/// Records of plain fields together with the terminator ending each one
fn plain_records(
    field: &'static str,
) -> impl Strategy<Value = Vec<(Vec<String>, &'static str)>> {
    let record = prop::collection::vec(
        prop::string::string_regex(field).expect("valid regex"),
        1..6,
    );
    prop::collection::vec((record, terminator_strategy()), 1..10)
}

fn join(records: &[(Vec<String>, &str)], delimiter: char) -> String {
    let separator = delimiter.to_string();
    let mut out = String::new();
    for (record, terminator) in records {
        out.push_str(&record.join(separator.as_str()));
        out.push_str(terminator);
    }
    out
}

fn encode(records: &[Vec<String>], dialect: &Dialect) -> Vec<u8> {
    let encoder = CsvEncoder::from_dialect(dialect);
    let mut buffer = Vec::new();
    for record in records {
        encoder.encode_row(record, &mut buffer);
        buffer.push(b'\n');
    }
    buffer
}

proptest! {
    #[test]
    fn plain_input_matches_naive_split(records in plain_records("[a-z0-9 .]{0,8}")) {
        let input = join(&records, ',');
        let expected: Vec<Vec<String>> = records.into_iter().map(|(r, _)| r).collect();
        prop_assert_eq!(tokenize(input.as_bytes(), Dialect::default()), expected);
    }

    #[test]
    fn quoted_roundtrip(
        records in prop::collection::vec(
            prop::collection::vec(prop::string::string_regex("[a-z,\"\r\n ]{0,10}").expect("valid regex"), 1..6),
            1..8,
        ),
        capacity in 1usize..32,
    ) {
        let dialect = Dialect::builder().buffer_capacity(capacity).build().unwrap();
        let input = encode(&records, &dialect);
        prop_assert_eq!(tokenize(&input, dialect), records);
    }

    #[test]
    fn quoted_roundtrip_with_comment_and_trim(
        records in prop::collection::vec(
            prop::collection::vec(prop::string::string_regex("[a-z;#\"\r\n \t]{0,10}").expect("valid regex"), 1..6),
            1..8,
        ),
    ) {
        let dialect = Dialect::builder()
            .delimiter(b';')
            .comment(Some(b'#'))
            .trim_leading(true)
            .build()
            .unwrap();
        let input = encode(&records, &dialect);
        prop_assert_eq!(tokenize(&input, dialect), records);
    }

    #[test]
    fn terminators_never_leak_into_fields(input in "[a-z,\r\n]{0,64}") {
        for record in tokenize(input.as_bytes(), Dialect::default()) {
            for field in record {
                prop_assert!(!field.contains('\r') && !field.contains('\n'), "field {:?}", field);
            }
        }
    }

    #[test]
    fn sentinel_matches_exactly(records in plain_records("(NULL|[A-Z]{0,6})")) {
        let dialect = Dialect::builder().null_sentinel(Some("NULL")).build().unwrap();
        let input = join(&records, ',');
        let expected: Vec<Vec<String>> = records
            .into_iter()
            .map(|(r, _)| r.into_iter().map(|f| if f == "NULL" { String::new() } else { f }).collect())
            .collect();
        prop_assert_eq!(tokenize(input.as_bytes(), dialect), expected);
    }

    #[test]
    fn trim_removes_only_leading_whitespace(records in plain_records("[ \ta-z]{0,8}")) {
        let dialect = Dialect::builder().trim_leading(true).build().unwrap();
        let input = join(&records, ',');
        let expected: Vec<Vec<String>> = records
            .into_iter()
            .map(|(r, _)| {
                r.into_iter()
                    .map(|f| f.trim_start_matches(|c: char| c == ' ' || c == '\t').to_string())
                    .collect()
            })
            .collect();
        prop_assert_eq!(tokenize(input.as_bytes(), dialect), expected);
    }

    #[test]
    fn comment_only_at_record_start(lines in prop::collection::vec("[a-z#,]{0,8}", 1..10)) {
        let dialect = Dialect::builder().comment(Some(b'#')).build().unwrap();
        let input: String = lines.iter().map(|l| format!("{}\n", l)).collect();
        let expected: Vec<Vec<String>> = lines
            .iter()
            .filter(|l| !l.starts_with('#'))
            .map(|l| l.split(',').map(str::to_string).collect())
            .collect();
        prop_assert_eq!(tokenize(input.as_bytes(), dialect), expected);
    }

    #[test]
    fn delimiter_collisions_rejected(byte in 0x21u8..0x7f) {
        prop_assert!(Dialect::builder().delimiter(byte).quote(Some(byte)).build().is_err());
        if byte != b'"' {
            prop_assert!(Dialect::builder().delimiter(byte).comment(Some(byte)).build().is_err());
        }
    }
}
