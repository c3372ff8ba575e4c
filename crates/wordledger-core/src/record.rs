//! Line-oriented record decoding.
//!
//! Input files hold one JSON object per line. Only the word field is read;
//! every other field is ignored.

use std::io::{BufRead, ErrorKind};

use serde_json::Value;

use crate::error::{LedgerError, Result};

/// Name of the field carrying the word value. Case-sensitive.
pub const WORD_FIELD: &str = "BOOKWORD";

/// One decoded input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub word: String,
}

impl Record {
    /// Decode a single line, or describe why it is malformed.
    ///
    /// A key repeated within one object keeps its last value.
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let value: Value = serde_json::from_str(line).map_err(|e| e.to_string())?;
        let Value::Object(mut fields) = value else {
            return Err("expected a JSON object".to_string());
        };
        match fields.remove(WORD_FIELD) {
            Some(Value::String(word)) => Ok(Record { word }),
            Some(other) => Err(format!("field `{}` must be a string, got {}", WORD_FIELD, other)),
            None => Err(format!("missing field `{}`", WORD_FIELD)),
        }
    }
}

/// Lazy, non-restartable iterator of records over a buffered reader.
///
/// Yields at most one error; the iterator is exhausted afterwards.
pub struct RecordReader<R> {
    inner: R,
    buf: String,
    line: usize,
    done: bool,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: String::new(),
            line: 0,
            done: false,
        }
    }

    /// Number of lines consumed so far.
    pub fn lines_read(&self) -> usize {
        self.line
    }
}

impl<'a> RecordReader<&'a [u8]> {
    /// Read records from an in-memory buffer.
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self::new(bytes)
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        self.buf.clear();
        let item = match self.inner.read_line(&mut self.buf) {
            Ok(0) => {
                self.done = true;
                return None;
            }
            Ok(_) => {
                self.line += 1;
                let text = self.buf.trim_end_matches(|c| c == '\n' || c == '\r');
                Record::parse(text).map_err(|reason| LedgerError::malformed(self.line, reason))
            }
            Err(err) if err.kind() == ErrorKind::InvalidData => {
                self.line += 1;
                Err(LedgerError::malformed(self.line, "line is not valid UTF-8"))
            }
            Err(err) => Err(LedgerError::Storage(format!(
                "Failed to read input after line {}: {}",
                self.line, err
            ))),
        };

        if item.is_err() {
            self.done = true;
        }
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(input: &str) -> Result<Vec<String>> {
        RecordReader::from_bytes(input.as_bytes())
            .map(|r| r.map(|record| record.word))
            .collect()
    }

    #[test]
    fn test_reads_word_field_and_ignores_others() {
        let input = "{\"BOOKWORD\":\"kissa\",\"CLASS\":9}\n{\"BOOKWORD\":\"koira\"}\n";
        assert_eq!(words(input).unwrap(), vec!["kissa", "koira"]);
    }

    #[test]
    fn test_last_line_without_newline() {
        let input = "{\"BOOKWORD\":\"a\"}\r\n{\"BOOKWORD\":\"b\"}";
        assert_eq!(words(input).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(words("").unwrap().is_empty());
    }

    #[test]
    fn test_field_name_is_case_sensitive() {
        let err = words("{\"bookword\":\"a\"}\n").unwrap_err();
        assert!(matches!(err, LedgerError::MalformedRecord { line: 1, .. }));
    }

    #[test]
    fn test_non_string_word_is_malformed() {
        let err = words("{\"BOOKWORD\":\"a\"}\n{\"BOOKWORD\":42}\n").unwrap_err();
        assert!(matches!(err, LedgerError::MalformedRecord { line: 2, .. }));
    }

    #[test]
    fn test_repeated_key_keeps_last_value() {
        let input = "{\"BOOKWORD\":\"a\",\"BOOKWORD\":\"b\"}\n";
        assert_eq!(words(input).unwrap(), vec!["b"]);
    }

    #[test]
    fn test_missing_field_names_it() {
        let err = words("{\"WORD\":\"a\"}\n").unwrap_err();
        assert!(
            matches!(err, LedgerError::MalformedRecord { line: 1, ref reason } if reason.contains(WORD_FIELD))
        );
    }

    #[test]
    fn test_non_object_line_is_malformed() {
        let err = words("[\"BOOKWORD\"]\n").unwrap_err();
        assert!(matches!(err, LedgerError::MalformedRecord { line: 1, .. }));
    }

    #[test]
    fn test_blank_line_is_malformed() {
        let err = words("{\"BOOKWORD\":\"a\"}\n\n{\"BOOKWORD\":\"b\"}\n").unwrap_err();
        assert!(matches!(err, LedgerError::MalformedRecord { line: 2, .. }));
    }

    #[test]
    fn test_stops_after_first_error() {
        let mut reader = RecordReader::from_bytes(b"not json\n{\"BOOKWORD\":\"a\"}\n");
        assert!(matches!(reader.next(), Some(Err(_))));
        assert!(reader.next().is_none());
        assert_eq!(reader.lines_read(), 1);
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let mut reader = RecordReader::from_bytes(b"{\"BOOKWORD\":\"\xff\"}\n");
        assert!(matches!(
            reader.next(),
            Some(Err(LedgerError::MalformedRecord { line: 1, .. }))
        ));
    }
}
