//! The cumulative unique-word ledger and the merge that extends it.
//!
//! A [`Ledger`] is a plain value: it is loaded by the caller, merged with one
//! input file at a time, and written back in full. Nothing here performs I/O.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{LedgerError, Result};
use crate::record::Record;

/// Summary of one processed input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Object name of the input file, unique within a ledger
    pub filename: String,

    /// When the file's content was generated (derived from the filename)
    pub date: NaiveDateTime,

    /// Words first seen while processing this file
    pub new_words: u64,

    /// Any other keys found on a stored entry, written back unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Every distinct word seen so far plus the files that contributed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    /// Processed files, in processing order
    #[serde(default)]
    pub files: Vec<FileRecord>,

    /// All distinct words
    #[serde(default)]
    pub words: BTreeSet<String>,

    /// Top-level keys other than `files` and `words`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Ledger {
    /// Decode a persisted ledger document.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let ledger: Ledger = serde_json::from_slice(bytes)?;
        ledger.check_unique_files()?;
        Ok(ledger)
    }

    /// Encode the full ledger document.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Whether `filename` has already been merged.
    pub fn contains_file(&self, filename: &str) -> bool {
        self.files.iter().any(|file| file.filename == filename)
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Merge one input file into the ledger.
    ///
    /// New words are staged aside and only committed once every record has
    /// decoded, so on error the ledger is left exactly as it was.
    ///
    /// # Errors
    ///
    /// - `LedgerError::AlreadyProcessed` if `filename` is already listed
    /// - `LedgerError::MalformedRecord` (or `Storage`) from the record stream
    pub fn merge_file<I>(&mut self, filename: &str, records: I) -> Result<FileRecord>
    where
        I: IntoIterator<Item = Result<Record>>,
    {
        if self.contains_file(filename) {
            return Err(LedgerError::AlreadyProcessed(filename.to_string()));
        }

        let mut fresh = BTreeSet::new();
        for record in records {
            let word = record?.word;
            if !self.words.contains(&word) {
                fresh.insert(word);
            }
        }

        let record = FileRecord {
            filename: filename.to_string(),
            date: file_date(filename),
            new_words: fresh.len() as u64,
            extra: Map::new(),
        };
        debug!(
            filename,
            new_words = record.new_words,
            "Merged input file into ledger"
        );

        self.words.extend(fresh);
        self.files.push(record.clone());
        Ok(record)
    }

    fn check_unique_files(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for file in &self.files {
            if !seen.insert(file.filename.as_str()) {
                return Err(LedgerError::InvalidLedger(format!(
                    "file '{}' is listed more than once",
                    file.filename
                )));
            }
        }
        Ok(())
    }
}

/// Merge `records` into a copy of `ledger`, returning the new ledger and the
/// record describing the file.
pub fn process_file<I>(ledger: &Ledger, filename: &str, records: I) -> Result<(Ledger, FileRecord)>
where
    I: IntoIterator<Item = Result<Record>>,
{
    if ledger.contains_file(filename) {
        return Err(LedgerError::AlreadyProcessed(filename.to_string()));
    }
    let mut updated = ledger.clone();
    let record = updated.merge_file(filename, records)?;
    Ok((updated, record))
}

/// Date used when a filename does not start with an epoch timestamp.
pub fn fallback_date() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Derive a file's date from the part of its name before the first `.`,
/// read as Unix epoch seconds (UTC).
pub fn file_date(filename: &str) -> NaiveDateTime {
    let prefix = filename.split('.').next().unwrap_or(filename);
    prefix
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|utc| utc.naive_utc())
        .unwrap_or_else(fallback_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordReader;

    fn lines(words: &[&str]) -> String {
        words
            .iter()
            .map(|w| format!("{{\"BOOKWORD\":\"{}\"}}\n", w))
            .collect()
    }

    fn merge(ledger: &Ledger, filename: &str, words: &[&str]) -> Result<(Ledger, FileRecord)> {
        let input = lines(words);
        process_file(ledger, filename, RecordReader::from_bytes(input.as_bytes()))
    }

    fn word_set(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_first_file_on_empty_ledger() {
        let (ledger, record) = merge(&Ledger::default(), "100.jsonl", &["cat", "dog", "cat"]).unwrap();

        assert_eq!(ledger.words, word_set(&["cat", "dog"]));
        assert_eq!(record.new_words, 2);
        assert_eq!(record.date, file_date("100.jsonl"));
        assert_eq!(ledger.files, vec![record]);
    }

    #[test]
    fn test_second_file_counts_only_unseen_words() {
        let (first, _) = merge(&Ledger::default(), "100.jsonl", &["cat", "dog", "cat"]).unwrap();
        let (second, record) = merge(&first, "200.jsonl", &["dog", "bird"]).unwrap();

        assert_eq!(record.new_words, 1);
        assert_eq!(second.words, word_set(&["cat", "dog", "bird"]));
        let names: Vec<_> = second.files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["100.jsonl", "200.jsonl"]);
    }

    #[test]
    fn test_reprocessing_is_rejected_without_change() {
        let (ledger, _) = merge(&Ledger::default(), "100.jsonl", &["cat"]).unwrap();
        let before = ledger.to_json().unwrap();

        let err = merge(&ledger, "100.jsonl", &["zebra"]).unwrap_err();
        assert!(matches!(err, LedgerError::AlreadyProcessed(name) if name == "100.jsonl"));
        assert_eq!(ledger.to_json().unwrap(), before);
    }

    #[test]
    fn test_merge_file_leaves_ledger_untouched_on_bad_line() {
        let (mut ledger, _) = merge(&Ledger::default(), "100.jsonl", &["cat"]).unwrap();
        let snapshot = ledger.clone();

        let input = "{\"BOOKWORD\":\"owl\"}\n{\"WORD\":\"fox\"}\n";
        let err = ledger
            .merge_file("200.jsonl", RecordReader::from_bytes(input.as_bytes()))
            .unwrap_err();

        assert!(matches!(err, LedgerError::MalformedRecord { line: 2, .. }));
        assert_eq!(ledger, snapshot);
    }

    #[test]
    fn test_new_words_matches_set_difference() {
        let (base, _) = merge(&Ledger::default(), "1.jsonl", &["a", "b", "c"]).unwrap();
        let incoming = ["c", "d", "d", "e", "a", "f", "e"];

        let (after, record) = merge(&base, "2.jsonl", &incoming).unwrap();

        let expected = word_set(&incoming).difference(&base.words).count() as u64;
        assert_eq!(record.new_words, expected);
        assert_eq!(after.word_count(), base.word_count() + expected as usize);
    }

    #[test]
    fn test_word_count_never_decreases() {
        let batches: [&[&str]; 4] = [&["x", "y"], &[], &["y"], &["z", "x", "w"]];
        let mut ledger = Ledger::default();
        let mut previous = 0;
        for (i, batch) in batches.iter().enumerate() {
            let (next, _) = merge(&ledger, &format!("{}.jsonl", i), *batch).unwrap();
            assert!(next.word_count() >= previous);
            previous = next.word_count();
            ledger = next;
        }
        assert_eq!(ledger.files.len(), 4);
        assert_eq!(ledger.files[1].new_words, 0);
    }

    #[test]
    fn test_json_round_trip_preserves_file_order() {
        let (ledger, _) = merge(&Ledger::default(), "300.jsonl", &["b"]).unwrap();
        let (ledger, _) = merge(&ledger, "100.jsonl", &["a"]).unwrap();
        let (ledger, _) = merge(&ledger, "200.jsonl", &["c"]).unwrap();

        let decoded = Ledger::from_json(&ledger.to_json().unwrap()).unwrap();
        assert_eq!(decoded, ledger);
    }

    #[test]
    fn test_persisted_document_shape() {
        let (ledger, _) = merge(&Ledger::default(), "100.jsonl", &["dog", "cat"]).unwrap();
        let json = String::from_utf8(ledger.to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            r#"{"files":[{"filename":"100.jsonl","date":"1970-01-01T00:01:40","new_words":2}],"words":["cat","dog"]}"#
        );
    }

    #[test]
    fn test_unknown_keys_survive_a_merge() {
        let doc = br#"{"files":[{"filename":"1.jsonl","date":"2023-01-01T00:00:00","new_words":1,"source":"kotus"}],"words":["a"],"owner":"ops"}"#;
        let ledger = Ledger::from_json(doc).unwrap();

        let (ledger, record) = merge(&ledger, "2.jsonl", &["a", "b"]).unwrap();
        assert!(record.extra.is_empty());

        let value: Value = serde_json::from_slice(&ledger.to_json().unwrap()).unwrap();
        assert_eq!(value["files"][0]["source"], "kotus");
        assert_eq!(value["files"][1]["filename"], "2.jsonl");
        assert!(value["files"][1].get("source").is_none());
        assert_eq!(value["owner"], "ops");
        assert_eq!(value["words"], serde_json::json!(["a", "b"]));
    }

    #[test]
    fn test_from_json_defaults_missing_sections() {
        let ledger = Ledger::from_json(br#"{"words":["a"]}"#).unwrap();
        assert!(ledger.files.is_empty());
        assert_eq!(ledger.word_count(), 1);
    }

    #[test]
    fn test_from_json_rejects_duplicate_filenames() {
        let doc = br#"{"files":[
            {"filename":"1.jsonl","date":"2023-01-01T00:00:00","new_words":1},
            {"filename":"1.jsonl","date":"2023-01-01T00:00:00","new_words":0}
        ],"words":["a"]}"#;
        assert!(matches!(
            Ledger::from_json(doc),
            Err(LedgerError::InvalidLedger(_))
        ));
    }

    #[test]
    fn test_file_date_from_epoch_prefix() {
        let date = file_date("1700000000.jsonl");
        assert_eq!(date.to_string(), "2023-11-14 22:13:20");
    }

    #[test]
    fn test_file_date_uses_first_dot_only() {
        assert_eq!(file_date("100.part.jsonl"), file_date("100.jsonl"));
        assert_eq!(file_date("100").to_string(), "1970-01-01 00:01:40");
    }

    #[test]
    fn test_file_date_fallback() {
        let expected = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(fallback_date(), expected);
        assert_eq!(file_date("notanumber.jsonl"), expected);
        assert_eq!(file_date(".jsonl"), expected);
        assert_eq!(file_date("uploads/100.jsonl"), expected);
        assert_eq!(file_date("99999999999999999999.jsonl"), expected);
    }
}
