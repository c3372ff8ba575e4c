//! Output formatting helpers for the CLI.

use wordledger_core::trigger::{IgnoreReason, TriggerOutcome};
use wordledger_core::{FileRecord, UpdateOutcome};

/// Convert a file record to JSON for output.
pub fn record_json(record: &FileRecord, total_words: usize) -> serde_json::Value {
    serde_json::json!({
        "status": "updated",
        "filename": record.filename,
        "date": record.date,
        "new_words": record.new_words,
        "total_words": total_words,
    })
}

/// Convert an update outcome to JSON for output.
pub fn update_json(outcome: &UpdateOutcome) -> serde_json::Value {
    match outcome {
        UpdateOutcome::Updated {
            record,
            total_words,
        } => record_json(record, *total_words),
        UpdateOutcome::AlreadyProcessed { filename } => serde_json::json!({
            "status": "already_processed",
            "filename": filename,
        }),
        UpdateOutcome::LedgerMissing { ledger } => serde_json::json!({
            "status": "ledger_missing",
            "ledger": ledger.to_string(),
        }),
    }
}

/// Convert a trigger outcome to JSON for output.
pub fn trigger_json(outcome: &TriggerOutcome) -> serde_json::Value {
    match outcome {
        TriggerOutcome::Ignored(reason) => serde_json::json!({
            "status": "ignored",
            "reason": ignore_reason(*reason),
        }),
        TriggerOutcome::Completed(update) => update_json(update),
    }
}

/// Print an update outcome in human-readable format.
pub fn print_update(outcome: &UpdateOutcome, quiet: bool) {
    match outcome {
        UpdateOutcome::Updated { record, .. } => {
            println!(
                "Number of new words in the {} file: {}",
                record.filename, record.new_words
            );
        }
        UpdateOutcome::AlreadyProcessed { .. } => {
            if !quiet {
                println!("File has already been processed");
            }
        }
        UpdateOutcome::LedgerMissing { ledger } => {
            eprintln!("{} does not exist in the bucket", ledger.name);
        }
    }
}

/// Print a trigger outcome in human-readable format.
pub fn print_trigger(outcome: &TriggerOutcome, quiet: bool) {
    match outcome {
        TriggerOutcome::Ignored(reason) => {
            if !quiet {
                println!("Ignored event: {}", ignore_reason(*reason));
            }
        }
        TriggerOutcome::Completed(update) => print_update(update, quiet),
    }
}

fn ignore_reason(reason: IgnoreReason) -> &'static str {
    match reason {
        IgnoreReason::NotFinalized => "not a finalized upload",
        IgnoreReason::NotInputFile => "not an input file",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordledger_core::file_date;

    #[test]
    fn test_record_json_fields() {
        let record = FileRecord {
            filename: "100.jsonl".to_string(),
            date: file_date("100.jsonl"),
            new_words: 2,
            extra: Default::default(),
        };
        let value = record_json(&record, 5);
        assert_eq!(value["date"], "1970-01-01T00:01:40");
        assert_eq!(value["new_words"], 2);
        assert_eq!(value["total_words"], 5);
    }

    #[test]
    fn test_ignored_json() {
        let value = trigger_json(&TriggerOutcome::Ignored(IgnoreReason::NotInputFile));
        assert_eq!(value["status"], "ignored");
        assert_eq!(value["reason"], "not an input file");
    }
}
