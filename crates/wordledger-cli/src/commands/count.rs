use wordledger_core::{BlobLocation, LedgerError, LedgerUpdater, UpdateRequest};

use crate::app::AppContext;
use crate::cli::CountArgs;
use crate::output::{print_update, update_json};

pub fn handle_count(ctx: &AppContext, args: &CountArgs) -> anyhow::Result<()> {
    let config = ctx.config();
    let bucket = require(
        args.bucket.as_deref().or(config.buckets.source.as_deref()),
        "Bucket name",
    )?;
    let jsonl_file = require(args.jsonl_file.as_deref(), "jsonl file")?;
    let unique_words = require(
        args.unique_words
            .as_deref()
            .or(config.ledger.object.as_deref()),
        "unique words file",
    )?;
    let output_bucket = require(
        args.output_bucket
            .as_deref()
            .or(config.buckets.output.as_deref()),
        "output bucket name",
    )?;

    let request = UpdateRequest::new(
        BlobLocation::new(bucket, jsonl_file),
        BlobLocation::new(output_bucket, unique_words),
    )?;
    let store = ctx.open_store()?;
    let outcome = LedgerUpdater::new(store).run(&request)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&update_json(&outcome))?);
    } else {
        print_update(&outcome, ctx.quiet());
    }
    Ok(())
}

fn require<'a>(value: Option<&'a str>, what: &str) -> Result<&'a str, LedgerError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| LedgerError::Configuration(format!("{} is required", what)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_rejects_missing_and_blank() {
        assert!(require(None, "jsonl file").is_err());
        assert!(require(Some("  "), "jsonl file").is_err());
        assert_eq!(require(Some("1.jsonl"), "jsonl file").unwrap(), "1.jsonl");
    }

    #[test]
    fn test_require_message() {
        let err = require(None, "Bucket name").unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: Bucket name is required");
    }
}
