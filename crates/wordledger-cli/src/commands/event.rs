use std::io::Read;

use wordledger_core::trigger::{self, StorageEvent, TriggerConfig};
use wordledger_core::updater::DEFAULT_LEDGER_OBJECT;
use wordledger_core::{LedgerError, MissingLedgerPolicy};

use crate::app::AppContext;
use crate::cli::HandleEventArgs;
use crate::output::{print_trigger, trigger_json};

pub fn handle_event(ctx: &AppContext, args: &HandleEventArgs) -> anyhow::Result<()> {
    let bytes = match &args.event {
        Some(path) if path.as_os_str() != "-" => std::fs::read(path).map_err(|e| {
            LedgerError::NotFound(format!("event file {}: {}", path.display(), e))
        })?,
        _ => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };
    let event = StorageEvent::from_json(&bytes)?;

    let config = ctx.config();
    let trigger_config = TriggerConfig {
        output_bucket: args
            .output_bucket
            .clone()
            .or_else(|| config.buckets.output.clone()),
        ledger_object: config
            .ledger
            .object
            .clone()
            .unwrap_or_else(|| DEFAULT_LEDGER_OBJECT.to_string()),
        missing_ledger: if config.ledger.require_existing {
            MissingLedgerPolicy::Abort
        } else {
            MissingLedgerPolicy::StartEmpty
        },
    };

    let store = ctx.open_store()?;
    let outcome = trigger::handle_event(store, &event, &trigger_config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&trigger_json(&outcome))?);
    } else {
        print_trigger(&outcome, ctx.quiet());
    }
    Ok(())
}
