//! Show command

use anyhow::Result;
use clap::Args;
use comfy_table::Table;

/// Show arguments
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Print the raw JSON record
    #[arg(long)]
    pub json: bool,
}

/// Run show command
pub async fn run(args: ShowArgs) -> Result<()> {
    let tracker = super::build_tracker(crate::config::load()?);
    let record = tracker.load().await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    if record.is_empty() {
        println!("No attribution record stored");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Key", "Value"]);
    for (key, value) in record.params() {
        table.add_row(vec![key.as_str().to_string(), value.to_string()]);
    }
    if let Some(landing_page) = &record.landing_page {
        table.add_row(vec!["landing_page".to_string(), landing_page.clone()]);
    }
    if let Some(referrer) = &record.referrer {
        table.add_row(vec!["referrer".to_string(), referrer.clone()]);
    }
    if let Some(timestamp) = &record.timestamp {
        table.add_row(vec!["timestamp".to_string(), timestamp.to_rfc3339()]);
    }
    if let Some(first_touch) = record.first_touch {
        table.add_row(vec!["first_touch".to_string(), first_touch.to_string()]);
    }

    println!("{table}");
    Ok(())
}
