//! Track command

use anyhow::Result;
use clap::Args;
use serde_json::{Map, Value};
use touchpoint_core::{AnalyticsSink, HttpSink};

/// Track arguments
#[derive(Args, Debug)]
pub struct TrackArgs {
    /// Event name
    pub event: String,

    /// Extra event properties as KEY=VALUE pairs
    #[arg(long = "data", value_name = "KEY=VALUE")]
    pub data: Vec<String>,
}

/// Run track command
pub async fn run(args: TrackArgs) -> Result<()> {
    let config = crate::config::load()?;
    let endpoint = config.analytics.endpoint.clone();
    let tracker = super::build_tracker(config);

    let extra = parse_data(&args.data)?;
    let Some(event) = tracker.track_event(&args.event, extra).await else {
        println!("Analytics disabled, event dropped");
        return Ok(());
    };

    println!("{}", serde_json::to_string_pretty(&event)?);

    // The CLI delivers inline; a spawned send would race process exit
    match endpoint {
        Some(endpoint) => {
            let display = endpoint.to_string();
            let sink = HttpSink::new(endpoint);
            sink.deliver(&event).await?;
            println!("Delivered to {display}");
        }
        None => {
            println!("No analytics endpoint configured, event not delivered");
        }
    }

    Ok(())
}

fn parse_data(pairs: &[String]) -> Result<Map<String, Value>> {
    let mut extra = Map::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("invalid --data entry {pair:?}, expected KEY=VALUE"))?;
        extra.insert(key.to_string(), Value::String(value.to_string()));
    }
    Ok(extra)
}
