//! Capture command

use anyhow::Result;
use clap::Args;
use tracing::info;
use touchpoint_core::PageVisit;

/// Capture arguments
#[derive(Args, Debug)]
pub struct CaptureArgs {
    /// Page URL, including its query string
    pub url: String,

    /// Upstream referrer
    #[arg(long)]
    pub referrer: Option<String>,
}

/// Run capture command
pub async fn run(args: CaptureArgs) -> Result<()> {
    let tracker = super::build_tracker(crate::config::load()?);

    let mut visit = PageVisit::new(&args.url);
    if let Some(referrer) = args.referrer {
        visit = visit.with_referrer(referrer);
    }

    info!(url = %visit.url, "Capturing page visit");

    match tracker.record_visit(&visit).await {
        Some(record) => {
            println!("Captured {} params", record.params().count());
            println!("{}", record.query_string());
        }
        None => {
            println!("No attribution params found, nothing stored");
        }
    }

    Ok(())
}
