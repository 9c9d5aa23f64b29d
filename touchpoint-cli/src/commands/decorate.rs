//! Decorate command

use anyhow::Result;
use clap::Args;

/// Decorate arguments
#[derive(Args, Debug)]
pub struct DecorateArgs {
    /// Embed URL to decorate with the stored params
    pub url: String,
}

/// Run decorate command
pub async fn run(args: DecorateArgs) -> Result<()> {
    let tracker = super::build_tracker(crate::config::load()?);
    let decorated = tracker.decorate_embed_url(&args.url).await?;
    println!("{decorated}");
    Ok(())
}
