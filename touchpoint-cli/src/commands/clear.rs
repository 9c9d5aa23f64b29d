//! Clear command

use anyhow::Result;

/// Run clear command
pub async fn run() -> Result<()> {
    let tracker = super::build_tracker(crate::config::load()?);
    tracker.clear().await?;
    println!("Attribution record cleared");
    Ok(())
}
