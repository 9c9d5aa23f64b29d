//! Query-string command

use anyhow::Result;

/// Run query-string command
pub async fn run() -> Result<()> {
    let tracker = super::build_tracker(crate::config::load()?);
    println!("{}", tracker.query_string().await);
    Ok(())
}
