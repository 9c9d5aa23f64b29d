use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "touchpoint", about = "Marketing attribution capture and propagation")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture attribution params from a page URL
    Capture(commands::capture::CaptureArgs),
    /// Show the stored attribution record
    Show(commands::show::ShowArgs),
    /// Print the stored params as a URL query string
    QueryString,
    /// Append stored params to an embed URL
    Decorate(commands::decorate::DecorateArgs),
    /// Emit an analytics event enriched with the stored record
    Track(commands::track::TrackArgs),
    /// Remove the stored record
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Capture(args) => commands::capture::run(args).await,
        Commands::Show(args) => commands::show::run(args).await,
        Commands::QueryString => commands::query_string::run().await,
        Commands::Decorate(args) => commands::decorate::run(args).await,
        Commands::Track(args) => commands::track::run(args).await,
        Commands::Clear => commands::clear::run().await,
    }
}
