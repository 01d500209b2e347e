//! Tick quoter - Entry Point
//!
//! Replays JSON-lines ticks through the market making strategy and writes
//! the resulting orders as JSON lines.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Per-tick market making strategy replay
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via QUOTER_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Tick input, one JSON TradingState per line ("-" for stdin)
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Order output, one JSON line per tick (stdout when omitted)
    #[arg(short, long)]
    output: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    quoter_telemetry::init_logging()?;

    info!("Starting quoter v{}", env!("CARGO_PKG_VERSION"));

    let config = quoter_bot::AppConfig::load(args.config)?;
    info!(
        identity = %config.strategy.identity,
        tick_interval = config.strategy.tick_interval,
        "Configuration loaded"
    );

    let app = quoter_bot::Application::new(config)?;
    let summary = app.run(&args.input, args.output.as_deref()).await?;

    info!(
        ticks = summary.ticks,
        orders = summary.orders,
        interrupted = summary.interrupted,
        "Shutdown complete"
    );

    Ok(())
}
