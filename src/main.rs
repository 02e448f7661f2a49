// gridscope - clickable array grids and Fibonacci call trees
//
// Architecture:
// - array: n-dimensional numeric buffer with broadcasting elementwise ops
// - wrapped: user-facing array plus axis labels, opens the grid
// - highlight / session: selected cells and their running statistics
// - tui (ratatui): the interactive grid, driven by crossterm events
// - tree (petgraph): naive Fibonacci call tree and its exporters
// - config / logging: layered TOML config and tracing setup

mod array;
mod cli;
mod config;
mod demo;
mod highlight;
mod logging;
mod session;
mod tree;
mod tui;
mod wrapped;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use logging::{LogBuffer, LogSink};
use tracing_appender::non_blocking::WorkerGuard;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    match Cli::parse().command {
        // Config management never touches logging or the terminal
        Commands::Config(args) => cli::handle_config(&args),
        Commands::Grid(args) => {
            // The interactive grid owns the terminal, so its logs go to the
            // buffer shown in the logs panel instead of stderr
            let sink = if args.is_interactive() {
                LogSink::Buffer
            } else {
                LogSink::Stderr
            };
            let (config, log_buffer, _guard) = bootstrap(sink);
            cli::handle_grid(args, &config, log_buffer).await
        }
        Commands::FibTree { n, format, output } => {
            let (config, _, _guard) = bootstrap(LogSink::Stderr);
            cli::handle_fib_tree(n, format, output, &config)
        }
    }
}

/// Load configuration and install logging. The guard must outlive the
/// command for file logs to flush.
fn bootstrap(sink: LogSink) -> (Config, LogBuffer, Option<WorkerGuard>) {
    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();
    let config = Config::from_env();

    let log_buffer = LogBuffer::new();
    let guard = logging::init(&config.logging, sink, &log_buffer);
    tracing::debug!(version = config::VERSION, ?sink, "Starting gridscope");

    (config, log_buffer, guard)
}
