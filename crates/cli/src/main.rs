//! aisc: CLI for AIS-compatible object storage clusters

mod commands;
mod exit_code;
mod output;

use clap::Parser;

use commands::Commands;
use output::OutputConfig;

/// Manage buckets, objects and background jobs on an AIS cluster
#[derive(Parser, Debug)]
#[command(name = "aisc", version, about)]
pub(crate) struct Cli {
    /// Cluster endpoint, e.g. http://localhost:8080
    #[arg(long, global = true, env = ac_core::config::ENV_ENDPOINT)]
    endpoint: Option<String>,

    /// Output strict JSON
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = OutputConfig {
        json: cli.json,
        quiet: cli.quiet,
        no_color: cli.no_color,
    };

    let code = commands::execute(cli.command, cli.endpoint, output).await;
    std::process::exit(code.into());
}
