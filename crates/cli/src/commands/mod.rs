//! Command tree for the aisc CLI

mod bucket;
mod cluster;
mod job;
mod object;

use std::time::Duration;

use clap::{CommandFactory, Subcommand};

use ac_client::{Client, Cluster};
use ac_core::xaction::XactPhase;
use ac_core::{ClientConfig, Result};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Top-level subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage buckets
    #[command(subcommand)]
    Bucket(bucket::BucketCommands),

    /// Manage objects
    #[command(subcommand)]
    Object(object::ObjectCommands),

    /// Cluster-wide queries
    #[command(subcommand)]
    Cluster(cluster::ClusterCommands),

    /// Start and wait on background jobs
    #[command(subcommand)]
    Job(job::JobCommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Execute a top-level subcommand
pub async fn execute(cmd: Commands, endpoint: Option<String>, output: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output);

    match cmd {
        Commands::Bucket(cmd) => bucket::execute(cmd, endpoint, &formatter).await,
        Commands::Object(cmd) => object::execute(cmd, endpoint, &formatter).await,
        Commands::Cluster(cmd) => cluster::execute(cmd, endpoint, &formatter).await,
        Commands::Job(cmd) => job::execute(cmd, endpoint, &formatter).await,
        Commands::Completions { shell } => {
            let mut command = crate::Cli::command();
            clap_complete::generate(shell, &mut command, "aisc", &mut std::io::stdout());
            ExitCode::Success
        }
    }
}

/// Build a client from config, env and the `--endpoint` override
pub fn make_client(
    endpoint: Option<String>,
    formatter: &Formatter,
) -> std::result::Result<Client, ExitCode> {
    let mut config = match ClientConfig::load() {
        Ok(config) => config,
        Err(e) => {
            formatter.error(&format!("Failed to load config: {e}"));
            return Err(ExitCode::GeneralError);
        }
    };
    if let Some(endpoint) = endpoint {
        config.endpoint = endpoint;
    }

    match Client::new(config) {
        Ok(client) => {
            tracing::debug!(endpoint = client.endpoint(), "client ready");
            Ok(client)
        }
        Err(e) => {
            formatter.error(&format!("Failed to create client: {e}"));
            Err(ExitCode::from_error(&e))
        }
    }
}

/// Wait on an xaction with a spinner in human mode
pub async fn wait_for_xaction(
    cluster: &Cluster,
    id: &str,
    timeout_secs: Option<u64>,
    formatter: &Formatter,
) -> Result<XactPhase> {
    let timeout = timeout_secs.map(Duration::from_secs);

    if formatter.is_json() || formatter.is_quiet() {
        return cluster.wait_for_xaction_finished(id, timeout).await;
    }

    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.set_message(format!("Waiting for xaction {id}"));
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = cluster.wait_for_xaction_finished(id, timeout).await;
    spinner.finish_and_clear();
    result
}
