//! Cluster-wide query commands

use clap::Subcommand;
use comfy_table::{Table, presets};
use serde::Serialize;

use ac_core::Provider;

use super::make_client;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Cluster subcommands
#[derive(Subcommand, Debug)]
pub enum ClusterCommands {
    /// List buckets known to the cluster
    #[command(name = "ls", alias = "list")]
    List(ListArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only list buckets of this provider (ais, aws, gcp, azure, ht, hdfs)
    #[arg(long)]
    pub provider: Option<String>,
}

/// JSON representation of one bucket
#[derive(Serialize)]
struct BucketInfo {
    name: String,
    provider: String,
}

/// JSON output for bucket listings
#[derive(Serialize)]
struct BucketListOutput {
    count: usize,
    buckets: Vec<BucketInfo>,
}

/// Execute a cluster subcommand
pub async fn execute(cmd: ClusterCommands, endpoint: Option<String>, formatter: &Formatter) -> ExitCode {
    match cmd {
        ClusterCommands::List(args) => execute_list(args, endpoint, formatter).await,
    }
}

async fn execute_list(args: ListArgs, endpoint: Option<String>, formatter: &Formatter) -> ExitCode {
    let provider = match args.provider.as_deref() {
        Some(raw) => match raw.parse::<Provider>() {
            Ok(provider) => Some(provider),
            Err(e) => {
                formatter.error(&e);
                return ExitCode::InvalidArgument;
            }
        },
        None => None,
    };

    let client = match make_client(endpoint, formatter) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let buckets = match client.cluster().list_buckets(provider).await {
        Ok(buckets) => buckets,
        Err(e) => {
            formatter.error(&format!("Failed to list buckets: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    if formatter.is_json() {
        let infos = buckets
            .iter()
            .map(|b| BucketInfo {
                name: b.name.clone(),
                provider: b.provider.to_string(),
            })
            .collect();
        formatter.json(&BucketListOutput {
            count: buckets.len(),
            buckets: infos,
        });
        return ExitCode::Success;
    }

    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_header(vec!["NAME", "PROVIDER"]);
    for bucket in &buckets {
        table.add_row(vec![
            formatter.style_name(&bucket.name),
            bucket.provider.to_string(),
        ]);
    }

    formatter.println(&table.to_string());
    formatter.println(&format!("{} bucket(s)", buckets.len()));
    ExitCode::Success
}
