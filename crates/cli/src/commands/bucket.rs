//! Bucket lifecycle commands

use clap::Subcommand;
use comfy_table::{Table, presets};
use humansize::{DECIMAL, format_size};
use serde::Serialize;

use ac_client::{Client, CopyOpts, ListObjectsOpts};
use ac_core::{ObjectProp, PropsSpec, parse_uri};

use super::{make_client, wait_for_xaction};
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Bucket subcommands
#[derive(Subcommand, Debug)]
pub enum BucketCommands {
    /// Create a bucket
    Create(BucketArgs),

    /// Destroy a bucket
    #[command(name = "rm", alias = "remove")]
    Remove(BucketArgs),

    /// Check that a bucket exists
    Head(BucketArgs),

    /// Rename a bucket (asynchronous)
    #[command(name = "mv", alias = "rename")]
    Rename(RenameArgs),

    /// Copy a bucket (asynchronous)
    #[command(name = "cp", alias = "copy")]
    Copy(CopyArgs),

    /// Evict a remote bucket's cached objects
    Evict(EvictArgs),

    /// List objects in a bucket
    #[command(name = "ls", alias = "list")]
    List(ListArgs),
}

#[derive(clap::Args, Debug)]
pub struct BucketArgs {
    /// Bucket, e.g. ais://imagenet
    pub bucket: String,
}

#[derive(clap::Args, Debug)]
pub struct RenameArgs {
    /// Source bucket, e.g. ais://old-name
    pub from: String,

    /// New bucket name
    pub to: String,

    /// Block until the rename finishes
    #[arg(long)]
    pub wait: bool,

    /// Wait deadline in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

#[derive(clap::Args, Debug)]
pub struct CopyArgs {
    /// Source bucket, e.g. ais://imagenet
    pub from: String,

    /// Destination bucket, e.g. ais://imagenet-copy
    pub to: String,

    /// Copy only objects with this name prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Plan the copy without moving data
    #[arg(long)]
    pub dry_run: bool,

    /// Override an existing destination bucket
    #[arg(long)]
    pub force: bool,

    /// Block until the copy finishes
    #[arg(long)]
    pub wait: bool,

    /// Wait deadline in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

#[derive(clap::Args, Debug)]
pub struct EvictArgs {
    /// Remote bucket, e.g. aws://training-data
    pub bucket: String,

    /// Also drop the bucket's metadata from the cluster
    #[arg(long)]
    pub drop_md: bool,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Bucket, e.g. ais://imagenet
    pub bucket: String,

    /// List only objects with this name prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Comma-separated properties to fetch (default: name,size)
    #[arg(long)]
    pub props: Option<String>,

    /// Objects per page (0 lets the backend decide)
    #[arg(long, default_value_t = 0)]
    pub page_size: u32,
}

/// JSON output for bucket operations
#[derive(Serialize)]
struct BucketOperationOutput {
    success: bool,
    bucket: String,
    message: String,
}

/// JSON output for asynchronous bucket operations
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct XactionOutput {
    xaction_id: String,
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    phase: Option<String>,
}

/// JSON representation of one listed object
#[derive(Serialize)]
struct ObjectRow {
    name: String,
    size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    cached: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    checksum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    atime: Option<String>,
}

/// JSON output for object listings
#[derive(Serialize)]
struct ObjectListOutput {
    bucket: String,
    count: usize,
    objects: Vec<ObjectRow>,
}

/// Execute a bucket subcommand
pub async fn execute(cmd: BucketCommands, endpoint: Option<String>, formatter: &Formatter) -> ExitCode {
    match cmd {
        BucketCommands::Create(args) => execute_create(args, endpoint, formatter).await,
        BucketCommands::Remove(args) => execute_remove(args, endpoint, formatter).await,
        BucketCommands::Head(args) => execute_head(args, endpoint, formatter).await,
        BucketCommands::Rename(args) => execute_rename(args, endpoint, formatter).await,
        BucketCommands::Copy(args) => execute_copy(args, endpoint, formatter).await,
        BucketCommands::Evict(args) => execute_evict(args, endpoint, formatter).await,
        BucketCommands::List(args) => execute_list(args, endpoint, formatter).await,
    }
}

/// Resolve a bucket argument, rejecting object paths
fn parse_bucket_arg(
    client: &Client,
    input: &str,
    formatter: &Formatter,
) -> Result<ac_client::Bucket, ExitCode> {
    match parse_uri(input) {
        Ok(uri) if uri.object.is_none() => Ok(client.bucket_from_uri(&uri)),
        Ok(_) => {
            formatter.error(&format!("Expected a bucket, got an object path: '{input}'"));
            Err(ExitCode::InvalidArgument)
        }
        Err(e) => {
            formatter.error(&e.to_string());
            Err(ExitCode::from_error(&e))
        }
    }
}

async fn execute_create(args: BucketArgs, endpoint: Option<String>, formatter: &Formatter) -> ExitCode {
    let client = match make_client(endpoint, formatter) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let bucket = match parse_bucket_arg(&client, &args.bucket, formatter) {
        Ok(b) => b,
        Err(code) => return code,
    };

    match bucket.create().await {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&BucketOperationOutput {
                    success: true,
                    bucket: bucket.bck().to_string(),
                    message: "bucket created".to_string(),
                });
            } else {
                formatter.success(&format!("Created bucket {}", formatter.style_name(&bucket.bck().to_string())));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to create bucket: {e}"));
            ExitCode::from_error(&e)
        }
    }
}

async fn execute_remove(args: BucketArgs, endpoint: Option<String>, formatter: &Formatter) -> ExitCode {
    let client = match make_client(endpoint, formatter) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let bucket = match parse_bucket_arg(&client, &args.bucket, formatter) {
        Ok(b) => b,
        Err(code) => return code,
    };

    match bucket.delete().await {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&BucketOperationOutput {
                    success: true,
                    bucket: bucket.bck().to_string(),
                    message: "bucket destroyed".to_string(),
                });
            } else {
                formatter.success(&format!("Destroyed bucket {}", formatter.style_name(&bucket.bck().to_string())));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to destroy bucket: {e}"));
            ExitCode::from_error(&e)
        }
    }
}

async fn execute_head(args: BucketArgs, endpoint: Option<String>, formatter: &Formatter) -> ExitCode {
    let client = match make_client(endpoint, formatter) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let bucket = match parse_bucket_arg(&client, &args.bucket, formatter) {
        Ok(b) => b,
        Err(code) => return code,
    };

    match bucket.head().await {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&BucketOperationOutput {
                    success: true,
                    bucket: bucket.bck().to_string(),
                    message: "bucket exists".to_string(),
                });
            } else {
                formatter.success(&format!("Bucket {} exists", formatter.style_name(&bucket.bck().to_string())));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Bucket check failed: {e}"));
            ExitCode::from_error(&e)
        }
    }
}

async fn execute_rename(args: RenameArgs, endpoint: Option<String>, formatter: &Formatter) -> ExitCode {
    let client = match make_client(endpoint, formatter) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let bucket = match parse_bucket_arg(&client, &args.from, formatter) {
        Ok(b) => b,
        Err(code) => return code,
    };

    let handle = match bucket.rename(&args.to).await {
        Ok(handle) => handle,
        Err(e) => {
            formatter.error(&format!("Failed to rename bucket: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    finish_xaction(
        &client,
        handle,
        args.wait,
        args.timeout_secs,
        formatter,
        &format!("Rename of {} to '{}'", bucket.bck(), args.to),
    )
    .await
}

async fn execute_copy(args: CopyArgs, endpoint: Option<String>, formatter: &Formatter) -> ExitCode {
    let client = match make_client(endpoint, formatter) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let bucket = match parse_bucket_arg(&client, &args.from, formatter) {
        Ok(b) => b,
        Err(code) => return code,
    };

    let to_uri = match parse_uri(&args.to) {
        Ok(uri) if uri.object.is_none() => uri,
        Ok(_) => {
            formatter.error(&format!("Expected a bucket, got an object path: '{}'", args.to));
            return ExitCode::InvalidArgument;
        }
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    let opts = CopyOpts {
        prefix: args.prefix.unwrap_or_default(),
        dry_run: args.dry_run,
        force: args.force,
        to_provider: to_uri.bck.provider,
    };
    let handle = match bucket.copy(&to_uri.bck.name, &opts).await {
        Ok(handle) => handle,
        Err(e) => {
            formatter.error(&format!("Failed to copy bucket: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    finish_xaction(
        &client,
        handle,
        args.wait,
        args.timeout_secs,
        formatter,
        &format!("Copy of {} to {}", bucket.bck(), to_uri.bck),
    )
    .await
}

async fn execute_evict(args: EvictArgs, endpoint: Option<String>, formatter: &Formatter) -> ExitCode {
    let client = match make_client(endpoint, formatter) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let bucket = match parse_bucket_arg(&client, &args.bucket, formatter) {
        Ok(b) => b,
        Err(code) => return code,
    };

    match bucket.evict(!args.drop_md).await {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&BucketOperationOutput {
                    success: true,
                    bucket: bucket.bck().to_string(),
                    message: "bucket evicted".to_string(),
                });
            } else {
                formatter.success(&format!("Evicted bucket {}", formatter.style_name(&bucket.bck().to_string())));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to evict bucket: {e}"));
            ExitCode::from_error(&e)
        }
    }
}

async fn execute_list(args: ListArgs, endpoint: Option<String>, formatter: &Formatter) -> ExitCode {
    let client = match make_client(endpoint, formatter) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let bucket = match parse_bucket_arg(&client, &args.bucket, formatter) {
        Ok(b) => b,
        Err(code) => return code,
    };

    let props = match args.props.as_deref() {
        Some(raw) => match raw.parse::<PropsSpec>() {
            Ok(props) => props,
            Err(e) => {
                formatter.error(&e);
                return ExitCode::InvalidArgument;
            }
        },
        None => PropsSpec::name_and_size(),
    };

    let opts = ListObjectsOpts::default()
        .with_prefix(args.prefix.unwrap_or_default())
        .with_props(props.clone())
        .with_page_size(args.page_size);

    let entries = match bucket.list_all_objects(opts).await {
        Ok(entries) => entries,
        Err(e) => {
            formatter.error(&format!("Failed to list objects: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    let with_cached = props.contains(ObjectProp::Cached);
    let with_checksum = props.contains(ObjectProp::Checksum);
    let with_atime = props.contains(ObjectProp::Atime);

    if formatter.is_json() {
        let objects = entries
            .iter()
            .map(|e| ObjectRow {
                name: e.name.clone(),
                size: e.size,
                cached: with_cached.then(|| e.is_cached()),
                checksum: with_checksum.then(|| e.checksum.clone()),
                atime: with_atime.then(|| e.atime.clone()),
            })
            .collect();
        formatter.json(&ObjectListOutput {
            bucket: bucket.bck().to_string(),
            count: entries.len(),
            objects,
        });
        return ExitCode::Success;
    }

    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    let mut header = vec!["NAME", "SIZE"];
    if with_cached {
        header.push("CACHED");
    }
    if with_checksum {
        header.push("CHECKSUM");
    }
    if with_atime {
        header.push("ATIME");
    }
    table.set_header(header);

    for entry in &entries {
        let mut row = vec![
            formatter.style_name(&entry.name),
            formatter.style_size(&format_size(entry.size, DECIMAL)),
        ];
        if with_cached {
            row.push(if entry.is_cached() { "yes" } else { "no" }.to_string());
        }
        if with_checksum {
            row.push(entry.checksum.clone());
        }
        if with_atime {
            row.push(formatter.style_date(&entry.atime));
        }
        table.add_row(row);
    }

    formatter.println(&table.to_string());
    formatter.println(&format!("{} object(s)", entries.len()));
    ExitCode::Success
}

/// Report an accepted xaction, optionally waiting for it to finish
async fn finish_xaction(
    client: &Client,
    handle: ac_core::XactionHandle,
    wait: bool,
    timeout_secs: Option<u64>,
    formatter: &Formatter,
    label: &str,
) -> ExitCode {
    if !wait {
        if formatter.is_json() {
            formatter.json(&XactionOutput {
                xaction_id: handle.id,
                kind: handle.kind,
                phase: None,
            });
        } else {
            formatter.success(&format!("{label} started: xaction {}", handle.id));
        }
        return ExitCode::Success;
    }

    match wait_for_xaction(&client.cluster(), &handle.id, timeout_secs, formatter).await {
        Ok(phase) => {
            if formatter.is_json() {
                formatter.json(&XactionOutput {
                    xaction_id: handle.id,
                    kind: handle.kind,
                    phase: Some(phase.to_string()),
                });
            } else if phase.is_success() {
                formatter.success(&format!("{label} finished"));
            } else {
                formatter.warning(&format!("{label} finished with phase '{phase}'"));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("{label} did not finish: {e}"));
            ExitCode::from_error(&e)
        }
    }
}
