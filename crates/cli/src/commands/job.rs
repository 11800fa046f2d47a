//! Background job commands: start a named xaction, wait on an id

use clap::Subcommand;
use serde::Serialize;

use ac_core::{Bck, parse_uri};

use super::{make_client, wait_for_xaction};
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Job subcommands
#[derive(Subcommand, Debug)]
pub enum JobCommands {
    /// Start a named background job, e.g. lru
    Start(StartArgs),

    /// Wait for an xaction to reach a terminal state
    Wait(WaitArgs),
}

#[derive(clap::Args, Debug)]
pub struct StartArgs {
    /// Job kind, e.g. lru
    pub kind: String,

    /// Scope the job to one bucket, e.g. ais://imagenet
    #[arg(long)]
    pub bucket: Option<String>,

    /// Block until the job finishes
    #[arg(long)]
    pub wait: bool,

    /// Wait deadline in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

#[derive(clap::Args, Debug)]
pub struct WaitArgs {
    /// Xaction id to wait on
    pub id: String,

    /// Wait deadline in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

/// JSON output for job operations
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JobOutput {
    xaction_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    finished_at: Option<String>,
}

/// Execute a job subcommand
pub async fn execute(cmd: JobCommands, endpoint: Option<String>, formatter: &Formatter) -> ExitCode {
    match cmd {
        JobCommands::Start(args) => execute_start(args, endpoint, formatter).await,
        JobCommands::Wait(args) => execute_wait(args, endpoint, formatter).await,
    }
}

async fn execute_start(args: StartArgs, endpoint: Option<String>, formatter: &Formatter) -> ExitCode {
    let bck: Option<Bck> = match args.bucket.as_deref() {
        Some(raw) => match parse_uri(raw) {
            Ok(uri) if uri.object.is_none() => Some(uri.bck),
            Ok(_) => {
                formatter.error(&format!("Expected a bucket, got an object path: '{raw}'"));
                return ExitCode::InvalidArgument;
            }
            Err(e) => {
                formatter.error(&e.to_string());
                return ExitCode::from_error(&e);
            }
        },
        None => None,
    };

    let client = match make_client(endpoint, formatter) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let cluster = client.cluster();

    let handle = match cluster.start_xaction(&args.kind, bck).await {
        Ok(handle) => handle,
        Err(e) => {
            formatter.error(&format!("Failed to start job: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    if !args.wait {
        if formatter.is_json() {
            formatter.json(&JobOutput {
                xaction_id: handle.id,
                kind: Some(handle.kind),
                phase: None,
                error: None,
                finished_at: None,
            });
        } else {
            formatter.success(&format!(
                "Started {} job: xaction {}",
                handle.kind,
                formatter.style_name(&handle.id)
            ));
        }
        return ExitCode::Success;
    }

    report_wait(&client, &handle.id, Some(handle.kind), args.timeout_secs, formatter).await
}

async fn execute_wait(args: WaitArgs, endpoint: Option<String>, formatter: &Formatter) -> ExitCode {
    let client = match make_client(endpoint, formatter) {
        Ok(c) => c,
        Err(code) => return code,
    };
    report_wait(&client, &args.id, None, args.timeout_secs, formatter).await
}

/// Wait for an xaction and report its terminal state, including the
/// cluster-recorded failure detail when the operation itself failed.
async fn report_wait(
    client: &ac_client::Client,
    id: &str,
    kind: Option<String>,
    timeout_secs: Option<u64>,
    formatter: &Formatter,
) -> ExitCode {
    let cluster = client.cluster();
    let phase = match wait_for_xaction(&cluster, id, timeout_secs, formatter).await {
        Ok(phase) => phase,
        Err(e) => {
            formatter.error(&format!("Wait on xaction '{id}' failed: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    // The id stays queryable after completion; fetch the terminal record
    // for the end time and any failure detail.
    let status = cluster.xaction_status(id).await.ok();
    let error = status
        .as_ref()
        .map(|s| s.err.clone())
        .filter(|e| !e.is_empty());
    let finished_at = status
        .as_ref()
        .and_then(|s| s.end_timestamp())
        .map(|t| t.to_string());

    if formatter.is_json() {
        formatter.json(&JobOutput {
            xaction_id: id.to_string(),
            kind,
            phase: Some(phase.to_string()),
            error,
            finished_at,
        });
    } else if phase.is_success() {
        formatter.success(&format!("Xaction {} finished", formatter.style_name(id)));
    } else {
        let detail = error.unwrap_or_else(|| "aborted".to_string());
        formatter.warning(&format!("Xaction {id} finished with phase '{phase}': {detail}"));
    }
    ExitCode::Success
}
