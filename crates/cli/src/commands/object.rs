//! Object commands: upload, download, delete

use std::path::PathBuf;

use clap::Subcommand;
use humansize::{DECIMAL, format_size};
use serde::Serialize;

use ac_client::{Client, Object};
use ac_core::parse_uri;

use super::make_client;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Object subcommands
#[derive(Subcommand, Debug)]
pub enum ObjectCommands {
    /// Upload a local file as an object
    Put(PutArgs),

    /// Download an object to a local file
    Get(GetArgs),

    /// Delete an object
    #[command(name = "rm", alias = "remove")]
    Remove(RemoveArgs),
}

#[derive(clap::Args, Debug)]
pub struct PutArgs {
    /// Local file to upload
    pub src: PathBuf,

    /// Destination object, e.g. ais://bucket/name
    pub dest: String,
}

#[derive(clap::Args, Debug)]
pub struct GetArgs {
    /// Object to download, e.g. ais://bucket/name
    pub src: String,

    /// Local destination file (defaults to the object's file name)
    pub dest: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Object to delete, e.g. ais://bucket/name
    pub target: String,
}

/// JSON output for object operations
#[derive(Serialize)]
struct ObjectOperationOutput {
    success: bool,
    object: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    bytes: Option<u64>,
}

/// Execute an object subcommand
pub async fn execute(cmd: ObjectCommands, endpoint: Option<String>, formatter: &Formatter) -> ExitCode {
    match cmd {
        ObjectCommands::Put(args) => execute_put(args, endpoint, formatter).await,
        ObjectCommands::Get(args) => execute_get(args, endpoint, formatter).await,
        ObjectCommands::Remove(args) => execute_remove(args, endpoint, formatter).await,
    }
}

/// Resolve an object argument of the form `<provider>://<bucket>/<object>`
fn parse_object_arg(
    client: &Client,
    input: &str,
    formatter: &Formatter,
) -> Result<Object, ExitCode> {
    let uri = match parse_uri(input) {
        Ok(uri) => uri,
        Err(e) => {
            formatter.error(&e.to_string());
            return Err(ExitCode::from_error(&e));
        }
    };
    match uri.require_object(input) {
        Ok(name) => Ok(client.bucket_from_uri(&uri).object(name)),
        Err(e) => {
            formatter.error(&e.to_string());
            Err(ExitCode::from_error(&e))
        }
    }
}

async fn execute_put(args: PutArgs, endpoint: Option<String>, formatter: &Formatter) -> ExitCode {
    let client = match make_client(endpoint, formatter) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let object = match parse_object_arg(&client, &args.dest, formatter) {
        Ok(o) => o,
        Err(code) => return code,
    };

    match object.put_file(&args.src).await {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&ObjectOperationOutput {
                    success: true,
                    object: args.dest,
                    message: "object uploaded".to_string(),
                    bytes: None,
                });
            } else {
                formatter.success(&format!(
                    "Uploaded {} to {}",
                    args.src.display(),
                    formatter.style_name(&args.dest)
                ));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to upload object: {e}"));
            ExitCode::from_error(&e)
        }
    }
}

async fn execute_get(args: GetArgs, endpoint: Option<String>, formatter: &Formatter) -> ExitCode {
    let client = match make_client(endpoint, formatter) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let object = match parse_object_arg(&client, &args.src, formatter) {
        Ok(o) => o,
        Err(code) => return code,
    };

    // Default destination: the last path component of the object name.
    let dest = args.dest.unwrap_or_else(|| {
        let name = object.name();
        PathBuf::from(name.rsplit('/').next().unwrap_or(name))
    });

    let stream = match object.get().await {
        Ok(stream) => stream,
        Err(e) => {
            formatter.error(&format!("Failed to read object: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    let mut file = match tokio::fs::File::create(&dest).await {
        Ok(file) => file,
        Err(e) => {
            formatter.error(&format!("Cannot create {}: {e}", dest.display()));
            return ExitCode::GeneralError;
        }
    };

    match stream.write_to(&mut file).await {
        Ok(written) => {
            if formatter.is_json() {
                formatter.json(&ObjectOperationOutput {
                    success: true,
                    object: args.src,
                    message: format!("object written to {}", dest.display()),
                    bytes: Some(written),
                });
            } else {
                formatter.success(&format!(
                    "Downloaded {} to {} ({})",
                    formatter.style_name(&args.src),
                    dest.display(),
                    formatter.style_size(&format_size(written, DECIMAL))
                ));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to download object: {e}"));
            ExitCode::from_error(&e)
        }
    }
}

async fn execute_remove(args: RemoveArgs, endpoint: Option<String>, formatter: &Formatter) -> ExitCode {
    let client = match make_client(endpoint, formatter) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let object = match parse_object_arg(&client, &args.target, formatter) {
        Ok(o) => o,
        Err(code) => return code,
    };

    match object.delete().await {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&ObjectOperationOutput {
                    success: true,
                    object: args.target,
                    message: "object deleted".to_string(),
                    bytes: None,
                });
            } else {
                formatter.success(&format!("Deleted {}", formatter.style_name(&args.target)));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to delete object: {e}"));
            ExitCode::from_error(&e)
        }
    }
}
