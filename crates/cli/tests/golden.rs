//! Golden tests for verifying CLI output format stability
//!
//! These tests ensure that the JSON error output and generated completions
//! remain stable between releases.
//!
//! Run with: `cargo test -p aisc-cli --features golden`

#![cfg(feature = "golden")]

use std::process::Command;

/// Get the path to the aisc binary
fn aisc_binary() -> String {
    let output = Command::new("cargo")
        .args(["build", "--release", "-p", "aisc-cli"])
        .output()
        .expect("Failed to build aisc binary");

    if !output.status.success() {
        panic!(
            "Failed to build aisc binary: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    env!("CARGO_MANIFEST_DIR").to_string() + "/../../target/release/aisc"
}

mod output_tests {
    use super::*;
    use tempfile::TempDir;

    /// Isolated config directory so user config cannot leak in
    fn setup_test_env() -> TempDir {
        TempDir::new().expect("Failed to create temp dir")
    }

    #[test]
    fn test_completions_mention_binary() {
        let output = Command::new(aisc_binary())
            .args(["completions", "bash"])
            .output()
            .expect("Failed to execute aisc");

        assert!(output.status.success(), "Command should succeed");
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("aisc"));
    }

    #[test]
    fn test_invalid_provider_error_json() {
        let temp_dir = setup_test_env();
        let config_dir = temp_dir.path().to_str().unwrap();

        let output = Command::new(aisc_binary())
            .args([
                "bucket",
                "create",
                "s3://bucket",
                "--json",
                "--endpoint",
                "http://127.0.0.1:1",
            ])
            .env("AISC_CONFIG_DIR", config_dir)
            .env_remove("AIS_ENDPOINT")
            .output()
            .expect("Failed to execute aisc");

        // INVALID_ARGUMENT exit code.
        assert!(!output.status.success(), "Command should fail");
        assert_eq!(output.status.code(), Some(2));

        let stderr = String::from_utf8_lossy(&output.stderr);
        let json: serde_json::Value =
            serde_json::from_str(&stderr).expect("Output should be valid JSON");

        insta::assert_json_snapshot!("invalid_provider_error", json);
    }

    #[test]
    fn test_unreachable_endpoint_error_json() {
        let temp_dir = setup_test_env();
        let config_dir = temp_dir.path().to_str().unwrap();

        let output = Command::new(aisc_binary())
            .args([
                "cluster",
                "ls",
                "--json",
                "--endpoint",
                "http://127.0.0.1:1",
            ])
            .env("AISC_CONFIG_DIR", config_dir)
            .env_remove("AIS_ENDPOINT")
            .output()
            .expect("Failed to execute aisc");

        // TRANSPORT exit code; the message text is platform-dependent, so
        // only the shape is checked.
        assert!(!output.status.success(), "Command should fail");
        assert_eq!(output.status.code(), Some(7));

        let stderr = String::from_utf8_lossy(&output.stderr);
        let json: serde_json::Value =
            serde_json::from_str(&stderr).expect("Output should be valid JSON");
        assert!(json["error"].is_string());
    }
}
