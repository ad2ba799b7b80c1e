//! Tests that start the `ghl-mcp` binary as a child process
//!
//! The environment is cleared and the working directory is a fresh temp dir,
//! so a developer's `.env` cannot leak into the run.

use std::process::Stdio;
use std::time::Duration;

use axum::http::StatusCode;
use ghl_mcp::testing::StubUpstream;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;

const BIN: &str = env!("CARGO_BIN_EXE_ghl-mcp");

fn server(cwd: &tempfile::TempDir, upstream: &StubUpstream) -> Command {
    let mut cmd = Command::new(BIN);
    cmd.env_clear()
        .current_dir(cwd.path())
        .env("GHL_API_KEY", "test-token")
        .env("GHL_LOCATION_ID", "test-location")
        .env("GHL_BASE_URL", upstream.base_url())
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true);
    cmd
}

fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[tokio::test]
async fn test_stdio_mode_answers_initialize() {
    let upstream = StubUpstream::spawn(StatusCode::OK, json!({})).await;
    let cwd = tempfile::tempdir().unwrap();
    let mut child = server(&cwd, &upstream).spawn().expect("spawn server");

    let mut stdin = child.stdin.take().unwrap();
    let mut stdout = BufReader::new(child.stdout.take().unwrap()).lines();

    stdin
        .write_all(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"initialize\",\"params\":{}}\n")
        .await
        .unwrap();
    stdin.flush().await.unwrap();

    let line = tokio::time::timeout(Duration::from_secs(10), stdout.next_line())
        .await
        .expect("timeout waiting for initialize response")
        .unwrap()
        .expect("stdout closed");
    let response: Value = serde_json::from_str(&line).unwrap();

    assert_eq!(response["id"], 1);
    assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(response["result"]["serverInfo"]["name"], "ghl-mcp-server");

    // Closing stdin ends the process cleanly
    drop(stdin);
    let status = tokio::time::timeout(Duration::from_secs(10), child.wait())
        .await
        .expect("timeout waiting for exit")
        .unwrap();
    assert!(status.success());
}

#[tokio::test]
async fn test_http_mode_serves_health() {
    let upstream = StubUpstream::spawn(StatusCode::OK, json!({})).await;
    let cwd = tempfile::tempdir().unwrap();
    let port = free_port();

    let _child = server(&cwd, &upstream)
        .env("MCP_MODE", "http")
        .env("MCP_SERVER_HOST", "127.0.0.1")
        .env("MCP_SERVER_PORT", port.to_string())
        .spawn()
        .expect("spawn server");

    let url = format!("http://127.0.0.1:{}/health", port);
    let mut health = None;
    for _ in 0..100 {
        if let Ok(response) = reqwest::get(&url).await {
            health = Some(response.json::<Value>().await.unwrap());
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    let health = health.expect("server never became healthy");
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["modules"].as_array().unwrap().len(), 19);
}

#[tokio::test]
async fn test_missing_credentials_is_fatal() {
    let upstream = StubUpstream::spawn(StatusCode::OK, json!({})).await;
    let cwd = tempfile::tempdir().unwrap();

    let status = server(&cwd, &upstream)
        .env_remove("GHL_API_KEY")
        .stdin(Stdio::null())
        .status()
        .await
        .unwrap();

    assert!(!status.success());
    assert!(upstream.requests().is_empty());
}
