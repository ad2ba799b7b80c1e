//! MCP stdio transport
//!
//! Newline-delimited JSON-RPC: one message per line on stdin, one response per
//! line on stdout. Logs go to stderr so stdout carries protocol traffic only.

use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::{error::McpError, interface::McpInterface, types::JsonRpcResponse};

/// Serve over the process's stdin and stdout until stdin closes
pub async fn serve(mcp: Arc<McpInterface>) -> std::io::Result<()> {
    tracing::info!("MCP stdio transport ready");
    run(mcp, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;
    tracing::info!("stdin closed, shutting down");
    Ok(())
}

/// Read requests from `reader` and write responses to `writer`
pub async fn run<R, W>(mcp: Arc<McpInterface>, mut reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                mcp.handle_text(line).await
            }
            Err(e) => {
                tracing::warn!(error = %e, "Discarding line that is not valid UTF-8");
                Some(JsonRpcResponse::error(
                    Value::Null,
                    McpError::ParseError(e.to_string()).into(),
                ))
            }
        };
        let Some(response) = response else {
            continue;
        };

        let mut out = match serde_json::to_vec(&response) {
            Ok(out) => out,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode response");
                continue;
            }
        };
        out.push(b'\n');
        writer.write_all(&out).await?;
        writer.flush().await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_registry;
    use crate::client::GhlClient;
    use crate::testing::StubUpstream;
    use axum::http::StatusCode;
    use serde_json::json;

    async fn run_lines(input: &str) -> Vec<Value> {
        run_bytes(input.as_bytes()).await
    }

    async fn run_bytes(input: &[u8]) -> Vec<Value> {
        let upstream = StubUpstream::spawn(StatusCode::OK, json!({"ok": true})).await;
        let client = Arc::new(GhlClient::new(upstream.api_config()).unwrap());
        let registry = build_registry(client, &[]).unwrap();
        let mcp = Arc::new(McpInterface::new(Arc::new(registry)));

        let mut output = Vec::new();
        run(mcp, input, &mut output).await.unwrap();

        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_one_response_per_request_line() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-03-26"}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#,
            "\n",
        );
        let responses = run_lines(input).await;

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[0]["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(responses[1], json!({"jsonrpc": "2.0", "id": 2, "result": {}}));
    }

    #[tokio::test]
    async fn test_bad_line_does_not_stop_the_loop() {
        let input = "not json\n{\"jsonrpc\":\"2.0\",\"id\":5,\"method\":\"tools/list\"}\n";
        let responses = run_lines(input).await;

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["error"]["code"], -32700);
        assert!(!responses[1]["result"]["tools"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tool_call_over_stdio() {
        let input = r#"{"jsonrpc":"2.0","id":"a","method":"tools/call","params":{"name":"get_contact","arguments":{"contactId":"c1"}}}"#;
        let responses = run_lines(input).await;

        assert_eq!(responses[0]["id"], "a");
        let text = responses[0]["result"]["content"][0]["text"].as_str().unwrap();
        assert_eq!(serde_json::from_str::<Value>(text).unwrap(), json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_is_parse_error() {
        let mut input = b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\",\"x\":\"".to_vec();
        input.extend_from_slice(&[0xFF, 0xFE]);
        input.extend_from_slice(b"\"}\n{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n");

        let responses = run_bytes(&input).await;

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["error"]["code"], -32700);
        assert_eq!(responses[0]["id"], Value::Null);
        assert_eq!(responses[1], json!({"jsonrpc": "2.0", "id": 2, "result": {}}));
    }
}
