//! Pipe binding - JSON Lines over a request/response stream
//!
//! Serves exactly one caller for the lifetime of the process: each
//! input line is one [`RpcRequest`], each output line the matching
//! [`RpcResponse`], in order. A malformed line produces an
//! invalid-argument response instead of terminating the loop; EOF
//! ends the session. There is no liveness endpoint — liveness is
//! implied by process existence.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error};

use errata_core::GatewayError;
use errata_gateway::{Dispatcher, RpcRequest, RpcResponse};

/// Serve the pipe binding over arbitrary byte streams.
///
/// Generic over reader/writer so tests can drive it with an in-memory
/// duplex; production uses [`run_stdio`].
pub async fn run_pipe<R, W>(
    dispatcher: Dispatcher,
    reader: R,
    mut writer: W,
) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<RpcRequest>(line) {
            Ok(request) => dispatcher.handle_request(request).await,
            Err(e) => RpcResponse {
                id: None,
                outcome: GatewayError::InvalidArgument(format!("malformed request line: {e}"))
                    .into(),
            },
        };

        match serde_json::to_vec(&response) {
            Ok(mut payload) => {
                payload.push(b'\n');
                writer.write_all(&payload).await?;
                writer.flush().await?;
            }
            Err(e) => {
                // Should not happen for the envelope types; skip the
                // line rather than kill the single caller's session.
                error!(error = %e, "Failed to encode response line");
            }
        }
    }

    debug!("Pipe caller reached EOF; session over");
    Ok(())
}

/// Serve the pipe binding on this process's stdin/stdout.
///
/// Stdout is the wire; all logging must go to stderr.
pub async fn run_stdio(dispatcher: Dispatcher) -> std::io::Result<()> {
    run_pipe(dispatcher, tokio::io::stdin(), tokio::io::stdout()).await
}
