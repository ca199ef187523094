//! Banner collection for open TCP ports.
//!
//! Sends a minimal HTTP request to nudge request/response services, then
//! reads whatever comes back within the time budget. Services that greet on
//! connect (SSH, FTP, SMTP) answer regardless of the request.

use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{timeout, timeout_at, Instant};

/// Returned when the connection stayed silent until the budget ran out or closed.
pub const NO_BANNER: &str = "No banner received.";

/// Returned when connecting or talking to the service failed outright.
pub const NO_BANNER_OR_REFUSED: &str = "No banner or connection refused.";

/// Maximum banner length in characters before truncation.
pub const MAX_BANNER_CHARS: usize = 200;

/// Appended to truncated banners.
const CONTINUATION: &str = "...";

/// Bytes requested per read.
const READ_CHUNK: usize = 4096;

/// Build the generic probe sent once the connection is up.
fn http_probe(host: &str) -> Vec<u8> {
    format!("GET / HTTP/1.1\r\nHost: {host}\r\nConnection: close\r\n\r\n").into_bytes()
}

/// Connect to `addr` and collect a banner.
///
/// Library entry point for standalone banner collection; the TCP probe
/// reuses its own connection through [`grab_banner_from_stream`] instead.
/// A failed or timed out connect yields [`NO_BANNER_OR_REFUSED`].
pub async fn grab_banner(addr: SocketAddr, budget: Duration) -> String {
    let mut stream = match timeout(budget, TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => stream,
        _ => return NO_BANNER_OR_REFUSED.to_string(),
    };

    grab_banner_from_stream(&mut stream, &addr.ip().to_string(), budget).await
}

/// Collect a banner from an established connection.
///
/// Reading stops when the budget is spent, the peer closes, or the data
/// holds a blank line ("\r\r" or "\n\n").
pub async fn grab_banner_from_stream<S>(stream: &mut S, host: &str, budget: Duration) -> String
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let deadline = Instant::now() + budget;

    // Send failures and stalls are ignored; the read below still runs.
    match timeout_at(deadline, stream.write_all(&http_probe(host))).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::debug!(error = %e, "banner request send failed"),
        Err(_) => tracing::debug!("banner request send timed out"),
    }

    let mut received = Vec::new();
    let mut chunk = vec![0u8; READ_CHUNK];

    loop {
        match timeout_at(deadline, stream.read(&mut chunk)).await {
            Err(_) => break,
            Ok(Ok(0)) => break,
            Ok(Ok(n)) => {
                received.extend_from_slice(&chunk[..n]);
                if has_blank_line(&received) {
                    break;
                }
            }
            Ok(Err(e)) => {
                tracing::debug!(error = %e, "banner read failed");
                return NO_BANNER_OR_REFUSED.to_string();
            }
        }
    }

    if received.is_empty() {
        NO_BANNER.to_string()
    } else {
        format_banner(&received)
    }
}

fn has_blank_line(data: &[u8]) -> bool {
    data.windows(2).any(|w| w == b"\r\r" || w == b"\n\n")
}

/// Decode received bytes leniently, trim, and cap at [`MAX_BANNER_CHARS`].
pub fn format_banner(data: &[u8]) -> String {
    let text = String::from_utf8_lossy(data);
    let text = text.trim();

    match text.char_indices().nth(MAX_BANNER_CHARS) {
        Some((cut, _)) => format!("{}{}", &text[..cut], CONTINUATION),
        None => text.to_string(),
    }
}
