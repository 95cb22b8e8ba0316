//! Service output tailing over the server's SSE endpoint.
//!
//! One reader thread per stream. The reader forwards `data:` frames tagged
//! with a generation number; the owning `ServiceTail` drops frames from a
//! superseded generation, so a replaced stream cannot leak stale lines into
//! a fresh buffer. `[DONE]` is a normal close, not an error.

use reqwest::blocking::Client;
use std::io::{BufRead, BufReader};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread;

use crate::messages::ResponseMessage;

/// Sentinel frame the server emits when a stream ends normally.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Handle to a running tail thread. Dropping it signals the reader to stop;
/// the thread exits at the next received line.
pub struct TailHandle {
    stop: Arc<AtomicBool>,
    generation: u64,
}

impl TailHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

impl Drop for TailHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Extract the payload of an SSE data frame, if the line is one.
fn parse_data_frame(line: &str) -> Option<&str> {
    let payload = line.strip_prefix("data:")?;
    Some(payload.strip_prefix(' ').unwrap_or(payload))
}

/// Open the SSE stream and forward its lines until `[DONE]`, a transport
/// error, or a stop signal. Transport failures end the stream with a
/// warning; reconnection happens only through the caller's
/// status-change path.
pub fn spawn_output_tail(
    url: String,
    secret: Option<String>,
    generation: u64,
    tx: Sender<ResponseMessage>,
) -> TailHandle {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = Arc::clone(&stop);

    thread::spawn(move || {
        let finish = |tx: &Sender<ResponseMessage>| {
            let _ = tx.send(ResponseMessage::ServiceOutputDone { generation });
        };

        let client = match Client::builder().timeout(None).build() {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(error = %e, "could not build tail client");
                finish(&tx);
                return;
            }
        };

        let mut request = client.get(&url);
        if let Some(secret) = &secret {
            request = request.bearer_auth(secret);
        }
        let response = match request.send() {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::warn!(status = response.status().as_u16(), %url, "tail rejected");
                finish(&tx);
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, %url, "tail connection failed");
                finish(&tx);
                return;
            }
        };

        for line in BufReader::new(response).lines() {
            if stop_flag.load(Ordering::Relaxed) {
                // Canceled: the buffer was already replaced, stay silent.
                return;
            }
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!(error = %e, %url, "tail stream broke");
                    break;
                }
            };
            let Some(payload) = parse_data_frame(&line) else {
                continue;
            };
            if payload == DONE_SENTINEL {
                break;
            }
            let _ = tx.send(ResponseMessage::ServiceOutput {
                generation,
                line: payload.to_string(),
            });
        }

        finish(&tx);
    });

    TailHandle { stop, generation }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_frames_are_recognized() {
        assert_eq!(parse_data_frame("data: hello"), Some("hello"));
        assert_eq!(parse_data_frame("data:hello"), Some("hello"));
        assert_eq!(parse_data_frame("data: "), Some(""));
        assert_eq!(parse_data_frame("data:  indented"), Some(" indented"));
    }

    #[test]
    fn non_data_lines_are_ignored() {
        assert_eq!(parse_data_frame(""), None);
        assert_eq!(parse_data_frame("event: output"), None);
        assert_eq!(parse_data_frame(": keepalive"), None);
    }

    #[test]
    fn done_sentinel_matches_server_frame() {
        assert_eq!(parse_data_frame("data: [DONE]"), Some(DONE_SENTINEL));
    }

    #[test]
    fn handle_stop_is_sticky() {
        let handle = TailHandle {
            stop: Arc::new(AtomicBool::new(false)),
            generation: 7,
        };
        assert_eq!(handle.generation(), 7);
        handle.stop();
        assert!(handle.stop.load(Ordering::Relaxed));
    }
}
