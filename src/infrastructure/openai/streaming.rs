//! Server-Sent Events streaming support for chat completions.
//!
//! The streaming endpoint returns SSE frames of the form
//! `data: {json}\n\n`, terminated by `data: [DONE]`. This module parses
//! the raw byte stream into text deltas, reassembling frames that arrive
//! split across network chunks.

use bytes::{Bytes, BytesMut};
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::warn;

use super::error::OpenAiApiError;
use super::types::ChatCompletionChunk;

/// Parses an SSE byte stream into chat-completion text deltas.
///
/// Chunks without a content delta (role announcements, finish markers)
/// are skipped. `data: [DONE]` ends the stream.
///
/// The buffer holds raw bytes and only complete frames are decoded as
/// UTF-8: network chunk boundaries can fall inside a multi-byte
/// character, and a frame boundary (`\n\n`) never can.
pub struct DeltaStream {
    inner: Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send>>,
    buffer: BytesMut,
    done: bool,
}

impl DeltaStream {
    /// Wrap the raw byte stream from `reqwest::Response::bytes_stream()`.
    pub fn new(byte_stream: impl Stream<Item = reqwest::Result<Bytes>> + Send + 'static) -> Self {
        Self {
            inner: Box::pin(byte_stream),
            buffer: BytesMut::new(),
            done: false,
        }
    }

    /// Parse one SSE frame into a text delta.
    ///
    /// Returns `Ok(None)` for frames that carry no content (keepalives,
    /// finish markers) and `Err` for frames with unparseable JSON.
    fn parse_frame(frame: &str) -> Result<Option<String>, OpenAiApiError> {
        let mut data = None;

        for line in frame.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(':') {
                continue;
            }
            if let Some(value) = trimmed.strip_prefix("data:") {
                data = Some(value.trim());
            }
        }

        let Some(data) = data else {
            return Ok(None);
        };

        if data == "[DONE]" {
            return Ok(None);
        }

        let chunk: ChatCompletionChunk = serde_json::from_str(data)?;
        Ok(chunk.delta_content().map(str::to_owned))
    }

    fn frame_is_done(frame: &str) -> bool {
        frame
            .lines()
            .any(|line| line.trim().strip_prefix("data:").map(str::trim) == Some("[DONE]"))
    }

    fn decode_frame(bytes: &[u8]) -> Result<&str, OpenAiApiError> {
        std::str::from_utf8(bytes)
            .map_err(|e| OpenAiApiError::Unknown(format!("invalid UTF-8 in SSE frame: {}", e)))
    }
}

/// Byte offset of the first `\n\n` frame boundary, if buffered.
fn frame_boundary(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|w| w == b"\n\n")
}

impl Stream for DeltaStream {
    type Item = Result<String, OpenAiApiError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            if self.done {
                return Poll::Ready(None);
            }

            // Drain any complete frame already buffered.
            if let Some(frame_end) = frame_boundary(&self.buffer) {
                let frame_bytes = self.buffer.split_to(frame_end + 2);
                let frame = match Self::decode_frame(&frame_bytes[..frame_end]) {
                    Ok(frame) => frame,
                    Err(err) => return Poll::Ready(Some(Err(err))),
                };

                if frame.trim().is_empty() {
                    continue;
                }

                if Self::frame_is_done(frame) {
                    self.done = true;
                    return Poll::Ready(None);
                }

                match Self::parse_frame(frame) {
                    Ok(Some(delta)) => return Poll::Ready(Some(Ok(delta))),
                    Ok(None) => continue,
                    Err(err) => {
                        warn!("Failed to parse SSE frame: {}", err);
                        return Poll::Ready(Some(Err(err)));
                    }
                }
            }

            // Need more data from the network.
            match self.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    self.buffer.extend_from_slice(&bytes);
                }
                Poll::Ready(Some(Err(err))) => {
                    return Poll::Ready(Some(Err(OpenAiApiError::NetworkError(err))));
                }
                Poll::Ready(None) => {
                    // Upstream closed; a trailing frame may lack the blank line.
                    let frame_bytes = std::mem::take(&mut self.buffer);
                    self.done = true;

                    if frame_bytes.iter().all(u8::is_ascii_whitespace) {
                        return Poll::Ready(None);
                    }

                    let frame = match Self::decode_frame(&frame_bytes) {
                        Ok(frame) => frame,
                        Err(err) => return Poll::Ready(Some(Err(err))),
                    };
                    if Self::frame_is_done(frame) {
                        return Poll::Ready(None);
                    }
                    return match Self::parse_frame(frame) {
                        Ok(Some(delta)) => Poll::Ready(Some(Ok(delta))),
                        Ok(None) => Poll::Ready(None),
                        Err(err) => Poll::Ready(Some(Err(err))),
                    };
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
