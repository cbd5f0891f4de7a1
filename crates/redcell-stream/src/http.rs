use std::pin::Pin;

use async_trait::async_trait;
use futures_util::{Stream, StreamExt};

use redcell_protocol::{StreamEnvelope, StreamError, StreamResult, TrackedId};

use crate::transport::{BoxedStreamSource, StreamSource, StreamTransport};

type BoxedByteStream = Pin<Box<dyn Stream<Item = reqwest::Result<bytes::Bytes>> + Send>>;

/// Reads newline-delimited JSON envelopes from
/// `GET {base}/v1/{channel}/{id}/events` over a persistent response body.
pub struct HttpStreamTransport {
    client: reqwest::Client,
    base_url: String,
    channel: String,
}

impl HttpStreamTransport {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            channel: channel.into(),
        }
    }

    fn events_url(&self, tracked_id: &TrackedId) -> String {
        format!(
            "{}/v1/{}/{}/events",
            self.base_url,
            self.channel,
            tracked_id.as_str()
        )
    }
}

#[async_trait]
impl StreamTransport for HttpStreamTransport {
    async fn open(&self, tracked_id: &TrackedId) -> StreamResult<BoxedStreamSource> {
        let response = self
            .client
            .get(self.events_url(tracked_id))
            .send()
            .await
            .map_err(|error| StreamError::Transport(format!("stream request failed: {error}")))?;

        if !response.status().is_success() {
            return Err(StreamError::Transport(format!(
                "stream request failed with status {}",
                response.status()
            )));
        }

        Ok(Box::new(HttpLineSource {
            stream: Box::pin(response.bytes_stream()),
            line_buffer: Vec::new(),
            exhausted: false,
        }))
    }
}

struct HttpLineSource {
    stream: BoxedByteStream,
    line_buffer: Vec<u8>,
    exhausted: bool,
}

impl HttpLineSource {
    fn take_line(&mut self) -> Option<Vec<u8>> {
        let newline_index = self.line_buffer.iter().position(|byte| *byte == b'\n')?;
        let mut line = self.line_buffer.drain(..=newline_index).collect::<Vec<_>>();
        if matches!(line.last(), Some(b'\n')) {
            line.pop();
        }
        if matches!(line.last(), Some(b'\r')) {
            line.pop();
        }
        Some(line)
    }
}

#[async_trait]
impl StreamSource for HttpLineSource {
    async fn next_message(&mut self) -> StreamResult<Option<StreamEnvelope>> {
        loop {
            while let Some(line) = self.take_line() {
                match StreamEnvelope::parse_line(&line) {
                    Some(envelope) => return Ok(Some(envelope)),
                    None => {
                        tracing::debug!("dropped malformed stream line");
                    }
                }
            }

            if self.exhausted {
                // Trailing bytes without a final newline still count as a frame.
                if self.line_buffer.is_empty() {
                    return Ok(None);
                }
                let line = std::mem::take(&mut self.line_buffer);
                return Ok(StreamEnvelope::parse_line(&line));
            }

            match self.stream.next().await {
                Some(Ok(chunk)) => self.line_buffer.extend_from_slice(&chunk),
                Some(Err(error)) => {
                    return Err(StreamError::Transport(format!(
                        "stream read failed: {error}"
                    )))
                }
                None => self.exhausted = true,
            }
        }
    }
}
