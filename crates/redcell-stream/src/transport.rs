use async_trait::async_trait;

use redcell_protocol::{StreamEnvelope, StreamResult, TrackedId};

/// One open logical stream. `next_message` suspends until the next decoded
/// envelope arrives, returns `Ok(None)` on a clean end of stream, and an
/// error on transport failure.
#[async_trait]
pub trait StreamSource: Send {
    async fn next_message(&mut self) -> StreamResult<Option<StreamEnvelope>>;
}

pub type BoxedStreamSource = Box<dyn StreamSource>;

/// Opens one stream per tracked resource id. The id is embedded in the
/// connection target; there is no multiplexing.
#[async_trait]
pub trait StreamTransport: Send + Sync {
    async fn open(&self, tracked_id: &TrackedId) -> StreamResult<BoxedStreamSource>;
}
