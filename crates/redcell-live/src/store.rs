use std::sync::{Arc, RwLock};

use redcell_protocol::{StreamEnvelope, StreamResult, TrackedId};
use redcell_stream::{StreamConnection, StreamConnectionConfig, StreamTransport};

use crate::playground::PlaygroundLiveState;
use crate::state::LiveState;
use crate::tuning::TuningLiveState;
use crate::turn::AttackLiveState;

/// Holds the current snapshot plus connection state for one tracked id.
///
/// Single-owner contract: one view owns the store for the lifetime of the
/// screen and calls `disconnect` on teardown. Construct one store per view
/// activation; nothing here is process-wide.
pub struct LiveStore<S: LiveState, T: StreamTransport + 'static> {
    connection: StreamConnection<T>,
    state: Arc<RwLock<S>>,
}

impl<S: LiveState, T: StreamTransport + 'static> LiveStore<S, T> {
    pub fn new(transport: T, config: StreamConnectionConfig) -> Self {
        let state = Arc::new(RwLock::new(S::default()));
        let connection = StreamConnection::new(transport, config);

        let reducer_state = Arc::clone(&state);
        connection.subscribe(Box::new(move |envelope: StreamEnvelope| {
            if let Some(message) = S::decode(&envelope) {
                let mut state = reducer_state.write().expect("live store state lock poisoned");
                state.apply(message);
            }
        }));

        Self { connection, state }
    }

    /// Opens a stream for `tracked_id`, resetting the snapshot to its initial
    /// values first; a fresh subscription starts blank even for the same id.
    /// Any previous stream is fully closed before the reset, so trailing
    /// messages from the old stream can never land in the new snapshot.
    pub async fn connect(&self, tracked_id: impl Into<TrackedId>) -> StreamResult<()> {
        self.connection.disconnect().await;
        self.reset();
        self.connection.connect(tracked_id.into()).await
    }

    /// Closes the stream; the snapshot keeps its last reduced values until
    /// `reset` or the next `connect`.
    pub async fn disconnect(&self) {
        self.connection.disconnect().await;
    }

    /// Resets the snapshot to its initial values without touching the
    /// connection.
    pub fn reset(&self) {
        let mut state = self.state.write().expect("live store state lock poisoned");
        *state = S::default();
    }

    pub fn snapshot(&self) -> S
    where
        S: Clone,
    {
        self.state
            .read()
            .expect("live store state lock poisoned")
            .clone()
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    pub fn last_message(&self) -> Option<StreamEnvelope> {
        self.connection.last_message()
    }

    pub async fn tracked_id(&self) -> Option<TrackedId> {
        self.connection.tracked_id().await
    }
}

pub type AttackLiveStore<T> = LiveStore<AttackLiveState, T>;
pub type TuningLiveStore<T> = LiveStore<TuningLiveState, T>;
pub type PlaygroundLiveStore<T> = LiveStore<PlaygroundLiveState, T>;
