use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use redcell_protocol::{StreamEnvelope, StreamResult, TrackedId};
use tokio::task::JoinHandle;

use crate::transport::{BoxedStreamSource, StreamTransport};

pub const DEFAULT_RECONNECT_ATTEMPTS: u32 = 3;
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Single dispatch target invoked once per decoded message, strictly in
/// arrival order. The ingestion task is the only caller, so invocations never
/// overlap.
pub type StreamDispatch = Box<dyn FnMut(StreamEnvelope) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConnectionConfig {
    /// Automatic reconnect attempts after a transport failure. Zero disables
    /// reconnection entirely.
    pub reconnect_attempts: u32,
    pub reconnect_delay: Duration,
}

impl Default for StreamConnectionConfig {
    fn default() -> Self {
        Self {
            reconnect_attempts: DEFAULT_RECONNECT_ATTEMPTS,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }
}

struct ActiveStream {
    tracked_id: TrackedId,
    task: JoinHandle<()>,
}

/// Owns at most one logical stream at a time. Starting a new stream fully
/// closes the previous one first, so no two streams ever write into the same
/// snapshot concurrently. Transport failures surface only through
/// `is_connected`; they never reach the subscriber.
pub struct StreamConnection<T: StreamTransport> {
    transport: Arc<T>,
    config: StreamConnectionConfig,
    dispatch: Arc<Mutex<Option<StreamDispatch>>>,
    connected: Arc<AtomicBool>,
    last_message: Arc<Mutex<Option<StreamEnvelope>>>,
    generation: Arc<AtomicU64>,
    active: tokio::sync::Mutex<Option<ActiveStream>>,
}

impl<T: StreamTransport + 'static> StreamConnection<T> {
    pub fn new(transport: T, config: StreamConnectionConfig) -> Self {
        Self {
            transport: Arc::new(transport),
            config,
            dispatch: Arc::new(Mutex::new(None)),
            connected: Arc::new(AtomicBool::new(false)),
            last_message: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
            active: tokio::sync::Mutex::new(None),
        }
    }

    /// Registers the dispatch target, replacing any previous one. Messages
    /// arriving while no target is registered are dropped.
    pub fn subscribe(&self, dispatch: StreamDispatch) {
        let mut slot = self
            .dispatch
            .lock()
            .expect("stream connection dispatch lock poisoned");
        *slot = Some(dispatch);
    }

    /// Establishes exactly one stream bound to `tracked_id`. An existing
    /// stream is fully closed (task aborted and awaited) before the new one
    /// opens. Safe to call concurrently with itself or `disconnect`; the
    /// active-slot lock serializes callers.
    pub async fn connect(&self, tracked_id: TrackedId) -> StreamResult<()> {
        let mut active = self.active.lock().await;
        Self::close_active(&mut active, &self.connected).await;

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let source = self.transport.open(&tracked_id).await?;
        self.connected.store(true, Ordering::SeqCst);

        let task = tokio::spawn(run_stream(
            source,
            tracked_id.clone(),
            Arc::clone(&self.transport),
            self.config,
            Arc::clone(&self.dispatch),
            Arc::clone(&self.connected),
            Arc::clone(&self.last_message),
            Arc::clone(&self.generation),
            generation,
        ));
        *active = Some(ActiveStream { tracked_id, task });
        Ok(())
    }

    /// Closes the stream and guarantees zero further dispatch invocations
    /// after returning. No-op when already disconnected.
    pub async fn disconnect(&self) {
        let mut active = self.active.lock().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        Self::close_active(&mut active, &self.connected).await;
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn last_message(&self) -> Option<StreamEnvelope> {
        self.last_message
            .lock()
            .expect("stream connection last message lock poisoned")
            .clone()
    }

    pub async fn tracked_id(&self) -> Option<TrackedId> {
        let active = self.active.lock().await;
        active.as_ref().map(|stream| stream.tracked_id.clone())
    }

    async fn close_active(active: &mut Option<ActiveStream>, connected: &AtomicBool) {
        if let Some(stream) = active.take() {
            stream.task.abort();
            let _ = stream.task.await;
        }
        connected.store(false, Ordering::SeqCst);
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_stream<T: StreamTransport>(
    mut source: BoxedStreamSource,
    tracked_id: TrackedId,
    transport: Arc<T>,
    config: StreamConnectionConfig,
    dispatch: Arc<Mutex<Option<StreamDispatch>>>,
    connected: Arc<AtomicBool>,
    last_message: Arc<Mutex<Option<StreamEnvelope>>>,
    generation: Arc<AtomicU64>,
    my_generation: u64,
) {
    loop {
        match source.next_message().await {
            Ok(Some(envelope)) => {
                {
                    let mut last = last_message
                        .lock()
                        .expect("stream connection last message lock poisoned");
                    *last = Some(envelope.clone());
                }
                let mut slot = dispatch
                    .lock()
                    .expect("stream connection dispatch lock poisoned");
                if let Some(target) = slot.as_mut() {
                    target(envelope);
                }
            }
            Ok(None) => {
                // Clean end of stream: the server closed the channel. No
                // reconnection; the resource is done sending.
                break;
            }
            Err(error) => {
                tracing::warn!(
                    tracked_id = tracked_id.as_str(),
                    error = %error,
                    "stream read failed"
                );
                connected.store(false, Ordering::SeqCst);
                match reopen(
                    &tracked_id,
                    transport.as_ref(),
                    config,
                    &generation,
                    my_generation,
                )
                .await
                {
                    Some(new_source) => {
                        source = new_source;
                        connected.store(true, Ordering::SeqCst);
                    }
                    None => break,
                }
            }
        }
    }
    connected.store(false, Ordering::SeqCst);
}

/// Bounded reattempts with a fixed delay. Messages lost while disconnected
/// are not replayed; the stream resumes at whatever the server sends next.
async fn reopen<T: StreamTransport>(
    tracked_id: &TrackedId,
    transport: &T,
    config: StreamConnectionConfig,
    generation: &AtomicU64,
    my_generation: u64,
) -> Option<BoxedStreamSource> {
    for attempt in 1..=config.reconnect_attempts {
        tokio::time::sleep(config.reconnect_delay).await;
        if generation.load(Ordering::SeqCst) != my_generation {
            return None;
        }
        match transport.open(tracked_id).await {
            Ok(source) => {
                tracing::debug!(
                    tracked_id = tracked_id.as_str(),
                    attempt,
                    "stream reconnected"
                );
                return Some(source);
            }
            Err(error) => {
                tracing::warn!(
                    tracked_id = tracked_id.as_str(),
                    attempt,
                    error = %error,
                    "stream reconnect attempt failed"
                );
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use redcell_protocol::{StreamEnvelope, StreamError, StreamResult, TrackedId};

    use super::{StreamConnection, StreamConnectionConfig};
    use crate::transport::{BoxedStreamSource, StreamSource, StreamTransport};

    const TEST_TIMEOUT: Duration = Duration::from_secs(3);

    enum SourceStep {
        Message(StreamEnvelope),
        Fail(&'static str),
        Park,
    }

    struct ScriptedSource {
        steps: VecDeque<SourceStep>,
    }

    #[async_trait]
    impl StreamSource for ScriptedSource {
        async fn next_message(&mut self) -> StreamResult<Option<StreamEnvelope>> {
            match self.steps.pop_front() {
                Some(SourceStep::Message(envelope)) => Ok(Some(envelope)),
                Some(SourceStep::Fail(reason)) => {
                    Err(StreamError::Transport(reason.to_owned()))
                }
                Some(SourceStep::Park) => {
                    futures_util::future::pending::<()>().await;
                    unreachable!("parked source never resumes")
                }
                None => Ok(None),
            }
        }
    }

    #[derive(Default)]
    struct ScriptedTransport {
        scripts: Mutex<VecDeque<Vec<SourceStep>>>,
        opens: AtomicUsize,
    }

    impl ScriptedTransport {
        fn with_scripts(scripts: Vec<Vec<SourceStep>>) -> Self {
            Self {
                scripts: Mutex::new(scripts.into_iter().collect()),
                opens: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl StreamTransport for Arc<ScriptedTransport> {
        async fn open(&self, _tracked_id: &TrackedId) -> StreamResult<BoxedStreamSource> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            let script = self
                .scripts
                .lock()
                .expect("scripted transport lock")
                .pop_front();
            match script {
                Some(steps) => Ok(Box::new(ScriptedSource {
                    steps: steps.into_iter().collect(),
                })),
                None => Err(StreamError::Transport("no more scripts".to_owned())),
            }
        }
    }

    fn tagged(tag: &str) -> StreamEnvelope {
        StreamEnvelope::new(tag)
    }

    fn collecting_dispatch(seen: &Arc<Mutex<Vec<String>>>) -> super::StreamDispatch {
        let seen = Arc::clone(seen);
        Box::new(move |envelope| {
            seen.lock().expect("seen lock").push(envelope.tag);
        })
    }

    async fn wait_for_count(seen: &Arc<Mutex<Vec<String>>>, count: usize) {
        tokio::time::timeout(TEST_TIMEOUT, async {
            loop {
                if seen.lock().expect("seen lock").len() >= count {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("expected message count before timeout");
    }

    async fn wait_until_disconnected<T: StreamTransport + 'static>(
        connection: &StreamConnection<T>,
    ) {
        tokio::time::timeout(TEST_TIMEOUT, async {
            loop {
                if !connection.is_connected() {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("expected disconnect before timeout");
    }

    fn no_reconnect() -> StreamConnectionConfig {
        StreamConnectionConfig {
            reconnect_attempts: 0,
            reconnect_delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn dispatch_preserves_arrival_order() {
        let transport = Arc::new(ScriptedTransport::with_scripts(vec![vec![
            SourceStep::Message(tagged("first")),
            SourceStep::Message(tagged("second")),
            SourceStep::Message(tagged("third")),
        ]]));
        let connection = StreamConnection::new(Arc::clone(&transport), no_reconnect());
        let seen = Arc::new(Mutex::new(Vec::new()));
        connection.subscribe(collecting_dispatch(&seen));

        connection
            .connect(TrackedId::new("sess-1"))
            .await
            .expect("connect");
        wait_for_count(&seen, 3).await;
        wait_until_disconnected(&connection).await;

        assert_eq!(
            *seen.lock().expect("seen lock"),
            vec!["first", "second", "third"]
        );
        assert_eq!(
            connection.last_message().map(|envelope| envelope.tag),
            Some("third".to_owned())
        );
    }

    #[tokio::test]
    async fn disconnect_stops_dispatch_and_is_idempotent() {
        let transport = Arc::new(ScriptedTransport::with_scripts(vec![vec![
            SourceStep::Message(tagged("only")),
            SourceStep::Park,
        ]]));
        let connection = StreamConnection::new(Arc::clone(&transport), no_reconnect());
        let seen = Arc::new(Mutex::new(Vec::new()));
        connection.subscribe(collecting_dispatch(&seen));

        connection
            .connect(TrackedId::new("sess-1"))
            .await
            .expect("connect");
        wait_for_count(&seen, 1).await;
        assert!(connection.is_connected());

        connection.disconnect().await;
        assert!(!connection.is_connected());
        connection.disconnect().await;

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(seen.lock().expect("seen lock").len(), 1);
    }

    #[tokio::test]
    async fn connect_fully_replaces_previous_stream() {
        let transport = Arc::new(ScriptedTransport::with_scripts(vec![
            vec![SourceStep::Message(tagged("from-a")), SourceStep::Park],
            vec![SourceStep::Message(tagged("from-b"))],
        ]));
        let connection = StreamConnection::new(Arc::clone(&transport), no_reconnect());
        let seen = Arc::new(Mutex::new(Vec::new()));
        connection.subscribe(collecting_dispatch(&seen));

        connection
            .connect(TrackedId::new("sess-a"))
            .await
            .expect("connect a");
        wait_for_count(&seen, 1).await;

        connection
            .connect(TrackedId::new("sess-b"))
            .await
            .expect("connect b");
        wait_for_count(&seen, 2).await;
        wait_until_disconnected(&connection).await;

        assert_eq!(
            *seen.lock().expect("seen lock"),
            vec!["from-a", "from-b"]
        );
        assert_eq!(transport.opens.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn reconnects_after_transport_failure_without_replay() {
        let transport = Arc::new(ScriptedTransport::with_scripts(vec![
            vec![
                SourceStep::Message(tagged("before-drop")),
                SourceStep::Fail("connection reset"),
            ],
            vec![SourceStep::Message(tagged("after-drop"))],
        ]));
        let connection = StreamConnection::new(
            Arc::clone(&transport),
            StreamConnectionConfig {
                reconnect_attempts: 2,
                reconnect_delay: Duration::from_millis(10),
            },
        );
        let seen = Arc::new(Mutex::new(Vec::new()));
        connection.subscribe(collecting_dispatch(&seen));

        connection
            .connect(TrackedId::new("sess-1"))
            .await
            .expect("connect");
        wait_for_count(&seen, 2).await;
        wait_until_disconnected(&connection).await;

        assert_eq!(
            *seen.lock().expect("seen lock"),
            vec!["before-drop", "after-drop"]
        );
        assert_eq!(transport.opens.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn exhausted_reconnect_attempts_leave_connection_parked() {
        let transport = Arc::new(ScriptedTransport::with_scripts(vec![vec![
            SourceStep::Fail("connection reset"),
        ]]));
        let connection = StreamConnection::new(
            Arc::clone(&transport),
            StreamConnectionConfig {
                reconnect_attempts: 2,
                reconnect_delay: Duration::from_millis(5),
            },
        );
        let seen = Arc::new(Mutex::new(Vec::new()));
        connection.subscribe(collecting_dispatch(&seen));

        connection
            .connect(TrackedId::new("sess-1"))
            .await
            .expect("connect");
        wait_until_disconnected(&connection).await;

        tokio::time::timeout(TEST_TIMEOUT, async {
            while transport.opens.load(Ordering::SeqCst) < 3 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("expected reconnect attempts before timeout");

        assert!(seen.lock().expect("seen lock").is_empty());
        assert!(!connection.is_connected());
    }

    #[tokio::test]
    async fn connect_propagates_immediate_open_failure() {
        let transport = Arc::new(ScriptedTransport::with_scripts(vec![]));
        let connection = StreamConnection::new(Arc::clone(&transport), no_reconnect());

        let result = connection.connect(TrackedId::new("sess-1")).await;
        assert!(result.is_err());
        assert!(!connection.is_connected());
    }

    #[tokio::test]
    async fn disconnect_before_any_connect_is_a_noop() {
        let transport = Arc::new(ScriptedTransport::default());
        let connection = StreamConnection::new(Arc::clone(&transport), no_reconnect());

        connection.disconnect().await;
        assert!(!connection.is_connected());
        assert_eq!(connection.last_message(), None);
        assert_eq!(connection.tracked_id().await, None);
    }
}
