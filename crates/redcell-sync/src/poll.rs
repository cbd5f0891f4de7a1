use std::sync::Arc;
use std::time::Duration;

use redcell_protocol::tuning::TuningStatus;
use tokio::task::JoinHandle;

use crate::cache::SharedPullCache;
use crate::pull::{CacheKey, PullSource};

pub const DEFAULT_ACTIVE_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Whether the tracked resource still warrants polling. Terminal resources
/// stop the cadence entirely; staleness after that is the next view's
/// problem, not a timer's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackedActivity {
    Active,
    Terminal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollCadence {
    pub active_interval: Duration,
}

impl Default for PollCadence {
    fn default() -> Self {
        Self {
            active_interval: DEFAULT_ACTIVE_POLL_INTERVAL,
        }
    }
}

pub fn poll_interval(activity: TrackedActivity, cadence: PollCadence) -> Option<Duration> {
    match activity {
        TrackedActivity::Active => Some(cadence.active_interval),
        TrackedActivity::Terminal => None,
    }
}

impl From<TuningStatus> for TrackedActivity {
    fn from(status: TuningStatus) -> Self {
        if status.is_terminal() {
            Self::Terminal
        } else {
            Self::Active
        }
    }
}

/// Background refetch loop for one tracked record. Lands results in the pull
/// cache and parks itself once the record classifies as terminal. Fetch
/// failures keep the cadence; the pull layer owns its own error channel and
/// a failed poll never corrupts the cache.
pub struct PollDriver {
    task: JoinHandle<()>,
}

impl PollDriver {
    pub fn spawn<R, P, F>(
        source: Arc<P>,
        cache: SharedPullCache<R>,
        channel: String,
        id: String,
        cadence: PollCadence,
        classify: F,
    ) -> Self
    where
        R: Send + 'static,
        P: PullSource<R> + 'static,
        F: Fn(&R) -> TrackedActivity + Send + 'static,
    {
        let task = tokio::spawn(async move {
            loop {
                let interval = match source.get_by_id(&id).await {
                    Ok(record) => {
                        let activity = classify(&record);
                        cache.insert(CacheKey::record(channel.as_str(), id.as_str()), record);
                        poll_interval(activity, cadence)
                    }
                    Err(error) => {
                        tracing::warn!(
                            channel = channel.as_str(),
                            id = id.as_str(),
                            error = %error,
                            "poll fetch failed"
                        );
                        Some(cadence.active_interval)
                    }
                };
                match interval {
                    Some(interval) => tokio::time::sleep(interval).await,
                    None => break,
                }
            }
        });
        Self { task }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn stop(&self) {
        self.task.abort();
    }
}
