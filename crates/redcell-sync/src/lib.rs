//! Push/pull cache synchronization for redcell live views.
//!
//! The push stream carries fresher truth while a resource is active; the pull
//! layer carries canonical truth once it is terminal. This crate owns the
//! handoff between the two.

pub mod bridge;
pub mod cache;
pub mod error;
pub mod overlay;
pub mod poll;
pub mod pull;

pub use bridge::{invalidation_targets, MutationKind, SyncBridge};
pub use cache::{PullCache, SharedPullCache};
pub use error::{SyncError, SyncResult};
pub use overlay::PushOverlay;
pub use poll::{
    poll_interval, PollCadence, PollDriver, TrackedActivity, DEFAULT_ACTIVE_POLL_INTERVAL,
};
pub use pull::{CacheInvalidator, CacheKey, HttpPullSource, PullPage, PullSource};
