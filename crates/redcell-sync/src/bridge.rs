use crate::pull::{CacheInvalidator, CacheKey};

/// Server-state mutations that must be followed by pull invalidation on
/// success, so the next render reflects server truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Start,
    Cancel,
    Delete,
}

/// Keys to invalidate after a successful mutation or a terminal push event:
/// the record itself plus its parent collection, when one is in scope.
pub fn invalidation_targets(channel: &str, id: &str, parent: Option<&str>) -> Vec<CacheKey> {
    let mut targets = vec![CacheKey::record(channel, id)];
    if let Some(parent) = parent {
        targets.push(CacheKey::collection(channel, parent));
    }
    targets
}

/// Connects push-observed truth to the pull cache. Mutations and terminal
/// push events both route through here; the push layer itself never touches
/// pull state directly.
pub struct SyncBridge<I: CacheInvalidator> {
    invalidator: I,
}

impl<I: CacheInvalidator> SyncBridge<I> {
    pub fn new(invalidator: I) -> Self {
        Self { invalidator }
    }

    /// Call after a mutating operation reports success through the pull
    /// layer's own error channel. Failed mutations invalidate nothing.
    pub fn on_mutation_succeeded(
        &self,
        kind: MutationKind,
        channel: &str,
        id: &str,
        parent: Option<&str>,
    ) {
        for key in invalidation_targets(channel, id, parent) {
            tracing::debug!(%key, ?kind, "invalidating after mutation");
            self.invalidator.invalidate(&key);
        }
    }

    /// Call when the push stream delivers a terminal event for the tracked
    /// resource. From this point the pull layer is authoritative again; the
    /// caller clears its push overlay alongside.
    pub fn on_terminal_event(&self, channel: &str, id: &str, parent: Option<&str>) {
        for key in invalidation_targets(channel, id, parent) {
            tracing::debug!(%key, "invalidating after terminal push event");
            self.invalidator.invalidate(&key);
        }
    }

    pub fn invalidator(&self) -> &I {
        &self.invalidator
    }
}
