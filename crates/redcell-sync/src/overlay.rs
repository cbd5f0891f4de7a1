/// Ephemeral push overlay over the pull snapshot for one tracked resource.
///
/// While the push stream is live, its snapshot is preferred over whatever the
/// poller last fetched: a slow poll response must never clobber a newer
/// push-delivered update. A terminal push event clears the overlay and hands
/// authority back to the pull layer (the bridge invalidates the pull key at
/// the same moment).
#[derive(Debug, Clone, PartialEq)]
pub struct PushOverlay<S> {
    push: Option<S>,
    terminal_seen: bool,
}

impl<S> Default for PushOverlay<S> {
    fn default() -> Self {
        Self {
            push: None,
            terminal_seen: false,
        }
    }
}

impl<S> PushOverlay<S> {
    /// Records the latest push snapshot. After a terminal event the overlay
    /// stays cleared; late push frames for a finished resource are ignored.
    pub fn apply_push(&mut self, snapshot: S) {
        if !self.terminal_seen {
            self.push = Some(snapshot);
        }
    }

    pub fn mark_terminal(&mut self) {
        self.terminal_seen = true;
        self.push = None;
    }

    /// Back to the initial state; call alongside a fresh `connect`.
    pub fn reset(&mut self) {
        self.push = None;
        self.terminal_seen = false;
    }

    /// The value the view should render: push overlay when present, pull
    /// snapshot otherwise.
    pub fn resolve<'a>(&'a self, pull: Option<&'a S>) -> Option<&'a S> {
        match self.push.as_ref() {
            Some(push) => Some(push),
            None => pull,
        }
    }

    pub fn is_pull_authoritative(&self) -> bool {
        self.push.is_none()
    }
}
