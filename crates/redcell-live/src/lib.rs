//! Live stores for the redcell dashboard.
//!
//! One generic store drives three domain reducers; each reducer keeps its own
//! transition semantics from the wire protocol.

pub mod playground;
pub mod state;
pub mod store;
pub mod tuning;
pub mod turn;

pub use playground::PlaygroundLiveState;
pub use state::LiveState;
pub use store::{AttackLiveStore, LiveStore, PlaygroundLiveStore, TuningLiveStore};
pub use tuning::{TuningLiveState, COMPLETE_STEP_LABEL};
pub use turn::{AttackLiveState, PendingTurn};
