//! Shared wire protocol for the redcell live reconciliation layer.
//!
//! One envelope shape covers all three push domains; each domain owns its own
//! decoder so the recognized tag sets stay independent.

pub mod envelope;
pub mod error;
pub mod ids;
pub mod playground;
pub mod tuning;
pub mod turn;

pub use envelope::StreamEnvelope;
pub use error::{StreamError, StreamResult};
pub use ids::{AttackSessionId, ExperimentId, PlaygroundSessionId, TrackedId, TuningJobId};
pub use playground::{
    decode_playground_message, PlaygroundStreamMessage, ProcessingPhase, ProcessingUpdateMessage,
};
pub use tuning::{
    decode_tuning_message, TuningLogEntry, TuningStatus, TuningStreamMessage,
    DEFAULT_LOG_LEVEL, FALLBACK_FAILURE_MESSAGE,
};
pub use turn::{
    decode_attack_message, AttackGeneratedMessage, AttackStreamMessage, AttackTurn,
    TargetRespondedMessage, TurnCompletedMessage, TurnStartedMessage,
};
