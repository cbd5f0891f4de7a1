use serde::{Deserialize, Serialize};

use crate::envelope::StreamEnvelope;

/// Processing phase of an interactive playground session. The server may grow
/// new phases; unknown strings land on `Other` instead of failing the decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingPhase {
    Thinking,
    GeneratingAttack,
    AwaitingTarget,
    Evaluating,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingUpdateMessage {
    pub phase: Option<ProcessingPhase>,
    pub target_response: Option<String>,
    pub target_blocked: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaygroundStreamMessage {
    ProcessingUpdate(ProcessingUpdateMessage),
    ProcessingComplete,
}

#[derive(Debug, Default, Deserialize)]
struct PlaygroundStreamFields {
    #[serde(default)]
    phase: Option<ProcessingPhase>,
    #[serde(default)]
    target_response: Option<String>,
    #[serde(default)]
    target_blocked: Option<bool>,
}

pub fn decode_playground_message(envelope: &StreamEnvelope) -> Option<PlaygroundStreamMessage> {
    let fields: PlaygroundStreamFields = envelope.data_fields();
    match envelope.normalized_tag().as_str() {
        "processing_update" => Some(PlaygroundStreamMessage::ProcessingUpdate(
            ProcessingUpdateMessage {
                phase: fields.phase,
                target_response: fields.target_response,
                target_blocked: fields.target_blocked,
            },
        )),
        "processing_complete" => Some(PlaygroundStreamMessage::ProcessingComplete),
        _ => None,
    }
}
