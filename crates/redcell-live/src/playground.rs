use redcell_protocol::playground::{
    decode_playground_message, PlaygroundStreamMessage, ProcessingPhase,
};
use redcell_protocol::StreamEnvelope;

use crate::state::LiveState;

/// Live view of one interactive playground session. Updates merge only the
/// fields present in the payload; a payload that omits `target_response`
/// leaves the previous value in place. This is deliberately asymmetric with
/// the other two domains' overwrite style.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaygroundLiveState {
    pub phase: Option<ProcessingPhase>,
    pub target_response: Option<String>,
    pub target_blocked: bool,
}

impl LiveState for PlaygroundLiveState {
    type Message = PlaygroundStreamMessage;

    fn decode(envelope: &StreamEnvelope) -> Option<Self::Message> {
        decode_playground_message(envelope)
    }

    fn apply(&mut self, message: Self::Message) {
        match message {
            PlaygroundStreamMessage::ProcessingUpdate(update) => {
                if let Some(phase) = update.phase {
                    self.phase = Some(phase);
                }
                if let Some(target_response) = update.target_response {
                    self.target_response = Some(target_response);
                }
                if let Some(target_blocked) = update.target_blocked {
                    self.target_blocked = target_blocked;
                }
            }
            PlaygroundStreamMessage::ProcessingComplete => {
                self.phase = None;
                self.target_response = None;
                self.target_blocked = false;
            }
        }
    }
}
