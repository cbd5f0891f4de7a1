use redcell_protocol::turn::{
    decode_attack_message, AttackStreamMessage, AttackTurn, TurnStartedMessage,
};
use redcell_protocol::StreamEnvelope;

use crate::state::LiveState;

/// A turn still being assembled from incremental messages. Discarded
/// unconditionally when a new turn starts; never promoted into the finalized
/// list by the client (only a `turn_complete` payload is).
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTurn {
    pub turn_number: u32,
    pub objective: Option<String>,
    pub mode: Option<String>,
    pub attack_prompt: Option<String>,
    pub attack_reasoning: Option<String>,
    pub strategy: Option<String>,
    pub is_baseline: Option<bool>,
    pub target_response: Option<String>,
    pub raw_response: Option<String>,
    pub target_blocked: Option<bool>,
}

impl PendingTurn {
    fn started(message: TurnStartedMessage) -> Self {
        Self {
            turn_number: message.turn_number,
            objective: message.objective,
            mode: message.mode,
            attack_prompt: None,
            attack_reasoning: None,
            strategy: None,
            is_baseline: None,
            target_response: None,
            raw_response: None,
            target_blocked: None,
        }
    }
}

/// Live view of one adversarial conversation session. Finalized turns are
/// append-only in arrival order of their completion messages, which is not
/// necessarily turn-number order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttackLiveState {
    pub pending_turn: Option<PendingTurn>,
    pub live_turns: Vec<AttackTurn>,
}

impl LiveState for AttackLiveState {
    type Message = AttackStreamMessage;

    fn decode(envelope: &StreamEnvelope) -> Option<Self::Message> {
        decode_attack_message(envelope)
    }

    fn apply(&mut self, message: Self::Message) {
        match message {
            AttackStreamMessage::TurnStarted(started) => {
                self.pending_turn = Some(PendingTurn::started(started));
            }
            AttackStreamMessage::AttackGenerated(generated) => {
                // No pending turn means the message is stale or duplicated;
                // drop it silently.
                if let Some(pending) = self.pending_turn.as_mut() {
                    pending.attack_prompt = generated.attack_prompt;
                    pending.attack_reasoning = generated.attack_reasoning;
                    pending.strategy = generated.strategy;
                    pending.is_baseline = generated.is_baseline;
                }
            }
            AttackStreamMessage::TargetResponded(responded) => {
                if let Some(pending) = self.pending_turn.as_mut() {
                    pending.target_response = responded.target_response;
                    pending.raw_response = responded.raw_response;
                    pending.target_blocked = responded.target_blocked;
                }
            }
            AttackStreamMessage::TurnCompleted(completed) => {
                // The finalized payload is authoritative; whatever the pending
                // turn accumulated is discarded without reconciliation.
                if let Some(turn) = completed.turn {
                    self.live_turns.push(turn);
                }
                self.pending_turn = None;
            }
            AttackStreamMessage::SessionCompleted => {
                self.pending_turn = None;
            }
        }
    }
}
