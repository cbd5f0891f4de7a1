use serde::{Deserialize, Serialize};

use crate::envelope::StreamEnvelope;

/// A finalized adversarial conversation turn as delivered by the server in a
/// `turn_complete` payload. This record is authoritative; client-side partial
/// accumulation never overrides it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackTurn {
    pub turn_number: u32,
    #[serde(default)]
    pub objective: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub attack_prompt: String,
    #[serde(default)]
    pub attack_reasoning: Option<String>,
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub is_baseline: bool,
    #[serde(default)]
    pub target_response: String,
    #[serde(default)]
    pub raw_response: Option<String>,
    #[serde(default)]
    pub target_blocked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnStartedMessage {
    pub turn_number: u32,
    pub objective: Option<String>,
    pub mode: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttackGeneratedMessage {
    pub attack_prompt: Option<String>,
    pub attack_reasoning: Option<String>,
    pub strategy: Option<String>,
    pub is_baseline: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TargetRespondedMessage {
    pub target_response: Option<String>,
    pub raw_response: Option<String>,
    pub target_blocked: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnCompletedMessage {
    pub turn: Option<AttackTurn>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttackStreamMessage {
    TurnStarted(TurnStartedMessage),
    AttackGenerated(AttackGeneratedMessage),
    TargetResponded(TargetRespondedMessage),
    TurnCompleted(TurnCompletedMessage),
    SessionCompleted,
}

#[derive(Debug, Default, Deserialize)]
struct AttackStreamFields {
    #[serde(default)]
    objective: Option<String>,
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    attack_prompt: Option<String>,
    #[serde(default)]
    attack_reasoning: Option<String>,
    #[serde(default)]
    strategy: Option<String>,
    #[serde(default)]
    is_baseline: Option<bool>,
    #[serde(default)]
    target_response: Option<String>,
    #[serde(default)]
    raw_response: Option<String>,
    #[serde(default)]
    target_blocked: Option<bool>,
    #[serde(default)]
    turn: Option<AttackTurn>,
}

/// Decodes an envelope into a typed attack-session message. Unknown tags
/// decode to `None` and must be dropped without touching reducer state.
pub fn decode_attack_message(envelope: &StreamEnvelope) -> Option<AttackStreamMessage> {
    let fields: AttackStreamFields = envelope.data_fields();
    match envelope.normalized_tag().as_str() {
        "turn_start" => Some(AttackStreamMessage::TurnStarted(TurnStartedMessage {
            turn_number: envelope.turn_number.unwrap_or(0),
            objective: fields.objective,
            mode: fields.mode,
        })),
        "attack_generated" => Some(AttackStreamMessage::AttackGenerated(AttackGeneratedMessage {
            attack_prompt: fields.attack_prompt,
            attack_reasoning: fields.attack_reasoning,
            strategy: fields.strategy,
            is_baseline: fields.is_baseline,
        })),
        "target_responded" => Some(AttackStreamMessage::TargetResponded(TargetRespondedMessage {
            target_response: fields.target_response,
            raw_response: fields.raw_response,
            target_blocked: fields.target_blocked,
        })),
        "turn_complete" => Some(AttackStreamMessage::TurnCompleted(TurnCompletedMessage {
            turn: fields.turn,
        })),
        "session_complete" => Some(AttackStreamMessage::SessionCompleted),
        _ => None,
    }
}
