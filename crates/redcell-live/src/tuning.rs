use redcell_protocol::tuning::{
    decode_tuning_message, TuningLogEntry, TuningStatus, TuningStreamMessage,
};
use redcell_protocol::StreamEnvelope;

use crate::state::LiveState;

pub const COMPLETE_STEP_LABEL: &str = "Complete";

/// Live view of one fine-tuning job. Progress is last-write-wins and not
/// monotonic: a later update may legally report a smaller percentage than an
/// earlier one. Logs are append-only, never truncated or deduplicated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TuningLiveState {
    pub status: Option<TuningStatus>,
    pub progress_pct: f32,
    pub current_step: Option<String>,
    pub error: Option<String>,
    pub output_model: Option<String>,
    pub duration_s: Option<f64>,
    pub logs: Vec<TuningLogEntry>,
}

impl TuningLiveState {
    pub fn is_terminal(&self) -> bool {
        self.status.is_some_and(TuningStatus::is_terminal)
    }
}

impl LiveState for TuningLiveState {
    type Message = TuningStreamMessage;

    fn decode(envelope: &StreamEnvelope) -> Option<Self::Message> {
        decode_tuning_message(envelope)
    }

    fn apply(&mut self, message: Self::Message) {
        match message {
            TuningStreamMessage::Started => {
                self.status = Some(TuningStatus::Running);
                self.progress_pct = 0.0;
                self.error = None;
            }
            TuningStreamMessage::Progress {
                progress_pct,
                current_step,
            } => {
                self.progress_pct = progress_pct;
                self.current_step = current_step;
            }
            TuningStreamMessage::Log(entry) => {
                self.logs.push(entry);
            }
            TuningStreamMessage::Completed {
                output_model,
                duration_s,
            } => {
                self.status = Some(TuningStatus::Completed);
                self.progress_pct = 100.0;
                self.current_step = Some(COMPLETE_STEP_LABEL.to_owned());
                self.output_model = output_model;
                self.duration_s = duration_s;
            }
            TuningStreamMessage::Failed { error } => {
                self.status = Some(TuningStatus::Failed);
                self.error = Some(error);
            }
            TuningStreamMessage::Cancelled => {
                self.status = Some(TuningStatus::Cancelled);
            }
        }
    }
}
