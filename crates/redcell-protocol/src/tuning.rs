use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::envelope::StreamEnvelope;

pub const FALLBACK_FAILURE_MESSAGE: &str = "fine-tuning job failed";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TuningStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl TuningStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    pub fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Running)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningLogEntry {
    pub level: String,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TuningStreamMessage {
    Started,
    Progress {
        progress_pct: f32,
        current_step: Option<String>,
    },
    Log(TuningLogEntry),
    Completed {
        output_model: Option<String>,
        duration_s: Option<f64>,
    },
    Failed {
        error: String,
    },
    Cancelled,
}

#[derive(Debug, Default, Deserialize)]
struct TuningStreamFields {
    #[serde(default)]
    progress_pct: Option<f32>,
    #[serde(default)]
    current_step: Option<String>,
    #[serde(default)]
    level: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    timestamp: Option<OffsetDateTime>,
    #[serde(default)]
    output_model: Option<String>,
    #[serde(default)]
    duration_s: Option<f64>,
    #[serde(default)]
    error: Option<String>,
}

/// Decodes an envelope into a typed fine-tuning message, resolving missing
/// optional fields to their documented defaults (0, `"info"`, now, fallback
/// failure text). Unknown tags decode to `None`.
pub fn decode_tuning_message(envelope: &StreamEnvelope) -> Option<TuningStreamMessage> {
    let fields: TuningStreamFields = envelope.data_fields();
    match envelope.normalized_tag().as_str() {
        "started" => Some(TuningStreamMessage::Started),
        "progress" => Some(TuningStreamMessage::Progress {
            progress_pct: fields.progress_pct.unwrap_or(0.0),
            current_step: fields.current_step,
        }),
        "log" => Some(TuningStreamMessage::Log(TuningLogEntry {
            level: fields.level.unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned()),
            message: fields.message.unwrap_or_default(),
            timestamp: fields.timestamp.unwrap_or_else(OffsetDateTime::now_utc),
        })),
        "completed" => Some(TuningStreamMessage::Completed {
            output_model: fields.output_model,
            duration_s: fields.duration_s,
        }),
        "failed" => Some(TuningStreamMessage::Failed {
            error: fields
                .error
                .unwrap_or_else(|| FALLBACK_FAILURE_MESSAGE.to_owned()),
        }),
        "cancelled" => Some(TuningStreamMessage::Cancelled),
        _ => None,
    }
}
