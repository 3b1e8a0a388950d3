//! The wire contract toward the remote inference service and the queue
//! boundary between the transport and the animation controller.
//!
//! Connection management belongs to the host transport. It decodes
//! incoming frames into [`ServerEvent`]s, pushes them into the
//! [`EventInbox`], and implements [`ChannelSink`] for the outgoing
//! direction; the controller drains the inbox on its own schedule so
//! all animation state keeps a single writer.

use std::collections::VecDeque;

use crate::{
    error::{VisageError, VisageResult},
    model::FaceParams,
    presets::EmotionLabel,
};

/// Events pushed by the service, in arrival order.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A new (possibly partial) expression target.
    UpdateExpression(FaceParams),
    /// A fragment of the in-progress assistant reply.
    ChatStreamChunk { text: String },
    /// End of the assistant reply; carries the authoritative full text.
    #[serde(rename_all = "camelCase")]
    ChatStreamEnd { full_text: String },
    /// Outcome of a capture save.
    SaveResult { success: bool, message: String },
    /// Server-side failure surfaced to the user.
    Error { message: String },
}

impl ServerEvent {
    pub fn from_json(json: &str) -> VisageResult<Self> {
        // A frame that does not decode is a broken wire contract, not a
        // local serialization failure.
        serde_json::from_str(json).map_err(|e| VisageError::channel(e.to_string()))
    }

    pub fn to_json(&self) -> VisageResult<String> {
        serde_json::to_string(self).map_err(|e| VisageError::serde(e.to_string()))
    }
}

/// Snapshot of the current parameter set tagged with capture metadata;
/// serializes as one flat object (the capture storage row).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCapture {
    pub subject_id: String,
    pub timestamp: String,
    pub emotion_label: EmotionLabel,
    pub animation_duration_seconds: f64,
    #[serde(flatten)]
    pub params: FaceParams,
}

/// Events the client emits toward the service.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// One outgoing chat message per send action.
    UserMessage { content: String },
    /// Explicit save of the current pose.
    SaveCapture(SaveCapture),
    /// Manual/debug trigger asking the service to compute and push back
    /// an expression for an affect coordinate.
    ManualExpressionRequest { valence: f64, arousal: f64 },
}

impl ClientEvent {
    pub fn to_json(&self) -> VisageResult<String> {
        serde_json::to_string(self).map_err(|e| VisageError::serde(e.to_string()))
    }
}

/// Outgoing event consumer implemented by the host transport.
pub trait ChannelSink {
    fn send(&mut self, event: ClientEvent) -> VisageResult<()>;
}

/// A [`ChannelSink`] that buffers events in memory. Used by tests and
/// by hosts that flush on their own cadence.
#[derive(Debug, Default)]
pub struct BufferedSink {
    sent: Vec<ClientEvent>,
}

impl BufferedSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> &[ClientEvent] {
        &self.sent
    }

    pub fn drain(&mut self) -> Vec<ClientEvent> {
        std::mem::take(&mut self.sent)
    }
}

impl ChannelSink for BufferedSink {
    fn send(&mut self, event: ClientEvent) -> VisageResult<()> {
        self.sent.push(event);
        Ok(())
    }
}

pub const DEFAULT_INBOX_CAPACITY: usize = 256;

/// Bounded FIFO the transport handler pushes server events into.
///
/// Overflow drops the oldest event: for expression updates the newest
/// target supersedes anything older anyway, and a transcript gap is
/// preferable to unbounded growth during a stall.
#[derive(Debug)]
pub struct EventInbox {
    queue: VecDeque<ServerEvent>,
    capacity: usize,
}

impl Default for EventInbox {
    fn default() -> Self {
        Self::new(DEFAULT_INBOX_CAPACITY)
    }
}

impl EventInbox {
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity.min(DEFAULT_INBOX_CAPACITY)),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, event: ServerEvent) {
        if self.queue.len() == self.capacity {
            let dropped = self.queue.pop_front();
            tracing::warn!(?dropped, "event inbox full, dropping oldest event");
        }
        self.queue.push_back(event);
    }

    pub fn pop(&mut self) -> Option<ServerEvent> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::keys;

    #[test]
    fn update_expression_wire_shape() {
        let json = r#"{"event":"update_expression","data":{"mouthCurve":0.5,"eyeOpenness":1.0}}"#;
        let event = ServerEvent::from_json(json).unwrap();
        let ServerEvent::UpdateExpression(params) = &event else {
            panic!("wrong variant: {event:?}");
        };
        assert_eq!(params.get(keys::MOUTH_CURVE), Some(0.5));
        assert_eq!(params.get(keys::EYE_OPENNESS), Some(1.0));
    }

    #[test]
    fn server_event_roundtrip() {
        let events = vec![
            ServerEvent::ChatStreamChunk {
                text: "hi".to_string(),
            },
            ServerEvent::ChatStreamEnd {
                full_text: "hi there".to_string(),
            },
            ServerEvent::SaveResult {
                success: true,
                message: "saved".to_string(),
            },
            ServerEvent::Error {
                message: "boom".to_string(),
            },
        ];
        for event in events {
            let json = event.to_json().unwrap();
            assert_eq!(ServerEvent::from_json(&json).unwrap(), event);
        }
    }

    #[test]
    fn stream_end_uses_camel_case_field() {
        let event = ServerEvent::ChatStreamEnd {
            full_text: "x".to_string(),
        };
        let json = event.to_json().unwrap();
        assert!(json.contains("\"fullText\""), "{json}");
    }

    #[test]
    fn malformed_event_is_a_channel_error() {
        let err = ServerEvent::from_json("{\"event\":\"nope\"}").unwrap_err();
        assert!(matches!(err, VisageError::Channel(_)), "{err}");
        assert!(err.to_string().contains("channel error:"));
    }

    #[test]
    fn save_capture_flattens_params() {
        let mut params = FaceParams::new();
        params.set(keys::MOUTH_CURVE, 0.5);
        params.set(keys::EYE_OPENNESS, 1.0);
        let capture = SaveCapture {
            subject_id: "abc".to_string(),
            timestamp: "2025-01-01 00:00:00".to_string(),
            emotion_label: EmotionLabel::Joy,
            animation_duration_seconds: 1.0,
            params,
        };
        let json = serde_json::to_value(&capture).unwrap();
        // One flat object: metadata and parameters side by side.
        assert_eq!(json["subjectId"], "abc");
        assert_eq!(json["emotionLabel"], "joy");
        assert_eq!(json["animationDurationSeconds"], 1.0);
        assert_eq!(json["mouthCurve"], 0.5);
        assert_eq!(json["eyeOpenness"], 1.0);
    }

    #[test]
    fn inbox_is_fifo() {
        let mut inbox = EventInbox::new(8);
        inbox.push(ServerEvent::ChatStreamChunk {
            text: "a".to_string(),
        });
        inbox.push(ServerEvent::ChatStreamChunk {
            text: "b".to_string(),
        });
        assert_eq!(
            inbox.pop(),
            Some(ServerEvent::ChatStreamChunk {
                text: "a".to_string()
            })
        );
        assert_eq!(
            inbox.pop(),
            Some(ServerEvent::ChatStreamChunk {
                text: "b".to_string()
            })
        );
        assert_eq!(inbox.pop(), None);
    }

    #[test]
    fn inbox_overflow_drops_oldest() {
        let mut inbox = EventInbox::new(2);
        for i in 0..3 {
            inbox.push(ServerEvent::ChatStreamChunk {
                text: i.to_string(),
            });
        }
        assert_eq!(inbox.len(), 2);
        assert_eq!(
            inbox.pop(),
            Some(ServerEvent::ChatStreamChunk {
                text: "1".to_string()
            })
        );
    }
}
