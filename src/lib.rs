#![forbid(unsafe_code)]

pub mod affect;
pub mod anim;
pub mod anim_ease;
pub mod channel;
pub mod chat;
pub mod client;
pub mod core;
pub mod driver;
pub mod error;
pub mod model;
pub mod presets;
pub mod render;

pub use affect::{Affect, interpolate_expression};
pub use anim::{ExpressionAnimator, Tick};
pub use anim_ease::Ease;
pub use channel::{
    BufferedSink, ChannelSink, ClientEvent, EventInbox, SaveCapture, ServerEvent,
};
pub use chat::{ChatMessage, ChatRole, ChatTranscript};
pub use client::{ClientConfig, FaceClient, Notice};
pub use self::core::{Canvas, DurationMs, TimestampMs};
pub use driver::FrameDriver;
pub use error::{VisageError, VisageResult};
pub use model::FaceParams;
pub use presets::{CaptureSession, EmotionLabel, generate_subject_id};
pub use render::{FaceRenderer, FaceScene, ScenePainter};
