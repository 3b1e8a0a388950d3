use crate::{
    affect::{Affect, interpolate_expression},
    channel::{ChannelSink, ClientEvent, EventInbox, SaveCapture, ServerEvent},
    chat::ChatTranscript,
    core::{Canvas, DurationMs, TimestampMs},
    driver::FrameDriver,
    error::{VisageError, VisageResult},
    model::FaceParams,
    presets::{CaptureSession, EmotionLabel, generate_subject_id},
    render::FaceRenderer,
};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ClientConfig {
    pub canvas: Canvas,
    /// Duration used for server-pushed expression transitions; callers
    /// with a speed control pass their own value to `arm_toward`.
    pub default_duration_ms: f64,
    /// Keep the full chat history vs. only the in-flight exchange.
    pub retain_chat_history: bool,
    /// Redraw every frame even when idle.
    pub continuous_redraw: bool,
    pub inbox_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas {
                width: 540,
                height: 360,
            },
            default_duration_ms: 1000.0,
            retain_chat_history: true,
            continuous_redraw: false,
            inbox_capacity: crate::channel::DEFAULT_INBOX_CAPACITY,
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> VisageResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(VisageError::validation("canvas width/height must be > 0"));
        }
        if !self.default_duration_ms.is_finite() || self.default_duration_ms <= 0.0 {
            return Err(VisageError::validation("default_duration_ms must be > 0"));
        }
        if self.inbox_capacity == 0 {
            return Err(VisageError::validation("inbox_capacity must be > 0"));
        }
        Ok(())
    }
}

/// A user-visible notification produced while draining server events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    SaveResult { success: bool, message: String },
    ServerError { message: String },
}

/// The single-writer controller: owns the animator (via the frame
/// driver), the chat transcript, the capture session, and the pending
/// expression target. The transport pushes decoded events into the
/// inbox; everything else happens on the UI/animation context through
/// this type.
#[derive(Debug)]
pub struct FaceClient {
    config: ClientConfig,
    driver: FrameDriver,
    transcript: ChatTranscript,
    session: CaptureSession,
    subject_id: String,
    pending_target: FaceParams,
    inbox: EventInbox,
}

impl FaceClient {
    pub fn new(config: ClientConfig) -> VisageResult<Self> {
        config.validate()?;
        let driver = FrameDriver::new(
            FaceParams::default_pose(),
            config.canvas,
            config.continuous_redraw,
        );
        Ok(Self {
            driver,
            transcript: ChatTranscript::new(config.retain_chat_history),
            session: CaptureSession::new(),
            subject_id: generate_subject_id(),
            pending_target: FaceParams::default_pose(),
            inbox: EventInbox::new(config.inbox_capacity),
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn current_params(&self) -> &FaceParams {
        self.driver.animator().current()
    }

    pub fn transcript(&self) -> &ChatTranscript {
        &self.transcript
    }

    pub fn session(&self) -> &CaptureSession {
        &self.session
    }

    pub fn wants_frames(&self) -> bool {
        self.driver.wants_frames()
    }

    /// Entry point for the transport's receive handler.
    pub fn push_event(&mut self, event: ServerEvent) {
        self.inbox.push(event);
    }

    /// Applies every queued server event. Called from the same context
    /// that drives frames, so animation state keeps one writer. Returns
    /// the notifications the host UI should surface.
    #[tracing::instrument(skip(self), fields(queued = self.inbox.len()))]
    pub fn drain_inbox(&mut self, now: TimestampMs) -> Vec<Notice> {
        let mut notices = Vec::new();
        while let Some(event) = self.inbox.pop() {
            match event {
                ServerEvent::UpdateExpression(partial) => {
                    // Merge-then-arm: the newest push always wins, and
                    // a partial update rides on top of the last target.
                    self.pending_target.merge(&partial);
                    let duration = DurationMs::new(self.config.default_duration_ms);
                    self.arm_toward(self.pending_target.clone(), duration, now);
                }
                ServerEvent::ChatStreamChunk { text } => self.transcript.push_chunk(&text),
                ServerEvent::ChatStreamEnd { full_text } => self.transcript.end_stream(full_text),
                ServerEvent::SaveResult { success, message } => {
                    notices.push(Notice::SaveResult { success, message });
                }
                ServerEvent::Error { message } => {
                    tracing::warn!(%message, "server reported an error");
                    notices.push(Notice::ServerError { message });
                }
            }
        }
        notices
    }

    /// Arms an expression transition and wakes the render loop.
    pub fn arm_toward(&mut self, target: FaceParams, duration: DurationMs, now: TimestampMs) {
        self.driver.animator_mut().arm(target, duration, now);
        self.driver.notify_target_arrived();
    }

    /// The host's frame callback; returns whether to schedule another.
    pub fn on_frame(
        &mut self,
        now: TimestampMs,
        renderer: &mut dyn FaceRenderer,
    ) -> VisageResult<bool> {
        self.driver.on_frame(now, renderer)
    }

    /// Sends one chat message. Whitespace-only input is ignored.
    pub fn send_message(
        &mut self,
        content: &str,
        sink: &mut dyn ChannelSink,
    ) -> VisageResult<()> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(());
        }
        self.transcript.push_user(trimmed);
        sink.send(ClientEvent::UserMessage {
            content: trimmed.to_string(),
        })
    }

    /// Snapshots the current pose for the current emotion label, sends
    /// it, and advances the capture session. Returns the next label to
    /// pose, or `None` once every label is captured.
    pub fn save_capture(
        &mut self,
        timestamp: impl Into<String>,
        sink: &mut dyn ChannelSink,
    ) -> VisageResult<Option<EmotionLabel>> {
        let capture = SaveCapture {
            subject_id: self.subject_id.clone(),
            timestamp: timestamp.into(),
            emotion_label: self.session.current(),
            animation_duration_seconds: self.config.default_duration_ms / 1000.0,
            params: self.current_params().clone(),
        };
        sink.send(ClientEvent::SaveCapture(capture))?;
        Ok(self.session.mark_saved_and_advance())
    }

    /// Asks the service to compute and push back an expression for an
    /// affect coordinate (debug/manual trigger).
    pub fn request_expression(
        &mut self,
        affect: Affect,
        sink: &mut dyn ChannelSink,
    ) -> VisageResult<()> {
        sink.send(ClientEvent::ManualExpressionRequest {
            valence: affect.valence,
            arousal: affect.arousal,
        })
    }

    /// Locally computed version of the manual trigger: interpolates the
    /// expression on the client and animates toward it without a round
    /// trip.
    pub fn preview_expression(&mut self, affect: Affect, now: TimestampMs) {
        let target = interpolate_expression(affect);
        self.pending_target = target.clone();
        let duration = DurationMs::new(self.config.default_duration_ms);
        self.arm_toward(target, duration, now);
    }

    /// Animates toward an emotion preset and makes that label current
    /// for the next capture.
    pub fn set_emotion(&mut self, label: EmotionLabel, now: TimestampMs) {
        self.session.set_current(label);
        let target = label.preset();
        self.pending_target = target.clone();
        let duration = DurationMs::new(self.config.default_duration_ms);
        self.arm_toward(target, duration, now);
    }

    /// User-initiated reset: pins the default pose, discards any
    /// in-flight animation, and schedules one redraw.
    pub fn reset(&mut self) {
        self.pending_target = FaceParams::default_pose();
        self.driver.reset(FaceParams::default_pose());
    }
}
