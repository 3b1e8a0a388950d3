use crate::{
    anim::ExpressionAnimator,
    core::{Canvas, TimestampMs},
    error::VisageResult,
    model::FaceParams,
    render::FaceRenderer,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// No ticking needed; frames are not scheduled.
    Idle,
    /// A non-animated parameter change wants exactly one more draw.
    RedrawOnce,
    /// An animation is in flight; keep scheduling frames.
    Ticking,
}

/// Gates the host's frame callback: decides per frame whether the
/// animator needs advancing and whether another frame should be
/// scheduled at all, so an idle face burns no CPU.
///
/// With `continuous_redraw` set the driver never goes idle and asks for
/// every frame (the always-draw client variant); otherwise it ticks
/// only from target arrival until the animator finishes.
#[derive(Debug)]
pub struct FrameDriver {
    animator: ExpressionAnimator,
    canvas: Canvas,
    continuous_redraw: bool,
    phase: Phase,
}

impl FrameDriver {
    pub fn new(initial: FaceParams, canvas: Canvas, continuous_redraw: bool) -> Self {
        Self {
            animator: ExpressionAnimator::new(initial),
            canvas,
            continuous_redraw,
            phase: Phase::Idle,
        }
    }

    pub fn animator(&self) -> &ExpressionAnimator {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut ExpressionAnimator {
        &mut self.animator
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Whether the host should currently be scheduling frames.
    pub fn wants_frames(&self) -> bool {
        self.continuous_redraw || self.phase != Phase::Idle
    }

    /// A new animation target was armed; start ticking.
    pub fn notify_target_arrived(&mut self) {
        self.phase = Phase::Ticking;
    }

    /// Ask for one idle draw to reflect a non-animated change. No-op
    /// while an animation is already ticking (the next tick draws
    /// anyway).
    pub fn request_redraw(&mut self) {
        if self.phase == Phase::Idle {
            self.phase = Phase::RedrawOnce;
        }
    }

    /// User reset: discards any in-flight animation, pins `pose`, and
    /// schedules exactly one redraw so the new pose reaches the screen
    /// even mid-animation.
    pub fn reset(&mut self, pose: FaceParams) {
        self.animator.reset(pose);
        self.phase = Phase::RedrawOnce;
    }

    /// The host's frame callback. Advances the animator when ticking,
    /// draws the current pose, and returns whether another frame should
    /// be scheduled.
    pub fn on_frame(
        &mut self,
        now: TimestampMs,
        renderer: &mut dyn FaceRenderer,
    ) -> VisageResult<bool> {
        match self.phase {
            Phase::Idle => {
                if self.continuous_redraw {
                    renderer.draw(self.canvas, self.animator.current())?;
                }
            }
            Phase::RedrawOnce => {
                renderer.draw(self.canvas, self.animator.current())?;
                self.phase = Phase::Idle;
            }
            Phase::Ticking => {
                let tick = self.animator.tick(now);
                renderer.draw(self.canvas, self.animator.current())?;
                // An inactive animator can also mean someone reset it
                // out from under us; either way there is nothing left
                // to tick.
                if tick.finished || !self.animator.is_active() {
                    tracing::debug!("animation finished, render loop going idle");
                    self.phase = Phase::Idle;
                }
            }
        }
        Ok(self.wants_frames())
    }
}
