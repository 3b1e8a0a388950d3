use crate::{
    anim_ease::Ease,
    core::{DurationMs, TimestampMs, lerp},
    model::FaceParams,
};

/// Result of one animator tick.
#[derive(Clone, Copy, Debug)]
pub struct Tick {
    /// True once the in-flight animation has reached its target, and on
    /// every subsequent tick until the animator is re-armed or reset.
    pub finished: bool,
}

/// Tweens a parameter set from a captured start pose toward a target
/// pose over a wall-clock duration, with eased progress.
///
/// Two states: Idle (`tick` is a pure read) and Animating (`tick`
/// advances `current` toward `target`). `arm` is legal in both: arming
/// mid-animation restarts interpolation from whatever the current
/// parameters are at that instant, so there is no visual discontinuity
/// and the newest target always wins.
///
/// Progress is computed from absolute elapsed time, not frame count; an
/// animation that straddles a stall jumps forward to catch up.
#[derive(Clone, Debug)]
pub struct ExpressionAnimator {
    current: FaceParams,
    start: FaceParams,
    target: FaceParams,
    start_time: TimestampMs,
    duration: DurationMs,
    ease: Ease,
    active: bool,
    finished: bool,
}

impl ExpressionAnimator {
    pub fn new(initial: FaceParams) -> Self {
        Self {
            current: initial,
            start: FaceParams::new(),
            target: FaceParams::new(),
            start_time: TimestampMs(0.0),
            duration: DurationMs::new(0.0),
            ease: Ease::InOutQuad,
            active: false,
            finished: false,
        }
    }

    /// Swaps the easing curve applied to subsequent ticks. The default
    /// is [`Ease::InOutQuad`].
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn current(&self) -> &FaceParams {
        &self.current
    }

    pub fn target(&self) -> &FaceParams {
        &self.target
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Starts (or restarts) interpolation toward `target`.
    ///
    /// Captures a copy of the current parameters as the interpolation
    /// start. Keys in `target` that the current set has never held are
    /// left alone by `tick` (documented no-op, not an error).
    pub fn arm(&mut self, target: FaceParams, duration: DurationMs, now: TimestampMs) {
        tracing::debug!(
            keys = target.len(),
            duration_ms = duration.as_ms(),
            rearmed = self.active,
            "arming expression animation"
        );
        self.start = self.current.clone();
        self.target = target;
        self.duration = duration;
        self.start_time = now;
        self.active = true;
        self.finished = false;
    }

    /// Advances `current` toward `target` based on wall-clock `now`.
    ///
    /// For every key present in both `start` and `target`:
    /// `current[k] = start[k] + (target[k] - start[k]) * ease(progress)`.
    /// Interpolation is linear in eased-progress space, not time space.
    pub fn tick(&mut self, now: TimestampMs) -> Tick {
        if !self.active {
            return Tick {
                finished: self.finished,
            };
        }

        let elapsed = now.elapsed_since(self.start_time);
        let progress = (elapsed / self.duration.as_ms()).clamp(0.0, 1.0);
        let eased = self.ease.apply(progress);
        let done = progress >= 1.0;

        // Shared keys always exist in `current` (start is a copy of it),
        // so `update` rewrites in place without allocating per frame.
        let target = std::mem::take(&mut self.target);
        for (key, to) in target.iter() {
            if let Some(from) = self.start.get(key) {
                // The final tick pins the target value exactly; lerp at
                // t=1 can miss it by an ulp.
                let value = if done { to } else { lerp(from, to, eased) };
                self.current.update(key, value);
            }
        }
        self.target = target;

        if done {
            self.active = false;
            self.finished = true;
            tracing::debug!("expression animation finished");
        }

        Tick {
            finished: self.finished,
        }
    }

    /// Discards any in-flight animation and pins `current` to
    /// `default_set`. Used for the explicit user reset.
    pub fn reset(&mut self, default_set: FaceParams) {
        self.current = default_set;
        self.active = false;
        self.finished = false;
    }
}
