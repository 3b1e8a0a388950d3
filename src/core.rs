pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Absolute host-clock time in milliseconds.
///
/// The core never reads a clock itself; hosts pass whatever monotonic
/// millisecond source they have (performance.now(), Instant deltas, a
/// test counter).
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct TimestampMs(pub f64);

impl TimestampMs {
    pub fn elapsed_since(self, earlier: TimestampMs) -> f64 {
        self.0 - earlier.0
    }
}

/// Animation duration in milliseconds, guaranteed strictly positive.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct DurationMs(f64);

/// Floor applied by [`DurationMs::new`]. A zero or negative duration
/// would push interpolation progress to infinity/NaN on the first tick.
pub const MIN_DURATION_MS: f64 = 1.0;

impl DurationMs {
    /// Clamps non-finite and sub-minimum inputs up to [`MIN_DURATION_MS`].
    pub fn new(ms: f64) -> Self {
        if ms.is_finite() && ms >= MIN_DURATION_MS {
            Self(ms)
        } else {
            Self(MIN_DURATION_MS)
        }
    }

    pub fn from_secs(secs: f64) -> Self {
        Self::new(secs * 1000.0)
    }

    pub fn as_ms(self) -> f64 {
        self.0
    }

    pub fn as_secs(self) -> f64 {
        self.0 / 1000.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
