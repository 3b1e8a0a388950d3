//! Emotion preset poses and the capture-session bookkeeping used when
//! collecting one saved expression per label.

use crate::{
    affect::{Affect, interpolate_expression},
    model::FaceParams,
};

/// The six labels the capture workflow walks through, in its fixed
/// cycling order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Normal,
    Surprise,
    Anger,
    Joy,
    Sleepy,
    Sad,
}

impl EmotionLabel {
    pub const ALL: [EmotionLabel; 6] = [
        Self::Normal,
        Self::Surprise,
        Self::Anger,
        Self::Joy,
        Self::Sleepy,
        Self::Sad,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Surprise => "surprise",
            Self::Anger => "anger",
            Self::Joy => "joy",
            Self::Sleepy => "sleepy",
            Self::Sad => "sad",
        }
    }

    /// The preset pose for this label. Normal is the neutral default;
    /// the rest are the affect-space keyframes nearest the label.
    pub fn preset(self) -> FaceParams {
        match self {
            Self::Normal => FaceParams::default_pose(),
            Self::Surprise => interpolate_expression(Affect::new(5.0, 0.0)),
            Self::Anger => interpolate_expression(Affect::new(-2.0, 3.95)),
            Self::Joy => interpolate_expression(Affect::new(4.45, 0.85)),
            Self::Sleepy => interpolate_expression(Affect::new(0.05, -5.0)),
            Self::Sad => interpolate_expression(Affect::new(-4.5, -2.0)),
        }
    }

    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|l| *l == self)
            .unwrap_or_default()
    }
}

/// Tracks which emotion labels have been captured this session and
/// which one is up next.
#[derive(Clone, Debug)]
pub struct CaptureSession {
    current: EmotionLabel,
    saved: [bool; 6],
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureSession {
    pub fn new() -> Self {
        Self {
            current: EmotionLabel::Normal,
            saved: [false; 6],
        }
    }

    pub fn current(&self) -> EmotionLabel {
        self.current
    }

    pub fn set_current(&mut self, label: EmotionLabel) {
        self.current = label;
    }

    pub fn is_saved(&self, label: EmotionLabel) -> bool {
        self.saved[label.index()]
    }

    pub fn complete(&self) -> bool {
        self.saved.iter().all(|s| *s)
    }

    /// Marks the current label saved and advances to the next unsaved
    /// label in cycling order. Returns the new current label, or `None`
    /// when every label has been captured.
    pub fn mark_saved_and_advance(&mut self) -> Option<EmotionLabel> {
        self.saved[self.current.index()] = true;
        self.advance_to_next_unsaved()
    }

    /// Walks forward (wrapping) from the current label to the first
    /// unsaved one.
    pub fn advance_to_next_unsaved(&mut self) -> Option<EmotionLabel> {
        let start = self.current.index();
        for step in 1..=EmotionLabel::ALL.len() {
            let candidate = EmotionLabel::ALL[(start + step) % EmotionLabel::ALL.len()];
            if !self.is_saved(candidate) {
                self.current = candidate;
                return Some(candidate);
            }
        }
        None
    }
}

/// UUIDv4-format subject identifier, generated once per session.
pub fn generate_subject_id() -> String {
    let mut id = String::with_capacity(36);
    for (i, c) in "xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx".chars().enumerate() {
        match c {
            'x' => {
                let nibble = fastrand::u8(0..16);
                id.push(char::from_digit(u32::from(nibble), 16).unwrap_or('0'));
            }
            'y' => {
                // Variant nibble: one of 8, 9, a, b.
                let nibble = (fastrand::u8(0..4) & 0x3) | 0x8;
                id.push(char::from_digit(u32::from(nibble), 16).unwrap_or('8'));
            }
            _ => id.push(c),
        }
        debug_assert!(i < 36);
    }
    id
}
