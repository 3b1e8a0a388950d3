//! Valence/arousal expression interpolation.
//!
//! Blends six emotion keyframes by inverse-distance weighting in
//! valence-arousal space. The inference service runs the same formula;
//! carrying it here lets the client preview an expression locally
//! (manual trigger path) without a round trip.

use crate::{
    core::lerp,
    model::{FaceParams, keys},
};

/// IDW sharpness exponent.
const POWER: f64 = 2.0;
/// Guards division by zero when the query lands exactly on a keyframe;
/// the matching keyframe then dominates the blend outright.
const EPSILON: f64 = 1e-9;

/// A point in valence-arousal space, both axes conventionally in
/// [-5, 5]: valence runs displeasure to pleasure, arousal runs calm to
/// excited.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Affect {
    pub valence: f64,
    pub arousal: f64,
}

impl Affect {
    pub fn new(valence: f64, arousal: f64) -> Self {
        Self { valence, arousal }
    }

    pub fn distance(self, other: Affect) -> f64 {
        let dv = self.valence - other.valence;
        let da = self.arousal - other.arousal;
        (dv * dv + da * da).sqrt()
    }
}

struct Keyframe {
    name: &'static str,
    affect: Affect,
    // Parameter values in `keys::ALL` order.
    params: [f64; 9],
}

const KEYFRAMES: [Keyframe; 6] = [
    Keyframe {
        name: "happy",
        affect: Affect { valence: 4.45, arousal: 0.85 },
        params: [0.25, 0.65, -10.0, -20.0, 0.0, 0.2, 40.0, 1.45, 2.5],
    },
    Keyframe {
        name: "angry",
        affect: Affect { valence: -2.0, arousal: 3.95 },
        params: [0.9, 0.8, 5.0, 20.0, 0.15, 0.2, -15.0, 0.3, 0.9],
    },
    Keyframe {
        name: "sad",
        affect: Affect { valence: -4.5, arousal: -2.0 },
        params: [0.8, 0.6, -5.0, -15.0, 0.18, 0.15, -18.0, 0.1, 0.8],
    },
    Keyframe {
        name: "calm",
        affect: Affect { valence: 3.9, arousal: -4.0 },
        params: [0.15, 0.7, -13.0, -26.0, 0.0, 0.0, 12.0, 0.3, 1.2],
    },
    Keyframe {
        name: "astonished",
        affect: Affect { valence: 5.0, arousal: 0.0 },
        params: [1.0, 0.4, 10.0, 25.0, 0.0, 0.0, 15.0, 3.0, 0.65],
    },
    Keyframe {
        name: "sleepy",
        affect: Affect { valence: 0.05, arousal: -5.0 },
        params: [0.15, 0.75, -11.0, 0.0, 0.0, 0.0, -15.0, 0.7, 1.55],
    },
];

/// Interpolates a full parameter set for an affect coordinate.
///
/// Weight per keyframe k is `1 / ((100 * d_k)^2 + ε)`; the blended
/// parameters are the weight-normalized sum, followed by two snap
/// rules: eye openness is binarized (>= 0.4 opens fully, otherwise
/// drops to 0.2) and upper eyelid coverage below 0.1 floors to zero.
pub fn interpolate_expression(affect: Affect) -> FaceParams {
    let mut total_weight = 0.0;
    let mut blended = [0.0f64; 9];

    for kf in &KEYFRAMES {
        let d = affect.distance(kf.affect);
        let weight = 1.0 / ((100.0 * d).powf(POWER) + EPSILON);
        total_weight += weight;
        for (acc, value) in blended.iter_mut().zip(kf.params) {
            *acc += weight * value;
        }
    }

    for value in &mut blended {
        *value /= total_weight;
    }

    let mut params = FaceParams::new();
    for (key, value) in keys::ALL.iter().zip(blended) {
        params.set(*key, value);
    }

    // Snap rules from the reference formula.
    let eye = params.get_or(keys::EYE_OPENNESS, 1.0);
    params.set(keys::EYE_OPENNESS, if eye >= 0.4 { 1.0 } else { 0.2 });
    if params.get_or(keys::UPPER_EYELID_COVERAGE, 0.0) < 0.1 {
        params.set(keys::UPPER_EYELID_COVERAGE, 0.0);
    }

    params
}

/// Mixes two affect coordinates; handy for scripted sweeps in demos.
pub fn mix(a: Affect, b: Affect, t: f64) -> Affect {
    let t = t.clamp(0.0, 1.0);
    Affect {
        valence: lerp(a.valence, b.valence, t),
        arousal: lerp(a.arousal, b.arousal, t),
    }
}
