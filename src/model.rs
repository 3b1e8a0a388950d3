use std::collections::BTreeMap;

/// Canonical parameter keys. The vocabulary is open-ended: unknown keys
/// are admitted everywhere, these are just the names the default pose
/// and the preset tables use.
pub mod keys {
    pub const EYE_OPENNESS: &str = "eyeOpenness";
    pub const PUPIL_SIZE: &str = "pupilSize";
    pub const PUPIL_ANGLE: &str = "pupilAngle";
    pub const UPPER_EYELID_ANGLE: &str = "upperEyelidAngle";
    pub const UPPER_EYELID_COVERAGE: &str = "upperEyelidCoverage";
    pub const LOWER_EYELID_COVERAGE: &str = "lowerEyelidCoverage";
    pub const MOUTH_CURVE: &str = "mouthCurve";
    pub const MOUTH_HEIGHT: &str = "mouthHeight";
    pub const MOUTH_WIDTH: &str = "mouthWidth";

    /// Canonical key order, matching the capture row layout.
    pub const ALL: [&str; 9] = [
        EYE_OPENNESS,
        PUPIL_SIZE,
        PUPIL_ANGLE,
        UPPER_EYELID_ANGLE,
        UPPER_EYELID_COVERAGE,
        LOWER_EYELID_COVERAGE,
        MOUTH_CURVE,
        MOUTH_HEIGHT,
        MOUTH_WIDTH,
    ];
}

/// One facial pose: a named collection of scalar parameters.
///
/// Serializes as a flat JSON map, which is exactly the wire shape of an
/// `update_expression` payload. No range validation happens here; value
/// conventions (0..1, degrees, scale factors) belong to the producer.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct FaceParams(BTreeMap<String, f64>);

impl FaceParams {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// The neutral baseline pose: eyes open, slight pupil contraction,
    /// flat mouth at natural width. Doubles as the reset target.
    pub fn default_pose() -> Self {
        let mut p = Self::new();
        p.set(keys::EYE_OPENNESS, 1.0);
        p.set(keys::PUPIL_SIZE, 0.7);
        p.set(keys::PUPIL_ANGLE, 0.0);
        p.set(keys::UPPER_EYELID_ANGLE, 0.0);
        p.set(keys::UPPER_EYELID_COVERAGE, 0.0);
        p.set(keys::LOWER_EYELID_COVERAGE, 0.0);
        p.set(keys::MOUTH_CURVE, 0.0);
        p.set(keys::MOUTH_HEIGHT, 0.0);
        p.set(keys::MOUTH_WIDTH, 1.0);
        p
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    /// Like [`get`](Self::get) but with a fallback for absent keys, so
    /// a sparse pose still draws.
    pub fn get_or(&self, key: &str, default: f64) -> f64 {
        self.get(key).unwrap_or(default)
    }

    pub fn set(&mut self, key: impl Into<String>, value: f64) {
        self.0.insert(key.into(), value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Writes `value` only if `key` already exists; returns whether it
    /// did. Unlike [`set`](Self::set) this never inserts, so hot paths
    /// can rewrite known keys without allocating.
    pub fn update(&mut self, key: &str, value: f64) -> bool {
        match self.0.get_mut(key) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Overwrites every key present in `partial`; keys not mentioned
    /// are untouched. Unknown keys become new entries (permissive
    /// schema).
    pub fn merge(&mut self, partial: &FaceParams) {
        for (key, value) in &partial.0 {
            self.0.insert(key.clone(), *value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, f64)> for FaceParams {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pose_literals() {
        let p = FaceParams::default_pose();
        assert_eq!(p.get(keys::EYE_OPENNESS), Some(1.0));
        assert_eq!(p.get(keys::PUPIL_SIZE), Some(0.7));
        assert_eq!(p.get(keys::MOUTH_WIDTH), Some(1.0));
        assert_eq!(p.get(keys::MOUTH_CURVE), Some(0.0));
        assert_eq!(p.len(), keys::ALL.len());
        for key in keys::ALL {
            assert!(p.contains(key), "default pose missing {key}");
        }
    }

    #[test]
    fn merge_overwrites_only_named_keys() {
        let mut base = FaceParams::default_pose();
        let mut partial = FaceParams::new();
        partial.set(keys::MOUTH_CURVE, 0.5);
        base.merge(&partial);

        assert_eq!(base.get(keys::MOUTH_CURVE), Some(0.5));
        assert_eq!(base.get(keys::EYE_OPENNESS), Some(1.0));
        assert_eq!(base.get(keys::MOUTH_WIDTH), Some(1.0));
    }

    #[test]
    fn merge_admits_unknown_keys() {
        let mut base = FaceParams::default_pose();
        let mut partial = FaceParams::new();
        partial.set("blinkRate", 0.25);
        base.merge(&partial);
        assert_eq!(base.get("blinkRate"), Some(0.25));
    }

    #[test]
    fn update_writes_only_existing_keys() {
        let mut p = FaceParams::default_pose();
        assert!(p.update(keys::MOUTH_CURVE, 0.3));
        assert_eq!(p.get(keys::MOUTH_CURVE), Some(0.3));

        assert!(!p.update("blinkRate", 1.0));
        assert!(!p.contains("blinkRate"));
    }

    #[test]
    fn serializes_as_flat_map() {
        let mut p = FaceParams::new();
        p.set(keys::MOUTH_CURVE, 0.5);
        p.set(keys::EYE_OPENNESS, 1.0);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["mouthCurve"], 0.5);
        assert_eq!(json["eyeOpenness"], 1.0);

        let back: FaceParams = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }
}
