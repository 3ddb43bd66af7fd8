//! Compositor parameters and named presets.
//!
//! A [`ParameterSet`] holds every numeric knob of the compositor. Each knob has a documented
//! range in [`ParameterSet::RANGES`]; [`ParameterSet::validate`] rejects anything outside it
//! (including NaN) before any pixel work happens.
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Inclusive domain of a single knob.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KnobRange {
    pub name: &'static str,
    pub min: f32,
    pub max: f32,
}

impl KnobRange {
    const fn new(name: &'static str, min: f32, max: f32) -> Self {
        Self { name, min, max }
    }

    pub fn contains(&self, value: f32) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

/// Numeric knobs of the hybrid compositor.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterSet {
    /// Overall weight of the near-word edge ink.
    pub near_strength: f32,
    /// Sigma of the local average subtracted to extract edges.
    pub near_local_sigma: f32,
    /// Sigma simulating how edges soften at viewing distance.
    pub near_distance_blur: f32,
    /// Share of sharp edges in the sharp/distance-blurred blend.
    pub near_persistence: f32,
    /// Low-pass sigma applied to the far word.
    pub far_blur: f32,
    /// Weight of the mid-frequency band added back to the far word.
    pub far_detail_boost: f32,
    /// Overall weight of the far-word ink.
    pub far_strength: f32,
    /// Background gray level.
    pub bg_gray: f32,
    /// Amplitude of the cloud texture around `bg_gray`; `0` gives a flat background.
    pub bg_cloud_strength: f32,
}

impl ParameterSet {
    /// Valid domain of each knob, in field order.
    pub const RANGES: [KnobRange; 9] = [
        KnobRange::new("near_strength", 0.0, 1.0),
        KnobRange::new("near_local_sigma", 0.5, 6.0),
        KnobRange::new("near_distance_blur", 0.0, 20.0),
        KnobRange::new("near_persistence", 0.0, 1.0),
        KnobRange::new("far_blur", 1.0, 40.0),
        KnobRange::new("far_detail_boost", 0.0, 3.0),
        KnobRange::new("far_strength", 0.0, 1.5),
        KnobRange::new("bg_gray", 0.0, 1.0),
        KnobRange::new("bg_cloud_strength", 0.0, 0.5),
    ];

    fn values(&self) -> [f32; 9] {
        [
            self.near_strength,
            self.near_local_sigma,
            self.near_distance_blur,
            self.near_persistence,
            self.far_blur,
            self.far_detail_boost,
            self.far_strength,
            self.bg_gray,
            self.bg_cloud_strength,
        ]
    }

    /// Fails with [`Error::ParameterRange`] on the first knob outside its domain.
    pub fn validate(&self) -> Result<()> {
        for (range, value) in Self::RANGES.iter().zip(self.values()) {
            if !range.contains(value) {
                return Err(Error::ParameterRange {
                    name: range.name,
                    value,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        Ok(())
    }

    pub fn with_near_strength(mut self, v: f32) -> Self {
        self.near_strength = v;
        self
    }

    pub fn with_near_local_sigma(mut self, v: f32) -> Self {
        self.near_local_sigma = v;
        self
    }

    pub fn with_near_distance_blur(mut self, v: f32) -> Self {
        self.near_distance_blur = v;
        self
    }

    pub fn with_near_persistence(mut self, v: f32) -> Self {
        self.near_persistence = v;
        self
    }

    pub fn with_far_blur(mut self, v: f32) -> Self {
        self.far_blur = v;
        self
    }

    pub fn with_far_detail_boost(mut self, v: f32) -> Self {
        self.far_detail_boost = v;
        self
    }

    pub fn with_far_strength(mut self, v: f32) -> Self {
        self.far_strength = v;
        self
    }

    pub fn with_bg_gray(mut self, v: f32) -> Self {
        self.bg_gray = v;
        self
    }

    pub fn with_bg_cloud_strength(mut self, v: f32) -> Self {
        self.bg_cloud_strength = v;
        self
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Preset::Balanced.parameters()
    }
}

/// Named parameter presets, plus caller-supplied overrides.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Preset {
    /// Crisp near word, soft far word.
    CloseEmphasis,
    #[default]
    Balanced,
    /// Heavy far word, subdued near edges.
    FarEmphasis,
    /// Soft, wide blurs over strong clouds.
    Dreamy,
    /// Classic weights (near 0.7 at sigma 3, far 0.3 at sigma 22) on a flat white
    /// background without clouds or detail boost.
    Classic,
    /// Caller-supplied parameters.
    Custom(ParameterSet),
}

impl Preset {
    /// Every named preset, in display order.
    pub const ALL: [Preset; 5] = [
        Preset::CloseEmphasis,
        Preset::Balanced,
        Preset::FarEmphasis,
        Preset::Dreamy,
        Preset::Classic,
    ];

    /// Stable kebab-case identifier.
    pub fn name(&self) -> &'static str {
        match self {
            Preset::CloseEmphasis => "close-emphasis",
            Preset::Balanced => "balanced",
            Preset::FarEmphasis => "far-emphasis",
            Preset::Dreamy => "dreamy",
            Preset::Classic => "classic",
            Preset::Custom(_) => "custom",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Preset::CloseEmphasis => "Close emphasis",
            Preset::Balanced => "Balanced",
            Preset::FarEmphasis => "Far emphasis",
            Preset::Dreamy => "Dreamy",
            Preset::Classic => "Classic",
            Preset::Custom(_) => "Custom",
        }
    }

    /// The parameter record this preset stands for.
    pub fn parameters(&self) -> ParameterSet {
        match self {
            Preset::CloseEmphasis => ParameterSet {
                near_strength: 1.0,
                near_local_sigma: 2.0,
                near_distance_blur: 4.0,
                near_persistence: 0.8,
                far_blur: 18.0,
                far_detail_boost: 0.6,
                far_strength: 0.6,
                bg_gray: 0.92,
                bg_cloud_strength: 0.06,
            },
            Preset::Balanced => ParameterSet {
                near_strength: 0.85,
                near_local_sigma: 2.5,
                near_distance_blur: 6.0,
                near_persistence: 0.75,
                far_blur: 12.0,
                far_detail_boost: 1.2,
                far_strength: 1.0,
                bg_gray: 0.9,
                bg_cloud_strength: 0.08,
            },
            Preset::FarEmphasis => ParameterSet {
                near_strength: 0.55,
                near_local_sigma: 3.0,
                near_distance_blur: 9.0,
                near_persistence: 0.7,
                far_blur: 10.0,
                far_detail_boost: 1.6,
                far_strength: 1.2,
                bg_gray: 0.88,
                bg_cloud_strength: 0.08,
            },
            Preset::Dreamy => ParameterSet {
                near_strength: 0.7,
                near_local_sigma: 3.0,
                near_distance_blur: 10.0,
                near_persistence: 0.6,
                far_blur: 22.0,
                far_detail_boost: 0.4,
                far_strength: 0.9,
                bg_gray: 0.85,
                bg_cloud_strength: 0.15,
            },
            Preset::Classic => ParameterSet {
                near_strength: 0.7,
                near_local_sigma: 3.0,
                near_distance_blur: 0.0,
                near_persistence: 1.0,
                far_blur: 22.0,
                far_detail_boost: 0.0,
                far_strength: 0.3,
                bg_gray: 1.0,
                bg_cloud_strength: 0.0,
            },
            Preset::Custom(params) => *params,
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Preset::ALL
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| Error::InvalidConfig(format!("unknown preset '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_named_preset_is_in_range() {
        for preset in Preset::ALL {
            preset
                .parameters()
                .validate()
                .unwrap_or_else(|e| panic!("{preset}: {e}"));
        }
    }

    #[test]
    fn negative_far_blur_is_a_range_error() {
        let params = ParameterSet::default().with_far_blur(-1.0);
        let err = params.validate().err().expect("out of range");
        assert!(matches!(
            err,
            Error::ParameterRange { name: "far_blur", value, .. } if value == -1.0
        ));
    }

    #[test]
    fn nan_is_out_of_range() {
        let params = ParameterSet::default().with_near_strength(f32::NAN);
        assert!(matches!(
            params.validate(),
            Err(Error::ParameterRange {
                name: "near_strength",
                ..
            })
        ));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let params = ParameterSet::default()
            .with_near_strength(1.0)
            .with_far_blur(40.0)
            .with_bg_cloud_strength(0.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn custom_preset_carries_overrides() {
        let params = ParameterSet::default().with_far_strength(0.42);
        let preset = Preset::Custom(params);
        assert_eq!(preset.parameters().far_strength, 0.42);
        assert_eq!(preset.name(), "custom");
    }

    #[test]
    fn presets_parse_from_their_names() {
        for preset in Preset::ALL {
            assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
        }
        assert_eq!("Far-Emphasis".parse::<Preset>().unwrap(), Preset::FarEmphasis);
        assert!("custom".parse::<Preset>().is_err());
        assert!("loud".parse::<Preset>().is_err());
    }

    #[test]
    fn classic_uses_fixed_weights_without_clouds() {
        let p = Preset::Classic.parameters();
        assert_eq!((p.near_strength, p.near_local_sigma), (0.7, 3.0));
        assert_eq!((p.far_strength, p.far_blur), (0.3, 22.0));
        assert_eq!((p.bg_gray, p.bg_cloud_strength), (1.0, 0.0));
        assert_eq!(p.far_detail_boost, 0.0);
    }

    #[test]
    fn labels_are_distinct_and_non_empty() {
        let labels: Vec<&str> = Preset::ALL.iter().map(|p| p.label()).collect();
        assert!(labels.iter().all(|l| !l.is_empty()));
        for (i, a) in labels.iter().enumerate() {
            assert!(!labels[i + 1..].contains(a), "duplicate label {a}");
        }
        assert_eq!(Preset::Custom(ParameterSet::default()).label(), "Custom");
    }

    #[test]
    fn default_parameters_are_balanced() {
        assert_eq!(ParameterSet::default(), Preset::Balanced.parameters());
        assert_eq!(Preset::default(), Preset::Balanced);
    }
}
