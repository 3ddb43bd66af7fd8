//! Procedural cloud background.
//!
//! White Gaussian noise is smoothed at several scales at once and the weighted sum is
//! normalized to unit standard deviation, then squashed with `tanh` so outliers stay
//! bounded. The result is mapped to a narrow band around the background gray.
use std::f32::consts::TAU;

use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Error, Result};
use crate::field::{clip, gaussian_blur, Field};
use crate::params::ParameterSet;

/// One smoothing scale of the cloud texture.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CloudScale {
    /// Blur sigma in pixels.
    pub sigma: f32,
    /// Weight in the sum; weights of all scales add up to one.
    pub weight: f32,
}

impl CloudScale {
    pub const fn new(sigma: f32, weight: f32) -> Self {
        Self { sigma, weight }
    }
}

/// Shape of the cloud texture.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundConfig {
    /// Smoothing scales combined into the texture.
    pub scales: Vec<CloudScale>,
    /// Output of `tanh` is multiplied by this, bounding clouds to `[-squash, squash]`.
    pub squash: f32,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            scales: vec![
                CloudScale::new(20.0, 0.4),
                CloudScale::new(60.0, 0.35),
                CloudScale::new(160.0, 0.25),
            ],
            squash: 0.9,
        }
    }
}

impl BackgroundConfig {
    /// Replaces the smoothing scales.
    pub fn with_scales(mut self, scales: Vec<CloudScale>) -> Self {
        self.scales = scales;
        self
    }

    /// Sets the `tanh` squash factor.
    pub fn with_squash(mut self, squash: f32) -> Self {
        self.squash = squash;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.scales.is_empty() {
            return Err(Error::InvalidConfig(
                "background needs at least one cloud scale".into(),
            ));
        }
        if self
            .scales
            .iter()
            .any(|s| !(s.sigma.is_finite() && s.sigma > 0.0) || !(s.weight >= 0.0))
        {
            return Err(Error::InvalidConfig(
                "cloud scales need sigma > 0 and weight >= 0".into(),
            ));
        }
        let total: f32 = self.scales.iter().map(|s| s.weight).sum();
        if (total - 1.0).abs() > 1e-3 {
            return Err(Error::InvalidConfig(format!(
                "cloud scale weights must sum to 1, got {total}"
            )));
        }
        if !(self.squash > 0.0 && self.squash <= 1.0) {
            return Err(Error::InvalidConfig("squash must be in (0, 1]".into()));
        }
        Ok(())
    }
}

/// Generate a random float in the range [0, 1).
#[inline]
fn rand01(rng: &mut dyn Rng) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Independent standard-normal samples (Box-Muller).
pub fn standard_normal_field(width: usize, height: usize, rng: &mut dyn Rng) -> Field {
    let mut field = Field::new(width, height);
    for pair in field.data_mut().chunks_mut(2) {
        // rand01 can round up to 1.0 in f32; keep the logarithm argument positive.
        let u1 = (1.0 - rand01(rng)).max(f32::MIN_POSITIVE);
        let u2 = rand01(rng);
        let r = (-2.0 * u1.ln()).sqrt();
        let (s, c) = (TAU * u2).sin_cos();
        pair[0] = r * c;
        if let Some(second) = pair.get_mut(1) {
            *second = r * s;
        }
    }
    field
}

/// Multi-scale cloud texture with values in `[-squash, squash]`.
pub fn cloud_field(
    width: usize,
    height: usize,
    config: &BackgroundConfig,
    rng: &mut dyn Rng,
) -> Field {
    let noise = standard_normal_field(width, height, rng);

    let mut sum = Field::new(width, height);
    for scale in &config.scales {
        trace!(sigma = scale.sigma, weight = scale.weight, "cloud scale");
        let smoothed = gaussian_blur(&noise, scale.sigma);
        sum = sum.zip_map(&smoothed, |acc, v| acc + scale.weight * v);
    }

    let std = sum.std_dev();
    if !(std > f32::EPSILON) {
        return Field::new(width, height);
    }
    let squash = config.squash;
    sum.map(|v| squash * (v / std).tanh())
}

/// Background field in `[0, 1]`: `bg_gray` modulated by clouds.
///
/// With `bg_cloud_strength == 0` no noise is drawn and the background is flat.
pub fn synthesize_background(
    width: usize,
    height: usize,
    params: &ParameterSet,
    config: &BackgroundConfig,
    rng: &mut dyn Rng,
) -> Field {
    let gray = params.bg_gray;
    if params.bg_cloud_strength <= 0.0 {
        return Field::filled(width, height, clip(gray, 0.0, 1.0));
    }
    let strength = params.bg_cloud_strength;
    cloud_field(width, height, config, rng).map(|c| clip(gray + strength * c, 0.0, 1.0))
}
