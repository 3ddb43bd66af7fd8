//! Frequency decomposition of the two word rasters into ink layers.
//!
//! Ink layers are non-negative darkening amounts subtracted from the background. The near
//! word contributes high-frequency edge ink that only reads up close; the far word
//! contributes low-frequency mass that survives viewing from a distance.
use crate::field::{clip, gaussian_blur, Field};
use crate::params::ParameterSet;

/// Sigmas of the two blurs whose difference recovers the far word's mid-frequency band.
pub const BAND_SIGMAS: (f32, f32) = (4.0, 10.0);

/// Edge ink of the near word.
///
/// Edges are the positive part of the raster minus its local average. They are blended
/// with a copy blurred at the simulated viewing distance, then scaled by `near_strength`.
pub fn near_ink(near: &Field, params: &ParameterSet) -> Field {
    let local = gaussian_blur(near, params.near_local_sigma);
    let edges = near.zip_map(&local, |v, avg| clip(v - avg, 0.0, 1.0));
    let distant = gaussian_blur(&edges, params.near_distance_blur);

    let keep = params.near_persistence;
    let strength = params.near_strength;
    edges.zip_map(&distant, |sharp, soft| {
        strength * (keep * sharp + (1.0 - keep) * soft)
    })
}

/// Mass ink of the far word.
///
/// The raster is low-passed and inverted so ink becomes positive, and a band-pass of that
/// base (difference of two fixed blurs) is added back weighted by `far_detail_boost`.
pub fn far_ink(far: &Field, params: &ParameterSet) -> Field {
    let base = gaussian_blur(far, params.far_blur).map(|v| clip(1.0 - v, 0.0, 1.0));
    let strength = params.far_strength;

    if params.far_detail_boost <= 0.0 {
        return base.map(|b| strength * b);
    }

    let band = band_pass(&base);
    let boost = params.far_detail_boost;
    base.zip_map(&band, |b, d| strength * (b + boost * d))
}

/// `clip(G(f, 4) - G(f, 10), 0, 1)`.
pub fn band_pass(field: &Field) -> Field {
    let (fine, coarse) = BAND_SIGMAS;
    let fine = gaussian_blur(field, fine);
    let coarse = gaussian_blur(field, coarse);
    fine.zip_map(&coarse, |a, b| clip(a - b, 0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// White field with a black vertical bar.
    fn bar(width: usize, height: usize, x0: usize, x1: usize) -> Field {
        let mut data = vec![1.0; width * height];
        for y in 0..height {
            for x in x0..x1 {
                data[y * width + x] = 0.0;
            }
        }
        Field::from_vec(width, height, data).unwrap()
    }

    #[test]
    fn blank_fields_produce_no_ink() {
        let blank = Field::filled(64, 32, 1.0);
        let params = ParameterSet::default();
        let near = near_ink(&blank, &params);
        let far = far_ink(&blank, &params);
        assert!(near.data().iter().all(|&v| v.abs() < 1e-5));
        assert!(far.data().iter().all(|&v| v.abs() < 1e-5));
    }

    #[test]
    fn near_ink_sits_on_the_stroke_edges() {
        let field = bar(80, 20, 30, 50);
        let params = ParameterSet::default()
            .with_near_strength(1.0)
            .with_near_persistence(1.0);
        let ink = near_ink(&field, &params);
        // Background right next to the stroke is brighter than its local average.
        assert!(ink.get(51, 10) > 0.1);
        // Far from the stroke and deep inside it there is no edge content.
        assert!(ink.get(5, 10) < 1e-4);
        assert!(ink.get(40, 10) < 1e-4);
    }

    #[test]
    fn far_ink_is_heaviest_over_the_word() {
        let field = bar(120, 60, 50, 70);
        let params = ParameterSet::default();
        let ink = far_ink(&field, &params);
        assert!(ink.get(60, 30) > ink.get(30, 30));
        assert!(ink.get(30, 30) > ink.get(2, 30));
        assert!(ink.data().iter().all(|&v| v >= 0.0 && v.is_finite()));
    }

    #[test]
    fn detail_boost_adds_band_content() {
        let field = bar(120, 60, 50, 70);
        let plain = far_ink(&field, &ParameterSet::default().with_far_detail_boost(0.0));
        let boosted = far_ink(&field, &ParameterSet::default().with_far_detail_boost(2.0));
        assert!(boosted.get(60, 30) > plain.get(60, 30));
        for (b, p) in boosted.data().iter().zip(plain.data()) {
            assert!(b + 1e-6 >= *p);
        }
    }

    #[test]
    fn near_ink_scales_linearly_with_strength() {
        let field = bar(80, 20, 30, 50);
        let half = near_ink(&field, &ParameterSet::default().with_near_strength(0.5));
        let full = near_ink(&field, &ParameterSet::default().with_near_strength(1.0));
        for (h, f) in half.data().iter().zip(full.data()) {
            assert!((2.0 * h - f).abs() < 1e-5);
        }
    }
}
