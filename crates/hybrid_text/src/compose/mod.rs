//! Hybrid compositing of the near word, the far word and the cloud background.
//!
//! `output = clip(background - (near_ink + far_ink), 0, 1)`. Each call draws a fresh
//! background from the supplied RNG, so identical inputs may give different textures.
pub mod background;
pub mod ink;

pub use background::{cloud_field, synthesize_background, BackgroundConfig, CloudScale};
pub use ink::{band_pass, far_ink, near_ink};

use rand::Rng;
use tracing::debug;

use crate::error::{Error, Result};
use crate::field::{clip, Field};
use crate::params::ParameterSet;

/// Final composited image with intensities in `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputImage {
    field: Field,
}

impl OutputImage {
    pub fn width(&self) -> usize {
        self.field.width()
    }

    pub fn height(&self) -> usize {
        self.field.height()
    }

    /// Intensity at `(x, y)`, `0.0` outside the image.
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.field.get(x, y)
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn into_field(self) -> Field {
        self.field
    }

    /// Smallest and largest intensity.
    pub fn min_max(&self) -> (f32, f32) {
        self.field.min_max()
    }

    /// Row-major 8-bit intensities, `v * 255` truncated.
    pub fn to_luma8(&self) -> Vec<u8> {
        self.field.to_luma8()
    }
}

/// Every layer of a composite, for inspection.
#[derive(Clone, Debug)]
pub struct Composite {
    pub near_ink: Field,
    pub far_ink: Field,
    pub background: Field,
    pub output: OutputImage,
}

/// Composite two word rasters over a fresh background, returning all layers.
///
/// Parameters are validated first; nothing is computed if any is out of range.
pub fn compose_layers(
    near: &Field,
    far: &Field,
    params: &ParameterSet,
    background: &BackgroundConfig,
    rng: &mut dyn Rng,
) -> Result<Composite> {
    params.validate()?;
    background.validate()?;
    if near.size() != far.size() {
        return Err(Error::DimensionMismatch {
            expected: near.size(),
            actual: far.size(),
        });
    }

    let (width, height) = near.size();
    let near_ink = near_ink(near, params);
    let far_ink = far_ink(far, params);
    let bg = synthesize_background(width, height, params, background, rng);

    let ink = near_ink.zip_map(&far_ink, |n, f| n + f);
    let output = bg.zip_map(&ink, |b, i| clip(b - i, 0.0, 1.0));
    debug!(
        width,
        height,
        near_ink = near_ink.mean(),
        far_ink = far_ink.mean(),
        "composed hybrid image"
    );

    Ok(Composite {
        near_ink,
        far_ink,
        background: bg,
        output: OutputImage { field: output },
    })
}

/// Composite two word rasters over a fresh background.
pub fn compose(
    near: &Field,
    far: &Field,
    params: &ParameterSet,
    background: &BackgroundConfig,
    rng: &mut dyn Rng,
) -> Result<OutputImage> {
    compose_layers(near, far, params, background, rng).map(|c| c.output)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::params::Preset;
    use crate::text::{rasterize, BuiltinFont, TextLayout};

    fn word(text: &str) -> Field {
        let layout = TextLayout::new(240, 80).with_font_range(20, 64);
        rasterize(text, &BuiltinFont::new(), &layout)
            .expect("rasterize")
            .field
    }

    fn in_unit_range(field: &Field) -> bool {
        field
            .data()
            .iter()
            .all(|v| v.is_finite() && (0.0..=1.0).contains(v))
    }

    #[test]
    fn output_is_in_range_for_every_preset() {
        let near = word("Month");
        let far = word("March");
        let mut rng = StdRng::seed_from_u64(1);
        for preset in Preset::ALL {
            let out = compose(
                &near,
                &far,
                &preset.parameters(),
                &BackgroundConfig::default(),
                &mut rng,
            )
            .expect("compose");
            assert_eq!((out.width(), out.height()), (240, 80));
            assert!(in_unit_range(out.field()), "{preset}");
        }
    }

    #[test]
    fn extreme_in_range_parameters_stay_in_range() {
        let near = word("AB");
        let far = word("CD");
        let params = ParameterSet::default()
            .with_near_strength(1.0)
            .with_far_strength(1.5)
            .with_far_detail_boost(3.0)
            .with_bg_gray(1.0)
            .with_bg_cloud_strength(0.5);
        let mut rng = StdRng::seed_from_u64(2);
        let out = compose(&near, &far, &params, &BackgroundConfig::default(), &mut rng)
            .expect("compose");
        assert!(in_unit_range(out.field()));
    }

    #[test]
    fn empty_words_leave_the_background() {
        let blank = word("");
        let params = ParameterSet::default();
        let layers = compose_layers(
            &blank,
            &blank,
            &params,
            &BackgroundConfig::default(),
            &mut StdRng::seed_from_u64(3),
        )
        .expect("compose");
        assert!(in_unit_range(layers.output.field()));
        for (o, b) in layers.output.field().data().iter().zip(layers.background.data()) {
            assert!((o - b).abs() < 1e-4);
        }
    }

    #[test]
    fn out_of_range_parameter_blocks_composition() {
        let near = word("AB");
        let params = ParameterSet::default().with_far_blur(-1.0);
        let err = compose(
            &near,
            &near,
            &params,
            &BackgroundConfig::default(),
            &mut StdRng::seed_from_u64(4),
        )
        .err()
        .expect("range error");
        assert!(matches!(err, Error::ParameterRange { name: "far_blur", .. }));
    }

    #[test]
    fn mismatched_fields_are_rejected() {
        let near = Field::filled(10, 10, 1.0);
        let far = Field::filled(10, 11, 1.0);
        let err = compose(
            &near,
            &far,
            &ParameterSet::default(),
            &BackgroundConfig::default(),
            &mut StdRng::seed_from_u64(5),
        )
        .err()
        .expect("mismatch");
        assert!(matches!(err, Error::DimensionMismatch { .. }));
    }

    #[test]
    fn more_near_strength_never_lightens_the_image() {
        let near = word("Month");
        let far = word("");
        let mut previous = f32::NEG_INFINITY;
        for strength in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let params = ParameterSet::default().with_near_strength(strength);
            let out = compose(
                &near,
                &far,
                &params,
                &BackgroundConfig::default(),
                &mut StdRng::seed_from_u64(9),
            )
            .expect("compose");
            let darkness = 1.0 - out.field().mean();
            assert!(darkness + 1e-6 >= previous, "strength {strength}");
            previous = darkness;
        }
    }

    #[test]
    fn background_differs_between_draws() {
        let near = word("AB");
        let far = word("CD");
        let params = ParameterSet::default();
        let a = compose(
            &near,
            &far,
            &params,
            &BackgroundConfig::default(),
            &mut StdRng::seed_from_u64(10),
        )
        .expect("a");
        let b = compose(
            &near,
            &far,
            &params,
            &BackgroundConfig::default(),
            &mut StdRng::seed_from_u64(11),
        )
        .expect("b");
        let diff = a.field().zip_map(b.field(), |x, y| x - y);
        assert!(diff.std_dev() > 0.0);
    }

    #[test]
    fn same_seed_is_reproducible() {
        let near = word("AB");
        let far = word("CD");
        let params = ParameterSet::default();
        let run = |seed| {
            compose(
                &near,
                &far,
                &params,
                &BackgroundConfig::default(),
                &mut StdRng::seed_from_u64(seed),
            )
            .expect("compose")
        };
        assert_eq!(run(12), run(12));
    }
}
