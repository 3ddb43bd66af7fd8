//! Word rasterization with auto-fit sizing.
//!
//! A word is set at the largest candidate size whose ink fits the padded canvas width, then
//! centred on a white canvas and normalized to a [`Field`] where `1.0` is background and
//! `0.0` is full ink.
use glam::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::canvas::LumaCanvas;
use super::font::FontFace;
use crate::error::{Error, Result};
use crate::field::Field;

/// What to do when a word is too wide even at the minimum font size.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FitPolicy {
    /// Fail with [`Error::NoFittingSize`].
    Strict,
    /// Render at the minimum size and let the text run past the canvas edges.
    #[default]
    ShrinkToMinimum,
}

/// Canvas and sizing parameters for rasterizing a word.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct TextLayout {
    /// Canvas width in pixels.
    pub canvas_width: usize,
    /// Canvas height in pixels.
    pub canvas_height: usize,
    /// First (largest) candidate font size in pixels per em.
    pub max_font_px: u32,
    /// Smallest candidate font size.
    pub min_font_px: u32,
    /// Total horizontal padding; text must be strictly narrower than `canvas_width - padding_px`.
    pub padding_px: u32,
    /// Decrement between candidate sizes.
    pub step_px: u32,
    /// Behaviour when no candidate fits.
    pub fit_policy: FitPolicy,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self {
            canvas_width: 1400,
            canvas_height: 360,
            max_font_px: 260,
            min_font_px: 40,
            padding_px: 60,
            step_px: 4,
            fit_policy: FitPolicy::ShrinkToMinimum,
        }
    }
}

impl TextLayout {
    /// Creates a layout for the given canvas size with default sizing.
    pub fn new(canvas_width: usize, canvas_height: usize) -> Self {
        Self {
            canvas_width,
            canvas_height,
            ..Default::default()
        }
    }

    /// Sets the candidate font size range.
    pub fn with_font_range(mut self, min_font_px: u32, max_font_px: u32) -> Self {
        self.min_font_px = min_font_px;
        self.max_font_px = max_font_px;
        self
    }

    /// Sets the horizontal padding.
    pub fn with_padding(mut self, padding_px: u32) -> Self {
        self.padding_px = padding_px;
        self
    }

    /// Sets the candidate size decrement.
    pub fn with_step(mut self, step_px: u32) -> Self {
        self.step_px = step_px;
        self
    }

    /// Sets the fit policy.
    pub fn with_fit_policy(mut self, fit_policy: FitPolicy) -> Self {
        self.fit_policy = fit_policy;
        self
    }

    /// Width the text must stay strictly below.
    pub fn available_width(&self) -> u32 {
        (self.canvas_width as u32).saturating_sub(self.padding_px)
    }

    /// Candidate sizes from largest to smallest.
    pub fn candidate_sizes(&self) -> impl Iterator<Item = u32> {
        let min = self.min_font_px;
        let step = self.step_px.max(1) as usize;
        (min..=self.max_font_px).rev().step_by(step)
    }

    /// Validates the layout, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(Error::InvalidConfig(
                "canvas must be > 0 in both dimensions".into(),
            ));
        }
        if self.min_font_px == 0 || self.min_font_px > self.max_font_px {
            return Err(Error::InvalidConfig(
                "font range must satisfy 0 < min_font_px <= max_font_px".into(),
            ));
        }
        if self.step_px == 0 {
            return Err(Error::InvalidConfig("step_px must be > 0".into()));
        }
        if self.padding_px as usize >= self.canvas_width {
            return Err(Error::InvalidConfig(
                "padding_px must be smaller than canvas_width".into(),
            ));
        }
        Ok(())
    }
}

/// A rasterized word.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRaster {
    /// Intensities in `[0, 1]`, `1.0` = background.
    pub field: Field,
    /// Font size the word was set at.
    pub font_px: u32,
    /// `true` if the word did not fit and was set at the minimum size anyway.
    pub overflowed: bool,
}

/// Largest candidate size at which `word` is strictly narrower than the available width,
/// or `None` if no candidate fits.
pub fn fit_font_size(word: &str, font: &dyn FontFace, layout: &TextLayout) -> Option<u32> {
    let limit = layout.available_width() as f32;
    layout
        .candidate_sizes()
        .find(|&px| font.measure(word, px as f32).width() < limit)
}

/// Rasterize `word` onto a canvas of the layout's size.
pub fn rasterize(word: &str, font: &dyn FontFace, layout: &TextLayout) -> Result<TextRaster> {
    layout.validate()?;

    let (font_px, overflowed) = match fit_font_size(word, font, layout) {
        Some(px) => (px, false),
        None => match layout.fit_policy {
            FitPolicy::Strict => {
                return Err(Error::NoFittingSize {
                    word: word.to_owned(),
                    min_font_px: layout.min_font_px,
                    available_width: layout.available_width(),
                });
            }
            FitPolicy::ShrinkToMinimum => {
                warn!(
                    "'{}' does not fit in {}px; rendering at {}px.",
                    word,
                    layout.available_width(),
                    layout.min_font_px
                );
                (layout.min_font_px, true)
            }
        },
    };
    debug!(word, font = font.name(), font_px, "fitted font size");

    let mut canvas = LumaCanvas::new(layout.canvas_width, layout.canvas_height);
    let bounds = font.measure(word, font_px as f32);
    if !bounds.is_empty() {
        let left = ((layout.canvas_width as f32 - bounds.width()) / 2.0).round();
        let top = ((layout.canvas_height as f32 - bounds.height()) / 2.0).round();
        let origin = Vec2::new(left - bounds.min.x, top - bounds.min.y);
        font.draw(word, font_px as f32, origin, &mut canvas);
    }

    Ok(TextRaster {
        field: canvas.to_field(),
        font_px,
        overflowed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::builtin::BuiltinFont;

    fn layout(width: usize) -> TextLayout {
        TextLayout::new(width, 120).with_font_range(20, 100)
    }

    #[test]
    fn candidate_sizes_descend_by_step_and_stay_in_range() {
        let sizes: Vec<u32> = layout(400).candidate_sizes().collect();
        assert_eq!(sizes.first(), Some(&100));
        assert_eq!(sizes.last(), Some(&20));
        assert!(sizes.windows(2).all(|w| w[0] - w[1] == 4));
    }

    #[test]
    fn field_matches_canvas_and_is_normalized() {
        let font = BuiltinFont::new();
        for word in ["", "A", "Month", "two words", "WWWWWWWWWWWWWWWWWWWW"] {
            let raster = rasterize(word, &font, &layout(300)).expect("rasterize");
            assert_eq!(raster.field.size(), (300, 120));
            assert!(raster
                .field
                .data()
                .iter()
                .all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn empty_word_is_all_background() {
        let font = BuiltinFont::new();
        let raster = rasterize("", &font, &layout(300)).expect("rasterize");
        assert!(!raster.overflowed);
        assert!(raster.field.data().iter().all(|&v| (v - 1.0).abs() < 1e-6));
    }

    #[test]
    fn chosen_size_is_largest_fitting_candidate() {
        let font = BuiltinFont::new();
        let l = layout(300);
        let px = fit_font_size("Month", &font, &l).expect("fits");
        let limit = l.available_width() as f32;
        assert!(font.measure("Month", px as f32).width() < limit);
        for larger in l.candidate_sizes().take_while(|&c| c > px) {
            assert!(font.measure("Month", larger as f32).width() >= limit);
        }
    }

    #[test]
    fn narrower_canvas_never_increases_size() {
        let font = BuiltinFont::new();
        let mut previous = u32::MAX;
        for width in (160..=800).rev().step_by(40) {
            let px = fit_font_size("Hello", &font, &layout(width)).unwrap_or(0);
            assert!(px <= previous, "width {width}: {px} > {previous}");
            previous = px;
        }
    }

    #[test]
    fn strict_policy_reports_no_fitting_size() {
        let font = BuiltinFont::new();
        let l = layout(200).with_fit_policy(FitPolicy::Strict);
        let err = rasterize("a very long phrase indeed", &font, &l)
            .err()
            .expect("too long");
        assert!(matches!(err, Error::NoFittingSize { min_font_px: 20, .. }));
    }

    #[test]
    fn shrink_policy_renders_at_minimum_and_flags_overflow() {
        let font = BuiltinFont::new();
        let raster = rasterize("a very long phrase indeed", &font, &layout(200)).expect("shrink");
        assert_eq!(raster.font_px, 20);
        assert!(raster.overflowed);
        assert!(raster.field.data().iter().any(|&v| v < 0.5));
    }

    #[test]
    fn rasterization_is_deterministic() {
        let font = BuiltinFont::new();
        let a = rasterize("Month", &font, &layout(300)).expect("a");
        let b = rasterize("Month", &font, &layout(300)).expect("b");
        assert_eq!(a, b);
    }

    #[test]
    fn ink_is_centred_on_canvas() {
        let font = BuiltinFont::new();
        // 'H' is symmetric, so its ink centroid is the centre of its ink box.
        let raster = rasterize("H", &font, &layout(300)).expect("rasterize");
        let field = &raster.field;
        let (w, h) = field.size();
        let (mut mass, mut sx, mut sy) = (0.0f64, 0.0f64, 0.0f64);
        for y in 0..h {
            for x in 0..w {
                let ink = (1.0 - field.get(x, y)) as f64;
                mass += ink;
                sx += ink * (x as f64 + 0.5);
                sy += ink * (y as f64 + 0.5);
            }
        }
        assert!(mass > 0.0);
        assert!((sx / mass - w as f64 / 2.0).abs() <= 1.0);
        assert!((sy / mass - h as f64 / 2.0).abs() <= 1.0);
    }

    #[test]
    fn invalid_layout_is_rejected() {
        let font = BuiltinFont::new();
        let l = TextLayout::new(100, 50).with_padding(100);
        assert!(matches!(
            rasterize("x", &font, &l),
            Err(Error::InvalidConfig(_))
        ));
    }
}
