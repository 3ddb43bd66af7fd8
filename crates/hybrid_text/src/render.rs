//! End-to-end rendering: two words in, one hybrid image out.
//!
//! [`HybridRenderer`] owns a validated [`RenderConfig`] and the two resolved font faces.
//! Each call to [`HybridRenderer::render_with_rng`] rasterizes both words, composites them
//! over a fresh background, and reports anything it had to work around as [`Notice`]s.
use std::fmt;
use std::sync::Arc;

use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::compose::{compose, BackgroundConfig, OutputImage};
use crate::error::Result;
use crate::params::Preset;
use crate::text::{rasterize, FontCache, FontFace, FontSource, TextLayout, TextRaster};

/// Configuration for a [`HybridRenderer`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderConfig {
    /// Canvas size and font-size search.
    pub layout: TextLayout,
    /// Font for the word read up close.
    pub near_font: FontSource,
    /// Font for the word read from afar.
    pub far_font: FontSource,
    /// Cloud texture shape.
    pub background: BackgroundConfig,
}

impl RenderConfig {
    /// Creates a configuration for the given canvas size.
    pub fn new(canvas_width: usize, canvas_height: usize) -> Self {
        Self {
            layout: TextLayout::new(canvas_width, canvas_height),
            ..Default::default()
        }
    }

    /// The smaller 1200x350 canvas used with the classic preset.
    pub fn classic() -> Self {
        Self::new(1200, 350)
    }

    /// Sets the canvas size, keeping the rest of the layout.
    pub fn with_canvas(mut self, canvas_width: usize, canvas_height: usize) -> Self {
        self.layout.canvas_width = canvas_width;
        self.layout.canvas_height = canvas_height;
        self
    }

    /// Replaces the text layout.
    pub fn with_layout(mut self, layout: TextLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Sets the near-word font.
    pub fn with_near_font(mut self, source: FontSource) -> Self {
        self.near_font = source;
        self
    }

    /// Sets the far-word font.
    pub fn with_far_font(mut self, source: FontSource) -> Self {
        self.far_font = source;
        self
    }

    /// Uses one font for both words.
    pub fn with_font(self, source: FontSource) -> Self {
        self.with_near_font(source.clone()).with_far_font(source)
    }

    /// Replaces the background configuration.
    pub fn with_background(mut self, background: BackgroundConfig) -> Self {
        self.background = background;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        self.background.validate()?;
        Ok(())
    }
}

/// Something the renderer worked around instead of failing.
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    /// A font could not be loaded and the builtin face was used.
    FontFallback { source: FontSource, reason: String },
    /// A word did not fit and was set at the minimum size, overflowing the canvas.
    TextOverflow { word: String, font_px: u32 },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::FontFallback { source, reason } => match source {
                FontSource::Path(path) => write!(
                    f,
                    "font '{}' unavailable ({reason}); using the builtin font",
                    path.display()
                ),
                FontSource::Builtin => write!(f, "builtin font fallback ({reason})"),
            },
            Notice::TextOverflow { word, font_px } => {
                write!(f, "'{word}' overflows the canvas at {font_px}px")
            }
        }
    }
}

/// The two words and the preset to render them with.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderRequest {
    /// Word legible up close.
    pub near_word: String,
    /// Word legible from a distance.
    pub far_word: String,
    pub preset: Preset,
}

impl RenderRequest {
    pub fn new(near_word: impl Into<String>, far_word: impl Into<String>) -> Self {
        Self {
            near_word: near_word.into(),
            far_word: far_word.into(),
            preset: Preset::default(),
        }
    }

    /// Sets the preset.
    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.preset = preset;
        self
    }
}

/// Result of a render.
#[derive(Clone, Debug)]
pub struct Rendering {
    pub image: OutputImage,
    /// Font size the near word was set at.
    pub near_font_px: u32,
    /// Font size the far word was set at.
    pub far_font_px: u32,
    pub notices: Vec<Notice>,
}

/// Renders hybrid images with a fixed configuration and font pair.
pub struct HybridRenderer {
    config: RenderConfig,
    near_font: Arc<dyn FontFace>,
    far_font: Arc<dyn FontFace>,
    font_notices: Vec<Notice>,
}

impl HybridRenderer {
    /// Validates `config` and resolves both fonts through `fonts`.
    ///
    /// Missing or unreadable fonts do not fail; they fall back to the builtin face and are
    /// reported on every [`Rendering`].
    pub fn new(config: RenderConfig, fonts: &mut FontCache) -> Result<Self> {
        config.validate()?;

        let mut font_notices = Vec::new();
        let mut load = |source: &FontSource| {
            let (face, err) = fonts.resolve(source);
            if let Some(e) = err {
                font_notices.push(Notice::FontFallback {
                    source: source.clone(),
                    reason: e.to_string(),
                });
            }
            face
        };
        let near_font = load(&config.near_font);
        let far_font = load(&config.far_font);

        Ok(Self {
            config,
            near_font,
            far_font,
            font_notices,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Notices raised while resolving fonts.
    pub fn font_notices(&self) -> &[Notice] {
        &self.font_notices
    }

    /// Renders `request`, drawing the background from `rng`.
    ///
    /// Parameters are validated before any rasterization.
    pub fn render_with_rng(
        &self,
        request: &RenderRequest,
        rng: &mut dyn Rng,
    ) -> Result<Rendering> {
        let params = request.preset.parameters();
        params.validate()?;

        let mut notices = self.font_notices.clone();
        let layout = &self.config.layout;
        let near = rasterize(&request.near_word, self.near_font.as_ref(), layout)?;
        let far = rasterize(&request.far_word, self.far_font.as_ref(), layout)?;
        for (word, raster) in [(&request.near_word, &near), (&request.far_word, &far)] {
            if let Some(notice) = overflow_notice(word, raster) {
                notices.push(notice);
            }
        }

        let image = compose(
            &near.field,
            &far.field,
            &params,
            &self.config.background,
            rng,
        )?;
        info!(
            "Rendered '{}' / '{}' ({}) at {}x{}: near {}px, far {}px, {} notice(s).",
            request.near_word,
            request.far_word,
            request.preset,
            image.width(),
            image.height(),
            near.font_px,
            far.font_px,
            notices.len()
        );

        Ok(Rendering {
            image,
            near_font_px: near.font_px,
            far_font_px: far.font_px,
            notices,
        })
    }

    /// Renders `request` with a fresh thread-local RNG, so every call gets new clouds.
    pub fn render(&self, request: &RenderRequest) -> Result<Rendering> {
        let mut rng = rand::rng();
        self.render_with_rng(request, &mut rng)
    }
}

fn overflow_notice(word: &str, raster: &TextRaster) -> Option<Notice> {
    raster.overflowed.then(|| Notice::TextOverflow {
        word: word.to_owned(),
        font_px: raster.font_px,
    })
}
