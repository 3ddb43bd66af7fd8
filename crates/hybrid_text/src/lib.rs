#![forbid(unsafe_code)]
//! hybrid_text: hybrid-image text rendering. One word reads up close, another from afar.
//!
//! Modules:
//! - text: font faces, coverage rasterization and auto-fit word placement
//! - field: grayscale float rasters and separable Gaussian blur
//! - compose: near/far ink decomposition, cloud background, final composite
//! - params: compositor knobs, their ranges and named presets
//! - render: end-to-end renderer with font fallback and notices
pub mod compose;
pub mod error;
pub mod field;
pub mod params;
pub mod render;
pub mod text;

/// Convenient re-exports for common types. Import with `use hybrid_text::prelude::*;`.
pub mod prelude {
    pub use crate::compose::{
        compose, compose_layers, BackgroundConfig, CloudScale, Composite, OutputImage,
    };
    pub use crate::error::{Error, Result};
    pub use crate::field::{gaussian_blur, Field};
    pub use crate::params::{ParameterSet, Preset};
    pub use crate::render::{HybridRenderer, Notice, RenderConfig, RenderRequest, Rendering};
    pub use crate::text::{
        fit_font_size, rasterize, BuiltinFont, FitPolicy, FontCache, FontFace, FontSource,
        TextLayout, TextRaster, TrueTypeFont,
    };
}
