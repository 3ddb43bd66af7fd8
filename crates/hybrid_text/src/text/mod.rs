//! Text rasterization: font faces, coverage rendering and auto-fit word placement.
pub mod builtin;
pub mod canvas;
pub mod coverage;
pub mod font;
pub mod raster;
pub mod truetype;

pub use builtin::BuiltinFont;
pub use canvas::LumaCanvas;
pub use font::{FontCache, FontFace, FontSource, TextBounds, DEFAULT_BOLD_FONT};
pub use raster::{fit_font_size, rasterize, FitPolicy, TextLayout, TextRaster};
pub use truetype::TrueTypeFont;
