//! Font faces and the cache that loads them.
//!
//! This module defines how font resources plug into the rasterizer:
//! - Implement [`FontFace`] to measure and draw a line of text at a pixel size.
//! - Name a resource with [`FontSource`].
//! - Load and share faces through [`FontCache`], which degrades to the builtin face when a
//!   file is missing or unreadable.
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::builtin::BuiltinFont;
use super::canvas::LumaCanvas;
use super::coverage::CoverageRasterizer;
use super::truetype::TrueTypeFont;
use crate::error::{Error, Result};

/// Ink bounding box of a line of text, relative to the pen origin on the baseline.
/// Y points down, so glyphs above the baseline have negative `min.y`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl TextBounds {
    /// Bounds of text without ink.
    pub const EMPTY: TextBounds = TextBounds {
        min: Vec2::ZERO,
        max: Vec2::ZERO,
    };

    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f32 {
        (self.max.x - self.min.x).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.max.y - self.min.y).max(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Smallest box containing both. Empty boxes are ignored.
    pub fn union(self, other: TextBounds) -> TextBounds {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        TextBounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// A font that can measure and draw a single line of text.
pub trait FontFace: Send + Sync {
    /// Human-readable name used in logs.
    fn name(&self) -> &str;

    /// Ink bounds of `text` set at `px` pixels per em.
    fn measure(&self, text: &str, px: f32) -> TextBounds;

    /// Draw `text` at `px` pixels per em with the pen starting at `origin` on the baseline.
    fn draw(&self, text: &str, px: f32, origin: Vec2, canvas: &mut LumaCanvas);
}

/// Identifies a font resource.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FontSource {
    /// A TrueType/OpenType file on disk.
    Path(PathBuf),
    /// The embedded bitmap face.
    Builtin,
}

impl FontSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        FontSource::Path(path.into())
    }
}

impl Default for FontSource {
    fn default() -> Self {
        FontSource::Path(PathBuf::from(DEFAULT_BOLD_FONT))
    }
}

/// Bold face used when no font is configured.
pub const DEFAULT_BOLD_FONT: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf";

/// Cache for loaded font faces, keyed by file path.
///
/// Sizes are chosen per render, so a path maps to one face for every size. Faces are
/// immutable once loaded and the returned [`Arc`] handles can be shared across threads.
pub struct FontCache {
    faces: HashMap<PathBuf, Arc<dyn FontFace>>,
    builtin: Arc<BuiltinFont>,
}

impl FontCache {
    /// Creates a new, empty cache.
    pub fn new() -> Self {
        Self {
            faces: HashMap::new(),
            builtin: Arc::new(BuiltinFont::new()),
        }
    }

    /// Returns the number of loaded faces.
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.faces.contains_key(path)
    }

    /// Clears all loaded faces.
    pub fn clear(&mut self) {
        self.faces.clear();
    }

    /// Registers an already loaded face under `path`.
    pub fn insert(&mut self, path: impl Into<PathBuf>, face: Arc<dyn FontFace>) {
        self.faces.insert(path.into(), face);
    }

    /// The embedded fallback face.
    pub fn builtin(&self) -> Arc<dyn FontFace> {
        self.builtin.clone()
    }

    /// Gets the face for `source`, loading and caching it if necessary.
    pub fn get_or_load(&mut self, source: &FontSource) -> Result<Arc<dyn FontFace>> {
        let path = match source {
            FontSource::Builtin => return Ok(self.builtin()),
            FontSource::Path(path) => path,
        };

        if let Some(face) = self.faces.get(path) {
            return Ok(face.clone());
        }

        let face: Arc<dyn FontFace> = Arc::new(TrueTypeFont::from_path(path)?);
        debug!("Loaded font '{}'.", path.display());
        self.faces.insert(path.clone(), face.clone());
        Ok(face)
    }

    /// Like [`FontCache::get_or_load`], but falls back to the builtin face on failure.
    /// The load error, if any, is returned alongside so the caller can report it.
    pub fn resolve(&mut self, source: &FontSource) -> (Arc<dyn FontFace>, Option<Error>) {
        match self.get_or_load(source) {
            Ok(face) => (face, None),
            Err(e) => {
                warn!("{}; using the builtin font.", e);
                (self.builtin(), Some(e))
            }
        }
    }
}

impl Default for FontCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Rasterizer sized to cover `bounds` (in canvas pixels) with a one pixel margin, and the
/// canvas position of its top-left pixel.
pub(crate) fn glyph_box(bounds: TextBounds) -> (CoverageRasterizer, Vec2) {
    let left = bounds.min.x.floor() - 1.0;
    let top = bounds.min.y.floor() - 1.0;
    let width = (bounds.max.x.ceil() - left) as usize + 2;
    let height = (bounds.max.y.ceil() - top) as usize + 2;
    (
        CoverageRasterizer::new(width, height),
        Vec2::new(left, top),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_ignores_empty_bounds() {
        let a = TextBounds::new(Vec2::new(0.0, -10.0), Vec2::new(5.0, 0.0));
        let b = TextBounds::new(Vec2::new(8.0, -12.0), Vec2::new(9.0, 2.0));
        assert_eq!(TextBounds::EMPTY.union(a), a);
        assert_eq!(a.union(TextBounds::EMPTY), a);
        let u = a.union(b);
        assert_eq!(u.min, Vec2::new(0.0, -12.0));
        assert_eq!(u.max, Vec2::new(9.0, 2.0));
        assert_eq!(u.width(), 9.0);
        assert_eq!(u.height(), 14.0);
    }

    #[test]
    fn builtin_source_never_fails() {
        let mut cache = FontCache::new();
        let face = cache.get_or_load(&FontSource::Builtin).expect("builtin");
        assert_eq!(face.name(), "builtin-5x7");
        assert!(cache.is_empty());
    }

    #[test]
    fn missing_file_is_a_font_load_error() {
        let mut cache = FontCache::new();
        let source = FontSource::path("/definitely/not/here.ttf");
        let err = cache.get_or_load(&source).err().expect("missing font");
        assert!(matches!(err, Error::FontLoad { .. }));
    }

    #[test]
    fn resolve_falls_back_to_builtin_with_error() {
        let mut cache = FontCache::new();
        let (face, err) = cache.resolve(&FontSource::path("/definitely/not/here.ttf"));
        assert_eq!(face.name(), "builtin-5x7");
        assert!(matches!(err, Some(Error::FontLoad { .. })));
        assert!(cache.is_empty());
    }

    #[test]
    fn inserted_faces_are_reused() {
        let mut cache = FontCache::new();
        cache.insert("/virtual/face.ttf", cache.builtin());
        assert!(cache.contains(Path::new("/virtual/face.ttf")));
        let face = cache
            .get_or_load(&FontSource::path("/virtual/face.ttf"))
            .expect("cached");
        assert_eq!(face.name(), "builtin-5x7");
        cache.clear();
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn glyph_box_covers_bounds_with_margin() {
        let bounds = TextBounds::new(Vec2::new(10.5, -20.2), Vec2::new(30.1, 4.0));
        let (raster, origin) = glyph_box(bounds);
        assert_eq!(origin, Vec2::new(9.0, -22.0));
        let (w, h) = raster.size();
        assert!(origin.x + w as f32 >= 31.0);
        assert!(origin.y + h as f32 >= 5.0);
    }
}
