//! TrueType/OpenType faces backed by `ttf-parser`.
use std::path::{Path, PathBuf};

use glam::Vec2;
use ttf_parser::{Face, GlyphId, OutlineBuilder};

use super::canvas::LumaCanvas;
use super::coverage::CoverageRasterizer;
use super::font::{glyph_box, FontFace, TextBounds};
use crate::error::{Error, Result};

/// An outline font loaded into memory.
///
/// Text is laid out on a single line by horizontal advance; missing characters use the
/// face's `.notdef` glyph.
pub struct TrueTypeFont {
    name: String,
    data: Vec<u8>,
}

impl TrueTypeFont {
    /// Read and validate a font file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| Error::FontLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_bytes(path.display().to_string(), data)
    }

    /// Validate font bytes already in memory. `name` is used for logs and errors.
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Result<Self> {
        let name = name.into();
        if let Err(e) = Face::parse(&data, 0) {
            return Err(Error::FontLoad {
                path: PathBuf::from(&name),
                reason: e.to_string(),
            });
        }
        Ok(Self { name, data })
    }

    fn face(&self) -> Option<Face<'_>> {
        Face::parse(&self.data, 0).ok()
    }
}

/// Glyph ids and their pen positions in pixels.
fn layout(face: &Face<'_>, text: &str, scale: f32) -> Vec<(GlyphId, f32)> {
    let mut pen = 0.0;
    text.chars()
        .map(|c| {
            let id = face.glyph_index(c).unwrap_or(GlyphId(0));
            let x = pen;
            pen += f32::from(face.glyph_hor_advance(id).unwrap_or(0)) * scale;
            (id, x)
        })
        .collect()
}

fn glyph_bounds(face: &Face<'_>, id: GlyphId, pen_x: f32, scale: f32) -> TextBounds {
    match face.glyph_bounding_box(id) {
        Some(r) => TextBounds::new(
            Vec2::new(
                pen_x + f32::from(r.x_min) * scale,
                -f32::from(r.y_max) * scale,
            ),
            Vec2::new(
                pen_x + f32::from(r.x_max) * scale,
                -f32::from(r.y_min) * scale,
            ),
        ),
        None => TextBounds::EMPTY,
    }
}

fn units_scale(face: &Face<'_>, px: f32) -> f32 {
    px / f32::from(face.units_per_em().max(1))
}

impl FontFace for TrueTypeFont {
    fn name(&self) -> &str {
        &self.name
    }

    fn measure(&self, text: &str, px: f32) -> TextBounds {
        let Some(face) = self.face() else {
            return TextBounds::EMPTY;
        };
        let scale = units_scale(&face, px);
        layout(&face, text, scale)
            .into_iter()
            .fold(TextBounds::EMPTY, |acc, (id, x)| {
                acc.union(glyph_bounds(&face, id, x, scale))
            })
    }

    fn draw(&self, text: &str, px: f32, origin: Vec2, canvas: &mut LumaCanvas) {
        let Some(face) = self.face() else {
            return;
        };
        let scale = units_scale(&face, px);
        for (id, x) in layout(&face, text, scale) {
            let bounds = glyph_bounds(&face, id, x, scale);
            if bounds.is_empty() {
                continue;
            }
            let shifted = TextBounds::new(bounds.min + origin, bounds.max + origin);
            let (mut raster, top_left) = glyph_box(shifted);
            let mut builder = OutlineSink {
                raster: &mut raster,
                scale,
                offset: Vec2::new(origin.x + x, origin.y) - top_left,
                start: None,
                last: Vec2::ZERO,
            };
            if face.outline_glyph(id, &mut builder).is_some() {
                canvas.stamp(&raster, top_left.x as i64, top_left.y as i64);
            }
        }
    }
}

/// Feeds glyph outlines, converted from font units (y up) to local pixels (y down), into
/// a coverage rasterizer.
struct OutlineSink<'r> {
    raster: &'r mut CoverageRasterizer,
    scale: f32,
    offset: Vec2,
    start: Option<Vec2>,
    last: Vec2,
}

impl OutlineSink<'_> {
    fn map(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(x * self.scale, -y * self.scale) + self.offset
    }
}

impl OutlineBuilder for OutlineSink<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.map(x, y);
        self.start = Some(p);
        self.last = p;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.map(x, y);
        self.raster.line(self.last, p);
        self.last = p;
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let c = self.map(x1, y1);
        let p = self.map(x, y);
        self.raster.quad(self.last, c, p);
        self.last = p;
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let c1 = self.map(x1, y1);
        let c2 = self.map(x2, y2);
        let p = self.map(x, y);
        self.raster.cubic(self.last, c1, c2, p);
        self.last = p;
    }

    fn close(&mut self) {
        if let Some(start) = self.start.take() {
            if self.last != start {
                self.raster.line(self.last, start);
            }
            self.last = start;
        }
    }
}
