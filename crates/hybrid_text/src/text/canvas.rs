//! 8-bit grayscale drawing surface for text.
use super::coverage::CoverageRasterizer;
use crate::field::Field;

/// Single-channel canvas with a white (255) background onto which glyph ink is darkened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LumaCanvas {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl LumaCanvas {
    pub const BACKGROUND: u8 = u8::MAX;

    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![Self::BACKGROUND; width * height],
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    /// Darken the pixel at `(x, y)` by `coverage` in `[0, 1]`. Pixels outside are ignored.
    /// Overlapping ink keeps the darker value.
    pub fn ink(&mut self, x: i64, y: i64, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let level = (f32::from(Self::BACKGROUND) * (1.0 - coverage.clamp(0.0, 1.0))).round() as u8;
        let idx = y as usize * self.width + x as usize;
        self.data[idx] = self.data[idx].min(level);
    }

    /// Transfer a rasterized glyph whose top-left pixel lands at `(left, top)`.
    pub fn stamp(&mut self, glyph: &CoverageRasterizer, left: i64, top: i64) {
        glyph.for_each_pixel(|x, y, coverage| {
            self.ink(left + x as i64, top + y as i64, coverage);
        });
    }

    /// Normalize to `[0, 1]` by the maximum channel value.
    pub fn to_field(&self) -> Field {
        let max = f32::from(u8::MAX);
        let data = self.data.iter().map(|&v| f32::from(v) / max).collect();
        Field::from_vec(self.width, self.height, data)
            .unwrap_or_else(|_| Field::filled(self.width, self.height, 1.0))
    }
}
