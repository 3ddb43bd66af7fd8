//! Embedded 5x7 bitmap face, used whenever no font file can be loaded.
//!
//! Each glyph is five column bytes, least significant bit at the top row. Glyphs are scaled
//! to the requested size and drawn as filled cells through the coverage rasterizer, so edges
//! are anti-aliased like outline fonts.
use glam::Vec2;

use super::canvas::LumaCanvas;
use super::font::{glyph_box, FontFace, TextBounds};

const COLUMNS: usize = 5;
const ROWS: usize = 7;
/// Horizontal advance in cells (glyph plus one blank column).
const ADVANCE: f32 = 6.0;
/// Cells per em; the cap height is seven of these.
const CELLS_PER_EM: f32 = 8.0;

const FIRST: u32 = 0x20;

/// Drawn for characters outside printable ASCII.
const MISSING: [u8; COLUMNS] = [0x7F, 0x41, 0x41, 0x41, 0x7F];

#[rustfmt::skip]
const GLYPHS: [[u8; COLUMNS]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x55, 0x22, 0x50], // &
    [0x00, 0x05, 0x03, 0x00, 0x00], // '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // )
    [0x08, 0x2A, 0x1C, 0x2A, 0x08], // *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x08, 0x14, 0x22, 0x41, 0x00], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x00, 0x41, 0x22, 0x14, 0x08], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x32, 0x49, 0x79, 0x41, 0x3E], // @
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x09, 0x01], // F
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x07, 0x08, 0x70, 0x08, 0x07], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x7F, 0x41, 0x41, 0x00], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // backslash
    [0x00, 0x41, 0x41, 0x7F, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x01, 0x02, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7F, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7F], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7E, 0x09, 0x01, 0x02], // f
    [0x0C, 0x52, 0x52, 0x52, 0x3E], // g
    [0x7F, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7D, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3D, 0x00], // j
    [0x7F, 0x10, 0x28, 0x44, 0x00], // k
    [0x00, 0x41, 0x7F, 0x40, 0x00], // l
    [0x7C, 0x04, 0x18, 0x04, 0x78], // m
    [0x7C, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7C, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7C], // q
    [0x7C, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3F, 0x44, 0x40, 0x20], // t
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // v
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // y
    [0x44, 0x64, 0x54, 0x4C, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x7F, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x08, 0x04, 0x08, 0x10, 0x08], // ~
];

fn glyph(c: char) -> &'static [u8; COLUMNS] {
    let code = c as u32;
    match code.checked_sub(FIRST) {
        Some(i) if (i as usize) < GLYPHS.len() => &GLYPHS[i as usize],
        _ => &MISSING,
    }
}

/// Ink extent of a glyph in cells: `(min_col, min_row, max_col, max_row)`, exclusive max.
fn ink_cells(columns: &[u8; COLUMNS]) -> Option<(usize, usize, usize, usize)> {
    let mut extent: Option<(usize, usize, usize, usize)> = None;
    for (col, &bits) in columns.iter().enumerate() {
        for row in 0..ROWS {
            if bits & (1 << row) == 0 {
                continue;
            }
            extent = Some(match extent {
                None => (col, row, col + 1, row + 1),
                Some((c0, r0, c1, r1)) => (c0.min(col), r0.min(row), c1.max(col + 1), r1.max(row + 1)),
            });
        }
    }
    extent
}

/// The embedded face. Cheap to construct and always available.
#[derive(Clone, Debug, Default)]
pub struct BuiltinFont;

impl BuiltinFont {
    pub fn new() -> Self {
        Self
    }

    /// Cell rectangle in pixels relative to the pen, with the baseline under row 6.
    fn cell_rect(pen_x: f32, cell: f32, col: usize, row: usize) -> (Vec2, Vec2) {
        let top = (row as f32 - ROWS as f32) * cell;
        let left = pen_x + col as f32 * cell;
        (Vec2::new(left, top), Vec2::new(left + cell, top + cell))
    }
}

impl FontFace for BuiltinFont {
    fn name(&self) -> &str {
        "builtin-5x7"
    }

    fn measure(&self, text: &str, px: f32) -> TextBounds {
        let cell = px / CELLS_PER_EM;
        let mut bounds = TextBounds::EMPTY;
        for (i, c) in text.chars().enumerate() {
            let pen_x = i as f32 * ADVANCE * cell;
            if let Some((c0, r0, c1, r1)) = ink_cells(glyph(c)) {
                let (min, _) = Self::cell_rect(pen_x, cell, c0, r0);
                let (_, max) = Self::cell_rect(pen_x, cell, c1 - 1, r1 - 1);
                bounds = bounds.union(TextBounds::new(min, max));
            }
        }
        bounds
    }

    fn draw(&self, text: &str, px: f32, origin: Vec2, canvas: &mut LumaCanvas) {
        let cell = px / CELLS_PER_EM;
        if cell <= 0.0 {
            return;
        }
        for (i, c) in text.chars().enumerate() {
            let columns = glyph(c);
            let Some((c0, r0, c1, r1)) = ink_cells(columns) else {
                continue;
            };
            let pen_x = origin.x + i as f32 * ADVANCE * cell;
            let (min, _) = Self::cell_rect(pen_x, cell, c0, r0);
            let (_, max) = Self::cell_rect(pen_x, cell, c1 - 1, r1 - 1);
            let offset = Vec2::new(0.0, origin.y);
            let (mut raster, top_left) = glyph_box(TextBounds::new(min + offset, max + offset));

            for (col, &bits) in columns.iter().enumerate() {
                for row in 0..ROWS {
                    if bits & (1 << row) == 0 {
                        continue;
                    }
                    let (a, b) = Self::cell_rect(pen_x, cell, col, row);
                    let a = a + offset - top_left;
                    let b = b + offset - top_left;
                    raster.line(Vec2::new(b.x, a.y), b);
                    raster.line(Vec2::new(a.x, b.y), a);
                }
            }
            canvas.stamp(&raster, top_left.x as i64, top_left.y as i64);
        }
    }
}
