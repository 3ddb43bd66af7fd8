//! Shows how auto-fit shrinks a word as the canvas narrows.
use hybrid_text::prelude::*;
use hybrid_text_examples::{init_tracing, save_field_png};

const WIDTHS: [usize; 5] = [1400, 1000, 700, 450, 260];

fn main() -> anyhow::Result<()> {
    init_tracing();
    let word = std::env::args().nth(1).unwrap_or_else(|| "Hybrid".into());
    let mut fonts = FontCache::new();
    let (font, _) = fonts.resolve(&FontSource::default());

    for width in WIDTHS {
        let layout = TextLayout::new(width, 360);
        let raster = rasterize(&word, font.as_ref(), &layout)?;
        tracing::info!(
            "{width}px canvas: '{word}' at {}px{}",
            raster.font_px,
            if raster.overflowed { " (overflows)" } else { "" }
        );
        save_field_png(&raster.field, format!("autofit-{width}.png"))?;
    }
    Ok(())
}
