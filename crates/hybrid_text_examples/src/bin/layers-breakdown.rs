//! Writes every intermediate layer of one composite: both rasters, both ink layers,
//! the background and the final image.
use hybrid_text::prelude::*;
use hybrid_text_examples::{init_tracing, ink_preview, save_field_png, save_png};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = RenderConfig::default();
    let mut fonts = FontCache::new();
    let (near_font, _) = fonts.resolve(&config.near_font);
    let (far_font, _) = fonts.resolve(&config.far_font);

    let near = rasterize("Month", near_font.as_ref(), &config.layout)?;
    let far = rasterize("March", far_font.as_ref(), &config.layout)?;
    let params = Preset::Balanced.parameters();
    let mut rng = StdRng::seed_from_u64(7);
    let layers = compose_layers(
        &near.field,
        &far.field,
        &params,
        &config.background,
        &mut rng,
    )?;

    save_field_png(&near.field, "layers-near-raster.png")?;
    save_field_png(&far.field, "layers-far-raster.png")?;
    save_field_png(&ink_preview(&layers.near_ink), "layers-near-ink.png")?;
    save_field_png(&ink_preview(&layers.far_ink), "layers-far-ink.png")?;
    save_field_png(&layers.background, "layers-background.png")?;
    save_png(&layers.output, "layers-output.png")?;
    Ok(())
}
