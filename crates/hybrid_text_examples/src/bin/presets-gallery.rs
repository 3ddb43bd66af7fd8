//! Renders the same word pair with every named preset, one PNG each.
use hybrid_text::prelude::*;
use hybrid_text_examples::{init_tracing, save_png};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut fonts = FontCache::new();
    let renderer = HybridRenderer::new(RenderConfig::default(), &mut fonts)?;

    for preset in Preset::ALL {
        // Same clouds for every preset so only the knobs differ.
        let mut rng = StdRng::seed_from_u64(42);
        let request = RenderRequest::new("Month", "March").with_preset(preset);
        let rendering = renderer.render_with_rng(&request, &mut rng)?;
        tracing::info!(
            "{}: near {}px, far {}px",
            preset.label(),
            rendering.near_font_px,
            rendering.far_font_px
        );
        save_png(&rendering.image, format!("presets-gallery-{}.png", preset.name()))?;
    }

    // Classic look on the smaller canvas.
    let renderer = HybridRenderer::new(RenderConfig::classic(), &mut fonts)?;
    let request = RenderRequest::new("Month", "March").with_preset(Preset::Classic);
    let rendering = renderer.render_with_rng(&request, &mut StdRng::seed_from_u64(42))?;
    save_png(&rendering.image, "presets-gallery-classic-1200x350.png")?;
    Ok(())
}
