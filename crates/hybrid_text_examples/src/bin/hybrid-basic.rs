//! Renders one hybrid image. Usage: `hybrid-basic [NEAR] [FAR] [PRESET] [FONT]`.
use hybrid_text::prelude::*;
use hybrid_text_examples::{init_tracing, save_png};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut args = std::env::args().skip(1);
    let near = args.next().unwrap_or_else(|| "Month".into());
    let far = args.next().unwrap_or_else(|| "March".into());
    let preset: Preset = match args.next() {
        Some(name) => name.parse()?,
        None => Preset::default(),
    };
    let font = args.next().map(FontSource::path).unwrap_or_default();

    let mut fonts = FontCache::new();
    let renderer = HybridRenderer::new(RenderConfig::default().with_font(font), &mut fonts)?;
    let rendering = renderer.render(&RenderRequest::new(near, far).with_preset(preset))?;
    for notice in &rendering.notices {
        tracing::warn!("{notice}");
    }

    save_png(&rendering.image, "hybrid-basic.png")?;
    Ok(())
}
