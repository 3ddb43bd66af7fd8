#![forbid(unsafe_code)]
//! Shared helpers for the hybrid_text executables.
use std::path::Path;

use anyhow::Context;
use hybrid_text::prelude::{Field, OutputImage};
use image::GrayImage;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Installs a fmt subscriber filtered by `RUST_LOG`, defaulting to `info`.
/// Calling it more than once is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let _ = Registry::default().with(filter).with(fmt_layer).try_init();
}

/// Writes a `[0, 1]` field as an 8-bit grayscale PNG.
pub fn save_field_png(field: &Field, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    let (width, height) = field.size();
    let img = GrayImage::from_raw(width as u32, height as u32, field.to_luma8())
        .context("pixel buffer does not match image dimensions")?;
    img.save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::info!("Wrote {}.", path.display());
    Ok(())
}

/// Writes a composited image as an 8-bit grayscale PNG.
pub fn save_png(image: &OutputImage, path: impl AsRef<Path>) -> anyhow::Result<()> {
    save_field_png(image.field(), path)
}

/// Rescales an ink layer so its largest value maps to black on white, for inspection.
pub fn ink_preview(ink: &Field) -> Field {
    let (_, hi) = ink.min_max();
    let scale = if hi > 0.0 { 1.0 / hi } else { 0.0 };
    ink.map(|v| 1.0 - v * scale).clip(0.0, 1.0)
}
