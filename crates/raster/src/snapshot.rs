//! PNG output of a [`Pixmap`].
//!
//! Feature-gated behind `png` (default on) so builds that only need the
//! in-memory surface do not pull in the `image` crate.

use crate::pixel::pixmap_to_rgba;
use crate::Pixmap;
use particle_field_core::error::FieldError;
use particle_field_core::Srgb;
use std::path::Path;
use tracing::info;

/// Writes the pixmap as a PNG, optionally over an opaque background.
///
/// Returns `FieldError::Io` on encode or write failure.
pub fn write_png(pixmap: &Pixmap, background: Option<Srgb>, path: &Path) -> Result<(), FieldError> {
    let rgba = pixmap_to_rgba(pixmap, background);
    let img = image::RgbaImage::from_raw(pixmap.width(), pixmap.height(), rgba)
        .ok_or_else(|| FieldError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| FieldError::Io(e.to_string()))?;
    info!(
        path = %path.display(),
        width = pixmap.width(),
        height = pixmap.height(),
        "snapshot written"
    );
    Ok(())
}
