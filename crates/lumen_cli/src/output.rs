//! Writing finished renders to disk.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use lumen_renderer::{color_to_rgb8, ImageBuffer};

/// Save `image` to `path`. A `.ppm` extension writes plain-text P3;
/// anything else is encoded by the `image` crate from the extension.
pub fn save(image: &ImageBuffer, path: &Path) -> Result<()> {
    let is_ppm = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

    if is_ppm {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        write_ppm(image, BufWriter::new(file))
            .with_context(|| format!("writing {}", path.display()))?;
    } else {
        let rgb = image::RgbImage::from_raw(image.width, image.height, image.to_rgb8())
            .context("pixel buffer does not match image size")?;
        rgb.save(path)
            .with_context(|| format!("encoding {}", path.display()))?;
    }

    log::info!("Saved {}x{} image to {}", image.width, image.height, path.display());
    Ok(())
}

/// Plain PPM: header, then one `r g b` line per pixel, top row first.
pub fn write_ppm(image: &ImageBuffer, mut writer: impl Write) -> std::io::Result<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for y in 0..image.height {
        for x in 0..image.width {
            let [r, g, b] = color_to_rgb8(image.get(x, y));
            writeln!(writer, "{} {} {}", r, g, b)?;
        }
    }

    writer.flush()
}
