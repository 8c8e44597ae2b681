use crate::config::RenderConfig;
use crate::font::{resolve_font, FittedFont, FontSource};
use anyhow::{Context, Result};
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    ColorType, ImageEncoder, Rgba, RgbaImage,
};
use std::{
    fs::{create_dir_all, File},
    io::{BufWriter, Write},
    path::Path,
};

/// Render the icon described by `config`. Fonts are looked up in `fonts`,
/// in order; a missing font degrades to the builtin font instead of failing.
pub fn render_icon(config: &RenderConfig, fonts: &[Box<dyn FontSource>]) -> Result<RgbaImage> {
    config.validate()?;

    let mut canvas = RgbaImage::from_pixel(config.size, config.size, Rgba(config.top));

    paint_gradient(&mut canvas, config.top, config.bottom);
    stroke_rounded_rect(
        &mut canvas,
        config.border_inset,
        config.border_radius,
        config.border_width,
        Rgba(config.border_color),
    );

    let fitted = resolve_font(&config.text, config, fonts);
    draw_label(&mut canvas, config, &fitted);

    Ok(canvas)
}

/// Color of row `y` of a vertical gradient spanning `height` rows. Channels
/// are truncated, not rounded.
pub fn gradient_row_color(top: [u8; 4], bottom: [u8; 4], y: u32, height: u32) -> Rgba<u8> {
    let ratio = if height > 1 {
        y as f64 / (height - 1) as f64
    } else {
        0.0
    };
    let channel = |i: usize| (top[i] as f64 * (1.0 - ratio) + bottom[i] as f64 * ratio) as u8;

    Rgba([channel(0), channel(1), channel(2), 255])
}

/// Fill every row of `canvas` with its interpolated gradient color
pub fn paint_gradient(canvas: &mut RgbaImage, top: [u8; 4], bottom: [u8; 4]) {
    let height = canvas.height();

    for (y, row) in canvas.enumerate_rows_mut() {
        let color = gradient_row_color(top, bottom, y, height);
        for (_, _, pixel) in row {
            *pixel = color;
        }
    }
}

/// Whether (`x`, `y`) lies inside the rounded rectangle spanning
/// `min..=max` on both axes with corner `radius`
fn inside_rounded_rect(x: f32, y: f32, min: f32, max: f32, radius: f32) -> bool {
    if x < min || x > max || y < min || y > max {
        return false;
    }

    let radius = radius.min((max - min) / 2.0).max(0.0);
    let dx = x - x.clamp(min + radius, max - radius);
    let dy = y - y.clamp(min + radius, max - radius);

    dx * dx + dy * dy <= radius * radius
}

/// Stroke a rounded rectangle outline inset by `inset` pixels from every
/// edge. The stroke grows inward from the outer edge; pixels inside the
/// inner edge are left untouched.
pub fn stroke_rounded_rect(
    canvas: &mut RgbaImage,
    inset: u32,
    radius: u32,
    width: u32,
    color: Rgba<u8>,
) {
    let size = canvas.width().min(canvas.height());
    if size <= inset.saturating_mul(2) || width == 0 {
        return;
    }

    let outer_min = inset as f32;
    let outer_max = (size - inset) as f32;
    let inner_min = outer_min + width as f32;
    let inner_max = outer_max - width as f32;
    let outer_radius = radius as f32;
    let inner_radius = radius.saturating_sub(width) as f32;

    let last = (size - inset).min(size - 1);
    for y in inset..=last {
        for x in inset..=last {
            let (fx, fy) = (x as f32, y as f32);
            if !inside_rounded_rect(fx, fy, outer_min, outer_max, outer_radius) {
                continue;
            }

            let in_hole = inner_min <= inner_max
                && inside_rounded_rect(fx, fy, inner_min, inner_max, inner_radius);
            if !in_hole {
                canvas.put_pixel(x, y, color);
            }
        }
    }
}

/// Center the fitted label on the canvas and draw it
fn draw_label(canvas: &mut RgbaImage, config: &RenderConfig, fitted: &FittedFont) {
    let size = config.size as f32;
    let x = (size - fitted.extent.width as f32) / 2.0;
    let y = (size - fitted.extent.height as f32) / 2.0 + config.baseline_offset as f32;

    fitted
        .font
        .draw(canvas, x, y, &config.text, Rgba(config.text_color));
}

/// Encode `canvas` as an RGBA PNG. Output only depends on the pixels.
pub fn encode_png(canvas: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_png(canvas, &mut buf)?;
    Ok(buf)
}

/// Write `canvas` as a PNG file, creating parent directories when needed
pub fn save_png(canvas: &RgbaImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent)
            .with_context(|| format!("Can't create output directory {}", parent.display()))?;
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create PNG file {}", path.display()))?;
    let mut out_file = BufWriter::new(file);
    write_png(canvas, &mut out_file).context("Failed to write PNG")?;
    out_file.flush()?;

    log::debug!("Wrote {}x{} PNG to {}", canvas.width(), canvas.height(), path.display());
    Ok(())
}

// Encode image data as PNG with compression
fn write_png<W: Write>(canvas: &RgbaImage, w: W) -> Result<()> {
    let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, PngFilterType::Adaptive);
    encoder.write_image(
        canvas.as_raw(),
        canvas.width(),
        canvas.height(),
        ColorType::Rgba8,
    )?;
    Ok(())
}
