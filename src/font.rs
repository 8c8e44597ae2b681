//! Font loading, text measurement and label fitting
//!
//! Fonts come from an ordered list of [`FontSource`]s. The first source that
//! yields a usable font wins; when none does, the label is drawn with the
//! [`BuiltinFont`] instead.

use crate::builtin_font::BuiltinFont;
use crate::config::RenderConfig;
use image::{Rgba, RgbaImage};
use rusttype::{point, Font, Scale};
use std::path::PathBuf;

/// Something that may provide a scalable font
pub trait FontSource {
    /// Human readable identifier, used in log output
    fn describe(&self) -> String;

    /// Load the font, or `None` when it is absent or unreadable
    fn load(&self) -> Option<Font<'static>>;
}

/// Font file on disk (TTF, OTF or TTC)
#[derive(Debug, Clone)]
pub struct FontFile(pub PathBuf);

impl FontSource for FontFile {
    fn describe(&self) -> String {
        self.0.display().to_string()
    }

    fn load(&self) -> Option<Font<'static>> {
        let data = std::fs::read(&self.0).ok()?;
        Font::try_from_vec(data)
    }
}

/// Font data already held in memory
#[derive(Debug, Clone)]
pub struct FontBytes {
    pub name: String,
    pub data: Vec<u8>,
}

impl FontSource for FontBytes {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn load(&self) -> Option<Font<'static>> {
        Font::try_from_vec(self.data.clone())
    }
}

/// Build the source list for the font files named in `config`
pub fn sources_from_config(config: &RenderConfig) -> Vec<Box<dyn FontSource>> {
    config
        .font_candidates
        .iter()
        .map(|path| Box::new(FontFile(path.clone())) as Box<dyn FontSource>)
        .collect()
}

/// Load the first available font from `sources`
pub fn load_first(sources: &[Box<dyn FontSource>]) -> Option<Font<'static>> {
    sources.iter().find_map(|source| match source.load() {
        Some(font) => {
            log::debug!("Using font {}", source.describe());
            Some(font)
        }
        None => {
            log::debug!("Font {} is not available", source.describe());
            None
        }
    })
}

/// Measured bounding box of a label relative to its draw origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextExtent {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl TextExtent {
    pub fn fits(&self, max_width: u32, max_height: u32) -> bool {
        self.width <= max_width && self.height <= max_height
    }
}

/// A font resolved at a concrete pixel size
#[derive(Clone)]
pub enum LabelFont {
    Scalable { font: Font<'static>, size: u32 },
    Builtin(BuiltinFont),
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LabelFont::Scalable { size, .. } => write!(f, "Scalable({size}px)"),
            LabelFont::Builtin(font) => write!(f, "Builtin(block {})", font.block()),
        }
    }
}

impl LabelFont {
    pub fn is_builtin(&self) -> bool {
        matches!(self, LabelFont::Builtin(_))
    }

    /// Measure the ink bounding box of `text`. The draw origin is the top of
    /// the ascender line at the left edge.
    pub fn measure(&self, text: &str) -> TextExtent {
        match self {
            LabelFont::Scalable { font, size } => measure_scalable(font, *size, text),
            LabelFont::Builtin(font) => {
                let (width, height) = font.measure(text);
                TextExtent {
                    left: 0,
                    top: 0,
                    width,
                    height,
                }
            }
        }
    }

    /// Draw `text` with the draw origin at (`x`, `y`)
    pub fn draw(&self, canvas: &mut RgbaImage, x: f32, y: f32, text: &str, color: Rgba<u8>) {
        match self {
            LabelFont::Scalable { font, size } => {
                draw_scalable(canvas, font, *size, x, y, text, color)
            }
            LabelFont::Builtin(font) => font.draw(canvas, x as i32, y as i32, text, color),
        }
    }
}

fn measure_scalable(font: &Font<'static>, size: u32, text: &str) -> TextExtent {
    let scale = Scale::uniform(size as f32);
    let ascent = font.v_metrics(scale).ascent;

    let bounds = font
        .layout(text, scale, point(0.0, ascent))
        .filter_map(|glyph| glyph.pixel_bounding_box())
        .fold(None, |acc: Option<(i32, i32, i32, i32)>, bb| {
            Some(match acc {
                None => (bb.min.x, bb.min.y, bb.max.x, bb.max.y),
                Some((left, top, right, bottom)) => (
                    left.min(bb.min.x),
                    top.min(bb.min.y),
                    right.max(bb.max.x),
                    bottom.max(bb.max.y),
                ),
            })
        });

    match bounds {
        Some((left, top, right, bottom)) => TextExtent {
            left,
            top,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        },
        None => TextExtent::default(),
    }
}

fn draw_scalable(
    canvas: &mut RgbaImage,
    font: &Font<'static>,
    size: u32,
    x: f32,
    y: f32,
    text: &str,
    color: Rgba<u8>,
) {
    let scale = Scale::uniform(size as f32);
    let ascent = font.v_metrics(scale).ascent;
    let (width, height) = canvas.dimensions();

    for glyph in font.layout(text, scale, point(x, y + ascent)) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };

        glyph.draw(|gx, gy, coverage| {
            let px = bb.min.x + gx as i32;
            let py = bb.min.y + gy as i32;
            if px < 0 || py < 0 || px >= width as i32 || py >= height as i32 {
                return;
            }

            let pixel = canvas.get_pixel_mut(px as u32, py as u32);
            *pixel = blend(*pixel, color, coverage);
        });
    }
}

/// Source-over blend of `color` scaled by `coverage` onto `base`
fn blend(base: Rgba<u8>, color: Rgba<u8>, coverage: f32) -> Rgba<u8> {
    let alpha = coverage.clamp(0.0, 1.0) * color[3] as f32 / 255.0;
    let mix = |b: u8, c: u8| (b as f32 * (1.0 - alpha) + c as f32 * alpha).round() as u8;
    let out_alpha = base[3] as f32 + (255.0 - base[3] as f32) * alpha;

    Rgba([
        mix(base[0], color[0]),
        mix(base[1], color[1]),
        mix(base[2], color[2]),
        out_alpha.round() as u8,
    ])
}

/// Font chosen for the label together with its measured extent
#[derive(Debug, Clone)]
pub struct FittedFont {
    pub font: LabelFont,
    pub extent: TextExtent,

    /// Pixel size the font was resolved at
    pub size: u32,

    /// Set when nothing in the search range fit and overflow is possible
    pub fallback: bool,
}

/// Return the first size in `sizes` whose measured extent fits the box.
/// `measure` returns `None` for sizes it cannot measure; those are skipped.
pub fn fit_size<F>(
    sizes: impl IntoIterator<Item = u32>,
    max_width: u32,
    max_height: u32,
    mut measure: F,
) -> Option<(u32, TextExtent)>
where
    F: FnMut(u32) -> Option<TextExtent>,
{
    sizes.into_iter().find_map(|size| {
        let extent = measure(size)?;
        extent.fits(max_width, max_height).then_some((size, extent))
    })
}

/// Pick the largest font size that fits `text` inside the padded box of
/// `config`, falling back to `config.fallback_font_size`.
pub fn resolve_font(
    text: &str,
    config: &RenderConfig,
    sources: &[Box<dyn FontSource>],
) -> FittedFont {
    let max_side = config.fit_box();

    let Some(font) = load_first(sources) else {
        log::warn!(
            "No scalable font available, using builtin font at {}px",
            config.fallback_font_size
        );
        let font = LabelFont::Builtin(BuiltinFont::with_size(config.fallback_font_size));
        let extent = font.measure(text);
        return FittedFont {
            font,
            extent,
            size: config.fallback_font_size,
            fallback: true,
        };
    };

    let fitted = fit_size(config.font_sizes.candidates(), max_side, max_side, |size| {
        Some(measure_scalable(&font, size, text))
    });

    match fitted {
        Some((size, extent)) => {
            log::debug!(
                "Label fits at {}px ({}x{} within {}x{})",
                size,
                extent.width,
                extent.height,
                max_side,
                max_side
            );
            FittedFont {
                font: LabelFont::Scalable { font, size },
                extent,
                size,
                fallback: false,
            }
        }
        None => {
            let size = config.fallback_font_size;
            log::warn!(
                "Label does not fit within {}x{}, falling back to {}px",
                max_side,
                max_side,
                size
            );
            let font = LabelFont::Scalable { font, size };
            let extent = font.measure(text);
            FittedFont {
                font,
                extent,
                size,
                fallback: true,
            }
        }
    }
}
