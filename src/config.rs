//! Render configuration for the generated icon
//!
//! Every visual parameter of the icon lives in [`RenderConfig`]. The defaults
//! reproduce the stock 512px icon; [`RenderConfig::scaled_to`] derives a
//! configuration for another canvas size by scaling the pixel constants.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

/// Canvas edge length the default constants were tuned for
pub const REFERENCE_SIZE: u32 = 512;

/// Default output location, relative to the working directory
pub const DEFAULT_OUTPUT_PATH: &str = "assets/images/app_icon.png";

/// Descending range of font pixel sizes tried when fitting the label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSizeRange {
    pub largest: u32,
    pub smallest: u32,
    pub step: u32,
}

impl FontSizeRange {
    /// Candidate sizes, largest first
    pub fn candidates(&self) -> Vec<u32> {
        if self.step == 0 {
            return Vec::new();
        }

        (self.smallest..=self.largest)
            .rev()
            .step_by(self.step as usize)
            .collect()
    }
}

impl Default for FontSizeRange {
    fn default() -> Self {
        Self {
            largest: 260,
            smallest: 84,
            step: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Canvas edge length in pixels
    pub size: u32,

    /// Gradient color of the first row
    pub top: [u8; 4],

    /// Gradient color of the last row
    pub bottom: [u8; 4],

    pub border_color: [u8; 4],
    pub border_width: u32,
    pub border_radius: u32,

    /// Distance between each canvas edge and the outer edge of the border
    pub border_inset: u32,

    /// Label drawn in the middle of the icon
    pub text: String,
    pub text_color: [u8; 4],

    /// Subtracted from `size` to get the box the label must fit in
    pub fit_padding: u32,

    /// Vertical correction applied after centering the label
    pub baseline_offset: i32,

    pub font_sizes: FontSizeRange,
    pub fallback_font_size: u32,

    /// Font files tried in order; the first one that loads is used
    pub font_candidates: Vec<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            size: REFERENCE_SIZE,
            top: [243, 112, 33, 255],
            bottom: [210, 81, 18, 255],
            border_color: [252, 231, 214, 255],
            border_width: 8,
            border_radius: 96,
            border_inset: 64,
            text: "oldes".to_string(),
            text_color: [255, 255, 255, 255],
            fit_padding: 160,
            baseline_offset: -6,
            font_sizes: FontSizeRange::default(),
            fallback_font_size: 120,
            font_candidates: default_font_candidates(),
        }
    }
}

impl RenderConfig {
    /// Load a config from a JSON file. Fields missing from the file keep
    /// their default value.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: RenderConfig =
            serde_json::from_str(raw).context("Failed to parse render config")?;
        Ok(config)
    }

    /// Rescale every pixel constant so the composition keeps its proportions
    /// on a canvas of `size` pixels. Colors, text and fonts are kept.
    pub fn scaled_to(&self, size: u32) -> Self {
        let from = self.size.max(1);
        let scale = |value: u32| -> u32 {
            ((value as u64 * size as u64 + from as u64 / 2) / from as u64) as u32
        };

        let offset = (self.baseline_offset as f64 * size as f64 / from as f64).round() as i32;
        let font_sizes = FontSizeRange {
            largest: scale(self.font_sizes.largest).max(1),
            smallest: scale(self.font_sizes.smallest).max(1),
            step: scale(self.font_sizes.step).max(1),
        };

        Self {
            size,
            border_width: scale(self.border_width).max(1),
            border_radius: scale(self.border_radius),
            border_inset: scale(self.border_inset),
            fit_padding: scale(self.fit_padding),
            baseline_offset: offset,
            font_sizes,
            fallback_font_size: scale(self.fallback_font_size).max(1),
            ..self.clone()
        }
    }

    /// Reject configurations the renderer cannot draw
    pub fn validate(&self) -> Result<()> {
        if self.size < 2 {
            bail!("Canvas size must be at least 2 pixels, got {}", self.size);
        }

        if self.border_inset.saturating_mul(2) >= self.size {
            bail!(
                "Border inset {} leaves no room on a {}px canvas",
                self.border_inset,
                self.size
            );
        }

        if self.font_sizes.step == 0 {
            bail!("Font size step must be greater than zero");
        }

        if self.font_sizes.smallest > self.font_sizes.largest {
            bail!(
                "Font size range is empty: smallest {} > largest {}",
                self.font_sizes.smallest,
                self.font_sizes.largest
            );
        }

        if self.fallback_font_size == 0 {
            bail!("Fallback font size must be greater than zero");
        }

        Ok(())
    }

    /// Width and height the label must fit in
    pub fn fit_box(&self) -> u32 {
        self.size.saturating_sub(self.fit_padding)
    }
}

/// Platform font files tried when nothing else is configured
pub fn default_font_candidates() -> Vec<PathBuf> {
    [
        "C:/Windows/Fonts/arialbd.ttf",
        "C:/Windows/Fonts/arial.ttf",
        "/System/Library/Fonts/SFNSDisplay-Bold.ttf",
        "/System/Library/Fonts/SFNS.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

/// Parse a CSS color into an opaque RGBA quadruple
pub fn parse_css_color(color: &str) -> Result<[u8; 4]> {
    let color = css_color::Srgb::from_str(color)
        .map_err(|_| anyhow::anyhow!("Invalid CSS color: {}", color))?;

    Ok([
        (color.red * 255.) as u8,
        (color.green * 255.) as u8,
        (color.blue * 255.) as u8,
        255,
    ])
}
