//! Procedural generator for the oldes application icon
//!
//! The icon is a vertical gradient with a rounded border and a centered
//! label whose font size is fitted to the canvas.

pub mod builtin_font;
pub mod config;
pub mod font;
pub mod icon_gen;

pub use config::RenderConfig;
pub use font::{FittedFont, FontBytes, FontFile, FontSource, LabelFont, TextExtent};
pub use icon_gen::{encode_png, render_icon, save_png};
