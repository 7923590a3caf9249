//! Positioned text fields and the frames views are built from.

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_10X20};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use heapless::{String, Vec};

use super::colors;

/// Longest text a single field holds.
pub const FIELD_CAPACITY: usize = 16;

/// Most fields a view draws.
pub const FRAME_CAPACITY: usize = 20;

/// Font presets:
/// - `Small`: 6x10 font, labels and units
/// - `Large`: 10x20 font, readings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Small,
    Large,
}

impl TextSize {
    pub fn font(&self) -> &'static MonoFont<'static> {
        match self {
            TextSize::Small => &FONT_6X10,
            TextSize::Large => &FONT_10X20,
        }
    }
}

/// One piece of text at a fixed position.
///
/// Drawn over a filled [`colors::BACKGROUND`] cell, so a redraw of a field
/// with the same width fully covers the previous text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    position: Point,
    size: TextSize,
    foreground: Rgb565,
    text: String<FIELD_CAPACITY>,
}

impl TextField {
    /// Text longer than [`FIELD_CAPACITY`] is cut off.
    pub fn new(position: Point, size: TextSize, text: &str) -> Self {
        let mut field = Self {
            position,
            size,
            foreground: colors::VALUE,
            text: String::new(),
        };
        for c in text.chars() {
            if field.text.push(c).is_err() {
                break;
            }
        }
        field
    }

    pub fn label(position: Point, text: &str) -> Self {
        Self::new(position, TextSize::Small, text).with_color(colors::LABEL)
    }

    pub fn with_color(mut self, foreground: Rgb565) -> Self {
        self.foreground = foreground;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn foreground(&self) -> Rgb565 {
        self.foreground
    }

    pub fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        let style = MonoTextStyleBuilder::new()
            .font(self.size.font())
            .text_color(self.foreground)
            .background_color(colors::BACKGROUND)
            .build();
        Text::with_baseline(&self.text, self.position, style, Baseline::Top).draw(display)?;
        Ok(())
    }
}

/// Fixed layout of text fields produced by a view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    fields: Vec<TextField, FRAME_CAPACITY>,
}

impl Frame {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add a field. Fields past [`FRAME_CAPACITY`] are dropped.
    pub fn push(&mut self, field: TextField) {
        self.fields.push(field).ok();
    }

    pub fn fields(&self) -> &[TextField] {
        &self.fields
    }

    /// Whether any field shows exactly `text`.
    pub fn contains(&self, text: &str) -> bool {
        self.fields.iter().any(|field| field.text() == text)
    }

    pub fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        for field in &self.fields {
            field.draw(display)?;
        }
        Ok(())
    }
}
