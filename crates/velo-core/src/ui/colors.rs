//! Colour definitions for the trip-computer panel.
//!
//! RGB565: convert from 8-bit RGB with R>>3, G>>2, B>>3.

use embedded_graphics::pixelcolor::Rgb565;

/// Panel background; also the colour the display is cleared to.
pub const BACKGROUND: Rgb565 = Rgb565::new(0, 0, 0);

/// Primary readings.
pub const VALUE: Rgb565 = Rgb565::new(31, 63, 31);

/// Field labels and units.
pub const LABEL: Rgb565 = Rgb565::new(21, 42, 21);

/// Placeholder for readings that are not available.
pub const PLACEHOLDER: Rgb565 = Rgb565::new(16, 32, 16);

/// Current speed - bright teal-green
pub const SPEED: Rgb565 = Rgb565::new(95 >> 3, 185 >> 2, 141 >> 3);

/// View titles - warm orange
pub const TITLE: Rgb565 = Rgb565::new(200 >> 3, 145 >> 2, 85 >> 3);
