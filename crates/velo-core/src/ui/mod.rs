//! Display building blocks shared by the views.
//!
//! Views never talk to the panel directly: they describe what to show as a
//! [`Frame`] of [`TextField`]s, and the screen manager draws it onto any
//! `DrawTarget<Color = Rgb565>`.

pub mod colors;
pub mod format;
mod text;

pub use text::{FIELD_CAPACITY, FRAME_CAPACITY, Frame, TextField, TextSize};

/// Panel width in pixels
pub const DISPLAY_WIDTH_PX: u32 = 320;

/// Panel height in pixels
pub const DISPLAY_HEIGHT_PX: u32 = 240;

#[cfg(test)]
pub(crate) mod tests {
    use core::convert::Infallible;

    use embedded_graphics::Pixel;
    use embedded_graphics::pixelcolor::Rgb565;
    use embedded_graphics::prelude::*;

    /// Draw target that only counts what it is asked to do.
    #[derive(Default)]
    pub(crate) struct Recorder {
        pub(crate) clears: u32,
        pub(crate) pixels: u32,
        pub(crate) pixels_since_clear: u32,
    }

    impl OriginDimensions for Recorder {
        fn size(&self) -> Size {
            Size::new(super::DISPLAY_WIDTH_PX, super::DISPLAY_HEIGHT_PX)
        }
    }

    impl DrawTarget for Recorder {
        type Color = Rgb565;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            let count = pixels.into_iter().count() as u32;
            self.pixels += count;
            self.pixels_since_clear += count;
            Ok(())
        }

        fn clear(&mut self, _color: Self::Color) -> Result<(), Self::Error> {
            self.clears += 1;
            self.pixels_since_clear = 0;
            Ok(())
        }
    }
}
