//! Graphics support via embedded-graphics
//!
//! Implements [`DrawTarget`](embedded_graphics_core::draw_target::DrawTarget)
//! for [`FrameBuffer`] so the embedded-graphics primitive, text and image
//! ecosystem can render straight into the pixel store. Fills are routed
//! through the framebuffer's fast rectangle path.
//!
//! Draws through this trait do not record damage; callers flushing through
//! a [`Compositor`](crate::compositor::Compositor) invalidate the drawn
//! area themselves.
//!
//! ## Example
//!
//! ```rust
//! use embedded_graphics::{
//!     pixelcolor::Rgb565,
//!     prelude::*,
//!     primitives::{PrimitiveStyle, Rectangle},
//! };
//! use st7789_compositor::FrameBuffer;
//!
//! let mut frame = match FrameBuffer::new(240, 240) {
//!     Ok(frame) => frame,
//!     Err(_) => return,
//! };
//!
//! let _ = Rectangle::new(Point::new(10, 10), Size::new(50, 30))
//!     .into_styled(PrimitiveStyle::with_fill(Rgb565::RED))
//!     .draw(&mut frame);
//! ```

use core::convert::Infallible;
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{Dimensions, OriginDimensions, Point, Size},
    pixelcolor::{IntoStorage, Rgb565},
    prelude::Pixel,
    primitives::Rectangle,
};

use crate::framebuffer::FrameBuffer;

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 || x > i32::from(i16::MAX) || y > i32::from(i16::MAX) {
                continue;
            }
            self.draw_pixel(x as i16, y as i16, crate::color::Rgb565(color.into_storage()));
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let w = area.size.width.min(u32::from(i16::MAX as u16)) as i16;
        let h = area.size.height.min(u32::from(i16::MAX as u16)) as i16;
        self.fill_rect(
            area.top_left.x as i16,
            area.top_left.y as i16,
            w,
            h,
            crate::color::Rgb565(color.into_storage()),
        );
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(crate::color::Rgb565(color.into_storage()));
        Ok(())
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(u32::from(self.width()), u32::from(self.height()))
    }
}
