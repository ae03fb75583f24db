//! Color types for the RGB565 pipeline
//!
//! This module defines the three color representations the pipeline moves
//! between:
//!
//! - [`Rgb888`] — 24-bit source color, the input to every drawing call that
//!   requests more depth than the panel can show.
//! - [`Rgb565`] — 16-bit device color in host order, the output of the
//!   quantizer and the unit of the blending arithmetic.
//! - [`DeviceColor`] — 16-bit device color in *wire* (big-endian) byte
//!   order, the framebuffer storage element. Keeping wire order a distinct
//!   type means a pixel can never reach the panel with its bytes swapped by
//!   accident; conversions are explicit.
//!
//! ## Example
//!
//! ```
//! use st7789_compositor::color::{DeviceColor, Rgb565, Rgb888};
//!
//! let c = Rgb888::new(255, 128, 0);
//! let c565 = Rgb565::from_rgb888(c);
//! let wire = DeviceColor::from_rgb565(c565);
//! assert_eq!(wire.to_rgb565(), c565);
//! ```

/// 24-bit RGB color
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rgb888 {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb888 {
    /// Create a color from channel values
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Unpack from a `0x00RRGGBB` word
    pub const fn from_u32(c: u32) -> Self {
        Self {
            r: ((c >> 16) & 0xFF) as u8,
            g: ((c >> 8) & 0xFF) as u8,
            b: (c & 0xFF) as u8,
        }
    }

    /// Pack into a `0x00RRGGBB` word
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// True for (0, 0, 0)
    pub const fn is_black(self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0
    }

    /// True for (255, 255, 255)
    pub const fn is_white(self) -> bool {
        self.r == 255 && self.g == 255 && self.b == 255
    }

    /// True when all three channels are equal
    pub const fn is_gray(self) -> bool {
        self.r == self.g && self.g == self.b
    }

    /// True when the color survives 565 truncation without loss
    ///
    /// The low 3/2/3 bits of each channel are exactly what the panel cannot
    /// represent; when they are all zero there is nothing to dither.
    pub const fn is_exact_565(self) -> bool {
        (self.r & 0x07) == 0 && (self.g & 0x03) == 0 && (self.b & 0x07) == 0
    }
}

/// 16-bit RGB565 color in host byte order
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Rgb565(pub u16);

impl Rgb565 {
    /// Truncate a 24-bit color to 565 (no rounding)
    pub const fn from_rgb888(c: Rgb888) -> Self {
        Self((((c.r as u16) & 0xF8) << 8) | (((c.g as u16) & 0xFC) << 3) | ((c.b as u16) >> 3))
    }

    /// Assemble from 5/6/5 channel values (unclamped low bits ignored)
    pub const fn from_channels(r5: u16, g6: u16, b5: u16) -> Self {
        Self(((r5 & 0x1F) << 11) | ((g6 & 0x3F) << 5) | (b5 & 0x1F))
    }

    /// Red channel, 0..=31
    pub const fn r5(self) -> u16 {
        (self.0 >> 11) & 0x1F
    }

    /// Green channel, 0..=63
    pub const fn g6(self) -> u16 {
        (self.0 >> 5) & 0x3F
    }

    /// Blue channel, 0..=31
    pub const fn b5(self) -> u16 {
        self.0 & 0x1F
    }
}

/// 16-bit RGB565 color in wire (big-endian) byte order
///
/// The ST7789 clocks the high byte of each pixel first, so the framebuffer
/// stores pixels in exactly that order and flush becomes a straight byte
/// copy. Construct via [`DeviceColor::from_rgb565`]; read back via
/// [`DeviceColor::to_rgb565`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct DeviceColor(pub [u8; 2]);

impl DeviceColor {
    /// Convert a host-order 565 value to wire order
    pub const fn from_rgb565(c: Rgb565) -> Self {
        Self([(c.0 >> 8) as u8, (c.0 & 0xFF) as u8])
    }

    /// Convert back to host order
    pub const fn to_rgb565(self) -> Rgb565 {
        Rgb565(((self.0[0] as u16) << 8) | self.0[1] as u16)
    }

    /// High (first-on-wire) byte
    pub const fn hi(self) -> u8 {
        self.0[0]
    }

    /// Low (second-on-wire) byte
    pub const fn lo(self) -> u8 {
        self.0[1]
    }
}

/// Blend `fg` over `bg` in the 565 domain
///
/// `alpha` is 8-bit coverage; 0 returns `bg` and 255 returns `fg`
/// unchanged. Channels are blended independently without expanding to 888,
/// which is what every anti-aliased rasterization path here wants.
pub fn blend565(bg: Rgb565, fg: Rgb565, alpha: u8) -> Rgb565 {
    if alpha == 0 {
        return bg;
    }
    if alpha == 255 {
        return fg;
    }

    let a = alpha as u16;
    let inv = 255 - a;

    let r = (bg.r5() * inv + fg.r5() * a) >> 8;
    let g = (bg.g6() * inv + fg.g6() * a) >> 8;
    let b = (bg.b5() * inv + fg.b5() * a) >> 8;
    Rgb565::from_channels(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb888_u32_round_trip() {
        let c = Rgb888::from_u32(0x00A1_B2C3);
        assert_eq!(c, Rgb888::new(0xA1, 0xB2, 0xC3));
        assert_eq!(c.to_u32(), 0x00A1_B2C3);
    }

    #[test]
    fn test_rgb565_truncation() {
        // (255, 255, 255) -> all channel bits set
        assert_eq!(Rgb565::from_rgb888(Rgb888::new(255, 255, 255)).0, 0xFFFF);
        assert_eq!(Rgb565::from_rgb888(Rgb888::new(0, 0, 0)).0, 0x0000);
        // Pure red keeps only the top 5 bits
        assert_eq!(Rgb565::from_rgb888(Rgb888::new(255, 0, 0)).0, 0xF800);
    }

    #[test]
    fn test_device_color_wire_order() {
        let c = DeviceColor::from_rgb565(Rgb565(0x1234));
        assert_eq!(c.hi(), 0x12);
        assert_eq!(c.lo(), 0x34);
        assert_eq!(c.to_rgb565(), Rgb565(0x1234));
    }

    #[test]
    fn test_exact_565_predicate() {
        assert!(Rgb888::new(248, 252, 248).is_exact_565());
        assert!(!Rgb888::new(249, 252, 248).is_exact_565());
        assert!(!Rgb888::new(248, 253, 248).is_exact_565());
    }

    #[test]
    fn test_blend_endpoints() {
        let bg = Rgb565(0x0000);
        let fg = Rgb565(0xFFFF);
        assert_eq!(blend565(bg, fg, 0), bg);
        assert_eq!(blend565(bg, fg, 255), fg);
    }

    #[test]
    fn test_blend_midpoint_is_between() {
        let bg = Rgb565::from_channels(0, 0, 0);
        let fg = Rgb565::from_channels(31, 63, 31);
        let mid = blend565(bg, fg, 128);
        assert!(mid.r5() > 0 && mid.r5() < 31);
        assert!(mid.g6() > 0 && mid.g6() < 63);
        assert!(mid.b5() > 0 && mid.b5() < 31);
    }
}
