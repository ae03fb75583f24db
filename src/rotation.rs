//! Display rotation
//!
//! The ST7789 rotates in hardware through the MADCTL register: row/column
//! exchange plus mirror bits re-map the controller's RAM scan order, so the
//! host never has to transform pixel coordinates. What the host does have
//! to account for is the RAM window: the controller RAM is always 240x320,
//! and panels shorter than that (the common 240x240 glass) expose a
//! different RAM region depending on which corner the rotation scans from.
//!
//! ## Rotation Modes
//!
//! - **Rotate0**: Native portrait orientation
//! - **Rotate90**: 90° clockwise, width and height swapped
//! - **Rotate180**: 180° rotation
//! - **Rotate270**: 270° clockwise (or 90° counter-clockwise)
//!
//! ## Example
//!
//! ```
//! use st7789_compositor::{ColorOrder, Rotation};
//!
//! let r = Rotation::Rotate90;
//! assert!(r.swaps_axes());
//! assert_eq!(r.madctl(ColorOrder::Bgr), 0x68);
//!
//! // A 240x240 panel sits at the far end of RAM when rotated 180
//! assert_eq!(Rotation::Rotate180.window_offset(240, 240), (0, 80));
//! ```

use crate::command::{MADCTL_BGR, MADCTL_ROTATIONS};
use crate::config::ColorOrder;
use crate::error::MAX_ROWS;

/// Display rotation relative to native orientation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    /// No rotation
    #[default]
    Rotate0,
    /// Rotate 90 degrees clockwise
    Rotate90,
    /// Rotate 180 degrees
    Rotate180,
    /// Rotate 270 degrees clockwise
    Rotate270,
}

impl Rotation {
    /// Rotation from a quarter-turn count, wrapping modulo 4
    pub const fn from_index(index: u8) -> Self {
        match index % 4 {
            1 => Self::Rotate90,
            2 => Self::Rotate180,
            3 => Self::Rotate270,
            _ => Self::Rotate0,
        }
    }

    /// True when width and height swap in this orientation
    pub const fn swaps_axes(self) -> bool {
        matches!(self, Self::Rotate90 | Self::Rotate270)
    }

    /// MADCTL register value for this rotation and color order
    pub const fn madctl(self, color_order: ColorOrder) -> u8 {
        let bits = MADCTL_ROTATIONS[self as usize];
        match color_order {
            ColorOrder::Rgb => bits,
            ColorOrder::Bgr => bits | MADCTL_BGR,
        }
    }

    /// RAM window origin for a panel of the given native size
    ///
    /// `native_w` and `native_h` are the unrotated panel dimensions.
    /// Returns `(x_offset, y_offset)` in post-rotation coordinates. Panels
    /// shorter than the controller's 320-row RAM scan from the far end of
    /// RAM in the flipped orientations, so the window shifts by the slack.
    pub const fn window_offset(self, native_w: u16, native_h: u16) -> (u16, u16) {
        let _ = native_w;
        let slack = MAX_ROWS - native_h;
        match self {
            Self::Rotate0 | Self::Rotate90 => (0, 0),
            Self::Rotate180 => (0, slack),
            Self::Rotate270 => (slack, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_index_wraps() {
        assert_eq!(Rotation::from_index(0), Rotation::Rotate0);
        assert_eq!(Rotation::from_index(1), Rotation::Rotate90);
        assert_eq!(Rotation::from_index(2), Rotation::Rotate180);
        assert_eq!(Rotation::from_index(3), Rotation::Rotate270);
        assert_eq!(Rotation::from_index(5), Rotation::Rotate90);
    }

    #[test]
    fn test_madctl_values() {
        assert_eq!(Rotation::Rotate0.madctl(ColorOrder::Rgb), 0x00);
        assert_eq!(Rotation::Rotate90.madctl(ColorOrder::Rgb), 0x60);
        assert_eq!(Rotation::Rotate180.madctl(ColorOrder::Rgb), 0xC0);
        assert_eq!(Rotation::Rotate270.madctl(ColorOrder::Rgb), 0xA0);

        assert_eq!(Rotation::Rotate0.madctl(ColorOrder::Bgr), 0x08);
        assert_eq!(Rotation::Rotate180.madctl(ColorOrder::Bgr), 0xC8);
    }

    #[test]
    fn test_swaps_axes() {
        assert!(!Rotation::Rotate0.swaps_axes());
        assert!(Rotation::Rotate90.swaps_axes());
        assert!(!Rotation::Rotate180.swaps_axes());
        assert!(Rotation::Rotate270.swaps_axes());
    }

    #[test]
    fn test_window_offset_square_glass() {
        // 240x240 glass leaves 80 rows of RAM slack.
        assert_eq!(Rotation::Rotate0.window_offset(240, 240), (0, 0));
        assert_eq!(Rotation::Rotate90.window_offset(240, 240), (0, 0));
        assert_eq!(Rotation::Rotate180.window_offset(240, 240), (0, 80));
        assert_eq!(Rotation::Rotate270.window_offset(240, 240), (80, 0));
    }

    #[test]
    fn test_window_offset_full_ram_panel() {
        // 240x320 uses the whole RAM in every orientation.
        for i in 0..4 {
            assert_eq!(Rotation::from_index(i).window_offset(240, 320), (0, 0));
        }
    }
}
