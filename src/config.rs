//! Panel configuration types and builder

use crate::rotation::Rotation;

pub use crate::error::{BuilderError, MAX_COLUMNS, MAX_ROWS};

/// Default SPI clock hint, the speed most ST7789 modules tolerate
pub const DEFAULT_CLOCK_HZ: u32 = 80_000_000;

/// Subpixel wiring order of the panel
///
/// Most ST7789 modules wire the panel BGR even though the controller
/// defaults to RGB, hence [`ColorOrder::Bgr`] is the default here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorOrder {
    /// Red subpixel first
    Rgb,
    /// Blue subpixel first
    #[default]
    Bgr,
}

/// Panel configuration
///
/// This struct holds all configurable parameters for the ST7789 controller.
/// Use [`Builder`] to create a `Config`.
#[derive(Clone, Debug)]
pub struct Config {
    /// Panel width in the native (unrotated) orientation
    pub width: u16,
    /// Panel height in the native (unrotated) orientation
    pub height: u16,
    /// Display rotation
    pub rotation: Rotation,
    /// Subpixel wiring order
    pub color_order: ColorOrder,
    /// RAM window origin override, post-rotation coordinates
    ///
    /// `None` derives the origin from the rotation and panel size, which
    /// is correct for 240x240 and 240x320 glass. Set this for modules
    /// whose glass is bonded at an unusual RAM offset.
    pub window_offset: Option<(u16, u16)>,
    /// SPI clock hint in Hz
    ///
    /// embedded-hal 1.0 fixes the bus speed when the `SpiDevice` is
    /// constructed, so this is a hint for the embedder's bus setup, not
    /// something the driver applies itself.
    pub clock_speed_hz: u32,
}

impl Config {
    /// Panel dimensions after rotation, as `(width, height)`
    pub const fn rotated_dimensions(&self) -> (u16, u16) {
        if self.rotation.swaps_axes() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    /// RAM window origin, honoring any override
    pub const fn window_offset(&self) -> (u16, u16) {
        match self.window_offset {
            Some(origin) => origin,
            None => self.rotation.window_offset(self.width, self.height),
        }
    }

    /// MADCTL register value for this configuration
    pub const fn madctl(&self) -> u8 {
        self.rotation.madctl(self.color_order)
    }
}

/// Builder for constructing panel configuration
///
/// Defaults describe a full-RAM 240x320 module in portrait with BGR
/// wiring.
///
/// # Example
///
/// ```rust,no_run
/// use st7789_compositor::{Builder, Rotation};
///
/// let config = match Builder::new()
///     .dimensions(240, 240)
///     .rotation(Rotation::Rotate90)
///     .build()
/// {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// let _ = config;
/// ```
#[must_use]
pub struct Builder {
    width: u16,
    height: u16,
    rotation: Rotation,
    color_order: ColorOrder,
    window_offset: Option<(u16, u16)>,
    clock_speed_hz: u32,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            width: MAX_COLUMNS,
            height: MAX_ROWS,
            rotation: Rotation::Rotate0,
            color_order: ColorOrder::Bgr,
            window_offset: None,
            clock_speed_hz: DEFAULT_CLOCK_HZ,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set panel dimensions in the native orientation
    pub fn dimensions(mut self, width: u16, height: u16) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set display rotation
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set subpixel wiring order
    pub fn color_order(mut self, color_order: ColorOrder) -> Self {
        self.color_order = color_order;
        self
    }

    /// Override the RAM window origin (post-rotation coordinates)
    pub fn window_offset(mut self, x: u16, y: u16) -> Self {
        self.window_offset = Some((x, y));
        self
    }

    /// Set the SPI clock hint; zero selects [`DEFAULT_CLOCK_HZ`]
    pub fn clock_speed(mut self, hz: u32) -> Self {
        self.clock_speed_hz = if hz == 0 { DEFAULT_CLOCK_HZ } else { hz };
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::InvalidDimensions`] when a dimension is zero
    /// or exceeds the controller RAM (240 columns by 320 rows native).
    pub fn build(self) -> Result<Config, BuilderError> {
        let (cols, rows) = (self.width, self.height);
        if cols == 0 || cols > MAX_COLUMNS || rows == 0 || rows > MAX_ROWS {
            return Err(BuilderError::InvalidDimensions { cols, rows });
        }
        Ok(Config {
            width: self.width,
            height: self.height,
            rotation: self.rotation,
            color_order: self.color_order,
            window_offset: self.window_offset,
            clock_speed_hz: self.clock_speed_hz,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Builder::new().build().unwrap();
        assert_eq!(config.width, 240);
        assert_eq!(config.height, 320);
        assert_eq!(config.rotation, Rotation::Rotate0);
        assert_eq!(config.color_order, ColorOrder::Bgr);
        assert_eq!(config.window_offset(), (0, 0));
        assert_eq!(config.clock_speed_hz, DEFAULT_CLOCK_HZ);
        assert_eq!(config.madctl(), 0x08);
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        assert!(matches!(
            Builder::new().dimensions(0, 320).build(),
            Err(BuilderError::InvalidDimensions { cols: 0, rows: 320 })
        ));
        assert!(Builder::new().dimensions(241, 320).build().is_err());
        assert!(Builder::new().dimensions(240, 321).build().is_err());
        assert!(Builder::new().dimensions(240, 0).build().is_err());
    }

    #[test]
    fn test_rotated_dimensions() {
        let config = Builder::new()
            .dimensions(240, 320)
            .rotation(Rotation::Rotate90)
            .build()
            .unwrap();
        assert_eq!(config.rotated_dimensions(), (320, 240));
    }

    #[test]
    fn test_window_offset_derived_and_overridden() {
        let derived = Builder::new()
            .dimensions(240, 240)
            .rotation(Rotation::Rotate180)
            .build()
            .unwrap();
        assert_eq!(derived.window_offset(), (0, 80));

        let forced = Builder::new()
            .dimensions(240, 240)
            .rotation(Rotation::Rotate180)
            .window_offset(0, 0)
            .build()
            .unwrap();
        assert_eq!(forced.window_offset(), (0, 0));
    }
}
