//! ST7789 SPI Panel Compositor
//!
//! A rendering and compositing core for ST7789-driven RGB565 panels up to
//! 240x320 pixels: RGB888 quantization with blue-noise dithering, a heap
//! framebuffer holding wire-order pixels with clipped anti-aliased
//! primitives, bounded dirty-region tracking, a double-buffered panel
//! driver and the compositor that ties them together.
//!
//! ## Features
//!
//! - `no_std` compatible (requires `alloc`)
//! - `embedded-hal` v1.0 support
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Damage-tracked partial flushes with horizontal mirroring
//! - Depth-2 queued transfers for platforms with DMA-capable buses
//!
//! ## Usage
//!
//! ```rust
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::OutputPin;
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use st7789_compositor::{Builder, Compositor, Panel, Rgb565, Rotation, SpiInterface};
//!
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiDevice for MockSpi {
//! #     fn transaction(
//! #         &mut self,
//! #         _operations: &mut [Operation<'_, u8>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let spi = MockSpi;
//! # let dc = MockPin;
//! # let rst = MockPin;
//! # let mut delay = MockDelay;
//! let interface = SpiInterface::new(spi, dc, rst);
//! let config = match Builder::new().dimensions(240, 320).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut panel = Panel::new(interface, config);
//! if panel.begin(Rotation::Rotate0, &mut delay).is_err() {
//!     return;
//! }
//!
//! let mut compositor = match Compositor::new(panel.width(), panel.height()) {
//!     Ok(compositor) => compositor,
//!     Err(_) => return,
//! };
//!
//! compositor.fill_rect(10, 10, 50, 30, Rgb565(0xF800));
//! let _ = compositor.flush(&mut panel);
//! ```

#![no_std]

extern crate alloc;

/// RGB565/RGB888 color types and wire-order pixels
pub mod color;
/// ST7789 command definitions
pub mod command;
/// Damage-tracked compositing and mirrored flush
pub mod compositor;
/// Panel configuration types and builder
pub mod config;
/// Bounded dirty-region tracking
pub mod dirty;
/// Panel bring-up and pixel streaming
pub mod driver;
/// Error types for the crate
pub mod error;
/// Heap framebuffer and drawing primitives
pub mod framebuffer;
/// RGB888 to RGB565 quantization with blue-noise dithering
pub mod frc;
/// Hardware interface abstraction
pub mod interface;
/// Coordinate rotation and RAM window offsets
pub mod rotation;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

pub use color::{DeviceColor, Rgb565, Rgb888, blend565};
pub use compositor::{Compositor, MIRROR_ROW_PIXELS};
pub use config::{Builder, ColorOrder, Config, DEFAULT_CLOCK_HZ};
pub use dirty::{DIRTY_CAPACITY, DirtyRect, DirtyTracker};
pub use driver::{Panel, SCRATCH_BYTES, SCRATCH_PIXELS};
pub use error::{BuilderError, Error, FrameBufferError, MAX_COLUMNS, MAX_ROWS};
pub use framebuffer::{ClipRect, FrameBuffer};
pub use frc::{FrcProfile, quantize565};
pub use interface::{InterfaceError, PanelInterface, SpiInterface};
pub use rotation::Rotation;
