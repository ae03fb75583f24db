//! Error types for the crate
//!
//! This module defines error types for configuration building
//! ([`BuilderError`]), framebuffer construction ([`FrameBufferError`]) and
//! panel operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`FrameBufferError`] - Errors creating an off-screen framebuffer
//! - [`Error`] - Runtime errors during panel operations
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level hardware communication errors
//!
//! ## Example
//!
//! ```
//! use st7789_compositor::{Builder, BuilderError};
//!
//! // Zero dimensions are rejected at build time
//! let result = Builder::new().dimensions(0, 320).build();
//! assert!(matches!(result, Err(BuilderError::InvalidDimensions { .. })));
//! ```

use crate::interface::PanelInterface;

/// Maximum source outputs (columns) supported by the ST7789 controller
pub const MAX_COLUMNS: u16 = 240;

/// Maximum gate outputs (rows) supported by the ST7789 controller
pub const MAX_ROWS: u16 = 320;

/// Errors that can occur when interacting with the panel
///
/// Generic over the interface type to preserve the specific error type.
/// This allows error handling code to match on the underlying hardware error.
pub enum Error<I: PanelInterface> {
    /// Interface error (SPI/GPIO)
    ///
    /// Wraps the underlying hardware error from the [`PanelInterface`] implementation.
    Interface(I::Error),
    /// Invalid dimensions provided
    ///
    /// Dimensions must satisfy 1 <= cols <= [`MAX_COLUMNS`] and
    /// 1 <= rows <= [`MAX_ROWS`] in the panel's native orientation.
    InvalidDimensions {
        /// Width (columns) requested
        cols: u16,
        /// Height (rows) requested
        rows: u16,
    },
    /// The heap could not satisfy the transfer scratch allocation
    AllocationFailed {
        /// Bytes that were requested
        bytes: usize,
    },
    /// [`Panel::begin()`](crate::driver::Panel::begin) was called twice
    AlreadyInitialized,
    /// A transfer was requested before [`Panel::begin()`](crate::driver::Panel::begin)
    NotInitialized,
}

// Manual impl so the interface type itself does not need Debug,
// only its error type (which the trait already requires).
impl<I: PanelInterface> core::fmt::Debug for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => f.debug_tuple("Interface").field(e).finish(),
            Self::InvalidDimensions { cols, rows } => f
                .debug_struct("InvalidDimensions")
                .field("cols", cols)
                .field("rows", rows)
                .finish(),
            Self::AllocationFailed { bytes } => f
                .debug_struct("AllocationFailed")
                .field("bytes", bytes)
                .finish(),
            Self::AlreadyInitialized => f.write_str("AlreadyInitialized"),
            Self::NotInitialized => f.write_str("NotInitialized"),
        }
    }
}

impl<I: PanelInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(_) => write!(f, "Interface error"),
            Self::InvalidDimensions { cols, rows } => {
                write!(f, "Invalid dimensions: {cols}x{rows}")
            }
            Self::AllocationFailed { bytes } => {
                write!(f, "Scratch allocation of {bytes} bytes failed")
            }
            Self::AlreadyInitialized => write!(f, "Panel already initialized"),
            Self::NotInitialized => write!(f, "Panel not initialized"),
        }
    }
}

impl<I: PanelInterface> core::error::Error for Error<I> {}

/// Errors that can occur when building configuration
///
/// These errors occur during the builder pattern before the panel is created.
#[derive(Debug, PartialEq, Eq)]
pub enum BuilderError {
    /// Invalid dimensions provided
    ///
    /// See [`Builder::dimensions()`](crate::config::Builder::dimensions) for constraints.
    InvalidDimensions {
        /// Width (columns) requested
        cols: u16,
        /// Height (rows) requested
        rows: u16,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidDimensions { cols, rows } => write!(
                f,
                "Invalid dimensions {cols}x{rows} (max {MAX_COLUMNS}x{MAX_ROWS} native)"
            ),
        }
    }
}

impl core::error::Error for BuilderError {}

/// Errors that can occur when creating an off-screen framebuffer
#[derive(Debug, PartialEq, Eq)]
pub enum FrameBufferError {
    /// Width or height was zero
    InvalidDimensions {
        /// Width requested
        width: u16,
        /// Height requested
        height: u16,
    },
    /// The heap could not satisfy the pixel allocation
    AllocationFailed {
        /// Bytes that were requested
        bytes: usize,
    },
}

impl core::fmt::Display for FrameBufferError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => {
                write!(f, "Invalid framebuffer dimensions: {width}x{height}")
            }
            Self::AllocationFailed { bytes } => {
                write!(f, "Framebuffer allocation of {bytes} bytes failed")
            }
        }
    }
}

impl core::error::Error for FrameBufferError {}
