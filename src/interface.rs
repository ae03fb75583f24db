//! Hardware interface abstraction
//!
//! This module provides the [`PanelInterface`] trait and the [`SpiInterface`]
//! struct for communicating with the ST7789 controller over SPI.
//!
//! ## Hardware Requirements
//!
//! The ST7789 requires:
//! - SPI bus (MOSI + SCK)
//! - 2 GPIO pins:
//!   - **DC**: Data/Command select (output)
//!   - **RST**: Reset (output, active low)
//!
//! ## Queued transfers
//!
//! Besides the blocking [`send_data`](PanelInterface::send_data), the trait
//! exposes [`queue_data`](PanelInterface::queue_data) for platforms whose
//! SPI peripheral can run a transfer in the background. An implementation
//! returns `true` when the transfer is left outstanding; the driver then
//! keeps the source buffer untouched until a matching
//! [`complete_oldest`](PanelInterface::complete_oldest). The provided
//! [`SpiInterface`] transmits synchronously and always returns `false`, so
//! buffers are reusable immediately.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::OutputPin;
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use st7789_compositor::{PanelInterface, SpiInterface};
//! # use core::convert::Infallible;
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
//! # let mut delay = MockDelay;
//! // Create interface with SPI and GPIO pins
//! let mut interface = SpiInterface::new(MockSpi, MockPin, MockPin);
//!
//! // Hardware reset, then talk to the controller
//! interface.hard_reset(&mut delay);
//! let _ = interface.send_command(0x01); // Soft reset
//! let _ = interface.send_data(&[0xFF, 0x00, 0xFF]);
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Trait for hardware interface to the ST7789 controller
///
/// This trait abstracts over different hardware implementations, allowing
/// the [`Panel`](crate::driver::Panel) to work with any SPI + GPIO
/// implementation that satisfies embedded-hal traits.
///
/// ## Implementing
///
/// For most cases, use the provided [`SpiInterface`] struct. Implement this
/// trait on your own type to expose a platform DMA engine: return `true`
/// from [`queue_data`](Self::queue_data) and finish transfers in order from
/// [`complete_oldest`](Self::complete_oldest).
pub trait PanelInterface {
    /// Error type for interface operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Send a command byte to the controller
    ///
    /// The implementation must:
    /// 1. Set DC pin low (command mode)
    /// 2. Send the command byte over SPI
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error>;

    /// Send data bytes to the controller, blocking until complete
    ///
    /// The implementation must:
    /// 1. Set DC pin high (data mode)
    /// 2. Send the data bytes over SPI
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error>;

    /// Start sending data bytes, possibly in the background
    ///
    /// Returns `true` when the transfer was queued and is still in flight
    /// on return, in which case `data` must stay valid and unmodified until
    /// a matching [`complete_oldest`](Self::complete_oldest). Returns
    /// `false` when the bytes were fully transmitted before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn queue_data(&mut self, data: &[u8]) -> InterfaceResult<bool, Self::Error>;

    /// Block until the oldest queued transfer has finished
    ///
    /// Transfers complete strictly in submission order. A no-op when
    /// nothing is in flight.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-flight transfer failed.
    fn complete_oldest(&mut self) -> InterfaceResult<(), Self::Error>;

    /// Perform a hardware reset
    ///
    /// The implementation must:
    /// 1. Set RST pin low
    /// 2. Wait at least 20ms
    /// 3. Set RST pin high
    /// 4. Wait at least 150ms for the controller to settle
    ///
    /// # Arguments
    ///
    /// * `delay` - Delay implementation for timing
    fn hard_reset<D: DelayNs>(&mut self, delay: &mut D);
}

/// Errors that can occur at the interface level
///
/// Generic over SPI and GPIO error types.
#[derive(Debug)]
pub enum InterfaceError<SpiErr, PinErr> {
    /// SPI communication error
    Spi(SpiErr),
    /// GPIO pin error
    Pin(PinErr),
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI error: {e:?}"),
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

/// Hardware interface implementation for ST7789
///
/// Implements [`PanelInterface`] for embedded-hal v1.0 SPI and GPIO traits.
/// All transfers are synchronous; [`queue_data`](PanelInterface::queue_data)
/// degrades to a blocking write.
///
/// ## Type Parameters
///
/// * `SPI` - SPI device implementing [`SpiDevice`]
/// * `DC` - Data/Command pin implementing [`OutputPin`]
/// * `RST` - Reset pin implementing [`OutputPin`]
pub struct SpiInterface<SPI, DC, RST> {
    /// SPI device for communication
    spi: SPI,
    /// Data/Command select pin (low=command, high=data)
    dc: DC,
    /// Reset pin (active low)
    rst: RST,
}

impl<SPI, DC, RST> SpiInterface<SPI, DC, RST>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
{
    /// Create a new interface
    ///
    /// # Arguments
    ///
    /// * `spi` - SPI device (must implement [`SpiDevice`])
    /// * `dc` - Data/Command pin (output, low=command, high=data)
    /// * `rst` - Reset pin (output, active low)
    pub fn new(spi: SPI, dc: DC, rst: RST) -> Self {
        Self { spi, dc, rst }
    }

    /// Release the SPI device and pins
    pub fn release(self) -> (SPI, DC, RST) {
        (self.spi, self.dc, self.rst)
    }
}

impl<SPI, DC, RST, PinErr> PanelInterface for SpiInterface<SPI, DC, RST>
where
    SPI: SpiDevice,
    SPI::Error: Debug,
    DC: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    PinErr: Debug,
{
    type Error = InterfaceError<SPI::Error, PinErr>;

    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error> {
        self.dc.set_low().map_err(InterfaceError::Pin)?;
        self.spi.write(&[command]).map_err(InterfaceError::Spi)?;
        Ok(())
    }

    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.dc.set_high().map_err(InterfaceError::Pin)?;
        self.spi.write(data).map_err(InterfaceError::Spi)?;
        Ok(())
    }

    fn queue_data(&mut self, data: &[u8]) -> InterfaceResult<bool, Self::Error> {
        self.send_data(data)?;
        Ok(false)
    }

    fn complete_oldest(&mut self) -> InterfaceResult<(), Self::Error> {
        Ok(())
    }

    fn hard_reset<D: DelayNs>(&mut self, delay: &mut D) {
        // Reset sequence: LOW -> wait 20ms -> HIGH -> settle 150ms
        let _ = self.rst.set_low();
        delay.delay_ms(20);
        let _ = self.rst.set_high();
        delay.delay_ms(150);
    }
}
