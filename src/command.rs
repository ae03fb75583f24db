//! ST7789 command set
//!
//! Only the commands this driver actually issues. Values follow the
//! Sitronix ST7789V datasheet, section 8. Commands are sent over SPI with
//! the DC pin low for the command byte and high for parameter bytes.

/// Software reset
pub const SWRESET: u8 = 0x01;
/// Sleep out
pub const SLPOUT: u8 = 0x11;
/// Normal display mode on
pub const NORON: u8 = 0x13;
/// Display inversion on
pub const INVON: u8 = 0x21;
/// Display on
pub const DISPON: u8 = 0x29;
/// Column address set
pub const CASET: u8 = 0x2A;
/// Row address set
pub const RASET: u8 = 0x2B;
/// Memory write
pub const RAMWR: u8 = 0x2C;
/// Memory data access control
pub const MADCTL: u8 = 0x36;
/// Interface pixel format
pub const COLMOD: u8 = 0x3A;
/// Porch setting
pub const PORCTRL: u8 = 0xB2;
/// Gate control
pub const GCTRL: u8 = 0xB7;
/// VCOM setting
pub const VCOMS: u8 = 0xBB;
/// LCM control
pub const LCMCTRL: u8 = 0xC0;
/// VDV and VRH command enable
pub const VDVVRHEN: u8 = 0xC2;
/// VRH set
pub const VRHS: u8 = 0xC3;
/// VDV set
pub const VDVS: u8 = 0xC4;
/// Frame rate control in normal mode
pub const FRCTRL2: u8 = 0xC6;
/// Power control 1
pub const PWCTRL1: u8 = 0xD0;

/// COLMOD value selecting 65K colors, 16 bits per pixel
pub const COLMOD_16BPP: u8 = 0x55;

/// MADCTL row/column exchange and mirror bits per rotation step
pub const MADCTL_ROTATIONS: [u8; 4] = [0x00, 0x60, 0xC0, 0xA0];

/// MADCTL BGR color-order bit
pub const MADCTL_BGR: u8 = 0x08;
