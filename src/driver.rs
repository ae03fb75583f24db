//! ST7789 panel driver
//!
//! [`Panel`] owns the hardware interface, the rotation/window state and two
//! transfer scratch slots, and exposes the command/data/pixel-stream
//! primitives the compositor flushes through.
//!
//! ## Bring-up state machine
//!
//! `new` captures configuration without touching hardware; [`Panel::begin`]
//! performs the one-time bring-up: scratch allocation, hard reset, the
//! controller's fixed init command sequence with its inter-step delays,
//! rotation, display-on. `begin` is not repeatable — a second call is
//! rejected, and a failed call leaves the instance unusable.
//!
//! ## Transfer ordering
//!
//! Pixel streams go through [`Panel::write_data_async`], which keeps at
//! most two transfers outstanding in round-robin scratch slots (depth-2
//! double buffering). Every synchronous transaction — commands, address
//! windows — first drains the outstanding transfers, so a command can
//! never race a pixel stream on the bus.

use alloc::vec::Vec;

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::color::{DeviceColor, Rgb565};
use crate::command;
use crate::config::Config;
use crate::error::Error;
use crate::interface::PanelInterface;
use crate::rotation::Rotation;

/// Size of each transfer scratch slot in bytes
pub const SCRATCH_BYTES: usize = 8192;

/// Pixels per scratch slot
pub const SCRATCH_PIXELS: usize = SCRATCH_BYTES / 2;

/// Pixels per stack chunk on the byte-swapping and solid-fill paths
const CHUNK_PIXELS: usize = 256;

/// ST7789 panel driver over a [`PanelInterface`]
pub struct Panel<I: PanelInterface> {
    interface: I,
    config: Config,
    /// Logical (post-rotation) size
    width: u16,
    height: u16,
    /// RAM window origin applied to every address window
    x_start: u16,
    y_start: u16,
    /// Transfer scratch slots, allocated by `begin`
    slots: [Vec<u8>; 2],
    next_slot: usize,
    inflight: u8,
    initialized: bool,
}

impl<I: PanelInterface> Panel<I> {
    /// Capture configuration without touching hardware
    pub fn new(interface: I, config: Config) -> Self {
        let (width, height) = config.rotated_dimensions();
        let (x_start, y_start) = config.window_offset();
        Self {
            interface,
            config,
            width,
            height,
            x_start,
            y_start,
            slots: [Vec::new(), Vec::new()],
            next_slot: 0,
            inflight: 0,
            initialized: false,
        }
    }

    /// Logical width after rotation
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Logical height after rotation
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Active rotation
    pub fn rotation(&self) -> Rotation {
        self.config.rotation
    }

    /// True once [`begin`](Self::begin) has succeeded
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Release the underlying interface
    pub fn release(self) -> I {
        self.interface
    }

    /// One-time hardware bring-up
    ///
    /// Hard-resets the panel, then issues the controller's init sequence
    /// in strict order with its fixed delays: software reset (150ms),
    /// sleep-out (120ms), 16-bit pixel format (10ms), panel tuning block
    /// (porch, gate, VCOM, LCM, VRH/VDV, frame rate, power), inversion on
    /// (10ms), normal mode (10ms), rotation, display on (120ms). The
    /// byte-for-byte sequence is a compatibility contract with the panel.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyInitialized`] on a repeat call,
    /// [`Error::AllocationFailed`] when the scratch slots cannot be
    /// allocated, or [`Error::Interface`] on a bus failure. Any failure
    /// is permanent for this instance.
    pub fn begin<D: DelayNs>(&mut self, rotation: Rotation, delay: &mut D) -> Result<(), Error<I>> {
        if self.initialized {
            return Err(Error::AlreadyInitialized);
        }

        for slot in &mut self.slots {
            slot.try_reserve_exact(SCRATCH_BYTES)
                .map_err(|_| Error::AllocationFailed {
                    bytes: SCRATCH_BYTES,
                })?;
            slot.resize(SCRATCH_BYTES, 0);
        }

        self.interface.hard_reset(delay);
        debug!("panel reset, starting init sequence");

        self.write_command(command::SWRESET)?;
        delay.delay_ms(150);

        self.write_command(command::SLPOUT)?;
        delay.delay_ms(120);

        self.write_command(command::COLMOD)?;
        self.write_data(&[command::COLMOD_16BPP])?;
        delay.delay_ms(10);

        self.write_command(command::PORCTRL)?;
        self.write_data(&[0x0C, 0x0C, 0x00, 0x33, 0x33])?;

        self.write_command(command::GCTRL)?;
        self.write_data(&[0x35])?;

        self.write_command(command::VCOMS)?;
        self.write_data(&[0x19])?;

        self.write_command(command::LCMCTRL)?;
        self.write_data(&[0x2C])?;

        self.write_command(command::VDVVRHEN)?;
        self.write_data(&[0x01])?;

        self.write_command(command::VRHS)?;
        self.write_data(&[0x12])?;

        self.write_command(command::VDVS)?;
        self.write_data(&[0x20])?;

        self.write_command(command::FRCTRL2)?;
        self.write_data(&[0x0F])?;

        self.write_command(command::PWCTRL1)?;
        self.write_data(&[0xA4, 0xA1])?;

        self.write_command(command::INVON)?;
        delay.delay_ms(10);

        self.write_command(command::NORON)?;
        delay.delay_ms(10);

        self.apply_rotation(rotation)?;

        self.write_command(command::DISPON)?;
        delay.delay_ms(120);

        self.initialized = true;
        debug!(
            "panel up: {}x{} rotation {:?}",
            self.width, self.height, self.config.rotation
        );
        Ok(())
    }

    /// Update rotation state and write MADCTL
    fn apply_rotation(&mut self, rotation: Rotation) -> Result<(), Error<I>> {
        self.config.rotation = rotation;
        let (w, h) = self.config.rotated_dimensions();
        let (x_start, y_start) = self.config.window_offset();
        self.width = w;
        self.height = h;
        self.x_start = x_start;
        self.y_start = y_start;

        self.write_command(command::MADCTL)?;
        self.write_data(&[self.config.madctl()])
    }

    /// Block until every outstanding transfer has completed
    pub fn drain(&mut self) -> Result<(), Error<I>> {
        while self.inflight > 0 {
            self.interface.complete_oldest().map_err(Error::Interface)?;
            self.inflight -= 1;
        }
        Ok(())
    }

    /// Send a command byte, draining outstanding transfers first
    pub fn write_command(&mut self, cmd: u8) -> Result<(), Error<I>> {
        self.drain()?;
        self.interface.send_command(cmd).map_err(Error::Interface)
    }

    /// Send data bytes synchronously, draining outstanding transfers first
    pub fn write_data(&mut self, data: &[u8]) -> Result<(), Error<I>> {
        if data.is_empty() {
            return Ok(());
        }
        self.drain()?;
        self.interface.send_data(data).map_err(Error::Interface)
    }

    /// Wait until a scratch slot is free, then claim it
    fn claim_slot(&mut self) -> Result<usize, Error<I>> {
        while self.inflight >= 2 {
            self.interface.complete_oldest().map_err(Error::Interface)?;
            self.inflight -= 1;
        }
        let slot = self.next_slot;
        self.next_slot ^= 1;
        Ok(slot)
    }

    /// Queue a data transfer through the next free scratch slot
    ///
    /// The bytes are copied into driver-owned scratch, so the caller may
    /// reuse `data` immediately. Writes longer than [`SCRATCH_BYTES`] are
    /// truncated to the slot size; callers stream large payloads in
    /// chunks. At most two transfers are outstanding; when both slots are
    /// busy this blocks until the oldest completes.
    pub fn write_data_async(&mut self, data: &[u8]) -> Result<(), Error<I>> {
        if data.is_empty() {
            return Ok(());
        }
        if !self.initialized {
            return Err(Error::NotInitialized);
        }

        let slot = self.claim_slot()?;
        let len = data.len().min(SCRATCH_BYTES);
        self.slots[slot][..len].copy_from_slice(&data[..len]);
        if self
            .interface
            .queue_data(&self.slots[slot][..len])
            .map_err(Error::Interface)?
        {
            self.inflight += 1;
        }
        Ok(())
    }

    /// Open an address window and leave the controller in memory-write mode
    ///
    /// Coordinates are inclusive, pre-offset logical coordinates; the
    /// panel's RAM window origin is added here. Must precede every pixel
    /// stream.
    pub fn set_address_window(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
    ) -> Result<(), Error<I>> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }
        self.drain()?;

        let x0 = x0 + self.x_start;
        let x1 = x1 + self.x_start;
        let y0 = y0 + self.y_start;
        let y1 = y1 + self.y_start;

        self.write_command(command::CASET)?;
        self.write_data(&[(x0 >> 8) as u8, (x0 & 0xFF) as u8, (x1 >> 8) as u8, (x1 & 0xFF) as u8])?;

        self.write_command(command::RASET)?;
        self.write_data(&[(y0 >> 8) as u8, (y0 & 0xFF) as u8, (y1 >> 8) as u8, (y1 & 0xFF) as u8])?;

        self.write_command(command::RAMWR)
    }

    /// Stream device-order pixels into the open address window
    ///
    /// Chunks the stream into scratch-slot-sized queued transfers. Does
    /// not drain on return; a following synchronous call will.
    pub fn write_pixels(&mut self, pixels: &[DeviceColor]) -> Result<(), Error<I>> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }
        for chunk in pixels.chunks(SCRATCH_PIXELS) {
            let slot = self.claim_slot()?;
            let len = chunk.len() * 2;
            let buf = &mut self.slots[slot];
            for (i, px) in chunk.iter().enumerate() {
                buf[i * 2] = px.hi();
                buf[i * 2 + 1] = px.lo();
            }
            if self
                .interface
                .queue_data(&self.slots[slot][..len])
                .map_err(Error::Interface)?
            {
                self.inflight += 1;
            }
        }
        Ok(())
    }

    /// Stream host-order RGB565 pixels, swapping to wire order on the fly
    ///
    /// Swaps through a fixed stack chunk, no allocation on this path.
    pub fn write_pixels_host(&mut self, pixels: &[u16]) -> Result<(), Error<I>> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }
        let mut tmp = [0u8; CHUNK_PIXELS * 2];
        for chunk in pixels.chunks(CHUNK_PIXELS) {
            for (i, px) in chunk.iter().enumerate() {
                let [hi, lo] = px.to_be_bytes();
                tmp[i * 2] = hi;
                tmp[i * 2 + 1] = lo;
            }
            self.write_data_async(&tmp[..chunk.len() * 2])?;
        }
        Ok(())
    }

    /// Fill the whole logical screen with one color
    ///
    /// Opens a full-screen window, streams the color in fixed chunks and
    /// drains before returning, so callers may immediately reuse or free
    /// their own pixel sources.
    pub fn fill_solid(&mut self, color: Rgb565) -> Result<(), Error<I>> {
        self.set_address_window(0, 0, self.width - 1, self.height - 1)?;

        let device = DeviceColor::from_rgb565(color);
        let mut tmp = [0u8; CHUNK_PIXELS * 2];
        for i in 0..CHUNK_PIXELS {
            tmp[i * 2] = device.hi();
            tmp[i * 2 + 1] = device.lo();
        }

        let mut remaining = usize::from(self.width) * usize::from(self.height);
        while remaining > 0 {
            let n = remaining.min(CHUNK_PIXELS);
            self.write_data_async(&tmp[..n * 2])?;
            remaining -= n;
        }
        self.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Builder;
    use alloc::vec;

    /// Captured bus activity, in order
    #[derive(Debug, PartialEq, Eq)]
    enum Tx {
        Command(u8),
        Data(Vec<u8>),
        Queued(Vec<u8>),
        Completed,
    }

    /// Interface double that emulates a platform with true queuing
    #[derive(Default)]
    struct MockInterface {
        log: Vec<Tx>,
        pending: usize,
        resets: usize,
    }

    impl PanelInterface for MockInterface {
        type Error = core::convert::Infallible;

        fn send_command(&mut self, command: u8) -> Result<(), Self::Error> {
            self.log.push(Tx::Command(command));
            Ok(())
        }

        fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
            self.log.push(Tx::Data(data.to_vec()));
            Ok(())
        }

        fn queue_data(&mut self, data: &[u8]) -> Result<bool, Self::Error> {
            self.log.push(Tx::Queued(data.to_vec()));
            self.pending += 1;
            Ok(true)
        }

        fn complete_oldest(&mut self) -> Result<(), Self::Error> {
            if self.pending > 0 {
                self.pending -= 1;
                self.log.push(Tx::Completed);
            }
            Ok(())
        }

        fn hard_reset<D: DelayNs>(&mut self, _delay: &mut D) {
            self.resets += 1;
        }
    }

    struct NoopDelay;
    impl DelayNs for NoopDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn begun_panel(config: crate::config::Config, rotation: Rotation) -> Panel<MockInterface> {
        let mut panel = Panel::new(MockInterface::default(), config);
        panel.begin(rotation, &mut NoopDelay).unwrap();
        panel
    }

    /// Collapse a log into (command, concatenated payload) pairs
    fn command_pairs(log: &[Tx]) -> Vec<(u8, Vec<u8>)> {
        let mut out: Vec<(u8, Vec<u8>)> = Vec::new();
        for tx in log {
            match tx {
                Tx::Command(c) => out.push((*c, Vec::new())),
                Tx::Data(d) => {
                    if let Some(last) = out.last_mut() {
                        last.1.extend_from_slice(d);
                    }
                }
                _ => {}
            }
        }
        out
    }

    #[test]
    fn test_begin_issues_exact_init_sequence() {
        let config = Builder::new().dimensions(240, 320).build().unwrap();
        let panel = begun_panel(config, Rotation::Rotate0);
        let iface = panel.release();

        assert_eq!(iface.resets, 1);
        assert_eq!(
            command_pairs(&iface.log),
            vec![
                (0x01, vec![]),
                (0x11, vec![]),
                (0x3A, vec![0x55]),
                (0xB2, vec![0x0C, 0x0C, 0x00, 0x33, 0x33]),
                (0xB7, vec![0x35]),
                (0xBB, vec![0x19]),
                (0xC0, vec![0x2C]),
                (0xC2, vec![0x01]),
                (0xC3, vec![0x12]),
                (0xC4, vec![0x20]),
                (0xC6, vec![0x0F]),
                (0xD0, vec![0xA4, 0xA1]),
                (0x21, vec![]),
                (0x13, vec![]),
                (0x36, vec![0x08]), // BGR, rotation 0
                (0x29, vec![]),
            ]
        );
    }

    #[test]
    fn test_begin_twice_fails() {
        let config = Builder::new().build().unwrap();
        let mut panel = begun_panel(config, Rotation::Rotate0);
        assert!(matches!(
            panel.begin(Rotation::Rotate0, &mut NoopDelay),
            Err(Error::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_operations_before_begin_fail() {
        let config = Builder::new().build().unwrap();
        let mut panel = Panel::new(MockInterface::default(), config);
        assert!(matches!(
            panel.set_address_window(0, 0, 9, 9),
            Err(Error::NotInitialized)
        ));
        assert!(matches!(
            panel.write_data_async(&[0u8; 4]),
            Err(Error::NotInitialized)
        ));
        assert!(matches!(panel.fill_solid(Rgb565(0)), Err(Error::NotInitialized)));
    }

    #[test]
    fn test_rotation_swaps_logical_size() {
        let config = Builder::new().dimensions(240, 320).build().unwrap();
        let panel = begun_panel(config, Rotation::Rotate90);
        assert_eq!(panel.width(), 320);
        assert_eq!(panel.height(), 240);
        let iface = panel.release();
        let pairs = command_pairs(&iface.log);
        assert!(pairs.contains(&(0x36, vec![0x68]))); // 0x60 | BGR
    }

    #[test]
    fn test_address_window_applies_offset() {
        let config = Builder::new().dimensions(240, 240).build().unwrap();
        let mut panel = begun_panel(config, Rotation::Rotate180);
        panel.set_address_window(10, 20, 29, 39).unwrap();
        let iface = panel.release();
        let pairs = command_pairs(&iface.log);
        let n = pairs.len();
        // 240x240 glass at rotation 2 shifts the window down by 80 rows.
        assert_eq!(pairs[n - 3], (0x2A, vec![0, 10, 0, 29]));
        assert_eq!(pairs[n - 2], (0x2B, vec![0, 100, 0, 119]));
        assert_eq!(pairs[n - 1], (0x2C, vec![]));
    }

    #[test]
    fn test_async_write_truncates_to_slot() {
        let config = Builder::new().build().unwrap();
        let mut panel = begun_panel(config, Rotation::Rotate0);
        let big = vec![0xAB; SCRATCH_BYTES + 1000];
        panel.write_data_async(&big).unwrap();
        let iface = panel.release();
        let queued: Vec<&Vec<u8>> = iface
            .log
            .iter()
            .filter_map(|t| match t {
                Tx::Queued(d) => Some(d),
                _ => None,
            })
            .collect();
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].len(), SCRATCH_BYTES);
    }

    #[test]
    fn test_at_most_two_transfers_outstanding() {
        let config = Builder::new().build().unwrap();
        let mut panel = begun_panel(config, Rotation::Rotate0);
        for _ in 0..3 {
            panel.write_data_async(&[0x55; 16]).unwrap();
        }
        let iface = panel.release();
        // The third queue must wait for the oldest to complete first.
        let tail: Vec<&Tx> = iface
            .log
            .iter()
            .filter(|t| matches!(t, Tx::Queued(_) | Tx::Completed))
            .collect();
        assert!(matches!(tail[0], Tx::Queued(_)));
        assert!(matches!(tail[1], Tx::Queued(_)));
        assert!(matches!(tail[2], Tx::Completed));
        assert!(matches!(tail[3], Tx::Queued(_)));
    }

    #[test]
    fn test_sync_command_drains_first() {
        let config = Builder::new().build().unwrap();
        let mut panel = begun_panel(config, Rotation::Rotate0);
        panel.write_data_async(&[1, 2, 3]).unwrap();
        panel.write_data_async(&[4, 5, 6]).unwrap();
        panel.write_command(command::NORON).unwrap();
        let iface = panel.release();
        assert_eq!(iface.pending, 0);
        // Both completions precede the command.
        let relevant: Vec<&Tx> = iface
            .log
            .iter()
            .skip_while(|t| !matches!(t, Tx::Queued(_)))
            .collect();
        assert!(matches!(relevant[0], Tx::Queued(_)));
        assert!(matches!(relevant[1], Tx::Queued(_)));
        assert!(matches!(relevant[2], Tx::Completed));
        assert!(matches!(relevant[3], Tx::Completed));
        assert_eq!(relevant[4], &Tx::Command(command::NORON));
    }

    #[test]
    fn test_write_pixels_chunks_and_preserves_order() {
        let config = Builder::new().build().unwrap();
        let mut panel = begun_panel(config, Rotation::Rotate0);
        let pixels = vec![DeviceColor([0x12, 0x34]); SCRATCH_PIXELS + 10];
        panel.write_pixels(&pixels).unwrap();
        let iface = panel.release();
        let queued: Vec<&Vec<u8>> = iface
            .log
            .iter()
            .filter_map(|t| match t {
                Tx::Queued(d) => Some(d),
                _ => None,
            })
            .collect();
        assert_eq!(queued.len(), 2);
        assert_eq!(queued[0].len(), SCRATCH_BYTES);
        assert_eq!(queued[1].len(), 20);
        assert_eq!(&queued[1][..4], &[0x12, 0x34, 0x12, 0x34]);
    }

    #[test]
    fn test_write_pixels_host_swaps_bytes() {
        let config = Builder::new().build().unwrap();
        let mut panel = begun_panel(config, Rotation::Rotate0);
        panel.write_pixels_host(&[0xF800, 0x07E0]).unwrap();
        let iface = panel.release();
        let queued: Vec<&Vec<u8>> = iface
            .log
            .iter()
            .filter_map(|t| match t {
                Tx::Queued(d) => Some(d),
                _ => None,
            })
            .collect();
        assert_eq!(queued[0].as_slice(), &[0xF8, 0x00, 0x07, 0xE0]);
    }

    #[test]
    fn test_fill_solid_covers_screen_and_drains() {
        let config = Builder::new().dimensions(16, 16).build().unwrap();
        let mut panel = begun_panel(config, Rotation::Rotate0);
        panel.fill_solid(Rgb565(0xFFFF)).unwrap();
        let iface = panel.release();
        assert_eq!(iface.pending, 0);
        let total: usize = iface
            .log
            .iter()
            .filter_map(|t| match t {
                Tx::Queued(d) => Some(d.len()),
                _ => None,
            })
            .sum();
        assert_eq!(total, 16 * 16 * 2);
    }
}
