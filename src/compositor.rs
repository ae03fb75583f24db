//! Damage-tracked compositor
//!
//! [`Compositor`] glues the framebuffer, the dirty-region tracker and the
//! panel driver together: every draw call mutates the framebuffer and
//! records the touched bounding box, and a single [`Compositor::flush`]
//! pushes exactly the damaged sub-rectangles to the panel.
//!
//! The panel is mounted column-reversed relative to the framebuffer's
//! logical layout, so the push path mirrors horizontally: the address
//! window lands at `mx = panel_width - x - w` and each row is streamed in
//! reversed pixel order through a fixed stack scratch buffer.

use alloc::vec::Vec;

use log::warn;

use crate::color::{Rgb565, Rgb888};
use crate::dirty::{DIRTY_CAPACITY, DirtyRect, DirtyTracker};
use crate::driver::Panel;
use crate::error::{Error, FrameBufferError};
use crate::framebuffer::{ClipRect, FrameBuffer};
use crate::frc::FrcProfile;
use crate::interface::PanelInterface;

/// Row capacity of the mirror scratch buffer, in pixels
///
/// Dirty rectangles wider than this are dropped from the flush with a
/// warning rather than chunked. This covers every supported panel
/// orientation (native columns cap at 240, rotated rows at 320).
pub const MIRROR_ROW_PIXELS: usize = 320;

/// Marker color for the debug overlay borders
const OVERLAY_COLOR: Rgb565 = Rgb565(0xF800);

/// Framebuffer + damage tracking + mirrored panel push
pub struct Compositor {
    frame: FrameBuffer,
    tracker: DirtyTracker,
    seed: u32,
    profile: FrcProfile,
    debug_overlay: bool,
}

impl Compositor {
    /// Create a compositor with a fresh framebuffer of the given size
    ///
    /// # Errors
    ///
    /// Forwards [`FrameBufferError`] when the dimensions are invalid or
    /// the pixel store cannot be allocated.
    pub fn new(width: u16, height: u16) -> Result<Self, FrameBufferError> {
        Ok(Self {
            frame: FrameBuffer::new(width, height)?,
            tracker: DirtyTracker::new(width, height),
            seed: 0,
            profile: FrcProfile::default(),
            debug_overlay: false,
        })
    }

    /// Read-only access to the backing framebuffer
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Seed used for temporal dither decorrelation
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Change the dither seed, typically once per frame
    pub fn set_seed(&mut self, seed: u32) {
        self.seed = seed;
    }

    /// Active quantization profile for the RGB888 entry points
    pub fn profile(&self) -> FrcProfile {
        self.profile
    }

    /// Change the quantization profile
    pub fn set_profile(&mut self, profile: FrcProfile) {
        self.profile = profile;
    }

    /// Toggle the dirty-rect debug borders drawn during flush
    pub fn set_debug_overlay(&mut self, enabled: bool) {
        self.debug_overlay = enabled;
    }

    /// Restrict subsequent draws to a window of the framebuffer
    pub fn set_clip(&mut self, x: i16, y: i16, w: i16, h: i16) {
        self.frame.set_clip(x, y, w, h);
    }

    /// Restore the clip to the full framebuffer
    pub fn reset_clip(&mut self) {
        self.frame.reset_clip();
    }

    /// Active clip rectangle
    pub fn clip(&self) -> ClipRect {
        self.frame.clip()
    }

    /// Record damage without drawing, e.g. after direct frame access
    pub fn invalidate(&mut self, x: i16, y: i16, w: i16, h: i16) {
        self.tracker.invalidate(x, y, w, h);
    }

    /// Pending damage rectangle count, for diagnostics
    pub fn pending_damage(&self) -> usize {
        self.tracker.len()
    }

    // Draw wrappers: each mutates the framebuffer and records the
    // touched bounding box. AA primitives pad the box by one pixel to
    // cover coverage spill.

    // The padded boxes are computed in i32 and clamped to the frame
    // before they reach the tracker, since padding can push edges past
    // i16 range even for shapes that land on screen.
    fn damage(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(i32::from(self.frame.width()));
        let y1 = (y + h).min(i32::from(self.frame.height()));
        if x0 < x1 && y0 < y1 {
            self.tracker
                .invalidate(x0 as i16, y0 as i16, (x1 - x0) as i16, (y1 - y0) as i16);
        }
    }

    /// Set one pixel
    pub fn draw_pixel(&mut self, x: i16, y: i16, color: Rgb565) {
        self.frame.draw_pixel(x, y, color);
        self.tracker.invalidate(x, y, 1, 1);
    }

    /// Set one pixel from RGB888 through the quantizer
    pub fn draw_pixel_rgb(&mut self, x: i16, y: i16, color: Rgb888) {
        self.frame
            .draw_pixel_rgb(x, y, color, self.seed, self.profile);
        self.tracker.invalidate(x, y, 1, 1);
    }

    /// Alpha-blend one pixel
    pub fn blend_pixel(&mut self, x: i16, y: i16, color: Rgb565, alpha: u8) {
        self.frame.blend_pixel(x, y, color, alpha);
        self.tracker.invalidate(x, y, 1, 1);
    }

    /// Fill a rectangle
    pub fn fill_rect(&mut self, x: i16, y: i16, w: i16, h: i16, color: Rgb565) {
        self.frame.fill_rect(x, y, w, h, color);
        self.tracker.invalidate(x, y, w, h);
    }

    /// Fill a rectangle from RGB888, dithered
    pub fn fill_rect_rgb(&mut self, x: i16, y: i16, w: i16, h: i16, color: Rgb888) {
        self.frame
            .fill_rect_rgb(x, y, w, h, color, self.seed, self.profile);
        self.tracker.invalidate(x, y, w, h);
    }

    /// Outline a rectangle
    pub fn draw_rect(&mut self, x: i16, y: i16, w: i16, h: i16, color: Rgb565) {
        self.frame.draw_rect(x, y, w, h, color);
        self.tracker.invalidate(x, y, w, h);
    }

    /// Draw an anti-aliased line
    pub fn draw_line(&mut self, x0: i16, y0: i16, x1: i16, y1: i16, color: Rgb565) {
        self.frame.draw_line(x0, y0, x1, y1, color);
        let x = i32::from(x0.min(x1)) - 1;
        let y = i32::from(y0.min(y1)) - 1;
        let w = i32::from(x0.max(x1)) - x + 2;
        let h = i32::from(y0.max(y1)) - y + 2;
        self.damage(x, y, w, h);
    }

    /// Fill a rounded rectangle
    pub fn fill_round_rect(&mut self, x: i16, y: i16, w: i16, h: i16, r: i16, color: Rgb565) {
        self.frame.fill_round_rect(x, y, w, h, r, color);
        self.damage(
            i32::from(x) - 1,
            i32::from(y) - 1,
            i32::from(w) + 2,
            i32::from(h) + 2,
        );
    }

    /// Outline a rounded rectangle
    pub fn draw_round_rect(&mut self, x: i16, y: i16, w: i16, h: i16, r: i16, color: Rgb565) {
        self.frame.draw_round_rect(x, y, w, h, r, color);
        self.damage(
            i32::from(x) - 1,
            i32::from(y) - 1,
            i32::from(w) + 2,
            i32::from(h) + 2,
        );
    }

    /// Fill an anti-aliased circle
    pub fn fill_circle(&mut self, cx: i16, cy: i16, r: i16, color: Rgb565) {
        self.frame.fill_circle(cx, cy, r, color);
        let d = i32::from(r) + 1;
        self.damage(
            i32::from(cx) - d,
            i32::from(cy) - d,
            2 * d + 1,
            2 * d + 1,
        );
    }

    /// Blit a host-order pixel image
    pub fn push_image(&mut self, x: i16, y: i16, w: i16, h: i16, pixels: &[Rgb565]) {
        self.frame.push_image(x, y, w, h, pixels);
        self.tracker.invalidate(x, y, w, h);
    }

    /// Pre-dithered full-frame fill through the quantizer
    pub fn fill_rgb(&mut self, color: Rgb888) {
        self.frame.fill_rgb(color, self.seed, self.profile);
        let (w, h) = (self.frame.width() as i16, self.frame.height() as i16);
        self.tracker.invalidate(0, 0, w, h);
    }

    /// Clear both the framebuffer and the panel to one color
    ///
    /// A full-screen clear supersedes any pending damage, so the tracker
    /// is reset rather than flushed.
    pub fn fill_solid<I: PanelInterface>(
        &mut self,
        panel: &mut Panel<I>,
        color: Rgb565,
    ) -> Result<(), Error<I>> {
        self.frame.fill(color);
        self.tracker.clear();
        panel.fill_solid(color)
    }

    /// Push every damaged region to the panel, mirrored horizontally
    ///
    /// Drains the tracker on success; on an interface error the damage
    /// list is left intact so the caller can retry the flush.
    pub fn flush<I: PanelInterface>(&mut self, panel: &mut Panel<I>) -> Result<(), Error<I>> {
        let rects: heapless::Vec<DirtyRect, DIRTY_CAPACITY> =
            self.tracker.rects().iter().copied().collect();

        for rect in &rects {
            self.push_rect(panel, *rect)?;
        }
        self.tracker.clear();
        panel.drain()
    }

    fn push_rect<I: PanelInterface>(
        &mut self,
        panel: &mut Panel<I>,
        rect: DirtyRect,
    ) -> Result<(), Error<I>> {
        let fw = i32::from(self.frame.width());
        let fh = i32::from(self.frame.height());
        let x0 = i32::from(rect.x).max(0);
        let y0 = i32::from(rect.y).max(0);
        let x1 = (i32::from(rect.x) + i32::from(rect.w)).min(fw);
        let y1 = (i32::from(rect.y) + i32::from(rect.h)).min(fh);
        if x0 >= x1 || y0 >= y1 {
            return Ok(());
        }
        let w = (x1 - x0) as usize;
        let h = (y1 - y0) as usize;

        if w > MIRROR_ROW_PIXELS {
            warn!("dropping {w}px-wide damage row, exceeds mirror scratch");
            return Ok(());
        }

        let mx = i32::from(panel.width()) - x1;
        if mx < 0 {
            warn!("damage rect at {x0},{y0} lies outside the panel, dropped");
            return Ok(());
        }

        let saved = if self.debug_overlay {
            Some(self.overlay_mark(x0 as i16, y0 as i16, w as i16, h as i16))
        } else {
            None
        };

        let result = self.push_mirrored(panel, x0 as i16, y0 as i16, w, h, mx as u16);

        if let Some(saved) = saved {
            self.overlay_restore(x0 as i16, y0 as i16, w as i16, h as i16, &saved);
        }
        result
    }

    fn push_mirrored<I: PanelInterface>(
        &mut self,
        panel: &mut Panel<I>,
        x: i16,
        y: i16,
        w: usize,
        h: usize,
        mx: u16,
    ) -> Result<(), Error<I>> {
        panel.set_address_window(
            mx,
            y as u16,
            mx + w as u16 - 1,
            y as u16 + h as u16 - 1,
        )?;

        let mut scratch = [crate::color::DeviceColor([0, 0]); MIRROR_ROW_PIXELS];
        for row in 0..h {
            if let Some(span) = self.frame.row_span(x, y + row as i16, w as i16) {
                for (i, px) in span.iter().rev().enumerate() {
                    scratch[i] = *px;
                }
                panel.write_pixels(&scratch[..w])?;
            }
        }
        Ok(())
    }

    /// Save the rect's perimeter pixels and overwrite them with the marker
    fn overlay_mark(&mut self, x: i16, y: i16, w: i16, h: i16) -> Vec<Rgb565> {
        let saved_clip = self.frame.clip();
        self.frame.reset_clip();

        let mut saved = Vec::new();
        for (px, py) in perimeter(x, y, w, h) {
            if let Some(c) = self.frame.pixel(px, py) {
                saved.push(c);
                self.frame.draw_pixel(px, py, OVERLAY_COLOR);
            }
        }

        let c = saved_clip;
        self.frame.set_clip(c.x, c.y, c.w, c.h);
        saved
    }

    fn overlay_restore(&mut self, x: i16, y: i16, w: i16, h: i16, saved: &[Rgb565]) {
        let saved_clip = self.frame.clip();
        self.frame.reset_clip();

        let mut it = saved.iter();
        for (px, py) in perimeter(x, y, w, h) {
            if self.frame.pixel(px, py).is_some() {
                if let Some(c) = it.next() {
                    self.frame.draw_pixel(px, py, *c);
                }
            }
        }

        let c = saved_clip;
        self.frame.set_clip(c.x, c.y, c.w, c.h);
    }
}

/// Perimeter coordinates of a rect, top row, bottom row, then side columns
fn perimeter(x: i16, y: i16, w: i16, h: i16) -> impl Iterator<Item = (i16, i16)> {
    let top = (x..x + w).map(move |px| (px, y));
    let bottom = (x..x + w)
        .filter(move |_| h > 1)
        .map(move |px| (px, y + h - 1));
    let left = (y + 1..y + h - 1).map(move |py| (x, py));
    let right = (y + 1..y + h - 1)
        .filter(move |_| w > 1)
        .map(move |py| (x + w - 1, py));
    top.chain(bottom).chain(left).chain(right)
}
