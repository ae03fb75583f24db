//! Off-screen framebuffer with clipped primitives
//!
//! The framebuffer owns a heap array of `width * height` pixels stored as
//! [`DeviceColor`] (wire byte order), so a flush streams rows to the panel
//! without any per-pixel conversion. All drawing respects the intersection
//! of the buffer bounds and the active clip rectangle, and every primitive
//! silently no-ops on degenerate input instead of erroring.
//!
//! Diagonal lines and rounded edges are anti-aliased by blending against
//! the existing pixel, which is why the primitives take host-order
//! [`Rgb565`] and convert on store.
//!
//! The `*_rgb` entry points accept 24-bit color and run it through the
//! quantizer (see [`crate::frc`]) per pixel, so gradients dither instead
//! of banding.

use alloc::vec::Vec;

use libm::{floorf, sqrtf};

use crate::color::{DeviceColor, Rgb565, Rgb888, blend565};
use crate::error::FrameBufferError;
use crate::frc::{FrcProfile, quantize565};

/// Active clip rectangle, always normalized to the buffer bounds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClipRect {
    /// Left edge
    pub x: i16,
    /// Top edge
    pub y: i16,
    /// Width in pixels, zero disables drawing
    pub w: i16,
    /// Height in pixels, zero disables drawing
    pub h: i16,
}

/// Heap-owned pixel surface in device byte order
pub struct FrameBuffer {
    width: i16,
    height: i16,
    clip: ClipRect,
    buf: Vec<DeviceColor>,
}

impl FrameBuffer {
    /// Create a framebuffer, zero-initialized (black), clip at full bounds
    ///
    /// # Errors
    ///
    /// Returns [`FrameBufferError::InvalidDimensions`] when either
    /// dimension is zero or exceeds `i16::MAX`, and
    /// [`FrameBufferError::AllocationFailed`] when the heap cannot hold
    /// the pixel array. A failed creation leaves no allocation behind.
    pub fn new(width: u16, height: u16) -> Result<Self, FrameBufferError> {
        if width == 0 || height == 0 || width > i16::MAX as u16 || height > i16::MAX as u16 {
            return Err(FrameBufferError::InvalidDimensions { width, height });
        }

        let pixels = usize::from(width) * usize::from(height);
        let bytes = pixels * core::mem::size_of::<DeviceColor>();
        let mut buf = Vec::new();
        buf.try_reserve_exact(pixels)
            .map_err(|_| FrameBufferError::AllocationFailed { bytes })?;
        buf.resize(pixels, DeviceColor::from_rgb565(Rgb565(0)));

        let width = width as i16;
        let height = height as i16;
        Ok(Self {
            width,
            height,
            clip: ClipRect {
                x: 0,
                y: 0,
                w: width,
                h: height,
            },
            buf,
        })
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.width as u16
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.height as u16
    }

    /// Current clip rectangle
    pub fn clip(&self) -> ClipRect {
        self.clip
    }

    /// Set the clip rectangle, normalized immediately
    ///
    /// A negative origin is trimmed, overflow is clamped to the buffer
    /// bounds. A resulting zero-area clip disables all drawing until the
    /// clip is reset.
    pub fn set_clip(&mut self, x: i16, y: i16, w: i16, h: i16) {
        let mut cx = i32::from(x);
        let mut cy = i32::from(y);
        let mut cw = i32::from(w).max(0);
        let mut ch = i32::from(h).max(0);

        if cx < 0 {
            cw += cx;
            cx = 0;
        }
        if cy < 0 {
            ch += cy;
            cy = 0;
        }
        if cx + cw > i32::from(self.width) {
            cw = i32::from(self.width) - cx;
        }
        if cy + ch > i32::from(self.height) {
            ch = i32::from(self.height) - cy;
        }

        self.clip = ClipRect {
            x: cx as i16,
            y: cy as i16,
            w: cw.max(0) as i16,
            h: ch.max(0) as i16,
        };
    }

    /// Reset the clip to the full buffer
    pub fn reset_clip(&mut self) {
        self.clip = ClipRect {
            x: 0,
            y: 0,
            w: self.width,
            h: self.height,
        };
    }

    fn clip_test(&self, x: i16, y: i16) -> bool {
        x >= self.clip.x
            && y >= self.clip.y
            && x < self.clip.x + self.clip.w
            && y < self.clip.y + self.clip.h
    }

    fn index(&self, x: i16, y: i16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Read a pixel, `None` outside the buffer
    pub fn pixel(&self, x: i16, y: i16) -> Option<Rgb565> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some(self.buf[self.index(x, y)].to_rgb565())
    }

    /// Fill the whole buffer, ignoring the clip rectangle
    pub fn fill(&mut self, color: Rgb565) {
        self.buf.fill(DeviceColor::from_rgb565(color));
    }

    /// Write one pixel, clipped
    pub fn draw_pixel(&mut self, x: i16, y: i16, color: Rgb565) {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return;
        }
        if !self.clip_test(x, y) {
            return;
        }
        let i = self.index(x, y);
        self.buf[i] = DeviceColor::from_rgb565(color);
    }

    /// Fill a rectangle, clipped
    ///
    /// Takes a direct row-fill path when the clip is at full bounds and
    /// the rectangle is entirely inside the buffer; otherwise falls back
    /// to a clamped span loop.
    pub fn fill_rect(&mut self, x: i16, y: i16, w: i16, h: i16, color: Rgb565) {
        if w <= 0 || h <= 0 {
            return;
        }

        let v = DeviceColor::from_rgb565(color);
        let clip_full = self.clip.x == 0
            && self.clip.y == 0
            && self.clip.w == self.width
            && self.clip.h == self.height;

        if clip_full
            && x >= 0
            && y >= 0
            && i32::from(x) + i32::from(w) <= i32::from(self.width)
            && i32::from(y) + i32::from(h) <= i32::from(self.height)
        {
            let stride = self.width as usize;
            for yy in 0..h {
                let start = (y + yy) as usize * stride + x as usize;
                self.buf[start..start + w as usize].fill(v);
            }
            return;
        }

        if self.clip.w == 0 || self.clip.h == 0 {
            return;
        }

        // Inclusive bounds, clamped to the buffer and then to the clip.
        let mut x0 = i32::from(x);
        let mut y0 = i32::from(y);
        let mut x1 = i32::from(x) + i32::from(w) - 1;
        let mut y1 = i32::from(y) + i32::from(h) - 1;

        x0 = x0.max(0).max(i32::from(self.clip.x));
        y0 = y0.max(0).max(i32::from(self.clip.y));
        x1 = x1
            .min(i32::from(self.width) - 1)
            .min(i32::from(self.clip.x) + i32::from(self.clip.w) - 1);
        y1 = y1
            .min(i32::from(self.height) - 1)
            .min(i32::from(self.clip.y) + i32::from(self.clip.h) - 1);
        if x0 > x1 || y0 > y1 {
            return;
        }

        let stride = self.width as usize;
        let span = (x1 - x0 + 1) as usize;
        for yy in y0..=y1 {
            let start = yy as usize * stride + x0 as usize;
            self.buf[start..start + span].fill(v);
        }
    }

    /// Outline a rectangle with 1-pixel edges, clipped
    pub fn draw_rect(&mut self, x: i16, y: i16, w: i16, h: i16, color: Rgb565) {
        if w <= 0 || h <= 0 {
            return;
        }
        let (x, y) = (i32::from(x), i32::from(y));
        let (w, h) = (i32::from(w), i32::from(h));
        self.fill_rect_i32(x, y, w, 1, color);
        self.fill_rect_i32(x, y + h - 1, w, 1, color);
        self.fill_rect_i32(x, y, 1, h, color);
        self.fill_rect_i32(x + w - 1, y, 1, h, color);
    }

    /// Blend `fg` over the existing pixel at `alpha / 255` opacity, clipped
    pub fn blend_pixel(&mut self, x: i16, y: i16, fg: Rgb565, alpha: u8) {
        if alpha == 0 {
            return;
        }
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return;
        }
        if !self.clip_test(x, y) {
            return;
        }
        let i = self.index(x, y);
        let bg = self.buf[i].to_rgb565();
        self.buf[i] = DeviceColor::from_rgb565(blend565(bg, fg, alpha));
    }

    // i32-domain entry points for the curved primitives, whose corner and
    // edge arithmetic can leave i16 range even when the shape itself is
    // on-screen. Coordinates are clamped to the buffer before narrowing,
    // so the casts below are lossless.
    fn fill_rect_i32(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb565) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(i32::from(self.width));
        let y1 = (y + h).min(i32::from(self.height));
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        self.fill_rect(x0 as i16, y0 as i16, (x1 - x0) as i16, (y1 - y0) as i16, color);
    }

    fn draw_pixel_i32(&mut self, x: i32, y: i32, color: Rgb565) {
        if x < 0 || y < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
            return;
        }
        self.draw_pixel(x as i16, y as i16, color);
    }

    fn blend_pixel_i32(&mut self, x: i32, y: i32, fg: Rgb565, alpha: u8) {
        if x < 0 || y < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
            return;
        }
        self.blend_pixel(x as i16, y as i16, fg, alpha);
    }

    /// Draw a line, clipped
    ///
    /// Axis-aligned lines degrade to [`fill_rect`](Self::fill_rect) (exact,
    /// no blending). Diagonal lines rasterize with Wu's algorithm: the two
    /// pixels straddling the ideal line each get a coverage-weighted blend
    /// against the destination.
    pub fn draw_line(&mut self, x0: i16, y0: i16, x1: i16, y1: i16, color: Rgb565) {
        if self.clip.w == 0 || self.clip.h == 0 {
            return;
        }

        let (mut x0, mut y0, mut x1, mut y1) = (x0, y0, x1, y1);

        if y0 == y1 {
            if x1 < x0 {
                core::mem::swap(&mut x0, &mut x1);
            }
            let span = i32::from(x1) - i32::from(x0) + 1;
            self.fill_rect_i32(i32::from(x0), i32::from(y0), span, 1, color);
            return;
        }
        if x0 == x1 {
            if y1 < y0 {
                core::mem::swap(&mut y0, &mut y1);
            }
            let span = i32::from(y1) - i32::from(y0) + 1;
            self.fill_rect_i32(i32::from(x0), i32::from(y0), 1, span, color);
            return;
        }

        let run = i32::from(x1) - i32::from(x0);
        let rise = i32::from(y1) - i32::from(y0);
        let steep = rise.abs() > run.abs();
        if steep {
            core::mem::swap(&mut x0, &mut y0);
            core::mem::swap(&mut x1, &mut y1);
        }
        if x0 > x1 {
            core::mem::swap(&mut x0, &mut x1);
            core::mem::swap(&mut y0, &mut y1);
        }

        let gradient = (i32::from(y1) - i32::from(y0)) as f32 / (i32::from(x1) - i32::from(x0)) as f32;

        let put = |fb: &mut Self, x: i16, y: i32, a: u8| {
            if steep {
                fb.blend_pixel_i32(y, i32::from(x), color, a);
            } else {
                fb.blend_pixel_i32(i32::from(x), y, color, a);
            }
        };

        // Integer endpoints sit exactly on the grid: half coverage each.
        put(self, x0, i32::from(y0), 127);
        put(self, x1, i32::from(y1), 127);

        let mut intery = f32::from(y0) + gradient;
        for x in (x0 + 1)..x1 {
            let base = floorf(intery);
            let frac = intery - base;
            let y = base as i32;
            put(self, x, y, coverage(1.0 - frac));
            put(self, x, y + 1, coverage(frac));
            intery += gradient;
        }
    }

    /// Fill a rounded rectangle, clipped, corners anti-aliased
    ///
    /// The body is filled with horizontal spans found by an integer
    /// boundary search; the 1-pixel corner edge band is blended from a
    /// square-root coverage evaluation, in two passes (vertical-dominant
    /// then horizontal-dominant) so the quadrant poles are not
    /// double-counted.
    pub fn fill_round_rect(&mut self, x: i16, y: i16, w: i16, h: i16, radius: i16, color: Rgb565) {
        if w <= 0 || h <= 0 {
            return;
        }
        let r = clamp_radius(radius, w, h);
        if r <= 0 {
            self.fill_rect(x, y, w, h, color);
            return;
        }

        let (x, y) = (i32::from(x), i32::from(y));
        let (w, h) = (i32::from(w), i32::from(h));
        let ri = i32::from(r);

        if h - ri * 2 > 0 {
            self.fill_rect_i32(x, y + ri, w, h - ri * 2, color);
        }

        let rr = ri * ri;
        for dy in 0..ri {
            let yy = ri - dy;
            let inside = (rr - yy * yy).max(0);
            let xx = i32::from(isqrt_floor(inside));

            let inset = ri - xx;
            let span_w = w - inset * 2;
            if span_w <= 0 {
                continue;
            }
            self.fill_rect_i32(x + inset, y + dy, span_w, 1, color);
            self.fill_rect_i32(x + inset, y + h - 1 - dy, span_w, 1, color);
        }

        self.aa_quarter(x + ri, y + ri, -1, -1, r, color);
        self.aa_quarter(x + w - 1 - ri, y + ri, 1, -1, r, color);
        self.aa_quarter(x + ri, y + h - 1 - ri, -1, 1, r, color);
        self.aa_quarter(x + w - 1 - ri, y + h - 1 - ri, 1, 1, r, color);
    }

    /// Anti-aliased edge band of one rounded-corner quadrant
    fn aa_quarter(&mut self, cx: i32, cy: i32, sx: i32, sy: i32, r: i16, color: Rgb565) {
        let rf = f32::from(r);
        let rr = rf * rf;

        for dy in 0..=i32::from(r) {
            let yf = dy as f32;
            let xf = sqrtf(rr - yf * yf);
            let xi = floorf(xf) as i32;
            let a = coverage(xf - floorf(xf));
            self.blend_pixel_i32(cx + sx * (xi + 1), cy + sy * dy, color, a);
        }

        for dx in 0..=i32::from(r) {
            let xf = dx as f32;
            let yf = sqrtf(rr - xf * xf);
            let yi = floorf(yf) as i32;
            let a = coverage(yf - floorf(yf));
            self.blend_pixel_i32(cx + sx * dx, cy + sy * (yi + 1), color, a);
        }
    }

    /// Outline a rounded rectangle, clipped
    pub fn draw_round_rect(&mut self, x: i16, y: i16, w: i16, h: i16, radius: i16, color: Rgb565) {
        if w <= 0 || h <= 0 {
            return;
        }
        let r = clamp_radius(radius, w, h);
        if r <= 0 {
            self.draw_rect(x, y, w, h, color);
            return;
        }

        let (x, y) = (i32::from(x), i32::from(y));
        let (w, h) = (i32::from(w), i32::from(h));
        let ri = i32::from(r);

        self.fill_rect_i32(x + ri, y, w - ri * 2, 1, color);
        self.fill_rect_i32(x + ri, y + h - 1, w - ri * 2, 1, color);
        self.fill_rect_i32(x, y + ri, 1, h - ri * 2, color);
        self.fill_rect_i32(x + w - 1, y + ri, 1, h - ri * 2, color);

        let rr = ri * ri;
        for dy in 0..ri {
            let yy = ri - dy;
            let inside = (rr - yy * yy).max(0);
            let inset = ri - i32::from(isqrt_floor(inside));

            let xl = x + inset;
            let xr = x + w - 1 - inset;
            let yt = y + dy;
            let yb = y + h - 1 - dy;
            self.draw_pixel_i32(xl, yt, color);
            self.draw_pixel_i32(xr, yt, color);
            self.draw_pixel_i32(xl, yb, color);
            self.draw_pixel_i32(xr, yb, color);
        }
    }

    /// Fill a circle, clipped, edge anti-aliased
    pub fn fill_circle(&mut self, cx: i16, cy: i16, r: i16, color: Rgb565) {
        if r <= 0 {
            return;
        }

        let cxi = i32::from(cx);
        let cyi = i32::from(cy);
        let ri = i32::from(r);

        let rr = ri * ri;
        for yy in (cyi - ri)..=(cyi + ri) {
            let dy = yy - cyi;
            let rem = rr - dy * dy;
            if rem < 0 {
                continue;
            }
            let dx = i32::from(isqrt_floor(rem));
            self.fill_rect_i32(cxi - dx, yy, dx * 2 + 1, 1, color);
        }

        let rf = f32::from(r);
        let rrf = rf * rf;

        for dy in -ri..=ri {
            let yf = dy as f32;
            let xf = sqrtf(rrf - yf * yf);
            let xi = floorf(xf) as i32;
            let a = coverage(xf - floorf(xf));
            self.blend_pixel_i32(cxi + xi + 1, cyi + dy, color, a);
            self.blend_pixel_i32(cxi - xi - 1, cyi + dy, color, a);
        }

        for dx in -ri..=ri {
            let xf = dx as f32;
            let yf = sqrtf(rrf - xf * xf);
            let yi = floorf(yf) as i32;
            let a = coverage(yf - floorf(yf));
            self.blend_pixel_i32(cxi + dx, cyi + yi + 1, color, a);
            self.blend_pixel_i32(cxi + dx, cyi - yi - 1, color, a);
        }
    }

    /// Blit a host-order pixel rectangle into the buffer, clipped
    ///
    /// `pixels` is row-major with stride `w`; short slices are a no-op.
    pub fn push_image(&mut self, x: i16, y: i16, w: i16, h: i16, pixels: &[Rgb565]) {
        if w <= 0 || h <= 0 {
            return;
        }
        if pixels.len() < w as usize * h as usize {
            return;
        }
        if self.clip.w == 0 || self.clip.h == 0 {
            return;
        }

        let mut sx0 = 0i32;
        let mut sy0 = 0i32;
        let mut dx0 = i32::from(x);
        let mut dy0 = i32::from(y);
        let mut cw = i32::from(w);
        let mut ch = i32::from(h);

        if dx0 < 0 {
            sx0 = -dx0;
            cw += dx0;
            dx0 = 0;
        }
        if dy0 < 0 {
            sy0 = -dy0;
            ch += dy0;
            dy0 = 0;
        }
        cw = cw.min(i32::from(self.width) - dx0);
        ch = ch.min(i32::from(self.height) - dy0);
        if cw <= 0 || ch <= 0 {
            return;
        }

        let cx0 = i32::from(self.clip.x);
        let cy0 = i32::from(self.clip.y);
        let cx1 = cx0 + i32::from(self.clip.w);
        let cy1 = cy0 + i32::from(self.clip.h);

        let mut dx1 = dx0 + cw;
        let mut dy1 = dy0 + ch;
        if dx0 < cx0 {
            sx0 += cx0 - dx0;
            dx0 = cx0;
        }
        if dy0 < cy0 {
            sy0 += cy0 - dy0;
            dy0 = cy0;
        }
        dx1 = dx1.min(cx1);
        dy1 = dy1.min(cy1);

        cw = dx1 - dx0;
        ch = dy1 - dy0;
        if cw <= 0 || ch <= 0 {
            return;
        }

        let src_stride = w as usize;
        let dst_stride = self.width as usize;
        for yy in 0..ch as usize {
            let src = (sy0 as usize + yy) * src_stride + sx0 as usize;
            let dst = (dy0 as usize + yy) * dst_stride + dx0 as usize;
            for xx in 0..cw as usize {
                self.buf[dst + xx] = DeviceColor::from_rgb565(pixels[src + xx]);
            }
        }
    }

    /// Raw sub-rectangle copy of this buffer into `dst` at `(x, y)`
    ///
    /// Both sides already store device byte order, so this is a pure
    /// memory move with no color conversion. Clamped to `dst` bounds;
    /// `dst`'s clip rectangle is not consulted.
    pub fn push_into(&self, dst: &mut FrameBuffer, x: i16, y: i16) {
        let mut sx0 = 0i32;
        let mut sy0 = 0i32;
        let mut dx0 = i32::from(x);
        let mut dy0 = i32::from(y);
        let mut w = i32::from(self.width);
        let mut h = i32::from(self.height);

        if dx0 < 0 {
            sx0 = -dx0;
            w += dx0;
            dx0 = 0;
        }
        if dy0 < 0 {
            sy0 = -dy0;
            h += dy0;
            dy0 = 0;
        }
        w = w.min(i32::from(dst.width) - dx0);
        h = h.min(i32::from(dst.height) - dy0);
        if w <= 0 || h <= 0 {
            return;
        }

        let src_stride = self.width as usize;
        let dst_stride = dst.width as usize;
        for yy in 0..h as usize {
            let s = (sy0 as usize + yy) * src_stride + sx0 as usize;
            let d = (dy0 as usize + yy) * dst_stride + dx0 as usize;
            dst.buf[d..d + w as usize].copy_from_slice(&self.buf[s..s + w as usize]);
        }
    }

    /// Read-only view of `w` device pixels starting at `(x, y)`
    ///
    /// `None` when the span does not lie fully inside the buffer. The
    /// flush path hands these slices to the driver without copying.
    pub fn row_span(&self, x: i16, y: i16, w: i16) -> Option<&[DeviceColor]> {
        if x < 0 || y < 0 || w <= 0 {
            return None;
        }
        if y >= self.height || i32::from(x) + i32::from(w) > i32::from(self.width) {
            return None;
        }
        let start = self.index(x, y);
        Some(&self.buf[start..start + w as usize])
    }

    /// Fill the whole buffer from 24-bit color, dithered per the profile
    pub fn fill_rgb(&mut self, c: Rgb888, seed: u32, profile: FrcProfile) {
        if profile == FrcProfile::Off {
            self.fill(Rgb565::from_rgb888(c));
            return;
        }
        let tile = quantized_tile(c, seed, profile);
        let stride = self.width as usize;
        for y in 0..self.height as usize {
            let tile_row = &tile[(y & 15) * 16..(y & 15) * 16 + 16];
            let row = &mut self.buf[y * stride..y * stride + stride];
            for (x, px) in row.iter_mut().enumerate() {
                *px = tile_row[x & 15];
            }
        }
    }

    /// Fill a rectangle from 24-bit color, dithered per the profile
    ///
    /// Small areas quantize per pixel; larger ones stamp a pre-quantized
    /// 16x16 tile, which is exact because the dither pattern is periodic
    /// with period 16 in both axes.
    pub fn fill_rect_rgb(
        &mut self,
        x: i16,
        y: i16,
        w: i16,
        h: i16,
        c: Rgb888,
        seed: u32,
        profile: FrcProfile,
    ) {
        if w <= 0 || h <= 0 {
            return;
        }
        if profile == FrcProfile::Off {
            self.fill_rect(x, y, w, h, Rgb565::from_rgb888(c));
            return;
        }
        if self.clip.w == 0 || self.clip.h == 0 {
            return;
        }

        let x0 = i32::from(x).max(0).max(i32::from(self.clip.x));
        let y0 = i32::from(y).max(0).max(i32::from(self.clip.y));
        let x1 = (i32::from(x) + i32::from(w))
            .min(i32::from(self.width))
            .min(i32::from(self.clip.x) + i32::from(self.clip.w));
        let y1 = (i32::from(y) + i32::from(h))
            .min(i32::from(self.height))
            .min(i32::from(self.clip.y) + i32::from(self.clip.h));
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let stride = self.width as usize;
        let area = (x1 - x0) * (y1 - y0);

        if area <= 256 {
            for py in y0..y1 {
                let row = py as usize * stride;
                for px in x0..x1 {
                    let c565 = quantize565(c, px as i16, py as i16, seed, profile);
                    self.buf[row + px as usize] = DeviceColor::from_rgb565(c565);
                }
            }
            return;
        }

        let tile = quantized_tile(c, seed, profile);
        for py in y0..y1 {
            let row = py as usize * stride;
            let tile_row = &tile[(py as usize & 15) * 16..(py as usize & 15) * 16 + 16];
            for px in x0..x1 {
                self.buf[row + px as usize] = tile_row[px as usize & 15];
            }
        }
    }

    /// Write one pixel from 24-bit color, dithered per the profile
    pub fn draw_pixel_rgb(&mut self, x: i16, y: i16, c: Rgb888, seed: u32, profile: FrcProfile) {
        self.draw_pixel(x, y, quantize565(c, x, y, seed, profile));
    }
}

/// Coverage fraction in `[0, 1]` to an 8-bit alpha
fn coverage(frac: f32) -> u8 {
    let a = (frac * 255.0) as i32;
    a.clamp(0, 255) as u8
}

/// Corner radius clamped so opposing corners never overlap
fn clamp_radius(radius: i16, w: i16, h: i16) -> i16 {
    let mut r = i32::from(radius);
    if r * 2 > i32::from(w) {
        r = i32::from(w) / 2;
    }
    if r * 2 > i32::from(h) {
        r = i32::from(h) / 2;
    }
    r as i16
}

/// Largest `n` with `n * n <= v`
fn isqrt_floor(v: i32) -> i16 {
    let mut n = 0i32;
    while (n + 1) * (n + 1) <= v {
        n += 1;
    }
    n as i16
}

/// One 16x16 tile of quantized color in device byte order
///
/// Valid as a stamp for any rectangle because the dither threshold
/// pattern repeats with period 16 in both axes.
fn quantized_tile(c: Rgb888, seed: u32, profile: FrcProfile) -> [DeviceColor; 256] {
    let mut tile = [DeviceColor::from_rgb565(Rgb565(0)); 256];
    for ty in 0..16i16 {
        for tx in 0..16i16 {
            tile[ty as usize * 16 + tx as usize] =
                DeviceColor::from_rgb565(quantize565(c, tx, ty, seed, profile));
        }
    }
    tile
}
