//! Color quantization with ordered blue-noise dithering
//!
//! The panel shows 16-bit RGB565 but the UI works in 24-bit color. Plain
//! truncation bands badly on gradients, so [`quantize565`] can instead
//! round each pixel up or down based on a fixed 16×16 blue-noise threshold
//! pattern: the quantization error becomes high-frequency noise the eye
//! averages out, with no per-pixel state and no error diffusion.
//!
//! The function is pure and deterministic — the same `(color, x, y, seed,
//! profile)` always yields the same output — which both makes it testable
//! and lets callers cache a quantized 16×16 tile for large solid fills.
//!
//! ## Example
//!
//! ```
//! use st7789_compositor::color::Rgb888;
//! use st7789_compositor::frc::{quantize565, FrcProfile};
//!
//! let c = Rgb888::new(100, 60, 210);
//! let a = quantize565(c, 3, 7, 0, FrcProfile::BlueNoise);
//! let b = quantize565(c, 3, 7, 0, FrcProfile::BlueNoise);
//! assert_eq!(a, b);
//! ```

use crate::color::{Rgb565, Rgb888};

/// Quantization profile
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum FrcProfile {
    /// Direct truncation of each channel to its native width
    Off,
    /// Ordered dithering against the blue-noise threshold table
    #[default]
    BlueNoise,
}

/// 16×16 blue-noise threshold pattern, values 0..=255
///
/// Pre-computed once; tiled periodically across the screen. The table is
/// part of the visual contract — regenerating it changes the noise texture
/// of every dithered surface.
const BLUE_NOISE_16X16: [u8; 256] = [
    232, 38, 74, 243, 136, 181, 0, 248, 202, 154, 51, 212, 158, 121, 2, 78, //
    207, 178, 85, 122, 77, 233, 67, 83, 159, 23, 99, 204, 15, 59, 13, 239, //
    50, 28, 187, 3, 252, 144, 184, 44, 7, 235, 129, 196, 84, 251, 146, 213, //
    132, 89, 109, 228, 21, 137, 30, 60, 192, 82, 136, 8, 62, 134, 119, 24, //
    168, 63, 6, 119, 71, 93, 249, 178, 125, 146, 227, 163, 187, 19, 41, 236, //
    206, 42, 150, 238, 181, 65, 226, 101, 203, 190, 13, 1, 198, 221, 52, 110, //
    188, 18, 2, 32, 205, 145, 34, 120, 244, 76, 143, 245, 56, 161, 176, 139, //
    211, 157, 162, 75, 246, 165, 23, 183, 153, 231, 118, 158, 109, 7, 34, 93, //
    29, 39, 181, 227, 68, 98, 125, 88, 209, 177, 202, 136, 253, 214, 83, 230, //
    174, 138, 128, 58, 46, 210, 51, 37, 110, 11, 44, 93, 25, 0, 75, 101, //
    217, 244, 14, 185, 215, 230, 118, 139, 27, 55, 242, 232, 35, 124, 236, 209, //
    122, 191, 221, 147, 103, 131, 4, 68, 153, 78, 71, 174, 86, 188, 64, 199, //
    54, 47, 240, 178, 39, 188, 135, 25, 180, 102, 250, 13, 120, 95, 9, 175, //
    29, 142, 113, 75, 28, 161, 64, 227, 49, 1, 53, 200, 186, 4, 208, 61, //
    12, 195, 7, 183, 223, 69, 123, 116, 110, 253, 68, 227, 180, 254, 133, 182, //
    107, 65, 200, 98, 33, 20, 141, 42, 232, 28, 38, 18, 231, 97, 198, 34, //
];

/// Sample the threshold table at a seed-offset position
///
/// The two low-order nibbles of `seed` shift the pattern; changing the seed
/// every frame turns spatial dithering into temporal dithering.
fn blue_noise(seed: u32, x: i16, y: i16) -> u8 {
    let ox = (seed & 15) as i16;
    let oy = ((seed >> 4) & 15) as i16;
    let xx = (x.wrapping_add(ox) & 15) as usize;
    let yy = (y.wrapping_add(oy) & 15) as usize;
    BLUE_NOISE_16X16[yy * 16 + xx]
}

/// Quantize a 24-bit color to RGB565 at pixel `(x, y)`
///
/// Pure and deterministic. Colors that quantization cannot improve — pure
/// black, pure white, any gray, and colors already exactly representable in
/// 565 — bypass the dither regardless of `profile`: promoting a channel
/// with zero remainder only adds noise.
///
/// For `BlueNoise`, each channel's truncated remainder (3 bits for red and
/// blue, 2 for green) is compared against the threshold table, sampled at
/// per-channel decorrelation offsets so the three channels do not dither in
/// lockstep. The result never differs from the truncated value by more than
/// one quantization step.
pub fn quantize565(c: Rgb888, x: i16, y: i16, seed: u32, profile: FrcProfile) -> Rgb565 {
    let dither = matches!(profile, FrcProfile::BlueNoise)
        && !c.is_black()
        && !c.is_white()
        && !c.is_gray()
        && !c.is_exact_565();

    if !dither {
        return Rgb565::from_rgb888(c);
    }

    let thr_r = blue_noise(seed, x, y);
    let thr_g = blue_noise(seed, x.wrapping_add(5), y.wrapping_add(7));
    let thr_b = blue_noise(seed, x.wrapping_add(11), y.wrapping_add(3));

    let r_base = (c.r >> 3) as u16;
    let g_base = (c.g >> 2) as u16;
    let b_base = (c.b >> 3) as u16;

    let r_frac = c.r & 0x07;
    let g_frac = c.g & 0x03;
    let b_frac = c.b & 0x07;

    let r5 = (r_base + u16::from(r_frac << 5 > thr_r)).min(31);
    let g6 = (g_base + u16::from(g_frac << 6 > thr_g)).min(63);
    let b5 = (b_base + u16::from(b_frac << 5 > thr_b)).min(31);

    Rgb565::from_channels(r5, g6, b5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let c = Rgb888::new(57, 101, 230);
        for profile in [FrcProfile::Off, FrcProfile::BlueNoise] {
            let a = quantize565(c, 13, 29, 0xABCD, profile);
            let b = quantize565(c, 13, 29, 0xABCD, profile);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_off_is_truncation() {
        let c = Rgb888::new(201, 77, 13);
        let q = quantize565(c, 0, 0, 0, FrcProfile::Off);
        assert_eq!(q, Rgb565::from_rgb888(c));
    }

    #[test]
    fn test_dither_error_bounded_to_one_step() {
        // Across a spread of colors, positions and seeds, the dithered
        // channel never strays more than one step from the truncation.
        for &(r, g, b) in &[(3u8, 1u8, 7u8), (100, 60, 210), (254, 129, 66), (17, 200, 91)] {
            let c = Rgb888::new(r, g, b);
            let base = Rgb565::from_rgb888(c);
            for y in 0..16i16 {
                for x in 0..16i16 {
                    for seed in [0u32, 0x5A, 0xFF] {
                        let q = quantize565(c, x, y, seed, FrcProfile::BlueNoise);
                        assert!(q.r5().abs_diff(base.r5()) <= 1);
                        assert!(q.g6().abs_diff(base.g6()) <= 1);
                        assert!(q.b5().abs_diff(base.b5()) <= 1);
                    }
                }
            }
        }
    }

    #[test]
    fn test_black_white_gray_bypass() {
        for &c in &[
            Rgb888::new(0, 0, 0),
            Rgb888::new(255, 255, 255),
            Rgb888::new(100, 100, 100),
            Rgb888::new(7, 7, 7),
        ] {
            for y in 0..16i16 {
                for x in 0..16i16 {
                    let off = quantize565(c, x, y, 99, FrcProfile::Off);
                    let dith = quantize565(c, x, y, 99, FrcProfile::BlueNoise);
                    assert_eq!(off, dith);
                }
            }
        }
    }

    #[test]
    fn test_exact_565_bypass() {
        let c = Rgb888::new(248, 252, 248);
        for y in 0..16i16 {
            for x in 0..16i16 {
                assert_eq!(
                    quantize565(c, x, y, 3, FrcProfile::BlueNoise),
                    quantize565(c, x, y, 3, FrcProfile::Off)
                );
            }
        }
    }

    #[test]
    fn test_dither_actually_varies() {
        // A mid-remainder color must round differently somewhere inside one
        // tile period, otherwise the threshold comparison is broken.
        let c = Rgb888::new(100, 60, 210);
        let first = quantize565(c, 0, 0, 0, FrcProfile::BlueNoise);
        let varied = (0..16i16)
            .flat_map(|y| (0..16i16).map(move |x| (x, y)))
            .any(|(x, y)| quantize565(c, x, y, 0, FrcProfile::BlueNoise) != first);
        assert!(varied);
    }

    #[test]
    fn test_seed_shifts_pattern() {
        let c = Rgb888::new(100, 60, 210);
        let mut moved = false;
        for y in 0..16i16 {
            for x in 0..16i16 {
                if quantize565(c, x, y, 0, FrcProfile::BlueNoise)
                    != quantize565(c, x, y, 5, FrcProfile::BlueNoise)
                {
                    moved = true;
                }
            }
        }
        assert!(moved);
    }
}
