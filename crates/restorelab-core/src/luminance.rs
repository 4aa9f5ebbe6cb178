//! Luma calculation using ITU-R BT.601 coefficients.
//!
//! These are the weights conventional RGB → gray conversion uses for 8-bit
//! images; the grayscale transform and the Canny pre-pass share them.

/// ITU-R BT.601 coefficient for red channel.
pub const LUMA_R: f64 = 0.299;

/// ITU-R BT.601 coefficient for green channel.
pub const LUMA_G: f64 = 0.587;

/// ITU-R BT.601 coefficient for blue channel.
pub const LUMA_B: f64 = 0.114;

/// Luma of an RGB triple in any numeric range, without rounding.
#[inline]
pub fn luma(r: f64, g: f64, b: f64) -> f64 {
    LUMA_R * r + LUMA_G * g + LUMA_B * b
}

/// Luma of an 8-bit RGB triple, rounded to nearest.
#[inline]
pub fn luma_u8(r: u8, g: u8, b: u8) -> u8 {
    luma(r as f64, g as f64, b as f64).clamp(0.0, 255.0).round() as u8
}
