//! Packed ARGB8888 colors and the flat-shading intensity term.

pub const BACKGROUND: u32 = 0xFF1E1E1E;
pub const GRID: u32 = 0xFF333333;
pub const FILL: u32 = 0xFFCCCCCC;
pub const WIREFRAME: u32 = 0xFF00FF00;
pub const VERTEX: u32 = 0xFFFF0000;

/// Packs 8-bit channels into an ARGB u32.
#[inline]
pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Splits an ARGB u32 into `(a, r, g, b)` channels.
#[inline]
pub const fn channels(color: u32) -> (u8, u8, u8, u8) {
    (
        (color >> 24) as u8,
        (color >> 16) as u8,
        (color >> 8) as u8,
        color as u8,
    )
}

/// Scales the RGB channels of `color` by `intensity`, keeping alpha.
///
/// Each channel is clamped to `0..=255` after scaling, so any intensity
/// (negative, NaN or above one) yields a valid color.
#[inline]
pub fn apply_intensity(color: u32, intensity: f32) -> u32 {
    let (a, r, g, b) = channels(color);
    let scale = |c: u8| -> u8 {
        let v = c as f32 * intensity;
        // NaN passes through clamp and the cast maps it to 0.
        v.clamp(0.0, 255.0) as u8
    };
    argb(a, scale(r), scale(g), scale(b))
}
