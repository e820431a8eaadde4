//! Colors in ARGB8888 format.

pub const BACKGROUND: u32 = 0xFFFFFFFF;
pub const GRID: u32 = 0xFFC8C8C8;
pub const FOREGROUND: u32 = 0xFF000000;
pub const AXIS_X: u32 = 0xFF00FF00;
pub const AXIS_Y: u32 = 0xFF0000FF;
pub const RED: u32 = 0xFFFF0000;
pub const BLUE: u32 = 0xFF0000FF;

/// Pack 8-bit channels into an opaque ARGB color.
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Unpack an ARGB color into `(a, r, g, b)` channels.
pub const fn unpack(color: u32) -> (u8, u8, u8, u8) {
    (
        (color >> 24) as u8,
        (color >> 16) as u8,
        (color >> 8) as u8,
        color as u8,
    )
}
