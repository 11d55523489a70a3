//! Theme constants for Hazard Labeller.

use iced::Color;

/// Application colors (dark theme).
pub mod colors {
    use super::Color;

    /// Primary accent color
    pub const PRIMARY: Color = Color::from_rgb(0.24, 0.35, 0.50);

    /// Playhead marker
    pub const PLAYHEAD: Color = Color::from_rgb(0.30, 0.60, 1.00);

    /// Flagged hazard interval bars
    pub const HAZARD: Color = Color::from_rgb(0.55, 0.20, 0.18);

    /// Text secondary
    pub const TEXT_SECONDARY: Color = Color::from_rgb(0.53, 0.53, 0.53);

    /// Text muted
    pub const TEXT_MUTED: Color = Color::from_rgb(0.40, 0.40, 0.40);

    /// Border color
    pub const BORDER: Color = Color::from_rgb(0.25, 0.25, 0.25);
}

/// Spacing constants.
pub mod spacing {
    /// Extra small spacing (4px)
    pub const XS: f32 = 4.0;
    /// Small spacing (8px)
    pub const SM: f32 = 8.0;
    /// Medium spacing (12px)
    pub const MD: f32 = 12.0;
    /// Large spacing (16px)
    pub const LG: f32 = 16.0;
}

/// Font sizes.
pub mod font {
    /// Small font size
    pub const SM: f32 = 11.0;
    /// Normal font size
    pub const NORMAL: f32 = 13.0;
    /// Medium font size
    pub const MD: f32 = 14.0;
}
