//! Runtime configuration for the overlay window and renderer.

use crate::paint::Color;

/// Multisample settings for the back buffer.
///
/// `quality` is kept for callers porting sample descriptors from other APIs;
/// backends without quality levels ignore it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SampleDesc {
    pub count: u32,
    pub quality: u32,
}

impl SampleDesc {
    pub const NONE: SampleDesc = SampleDesc { count: 1, quality: 0 };

    #[inline]
    pub const fn new(count: u32, quality: u32) -> Self {
        Self { count, quality }
    }
}

impl Default for SampleDesc {
    fn default() -> Self {
        Self { count: 4, quality: 0 }
    }
}

/// Lowest/highest accepted present interval when vsync is on.
pub const VSYNC_MIN: u32 = 1;
pub const VSYNC_MAX: u32 = 3;

/// Clamps a requested sync interval into the accepted range.
#[inline]
pub fn clamp_sync_interval(interval: u32) -> u32 {
    interval.clamp(VSYNC_MIN, VSYNC_MAX)
}

/// Common font locations probed when no font bytes are supplied.
pub const DEFAULT_FONT_PATHS: &[&str] = &[
    "C:\\Windows\\Fonts\\segoeui.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
];

/// Overlay window + renderer configuration.
#[derive(Debug, Clone)]
pub struct OverlayConfig {
    pub title: String,

    /// Initial client size in physical pixels. `0` in either axis means
    /// "half of the primary monitor".
    pub width: u32,
    pub height: u32,

    /// Present interval: `0` = no vsync, otherwise clamped to `1..=3`.
    pub vsync: u32,

    pub fullscreen: bool,
    pub samples: SampleDesc,

    /// Mouse input passes through to the windows underneath.
    pub click_through: bool,

    /// Exclude the overlay from screen capture where the platform supports it.
    pub hide_from_capture: bool,

    /// Raw font file used for text. When `None`, [`DEFAULT_FONT_PATHS`] are probed.
    pub font: Option<Vec<u8>>,

    /// Colour the back buffer is cleared to every frame.
    pub clear_color: Color,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            title: "halo".to_string(),
            width: 0,
            height: 0,
            vsync: 0,
            fullscreen: false,
            samples: SampleDesc::default(),
            click_through: true,
            hide_from_capture: false,
            font: None,
            clear_color: Color::TRANSPARENT,
        }
    }
}

impl OverlayConfig {
    /// Returns the configured font bytes, or the first readable default font.
    pub fn resolve_font(&self) -> Option<Vec<u8>> {
        if let Some(bytes) = &self.font {
            return Some(bytes.clone());
        }
        DEFAULT_FONT_PATHS.iter().find_map(|p| std::fs::read(p).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_interval_is_clamped() {
        assert_eq!(clamp_sync_interval(0), 1);
        assert_eq!(clamp_sync_interval(2), 2);
        assert_eq!(clamp_sync_interval(9), 3);
    }

    #[test]
    fn configured_font_wins() {
        let cfg = OverlayConfig { font: Some(vec![1, 2, 3]), ..OverlayConfig::default() };
        assert_eq!(cfg.resolve_font(), Some(vec![1, 2, 3]));
    }
}
