//! Viewport emulation for the preview surface.
//!
//! The emulated width constrains the rendering surface only; the document
//! itself is never transformed or scaled.

use serde::{Deserialize, Serialize};

/// Reference width for the fluid desktop surface.
pub const DESKTOP_REFERENCE_WIDTH: u32 = 1280;

/// The three preview widths offered by the editing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewViewport {
    /// Fluid width, up to whatever the surface offers (≈1280 px reference).
    Desktop,
    /// Fixed 768 px.
    Tablet,
    /// Fixed 375 px.
    Mobile,
}

impl PreviewViewport {
    /// The fixed emulated width, or `None` for the fluid desktop surface.
    pub fn fixed_width(&self) -> Option<u32> {
        match self {
            Self::Desktop => None,
            Self::Tablet => Some(768),
            Self::Mobile => Some(375),
        }
    }

    /// The width the rendering surface should be constrained to, given the
    /// space available to the host.
    pub fn surface_width(&self, available: u32) -> u32 {
        match self.fixed_width() {
            Some(width) => width.min(available),
            None => available,
        }
    }
}

impl Default for PreviewViewport {
    fn default() -> Self {
        Self::Desktop
    }
}
