use crate::foundation::core::{Rect, Size, rect_xywh};
use crate::foundation::error::{PanoplyError, PanoplyResult};
use crate::foundation::math::lerp;

fn default_reference_size() -> Size {
    Size::new(1024.0, 768.0)
}

fn default_match() -> f64 {
    0.5
}

/// Snapshot of the renderer's screen configuration for one tick.
///
/// Layout and camera math read the addressable screen rect and the resolution scale
/// from here; the renderer owns the device size and updates it when the window changes.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Device screen size in pixels.
    pub device_size: Size,
    /// Resolution the scene was authored against.
    #[serde(default = "default_reference_size")]
    pub reference_size: Size,
    /// Blend between width (0) and height (1) when deriving the resolution scale.
    #[serde(default = "default_match")]
    pub match_width_height: f64,
    /// Letterbox the screen rect to the reference aspect ratio.
    #[serde(default)]
    pub enforce_aspect_ratio: bool,
}

impl Viewport {
    /// Viewport for a device of `width` x `height` pixels with default reference settings.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            device_size: Size::new(width, height),
            reference_size: default_reference_size(),
            match_width_height: default_match(),
            enforce_aspect_ratio: false,
        }
    }

    /// Builder-style letterboxing toggle.
    pub fn with_enforced_aspect_ratio(mut self, enforce: bool) -> Self {
        self.enforce_aspect_ratio = enforce;
        self
    }

    /// Check sizes are positive and finite.
    pub fn validate(&self) -> PanoplyResult<()> {
        let ok = |s: Size| s.width.is_finite() && s.height.is_finite() && s.width > 0.0 && s.height > 0.0;
        if !ok(self.device_size) {
            return Err(PanoplyError::validation(format!(
                "viewport device size must be positive, got {}x{}",
                self.device_size.width, self.device_size.height
            )));
        }
        if !ok(self.reference_size) {
            return Err(PanoplyError::validation(format!(
                "viewport reference size must be positive, got {}x{}",
                self.reference_size.width, self.reference_size.height
            )));
        }
        Ok(())
    }

    /// Full device rect.
    pub fn device_rect(&self) -> Rect {
        rect_xywh(0.0, 0.0, self.device_size.width, self.device_size.height)
    }

    /// Addressable screen area, letterboxed and centered when the aspect ratio is enforced.
    pub fn screen_rect(&self) -> Rect {
        let Size { width, height } = self.device_size;
        if !self.enforce_aspect_ratio {
            return rect_xywh(0.0, 0.0, width, height);
        }
        let aspect = self.reference_size.width / self.reference_size.height;
        let (w, h) = if aspect > width / height {
            (width, width / aspect)
        } else {
            (height * aspect, height)
        };
        rect_xywh((width - w) * 0.5, (height - h) * 0.5, w, h)
    }

    /// `lerp(screen.w / ref.w, screen.h / ref.h, match) * 0.5`.
    pub fn resolution_scale(&self) -> f64 {
        let sr = self.screen_rect();
        let scale_h = sr.width() / self.reference_size.width;
        let scale_v = sr.height() / self.reference_size.height;
        lerp(&scale_h, &scale_v, self.match_width_height) * 0.5
    }

    /// The screen rect divided by the resolution scale.
    pub fn scaled_screen_rect(&self) -> Rect {
        let sr = self.screen_rect();
        let s = self.resolution_scale();
        if s == 0.0 {
            return Rect::ZERO;
        }
        rect_xywh(sr.x0 / s, sr.y0 / s, sr.width() / s, sr.height() / s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/viewport.rs"]
mod tests;
