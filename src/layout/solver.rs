use crate::foundation::core::{Rect, rect_xywh};
use crate::layout::frame::{
    FrameState, HeightCalcMethod, HeightUnits, PositionAlignHorz, PositionAlignVert,
    PositionEdgeHorz, PositionEdgeVert, PositionType, PositionUnits, WidthCalcMethod, WidthUnits,
};
use crate::layout::viewport::Viewport;

/// Margins are authored at half resolution.
pub const MARGIN_FACTOR: f64 = 2.0;

/// Solved frame rect plus which quantities determined it.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct FrameRect {
    /// Pixel rect, bottom-left origin, in device coordinates.
    pub rect: Rect,
    /// Horizontal provenance.
    pub width_calc: WidthCalcMethod,
    /// Vertical provenance.
    pub height_calc: HeightCalcMethod,
}

fn resolve(units: PositionUnits, value: f64, extent: f64) -> f64 {
    match units {
        PositionUnits::Pixels => value,
        PositionUnits::Percent => extent * (value * 0.01),
    }
}

/// Solve a frame specification against the viewport.
///
/// Without a viewport every frame degrades to [`Rect::ZERO`].
pub fn compute_rect(spec: &FrameState, viewport: Option<&Viewport>, include_margins: bool) -> FrameRect {
    let Some(viewport) = viewport else {
        return FrameRect::default();
    };
    let screen = viewport.screen_rect();
    let (sw, sh) = (screen.width(), screen.height());

    let mut width = match spec.width_units {
        WidthUnits::Pixels => spec.width,
        WidthUnits::PercentParentWidth => sw * (spec.width * 0.01),
        WidthUnits::PercentPanelHeight => 0.0,
    };
    let height = match spec.height_units {
        HeightUnits::Pixels => spec.height,
        HeightUnits::PercentParentHeight => sh * (spec.height * 0.01),
        HeightUnits::PercentPanelWidth => width * spec.height,
    };
    if spec.width_units == WidthUnits::PercentPanelHeight {
        width = height * spec.width;
    }

    let mut left = None;
    let mut right = None;
    let mut width_calc = WidthCalcMethod::NoDimensions;
    match spec.h_position_type {
        PositionType::Center => {
            let c = sw * 0.5 + resolve(spec.h_units, spec.h, sw);
            left = Some(c - width * 0.5);
            right = Some(c + width * 0.5);
            width_calc = WidthCalcMethod::CenterAndWidth;
        }
        PositionType::Edge => match spec.h_edge {
            PositionEdgeHorz::Left => {
                left = Some(resolve(spec.left_units, spec.left, sw));
                width_calc = WidthCalcMethod::Left;
            }
            PositionEdgeHorz::Right => {
                right = Some(sw - resolve(spec.right_units, spec.right, sw));
                width_calc = WidthCalcMethod::Right;
            }
        },
    }

    let mut top = None;
    let mut bottom = None;
    let mut height_calc = HeightCalcMethod::NoDimensions;
    match spec.v_position_type {
        PositionType::Center => {
            let c = sh * 0.5 + resolve(spec.v_units, spec.v, sh);
            bottom = Some(c - height * 0.5);
            top = Some(c + height * 0.5);
            height_calc = HeightCalcMethod::CenterAndHeight;
        }
        PositionType::Edge => match spec.v_edge {
            PositionEdgeVert::Top => {
                top = Some(sh - resolve(spec.top_units, spec.top, sh));
                height_calc = HeightCalcMethod::Top;
            }
            PositionEdgeVert::Bottom => {
                bottom = Some(resolve(spec.bottom_units, spec.bottom, sh));
                height_calc = HeightCalcMethod::Bottom;
            }
        },
    }

    let (mut top, mut bottom) = match (top, bottom) {
        (Some(t), Some(b)) => (t, b),
        (None, b) => {
            let b = b.unwrap_or_default();
            height_calc = HeightCalcMethod::BottomAndHeight;
            (b + height, b)
        }
        (Some(t), None) => {
            height_calc = HeightCalcMethod::TopAndHeight;
            (t, t - height)
        }
    };
    let (mut left, mut right) = match (left, right) {
        (Some(l), Some(r)) => (l, r),
        (l, None) => {
            let l = l.unwrap_or_default();
            width_calc = WidthCalcMethod::LeftAndWidth;
            (l, l + width)
        }
        (None, Some(r)) => {
            width_calc = WidthCalcMethod::RightAndWidth;
            (r - width, r)
        }
    };

    // Both clamps test the ratio measured before either one runs.
    let ar = (right - left) / (top - bottom);
    if spec.max_aspect_ratio > 0.0 && ar > spec.max_aspect_ratio {
        let clamped = (top - bottom) * spec.max_aspect_ratio;
        let diff = (right - left) - clamped;
        match spec.h_align {
            PositionAlignHorz::Left => right -= diff,
            PositionAlignHorz::Center => {
                right -= diff * 0.5;
                left += diff * 0.5;
            }
            PositionAlignHorz::Right => left += diff,
        }
    }
    if spec.min_aspect_ratio > 0.0 && ar < spec.min_aspect_ratio {
        let clamped = (right - left) / spec.min_aspect_ratio;
        let diff = (top - bottom) - clamped;
        match spec.v_align {
            PositionAlignVert::Top => bottom += diff,
            PositionAlignVert::Middle => {
                top -= diff * 0.5;
                bottom += diff * 0.5;
            }
            PositionAlignVert::Bottom => top -= diff,
        }
    }

    let (m_top, m_right, m_bottom, m_left) = if include_margins {
        let s = MARGIN_FACTOR * viewport.resolution_scale();
        let m = &spec.margins;
        (m.top * s, m.right * s, m.bottom * s, m.left * s)
    } else {
        (0.0, 0.0, 0.0, 0.0)
    };

    let w = (right - m_right - (left + m_left)).max(1.0);
    let h = (top - m_top - (bottom + m_bottom)).max(1.0);
    let rect = rect_xywh(
        left + m_left.min(w) + screen.x0,
        bottom + m_bottom.min(h) + screen.y0,
        w,
        h,
    );

    FrameRect {
        rect,
        width_calc,
        height_calc,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/solver.rs"]
mod tests;
