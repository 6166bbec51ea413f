use crate::foundation::core::Rgba;
use crate::foundation::error::{PanoplyError, PanoplyResult};

/// How a frame's position is specified on one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PositionType {
    /// By one of its edges.
    Edge,
    /// By its center, offset from the screen center.
    #[default]
    Center,
}

/// Units of a position value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PositionUnits {
    /// Screen pixels.
    #[default]
    Pixels,
    /// Percent of the screen width or height.
    Percent,
}

/// Horizontal edge used for edge positioning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PositionEdgeHorz {
    /// Left edge.
    #[default]
    Left,
    /// Right edge.
    Right,
}

/// Vertical edge used for edge positioning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PositionEdgeVert {
    /// Top edge.
    #[default]
    Top,
    /// Bottom edge.
    Bottom,
}

/// Horizontal anchor kept fixed when the aspect-ratio clamp shrinks the width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PositionAlignHorz {
    /// Keep the left edge.
    Left,
    /// Shrink evenly from both sides.
    #[default]
    Center,
    /// Keep the right edge.
    Right,
}

/// Vertical anchor kept fixed when the aspect-ratio clamp shrinks the height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PositionAlignVert {
    /// Keep the top edge.
    Top,
    /// Shrink evenly from both sides.
    #[default]
    Middle,
    /// Keep the bottom edge.
    Bottom,
}

/// Units of a frame width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum WidthUnits {
    /// Pixels.
    Pixels,
    /// Percent of the screen width.
    #[default]
    PercentParentWidth,
    /// Multiple of the frame's own height.
    PercentPanelHeight,
}

/// Units of a frame height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum HeightUnits {
    /// Pixels.
    Pixels,
    /// Percent of the screen height.
    #[default]
    PercentParentHeight,
    /// Multiple of the frame's own width.
    PercentPanelWidth,
}

/// Which horizontal quantities determined the solved rect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum WidthCalcMethod {
    /// Nothing was solved.
    #[default]
    NoDimensions,
    /// Center and width.
    CenterAndWidth,
    /// Left edge only (right pending).
    Left,
    /// Left edge plus width.
    LeftAndWidth,
    /// Right edge only (left pending).
    Right,
    /// Right edge minus width.
    RightAndWidth,
}

/// Which vertical quantities determined the solved rect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum HeightCalcMethod {
    /// Nothing was solved.
    #[default]
    NoDimensions,
    /// Center and height.
    CenterAndHeight,
    /// Top edge only (bottom pending).
    Top,
    /// Top edge minus height.
    TopAndHeight,
    /// Bottom edge only (top pending).
    Bottom,
    /// Bottom edge plus height.
    BottomAndHeight,
}

/// Named destinations for [`FrameState::move_to`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PanelPosition {
    /// Just beyond the left screen edge.
    OffscreenLeft,
    /// Flush with the left screen edge.
    Left,
    /// Just beyond the right screen edge.
    OffscreenRight,
    /// Flush with the right screen edge.
    Right,
    /// Just below the bottom screen edge.
    OffscreenBottom,
    /// Flush with the bottom screen edge.
    Bottom,
    /// Just above the top screen edge.
    OffscreenTop,
    /// Flush with the top screen edge.
    Top,
    /// Centered on both axes.
    Center,
}

impl std::str::FromStr for PanelPosition {
    type Err = PanoplyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "OffscreenLeft" => Self::OffscreenLeft,
            "Left" => Self::Left,
            "OffscreenRight" => Self::OffscreenRight,
            "Right" => Self::Right,
            "OffscreenBottom" => Self::OffscreenBottom,
            "Bottom" => Self::Bottom,
            "OffscreenTop" => Self::OffscreenTop,
            "Top" => Self::Top,
            "Center" => Self::Center,
            other => {
                return Err(PanoplyError::validation(format!(
                    "unknown panel position '{other}'"
                )));
            }
        })
    }
}

/// Frame margins in authoring units (doubled and scaled at solve time).
#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct Edges {
    /// Top margin.
    #[serde(default)]
    pub top: f64,
    /// Right margin.
    #[serde(default)]
    pub right: f64,
    /// Bottom margin.
    #[serde(default)]
    pub bottom: f64,
    /// Left margin.
    #[serde(default)]
    pub left: f64,
}

impl Edges {
    /// Same margin on every side.
    pub fn uniform(m: f64) -> Self {
        Self {
            top: m,
            right: m,
            bottom: m,
            left: m,
        }
    }
}

/// Authored position and size of a panel frame at one keyframe.
///
/// Values are kept in their authored units; [`crate::compute_rect`] turns them into pixels.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FrameState {
    /// Horizontal positioning mode.
    pub h_position_type: PositionType,
    /// Edge used when `h_position_type` is [`PositionType::Edge`].
    pub h_edge: PositionEdgeHorz,
    /// Horizontal center offset.
    pub h: f64,
    /// Units of `h`.
    pub h_units: PositionUnits,
    /// Left edge distance from the screen's left side.
    pub left: f64,
    /// Units of `left`.
    pub left_units: PositionUnits,
    /// Right edge distance from the screen's right side.
    pub right: f64,
    /// Units of `right`.
    pub right_units: PositionUnits,

    /// Vertical positioning mode.
    pub v_position_type: PositionType,
    /// Edge used when `v_position_type` is [`PositionType::Edge`].
    pub v_edge: PositionEdgeVert,
    /// Vertical center offset (positive is up).
    pub v: f64,
    /// Units of `v`.
    pub v_units: PositionUnits,
    /// Top edge distance from the screen's top side.
    pub top: f64,
    /// Units of `top`.
    pub top_units: PositionUnits,
    /// Bottom edge distance from the screen's bottom side.
    pub bottom: f64,
    /// Units of `bottom`.
    pub bottom_units: PositionUnits,

    /// Horizontal anchor for the max aspect-ratio clamp.
    pub h_align: PositionAlignHorz,
    /// Vertical anchor for the min aspect-ratio clamp.
    pub v_align: PositionAlignVert,

    /// Width value.
    pub width: f64,
    /// Units of `width`.
    pub width_units: WidthUnits,
    /// Height value.
    pub height: f64,
    /// Units of `height`.
    pub height_units: HeightUnits,

    /// Minimum width/height ratio; 0 disables.
    pub min_aspect_ratio: f64,
    /// Maximum width/height ratio; 0 disables.
    pub max_aspect_ratio: f64,

    /// Inner margins.
    pub margins: Edges,

    /// Colour behind the panel's content.
    pub matte_color: Rgba,
    /// Border thickness in pixels.
    pub border_size: f64,
    /// Border colour.
    pub border_color: Rgba,
}

impl Default for FrameState {
    fn default() -> Self {
        Self {
            h_position_type: PositionType::Center,
            h_edge: PositionEdgeHorz::Left,
            h: 0.0,
            h_units: PositionUnits::Pixels,
            left: 0.0,
            left_units: PositionUnits::Pixels,
            right: 0.0,
            right_units: PositionUnits::Pixels,
            v_position_type: PositionType::Center,
            v_edge: PositionEdgeVert::Top,
            v: 0.0,
            v_units: PositionUnits::Pixels,
            top: 0.0,
            top_units: PositionUnits::Pixels,
            bottom: 0.0,
            bottom_units: PositionUnits::Pixels,
            h_align: PositionAlignHorz::Center,
            v_align: PositionAlignVert::Middle,
            width: 100.0,
            width_units: WidthUnits::PercentParentWidth,
            height: 100.0,
            height_units: HeightUnits::PercentParentHeight,
            min_aspect_ratio: 0.0,
            max_aspect_ratio: 0.0,
            margins: Edges::default(),
            matte_color: Rgba::CLEAR,
            border_size: 0.0,
            border_color: Rgba::BLACK,
        }
    }
}

fn parse_number(s: &str) -> PanoplyResult<f64> {
    let s = s.trim();
    s.parse::<f64>()
        .map_err(|e| PanoplyError::validation(format!("invalid number '{s}': {e}")))
}

/// Parse `"50%"` or `"50"` into a value and its units.
pub fn parse_position(s: &str) -> PanoplyResult<(f64, PositionUnits)> {
    match s.trim().strip_suffix('%') {
        Some(v) => Ok((parse_number(v)?, PositionUnits::Percent)),
        None => Ok((parse_number(s)?, PositionUnits::Pixels)),
    }
}

fn parse_width(s: &str) -> PanoplyResult<(f64, WidthUnits)> {
    let s = s.trim();
    if let Some(v) = s.strip_suffix("AR") {
        Ok((parse_number(v)?, WidthUnits::PercentPanelHeight))
    } else if let Some(v) = s.strip_suffix('%') {
        Ok((parse_number(v)?, WidthUnits::PercentParentWidth))
    } else {
        Ok((parse_number(s)?, WidthUnits::Pixels))
    }
}

fn parse_height(s: &str) -> PanoplyResult<(f64, HeightUnits)> {
    let s = s.trim();
    if let Some(v) = s.strip_suffix("AR") {
        Ok((parse_number(v)?, HeightUnits::PercentPanelWidth))
    } else if let Some(v) = s.strip_suffix('%') {
        Ok((parse_number(v)?, HeightUnits::PercentParentHeight))
    } else {
        Ok((parse_number(s)?, HeightUnits::Pixels))
    }
}

fn parse_optional(s: &str) -> PanoplyResult<f64> {
    if s.trim().is_empty() {
        Ok(0.0)
    } else {
        parse_number(s)
    }
}

impl FrameState {
    /// Set the horizontal position from `"50%"` or `"50"`.
    ///
    /// Clears the previous center offset and both edge values first.
    pub fn set_horizontal_position(
        &mut self,
        value: &str,
        kind: PositionType,
        edge: PositionEdgeHorz,
        align: PositionAlignHorz,
    ) -> PanoplyResult<()> {
        let (val, units) = parse_position(value)?;
        self.h = 0.0;
        self.left = 0.0;
        self.right = 0.0;
        self.h_position_type = kind;
        self.h_edge = edge;
        self.h_align = align;
        match (kind, edge) {
            (PositionType::Edge, PositionEdgeHorz::Left) => {
                self.left = val;
                self.left_units = units;
            }
            (PositionType::Edge, PositionEdgeHorz::Right) => {
                self.right = val;
                self.right_units = units;
            }
            (PositionType::Center, _) => {
                self.h = val;
                self.h_units = units;
            }
        }
        Ok(())
    }

    /// Set the vertical position from `"50%"` or `"50"`.
    pub fn set_vertical_position(
        &mut self,
        value: &str,
        kind: PositionType,
        edge: PositionEdgeVert,
        align: PositionAlignVert,
    ) -> PanoplyResult<()> {
        let (val, units) = parse_position(value)?;
        self.v = 0.0;
        self.top = 0.0;
        self.bottom = 0.0;
        self.v_position_type = kind;
        self.v_edge = edge;
        self.v_align = align;
        match (kind, edge) {
            (PositionType::Edge, PositionEdgeVert::Top) => {
                self.top = val;
                self.top_units = units;
            }
            (PositionType::Edge, PositionEdgeVert::Bottom) => {
                self.bottom = val;
                self.bottom_units = units;
            }
            (PositionType::Center, _) => {
                self.v = val;
                self.v_units = units;
            }
        }
        Ok(())
    }

    /// Move the frame to a named screen position, offset by `"h[,v]"`.
    ///
    /// Offsets default to percent when suffixed with `%`; the vertical component is only
    /// used by [`PanelPosition::Center`]. Edge destinations take the first offset.
    pub fn move_to(&mut self, dest: PanelPosition, offset: &str) -> PanoplyResult<()> {
        let mut parts = offset.split(',');
        let (off_h, units_h) = parse_position(parts.next().unwrap_or("0%"))?;
        let (off_v, units_v) = match parts.next() {
            Some(v) => parse_position(v)?,
            None => (0.0, PositionUnits::Percent),
        };

        match dest {
            PanelPosition::OffscreenLeft => {
                self.h_position_type = PositionType::Edge;
                self.h_edge = PositionEdgeHorz::Right;
                self.right = 100.0 + off_h;
                self.right_units = units_h;
            }
            PanelPosition::Left => {
                self.h_position_type = PositionType::Edge;
                self.h_edge = PositionEdgeHorz::Left;
                self.left = off_h;
                self.left_units = units_h;
            }
            PanelPosition::OffscreenRight => {
                self.h_position_type = PositionType::Edge;
                self.h_edge = PositionEdgeHorz::Left;
                self.left = 100.0 + off_h;
                self.left_units = units_h;
            }
            PanelPosition::Right => {
                self.h_position_type = PositionType::Edge;
                self.h_edge = PositionEdgeHorz::Right;
                self.right = off_h;
                self.right_units = units_h;
            }
            PanelPosition::OffscreenBottom => {
                self.v_position_type = PositionType::Edge;
                self.v_edge = PositionEdgeVert::Top;
                self.top = 100.0 + off_h;
                self.top_units = units_h;
            }
            PanelPosition::Bottom => {
                self.v_position_type = PositionType::Edge;
                self.v_edge = PositionEdgeVert::Bottom;
                self.bottom = off_h;
                self.bottom_units = units_h;
            }
            PanelPosition::OffscreenTop => {
                self.v_position_type = PositionType::Edge;
                self.v_edge = PositionEdgeVert::Bottom;
                self.bottom = 100.0 + off_h;
                self.bottom_units = units_h;
            }
            PanelPosition::Top => {
                self.v_position_type = PositionType::Edge;
                self.v_edge = PositionEdgeVert::Top;
                self.top = off_h;
                self.top_units = units_h;
            }
            PanelPosition::Center => {
                self.h_position_type = PositionType::Center;
                self.h = off_h;
                self.h_units = units_h;
                self.v_position_type = PositionType::Center;
                self.v = off_v;
                self.v_units = units_v;
            }
        }
        Ok(())
    }

    /// Set the size from strings like `"50"`, `"50%"` or `"1.5AR"`, plus optional
    /// aspect-ratio bounds (empty string disables a bound).
    pub fn set_size(&mut self, width: &str, height: &str, min_ar: &str, max_ar: &str) -> PanoplyResult<()> {
        self.set_width(width)?;
        self.set_height(height)?;
        self.min_aspect_ratio = parse_optional(min_ar)?;
        self.max_aspect_ratio = parse_optional(max_ar)?;
        Ok(())
    }

    /// Set the width from `"50"`, `"50%"` or `"1.5AR"`.
    pub fn set_width(&mut self, width: &str) -> PanoplyResult<()> {
        (self.width, self.width_units) = parse_width(width)?;
        Ok(())
    }

    /// Set the height from `"50"`, `"50%"` or `"0.75AR"`.
    pub fn set_height(&mut self, height: &str) -> PanoplyResult<()> {
        (self.height, self.height_units) = parse_height(height)?;
        Ok(())
    }

    /// Set each margin individually.
    pub fn set_margins(&mut self, top: f64, right: f64, bottom: f64, left: f64) {
        self.margins = Edges {
            top,
            right,
            bottom,
            left,
        };
    }

    /// Set every margin to `m`.
    pub fn set_all_margins(&mut self, m: f64) {
        self.margins = Edges::uniform(m);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/frame.rs"]
mod tests;
