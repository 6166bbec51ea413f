use crate::layout::viewport::Viewport;
use crate::timeline::clock::TimelineClock;

/// Normalized controller axes supplied by the input collaborator, nominally in `[-1, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InputAxes {
    /// Device tilt around the vertical axis.
    #[serde(default)]
    pub horizontal_tilt: f64,
    /// Device tilt around the horizontal axis.
    #[serde(default)]
    pub vertical_tilt: f64,
}

impl InputAxes {
    /// Build an [`InputAxes`] value.
    pub fn new(horizontal_tilt: f64, vertical_tilt: f64) -> Self {
        Self {
            horizontal_tilt,
            vertical_tilt,
        }
    }
}

/// Everything an entity reads during one tick.
///
/// The clock is borrowed immutably so every entity in a tick sees one snapshot.
#[derive(Clone, Copy, Debug)]
pub struct TickContext<'a> {
    /// Timeline snapshot for this tick.
    pub clock: &'a TimelineClock,
    /// Renderer screen configuration; `None` while the renderer is unavailable.
    pub viewport: Option<&'a Viewport>,
    /// Controller axes.
    pub axes: InputAxes,
    /// Seconds since the previous tick.
    pub dt: f64,
}

impl<'a> TickContext<'a> {
    /// Context with no renderer, neutral axes and zero elapsed time.
    pub fn new(clock: &'a TimelineClock) -> Self {
        Self {
            clock,
            viewport: None,
            axes: InputAxes::default(),
            dt: 0.0,
        }
    }

    /// Attach a viewport.
    pub fn with_viewport(mut self, viewport: &'a Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }

    /// Set controller axes.
    pub fn with_axes(mut self, axes: InputAxes) -> Self {
        self.axes = axes;
        self
    }

    /// Set the elapsed time.
    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }
}
