//! Panoply is a step-driven engine for animated panel comics.
//!
//! A scene is a discrete timeline of steps. Every animated entity owns a keyframe
//! library and a per-step script; each tick the entity brackets the current step,
//! blends the two keyframes by the clock's fractional progress and emits plain data
//! for a renderer to consume:
//!
//! - [`TimelineClock`] tracks the target and interpolated step
//! - [`Sequencer`] resolves scripts (including `Hold` runs) into keyframe brackets
//! - [`compute_rect`] solves a [`FrameState`] into a screen rect
//! - [`Panel`] combines frame, camera and passive motion into a [`PanelOutput`]
//! - [`Artwork`], [`Caption`] and [`Instrument`] animate content inside panels
//! - [`Scene`] loads all of the above from JSON and ticks them in order
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod compositor;
mod entity;
mod foundation;
mod layout;
mod scene;
mod sequencer;
mod timeline;

pub use crate::foundation::core::{Point, Rect, Rgba, Size, Vec2, Vec3, rect_xywh};
pub use crate::foundation::error::{PanoplyError, PanoplyResult};
pub use crate::foundation::math::{Lerp, clamp01, inverse_lerp, lerp, overlaps, round_half_even, wrap_tau};

pub use crate::timeline::clock::{DEFAULT_GESTURE_RATE, Direction, SceneEntry, StepChange, TimelineClock};
pub use crate::timeline::tick::{InputAxes, TickContext};
pub use crate::timeline::trigger::{AnimationTrigger, TriggerDirection, TriggerTable};

pub use crate::sequencer::resolve::{Bracket, Sequencer, SequencerMode, StepCursor};
pub use crate::sequencer::script::{HOLD_LABEL, Labeled, ScriptEntry, StateId, StateLibrary, StateScript};

pub use crate::layout::frame::{
    Edges, FrameState, HeightCalcMethod, HeightUnits, PanelPosition, PositionAlignHorz,
    PositionAlignVert, PositionEdgeHorz, PositionEdgeVert, PositionType, PositionUnits,
    WidthCalcMethod, WidthUnits, parse_position,
};
pub use crate::layout::solver::{FrameRect, MARGIN_FACTOR, compute_rect};
pub use crate::layout::viewport::Viewport;

pub use crate::compositor::camera::{
    CameraPose, CameraState, FieldOfView, MAX_FOV, Orientation, OrientationType, framing_offset,
    vertical_fov,
};
pub use crate::compositor::panel::{Panel, PanelOptions, PanelOutput};
pub use crate::compositor::passive::{
    ControllerInput, MotionOffset, OutputProperty, OutputType, PassiveMotion, PassiveMotionState,
};

pub use crate::entity::artwork::{
    Artwork, ArtworkOptions, ArtworkOutput, ArtworkPositionType, ArtworkState, PanelLink,
};
pub use crate::entity::audio::{
    AudioSink, Instrument, InstrumentOptions, InstrumentState, MemorySink, Voice, VoiceId,
};
pub use crate::entity::balloon::{BalloonShape, DEFAULT_SEGMENTS, OutlinePoint, Tail, tail_angle};
pub use crate::entity::caption::{
    Caption, CaptionHorzAlign, CaptionOutput, CaptionState, CaptionVertAlign, LayoutBox,
    TailGeometry,
};

pub use crate::scene::runtime::{Navigation, Scene, SceneFrame};
