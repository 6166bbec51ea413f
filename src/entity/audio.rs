use crate::foundation::math::lerp;
use crate::sequencer::resolve::{Sequencer, SequencerMode, StepCursor};
use crate::timeline::tick::TickContext;

/// Looping voices quieter than this are stopped.
const SILENCE: f64 = 0.001;

/// Handle to a voice started by an [`AudioSink`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VoiceId(pub u64);

/// Audio playback collaborator.
pub trait AudioSink {
    /// Start `clip` and return a handle to the new voice.
    fn play(&mut self, clip: &str, looping: bool, volume: f64) -> VoiceId;
    /// Whether the voice is still audible.
    fn is_playing(&self, voice: VoiceId) -> bool;
    /// Current voice volume.
    fn volume(&self, voice: VoiceId) -> f64;
    /// Change a voice's volume.
    fn set_volume(&mut self, voice: VoiceId, volume: f64);
    /// Stop a voice.
    fn stop(&mut self, voice: VoiceId);
}

/// One instrument keyframe.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InstrumentState {
    /// Target volume in `[0, 1]`.
    #[serde(default)]
    pub volume: f64,
}

fn default_fade_time() -> f64 {
    1.0
}

/// Non-keyframed instrument settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InstrumentOptions {
    /// Clip to play; instruments without one stay silent.
    #[serde(default)]
    pub clip: Option<String>,
    /// Loop the clip and fade between volumes instead of firing once per step.
    #[serde(default)]
    pub does_loop: bool,
    /// Seconds for a full fade.
    #[serde(default = "default_fade_time")]
    pub fade_time: f64,
}

impl Default for InstrumentOptions {
    fn default() -> Self {
        Self {
            clip: None,
            does_loop: false,
            fade_time: default_fade_time(),
        }
    }
}

/// A single audio channel driven by the step script.
///
/// Only the current state matters; instruments never blend between keyframes.
#[derive(Debug)]
pub struct Instrument {
    name: String,
    states: Sequencer<InstrumentState>,
    options: InstrumentOptions,
    voice: Option<VoiceId>,
    last_played_step: Option<usize>,
}

impl Instrument {
    /// Build an [`Instrument`] value.
    pub fn new(name: impl Into<String>, states: Sequencer<InstrumentState>, options: InstrumentOptions) -> Self {
        Self {
            name: name.into(),
            states,
            options,
            voice: None,
            last_played_step: None,
        }
    }

    /// Instrument name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Non-keyframed settings.
    pub fn options(&self) -> &InstrumentOptions {
        &self.options
    }

    /// Switch the sequencer's resolution mode.
    pub fn set_mode(&mut self, mode: SequencerMode) {
        self.states.set_mode(mode);
    }

    /// Keyframe sequencer.
    pub fn states(&self) -> &Sequencer<InstrumentState> {
        &self.states
    }

    /// Voice currently owned by the instrument.
    pub fn voice(&self) -> Option<VoiceId> {
        self.voice
    }

    /// Target volume for this tick, if the current state resolves.
    pub fn target_volume(&self, ctx: &TickContext<'_>) -> Option<f64> {
        let cursor = StepCursor::from_clock(ctx.clock, self.states.start_index());
        self.states.current(cursor).map(|s| s.volume)
    }

    /// Start, fade or stop the instrument's voice. Returns the voice volume afterwards
    /// while it is playing.
    pub fn update(&mut self, ctx: &TickContext<'_>, sink: &mut dyn AudioSink) -> Option<f64> {
        let step = ctx.clock.target_step();
        if self.last_played_step != Some(step) {
            self.last_played_step = None;
        }

        let target = self.target_volume(ctx)?;
        let clip = self.options.clip.clone()?;
        let rate = ctx.dt / (self.options.fade_time * 0.5).max(0.0001);
        let playing = self.voice.filter(|v| sink.is_playing(*v));

        match playing {
            Some(voice) => {
                let current = sink.volume(voice);
                if self.options.does_loop && target > 0.0 {
                    if current != target {
                        sink.set_volume(voice, lerp(&current, &target, rate));
                    }
                } else if current < SILENCE {
                    tracing::trace!(instrument = %self.name, "voice faded out");
                    sink.stop(voice);
                } else {
                    sink.set_volume(voice, lerp(&current, &target, rate));
                }
            }
            None if target > 0.0 => {
                if self.options.does_loop || self.last_played_step != Some(step) {
                    self.start(sink, &clip, target, step);
                }
            }
            None => {}
        }

        self.voice
            .filter(|v| sink.is_playing(*v))
            .map(|v| sink.volume(v))
    }

    fn start(&mut self, sink: &mut dyn AudioSink, clip: &str, volume: f64, step: usize) {
        let initial = if self.options.does_loop { 0.0 } else { volume };
        tracing::debug!(instrument = %self.name, clip, step, looping = self.options.does_loop, "voice started");
        self.voice = Some(sink.play(clip, self.options.does_loop, initial));
        self.last_played_step = Some(step);
    }
}

/// Voice record kept by [`MemorySink`].
#[derive(Clone, Debug, PartialEq)]
pub struct Voice {
    /// Clip name.
    pub clip: String,
    /// Looping flag.
    pub looping: bool,
    /// Current volume.
    pub volume: f64,
    /// Whether the voice is audible.
    pub playing: bool,
}

/// In-memory [`AudioSink`] for headless runs: voices play until stopped or finished.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    voices: Vec<Voice>,
}

impl MemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every voice ever started, indexed by [`VoiceId`].
    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    /// Look up a voice.
    pub fn voice(&self, voice: VoiceId) -> Option<&Voice> {
        self.voices.get(voice.0 as usize)
    }

    /// Mark a one-shot voice as having reached its end.
    pub fn finish(&mut self, voice: VoiceId) {
        if let Some(v) = self.voices.get_mut(voice.0 as usize) {
            v.playing = false;
        }
    }
}

impl AudioSink for MemorySink {
    fn play(&mut self, clip: &str, looping: bool, volume: f64) -> VoiceId {
        self.voices.push(Voice {
            clip: clip.to_owned(),
            looping,
            volume,
            playing: true,
        });
        VoiceId(self.voices.len() as u64 - 1)
    }

    fn is_playing(&self, voice: VoiceId) -> bool {
        self.voice(voice).is_some_and(|v| v.playing)
    }

    fn volume(&self, voice: VoiceId) -> f64 {
        self.voice(voice).map_or(0.0, |v| v.volume)
    }

    fn set_volume(&mut self, voice: VoiceId, volume: f64) {
        if let Some(v) = self.voices.get_mut(voice.0 as usize) {
            v.volume = volume;
        }
    }

    fn stop(&mut self, voice: VoiceId) {
        self.finish(voice);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/entity/audio.rs"]
mod tests;
