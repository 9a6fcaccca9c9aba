//! Track runtime state.
//!
//! A `Track` is a plain record: where the track is in its frame list, how much time has elapsed
//! in the current frame, the last computed fraction/progress, and the flags the draw callback
//! raises to ask for advancement. The engine acts on those requests after the draw phase; the
//! math lives in [`crate::progress`].

use crate::math::Remap;
use crate::timing::Timing;

#[derive(Clone, Debug)]
pub struct Track {
    pub(crate) track_index: usize,
    pub(crate) frame_index: usize,
    /// Clock time (pause-corrected) at which the current frame began; set on the first tick
    /// after a frame change.
    pub(crate) start_time: Option<f64>,
    pub(crate) elapsed: f64,
    pub(crate) cycles: u32,

    // Overrides set from the draw callback; they win over the frame's own settings.
    pub(crate) reverse: Option<bool>,
    pub(crate) timing: Option<Timing>,
    pub(crate) remap: Option<Remap>,

    pub(crate) time_fraction: f64,
    pub(crate) raw_fraction: f64,
    pub(crate) progress: f64,

    pub(crate) frame_complete: bool,
    pub(crate) track_complete: bool,
    pub(crate) all_complete: bool,

    pub(crate) next_requested: bool,
    pub(crate) repeat_requested: bool,

    pub(crate) frame_started: bool,
    pub(crate) track_started: bool,
}

impl Track {
    pub fn new(track_index: usize) -> Self {
        Self {
            track_index,
            frame_index: 0,
            start_time: None,
            elapsed: 0.0,
            cycles: 0,
            reverse: None,
            timing: None,
            remap: None,
            time_fraction: 0.0,
            raw_fraction: 0.0,
            progress: 0.0,
            frame_complete: false,
            track_complete: false,
            all_complete: false,
            next_requested: false,
            repeat_requested: false,
            frame_started: false,
            track_started: false,
        }
    }

    /// Advance to the next frame (or wrap/complete) once the draw phase ends.
    #[inline]
    pub fn request_next(&mut self) {
        self.next_requested = true;
    }

    /// Restart the current frame once the draw phase ends. Takes priority over
    /// [`Track::request_next`] within the same tick.
    #[inline]
    pub fn request_repeat(&mut self) {
        self.repeat_requested = true;
    }

    #[inline]
    pub fn set_timing(&mut self, timing: Timing) -> &mut Self {
        self.timing = Some(timing);
        self
    }

    #[inline]
    pub fn set_remap(&mut self, remap: impl Into<Remap>) -> &mut Self {
        self.remap = Some(remap.into());
        self
    }

    #[inline]
    pub fn set_reverse(&mut self, reverse: bool) -> &mut Self {
        self.reverse = Some(reverse);
        self
    }

    /// Drop all overrides; the frame's settings apply again.
    #[inline]
    pub fn clear_overrides(&mut self) -> &mut Self {
        self.timing = None;
        self.remap = None;
        self.reverse = None;
        self
    }

    #[inline]
    pub fn track_index(&self) -> usize {
        self.track_index
    }

    #[inline]
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    #[inline]
    pub fn start_time(&self) -> Option<f64> {
        self.start_time
    }

    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Completed passes through the whole frame list.
    #[inline]
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    #[inline]
    pub fn reverse_override(&self) -> Option<bool> {
        self.reverse
    }

    #[inline]
    pub fn timing_override(&self) -> Option<&Timing> {
        self.timing.as_ref()
    }

    #[inline]
    pub fn remap_override(&self) -> Option<Remap> {
        self.remap
    }

    /// Direction-adjusted fraction from the last update.
    #[inline]
    pub fn time_fraction(&self) -> f64 {
        self.time_fraction
    }

    /// Fraction before direction reversal.
    #[inline]
    pub fn raw_fraction(&self) -> f64 {
        self.raw_fraction
    }

    #[inline]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[inline]
    pub fn is_frame_complete(&self) -> bool {
        self.frame_complete
    }

    #[inline]
    pub fn is_track_complete(&self) -> bool {
        self.track_complete
    }

    /// True until an update this tick reported an incomplete frame.
    #[inline]
    pub fn is_all_complete(&self) -> bool {
        self.all_complete
    }

    #[inline]
    pub fn is_next_requested(&self) -> bool {
        self.next_requested
    }

    #[inline]
    pub fn is_repeat_requested(&self) -> bool {
        self.repeat_requested
    }

    /// A new frame began since the previous draw.
    #[inline]
    pub fn frame_started(&self) -> bool {
        self.frame_started
    }

    /// The track began (play or wrap) since the previous draw.
    #[inline]
    pub fn track_started(&self) -> bool {
        self.track_started
    }

    /// Move to `index`; timing restarts on the next tick.
    pub(crate) fn set_frame(&mut self, index: usize) {
        self.frame_index = index;
        self.start_time = None;
        self.elapsed = 0.0;
        self.frame_started = true;
    }

    /// Per-tick time bookkeeping and flag reset, run before draw.
    pub(crate) fn begin_tick(&mut self, time: f64) {
        let start = *self.start_time.get_or_insert(time);
        self.elapsed = time - start;
        self.frame_complete = false;
        self.all_complete = true;
        self.repeat_requested = false;
        self.next_requested = false;
    }

    pub(crate) fn clear_started(&mut self) {
        self.frame_started = false;
        self.track_started = false;
    }

    pub(crate) fn mark_started(&mut self) {
        self.frame_started = true;
        self.track_started = true;
    }
}
