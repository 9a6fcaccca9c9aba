//! Shared per-definition state handed to the draw callback.
//!
//! `TimelineState` owns the resolved frame lists and the tracks of one run. The draw callback
//! calls [`TimelineState::update`] for each track it cares about, reads `time_fraction` and
//! `progress`, and raises advancement requests through [`TimelineState::track_mut`]. A keyed
//! value store lets the callback stash derived values between ticks.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::frame::Frame;
use crate::progress::{self, Sample};
use crate::track::Track;

/// Animation-wide one-shot flags observed by the draw callback.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationEvents {
    /// Set only for the synchronous draw performed by `set()`.
    pub initial_draw: bool,
    /// Set for the first draw after `play()`.
    pub animation_started: bool,
}

#[derive(Debug)]
pub struct TimelineState {
    /// Fraction of the most recently updated track.
    pub time_fraction: f64,
    /// Progress of the most recently updated track.
    pub progress: f64,
    frames: Vec<Vec<Frame>>,
    tracks: Vec<Track>,
    store: HashMap<String, Value>,
}

impl TimelineState {
    pub fn new(frames: Vec<Vec<Frame>>, store_capacity: usize) -> Self {
        let tracks = (0..frames.len()).map(Track::new).collect();
        Self {
            time_fraction: 0.0,
            progress: 0.0,
            frames,
            tracks,
            store: HashMap::with_capacity(store_capacity),
        }
    }

    /// Recompute the sample for track `index` and expose it as `time_fraction`/`progress`.
    #[inline]
    pub fn update(&mut self, index: usize) -> Option<Sample> {
        self.update_with_offset(index, 0.0)
    }

    /// Same as [`TimelineState::update`], shifting the track's elapsed time back by `offset`.
    /// Useful for staggering several targets along one track.
    pub fn update_with_offset(&mut self, index: usize, offset: f64) -> Option<Sample> {
        let track = self.tracks.get_mut(index)?;
        let frame = self.frames.get(index)?.get(track.frame_index)?;
        let sample = progress::update(track, frame, offset);
        self.time_fraction = sample.time_fraction;
        self.progress = sample.progress;
        Some(sample)
    }

    /// Update every track in index order.
    pub fn update_all(&mut self) {
        for index in 0..self.tracks.len() {
            self.update(index);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    #[inline]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    #[inline]
    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    #[inline]
    pub fn track_mut(&mut self, index: usize) -> Option<&mut Track> {
        self.tracks.get_mut(index)
    }

    /// Current frame of track `index`.
    pub fn frame(&self, index: usize) -> Option<&Frame> {
        let track = self.tracks.get(index)?;
        self.frames.get(index)?.get(track.frame_index)
    }

    /// Full frame list of track `index`.
    pub fn frames(&self, index: usize) -> Option<&[Frame]> {
        self.frames.get(index).map(Vec::as_slice)
    }

    pub fn request_next(&mut self, index: usize) {
        if let Some(t) = self.tracks.get_mut(index) {
            t.request_next();
        }
    }

    pub fn request_repeat(&mut self, index: usize) {
        if let Some(t) = self.tracks.get_mut(index) {
            t.request_repeat();
        }
    }

    /// True when every track has finished its last frame without wrapping.
    pub fn is_finished(&self) -> bool {
        self.tracks.iter().all(|t| t.track_complete)
    }

    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.store.insert(key.into(), value.into());
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.store.get(key)
    }

    pub fn remove_value(&mut self, key: &str) -> Option<Value> {
        self.store.remove(key)
    }

    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.store.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn tracks_and_frames_mut(&mut self) -> (&mut [Track], &mut [Vec<Frame>]) {
        (&mut self.tracks, &mut self.frames)
    }

    /// Hard reset: fresh tracks and frame counters back to their base values.
    /// Stored values survive; they belong to the draw callback.
    pub(crate) fn reset(&mut self) {
        for (index, track) in self.tracks.iter_mut().enumerate() {
            *track = Track::new(index);
        }
        for frame in self.frames.iter_mut().flatten() {
            frame.reset();
        }
        self.time_fraction = 0.0;
        self.progress = 0.0;
    }

    pub(crate) fn mark_started(&mut self) {
        for track in &mut self.tracks {
            track.mark_started();
        }
    }
}
