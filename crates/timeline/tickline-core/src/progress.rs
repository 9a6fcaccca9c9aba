//! Progress math over a track and its current frame.
//!
//! - time fraction: `clamp01((elapsed - offset - delay) / duration)`, inverted when reversed
//! - progress: timing applied to the pre-reversal fraction, inverted when reversed, then remapped
//! - completion: forward frames complete at fraction 1, reversed frames at fraction 0
//!
//! Track-level overrides (timing, remap, reverse) take precedence over the frame's settings.

use crate::frame::Frame;
use crate::math::clamp01;
use crate::track::Track;

/// Values produced by one [`update`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sample {
    pub time_fraction: f64,
    pub progress: f64,
    pub complete: bool,
}

/// Effective direction: the track override if set, else the frame's current direction.
#[inline]
pub fn is_reversed(track: &Track, frame: &Frame) -> bool {
    track.reverse.unwrap_or_else(|| frame.reverse())
}

/// Fraction before direction reversal. A zero duration divides to NaN or +inf, which clamps to 1.
#[inline]
pub fn raw_time_fraction(track: &Track, frame: &Frame, offset: f64) -> f64 {
    clamp01((track.elapsed - offset - frame.delay) / frame.duration)
}

/// Direction-adjusted time fraction.
#[inline]
pub fn time_fraction(track: &Track, frame: &Frame, offset: f64) -> f64 {
    let raw = raw_time_fraction(track, frame, offset);
    if is_reversed(track, frame) {
        1.0 - raw
    } else {
        raw
    }
}

/// Progress for a pre-reversal fraction.
pub fn progress(track: &Track, frame: &Frame, raw_fraction: f64) -> f64 {
    let timing = track.timing.as_ref().unwrap_or(&frame.timing);
    let mut p = timing.apply(raw_fraction);
    if is_reversed(track, frame) {
        p = 1.0 - p;
    }
    match track.remap.or(frame.remap) {
        Some(range) => range.apply(p),
        None => p,
    }
}

/// Completion is decided on the fraction boundary, not on time.
#[inline]
pub fn is_frame_complete(track: &Track, frame: &Frame, time_fraction: f64) -> bool {
    if is_reversed(track, frame) {
        time_fraction == 0.0
    } else {
        time_fraction == 1.0
    }
}

/// Recompute fraction/progress/completion for `track` and store them on it.
/// Any incomplete frame clears the track's all-complete flag for this tick.
pub fn update(track: &mut Track, frame: &Frame, offset: f64) -> Sample {
    let raw = raw_time_fraction(track, frame, offset);
    let tf = if is_reversed(track, frame) {
        1.0 - raw
    } else {
        raw
    };
    let p = progress(track, frame, raw);
    let complete = is_frame_complete(track, frame, tf);

    track.raw_fraction = raw;
    track.time_fraction = tf;
    track.progress = p;
    track.frame_complete = complete;
    if !complete {
        track.all_complete = false;
    }

    Sample {
        time_fraction: tf,
        progress: p,
        complete,
    }
}
