//! Frame model: raw descriptors and their resolved, per-run form.
//!
//! A [`FrameSpec`] is what callers (or JSON) provide; every field is optional. [`Frame::resolve`]
//! fills in the definition defaults once per `set()` and the result is never re-derived mid-run.
//! The only fields that change during a run are the embedded cycle counter and the
//! alternation-derived reverse flag, both restored by [`Frame::reset`].

use serde::{Deserialize, Serialize};

use crate::definition::Direction;
use crate::math::Remap;
use crate::timing::Timing;

/// Raw frame descriptor.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FrameSpec {
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub delay: Option<f64>,
    #[serde(skip)]
    pub timing: Option<Timing>,
    #[serde(default)]
    pub remap: Option<Remap>,
    #[serde(default)]
    pub reverse: Option<bool>,
    #[serde(default)]
    pub alternate: Option<bool>,
}

impl FrameSpec {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a frame that only sets its duration.
    #[inline]
    pub fn lasting(duration: f64) -> Self {
        Self::new().with_duration(duration)
    }

    #[inline]
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    #[inline]
    pub fn with_delay(mut self, delay: f64) -> Self {
        self.delay = Some(delay);
        self
    }

    #[inline]
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = Some(timing);
        self
    }

    #[inline]
    pub fn with_remap(mut self, remap: impl Into<Remap>) -> Self {
        self.remap = Some(remap.into());
        self
    }

    #[inline]
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = Some(reverse);
        self
    }

    #[inline]
    pub fn with_alternate(mut self, alternate: bool) -> Self {
        self.alternate = Some(alternate);
        self
    }
}

/// Definition-level values a frame falls back to.
#[derive(Clone, Debug, Default)]
pub struct FrameDefaults {
    pub timing: Option<Timing>,
    pub remap: Option<Remap>,
    pub direction: Direction,
}

/// Resolved frame.
#[derive(Clone, Debug)]
pub struct Frame {
    pub duration: f64,
    pub delay: f64,
    pub timing: Timing,
    pub remap: Option<Remap>,
    /// Base direction: plays 1 -> 0 when set.
    pub is_reverse: bool,
    /// Flip direction after every completed pass of this frame.
    pub is_alternate: bool,
    reverse: bool,
    cycles: u32,
}

fn non_negative(v: Option<f64>) -> f64 {
    match v {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

impl Frame {
    pub fn resolve(spec: &FrameSpec, defaults: &FrameDefaults) -> Self {
        let is_reverse = spec
            .reverse
            .unwrap_or_else(|| defaults.direction.is_reverse());
        let is_alternate = spec
            .alternate
            .unwrap_or_else(|| defaults.direction.is_alternate());
        Self {
            duration: non_negative(spec.duration),
            delay: non_negative(spec.delay),
            timing: spec
                .timing
                .clone()
                .or_else(|| defaults.timing.clone())
                .unwrap_or_default(),
            remap: spec.remap.or(defaults.remap),
            is_reverse,
            is_alternate,
            reverse: is_reverse,
            cycles: 0,
        }
    }

    /// Current direction, after alternation.
    #[inline]
    pub fn reverse(&self) -> bool {
        self.reverse
    }

    /// Completed passes through this frame in the current run.
    #[inline]
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Bookkeeping after this frame finishes a pass. Alternating frames flip direction:
    /// odd cycle counts play against the base direction.
    pub(crate) fn complete_pass(&mut self) {
        self.cycles = self.cycles.saturating_add(1);
        if self.is_alternate {
            self.reverse = (self.cycles + self.is_reverse as u32) % 2 == 1;
        }
    }

    pub(crate) fn reset(&mut self) {
        self.cycles = 0;
        self.reverse = self.is_reverse;
    }
}

/// Resolve every track's frame list. Tracks without frames are dropped and the tracks after
/// them shift down, so `[[a], [], [b]]` runs `b` as track 1.
pub fn resolve_tracks(specs: &[Vec<FrameSpec>], defaults: &FrameDefaults) -> Vec<Vec<Frame>> {
    specs
        .iter()
        .enumerate()
        .filter_map(|(idx, track)| {
            if track.is_empty() {
                log::warn!("track {idx} has no frames; skipping");
                return None;
            }
            Some(track.iter().map(|f| Frame::resolve(f, defaults)).collect())
        })
        .collect()
}
