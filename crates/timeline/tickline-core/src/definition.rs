//! Animation definitions: the immutable input handed to `Animator::set`.
//!
//! Numeric parts (tracks, remap, repeat, direction) can be loaded from JSON through
//! [`parse_definition_json`]; callbacks and timing functions are attached in code.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TimelineError;
use crate::frame::{FrameDefaults, FrameSpec};
use crate::math::Remap;
use crate::state::{AnimationEvents, TimelineState};
use crate::timing::Timing;
use crate::track::Track;

pub type DrawFn = Box<dyn FnMut(&mut TimelineState, &AnimationEvents)>;
pub type TrackHook = Box<dyn FnMut(&Track)>;
pub type FinishedHook = Box<dyn FnMut()>;

/// What happens when a track requests the frame after its last one.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawRepeat", into = "RawRepeat")]
pub enum Repeat {
    /// Complete the track.
    #[default]
    Off,
    /// Wrap to the first frame forever.
    Forever,
    /// Wrap until the track has completed this many cycles, then complete.
    Times(u32),
}

impl Repeat {
    /// Whether a track that has already completed `cycles` passes may wrap again.
    #[inline]
    pub fn allows_wrap(&self, cycles: u32) -> bool {
        match self {
            Self::Off => false,
            Self::Forever => true,
            Self::Times(n) => cycles < *n,
        }
    }
}

impl From<bool> for Repeat {
    fn from(flag: bool) -> Self {
        if flag {
            Self::Forever
        } else {
            Self::Off
        }
    }
}

impl From<u32> for Repeat {
    fn from(count: u32) -> Self {
        if count == 0 {
            Self::Off
        } else {
            Self::Times(count)
        }
    }
}

#[derive(Copy, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawRepeat {
    Flag(bool),
    Count(u32),
}

impl From<RawRepeat> for Repeat {
    fn from(raw: RawRepeat) -> Self {
        match raw {
            RawRepeat::Flag(b) => b.into(),
            RawRepeat::Count(n) => n.into(),
        }
    }
}

impl From<Repeat> for RawRepeat {
    fn from(r: Repeat) -> Self {
        match r {
            Repeat::Off => RawRepeat::Flag(false),
            Repeat::Forever => RawRepeat::Flag(true),
            Repeat::Times(n) => RawRepeat::Count(n),
        }
    }
}

/// Default playback direction for frames that do not set their own.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    Normal,
    Reverse,
    Alternate,
    AlternateReverse,
}

impl Direction {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Reverse => "reverse",
            Self::Alternate => "alternate",
            Self::AlternateReverse => "alternate-reverse",
        }
    }

    #[inline]
    pub fn is_reverse(&self) -> bool {
        matches!(self, Self::Reverse | Self::AlternateReverse)
    }

    #[inline]
    pub fn is_alternate(&self) -> bool {
        matches!(self, Self::Alternate | Self::AlternateReverse)
    }
}

impl FromStr for Direction {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "reverse" => Ok(Self::Reverse),
            "alternate" => Ok(Self::Alternate),
            "alternate-reverse" => Ok(Self::AlternateReverse),
            other => Err(TimelineError::invalid("direction", other)),
        }
    }
}

/// Serializable part of a definition.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DefinitionSpec {
    #[serde(default)]
    pub frames: Option<Vec<Vec<FrameSpec>>>,
    #[serde(default)]
    pub remap: Option<Remap>,
    #[serde(default)]
    pub repeat: Repeat,
    #[serde(default)]
    pub direction: Direction,
}

/// Parse a JSON definition descriptor.
pub fn parse_definition_json(s: &str) -> Result<DefinitionSpec, TimelineError> {
    serde_json::from_str(s).map_err(|e| {
        let err = TimelineError::from(e);
        log::warn!("rejected definition ({}): {err}", err.category());
        err
    })
}

/// Full definition: tracks, defaults and callbacks.
#[derive(Default)]
pub struct AnimationDefinition {
    pub frames: Vec<Vec<FrameSpec>>,
    pub timing: Option<Timing>,
    pub remap: Option<Remap>,
    pub repeat: Repeat,
    pub direction: Direction,
    pub draw: Option<DrawFn>,
    pub after_frame: Option<TrackHook>,
    pub after_track: Option<TrackHook>,
    pub finished: Option<FinishedHook>,
}

impl AnimationDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one track. An empty frame list is skipped when the definition is set, and later
    /// tracks take its index.
    pub fn with_track(mut self, frames: Vec<FrameSpec>) -> Self {
        self.frames.push(frames);
        self
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = Some(timing);
        self
    }

    pub fn with_remap(mut self, remap: impl Into<Remap>) -> Self {
        self.remap = Some(remap.into());
        self
    }

    pub fn with_repeat(mut self, repeat: impl Into<Repeat>) -> Self {
        self.repeat = repeat.into();
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn on_draw<F>(mut self, draw: F) -> Self
    where
        F: FnMut(&mut TimelineState, &AnimationEvents) + 'static,
    {
        self.draw = Some(Box::new(draw));
        self
    }

    pub fn on_after_frame<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&Track) + 'static,
    {
        self.after_frame = Some(Box::new(hook));
        self
    }

    pub fn on_after_track<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&Track) + 'static,
    {
        self.after_track = Some(Box::new(hook));
        self
    }

    pub fn on_finished<F>(mut self, hook: F) -> Self
    where
        F: FnMut() + 'static,
    {
        self.finished = Some(Box::new(hook));
        self
    }

    pub(crate) fn frame_defaults(&self) -> FrameDefaults {
        FrameDefaults {
            timing: self.timing.clone(),
            remap: self.remap,
            direction: self.direction,
        }
    }
}

impl From<DefinitionSpec> for AnimationDefinition {
    fn from(spec: DefinitionSpec) -> Self {
        Self {
            frames: spec.frames.unwrap_or_default(),
            remap: spec.remap,
            repeat: spec.repeat,
            direction: spec.direction,
            ..Self::default()
        }
    }
}

impl fmt::Debug for AnimationDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationDefinition")
            .field("frames", &self.frames)
            .field("timing", &self.timing)
            .field("remap", &self.remap)
            .field("repeat", &self.repeat)
            .field("direction", &self.direction)
            .field("draw", &self.draw.is_some())
            .field("after_frame", &self.after_frame.is_some())
            .field("after_track", &self.after_track.is_some())
            .field("finished", &self.finished.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_accepts_flag_or_count() {
        let r: Repeat = serde_json::from_str("true").unwrap();
        assert_eq!(r, Repeat::Forever);
        let r: Repeat = serde_json::from_str("false").unwrap();
        assert_eq!(r, Repeat::Off);
        let r: Repeat = serde_json::from_str("3").unwrap();
        assert_eq!(r, Repeat::Times(3));
        let r: Repeat = serde_json::from_str("0").unwrap();
        assert_eq!(r, Repeat::Off);
        assert_eq!(serde_json::to_string(&Repeat::Times(2)).unwrap(), "2");
        assert_eq!(serde_json::to_string(&Repeat::Forever).unwrap(), "true");
    }

    #[test]
    fn repeat_wrap_rules() {
        assert!(!Repeat::Off.allows_wrap(0));
        assert!(Repeat::Forever.allows_wrap(u32::MAX));
        assert!(Repeat::Times(2).allows_wrap(1));
        assert!(!Repeat::Times(2).allows_wrap(2));
    }

    #[test]
    fn direction_names_round_trip() {
        for d in [
            Direction::Normal,
            Direction::Reverse,
            Direction::Alternate,
            Direction::AlternateReverse,
        ] {
            assert_eq!(d.name().parse::<Direction>().unwrap(), d);
        }
        assert!("sideways".parse::<Direction>().is_err());
        let d: Direction = serde_json::from_str("\"alternate-reverse\"").unwrap();
        assert_eq!(d, Direction::AlternateReverse);
    }

    #[test]
    fn parses_definition_without_frames() {
        let spec = parse_definition_json(r#"{"repeat": true}"#).unwrap();
        assert!(spec.frames.is_none());
        let def = AnimationDefinition::from(spec);
        assert!(def.frames.is_empty());
        assert_eq!(def.repeat, Repeat::Forever);
    }

    #[test]
    fn rejects_malformed_json() {
        let err = parse_definition_json(r#"{"frames": 12}"#).unwrap_err();
        assert_eq!(err.category(), "serialization");
    }
}
