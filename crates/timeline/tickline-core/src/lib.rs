//! Tickline Core (host-agnostic)
//!
//! A tick-driven timeline engine. An [`AnimationDefinition`] describes one or more tracks, each
//! an ordered list of timed frames. Every host tick the [`Animator`] converts elapsed clock time
//! into per-track time fractions and progress values, hands them to a draw callback, and advances
//! tracks the callback marked as done. Rendering is entirely up to the callback; the host clock
//! and refresh scheduler are injected through [`Clock`] and [`Scheduler`].

pub mod animator;
pub mod config;
pub mod definition;
pub mod error;
pub mod frame;
pub mod host;
pub mod math;
pub mod playback_state;
pub mod progress;
pub mod state;
pub mod timeline;
pub mod timing;
pub mod track;

pub use animator::{Animator, Completion, CompletionStatus, TickOutcome};
pub use config::Config;
pub use definition::{parse_definition_json, AnimationDefinition, DefinitionSpec, Direction, Repeat};
pub use error::TimelineError;
pub use frame::{Frame, FrameSpec};
pub use host::{Clock, ManualClock, ManualScheduler, Scheduler, SystemClock, TickHandle};
pub use math::{random_in_range, steps, Remap};
pub use playback_state::PlaybackState;
pub use progress::Sample;
pub use state::{AnimationEvents, TimelineState};
pub use timeline::{StepOutcome, Timeline};
pub use timing::Timing;
pub use track::Track;

/// Result type for the loading surface.
pub type Result<T> = core::result::Result<T, TimelineError>;
