//! Playback controller.
//!
//! Owns the playback state, the pause offset, the pending tick request and the active
//! [`Timeline`]. Transitions:
//! - `play`: stopped|paused -> playing (resume folds the paused span into the offset)
//! - `pause`: playing -> paused (cancels the pending tick, keeps track state)
//! - `stop`: any -> stopped (cancels, hard-resets tracks and frame counters)
//! - `restart`: stop then play; `destroy`: stop and drop the definition
//!
//! Inapplicable calls are no-ops.

use std::cell::Cell;
use std::rc::Rc;

use crate::config::Config;
use crate::definition::AnimationDefinition;
use crate::host::{Clock, Scheduler, TickHandle};
use crate::math;
use crate::playback_state::PlaybackState;
use crate::state::TimelineState;
use crate::timeline::{StepOutcome, Timeline};

/// What a call to [`Animator::tick`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// No tick was pending (never played, paused, stopped or destroyed); nothing ran.
    Ignored,
    /// The timeline ran and another tick was requested.
    Continued,
    /// The timeline ran and every track is complete.
    Finished,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CompletionStatus {
    Pending,
    Finished,
    /// The run was stopped, destroyed or replaced before finishing.
    Cancelled,
}

/// Settles when the run it was issued for finishes.
#[derive(Clone, Debug)]
pub struct Completion {
    status: Rc<Cell<CompletionStatus>>,
}

impl Completion {
    fn new() -> Self {
        Self {
            status: Rc::new(Cell::new(CompletionStatus::Pending)),
        }
    }

    #[inline]
    pub fn status(&self) -> CompletionStatus {
        self.status.get()
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.status() == CompletionStatus::Finished
    }

    #[inline]
    pub fn is_settled(&self) -> bool {
        self.status() != CompletionStatus::Pending
    }

    fn settle(&self, status: CompletionStatus) {
        if self.status.get() == CompletionStatus::Pending {
            self.status.set(status);
        }
    }
}

#[derive(Debug)]
pub struct Animator<C: Clock, S: Scheduler> {
    cfg: Config,
    clock: C,
    scheduler: S,
    state: PlaybackState,
    paused_offset: f64,
    paused_at: Option<f64>,
    pending: Option<TickHandle>,
    timeline: Option<Timeline>,
    completions: Vec<Completion>,
}

impl<C: Clock, S: Scheduler> Animator<C, S> {
    pub fn new(clock: C, scheduler: S) -> Self {
        Self::with_config(Config::default(), clock, scheduler)
    }

    pub fn with_config(cfg: Config, clock: C, scheduler: S) -> Self {
        Self {
            cfg,
            clock,
            scheduler,
            state: PlaybackState::Stopped,
            paused_offset: 0.0,
            paused_at: None,
            pending: None,
            timeline: None,
            completions: Vec::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    #[inline]
    pub fn playback_state(&self) -> PlaybackState {
        self.state
    }

    /// Total time spent paused in the current run.
    #[inline]
    pub fn paused_offset(&self) -> f64 {
        self.paused_offset
    }

    #[inline]
    pub fn is_tick_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Every track of the current run completed and `finished` fired.
    pub fn is_finished(&self) -> bool {
        self.timeline.as_ref().is_some_and(Timeline::is_finished)
    }

    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline.as_ref()
    }

    pub fn timeline_state(&self) -> Option<&TimelineState> {
        self.timeline.as_ref().map(Timeline::state)
    }

    pub fn timeline_state_mut(&mut self) -> Option<&mut TimelineState> {
        self.timeline.as_mut().map(Timeline::state_mut)
    }

    /// Replace the definition and draw once synchronously. Playback state is unchanged; while
    /// playing, the next tick runs the new definition.
    pub fn set(&mut self, definition: AnimationDefinition) {
        log::debug!(
            "set definition: {} tracks, repeat={:?}, direction={}",
            definition.frames.len(),
            definition.repeat,
            definition.direction.name()
        );
        self.settle_completions(CompletionStatus::Cancelled);
        let mut timeline = Timeline::new(definition, &self.cfg);
        if self.cfg.initial_draw {
            timeline.initial_draw();
        }
        let live = !timeline.state().is_empty();
        self.timeline = Some(timeline);
        if live && self.state.is_playing() {
            self.request_tick();
        }
    }

    pub fn play(&mut self) {
        if !self.state.can_play() {
            return;
        }
        if let Some(at) = self.paused_at.take() {
            self.paused_offset += self.clock.now() - at;
        }
        log::debug!(
            "{} -> playing (paused offset {:.3})",
            self.state.name(),
            self.paused_offset
        );
        self.state = PlaybackState::Playing;

        match self.timeline.as_mut() {
            Some(timeline) if timeline.is_finished() => {}
            Some(timeline) if !timeline.state().is_empty() => {
                timeline.mark_started();
                self.request_tick();
            }
            Some(timeline) => {
                timeline.finish();
                self.settle_completions(CompletionStatus::Finished);
            }
            None => self.settle_completions(CompletionStatus::Finished),
        }
    }

    /// Like [`Animator::play`], returning a handle that settles when this run finishes.
    pub fn play_until_finished(&mut self) -> Completion {
        let completion = Completion::new();
        self.completions.push(completion.clone());
        self.play();
        if self.is_finished() {
            self.settle_completions(CompletionStatus::Finished);
        }
        completion
    }

    pub fn pause(&mut self) {
        if !self.state.can_pause() {
            return;
        }
        log::debug!("playing -> paused");
        self.state = PlaybackState::Paused;
        self.paused_at = Some(self.clock.now());
        self.cancel_tick();
    }

    pub fn stop(&mut self) {
        log::debug!("{} -> stopped", self.state.name());
        self.state = PlaybackState::Stopped;
        self.cancel_tick();
        self.paused_at = None;
        self.paused_offset = 0.0;
        if let Some(timeline) = self.timeline.as_mut() {
            timeline.reset();
        }
        self.settle_completions(CompletionStatus::Cancelled);
    }

    pub fn restart(&mut self) {
        self.stop();
        self.play();
    }

    /// Stop and release the definition. No callback fires after this returns.
    pub fn destroy(&mut self) {
        self.stop();
        self.timeline = None;
    }

    /// Host entry point: run one tick at clock `time`.
    pub fn tick(&mut self, time: f64) -> TickOutcome {
        if self.pending.take().is_none() || !self.state.is_playing() {
            return TickOutcome::Ignored;
        }
        let Some(timeline) = self.timeline.as_mut() else {
            log::warn!("tick without a definition");
            return TickOutcome::Ignored;
        };
        match timeline.step(time, self.paused_offset) {
            StepOutcome::Continue => {
                self.request_tick();
                TickOutcome::Continued
            }
            StepOutcome::Finished => {
                self.settle_completions(CompletionStatus::Finished);
                TickOutcome::Finished
            }
        }
    }

    /// Quantize `fraction` into `step_count` levels using the configured lower bound.
    #[inline]
    pub fn steps(&self, fraction: f64, step_count: u32) -> f64 {
        math::steps_with_epsilon(fraction, step_count, self.cfg.steps_epsilon)
    }

    #[inline]
    pub fn random_in_range(&self, min: f64, max: f64) -> f64 {
        math::random_in_range(min, max)
    }

    fn request_tick(&mut self) {
        if self.pending.is_none() {
            self.pending = Some(self.scheduler.request_tick());
        }
    }

    fn cancel_tick(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn settle_completions(&mut self, status: CompletionStatus) {
        for c in self.completions.drain(..) {
            c.settle(status);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameSpec;
    use crate::host::{ManualClock, ManualScheduler};

    fn animator() -> (Animator<ManualClock, ManualScheduler>, ManualClock, ManualScheduler) {
        let clock = ManualClock::new();
        let sched = ManualScheduler::new();
        (Animator::new(clock.clone(), sched.clone()), clock, sched)
    }

    #[test]
    fn play_pause_are_idempotent() {
        let (mut a, _, sched) = animator();
        a.set(AnimationDefinition::new().with_track(vec![FrameSpec::lasting(10.0)]));
        a.pause();
        assert_eq!(a.playback_state(), PlaybackState::Stopped);
        a.play();
        a.play();
        assert_eq!(sched.requested_count(), 1);
        a.pause();
        a.pause();
        assert_eq!(a.playback_state(), PlaybackState::Paused);
        assert_eq!(sched.cancelled_count(), 1);
        assert!(!a.is_tick_pending());
    }

    #[test]
    fn tick_after_cancel_is_ignored() {
        let (mut a, clock, _) = animator();
        a.set(AnimationDefinition::new().with_track(vec![FrameSpec::lasting(10.0)]));
        assert_eq!(a.tick(0.0), TickOutcome::Ignored);
        a.play();
        a.stop();
        assert_eq!(a.tick(clock.advance(16.0)), TickOutcome::Ignored);
    }

    #[test]
    fn pause_offset_accumulates() {
        let (mut a, clock, _) = animator();
        a.set(AnimationDefinition::new().with_track(vec![FrameSpec::lasting(100.0)]));
        a.play();
        clock.set(100.0);
        a.pause();
        clock.set(350.0);
        a.play();
        assert_eq!(a.paused_offset(), 250.0);
        clock.set(400.0);
        a.pause();
        clock.set(410.0);
        a.play();
        assert_eq!(a.paused_offset(), 260.0);
        a.stop();
        assert_eq!(a.paused_offset(), 0.0);
    }

    #[test]
    fn empty_definition_finishes_on_play() {
        let (mut a, _, sched) = animator();
        a.set(AnimationDefinition::new());
        let done = a.play_until_finished();
        assert!(done.is_finished());
        assert_eq!(sched.requested_count(), 0);
    }

    #[test]
    fn stop_cancels_outstanding_completions() {
        let (mut a, _, _) = animator();
        a.set(AnimationDefinition::new().with_track(vec![FrameSpec::lasting(10.0)]));
        let done = a.play_until_finished();
        assert_eq!(done.status(), CompletionStatus::Pending);
        a.stop();
        assert_eq!(done.status(), CompletionStatus::Cancelled);
    }

    #[test]
    fn steps_uses_configured_epsilon() {
        let cfg = Config {
            steps_epsilon: 0.5,
            ..Config::default()
        };
        let a = Animator::with_config(cfg, ManualClock::new(), ManualScheduler::new());
        assert_eq!(a.steps(0.0, 4), 0.5);
    }
}
