//! Timeline state machine: one call to [`Timeline::step`] per host tick.
//!
//! Tick order:
//! 1) subtract the accumulated pause offset from the clock time
//! 2) pre-pass: lazily stamp `start_time`, compute `elapsed`, clear per-tick flags
//! 3) draw once with the shared [`TimelineState`]
//! 4) post-pass in track order: honor repeat, then next, requests raised during draw
//! 5) report whether another tick is needed; fire `finished` once when every track completed
//!
//! Tracks are processed in index order; draw callbacks may rely on that for cross-track
//! coordination.

use crate::config::Config;
use crate::definition::{AnimationDefinition, DrawFn, FinishedHook, Repeat, TrackHook};
use crate::frame::resolve_tracks;
use crate::state::{AnimationEvents, TimelineState};
use crate::track::Track;

/// Result of one [`Timeline::step`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// At least one track is still live; schedule another tick.
    Continue,
    /// Every track is complete.
    Finished,
}

#[derive(Default)]
struct Hooks {
    draw: Option<DrawFn>,
    after_frame: Option<TrackHook>,
    after_track: Option<TrackHook>,
    finished: Option<FinishedHook>,
}

/// One definition's tracks, callbacks and tick logic.
pub struct Timeline {
    state: TimelineState,
    events: AnimationEvents,
    repeat: Repeat,
    hooks: Hooks,
    finished_fired: bool,
}

impl Timeline {
    pub fn new(definition: AnimationDefinition, cfg: &Config) -> Self {
        let frames = resolve_tracks(&definition.frames, &definition.frame_defaults());
        let AnimationDefinition {
            repeat,
            draw,
            after_frame,
            after_track,
            finished,
            ..
        } = definition;
        Self {
            state: TimelineState::new(frames, cfg.store_capacity),
            events: AnimationEvents::default(),
            repeat,
            hooks: Hooks {
                draw,
                after_frame,
                after_track,
                finished,
            },
            finished_fired: false,
        }
    }

    #[inline]
    pub fn state(&self) -> &TimelineState {
        &self.state
    }

    #[inline]
    pub fn state_mut(&mut self) -> &mut TimelineState {
        &mut self.state
    }

    #[inline]
    pub fn repeat(&self) -> Repeat {
        self.repeat
    }

    #[inline]
    pub fn events(&self) -> AnimationEvents {
        self.events
    }

    /// `finished` already fired for this run.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished_fired
    }

    /// Draw once with `initial_draw` set, before any ticking.
    pub fn initial_draw(&mut self) {
        self.events.initial_draw = true;
        if let Some(draw) = self.hooks.draw.as_mut() {
            draw(&mut self.state, &self.events);
        }
        self.events.initial_draw = false;
    }

    /// Flag the next draw as the start of playback.
    pub fn mark_started(&mut self) {
        self.events.animation_started = true;
        self.state.mark_started();
    }

    /// Hard reset for `stop()`.
    pub fn reset(&mut self) {
        self.state.reset();
        self.events = AnimationEvents::default();
        self.finished_fired = false;
    }

    /// Fire `finished` if it has not fired for this run yet.
    pub(crate) fn finish(&mut self) {
        if self.finished_fired {
            return;
        }
        self.finished_fired = true;
        log::debug!("timeline finished ({} tracks)", self.state.len());
        if let Some(finished) = self.hooks.finished.as_mut() {
            finished();
        }
    }

    /// Run one tick at clock `time`, with `paused_offset` already accumulated by the controller.
    pub fn step(&mut self, time: f64, paused_offset: f64) -> StepOutcome {
        let time = time - paused_offset;

        {
            let (tracks, _) = self.state.tracks_and_frames_mut();
            for track in tracks.iter_mut().filter(|t| !t.track_complete) {
                track.begin_tick(time);
            }
        }

        if let Some(draw) = self.hooks.draw.as_mut() {
            draw(&mut self.state, &self.events);
        }
        self.events = AnimationEvents::default();

        let mut keep_going = false;
        let repeat = self.repeat;
        let hooks = &mut self.hooks;
        let (tracks, frames) = self.state.tracks_and_frames_mut();
        for track in tracks.iter_mut() {
            track.clear_started();
            if track.track_complete {
                continue;
            }
            let frame_list = &mut frames[track.track_index];

            if track.repeat_requested {
                call(&mut hooks.after_frame, track);
                frame_list[track.frame_index].complete_pass();
                track.set_frame(track.frame_index);
                log::trace!(
                    "track {} repeats frame {}",
                    track.track_index,
                    track.frame_index
                );
                keep_going = true;
                continue;
            }

            if !track.next_requested {
                keep_going = true;
                continue;
            }

            call(&mut hooks.after_frame, track);

            // a completed track's last frame keeps its pass count and direction
            if track.frame_index + 1 < frame_list.len() {
                frame_list[track.frame_index].complete_pass();
                track.set_frame(track.frame_index + 1);
                log::trace!(
                    "track {} advances to frame {}",
                    track.track_index,
                    track.frame_index
                );
                keep_going = true;
            } else if repeat.allows_wrap(track.cycles) {
                frame_list[track.frame_index].complete_pass();
                track.set_frame(0);
                track.track_started = true;
                track.cycles += 1;
                log::trace!(
                    "track {} wraps, cycle {}",
                    track.track_index,
                    track.cycles
                );
                call(&mut hooks.after_track, track);
                keep_going = true;
            } else {
                track.track_complete = true;
                log::trace!("track {} complete", track.track_index);
                call(&mut hooks.after_track, track);
            }
        }

        log::trace!(
            "tick t={time:.3} tracks={} continue={keep_going}",
            self.state.len()
        );

        if keep_going {
            StepOutcome::Continue
        } else {
            self.finish();
            StepOutcome::Finished
        }
    }
}

#[inline]
fn call(hook: &mut Option<TrackHook>, track: &Track) {
    if let Some(hook) = hook.as_mut() {
        hook(track);
    }
}

impl std::fmt::Debug for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("state", &self.state)
            .field("events", &self.events)
            .field("repeat", &self.repeat)
            .field("finished_fired", &self.finished_fired)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameSpec;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn advance_when_complete(state: &mut TimelineState, _: &AnimationEvents) {
        for i in 0..state.len() {
            if let Some(s) = state.update(i) {
                if s.complete {
                    state.request_next(i);
                }
            }
        }
    }

    #[test]
    fn single_frame_completes_once() {
        let finished = Rc::new(RefCell::new(0));
        let f = finished.clone();
        let def = AnimationDefinition::new()
            .with_track(vec![FrameSpec::lasting(1000.0)])
            .on_draw(advance_when_complete)
            .on_finished(move || *f.borrow_mut() += 1);
        let mut tl = Timeline::new(def, &Config::default());

        assert_eq!(tl.step(0.0, 0.0), StepOutcome::Continue);
        assert_eq!(tl.state().progress, 0.0);
        assert_eq!(tl.step(500.0, 0.0), StepOutcome::Continue);
        assert_eq!(tl.state().progress, 0.5);
        assert_eq!(tl.step(1000.0, 0.0), StepOutcome::Finished);
        assert!(tl.state().track(0).unwrap().is_track_complete());
        assert_eq!(*finished.borrow(), 1);
        assert_eq!(tl.step(1100.0, 0.0), StepOutcome::Finished);
        assert_eq!(*finished.borrow(), 1);
    }

    #[test]
    fn repeat_request_wins_over_next() {
        let def = AnimationDefinition::new()
            .with_track(vec![FrameSpec::lasting(10.0), FrameSpec::lasting(10.0)])
            .on_draw(|state, _| {
                state.request_next(0);
                state.request_repeat(0);
            });
        let mut tl = Timeline::new(def, &Config::default());
        tl.step(0.0, 0.0);
        let track = tl.state().track(0).unwrap();
        assert_eq!(track.frame_index(), 0);
        assert!(track.start_time().is_none());
        assert_eq!(tl.state().frame(0).unwrap().cycles(), 1);
    }

    #[test]
    fn no_request_keeps_track_mid_frame() {
        let def = AnimationDefinition::new()
            .with_track(vec![FrameSpec::lasting(10.0)])
            .on_draw(|_, _| {});
        let mut tl = Timeline::new(def, &Config::default());
        for t in 0..5 {
            assert_eq!(tl.step(t as f64 * 100.0, 0.0), StepOutcome::Continue);
        }
        assert_eq!(tl.state().track(0).unwrap().frame_index(), 0);
    }

    #[test]
    fn pause_offset_is_subtracted() {
        let def = AnimationDefinition::new()
            .with_track(vec![FrameSpec::lasting(100.0)])
            .on_draw(|state, _| {
                state.update(0);
            });
        let mut tl = Timeline::new(def, &Config::default());
        tl.step(0.0, 0.0);
        tl.step(600.0, 550.0);
        assert_eq!(tl.state().track(0).unwrap().elapsed(), 50.0);
        assert_eq!(tl.state().time_fraction, 0.5);
    }

    #[test]
    fn started_events_are_seen_once() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let def = AnimationDefinition::new()
            .with_track(vec![FrameSpec::lasting(10.0)])
            .on_draw(move |state, events| {
                let t = state.track(0).unwrap();
                s.borrow_mut()
                    .push((events.animation_started, t.track_started(), t.frame_started()));
            });
        let mut tl = Timeline::new(def, &Config::default());
        tl.mark_started();
        tl.step(0.0, 0.0);
        tl.step(16.0, 0.0);
        assert_eq!(
            *seen.borrow(),
            vec![(true, true, true), (false, false, false)]
        );
    }

    #[test]
    fn hooks_fire_in_order() {
        let log = Rc::new(RefCell::new(Vec::<String>::new()));
        let (a, b, c) = (log.clone(), log.clone(), log.clone());
        let def = AnimationDefinition::new()
            .with_track(vec![FrameSpec::new(), FrameSpec::new()])
            .with_repeat(Repeat::Times(1))
            .on_draw(|state, _| state.request_next(0))
            .on_after_frame(move |t| a.borrow_mut().push(format!("frame {}", t.frame_index())))
            .on_after_track(move |t| b.borrow_mut().push(format!("track {}", t.cycles())))
            .on_finished(move || c.borrow_mut().push("finished".into()));
        let mut tl = Timeline::new(def, &Config::default());
        let mut outcomes = Vec::new();
        for i in 0..4 {
            outcomes.push(tl.step(i as f64, 0.0));
        }
        assert_eq!(
            outcomes,
            vec![
                StepOutcome::Continue,
                StepOutcome::Continue,
                StepOutcome::Continue,
                StepOutcome::Finished
            ]
        );
        assert_eq!(
            *log.borrow(),
            vec![
                "frame 0", "frame 1", "track 1", "frame 0", "frame 1", "track 1", "finished"
            ]
        );
    }

    #[test]
    fn completion_leaves_last_frame_untouched() {
        let def = AnimationDefinition::new()
            .with_track(vec![FrameSpec::lasting(10.0).with_alternate(true)])
            .on_draw(advance_when_complete);
        let mut tl = Timeline::new(def, &Config::default());
        tl.step(0.0, 0.0);
        assert_eq!(tl.step(10.0, 0.0), StepOutcome::Finished);
        let frame = tl.state().frame(0).unwrap();
        assert_eq!(frame.cycles(), 0);
        assert!(!frame.reverse());
    }

    #[test]
    fn empty_definition_finishes_on_first_step() {
        let mut tl = Timeline::new(AnimationDefinition::new(), &Config::default());
        assert_eq!(tl.step(0.0, 0.0), StepOutcome::Finished);
        assert!(tl.is_finished());
    }
}
