//! Host boundary: the time source and the per-refresh tick scheduler.
//!
//! The animator never waits. It asks the [`Scheduler`] for one tick at a time and the host calls
//! `Animator::tick(time)` when that tick fires. Cancelling a request makes the animator ignore
//! any late tick. [`ManualClock`] and [`ManualScheduler`] are deterministic stand-ins for tests
//! and headless drivers; both are cheap `Rc` handles so the caller keeps control after moving a
//! clone into the animator.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Opaque handle for a requested tick.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TickHandle(pub u64);

/// Time source, in milliseconds. Only differences between readings are meaningful.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Request/cancel primitive for the next display refresh.
pub trait Scheduler {
    fn request_tick(&mut self) -> TickHandle;
    fn cancel(&mut self, handle: TickHandle);
}

/// Wall clock measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: instant::Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: instant::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(ms: f64) -> Self {
        let clock = Self::default();
        clock.set(ms);
        clock
    }

    #[inline]
    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    #[inline]
    pub fn advance(&self, ms: f64) -> f64 {
        let next = self.now.get() + ms;
        self.now.set(next);
        next
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> f64 {
        self.now.get()
    }
}

#[derive(Debug, Default)]
struct SchedulerInner {
    next_handle: u64,
    pending: Vec<TickHandle>,
    requested: u64,
    cancelled: u64,
}

/// Scheduler that records requests; the driver decides when ticks fire.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Oldest outstanding request.
    pub fn pending(&self) -> Option<TickHandle> {
        self.inner.borrow().pending.first().copied()
    }

    pub fn pending_count(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Remove and return the oldest outstanding request, as a firing refresh would.
    pub fn fire(&self) -> Option<TickHandle> {
        let mut inner = self.inner.borrow_mut();
        if inner.pending.is_empty() {
            None
        } else {
            Some(inner.pending.remove(0))
        }
    }

    /// Total requests ever made.
    pub fn requested_count(&self) -> u64 {
        self.inner.borrow().requested
    }

    /// Total requests cancelled while still pending.
    pub fn cancelled_count(&self) -> u64 {
        self.inner.borrow().cancelled
    }
}

impl Scheduler for ManualScheduler {
    fn request_tick(&mut self) -> TickHandle {
        let mut inner = self.inner.borrow_mut();
        let handle = TickHandle(inner.next_handle);
        inner.next_handle = inner.next_handle.wrapping_add(1);
        inner.requested += 1;
        inner.pending.push(handle);
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        let mut inner = self.inner.borrow_mut();
        if let Some(pos) = inner.pending.iter().position(|h| *h == handle) {
            inner.pending.remove(pos);
            inner.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_is_shared_between_clones() {
        let clock = ManualClock::at(10.0);
        let view = clock.clone();
        assert_eq!(clock.advance(5.0), 15.0);
        assert_eq!(view.now(), 15.0);
    }

    #[test]
    fn scheduler_tracks_requests_and_cancels() {
        let mut sched = ManualScheduler::new();
        let view = sched.clone();
        let a = sched.request_tick();
        let b = sched.request_tick();
        assert_ne!(a, b);
        assert_eq!(view.pending_count(), 2);
        sched.cancel(a);
        sched.cancel(a);
        assert_eq!(view.cancelled_count(), 1);
        assert_eq!(view.pending(), Some(b));
        assert_eq!(view.fire(), Some(b));
        assert_eq!(view.fire(), None);
        assert_eq!(view.requested_count(), 2);
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(a >= 0.0);
        assert!(b >= a);
    }
}
