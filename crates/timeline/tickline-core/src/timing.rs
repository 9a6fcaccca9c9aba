//! Timing functions.
//!
//! A timing function maps a time fraction in [0,1] to a progress value. The engine only calls
//! them; concrete easing curves are supplied by the caller. Handles are reference counted so a
//! definition-level timing can be shared by every frame that inherits it.

use std::fmt;
use std::rc::Rc;

use crate::math;

#[derive(Clone)]
pub struct Timing {
    func: Rc<dyn Fn(f64) -> f64>,
    label: &'static str,
}

impl Timing {
    /// Wrap an arbitrary function.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(f64) -> f64 + 'static,
    {
        Self {
            func: Rc::new(func),
            label: "custom",
        }
    }

    /// Progress equals the time fraction.
    pub fn identity() -> Self {
        Self {
            func: Rc::new(|t| t),
            label: "identity",
        }
    }

    /// Discrete timing built on [`math::steps`].
    pub fn steps(step_count: u32) -> Self {
        Self {
            func: Rc::new(move |t| math::steps(t, step_count)),
            label: "steps",
        }
    }

    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        (self.func)(t)
    }

    #[inline]
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// True when both handles point at the same function.
    #[inline]
    pub fn ptr_eq(&self, other: &Timing) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Timing").field(&self.label).finish()
    }
}
