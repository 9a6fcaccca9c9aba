//! Numeric helpers shared by the progress math:
//! - clamp01 (NaN and +inf collapse to 1)
//! - remap (linear map of [0,1] into a target range)
//! - steps (quantize a fraction into discrete levels)

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Lower bound applied to the fraction before quantizing in [`steps`].
pub const STEPS_EPSILON: f64 = 0.000_001;

/// Target range for progress remapping: progress 0 maps to `from`, 1 maps to `to`.
/// Serialized as a two-element array, `[from, to]`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Remap {
    pub from: f64,
    pub to: f64,
}

impl Remap {
    #[inline]
    pub fn new(from: f64, to: f64) -> Self {
        Self { from, to }
    }

    #[inline]
    pub fn apply(&self, v: f64) -> f64 {
        remap(v, *self)
    }
}

impl From<(f64, f64)> for Remap {
    fn from((from, to): (f64, f64)) -> Self {
        Self { from, to }
    }
}

impl From<[f64; 2]> for Remap {
    fn from(r: [f64; 2]) -> Self {
        Self { from: r[0], to: r[1] }
    }
}

impl From<Remap> for [f64; 2] {
    fn from(r: Remap) -> Self {
        [r.from, r.to]
    }
}

/// Clamp into [0,1]. Non-finite input from a zero-length division resolves to 1,
/// except -inf which resolves to 0.
#[inline]
pub fn clamp01(v: f64) -> f64 {
    if v.is_nan() {
        return 1.0;
    }
    v.clamp(0.0, 1.0)
}

/// Linear remap of `v` into `range`.
#[inline]
pub fn remap(v: f64, range: Remap) -> f64 {
    v * (range.to - range.from) + range.from
}

/// Quantize `t` into `step_count` levels, rounding up. The result lies in (0, 1].
#[inline]
pub fn steps(t: f64, step_count: u32) -> f64 {
    steps_with_epsilon(t, step_count, STEPS_EPSILON)
}

/// [`steps`] with a caller-provided lower bound.
pub fn steps_with_epsilon(t: f64, step_count: u32, epsilon: f64) -> f64 {
    if step_count == 0 {
        return 0.0;
    }
    let s = step_count as f64;
    let t = if t.is_nan() { epsilon } else { t.max(epsilon).min(1.0) };
    (t * s).ceil() * (1.0 / s)
}

/// Uniform random value in `[min, max)`. Returns `min` for an empty, inverted or non-finite range.
pub fn random_in_range(min: f64, max: f64) -> f64 {
    if !min.is_finite() || !max.is_finite() || max <= min {
        return min;
    }
    rand::thread_rng().gen_range(min..max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp01_handles_non_finite() {
        assert_eq!(clamp01(f64::NAN), 1.0);
        assert_eq!(clamp01(f64::INFINITY), 1.0);
        assert_eq!(clamp01(f64::NEG_INFINITY), 0.0);
        assert_eq!(clamp01(-0.5), 0.0);
        assert_eq!(clamp01(0.25), 0.25);
        assert_eq!(clamp01(3.0), 1.0);
    }

    #[test]
    fn remap_maps_endpoints() {
        let r = Remap::new(10.0, 20.0);
        assert_eq!(remap(0.0, r), 10.0);
        assert_eq!(remap(1.0, r), 20.0);
        assert_eq!(r.apply(0.5), 15.0);

        let inverted = Remap::from((1.0, 0.0));
        assert_eq!(inverted.apply(0.25), 0.75);
    }

    #[test]
    fn steps_rounds_up_and_never_hits_zero() {
        assert_eq!(steps(0.0, 4), 0.25);
        assert_eq!(steps(-1.0, 4), 0.25);
        assert_eq!(steps(0.26, 4), 0.5);
        assert_eq!(steps(0.5, 4), 0.5);
        assert_eq!(steps(1.0, 4), 1.0);
        assert_eq!(steps(7.0, 4), 1.0);
        assert_eq!(steps(0.3, 0), 0.0);
    }

    #[test]
    fn random_in_range_stays_inside() {
        for _ in 0..256 {
            let v = random_in_range(-2.0, 3.0);
            assert!((-2.0..3.0).contains(&v), "v={v}");
        }
        assert_eq!(random_in_range(5.0, 5.0), 5.0);
        assert_eq!(random_in_range(5.0, 1.0), 5.0);
    }
}
