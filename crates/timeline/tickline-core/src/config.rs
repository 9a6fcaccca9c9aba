//! Animator configuration.

use serde::{Deserialize, Serialize};

use crate::math::STEPS_EPSILON;

/// Configuration for sizing and optional behavior.
/// Keep this minimal; expand as needed without breaking API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial capacity hint for the draw callback's keyed value store.
    pub store_capacity: usize,
    /// Lower bound used by `Animator::steps`.
    pub steps_epsilon: f64,
    /// Run the synchronous draw when a definition is set.
    pub initial_draw: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_capacity: 8,
            steps_epsilon: STEPS_EPSILON,
            initial_draw: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: Config = serde_json::from_str(r#"{"initial_draw": false}"#).unwrap();
        assert!(!cfg.initial_draw);
        assert_eq!(cfg.store_capacity, 8);
        assert_eq!(cfg.steps_epsilon, STEPS_EPSILON);
    }
}
