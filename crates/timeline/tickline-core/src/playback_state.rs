use serde::{Deserialize, Serialize};

/// Playback state of an animator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// Animator is stopped; tracks are at their defaults
    #[default]
    Stopped,
    /// Animator is playing
    Playing,
    /// Animator is paused; tracks keep their position
    Paused,
}

impl PlaybackState {
    /// Get the name of this playback state
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Playing => "playing",
            Self::Paused => "paused",
        }
    }

    /// Check if the animator is actively playing
    #[inline]
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Check if `play()` would change anything
    #[inline]
    pub fn can_play(&self) -> bool {
        !matches!(self, Self::Playing)
    }

    /// Check if the animator can be paused
    #[inline]
    pub fn can_pause(&self) -> bool {
        matches!(self, Self::Playing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_serialized_form() {
        for s in [
            PlaybackState::Stopped,
            PlaybackState::Playing,
            PlaybackState::Paused,
        ] {
            assert_eq!(serde_json::to_string(&s).unwrap(), format!("\"{}\"", s.name()));
        }
    }

    #[test]
    fn transition_predicates() {
        assert!(PlaybackState::Stopped.can_play());
        assert!(PlaybackState::Paused.can_play());
        assert!(!PlaybackState::Playing.can_play());
        assert!(PlaybackState::Playing.can_pause());
        assert!(!PlaybackState::Paused.can_pause());
        assert!(!PlaybackState::Stopped.can_pause());
    }
}
