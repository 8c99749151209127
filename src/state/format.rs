//! Scoring formats.
//!
//! A set is played to a target score with a two-point margin, up to a hard
//! cap where the first side to reach it wins outright.

use serde::{Deserialize, Serialize};

use super::setup::SetupError;

/// Points to win a set, with the implied hard cap.
///
/// Serializes as the bare target (`15`, `21` or `30`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ScoringFormat {
    /// 15 points, capped at 21.
    To15,
    /// 21 points, capped at 30.
    #[default]
    To21,
    /// 30 points, capped at 30.
    To30,
}

impl ScoringFormat {
    pub fn from_target(target: u32) -> Option<Self> {
        match target {
            15 => Some(Self::To15),
            21 => Some(Self::To21),
            30 => Some(Self::To30),
            _ => None,
        }
    }

    pub fn target(self) -> u32 {
        match self {
            Self::To15 => 15,
            Self::To21 => 21,
            Self::To30 => 30,
        }
    }

    pub fn hard_cap(self) -> u32 {
        match self {
            Self::To15 => 21,
            Self::To21 | Self::To30 => 30,
        }
    }

    /// Whether a side holding `own` points against `other` has won the set.
    pub fn is_set_won(self, own: u32, other: u32) -> bool {
        (own >= self.target() && own >= other + 2) || own == self.hard_cap()
    }
}

impl TryFrom<u32> for ScoringFormat {
    type Error = SetupError;

    fn try_from(target: u32) -> Result<Self, Self::Error> {
        Self::from_target(target).ok_or(SetupError::InvalidTarget(target))
    }
}

impl From<ScoringFormat> for u32 {
    fn from(format: ScoringFormat) -> u32 {
        format.target()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caps() {
        assert_eq!(ScoringFormat::To15.hard_cap(), 21);
        assert_eq!(ScoringFormat::To21.hard_cap(), 30);
        assert_eq!(ScoringFormat::To30.hard_cap(), 30);
    }

    #[test]
    fn test_win_by_two() {
        let f = ScoringFormat::To21;
        assert!(f.is_set_won(21, 19));
        assert!(!f.is_set_won(21, 20));
        assert!(!f.is_set_won(20, 0));
        assert!(f.is_set_won(24, 22));
    }

    #[test]
    fn test_cap_wins_outright() {
        assert!(ScoringFormat::To21.is_set_won(30, 29));
        assert!(ScoringFormat::To15.is_set_won(21, 20));
        assert!(!ScoringFormat::To15.is_set_won(20, 19));
        assert!(ScoringFormat::To30.is_set_won(30, 29));
    }

    #[test]
    fn test_serde_as_target() {
        assert_eq!(serde_json::to_string(&ScoringFormat::To15).unwrap(), "15");
        let parsed: ScoringFormat = serde_json::from_str("30").unwrap();
        assert_eq!(parsed, ScoringFormat::To30);
        assert!(serde_json::from_str::<ScoringFormat>("11").is_err());
    }
}
