//! Match configuration.
//!
//! A [`MatchSetup`] describes who plays, who serves first and to what score.
//! It can be loaded from JSON and validated before being turned into the
//! `StartMatch` event. The state machine itself never rejects a setup: it
//! falls back to the first player of a side when a name does not match, so
//! hosts wanting a strict contract call [`MatchSetup::validate`] first.

use serde::{Deserialize, Serialize};

use super::format::ScoringFormat;
use super::machine::MatchEvent;
use super::roster::{Roster, Side};

/// Setup and configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("side {0} has no players")]
    EmptySide(Side),

    #[error("side {side} has {count} players")]
    TooManyPlayers { side: Side, count: usize },

    #[error("sides have different sizes ({a} vs {b})")]
    UnevenSides { a: usize, b: usize },

    #[error("player {0:?} is listed more than once")]
    DuplicatePlayer(String),

    #[error("player names must not be empty")]
    EmptyName,

    #[error("server {name:?} is not on side {side}")]
    UnknownServer { name: String, side: Side },

    #[error("receiver {name:?} is not on side {side}")]
    UnknownReceiver { name: String, side: Side },

    #[error("unsupported scoring target {0} (expected 15, 21 or 30)")]
    InvalidTarget(u32),

    #[error("invalid match setup: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for SetupError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Everything needed to start a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSetup {
    pub team_a: Vec<String>,
    pub team_b: Vec<String>,
    pub first_serving_side: Side,
    pub first_server: String,
    pub first_receiver: String,
    #[serde(default)]
    pub target: ScoringFormat,
}

impl MatchSetup {
    /// Singles setup: the serving side's player serves to the other.
    pub fn singles(
        player_a: impl Into<String>,
        player_b: impl Into<String>,
        first_serving_side: Side,
        target: ScoringFormat,
    ) -> Self {
        let (a, b) = (player_a.into(), player_b.into());
        let (first_server, first_receiver) = match first_serving_side {
            Side::A => (a.clone(), b.clone()),
            Side::B => (b.clone(), a.clone()),
        };
        Self {
            team_a: vec![a],
            team_b: vec![b],
            first_serving_side,
            first_server,
            first_receiver,
            target,
        }
    }

    /// Parse a setup from JSON.
    ///
    /// ```json
    /// {"team_a": ["Ann", "Amy"], "team_b": ["Ben", "Bob"],
    ///  "first_serving_side": "A", "first_server": "Ann",
    ///  "first_receiver": "Ben", "target": 21}
    /// ```
    pub fn from_json(raw: &str) -> Result<Self, SetupError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn roster(&self) -> Roster {
        Roster::new(self.team_a.clone(), self.team_b.clone())
    }

    /// Strict validation: the roster must be playable and the named server
    /// and receiver must stand on the expected sides.
    pub fn validate(&self) -> Result<(), SetupError> {
        let roster = self.roster();
        roster.validate()?;

        let serving = self.first_serving_side;
        if roster.index_of(serving, &self.first_server).is_none() {
            return Err(SetupError::UnknownServer {
                name: self.first_server.clone(),
                side: serving,
            });
        }
        if roster
            .index_of(serving.opponent(), &self.first_receiver)
            .is_none()
        {
            return Err(SetupError::UnknownReceiver {
                name: self.first_receiver.clone(),
                side: serving.opponent(),
            });
        }

        Ok(())
    }

    /// The `StartMatch` event for this setup.
    pub fn into_event(self) -> MatchEvent {
        MatchEvent::StartMatch {
            roster: Roster::new(self.team_a, self.team_b),
            first_serving_side: self.first_serving_side,
            first_server: self.first_server,
            first_receiver: self.first_receiver,
            target: self.target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOUBLES_JSON: &str = r#"{
        "team_a": ["Ann", "Amy"],
        "team_b": ["Ben", "Bob"],
        "first_serving_side": "A",
        "first_server": "Amy",
        "first_receiver": "Bob",
        "target": 15
    }"#;

    #[test]
    fn test_from_json() {
        let setup = MatchSetup::from_json(DOUBLES_JSON).unwrap();
        assert_eq!(setup.first_server, "Amy");
        assert_eq!(setup.target, ScoringFormat::To15);
        assert!(setup.validate().is_ok());
    }

    #[test]
    fn test_target_defaults_to_21() {
        let setup = MatchSetup::from_json(
            r#"{"team_a": ["Alice"], "team_b": ["Bob"], "first_serving_side": "B",
                "first_server": "Bob", "first_receiver": "Alice"}"#,
        )
        .unwrap();
        assert_eq!(setup.target, ScoringFormat::To21);
    }

    #[test]
    fn test_bad_target_is_parse_error() {
        let raw = DOUBLES_JSON.replace("15", "11");
        assert!(matches!(
            MatchSetup::from_json(&raw),
            Err(SetupError::Parse(_))
        ));
    }

    #[test]
    fn test_validate_names() {
        let mut setup = MatchSetup::from_json(DOUBLES_JSON).unwrap();
        setup.first_server = "Ben".into();
        assert_eq!(
            setup.validate(),
            Err(SetupError::UnknownServer {
                name: "Ben".into(),
                side: Side::A
            })
        );

        let mut setup = MatchSetup::from_json(DOUBLES_JSON).unwrap();
        setup.first_receiver = "Ann".into();
        assert!(matches!(
            setup.validate(),
            Err(SetupError::UnknownReceiver { side: Side::B, .. })
        ));
    }

    #[test]
    fn test_singles_setup() {
        let setup = MatchSetup::singles("Alice", "Bob", Side::B, ScoringFormat::To21);
        assert_eq!(setup.first_server, "Bob");
        assert_eq!(setup.first_receiver, "Alice");
        assert!(setup.validate().is_ok());
        assert!(matches!(setup.into_event(), MatchEvent::StartMatch { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = SetupError::UnevenSides { a: 1, b: 2 };
        assert_eq!(err.to_string(), "sides have different sizes (1 vs 2)");
    }
}
