//! State management module for match scoring.
//!
//! This module provides the core state types and the reducer:
//!
//! - `roster` - Sides, per-side values and player lookup
//! - `format` - Scoring targets and hard caps
//! - `setup` - Match configuration and strict validation
//! - `positions` - Who stands in which service court
//! - `rotation` - The serve cycle and receiver selection
//! - `snapshot` - Point/game snapshots and the undo stack
//! - `machine` - `MatchState` and its events
//! - `stats` - Statistics replayed from point histories
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          MatchSession                             │
//! │                                                                   │
//! │   event ──▶ MatchState::apply ──▶ new MatchState (replaces old)   │
//! │                    │                                              │
//! │        ┌───────────┼─────────────┬──────────────┐                 │
//! │        ▼           ▼             ▼              ▼                 │
//! │   ServeRotation  positions   UndoStack     GameSnapshot           │
//! │   (who serves)   (courts)    (per set)     (completed sets)       │
//! └──────────────────────────────────────────────────────────────────┘
//!                                                  │
//!                                                  ▼
//!                                          MatchStats (read-only)
//! ```
//!
//! # Usage
//!
//! ```rust
//! use shuttle_state::state::{MatchEvent, MatchSession, MatchSetup, ScoringFormat, Side};
//!
//! let setup = MatchSetup::singles("Alice", "Bob", Side::A, ScoringFormat::To21);
//! let mut session = MatchSession::start(setup);
//!
//! session.dispatch(MatchEvent::IncrementPoint { side: Side::B, elapsed: 12 });
//! assert_eq!(session.state().server.as_deref(), Some("Bob"));
//!
//! session.dispatch(MatchEvent::Undo);
//! assert_eq!(session.state().server.as_deref(), Some("Alice"));
//! ```

pub mod format;
pub mod machine;
pub mod positions;
pub mod roster;
pub mod rotation;
pub mod setup;
pub mod snapshot;
pub mod stats;

use tracing::warn;

// Re-export commonly used types
pub use format::ScoringFormat;
pub use machine::{MatchEvent, MatchPhase, MatchState};
pub use positions::{Court, CourtPositions, HalfCourt};
pub use roster::{PerSide, Roster, Side, MAX_SIDE_PLAYERS};
pub use rotation::ServeRotation;
pub use setup::{MatchSetup, SetupError};
pub use snapshot::{GameSnapshot, PointSnapshot, SetFinished, UndoStack};
pub use stats::{MatchStats, SetStats};

/// Host-side holder for a match.
///
/// Owns the current state, replaces it on every dispatched event and keeps
/// the event log so the match can be replayed.
#[derive(Debug, Clone, Default)]
pub struct MatchSession {
    state: MatchState,
    events: Vec<MatchEvent>,
}

impl MatchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// New session with `StartMatch` already applied.
    pub fn start(setup: MatchSetup) -> Self {
        let mut session = Self::new();
        session.dispatch(setup.into_event());
        session
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Events dispatched so far, in order.
    pub fn events(&self) -> &[MatchEvent] {
        &self.events
    }

    /// Apply an event and return the new state.
    pub fn dispatch(&mut self, event: MatchEvent) -> &MatchState {
        self.state = self.state.apply(&event);
        self.events.push(event);
        &self.state
    }

    /// Apply a JSON-encoded event. Anything that does not parse as a known
    /// event is ignored.
    pub fn dispatch_json(&mut self, raw: &str) -> &MatchState {
        match serde_json::from_str::<MatchEvent>(raw) {
            Ok(event) => self.dispatch(event),
            Err(err) => {
                warn!(%err, "ignoring unrecognised event");
                &self.state
            }
        }
    }

    /// Statistics over completed sets plus the set in play.
    pub fn stats(&self, elapsed: u64) -> MatchStats {
        let current = self.state.current_game(elapsed);
        MatchStats::from_games(
            self.state.completed_sets.iter().chain(current.as_ref()),
            self.state.format,
        )
    }
}

/// Rebuild a state by applying `events` to a fresh match.
pub fn replay<'a>(events: impl IntoIterator<Item = &'a MatchEvent>) -> MatchState {
    events
        .into_iter()
        .fold(MatchState::new(), |state, event| state.apply(event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn session() -> MatchSession {
        MatchSession::start(MatchSetup {
            team_a: vec!["Ann".into(), "Amy".into()],
            team_b: vec!["Ben".into(), "Bob".into()],
            first_serving_side: Side::A,
            first_server: "Ann".into(),
            first_receiver: "Ben".into(),
            target: ScoringFormat::To21,
        })
    }

    #[test]
    fn test_session_basic() {
        let mut session = session();
        assert_eq!(session.state().phase(), MatchPhase::InProgress);

        session.dispatch(MatchEvent::IncrementPoint {
            side: Side::A,
            elapsed: 10,
        });
        assert_eq!(session.state().score, PerSide::new(1, 0));
        assert_eq!(session.events().len(), 2);
    }

    #[test]
    fn test_dispatch_json() {
        let mut session = session();
        session.dispatch_json(r#"{"type": "increment_point", "side": "B", "elapsed": 3}"#);
        assert_eq!(session.state().server.as_deref(), Some("Bob"));

        let before = session.state().clone();
        session.dispatch_json(r#"{"type": "toggle_modal"}"#);
        session.dispatch_json("not json");
        assert_eq!(session.state(), &before);
        assert_eq!(session.events().len(), 2);
    }

    #[test]
    fn test_replay_matches_session() {
        let mut session = session();
        for (i, side) in [Side::A, Side::B, Side::B, Side::A, Side::A].into_iter().enumerate() {
            session.dispatch(MatchEvent::IncrementPoint {
                side,
                elapsed: i as u64 * 20,
            });
        }
        session.dispatch(MatchEvent::Undo);

        assert_eq!(&replay(session.events()), session.state());
    }

    #[test]
    fn test_session_stats() {
        let mut session = session();
        for _ in 0..3 {
            session.dispatch(MatchEvent::IncrementPoint {
                side: Side::B,
                elapsed: 0,
            });
        }
        let stats = session.stats(0);
        assert_eq!(stats.sets.len(), 1);
        assert_eq!(stats.points_won, PerSide::new(0, 3));
        assert_eq!(stats.longest_streak.b, 3);
    }
}
