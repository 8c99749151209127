//! Shuttle State Library
//!
//! This crate provides the match state machine for scoring badminton
//! singles and doubles.
//!
//! # Overview
//!
//! The state module provides:
//!
//! - **Match State Machine** - A pure reducer from `(state, event)` to the next
//!   state: points, undo, set completion and the start of each new set.
//!
//! - **Serve Rotation** - The fixed serve cycle of doubles (and alternation of
//!   singles), with the receiver chosen by score parity.
//!
//! - **Court Positions** - Which player stands in the right and left service
//!   court on each side, following the official serving rules.
//!
//! - **Undo History** - One snapshot per rally, popped by undo.
//!
//! - **Statistics** - Streaks, game points and totals replayed from history.
//!
//! # Design Principles
//!
//! 1. **Transitions are pure and total** - Every event yields a new state;
//!    events that make no sense in the current phase yield an equal one.
//!
//! 2. **Snapshots are owned copies** - Undo restores exactly what was there.
//!
//! 3. **No I/O** - Time arrives as an elapsed-seconds value on each event.
//!
//! 4. **Serialization-ready** - All types convert to JSON for clients.
//!
//! # Example
//!
//! ```rust
//! use shuttle_state::state::{MatchEvent, MatchState, Roster, ScoringFormat, Side};
//!
//! let start = MatchState::new().apply(&MatchEvent::StartMatch {
//!     roster: Roster::doubles(["Ann", "Amy"], ["Ben", "Bob"]),
//!     first_serving_side: Side::A,
//!     first_server: "Ann".to_string(),
//!     first_receiver: "Ben".to_string(),
//!     target: ScoringFormat::To21,
//! });
//!
//! // Ann wins the rally and moves to the left court; Bob receives.
//! let state = start.apply(&MatchEvent::IncrementPoint { side: Side::A, elapsed: 15 });
//! assert_eq!(state.server.as_deref(), Some("Ann"));
//! assert_eq!(state.receiver.as_deref(), Some("Bob"));
//!
//! // Undo restores the exact previous state.
//! assert_eq!(state.apply(&MatchEvent::Undo), start);
//! ```

pub mod state;

pub use state::{MatchEvent, MatchSession, MatchState, Side};
