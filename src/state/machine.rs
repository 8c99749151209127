//! Match state machine.
//!
//! [`MatchState::apply`] is a pure reducer: it takes the current state and
//! one [`MatchEvent`] and returns the next state, leaving the input untouched.
//! Every event has a defined outcome; events that make no sense in the
//! current phase return an equal state.
//!
//! # Phases
//!
//! ```text
//! ┌────────────┐  start_match  ┌────────────┐  set won   ┌─────────────────┐
//! │ NotStarted │──────────────▶│ InProgress │───────────▶│ SetJustFinished │
//! └────────────┘               └────────────┘            └────────┬────────┘
//!                                    ▲                            │
//!                                    │       start_next_set       │
//!                                    └────────────────────────────┘
//! ```
//!
//! There is no terminal phase. Deciding when a best-of-N match is over is
//! left to the host (see [`MatchState::match_winner`]).

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use super::format::ScoringFormat;
use super::positions::{initial_positions, resolve_positions, CourtPositions};
use super::roster::{PerSide, Roster, Side};
use super::rotation::ServeRotation;
use super::snapshot::{GameSnapshot, PointSnapshot, SetFinished, UndoStack};

/// Where the match is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    /// No roster yet
    #[default]
    NotStarted,
    /// Rallies are being scored
    InProgress,
    /// A set has ended and the host has not started the next one
    SetJustFinished,
}

impl MatchPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::SetJustFinished => "set_just_finished",
        }
    }
}

/// Events accepted by the state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchEvent {
    StartMatch {
        roster: Roster,
        first_serving_side: Side,
        first_server: String,
        first_receiver: String,
        #[serde(default)]
        target: ScoringFormat,
    },
    IncrementPoint {
        side: Side,
        elapsed: u64,
    },
    Undo,
    StartNextSet {
        server: String,
        receiver: String,
        elapsed: u64,
    },
    ResetHistory,
}

/// Complete match state. Replaced wholesale by every transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub roster: Roster,
    pub format: ScoringFormat,
    pub score: PerSide<u32>,
    pub sets_won: PerSide<u8>,
    pub serving_side: Option<Side>,
    pub server: Option<String>,
    pub receiver: Option<String>,
    /// Who takes the serve if the receiving side wins the next rally.
    pub next_server: Option<String>,
    pub rotation: ServeRotation,
    pub positions: CourtPositions,
    /// Elapsed seconds at which the current set started.
    pub set_start_time: u64,
    /// Undo stack for the current set.
    pub history: UndoStack,
    /// Finished sets, oldest first.
    pub completed_sets: Vec<GameSnapshot>,
    /// Set awaiting acknowledgement through `StartNextSet`.
    pub set_finished: Option<SetFinished>,
    /// Winners of the final two rallies of the last finished set.
    pub last_two_winners: Vec<Side>,
}

impl MatchState {
    /// A fresh, not-yet-started match.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> MatchPhase {
        if self.roster.is_empty() {
            MatchPhase::NotStarted
        } else if self.set_finished.is_some() {
            MatchPhase::SetJustFinished
        } else {
            MatchPhase::InProgress
        }
    }

    /// Apply an event, returning the next state.
    pub fn apply(&self, event: &MatchEvent) -> Self {
        match event {
            MatchEvent::StartMatch {
                roster,
                first_serving_side,
                first_server,
                first_receiver,
                target,
            } => self.start_match(
                roster,
                *first_serving_side,
                first_server,
                first_receiver,
                *target,
            ),
            MatchEvent::IncrementPoint { side, elapsed } => self.increment_point(*side, *elapsed),
            MatchEvent::Undo => self.undo(),
            MatchEvent::StartNextSet {
                server,
                receiver,
                elapsed,
            } => self.start_next_set(server, receiver, *elapsed),
            MatchEvent::ResetHistory => self.reset_history(),
        }
    }

    /// Start a new match, discarding everything in this state.
    ///
    /// Names that are not on the expected side fall back to that side's first
    /// player. An unplayable roster leaves the state unchanged.
    pub fn start_match(
        &self,
        roster: &Roster,
        first_serving_side: Side,
        first_server: &str,
        first_receiver: &str,
        target: ScoringFormat,
    ) -> Self {
        if let Err(err) = roster.validate() {
            warn!(%err, "ignoring start_match with unplayable roster");
            return self.clone();
        }

        let receiving_side = first_serving_side.opponent();
        let (Some(server), Some(receiver)) = (
            roster.lookup_or_first(first_serving_side, first_server),
            roster.lookup_or_first(receiving_side, first_receiver),
        ) else {
            return self.clone();
        };
        if server != first_server {
            warn!(requested = first_server, used = server, side = %first_serving_side, "server not on serving side, using first player");
        }
        if receiver != first_receiver {
            warn!(requested = first_receiver, used = receiver, side = %receiving_side, "receiver not on receiving side, using first player");
        }

        let mut next = Self {
            roster: roster.clone(),
            format: target,
            ..Self::default()
        };
        next.begin_set(first_serving_side, server.to_owned(), receiver.to_owned(), 0);

        info!(
            team_a = ?next.roster.team_a,
            team_b = ?next.roster.team_b,
            server = server,
            receiver = receiver,
            target = target.target(),
            "match started"
        );
        next
    }

    /// Score a rally for `side`.
    pub fn increment_point(&self, side: Side, elapsed: u64) -> Self {
        match self.phase() {
            MatchPhase::InProgress => {}
            MatchPhase::NotStarted => {
                debug!(%side, "ignoring point before match start");
                return self.clone();
            }
            MatchPhase::SetJustFinished => {
                warn!(%side, "ignoring point while finished set awaits start_next_set");
                return self.clone();
            }
        }

        let next = self.score_rally(side);
        let (own, other) = (next.score[side], next.score[side.opponent()]);
        if self.format.is_set_won(own, other) {
            return self.finish_set(next, side, elapsed);
        }

        let mut next = next;
        next.history.push(self.snapshot());
        debug!(
            %side,
            score_a = next.score.a,
            score_b = next.score.b,
            server = ?next.server,
            receiver = ?next.receiver,
            "point scored"
        );
        next
    }

    /// Restore the state before the last rally of the current set.
    /// A no-op when the set has no rallies to undo.
    pub fn undo(&self) -> Self {
        let mut next = self.clone();
        match next.history.pop() {
            Some(snapshot) => {
                trace!(
                    score_a = snapshot.score.a,
                    score_b = snapshot.score.b,
                    remaining = next.history.len(),
                    "undo"
                );
                next.restore(snapshot);
                next
            }
            None => self.clone(),
        }
    }

    /// Begin the next set with the chosen server and receiver.
    ///
    /// An unknown server falls back to the suggested default (or the current
    /// server); a receiver not on the opposing side falls back to that side's
    /// first player.
    pub fn start_next_set(&self, server: &str, receiver: &str, elapsed: u64) -> Self {
        if self.phase() == MatchPhase::NotStarted {
            return self.clone();
        }

        let server = if self.roster.side_of(server).is_some() {
            server.to_owned()
        } else {
            let fallback = self
                .set_finished
                .as_ref()
                .map(|f| f.default_server.clone())
                .or_else(|| self.server.clone())
                .unwrap_or_default();
            warn!(requested = server, used = %fallback, "unknown next-set server, using default");
            fallback
        };
        let Some(serving_side) = self.roster.side_of(&server) else {
            return self.clone();
        };
        let Some(receiver_name) = self
            .roster
            .lookup_or_first(serving_side.opponent(), receiver)
            .map(str::to_owned)
        else {
            return self.clone();
        };
        if receiver_name != receiver {
            warn!(requested = receiver, used = %receiver_name, "next-set receiver not on receiving side, using first player");
        }

        let mut next = self.clone();
        next.begin_set(serving_side, server, receiver_name, elapsed);
        info!(
            game_number = next.game_number(),
            server = ?next.server,
            receiver = ?next.receiver,
            "set started"
        );
        next
    }

    /// Forget completed sets. Score and serve state are untouched.
    pub fn reset_history(&self) -> Self {
        let mut next = self.clone();
        next.completed_sets.clear();
        next
    }

    /// Copy of the rally-level state.
    pub fn snapshot(&self) -> PointSnapshot {
        PointSnapshot {
            score: self.score,
            sets_won: self.sets_won,
            serving_side: self.serving_side,
            server: self.server.clone(),
            receiver: self.receiver.clone(),
            next_server: self.next_server.clone(),
            rotation: self.rotation.clone(),
            positions: self.positions.clone(),
        }
    }

    /// Number of the set in play (or just finished), starting at 1.
    pub fn game_number(&self) -> u32 {
        let played = u32::from(self.sets_won.a) + u32::from(self.sets_won.b);
        if self.set_finished.is_some() {
            played
        } else {
            played + 1
        }
    }

    /// The set in play as a game snapshot, for reporting and stats.
    /// `None` unless a set is in progress.
    pub fn current_game(&self, elapsed: u64) -> Option<GameSnapshot> {
        if self.phase() != MatchPhase::InProgress {
            return None;
        }
        let mut points = self.history.as_slice().to_vec();
        points.push(self.snapshot());
        Some(GameSnapshot {
            game_number: self.game_number(),
            score: self.score,
            winner: None,
            duration_secs: elapsed.saturating_sub(self.set_start_time),
            points,
        })
    }

    /// Side that has taken a majority of `best_of` sets, if any.
    pub fn match_winner(&self, best_of: u8) -> Option<Side> {
        let needed = best_of / 2 + 1;
        Side::BOTH
            .into_iter()
            .find(|side| self.sets_won[*side] >= needed)
    }

    /// Scoreboard view for clients.
    pub fn to_json(&self) -> serde_json::Value {
        let positions = |side: Side| {
            serde_json::json!({
                "right": self.positions[side].right,
                "left": self.positions[side].left
            })
        };

        serde_json::json!({
            "phase": self.phase().as_str(),
            "team_a": self.roster.team_a,
            "team_b": self.roster.team_b,
            "target": self.format.target(),
            "score": [self.score.a, self.score.b],
            "sets": [self.sets_won.a, self.sets_won.b],
            "game_number": self.game_number(),
            "serving_side": self.serving_side.map(|s| s.as_str()),
            "server": self.server,
            "receiver": self.receiver,
            "next_server": self.next_server,
            "positions": {
                "a": positions(Side::A),
                "b": positions(Side::B)
            },
            "can_undo": !self.history.is_empty(),
            "set_finished": self.set_finished.as_ref().map(|f| serde_json::json!({
                "game": f.game.to_json(),
                "default_server": f.default_server,
                "default_receiver": f.default_receiver
            })),
            "completed_sets": self.completed_sets.iter().map(GameSnapshot::to_json).collect::<Vec<_>>()
        })
    }

    /// Reset score and serve state for a new set.
    fn begin_set(&mut self, serving_side: Side, server: String, receiver: String, elapsed: u64) {
        let mut rotation = ServeRotation::new(&self.roster, &server, &receiver);
        let positions = initial_positions(&self.roster, serving_side, &server, &receiver);
        for side in Side::BOTH {
            rotation.record_baseline(side, &self.roster, &positions);
        }

        self.score = PerSide::default();
        self.serving_side = Some(serving_side);
        self.next_server = rotation.next_server().map(str::to_owned);
        self.server = Some(server);
        self.receiver = Some(receiver);
        self.rotation = rotation;
        self.positions = positions;
        self.set_start_time = elapsed;
        self.history.clear();
        self.set_finished = None;
        self.last_two_winners.clear();
    }

    /// Award a rally to `side` and move serve and positions on.
    /// Does not touch the undo stack or check for the end of the set.
    fn score_rally(&self, side: Side) -> Self {
        let mut next = self.clone();
        next.score[side] += 1;

        if self.serving_side != Some(side) {
            next.rotation = self.rotation.advanced();
            next.server = next.rotation.current().map(str::to_owned);
            next.serving_side = next.rotation.serving_side(&next.roster).or(Some(side));
            if let Some(serving) = next.serving_side {
                next.rotation
                    .record_baseline(serving, &next.roster, &next.positions);
            }
        }

        let (Some(serving), Some(server)) = (next.serving_side, next.server.clone()) else {
            return next;
        };
        let receiver = next
            .rotation
            .receiver(&next.roster, serving, next.score[serving])
            .map(str::to_owned);
        next.positions = resolve_positions(
            serving,
            &next.roster,
            &server,
            receiver.as_deref().unwrap_or_default(),
            next.score,
            &next.positions,
        );
        next.receiver = receiver;
        next.next_server = next.rotation.next_server().map(str::to_owned);
        next
    }

    /// Close the set won by `winner`. `after` is the state with the winning
    /// rally already scored.
    fn finish_set(&self, after: Self, winner: Side, elapsed: u64) -> Self {
        let loser = winner.opponent();
        let mut next = after;
        next.sets_won[winner] = next.sets_won[winner].saturating_add(1);

        let mut points = self.history.as_slice().to_vec();
        points.push(self.snapshot());
        points.push(next.snapshot());

        let game = GameSnapshot {
            game_number: self.game_number(),
            score: next.score,
            winner: Some(winner),
            duration_secs: elapsed.saturating_sub(self.set_start_time),
            points,
        };
        let last_two = game.last_two_winners();
        let default_server = next.default_next_server(winner, &last_two);
        let default_receiver = next
            .roster
            .players(loser)
            .first()
            .cloned()
            .unwrap_or_default();

        info!(
            game_number = game.game_number,
            %winner,
            score_a = game.score.a,
            score_b = game.score.b,
            duration = %game.duration_label(),
            "set finished"
        );

        next.completed_sets.push(game.clone());
        next.history.clear();
        next.last_two_winners = last_two;
        next.serving_side = Some(winner);
        next.server = Some(default_server.clone());
        next.receiver = Some(default_receiver.clone());
        next.next_server = None;
        next.set_finished = Some(SetFinished {
            game,
            default_server,
            default_receiver,
        });
        next
    }

    /// Suggested first server of the next set: whoever served the winning
    /// rally if the winner took the last two rallies, otherwise that server's
    /// partner. Always a player of the winning side.
    fn default_next_server(&self, winner: Side, last_two: &[Side]) -> String {
        let won_last_two = last_two.len() == 2 && last_two.iter().all(|s| *s == winner);
        let candidate = if won_last_two {
            self.server.clone()
        } else {
            self.rotation.peek(2).map(str::to_owned)
        };

        match candidate {
            Some(name) if self.roster.side_of(&name) == Some(winner) => name,
            // Guard only: after the winning rally the candidate is on the winning side.
            _ => self
                .roster
                .players(winner)
                .first()
                .cloned()
                .unwrap_or_default(),
        }
    }

    fn restore(&mut self, snapshot: PointSnapshot) {
        self.score = snapshot.score;
        self.sets_won = snapshot.sets_won;
        self.serving_side = snapshot.serving_side;
        self.server = snapshot.server;
        self.receiver = snapshot.receiver;
        self.next_server = snapshot.next_server;
        self.rotation = snapshot.rotation;
        self.positions = snapshot.positions;
    }
}
