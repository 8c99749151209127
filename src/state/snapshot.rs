//! Point and game snapshots.
//!
//! A [`PointSnapshot`] is an owned copy of the rally-level state at one
//! instant. The [`UndoStack`] holds one per rally of the current set and is
//! popped by undo. When a set ends its snapshots move into a
//! [`GameSnapshot`], which is what the stats engine replays.

use serde::{Deserialize, Serialize};

use super::positions::CourtPositions;
use super::roster::{PerSide, Side};
use super::rotation::ServeRotation;

/// Rally-level state at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointSnapshot {
    pub score: PerSide<u32>,
    pub sets_won: PerSide<u8>,
    pub serving_side: Option<Side>,
    pub server: Option<String>,
    pub receiver: Option<String>,
    pub next_server: Option<String>,
    pub rotation: ServeRotation,
    pub positions: CourtPositions,
}

impl PointSnapshot {
    /// Side whose score went up between `previous` and this snapshot.
    pub fn scorer_since(&self, previous: &PointSnapshot) -> Option<Side> {
        Side::BOTH
            .into_iter()
            .find(|side| self.score[*side] > previous.score[*side])
    }
}

/// Snapshots of the current set, most recent last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UndoStack(Vec<PointSnapshot>);

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, snapshot: PointSnapshot) {
        self.0.push(snapshot);
    }

    pub fn pop(&mut self) -> Option<PointSnapshot> {
        self.0.pop()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[PointSnapshot] {
        &self.0
    }
}

/// One set, finished or in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// 1-based set number.
    pub game_number: u32,
    pub score: PerSide<u32>,
    /// `None` while the set is still being played.
    pub winner: Option<Side>,
    /// Elapsed seconds from set start to completion (or to now).
    pub duration_secs: u64,
    /// Every state of the set from 0-0 onwards, one per rally.
    pub points: Vec<PointSnapshot>,
}

impl GameSnapshot {
    /// Rallies played. The history starts with the 0-0 snapshot.
    pub fn points_played(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Winner of each rally, in order.
    pub fn rally_winners(&self) -> impl Iterator<Item = Side> + '_ {
        self.points
            .windows(2)
            .filter_map(|pair| pair[1].scorer_since(&pair[0]))
    }

    /// The last (up to) two rally winners, oldest first.
    pub fn last_two_winners(&self) -> Vec<Side> {
        let winners: Vec<Side> = self.rally_winners().collect();
        winners[winners.len().saturating_sub(2)..].to_vec()
    }

    pub fn duration(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.duration_secs.min(u32::MAX as u64) as i64)
    }

    /// Duration as `m:ss`.
    pub fn duration_label(&self) -> String {
        let duration = self.duration();
        format!(
            "{}:{:02}",
            duration.num_minutes(),
            duration.num_seconds() % 60
        )
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "game_number": self.game_number,
            "score": [self.score.a, self.score.b],
            "winner": self.winner.map(|s| s.as_str()),
            "duration": self.duration_label(),
            "points_played": self.points_played()
        })
    }
}

/// A set that has just ended and awaits the host's acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetFinished {
    pub game: GameSnapshot,
    /// Suggested first server of the next set, always on the winning side.
    pub default_server: String,
    /// Suggested first receiver of the next set: the losing side's first player.
    pub default_receiver: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(a: u32, b: u32) -> PointSnapshot {
        PointSnapshot {
            score: PerSide::new(a, b),
            sets_won: PerSide::default(),
            serving_side: None,
            server: None,
            receiver: None,
            next_server: None,
            rotation: ServeRotation::default(),
            positions: CourtPositions::default(),
        }
    }

    fn game(points: Vec<PointSnapshot>) -> GameSnapshot {
        GameSnapshot {
            game_number: 1,
            score: points.last().map(|p| p.score).unwrap_or_default(),
            winner: None,
            duration_secs: 754,
            points,
        }
    }

    #[test]
    fn test_rally_winners() {
        let g = game(vec![snap(0, 0), snap(1, 0), snap(1, 1), snap(2, 1)]);
        let winners: Vec<Side> = g.rally_winners().collect();
        assert_eq!(winners, [Side::A, Side::B, Side::A]);
        assert_eq!(g.points_played(), 3);
    }

    #[test]
    fn test_last_two() {
        let points = vec![snap(0, 0), snap(0, 1), snap(1, 1), snap(2, 1)];
        assert_eq!(game(points.clone()).last_two_winners(), [Side::A, Side::A]);
        assert_eq!(game(points[..2].to_vec()).last_two_winners(), [Side::B]);
        assert!(game(points[..1].to_vec()).last_two_winners().is_empty());
    }

    #[test]
    fn test_undo_stack_is_lifo() {
        let mut stack = UndoStack::new();
        stack.push(snap(0, 0));
        stack.push(snap(1, 0));
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.pop(), Some(snap(1, 0)));
        assert_eq!(stack.as_slice(), [snap(0, 0)]);
        stack.clear();
        assert!(stack.pop().is_none());
    }

    #[test]
    fn test_duration_label() {
        let g = game(vec![snap(0, 0)]);
        assert_eq!(g.duration_label(), "12:34");
        assert_eq!(g.duration().num_seconds(), 754);
        assert_eq!(g.to_json()["duration"], "12:34");
    }
}
