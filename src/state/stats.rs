//! Match statistics.
//!
//! Computed by replaying point histories; never touches match state.

use serde::{Deserialize, Serialize};

use super::format::ScoringFormat;
use super::roster::{PerSide, Side};
use super::snapshot::{GameSnapshot, PointSnapshot};

/// Statistics for one set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetStats {
    pub final_score: PerSide<u32>,
    pub total_points: u32,
    /// Longest run of consecutive rallies won.
    pub longest_streak: PerSide<u32>,
    /// Rallies played while holding game point.
    pub game_points: PerSide<u32>,
}

impl SetStats {
    /// Replay a set's history, starting from its 0-0 snapshot.
    pub fn from_points(points: &[PointSnapshot], format: ScoringFormat) -> Self {
        let mut stats = Self {
            final_score: points.last().map(|p| p.score).unwrap_or_default(),
            total_points: points.len().saturating_sub(1) as u32,
            ..Self::default()
        };

        let mut run = PerSide::<u32>::default();
        for pair in points.windows(2) {
            if let Some(side) = pair[1].scorer_since(&pair[0]) {
                run[side] += 1;
                run[side.opponent()] = 0;
                stats.longest_streak[side] = stats.longest_streak[side].max(run[side]);
            }

            for side in Side::BOTH {
                if holds_game_point(pair[1].score, side, format) {
                    stats.game_points[side] += 1;
                }
            }
        }

        stats
    }

    pub fn from_game(game: &GameSnapshot, format: ScoringFormat) -> Self {
        Self::from_points(&game.points, format)
    }
}

/// Whether `side` holds game point at this score: on `target - 1` with the
/// opponent below it, or at or past the target leading by exactly one.
fn holds_game_point(score: PerSide<u32>, side: Side, format: ScoringFormat) -> bool {
    let own = score[side];
    let other = score[side.opponent()];
    let target = format.target();

    let first = own + 1 == target && other < own;
    let extended = own >= target && own == other + 1;
    first || extended
}

/// Statistics across several sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    pub sets: Vec<SetStats>,
    /// Rallies won per side, summed over sets.
    pub points_won: PerSide<u32>,
    pub total_points: u32,
    /// Best single-set streak (not a sum).
    pub longest_streak: PerSide<u32>,
    pub game_points: PerSide<u32>,
}

impl MatchStats {
    pub fn from_games<'a>(
        games: impl IntoIterator<Item = &'a GameSnapshot>,
        format: ScoringFormat,
    ) -> Self {
        let mut stats = Self::default();
        for game in games {
            let set = SetStats::from_game(game, format);
            for side in Side::BOTH {
                stats.points_won[side] += set.final_score[side];
                stats.game_points[side] += set.game_points[side];
                stats.longest_streak[side] = stats.longest_streak[side].max(set.longest_streak[side]);
            }
            stats.total_points += set.total_points;
            stats.sets.push(set);
        }
        stats
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "sets_played": self.sets.len(),
            "points_won": [self.points_won.a, self.points_won.b],
            "total_points": self.total_points,
            "longest_streak": [self.longest_streak.a, self.longest_streak.b],
            "game_points": [self.game_points.a, self.game_points.b]
        })
    }
}
