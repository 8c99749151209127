//! On-court positions.
//!
//! Each side's half of the court has a right (even) and a left (odd) service
//! court, named from that side's own point of view. The server always serves
//! from the court matching their side's score parity, and the receiver is the
//! opposing player standing in the same-named court.
//!
//! Only the serving side ever changes courts: its players swap each time it
//! wins a rally while serving. The receiving side stays where it last stood.

use serde::{Deserialize, Serialize};

use super::roster::{PerSide, Roster, Side};

/// A service court within one side's half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Court {
    Right,
    Left,
}

impl Court {
    /// Court a server serves from at this score: even right, odd left.
    pub fn for_score(score: u32) -> Self {
        if score % 2 == 0 {
            Self::Right
        } else {
            Self::Left
        }
    }
}

/// Who stands where on one side. In singles both courts hold the same player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalfCourt {
    pub right: String,
    pub left: String,
}

impl HalfCourt {
    pub fn new(right: impl Into<String>, left: impl Into<String>) -> Self {
        Self {
            right: right.into(),
            left: left.into(),
        }
    }

    /// Put `player` in `court` and `partner` in the other one.
    pub fn placing(player: &str, partner: &str, court: Court) -> Self {
        match court {
            Court::Right => Self::new(player, partner),
            Court::Left => Self::new(partner, player),
        }
    }

    pub fn in_court(&self, court: Court) -> &str {
        match court {
            Court::Right => &self.right,
            Court::Left => &self.left,
        }
    }
}

/// Positions of both sides.
pub type CourtPositions = PerSide<HalfCourt>;

/// Positions at 0-0: server and receiver both start in their right courts.
pub fn initial_positions(
    roster: &Roster,
    serving_side: Side,
    server: &str,
    receiver: &str,
) -> CourtPositions {
    let mut positions = CourtPositions::default();
    positions[serving_side] =
        HalfCourt::placing(server, roster.partner_of(server).unwrap_or(server), Court::Right);
    positions[serving_side.opponent()] = HalfCourt::placing(
        receiver,
        roster.partner_of(receiver).unwrap_or(receiver),
        Court::Right,
    );
    positions
}

/// Recompute positions after a rally.
///
/// At 0-0 both sides are laid out from scratch. Otherwise only the serving
/// side moves, placing the server by its own score parity; the other side
/// keeps `previous`.
pub fn resolve_positions(
    serving_side: Side,
    roster: &Roster,
    server: &str,
    receiver: &str,
    score: PerSide<u32>,
    previous: &CourtPositions,
) -> CourtPositions {
    if score.a == 0 && score.b == 0 {
        return initial_positions(roster, serving_side, server, receiver);
    }

    let mut positions = previous.clone();
    positions[serving_side] = HalfCourt::placing(
        server,
        roster.partner_of(server).unwrap_or(server),
        Court::for_score(score[serving_side]),
    );
    positions
}
