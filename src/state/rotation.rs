//! Serve rotation.
//!
//! In doubles the right to serve passes in a fixed cycle: initial server,
//! partner of the initial receiver, partner of the initial server, initial
//! receiver, then back to the initial server. Singles alternates between the
//! two players. The index into that cycle advances by one each time the
//! receiving side wins a rally.
//!
//! The receiver is found by score parity against a per-side baseline: the
//! slot (in the opposing roster) of whoever stood in the opposing right court
//! when the serving side took the serve. The receiving side never moves while
//! the other side serves, so the baseline stays valid for the whole run.

use serde::{Deserialize, Serialize};

use super::positions::CourtPositions;
use super::roster::{PerSide, Roster, Side};

/// The serve cycle for one set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServeRotation {
    order: Vec<String>,
    index: usize,
    baseline: PerSide<usize>,
}

impl ServeRotation {
    /// Build the cycle seeded by the set's first server and receiver.
    pub fn new(roster: &Roster, server: &str, receiver: &str) -> Self {
        let order = Self::canonical_order(roster, server, receiver);
        let index = order.iter().position(|p| p == server).unwrap_or(0);
        Self {
            order,
            index,
            baseline: PerSide::default(),
        }
    }

    /// `[server, receiver]` for singles,
    /// `[server, partner of receiver, partner of server, receiver]` for doubles.
    pub fn canonical_order(roster: &Roster, server: &str, receiver: &str) -> Vec<String> {
        if !roster.is_doubles() {
            return vec![server.to_owned(), receiver.to_owned()];
        }
        let receiver_partner = roster.partner_of(receiver).unwrap_or(receiver);
        let server_partner = roster.partner_of(server).unwrap_or(server);
        vec![
            server.to_owned(),
            receiver_partner.to_owned(),
            server_partner.to_owned(),
            receiver.to_owned(),
        ]
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Current server.
    pub fn current(&self) -> Option<&str> {
        self.peek(0)
    }

    /// Player `offset` steps ahead in the cycle.
    pub fn peek(&self, offset: usize) -> Option<&str> {
        if self.order.is_empty() {
            return None;
        }
        self.order
            .get((self.index + offset) % self.order.len())
            .map(String::as_str)
    }

    /// Who serves if the receiving side wins the next rally.
    pub fn next_server(&self) -> Option<&str> {
        self.peek(1)
    }

    /// The cycle moved on by one server.
    pub fn advanced(&self) -> Self {
        let mut next = self.clone();
        if !next.order.is_empty() {
            next.index = (next.index + 1) % next.order.len();
        }
        next
    }

    /// Side of the current server, read from the roster.
    pub fn serving_side(&self, roster: &Roster) -> Option<Side> {
        roster.side_of(self.current()?)
    }

    /// Record the receiving baseline for `serving_side` from the opponents'
    /// current positions. Called whenever a side takes the serve.
    pub fn record_baseline(&mut self, serving_side: Side, roster: &Roster, positions: &CourtPositions) {
        let opponent = serving_side.opponent();
        self.baseline[serving_side] = roster
            .index_of(opponent, &positions[opponent].right)
            .unwrap_or(0);
    }

    /// Receiver when `serving_side` serves holding `serving_score` points:
    /// the opponent in the right court on even scores, the left on odd.
    pub fn receiver<'a>(
        &self,
        roster: &'a Roster,
        serving_side: Side,
        serving_score: u32,
    ) -> Option<&'a str> {
        let opponents = roster.players(serving_side.opponent());
        let slot = match opponents.len() {
            0 => return None,
            1 => 0,
            n => (self.baseline[serving_side] + (serving_score % 2) as usize) % n,
        };
        opponents.get(slot).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::positions::{initial_positions, HalfCourt};

    fn roster() -> Roster {
        Roster::doubles(["Ann", "Amy"], ["Ben", "Bob"])
    }

    #[test]
    fn test_canonical_doubles_order() {
        let rotation = ServeRotation::new(&roster(), "Amy", "Ben");
        assert_eq!(rotation.order(), ["Amy", "Bob", "Ann", "Ben"]);
        assert_eq!(rotation.index(), 0);
        assert_eq!(rotation.current(), Some("Amy"));
        assert_eq!(rotation.next_server(), Some("Bob"));
    }

    #[test]
    fn test_singles_order() {
        let roster = Roster::singles("Alice", "Bob");
        let rotation = ServeRotation::new(&roster, "Bob", "Alice");
        assert_eq!(rotation.order(), ["Bob", "Alice"]);
        assert_eq!(rotation.advanced().advanced(), rotation);
    }

    #[test]
    fn test_advance_wraps() {
        let rotation = ServeRotation::new(&roster(), "Ann", "Ben");
        let mut r = rotation.clone();
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(r.current().unwrap().to_string());
            r = r.advanced();
        }
        assert_eq!(seen, ["Ann", "Bob", "Amy", "Ben"]);
        assert_eq!(r, rotation);
        assert_eq!(r.serving_side(&roster()), Some(Side::A));
        assert_eq!(r.advanced().serving_side(&roster()), Some(Side::B));
    }

    #[test]
    fn test_receiver_by_parity() {
        let roster = roster();
        let positions = initial_positions(&roster, Side::A, "Ann", "Bob");
        let mut rotation = ServeRotation::new(&roster, "Ann", "Bob");
        rotation.record_baseline(Side::A, &roster, &positions);

        assert_eq!(rotation.receiver(&roster, Side::A, 0), Some("Bob"));
        assert_eq!(rotation.receiver(&roster, Side::A, 1), Some("Ben"));
        assert_eq!(rotation.receiver(&roster, Side::A, 2), Some("Bob"));
    }

    #[test]
    fn test_baseline_follows_opponent_positions() {
        let roster = roster();
        let positions = PerSide::new(HalfCourt::new("Amy", "Ann"), HalfCourt::new("Ben", "Bob"));
        let mut rotation = ServeRotation::new(&roster, "Ben", "Amy");
        rotation.record_baseline(Side::B, &roster, &positions);

        assert_eq!(rotation.receiver(&roster, Side::B, 4), Some("Amy"));
        assert_eq!(rotation.receiver(&roster, Side::B, 5), Some("Ann"));
    }

    #[test]
    fn test_empty_rotation() {
        let rotation = ServeRotation::default();
        assert_eq!(rotation.current(), None);
        assert_eq!(rotation.advanced(), rotation);
    }
}
