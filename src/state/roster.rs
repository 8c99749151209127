//! Sides and rosters.
//!
//! A match is contested by two sides, each fielding one player (singles) or
//! two players (doubles). Players are identified by name only.

use std::collections::HashSet;
use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use super::setup::SetupError;

/// Maximum players per side.
pub const MAX_SIDE_PLAYERS: usize = 2;

/// One of the two sides of the net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Both sides, in declaration order.
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    /// The other side.
    pub fn opponent(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value held once per side, indexable by [`Side`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PerSide<T> {
    pub a: T,
    pub b: T,
}

impl<T> PerSide<T> {
    pub fn new(a: T, b: T) -> Self {
        Self { a, b }
    }
}

impl<T> Index<Side> for PerSide<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }
}

impl<T> IndexMut<Side> for PerSide<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::A => &mut self.a,
            Side::B => &mut self.b,
        }
    }
}

/// Player names for both sides, in declaration order.
///
/// An empty roster means no match has been started yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub team_a: Vec<String>,
    pub team_b: Vec<String>,
}

impl Roster {
    pub fn new(team_a: Vec<String>, team_b: Vec<String>) -> Self {
        Self { team_a, team_b }
    }

    /// One player per side.
    pub fn singles(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::new(vec![a.into()], vec![b.into()])
    }

    /// Two players per side.
    pub fn doubles<S: Into<String>>(team_a: [S; 2], team_b: [S; 2]) -> Self {
        Self::new(
            team_a.into_iter().map(Into::into).collect(),
            team_b.into_iter().map(Into::into).collect(),
        )
    }

    /// Players of one side.
    pub fn players(&self, side: Side) -> &[String] {
        match side {
            Side::A => &self.team_a,
            Side::B => &self.team_b,
        }
    }

    /// True until both sides have at least one player.
    pub fn is_empty(&self) -> bool {
        self.team_a.is_empty() || self.team_b.is_empty()
    }

    pub fn is_doubles(&self) -> bool {
        self.team_a.len() == 2 && self.team_b.len() == 2
    }

    /// Which side a player belongs to.
    pub fn side_of(&self, name: &str) -> Option<Side> {
        Side::BOTH
            .into_iter()
            .find(|side| self.players(*side).iter().any(|p| p == name))
    }

    /// Slot of a player within its side's declaration order.
    pub fn index_of(&self, side: Side, name: &str) -> Option<usize> {
        self.players(side).iter().position(|p| p == name)
    }

    /// The other player on the same side. In singles a player is their own partner.
    pub fn partner_of(&self, name: &str) -> Option<&str> {
        let side = self.side_of(name)?;
        let players = self.players(side);
        let index = self.index_of(side, name)?;
        players.get((index + 1) % players.len()).map(String::as_str)
    }

    /// Look a player up on `side`, falling back to the side's first player
    /// when the name is not found. `None` only if the side is empty.
    pub fn lookup_or_first(&self, side: Side, name: &str) -> Option<&str> {
        let players = self.players(side);
        players
            .iter()
            .find(|p| p.as_str() == name)
            .or_else(|| players.first())
            .map(String::as_str)
    }

    /// Check that the roster can be played: one or two non-empty, unique
    /// names per side, both sides the same size.
    pub fn validate(&self) -> Result<(), SetupError> {
        for side in Side::BOTH {
            let count = self.players(side).len();
            if count == 0 {
                return Err(SetupError::EmptySide(side));
            }
            if count > MAX_SIDE_PLAYERS {
                return Err(SetupError::TooManyPlayers { side, count });
            }
        }

        if self.team_a.len() != self.team_b.len() {
            return Err(SetupError::UnevenSides {
                a: self.team_a.len(),
                b: self.team_b.len(),
            });
        }

        let mut seen = HashSet::new();
        for name in self.team_a.iter().chain(&self.team_b) {
            if name.trim().is_empty() {
                return Err(SetupError::EmptyName);
            }
            if !seen.insert(name.as_str()) {
                return Err(SetupError::DuplicatePlayer(name.clone()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doubles() -> Roster {
        Roster::doubles(["Ann", "Amy"], ["Ben", "Bob"])
    }

    #[test]
    fn test_side_lookup() {
        let roster = doubles();
        assert_eq!(roster.side_of("Amy"), Some(Side::A));
        assert_eq!(roster.side_of("Bob"), Some(Side::B));
        assert_eq!(roster.side_of("Zed"), None);
        assert_eq!(roster.index_of(Side::B, "Bob"), Some(1));
    }

    #[test]
    fn test_partners() {
        let roster = doubles();
        assert_eq!(roster.partner_of("Ann"), Some("Amy"));
        assert_eq!(roster.partner_of("Bob"), Some("Ben"));

        let singles = Roster::singles("Alice", "Bob");
        assert_eq!(singles.partner_of("Alice"), Some("Alice"));
    }

    #[test]
    fn test_lookup_falls_back_to_first() {
        let roster = doubles();
        assert_eq!(roster.lookup_or_first(Side::A, "Amy"), Some("Amy"));
        assert_eq!(roster.lookup_or_first(Side::A, "Ben"), Some("Ann"));
        assert_eq!(Roster::default().lookup_or_first(Side::A, "Ann"), None);
    }

    #[test]
    fn test_validate() {
        assert!(doubles().validate().is_ok());
        assert!(Roster::singles("Alice", "Bob").validate().is_ok());

        assert_eq!(
            Roster::new(vec![], vec!["Bob".into()]).validate(),
            Err(SetupError::EmptySide(Side::A))
        );
        assert_eq!(
            Roster::new(vec!["Ann".into()], vec!["Ben".into(), "Bob".into()]).validate(),
            Err(SetupError::UnevenSides { a: 1, b: 2 })
        );
        assert_eq!(
            Roster::singles("Sam", "Sam").validate(),
            Err(SetupError::DuplicatePlayer("Sam".into()))
        );
        assert!(matches!(
            Roster::new(
                vec!["a".into(), "b".into(), "c".into()],
                vec!["d".into(), "e".into(), "f".into()]
            )
            .validate(),
            Err(SetupError::TooManyPlayers { side: Side::A, count: 3 })
        ));
    }

    #[test]
    fn test_per_side_index() {
        let mut score = PerSide::new(3u32, 5u32);
        score[Side::B] += 1;
        assert_eq!(score[Side::A], 3);
        assert_eq!(score[Side::B], 6);
        assert_eq!(Side::A.opponent(), Side::B);
        assert_eq!(format!("{}", Side::B), "B");
    }
}
