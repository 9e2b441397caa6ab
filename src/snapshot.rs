// This file is part of swiss-rounds.
//
// swiss-rounds is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// swiss-rounds is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    Id,
    fixture::Fixture,
    match_record::{Bye, MatchRecord},
    player::Player,
};

/// An unordered pair of players that have already faced each other.
///
/// Stored with the smaller id first so lookups are order-independent.
pub type RematchKey = (Id, Id);

#[must_use]
pub fn rematch_key(a: Id, b: Id) -> RematchKey {
    if a <= b { (a, b) } else { (b, a) }
}

/// A consistent, immutable view of one fixture.
///
/// Standings and pairing generation are pure functions over a snapshot;
/// they never reach back into storage.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FixtureSnapshot {
    pub fixture: Fixture,
    pub players: Vec<Player>,
    pub matches: Vec<MatchRecord>,
    pub byes: Vec<Bye>,
}

impl FixtureSnapshot {
    #[must_use]
    pub fn player_ids(&self) -> HashSet<Id> {
        self.players.iter().map(|player| player.id).collect()
    }

    /// The highest round any result has been recorded for, 0 if none.
    #[must_use]
    pub fn last_round(&self) -> u32 {
        let matches = self.matches.iter().map(|record| record.round);
        let byes = self.byes.iter().map(|bye| bye.round);
        matches.chain(byes).max().unwrap_or(0)
    }

    /// Whether the player has a match result or a bye in the given round.
    #[must_use]
    pub fn has_result(&self, player: Id, round: u32) -> bool {
        self.matches
            .iter()
            .any(|record| record.round == round && (record.winner == player || record.loser == player))
            || self
                .byes
                .iter()
                .any(|bye| bye.round == round && bye.player == player)
    }

    /// Registered players with no result in the given round.
    #[must_use]
    pub fn unresolved(&self, round: u32) -> Vec<Id> {
        self.players
            .iter()
            .map(|player| player.id)
            .filter(|player| !self.has_result(*player, round))
            .collect()
    }

    #[must_use]
    pub fn is_round_complete(&self, round: u32) -> bool {
        self.unresolved(round).is_empty()
    }

    /// The round currently being filled: the lowest round some registered
    /// player still has no result for.
    ///
    /// This replaces deriving the round from arithmetic on the match
    /// count, which goes wrong as soon as a bye consumes a slot without
    /// producing a match record.
    #[must_use]
    pub fn open_round(&self) -> u32 {
        if self.players.is_empty() {
            return 1;
        }

        for round in 1..=self.last_round() {
            if !self.is_round_complete(round) {
                return round;
            }
        }

        self.last_round() + 1
    }

    /// Every pair of players that have already played each other.
    #[must_use]
    pub fn rematches(&self) -> HashSet<RematchKey> {
        self.matches
            .iter()
            .map(|record| rematch_key(record.winner, record.loser))
            .collect()
    }

    /// Players that have already received a bye in this fixture.
    #[must_use]
    pub fn players_with_bye(&self) -> HashSet<Id> {
        self.byes.iter().map(|bye| bye.player).collect()
    }
}
