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

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Id, error::Error, snapshot::FixtureSnapshot};

/// One player's record, recomputed on demand and never persisted.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Standing {
    pub player: Id,
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    /// Matches played. Byes are not matches.
    pub matches: u32,
    pub byes: u32,
    /// Strength of schedule: the summed win totals of every opponent
    /// faced. Filled in by the tie-break resolver.
    pub opponent_wins: u32,
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}-{} ({} matches, sos {})",
            self.player, self.name, self.wins, self.losses, self.matches, self.opponent_wins
        )
    }
}

/// Tallies wins, losses, matches, and byes for every registered player.
///
/// Players with no matches get a zeroed standing. The order is by player
/// id; ranking is the tie-break resolver's job.
///
/// # Errors
///
/// `Error::InvalidMatch` if a match references a player outside the
/// fixture's player set.
pub fn tally(snapshot: &FixtureSnapshot) -> Result<Vec<Standing>, Error> {
    let mut standings: BTreeMap<Id, Standing> = snapshot
        .players
        .iter()
        .map(|player| {
            (
                player.id,
                Standing {
                    player: player.id,
                    name: player.name.clone(),
                    wins: 0,
                    losses: 0,
                    matches: 0,
                    byes: 0,
                    opponent_wins: 0,
                },
            )
        })
        .collect();

    for record in &snapshot.matches {
        let Some(winner) = standings.get_mut(&record.winner) else {
            return Err(Error::InvalidMatch(format!(
                "match {} names winner {} which is not in fixture {}",
                record.id, record.winner, snapshot.fixture.name
            )));
        };
        winner.wins += 1;
        winner.matches += 1;

        let Some(loser) = standings.get_mut(&record.loser) else {
            return Err(Error::InvalidMatch(format!(
                "match {} names loser {} which is not in fixture {}",
                record.id, record.loser, snapshot.fixture.name
            )));
        };
        loser.losses += 1;
        loser.matches += 1;
    }

    for bye in &snapshot.byes {
        if let Some(standing) = standings.get_mut(&bye.player) {
            standing.byes += 1;
        }
    }

    Ok(standings.into_values().collect())
}
