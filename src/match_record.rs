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

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Id;

/// The record of one completed game.
///
/// Immutable once created. Correcting a wrongly reported result means
/// deleting the record and reporting again; there is no update.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MatchRecord {
    pub id: Id,
    pub winner: Id,
    pub loser: Id,
    /// 1-based round the match belongs to.
    pub round: u32,
    pub fixture: Id,
    /// When the result was reported. Informational only.
    pub recorded: DateTime<Utc>,
}

impl fmt::Display for MatchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "round {}: {} beat {}",
            self.round, self.winner, self.loser
        )
    }
}

impl PartialEq for MatchRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MatchRecord {}

/// A round a player sat out.
///
/// A bye counts as a result for round completeness but it is not a match:
/// it adds nothing to wins, losses, or matches played.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Bye {
    pub player: Id,
    pub round: u32,
    pub fixture: Id,
}

impl fmt::Display for Bye {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "round {}: {} has a bye", self.round, self.player)
    }
}
