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
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    Id,
    snapshot::{RematchKey, rematch_key},
    standings::Standing,
};

/// One table in the upcoming round.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Pair {
    pub first: Id,
    pub second: Id,
    /// Set when these two already played and no rematch-free opponent
    /// was left. A forced rematch is a valid pairing, not an error.
    pub forced_rematch: bool,
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.forced_rematch {
            write!(f, "{} vs {} (rematch)", self.first, self.second)
        } else {
            write!(f, "{} vs {}", self.first, self.second)
        }
    }
}

/// The complete pairing for one round: every registered player appears in
/// exactly one pair, or is the single bye recipient.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PairingResult {
    pub round: u32,
    pub pairs: Vec<Pair>,
    pub bye: Option<Id>,
}

impl fmt::Display for PairingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "round {}:", self.round)?;
        for pair in &self.pairs {
            write!(f, " [{pair}]")?;
        }
        if let Some(bye) = self.bye {
            write!(f, " bye: {bye}")?;
        }
        Ok(())
    }
}

/// Produces the next round's pairing from a ranking.
///
/// The ranking must already be ordered by the tie-break resolver. With an
/// odd pool the bye goes to the lowest-ranked player who has not had one
/// yet, or the lowest-ranked player outright once everyone has. The rest
/// are paired top-down: each unpaired leader takes the nearest unpaired
/// player below it that it has not faced, falling back to the nearest
/// unpaired player when every remaining option is a rematch.
#[must_use]
pub fn generate(
    ranking: &[Standing],
    rematches: &HashSet<RematchKey>,
    prior_byes: &HashSet<Id>,
    round: u32,
) -> PairingResult {
    let mut pool: Vec<Id> = ranking.iter().map(|standing| standing.player).collect();

    let mut bye = None;
    if pool.len() % 2 == 1 {
        let pick = pool
            .iter()
            .rposition(|player| !prior_byes.contains(player))
            .unwrap_or(pool.len() - 1);
        bye = Some(pool.remove(pick));
    }

    let mut consumed = vec![false; pool.len()];
    let mut pairs = Vec::with_capacity(pool.len() / 2);

    for top in 0..pool.len() {
        if consumed[top] {
            continue;
        }
        consumed[top] = true;

        let fresh = (top + 1..pool.len()).find(|below| {
            !consumed[*below] && !rematches.contains(&rematch_key(pool[top], pool[*below]))
        });
        let opponent = match fresh {
            Some(below) => Some((below, false)),
            None => (top + 1..pool.len())
                .find(|below| !consumed[*below])
                .map(|below| (below, true)),
        };

        if let Some((below, forced_rematch)) = opponent {
            consumed[below] = true;
            pairs.push(Pair {
                first: pool[top],
                second: pool[below],
                forced_rematch,
            });
        }
    }

    PairingResult { round, pairs, bye }
}
