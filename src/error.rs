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

use thiserror::Error;

use crate::Id;

/// Everything the engine can refuse to do.
///
/// Errors are surfaced to the caller unmodified and never retried
/// internally. A failed operation leaves match history unchanged.
#[derive(Error, Debug)]
pub enum Error {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid match: {0}")]
    InvalidMatch(String),

    #[error("duplicate result: player {player} already has a result in round {round}")]
    DuplicateResult { player: Id, round: u32 },

    #[error("round {round} is incomplete: {unresolved} player(s) still have no result")]
    IncompletePriorRound { round: u32, unresolved: usize },

    #[error("timed out waiting for the {mode} lock on fixture {fixture}")]
    LockTimeout { fixture: Id, mode: &'static str },

    #[error("fixture name already in use: {0}")]
    NameTaken(String),
}
