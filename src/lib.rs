//! A Swiss-system tournament engine.
//!
//! The crate tracks players and match results for independent tournament
//! instances called fixtures. For each fixture it computes standings with
//! strength-of-schedule tie-breaks and generates next-round pairings that
//! avoid rematches, balance byes, and keep players of similar record
//! together.
//!
//! The [`engine::Engine`] is the caller-facing surface. It combines a
//! [`store::Store`] (the storage collaborator), per-fixture locking, and
//! the pure standings/pairing computations. Storage, transport, and
//! presentation live outside this crate; the engine only ever sees an
//! immutable [`snapshot::FixtureSnapshot`] per computation.

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

#![deny(clippy::panic)]

pub mod engine;
pub mod error;
pub mod fixture;
pub mod lock;
pub mod match_record;
pub mod pairing;
pub mod player;
pub mod snapshot;
pub mod standings;
pub mod store;
pub mod tiebreak;
pub mod utils;

/// Identifier for fixtures, players, and matches.
pub type Id = u64;

/// Name of the data folder under the platform data directory.
pub const HOME: &str = "swiss-rounds";

/// The fixture used when the caller does not name one.
pub const DEFAULT_FIXTURE: &str = "default";
