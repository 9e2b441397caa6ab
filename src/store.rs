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
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    Id,
    error::Error,
    fixture::Fixture,
    match_record::{Bye, MatchRecord},
    player::Player,
    snapshot::FixtureSnapshot,
};

/// The storage collaborator contract.
///
/// The engine never issues queries of its own; it goes through this
/// trait for every read and write, and reads whole fixtures as one
/// consistent [`FixtureSnapshot`].
pub trait Store {
    /// # Errors
    ///
    /// `Error::NameTaken` if a fixture with this name exists.
    fn create_fixture(&self, name: &str) -> Result<Fixture, Error>;

    /// Deletes a fixture and everything it owns.
    ///
    /// # Errors
    ///
    /// `Error::NotFound` if there is no such fixture.
    fn delete_fixture(&self, fixture: Id) -> Result<(), Error>;

    /// # Errors
    ///
    /// `Error::NotFound` if there is no fixture with this name.
    fn fixture_by_name(&self, name: &str) -> Result<Fixture, Error>;

    /// # Errors
    ///
    /// `Error::NotFound` if the fixture does not exist.
    fn add_player(&self, fixture: Id, name: &str) -> Result<Player, Error>;

    /// # Errors
    ///
    /// `Error::NotFound` if the player does not exist; `Error::InvalidMatch`
    /// if any of the player's matches or byes are still recorded.
    fn remove_player(&self, player: Id) -> Result<(), Error>;

    /// # Errors
    ///
    /// `Error::NotFound` if the fixture does not exist.
    fn add_match(&self, fixture: Id, winner: Id, loser: Id, round: u32)
    -> Result<MatchRecord, Error>;

    /// # Errors
    ///
    /// `Error::NotFound` if the fixture does not exist.
    fn add_bye(&self, fixture: Id, player: Id, round: u32) -> Result<Bye, Error>;

    /// Removes every match and bye of a fixture.
    ///
    /// # Errors
    ///
    /// `Error::NotFound` if the fixture does not exist.
    fn clear_results(&self, fixture: Id) -> Result<(), Error>;

    /// Removes every player of a fixture. Results must be cleared first.
    ///
    /// # Errors
    ///
    /// `Error::NotFound` if the fixture does not exist;
    /// `Error::InvalidMatch` while results remain.
    fn clear_players(&self, fixture: Id) -> Result<(), Error>;

    /// One consistent view of the fixture and everything it owns.
    ///
    /// # Errors
    ///
    /// `Error::NotFound` if the fixture does not exist.
    fn snapshot(&self, fixture: Id) -> Result<FixtureSnapshot, Error>;
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
struct State {
    next_id: Id,
    fixtures: BTreeMap<Id, Fixture>,
    players: BTreeMap<Id, Player>,
    matches: BTreeMap<Id, MatchRecord>,
    byes: Vec<Bye>,
}

impl State {
    fn next_id(&mut self) -> Id {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory [`Store`] whose whole state round-trips through RON.
///
/// Interior mutability keeps the trait object shareable between threads;
/// the engine's per-fixture locks provide the multi-operation atomicity
/// on top of it.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Loads a store previously written by [`MemoryStore::save`].
    ///
    /// A missing file yields an empty store, so first runs need no setup.
    ///
    /// # Errors
    ///
    /// If the file cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let contents = fs::read_to_string(path)?;
        let state = ron::from_str(&contents)?;

        Ok(Self {
            state: Mutex::new(state),
        })
    }

    /// # Errors
    ///
    /// If the state cannot be serialized or written.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let string = ron::ser::to_string_pretty(&*self.state(), ron::ser::PrettyConfig::default())?;
        fs::write(path, string)?;
        Ok(())
    }
}

impl Store for MemoryStore {
    fn create_fixture(&self, name: &str) -> Result<Fixture, Error> {
        let mut state = self.state();

        if state.fixtures.values().any(|fixture| fixture.name == name) {
            return Err(Error::NameTaken(name.to_string()));
        }

        let fixture = Fixture {
            id: state.next_id(),
            name: name.to_string(),
        };
        state.fixtures.insert(fixture.id, fixture.clone());
        Ok(fixture)
    }

    fn delete_fixture(&self, fixture: Id) -> Result<(), Error> {
        let mut state = self.state();

        if state.fixtures.remove(&fixture).is_none() {
            return Err(Error::NotFound(format!("fixture {fixture}")));
        }

        state.players.retain(|_, player| player.fixture != fixture);
        state.matches.retain(|_, record| record.fixture != fixture);
        state.byes.retain(|bye| bye.fixture != fixture);
        Ok(())
    }

    fn fixture_by_name(&self, name: &str) -> Result<Fixture, Error> {
        self.state()
            .fixtures
            .values()
            .find(|fixture| fixture.name == name)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("fixture {name}")))
    }

    fn add_player(&self, fixture: Id, name: &str) -> Result<Player, Error> {
        let mut state = self.state();

        if !state.fixtures.contains_key(&fixture) {
            return Err(Error::NotFound(format!("fixture {fixture}")));
        }

        let player = Player {
            id: state.next_id(),
            name: name.to_string(),
            fixture,
        };
        state.players.insert(player.id, player.clone());
        Ok(player)
    }

    fn remove_player(&self, player: Id) -> Result<(), Error> {
        let mut state = self.state();

        if !state.players.contains_key(&player) {
            return Err(Error::NotFound(format!("player {player}")));
        }

        let has_history = state
            .matches
            .values()
            .any(|record| record.winner == player || record.loser == player)
            || state.byes.iter().any(|bye| bye.player == player);
        if has_history {
            return Err(Error::InvalidMatch(format!(
                "player {player} still has recorded results; clear them first"
            )));
        }

        state.players.remove(&player);
        Ok(())
    }

    fn add_match(
        &self,
        fixture: Id,
        winner: Id,
        loser: Id,
        round: u32,
    ) -> Result<MatchRecord, Error> {
        let mut state = self.state();

        if !state.fixtures.contains_key(&fixture) {
            return Err(Error::NotFound(format!("fixture {fixture}")));
        }

        let record = MatchRecord {
            id: state.next_id(),
            winner,
            loser,
            round,
            fixture,
            recorded: Utc::now(),
        };
        state.matches.insert(record.id, record.clone());
        Ok(record)
    }

    fn add_bye(&self, fixture: Id, player: Id, round: u32) -> Result<Bye, Error> {
        let mut state = self.state();

        if !state.fixtures.contains_key(&fixture) {
            return Err(Error::NotFound(format!("fixture {fixture}")));
        }

        let bye = Bye {
            player,
            round,
            fixture,
        };
        state.byes.push(bye.clone());
        Ok(bye)
    }

    fn clear_results(&self, fixture: Id) -> Result<(), Error> {
        let mut state = self.state();

        if !state.fixtures.contains_key(&fixture) {
            return Err(Error::NotFound(format!("fixture {fixture}")));
        }

        state.matches.retain(|_, record| record.fixture != fixture);
        state.byes.retain(|bye| bye.fixture != fixture);
        Ok(())
    }

    fn clear_players(&self, fixture: Id) -> Result<(), Error> {
        let mut state = self.state();

        if !state.fixtures.contains_key(&fixture) {
            return Err(Error::NotFound(format!("fixture {fixture}")));
        }

        if state.matches.values().any(|record| record.fixture == fixture) {
            return Err(Error::InvalidMatch(format!(
                "fixture {fixture} still has recorded results; clear them first"
            )));
        }

        state.players.retain(|_, player| player.fixture != fixture);
        Ok(())
    }

    fn snapshot(&self, fixture: Id) -> Result<FixtureSnapshot, Error> {
        let state = self.state();

        let Some(fixture) = state.fixtures.get(&fixture).cloned() else {
            return Err(Error::NotFound(format!("fixture {fixture}")));
        };

        Ok(FixtureSnapshot {
            players: state
                .players
                .values()
                .filter(|player| player.fixture == fixture.id)
                .cloned()
                .collect(),
            matches: state
                .matches
                .values()
                .filter(|record| record.fixture == fixture.id)
                .cloned()
                .collect(),
            byes: state
                .byes
                .iter()
                .filter(|bye| bye.fixture == fixture.id)
                .cloned()
                .collect(),
            fixture,
        })
    }
}
