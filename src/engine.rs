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

use std::time::Duration;

use log::{debug, info};

use crate::{
    Id,
    error::Error,
    fixture::Fixture,
    lock::FixtureLocks,
    match_record::{Bye, MatchRecord},
    pairing::{self, PairingResult},
    player::Player,
    snapshot::FixtureSnapshot,
    standings::{self, Standing},
    store::Store,
    tiebreak,
};

/// How long an operation waits for a fixture lock before giving up.
pub const LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// The caller-facing surface of the engine.
///
/// Wraps the storage collaborator with per-fixture locking: reads
/// (standings, pairings) take the lock shared, writes (recording,
/// registration, resets) take it exclusive. All computation runs over
/// one immutable snapshot taken under the lock.
#[derive(Debug)]
pub struct Engine<S> {
    store: S,
    locks: FixtureLocks,
}

impl<S: Store> Engine<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_timeout(store, LOCK_TIMEOUT)
    }

    #[must_use]
    pub fn with_timeout(store: S, timeout: Duration) -> Self {
        Self {
            store,
            locks: FixtureLocks::new(timeout),
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// # Errors
    ///
    /// `Error::NameTaken` if the name is in use.
    pub fn create_fixture(&self, name: &str) -> Result<Fixture, Error> {
        let fixture = self.store.create_fixture(name)?;
        info!("created fixture {fixture}");
        Ok(fixture)
    }

    /// Deletes a fixture and everything it owns.
    ///
    /// # Errors
    ///
    /// `Error::NotFound`, `Error::LockTimeout`.
    pub fn delete_fixture(&self, name: &str) -> Result<(), Error> {
        let fixture = self.store.fixture_by_name(name)?;
        let _guard = self.locks.exclusive(fixture.id)?;

        self.store.delete_fixture(fixture.id)?;
        info!("deleted fixture {fixture}");
        Ok(())
    }

    /// # Errors
    ///
    /// `Error::NotFound`, `Error::LockTimeout`.
    pub fn register_player(&self, name: &str, fixture: &str) -> Result<Player, Error> {
        let fixture = self.store.fixture_by_name(fixture)?;
        let _guard = self.locks.exclusive(fixture.id)?;

        let player = self.store.add_player(fixture.id, name)?;
        info!("registered {player} in fixture {}", fixture.name);
        Ok(player)
    }

    /// # Errors
    ///
    /// `Error::NotFound`, `Error::LockTimeout`.
    pub fn count_players(&self, fixture: &str) -> Result<usize, Error> {
        let fixture = self.store.fixture_by_name(fixture)?;
        let _guard = self.locks.shared(fixture.id)?;

        Ok(self.store.snapshot(fixture.id)?.players.len())
    }

    /// Standings ordered by wins, strength of schedule, then player id.
    ///
    /// # Errors
    ///
    /// `Error::NotFound`, `Error::InvalidMatch`, `Error::LockTimeout`.
    pub fn get_standings(&self, fixture: &str) -> Result<Vec<Standing>, Error> {
        let fixture = self.store.fixture_by_name(fixture)?;
        let _guard = self.locks.shared(fixture.id)?;

        let snapshot = self.store.snapshot(fixture.id)?;
        let standings = standings::tally(&snapshot)?;
        Ok(tiebreak::rank(&snapshot, standings))
    }

    /// Pairs the next round.
    ///
    /// Pure with respect to storage: the bye it selects is not recorded
    /// here, the caller does that through [`Engine::record_bye`], so
    /// repeated calls over the same history give the same answer.
    ///
    /// # Errors
    ///
    /// `Error::IncompletePriorRound` while any player lacks a result for
    /// the round most recently played; also `Error::NotFound`,
    /// `Error::InvalidMatch`, `Error::LockTimeout`.
    pub fn generate_pairings(&self, fixture: &str) -> Result<PairingResult, Error> {
        let fixture = self.store.fixture_by_name(fixture)?;
        let _guard = self.locks.shared(fixture.id)?;

        let snapshot = self.store.snapshot(fixture.id)?;

        let last = snapshot.last_round();
        if last > 0 && !snapshot.is_round_complete(last) {
            return Err(Error::IncompletePriorRound {
                round: last,
                unresolved: snapshot.unresolved(last).len(),
            });
        }

        let standings = standings::tally(&snapshot)?;
        let ranking = tiebreak::rank(&snapshot, standings);
        let result = pairing::generate(
            &ranking,
            &snapshot.rematches(),
            &snapshot.players_with_bye(),
            last + 1,
        );

        debug!("fixture {}: {result}", fixture.name);
        Ok(result)
    }

    /// Records one completed match.
    ///
    /// The round number is the round currently being filled; it is never
    /// derived from arithmetic on the match count. Append-or-fail: on any
    /// error the history is untouched.
    ///
    /// # Errors
    ///
    /// `Error::InvalidMatch` when winner and loser are the same player,
    /// `Error::NotFound` when either is not registered in the fixture,
    /// `Error::DuplicateResult` when either already has a result in the
    /// open round, `Error::LockTimeout`.
    pub fn record_match(&self, winner: Id, loser: Id, fixture: &str) -> Result<MatchRecord, Error> {
        let fixture = self.store.fixture_by_name(fixture)?;
        let _guard = self.locks.exclusive(fixture.id)?;

        let snapshot = self.store.snapshot(fixture.id)?;

        if winner == loser {
            return Err(Error::InvalidMatch(format!(
                "player {winner} cannot play itself"
            )));
        }

        let round = open_round_with(&snapshot, &[winner, loser])?;
        let record = self.store.add_match(fixture.id, winner, loser, round)?;

        info!("fixture {}: {record}", fixture.name);
        Ok(record)
    }

    /// Credits a player the bye chosen by the pairing generator.
    ///
    /// # Errors
    ///
    /// `Error::NotFound`, `Error::DuplicateResult`, `Error::LockTimeout`.
    pub fn record_bye(&self, player: Id, fixture: &str) -> Result<Bye, Error> {
        let fixture = self.store.fixture_by_name(fixture)?;
        let _guard = self.locks.exclusive(fixture.id)?;

        let snapshot = self.store.snapshot(fixture.id)?;
        let round = open_round_with(&snapshot, &[player])?;
        let bye = self.store.add_bye(fixture.id, player, round)?;

        info!("fixture {}: {bye}", fixture.name);
        Ok(bye)
    }

    /// Clears a fixture's matches and byes, and optionally its players.
    ///
    /// # Errors
    ///
    /// `Error::NotFound`, `Error::LockTimeout`.
    pub fn reset_fixture(&self, fixture: &str, also_players: bool) -> Result<(), Error> {
        let fixture = self.store.fixture_by_name(fixture)?;
        let _guard = self.locks.exclusive(fixture.id)?;

        self.store.clear_results(fixture.id)?;
        if also_players {
            self.store.clear_players(fixture.id)?;
        }

        info!(
            "reset fixture {} (players cleared: {also_players})",
            fixture.name
        );
        Ok(())
    }
}

/// The round a new result belongs to, after checking that none of the
/// named players already has a result in it.
fn open_round_with(snapshot: &FixtureSnapshot, players: &[Id]) -> Result<u32, Error> {
    let registered = snapshot.player_ids();
    for player in players {
        if !registered.contains(player) {
            return Err(Error::NotFound(format!(
                "player {player} in fixture {}",
                snapshot.fixture.name
            )));
        }
    }

    let round = snapshot.open_round();
    for player in players {
        if snapshot.has_result(*player, round) {
            return Err(Error::DuplicateResult {
                player: *player,
                round,
            });
        }
    }

    Ok(round)
}

#[cfg(test)]
mod tests {
    use crate::store::MemoryStore;

    use super::*;

    fn engine_with_players(names: &[&str]) -> (Engine<MemoryStore>, Vec<Id>) {
        let engine = Engine::new(MemoryStore::new());
        engine.create_fixture("default").unwrap();

        let ids = names
            .iter()
            .map(|name| engine.register_player(name, "default").unwrap().id)
            .collect();
        (engine, ids)
    }

    #[test]
    fn a_fresh_fixture_pairs_in_id_order() {
        let (engine, ids) = engine_with_players(&["A", "B", "C", "D"]);

        let result = engine.generate_pairings("default").unwrap();
        assert_eq!(result.round, 1);
        assert_eq!(result.bye, None);
        assert_eq!(
            result
                .pairs
                .iter()
                .map(|pair| (pair.first, pair.second))
                .collect::<Vec<_>>(),
            vec![(ids[0], ids[1]), (ids[2], ids[3])]
        );
    }

    #[test]
    fn round_two_pairs_winners_together_without_rematches() {
        let (engine, ids) = engine_with_players(&["A", "B", "C", "D"]);
        let (a, b, c, d) = (ids[0], ids[1], ids[2], ids[3]);

        engine.record_match(a, b, "default").unwrap();
        engine.record_match(c, d, "default").unwrap();

        let standings = engine.get_standings("default").unwrap();
        assert_eq!(
            standings.iter().map(|s| s.player).collect::<Vec<_>>(),
            vec![a, c, b, d]
        );

        let result = engine.generate_pairings("default").unwrap();
        assert_eq!(result.round, 2);
        assert_eq!(
            result
                .pairs
                .iter()
                .map(|pair| (pair.first, pair.second))
                .collect::<Vec<_>>(),
            vec![(a, c), (b, d)]
        );
        assert!(result.pairs.iter().all(|pair| !pair.forced_rematch));
    }

    #[test]
    fn pairing_fails_while_the_prior_round_is_open() {
        let (engine, ids) = engine_with_players(&["A", "B", "C", "D"]);

        engine.record_match(ids[0], ids[1], "default").unwrap();

        assert!(matches!(
            engine.generate_pairings("default"),
            Err(Error::IncompletePriorRound {
                round: 1,
                unresolved: 2
            })
        ));
    }

    #[test]
    fn five_players_get_exactly_one_bye() {
        let (engine, ids) = engine_with_players(&["A", "B", "C", "D", "E"]);

        let round_one = engine.generate_pairings("default").unwrap();
        assert_eq!(round_one.pairs.len(), 2);
        assert_eq!(round_one.bye, Some(ids[4]));

        engine.record_match(ids[0], ids[1], "default").unwrap();
        engine.record_match(ids[2], ids[3], "default").unwrap();
        engine.record_bye(ids[4], "default").unwrap();

        // E already had the bye, so the next one goes to the lowest
        // ranked of the rest.
        let round_two = engine.generate_pairings("default").unwrap();
        assert_eq!(round_two.round, 2);
        let bye = round_two.bye.unwrap();
        assert_ne!(bye, ids[4]);
        assert!([ids[1], ids[3]].contains(&bye));
    }

    #[test]
    fn recording_the_same_player_twice_in_a_round_is_a_duplicate() {
        let (engine, ids) = engine_with_players(&["A", "B", "C", "D"]);

        engine.record_match(ids[0], ids[1], "default").unwrap();
        let before = engine.get_standings("default").unwrap();

        assert!(matches!(
            engine.record_match(ids[0], ids[2], "default"),
            Err(Error::DuplicateResult { round: 1, .. })
        ));
        assert!(matches!(
            engine.record_match(ids[1], ids[0], "default"),
            Err(Error::DuplicateResult { round: 1, .. })
        ));

        assert_eq!(engine.get_standings("default").unwrap(), before);
    }

    #[test]
    fn a_player_cannot_beat_itself() {
        let (engine, ids) = engine_with_players(&["A", "B"]);

        assert!(matches!(
            engine.record_match(ids[0], ids[0], "default"),
            Err(Error::InvalidMatch(_))
        ));
    }

    #[test]
    fn unknown_players_and_fixtures_are_not_found() {
        let (engine, ids) = engine_with_players(&["A", "B"]);

        assert!(matches!(
            engine.record_match(ids[0], 999, "default"),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            engine.get_standings("missing"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn generate_pairings_does_not_mutate_history() {
        let (engine, _ids) = engine_with_players(&["A", "B", "C", "D", "E"]);

        let first = engine.generate_pairings("default").unwrap();
        let second = engine.generate_pairings("default").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn reset_clears_results_and_optionally_players() {
        let (engine, ids) = engine_with_players(&["A", "B"]);
        engine.record_match(ids[0], ids[1], "default").unwrap();

        engine.reset_fixture("default", false).unwrap();
        let standings = engine.get_standings("default").unwrap();
        assert_eq!(standings.len(), 2);
        assert!(standings.iter().all(|s| s.matches == 0));

        engine.reset_fixture("default", true).unwrap();
        assert_eq!(engine.count_players("default").unwrap(), 0);
    }

    #[test]
    fn zero_players_pair_to_nothing() {
        let engine = Engine::new(MemoryStore::new());
        engine.create_fixture("default").unwrap();

        let result = engine.generate_pairings("default").unwrap();
        assert!(result.pairs.is_empty());
        assert_eq!(result.bye, None);

        assert!(engine.get_standings("default").unwrap().is_empty());
    }
}
