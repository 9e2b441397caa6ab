//! Drives the engine through a whole small tournament using only the
//! public API, the way an API or CLI collaborator would.

use std::collections::HashSet;

use swiss_rounds::{
    Id,
    engine::Engine,
    pairing::PairingResult,
    snapshot::rematch_key,
    store::{MemoryStore, Store},
};

const FIXTURE: &str = "club-open-2026";

fn check_covers_everyone(result: &PairingResult, players: &[Id]) {
    let mut seen: Vec<Id> = result
        .pairs
        .iter()
        .flat_map(|pair| [pair.first, pair.second])
        .chain(result.bye)
        .collect();
    seen.sort_unstable();

    let mut expected = players.to_vec();
    expected.sort_unstable();
    assert_eq!(seen, expected);
}

#[test]
fn an_eight_player_tournament_runs_three_rounds() {
    let engine = Engine::new(MemoryStore::new());
    engine.create_fixture(FIXTURE).unwrap();

    let names = [
        "Astrid", "Birger", "Canute", "Dagny", "Eirik", "Freya", "Gorm", "Hilde",
    ];
    let players: Vec<Id> = names
        .iter()
        .map(|name| engine.register_player(name, FIXTURE).unwrap().id)
        .collect();
    assert_eq!(engine.count_players(FIXTURE).unwrap(), 8);

    let mut seen_pairs: HashSet<(Id, Id)> = HashSet::new();

    for round in 1..=3 {
        let pairing = engine.generate_pairings(FIXTURE).unwrap();
        assert_eq!(pairing.round, round);
        assert_eq!(pairing.bye, None);
        check_covers_everyone(&pairing, &players);

        for pair in &pairing.pairs {
            // With 8 players and 3 rounds no rematch is ever necessary.
            assert!(!pair.forced_rematch);
            assert!(seen_pairs.insert(rematch_key(pair.first, pair.second)));

            // The higher-ranked player wins every table.
            engine.record_match(pair.first, pair.second, FIXTURE).unwrap();
        }
    }

    let standings = engine.get_standings(FIXTURE).unwrap();
    assert_eq!(standings.len(), 8);

    let wins: u32 = standings.iter().map(|s| s.wins).sum();
    let losses: u32 = standings.iter().map(|s| s.losses).sum();
    assert_eq!(wins, 12);
    assert_eq!(losses, 12);
    assert!(standings.iter().all(|s| s.matches == 3));

    // With the top seed winning throughout, Astrid is undefeated.
    assert_eq!(standings[0].player, players[0]);
    assert_eq!(standings[0].wins, 3);

    // The ranking never decreases in wins as we walk down.
    for window in standings.windows(2) {
        assert!(window[0].wins >= window[1].wins);
    }
}

#[test]
fn an_odd_tournament_rotates_the_bye() {
    let engine = Engine::new(MemoryStore::new());
    engine.create_fixture(FIXTURE).unwrap();

    let players: Vec<Id> = ["Astrid", "Birger", "Canute", "Dagny", "Eirik"]
        .iter()
        .map(|name| engine.register_player(name, FIXTURE).unwrap().id)
        .collect();

    let mut byes = Vec::new();

    for round in 1..=3 {
        let pairing = engine.generate_pairings(FIXTURE).unwrap();
        assert_eq!(pairing.round, round);
        check_covers_everyone(&pairing, &players);

        let bye = pairing.bye.unwrap();
        assert!(!byes.contains(&bye), "player {bye} got a second bye early");
        byes.push(bye);
        engine.record_bye(bye, FIXTURE).unwrap();

        for pair in &pairing.pairs {
            engine.record_match(pair.first, pair.second, FIXTURE).unwrap();
        }
    }

    let snapshot = engine.store().snapshot(
        engine.store().fixture_by_name(FIXTURE).unwrap().id,
    )
    .unwrap();
    assert_eq!(snapshot.byes.len(), 3);
    assert_eq!(snapshot.matches.len(), 6);
}
