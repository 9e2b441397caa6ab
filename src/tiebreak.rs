use std::collections::HashMap;

use crate::{Id, snapshot::FixtureSnapshot, standings::Standing};

/// Orders standings into the ranking the pairing generator consumes.
///
/// Primary key: wins, descending. Secondary: strength of schedule (the
/// summed wins of every opponent faced), descending, so beating strong
/// opponents ranks higher. Tertiary: player id, ascending, which makes
/// the order total and reproducible. Players equal on the first two keys
/// end up adjacent, which is what pairing relies on.
#[must_use]
pub fn rank(snapshot: &FixtureSnapshot, mut standings: Vec<Standing>) -> Vec<Standing> {
    let wins: HashMap<Id, u32> = standings
        .iter()
        .map(|standing| (standing.player, standing.wins))
        .collect();

    let mut opponents: HashMap<Id, Vec<Id>> = HashMap::new();
    for record in &snapshot.matches {
        opponents.entry(record.winner).or_default().push(record.loser);
        opponents.entry(record.loser).or_default().push(record.winner);
    }

    for standing in &mut standings {
        standing.opponent_wins = opponents
            .get(&standing.player)
            .map(|faced| {
                faced
                    .iter()
                    .map(|opponent| wins.get(opponent).copied().unwrap_or(0))
                    .sum()
            })
            .unwrap_or(0);
    }

    standings.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then(b.opponent_wins.cmp(&a.opponent_wins))
            .then(a.player.cmp(&b.player))
    });

    standings
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::{
        fixture::Fixture,
        match_record::MatchRecord,
        player::Player,
        standings::tally,
    };

    use super::*;

    fn snapshot(players: usize, results: &[(Id, Id)]) -> FixtureSnapshot {
        FixtureSnapshot {
            fixture: Fixture {
                id: 1,
                name: "default".to_string(),
            },
            players: (1..=players as Id)
                .map(|id| Player {
                    id,
                    name: format!("player {id}"),
                    fixture: 1,
                })
                .collect(),
            matches: results
                .iter()
                .enumerate()
                .map(|(i, (winner, loser))| MatchRecord {
                    id: i as Id + 1,
                    winner: *winner,
                    loser: *loser,
                    round: 1,
                    fixture: 1,
                    recorded: Utc::now(),
                })
                .collect(),
            byes: Vec::new(),
        }
    }

    fn order(snapshot: &FixtureSnapshot) -> Vec<Id> {
        let standings = tally(snapshot).unwrap();
        rank(snapshot, standings)
            .iter()
            .map(|standing| standing.player)
            .collect()
    }

    #[test]
    fn winners_rank_above_losers() {
        let snapshot = snapshot(4, &[(1, 2), (3, 4)]);
        assert_eq!(order(&snapshot), vec![1, 3, 2, 4]);
    }

    #[test]
    fn ties_fall_back_to_player_id() {
        let snapshot = snapshot(4, &[]);
        assert_eq!(order(&snapshot), vec![1, 2, 3, 4]);
    }

    #[test]
    fn strength_of_schedule_breaks_win_ties() {
        // 1 and 3 both have one win, but 3 beat the stronger opponent:
        // 4 went on to win a match, 2 did not.
        let snapshot = snapshot(5, &[(1, 2), (3, 4), (4, 5)]);
        let ranked = order(&snapshot);
        let one = ranked.iter().position(|id| *id == 1).unwrap();
        let three = ranked.iter().position(|id| *id == 3).unwrap();
        assert!(three < one);
    }

    #[test]
    fn ranking_is_deterministic() {
        let snapshot = snapshot(8, &[(1, 2), (3, 4), (5, 6), (7, 8)]);
        assert_eq!(order(&snapshot), order(&snapshot));
    }
}
