//! Command-line front end for the Swiss-rounds engine.
//!
//! State lives in a single RON file in the platform data directory (or
//! wherever `--store` points). Every subcommand loads the store, runs one
//! engine operation, and writes the store back.

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

mod command_line;

use clap::Parser;

use swiss_rounds::{engine::Engine, store::MemoryStore, utils};

use crate::command_line::{Args, Command};

const STORE_FILE: &str = "fixtures.ron";

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    utils::init_logger(args.debug, args.systemd);

    if args.man {
        return Args::generate_man_page();
    }

    let Some(command) = args.command else {
        return Err(anyhow::Error::msg(
            "no subcommand given, try --help for the list",
        ));
    };

    let path = match args.store {
        Some(path) => path,
        None => utils::data_file(STORE_FILE)?,
    };

    let engine = Engine::new(MemoryStore::load(&path)?);
    run(&engine, command)?;
    engine.store().save(&path)?;

    Ok(())
}

fn run(engine: &Engine<MemoryStore>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::CreateFixture { name } => {
            let fixture = engine.create_fixture(&name)?;
            println!("created fixture {fixture}");
        }
        Command::DeleteFixture { name } => {
            engine.delete_fixture(&name)?;
            println!("deleted fixture {name}");
        }
        Command::Register { name, fixture } => {
            let player = engine.register_player(&name, &fixture)?;
            println!("registered {player} in {fixture}");
        }
        Command::Count { fixture } => {
            println!("{}", engine.count_players(&fixture)?);
        }
        Command::Report {
            winner,
            loser,
            fixture,
        } => {
            let record = engine.record_match(winner, loser, &fixture)?;
            println!("{record}");
        }
        Command::Bye { player, fixture } => {
            let bye = engine.record_bye(player, &fixture)?;
            println!("{bye}");
        }
        Command::Standings { fixture } => {
            println!(
                "{:>6} {:<24} {:>4} {:>6} {:>7} {:>4} {:>4}",
                "id", "name", "wins", "losses", "matches", "byes", "sos"
            );
            for standing in engine.get_standings(&fixture)? {
                println!(
                    "{:>6} {:<24} {:>4} {:>6} {:>7} {:>4} {:>4}",
                    standing.player,
                    standing.name,
                    standing.wins,
                    standing.losses,
                    standing.matches,
                    standing.byes,
                    standing.opponent_wins
                );
            }
        }
        Command::Pair {
            commit_bye,
            fixture,
        } => {
            let result = engine.generate_pairings(&fixture)?;
            println!("{result}");

            if commit_bye && let Some(player) = result.bye {
                engine.record_bye(player, &fixture)?;
            }
        }
        Command::Reset { players, fixture } => {
            engine.reset_fixture(&fixture, players)?;
            println!("reset {fixture}");
        }
    }

    Ok(())
}
