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

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use swiss_rounds::{DEFAULT_FIXTURE, Id};

/// Swiss Rounds
///
/// Manage Swiss-system tournament fixtures from the command line.
#[derive(Parser, Debug)]
#[command(version, about = "Swiss-system tournament fixtures")]
pub(crate) struct Args {
    /// Whether to log on the debug level
    #[arg(long)]
    pub debug: bool,

    /// Whether the application is being run by systemd
    #[arg(long)]
    pub systemd: bool,

    /// Store file to use instead of the one in the data directory
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Build the manpage
    #[arg(long)]
    pub man: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Create a new fixture
    CreateFixture { name: String },

    /// Delete a fixture and everything it owns
    DeleteFixture { name: String },

    /// Register a player in a fixture
    Register {
        name: String,

        #[arg(long, default_value = DEFAULT_FIXTURE)]
        fixture: String,
    },

    /// Count the players registered in a fixture
    Count {
        #[arg(long, default_value = DEFAULT_FIXTURE)]
        fixture: String,
    },

    /// Report a completed match by the winner's and loser's player ids
    Report {
        winner: Id,
        loser: Id,

        #[arg(long, default_value = DEFAULT_FIXTURE)]
        fixture: String,
    },

    /// Credit a player the bye for the round being filled
    Bye {
        player: Id,

        #[arg(long, default_value = DEFAULT_FIXTURE)]
        fixture: String,
    },

    /// Print the standings table
    Standings {
        #[arg(long, default_value = DEFAULT_FIXTURE)]
        fixture: String,
    },

    /// Generate the next round's pairings
    Pair {
        /// Record the generated bye immediately
        #[arg(long)]
        commit_bye: bool,

        #[arg(long, default_value = DEFAULT_FIXTURE)]
        fixture: String,
    },

    /// Clear a fixture's matches and byes
    Reset {
        /// Also remove the fixture's players
        #[arg(long)]
        players: bool,

        #[arg(long, default_value = DEFAULT_FIXTURE)]
        fixture: String,
    },
}

impl Args {
    pub(crate) fn generate_man_page() -> anyhow::Result<()> {
        let mut buffer: Vec<u8> = Vec::default();
        let cmd = Self::command().name("swiss-rounds-cli");
        let man = clap_mangen::Man::new(cmd);

        man.render(&mut buffer)?;

        std::fs::write("swiss-rounds-cli.1", buffer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_parses_ids_and_fixture() {
        let args = Args::parse_from([
            "swiss-rounds-cli",
            "report",
            "3",
            "4",
            "--fixture",
            "grandslam-2026",
        ]);

        match args.command {
            Some(Command::Report {
                winner,
                loser,
                fixture,
            }) => {
                assert_eq!(winner, 3);
                assert_eq!(loser, 4);
                assert_eq!(fixture, "grandslam-2026");
            }
            other => panic!("parsed {other:?}"),
        }
    }

    #[test]
    fn the_fixture_defaults() {
        let args = Args::parse_from(["swiss-rounds-cli", "standings"]);

        match args.command {
            Some(Command::Standings { fixture }) => assert_eq!(fixture, DEFAULT_FIXTURE),
            other => panic!("parsed {other:?}"),
        }
    }
}
