use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Id;

/// One isolated tournament instance with its own players and matches.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Fixture {
    pub id: Id,
    pub name: String,
}

impl fmt::Display for Fixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.name)
    }
}
