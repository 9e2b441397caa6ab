use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Id;

/// A tournament participant.
///
/// A player belongs to exactly one fixture for its lifetime. The display
/// name need not be unique; the id is.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Player {
    pub id: Id,
    pub name: String,
    pub fixture: Id,
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.name)
    }
}
