use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The two card categories the simulator tracks.
/// Every non-land card collapses into `Spell`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Land,
    Spell,
}

impl CardKind {
    pub fn is_land(&self) -> bool {
        matches!(self, CardKind::Land)
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardKind::Land => write!(f, "Land"),
            CardKind::Spell => write!(f, "Spell"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown card kind '{0}' (expected Land or Spell)")]
pub struct ParseCardKindError(pub String);

impl FromStr for CardKind {
    type Err = ParseCardKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "land" | "lands" => Ok(CardKind::Land),
            "spell" | "spells" => Ok(CardKind::Spell),
            _ => Err(ParseCardKindError(s.trim().to_string())),
        }
    }
}
