use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

pub mod person;
pub mod selection;

pub use person::{Person, Preferences};
pub use selection::{
    FilteringStrategy, ProbabilityAssignment, RankedMovie, Selection, SelectionRequest,
    SelectionResponse,
};

/// Whether the group has already watched a movie
///
/// The sheet encodes this as an integer: `0` is Seen and `1` is NotSeen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovieState {
    Seen,
    NotSeen,
}

impl TryFrom<i64> for MovieState {
    type Error = AppError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(MovieState::Seen),
            1 => Ok(MovieState::NotSeen),
            other => Err(AppError::MalformedRecord(format!(
                "unknown movie state code {}",
                other
            ))),
        }
    }
}

impl FromStr for MovieState {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code: i64 = s.trim().parse().map_err(|_| {
            AppError::MalformedRecord(format!("movie state {:?} is not an integer", s))
        })?;
        MovieState::try_from(code)
    }
}

/// One person's wish for one movie, parsed from a single-character sheet code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoviePreference {
    /// `0`: do not want to watch
    Skip,
    /// `1`: fine with watching
    Watch,
    /// `*`: really want to watch
    PriorityWatch,
}

impl MoviePreference {
    /// The sheet code for this preference
    pub fn code(&self) -> &'static str {
        match self {
            MoviePreference::Skip => "0",
            MoviePreference::Watch => "1",
            MoviePreference::PriorityWatch => "*",
        }
    }
}

impl FromStr for MoviePreference {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(MoviePreference::Skip),
            "1" => Ok(MoviePreference::Watch),
            "*" => Ok(MoviePreference::PriorityWatch),
            other => Err(AppError::MalformedRecord(format!(
                "unknown preference code {:?}",
                other
            ))),
        }
    }
}

impl Display for MoviePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A movie candidate read from one sheet row
///
/// Priority duplication produces value-equal clones; the name stays the identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub name: String,
    pub state: MovieState,
}

impl Movie {
    pub fn new(name: impl Into<String>, state: MovieState) -> Self {
        Self {
            name: name.into(),
            state,
        }
    }
}

impl Display for Movie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
