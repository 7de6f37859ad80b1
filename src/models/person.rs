use serde::Serialize;
use std::collections::HashMap;

use crate::error::{AppError, AppResult};

use super::{Movie, MoviePreference};

/// A person's resolved preference for every movie of one sheet
///
/// Built only through [`Preferences::new`], which rejects a mapping that misses
/// an ingested movie or names one that was never ingested. Defaults are resolved
/// before construction, so lookups never fall back to anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preferences {
    entries: HashMap<String, MoviePreference>,
}

impl Preferences {
    /// Validates `entries` against the ingested movie set
    pub fn new(movies: &[Movie], entries: HashMap<String, MoviePreference>) -> AppResult<Self> {
        if let Some(missing) = movies.iter().find(|m| !entries.contains_key(&m.name)) {
            return Err(AppError::MalformedRecord(format!(
                "no preference recorded for movie {:?}",
                missing.name
            )));
        }

        if entries.len() != movies.len() {
            let unknown = entries
                .keys()
                .find(|name| !movies.iter().any(|m| &m.name == *name))
                .cloned()
                .unwrap_or_default();
            return Err(AppError::MalformedRecord(format!(
                "preference recorded for unknown movie {:?}",
                unknown
            )));
        }

        Ok(Self { entries })
    }

    /// Looks up the preference for a movie by name
    pub fn get(&self, movie_name: &str) -> Option<MoviePreference> {
        self.entries.get(movie_name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Movie names this person marked with `preference`
    pub fn movies_with(&self, preference: MoviePreference) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, p)| **p == preference)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// A participant read from one sheet column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    pub name: String,
    pub preferences: Preferences,
}

impl Person {
    pub fn new(name: impl Into<String>, preferences: Preferences) -> Self {
        Self {
            name: name.into(),
            preferences,
        }
    }

    /// Whether this person gave `movie` the given preference
    pub fn prefers(&self, movie: &Movie, preference: MoviePreference) -> bool {
        self.preferences.get(&movie.name) == Some(preference)
    }
}
