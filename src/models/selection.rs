use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Movie;

/// How movies somebody wants to skip are treated
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FilteringStrategy {
    /// Drop the movie if any active person skips it
    #[default]
    Remove,
    /// Keep the movie but scale its weight down per skip
    LowerProba,
}

/// Shape of the weight schedule over the population
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProbabilityAssignment {
    Constant,
    #[default]
    LinearDecay,
    ExponentialDecay,
}

fn default_true() -> bool {
    true
}

/// Parameters of one selection run
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SelectionRequest {
    /// Falls back to the configured default when absent
    #[serde(default)]
    pub num_movies: Option<usize>,
    /// `None` keeps every person in the sheet
    #[serde(default)]
    pub participants: Option<Vec<String>>,
    #[serde(default)]
    pub remote_sheet_url: Option<String>,
    #[serde(default = "default_true")]
    pub filter_already_seen: bool,
    #[serde(default)]
    pub filtering_strategy: FilteringStrategy,
    #[serde(default)]
    pub ignore_highpriority_pref: bool,
    #[serde(default)]
    pub probability_assignment: ProbabilityAssignment,
}

impl Default for SelectionRequest {
    fn default() -> Self {
        Self {
            num_movies: None,
            participants: None,
            remote_sheet_url: None,
            filter_already_seen: true,
            filtering_strategy: FilteringStrategy::default(),
            ignore_highpriority_pref: false,
            probability_assignment: ProbabilityAssignment::default(),
        }
    }
}

/// Outcome of a selection run, movies in draw order
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub movies: Vec<Movie>,
    pub participants: Vec<String>,
    pub population_size: usize,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedMovie {
    pub rank: usize,
    pub name: String,
}

/// Ranked list handed to whoever presents the result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectionResponse {
    pub movies: Vec<RankedMovie>,
    pub participants: Vec<String>,
    pub population_size: usize,
    pub generated_at: DateTime<Utc>,
}

impl From<Selection> for SelectionResponse {
    fn from(selection: Selection) -> Self {
        let movies = selection
            .movies
            .into_iter()
            .enumerate()
            .map(|(i, movie)| RankedMovie {
                rank: i + 1,
                name: movie.name,
            })
            .collect();

        Self {
            movies,
            participants: selection.participants,
            population_size: selection.population_size,
            generated_at: selection.generated_at,
        }
    }
}
