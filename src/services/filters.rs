//! Population filter stages
//!
//! Each stage takes its input by value or reference and returns a new
//! materialized list; nothing is shared between stages, so they can be
//! reordered or tested alone.

use std::collections::HashSet;

use crate::models::{Movie, MoviePreference, MovieState, Person};

/// Keeps only people named in `participants`, in sheet order
///
/// `None` keeps everyone. Names that match nobody are logged and ignored.
pub fn filter_participants(people: Vec<Person>, participants: Option<&[String]>) -> Vec<Person> {
    let Some(participants) = participants else {
        return people;
    };

    let allowed: HashSet<&str> = participants.iter().map(String::as_str).collect();
    for name in &allowed {
        if !people.iter().any(|p| p.name == *name) {
            tracing::warn!(participant = %name, "Participant not found in sheet");
        }
    }

    people
        .into_iter()
        .filter(|person| allowed.contains(person.name.as_str()))
        .collect()
}

/// Drops movies the group has already seen
pub fn filter_seen(movies: Vec<Movie>) -> Vec<Movie> {
    movies
        .into_iter()
        .filter(|movie| movie.state != MovieState::Seen)
        .collect()
}

/// Drops every movie that at least one active person wants to skip
pub fn filter_unwanted(movies: Vec<Movie>, people: &[Person]) -> Vec<Movie> {
    movies
        .into_iter()
        .filter(|movie| skip_votes(movie, people) == 0)
        .collect()
}

/// Number of active people who want to skip `movie`
pub fn skip_votes(movie: &Movie, people: &[Person]) -> usize {
    people
        .iter()
        .filter(|person| person.prefers(movie, MoviePreference::Skip))
        .count()
}

/// Adds `copies - 1` extra entries of a movie for every PriorityWatch vote
///
/// The extra copies come right before the original entry, so the population
/// keeps movies grouped in input order.
pub fn duplicate_priority(movies: Vec<Movie>, people: &[Person], copies: usize) -> Vec<Movie> {
    let extra = copies.saturating_sub(1);
    let mut population = Vec::with_capacity(movies.len());

    for movie in movies {
        let votes = people
            .iter()
            .filter(|person| person.prefers(&movie, MoviePreference::PriorityWatch))
            .count();
        for _ in 0..votes * extra {
            population.push(movie.clone());
        }
        population.push(movie);
    }

    population
}
