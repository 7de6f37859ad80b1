use std::collections::HashSet;

use rand::{
    distributions::{Distribution, WeightedIndex},
    Rng,
};

use crate::{
    error::{AppError, AppResult},
    models::Movie,
};

/// Draws `count` movies with distinct names from a weighted population
///
/// Each draw picks one population entry with probability proportional to its
/// weight among the entries whose name has not been chosen yet, which is what
/// rejecting and redrawing already-chosen names converges to. Output is in draw
/// order. Fails up front when fewer than `count` distinct names carry weight.
pub fn draw_distinct<R: Rng + ?Sized>(
    population: &[Movie],
    weights: &[f64],
    count: usize,
    rng: &mut R,
) -> AppResult<Vec<Movie>> {
    if population.len() != weights.len() {
        return Err(AppError::Internal(format!(
            "{} weights for a population of {}",
            weights.len(),
            population.len()
        )));
    }

    let available = population
        .iter()
        .zip(weights)
        .filter(|(_, w)| **w > 0.0)
        .map(|(movie, _)| movie.name.as_str())
        .collect::<HashSet<_>>()
        .len();
    if available < count {
        return Err(AppError::InsufficientPopulation {
            requested: count,
            available,
        });
    }

    let mut remaining = weights.to_vec();
    let mut chosen: Vec<Movie> = Vec::with_capacity(count);

    while chosen.len() < count {
        let index = WeightedIndex::new(&remaining)
            .map_err(|e| AppError::Internal(format!("invalid weights: {}", e)))?
            .sample(rng);
        let movie = population[index].clone();

        for (entry, weight) in population.iter().zip(remaining.iter_mut()) {
            if entry.name == movie.name {
                *weight = 0.0;
            }
        }

        tracing::debug!(movie = %movie.name, draw = chosen.len() + 1, "Movie drawn");
        chosen.push(movie);
    }

    Ok(chosen)
}
