use crate::{
    error::{AppError, AppResult},
    models::{Movie, Person, ProbabilityAssignment},
    services::filters::skip_votes,
};

/// Builds selection weights for a population of `population_size` entries
///
/// The result has one non-negative weight per population index and sums to 1.
/// Decaying schedules give index 0 the largest weight.
pub fn build_distribution(
    population_size: usize,
    assignment: ProbabilityAssignment,
    decay_ratio: f64,
) -> AppResult<Vec<f64>> {
    if population_size == 0 {
        return Err(AppError::EmptyPopulation);
    }

    let weights = match assignment {
        ProbabilityAssignment::Constant => constant(population_size),
        ProbabilityAssignment::LinearDecay => linear_decay(population_size),
        ProbabilityAssignment::ExponentialDecay => exponential_decay(population_size, decay_ratio)?,
    };

    tracing::debug!(
        population_size,
        assignment = ?assignment,
        "Distribution built"
    );

    Ok(weights)
}

fn constant(n: usize) -> Vec<f64> {
    let p = 1.0 / n as f64;
    vec![p; n]
}

/// Weights `n/S, (n-1)/S, ..., 1/S` with `S = n(n+1)/2`
fn linear_decay(n: usize) -> Vec<f64> {
    let total = (n * (n + 1)) as f64 / 2.0;
    (1..=n).rev().map(|rank| rank as f64 / total).collect()
}

/// Weights proportional to `ratio^i`
fn exponential_decay(n: usize, ratio: f64) -> AppResult<Vec<f64>> {
    if !(ratio > 0.0 && ratio <= 1.0) {
        return Err(AppError::InvalidInput(format!(
            "decay ratio must be in (0, 1], got {}",
            ratio
        )));
    }

    let raw: Vec<f64> = (0..n).map(|i| ratio.powi(i as i32)).collect();
    Ok(normalize(raw))
}

/// Scales each entry's weight by `penalty^skips` and renormalizes
///
/// `skips` is the number of active people who want to skip that entry's movie.
pub fn apply_skip_penalty(
    weights: &[f64],
    population: &[Movie],
    people: &[Person],
    penalty: f64,
) -> AppResult<Vec<f64>> {
    if !(penalty > 0.0 && penalty <= 1.0) {
        return Err(AppError::InvalidInput(format!(
            "skip penalty must be in (0, 1], got {}",
            penalty
        )));
    }
    if weights.len() != population.len() {
        return Err(AppError::Internal(format!(
            "{} weights for a population of {}",
            weights.len(),
            population.len()
        )));
    }

    let raw: Vec<f64> = weights
        .iter()
        .zip(population)
        .map(|(weight, movie)| weight * penalty.powi(skip_votes(movie, people) as i32))
        .collect();

    Ok(normalize(raw))
}

fn normalize(raw: Vec<f64>) -> Vec<f64> {
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / total).collect()
}
