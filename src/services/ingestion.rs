//! Sheet ingestion
//!
//! Turns the CSV export of the shared preference sheet into typed movies and
//! people. Layout of the sheet:
//!
//! ```text
//!            | (state) | Alice | Bob | ...
//! Matrix     | 1       | 1     | *   |
//! Up         | 0       | 1     | 1   |
//! ```
//!
//! Column 0 holds the movie name and column 1 the seen flag (`0` Seen, `1`
//! NotSeen). Every non-blank header cell from column 2 onward is a person.

use std::collections::{HashMap, HashSet};

use csv::{ReaderBuilder, StringRecord};

use crate::{
    config::IngestionConfig,
    error::{AppError, AppResult},
    models::{Movie, MoviePreference, MovieState, Person, Preferences},
};

const NAME_COLUMN: usize = 0;
const STATE_COLUMN: usize = 1;
const FIRST_PERSON_COLUMN: usize = 2;

/// Parses sheet CSV text into `(movies, people)`, both in sheet order
///
/// Blank preference cells resolve to `config.default_preference`. Once a movie
/// has collected `config.highpriority_limit` PriorityWatch votes, later votes
/// for it (in column order) are recorded as Watch.
pub fn parse_sheet(text: &str, config: &IngestionConfig) -> AppResult<(Vec<Movie>, Vec<Person>)> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut records = reader.records();

    let header = records
        .next()
        .ok_or_else(|| AppError::MalformedRecord("sheet has no header row".to_string()))??;
    let person_columns = person_columns(&header)?;

    let mut entries: Vec<HashMap<String, MoviePreference>> =
        vec![HashMap::new(); person_columns.len()];
    let mut movies: Vec<Movie> = Vec::new();
    let mut movie_names: HashSet<String> = HashSet::new();
    let mut clamped_votes = 0usize;

    for (index, record) in records.enumerate() {
        let record = record?;
        // 1-based, header is row 1
        let row = index + 2;

        let name = record.get(NAME_COLUMN).unwrap_or("").trim();
        if name.is_empty() {
            if config.stop_at_first_empty {
                tracing::debug!(row, "Blank movie name, stopping ingestion");
                break;
            }
            continue;
        }

        let state = record
            .get(STATE_COLUMN)
            .ok_or_else(|| AppError::MalformedRecord("missing state column".to_string()))
            .and_then(str::parse::<MovieState>)
            .map_err(|e| at_row(row, e))?;

        if !movie_names.insert(name.to_string()) {
            return Err(at_row(
                row,
                AppError::MalformedRecord(format!("duplicate movie {:?}", name)),
            ));
        }

        let mut priority_votes = 0usize;
        for (person_index, (column, person)) in person_columns.iter().enumerate() {
            let cell = record.get(*column).unwrap_or("").trim();
            let mut preference = if cell.is_empty() {
                config.default_preference
            } else {
                cell.parse::<MoviePreference>().map_err(|e| at_row(row, e))?
            };

            if preference == MoviePreference::PriorityWatch {
                if priority_votes >= config.highpriority_limit {
                    tracing::debug!(
                        movie = %name,
                        person = %person,
                        limit = config.highpriority_limit,
                        "PriorityWatch limit reached, recording Watch"
                    );
                    preference = MoviePreference::Watch;
                    clamped_votes += 1;
                } else {
                    priority_votes += 1;
                }
            }

            entries[person_index].insert(name.to_string(), preference);
        }

        movies.push(Movie::new(name, state));
    }

    let people = person_columns
        .into_iter()
        .zip(entries)
        .map(|((_, name), prefs)| Preferences::new(&movies, prefs).map(|p| Person::new(name, p)))
        .collect::<AppResult<Vec<_>>>()?;

    tracing::info!(
        movies = movies.len(),
        people = people.len(),
        clamped_votes,
        "Sheet ingested"
    );

    Ok((movies, people))
}

/// Column index and name of every person in the header row
fn person_columns(header: &StringRecord) -> AppResult<Vec<(usize, String)>> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();

    for (column, cell) in header.iter().enumerate().skip(FIRST_PERSON_COLUMN) {
        let name = cell.trim();
        if name.is_empty() {
            continue;
        }
        if !seen.insert(name.to_string()) {
            return Err(AppError::MalformedRecord(format!(
                "duplicate person {:?} in header",
                name
            )));
        }
        columns.push((column, name.to_string()));
    }

    Ok(columns)
}

fn at_row(row: usize, err: AppError) -> AppError {
    match err {
        AppError::MalformedRecord(msg) => AppError::MalformedRecord(format!("row {}: {}", row, msg)),
        other => other,
    }
}
