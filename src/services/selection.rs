use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rand::Rng;

use crate::{
    config::PipelineConfig,
    error::{AppError, AppResult},
    models::{FilteringStrategy, Movie, Person, Selection, SelectionRequest},
    services::{
        distribution::{apply_skip_penalty, build_distribution},
        filters::{duplicate_priority, filter_participants, filter_seen, filter_unwanted},
        ingestion::parse_sheet,
        providers::SheetProvider,
        sampler::draw_distinct,
    },
};

/// Picks tonight's movies from the shared preference sheet
///
/// Every call fetches and parses the sheet again; nothing is kept between runs.
pub struct MovieNightService {
    provider: Arc<dyn SheetProvider>,
    config: PipelineConfig,
}

impl MovieNightService {
    pub fn new(provider: Arc<dyn SheetProvider>, config: PipelineConfig) -> Self {
        Self { provider, config }
    }

    /// Runs the whole selection pipeline with a thread-local RNG
    pub async fn select(&self, request: SelectionRequest) -> AppResult<Selection> {
        let (movies, people) = self.load(request.remote_sheet_url.as_deref()).await?;
        let mut rng = rand::thread_rng();
        self.select_from(movies, people, &request, &mut rng)
    }

    /// Person names in sheet column order
    pub async fn list_people(&self, sheet_url: Option<&str>) -> AppResult<Vec<String>> {
        let (_, people) = self.load(sheet_url).await?;
        Ok(people.into_iter().map(|p| p.name).collect())
    }

    /// Fetches and ingests the sheet
    async fn load(&self, sheet_url: Option<&str>) -> AppResult<(Vec<Movie>, Vec<Person>)> {
        let url = sheet_url
            .or(self.config.default_sheet_url.as_deref())
            .ok_or_else(|| {
                AppError::UnsupportedStrategy(
                    "no remote sheet url given and no other data source is available".to_string(),
                )
            })?;

        tracing::debug!(url = %url, provider = self.provider.name(), "Loading sheet");
        let text = self.provider.fetch_csv(url).await?;
        parse_sheet(&text, &self.config.ingestion)
    }

    /// Filters, weights and samples an already ingested sheet
    pub fn select_from<R: Rng + ?Sized>(
        &self,
        movies: Vec<Movie>,
        people: Vec<Person>,
        request: &SelectionRequest,
        rng: &mut R,
    ) -> AppResult<Selection> {
        let start = Instant::now();

        let num_movies = request.num_movies.unwrap_or(self.config.default_num_movies);
        if num_movies == 0 {
            return Err(AppError::InvalidInput(
                "num_movies must be at least 1".to_string(),
            ));
        }

        let people = filter_participants(people, request.participants.as_deref());
        let population = self.prepare_population(movies, &people, request);
        tracing::info!(
            participants = people.len(),
            population_size = population.len(),
            "Movie population prepared"
        );

        if population.is_empty() {
            return Err(AppError::InsufficientPopulation {
                requested: num_movies,
                available: 0,
            });
        }

        let mut weights = build_distribution(
            population.len(),
            request.probability_assignment,
            self.config.decay_ratio,
        )?;
        if request.filtering_strategy == FilteringStrategy::LowerProba {
            weights = apply_skip_penalty(&weights, &population, &people, self.config.skip_penalty)?;
        }

        let chosen = draw_distinct(&population, &weights, num_movies, rng)?;

        tracing::info!(
            chosen = ?chosen.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
            processing_time_ms = start.elapsed().as_millis(),
            "Movies selected"
        );

        Ok(Selection {
            movies: chosen,
            participants: people.into_iter().map(|p| p.name).collect(),
            population_size: population.len(),
            generated_at: Utc::now(),
        })
    }

    /// seen filter -> unwanted filter -> priority duplication
    fn prepare_population(
        &self,
        mut movies: Vec<Movie>,
        people: &[Person],
        request: &SelectionRequest,
    ) -> Vec<Movie> {
        if request.filter_already_seen {
            movies = filter_seen(movies);
        }

        if request.filtering_strategy == FilteringStrategy::Remove {
            movies = filter_unwanted(movies, people);
        }

        if !request.ignore_highpriority_pref {
            movies = duplicate_priority(movies, people, self.config.priority_copies);
        }

        movies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MovieState, ProbabilityAssignment};
    use crate::services::providers::MockSheetProvider;
    use mockall::predicate::eq;
    use rand::{rngs::StdRng, SeedableRng};

    const SHEET: &str = "\"\",\"\",\"Alice\",\"Bob\"\n\"Matrix\",\"1\",\"1\",\"*\"\n\"Up\",\"0\",\"1\",\"1\"\n";

    const WIDER_SHEET: &str = "\
n,s,Alice,Bob,Carol
Matrix,1,*,1,1
Up,0,1,1,1
Alien,1,0,1,1
Heat,1,1,1,1
Ran,1,1,*,1
";

    fn service_with(sheet: &'static str) -> MovieNightService {
        let mut provider = MockSheetProvider::new();
        provider
            .expect_fetch_csv()
            .returning(move |_| Ok(sheet.to_string()));
        provider.expect_name().return_const("mock");
        let config = PipelineConfig {
            default_sheet_url: Some("http://sheet.local/export".to_string()),
            ..PipelineConfig::default()
        };
        MovieNightService::new(Arc::new(provider), config)
    }

    fn ingest(sheet: &str) -> (Vec<Movie>, Vec<Person>) {
        parse_sheet(sheet, &PipelineConfig::default().ingestion).unwrap()
    }

    fn names(selection: &Selection) -> Vec<&str> {
        selection.movies.iter().map(|m| m.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_select_single_eligible_movie() {
        let service = service_with(SHEET);
        let request = SelectionRequest {
            num_movies: Some(1),
            ..SelectionRequest::default()
        };

        let selection = service.select(request).await.unwrap();

        assert_eq!(selection.movies, vec![Movie::new("Matrix", MovieState::NotSeen)]);
        assert_eq!(selection.population_size, 3);
        assert_eq!(selection.participants, vec!["Alice", "Bob"]);
    }

    #[tokio::test]
    async fn test_select_more_than_available_fails() {
        let service = service_with(SHEET);
        let request = SelectionRequest {
            num_movies: Some(2),
            ..SelectionRequest::default()
        };

        let err = service.select(request).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::InsufficientPopulation {
                requested: 2,
                available: 1
            }
        ));
    }

    #[tokio::test]
    async fn test_request_url_overrides_default() {
        let mut provider = MockSheetProvider::new();
        provider
            .expect_fetch_csv()
            .with(eq("http://other.local/sheet"))
            .times(1)
            .returning(|_| Ok(SHEET.to_string()));
        provider.expect_name().return_const("mock");
        let service = MovieNightService::new(Arc::new(provider), PipelineConfig::default());

        let people = service
            .list_people(Some("http://other.local/sheet"))
            .await
            .unwrap();
        assert_eq!(people, vec!["Alice", "Bob"]);
    }

    #[tokio::test]
    async fn test_missing_data_source_is_unsupported() {
        let provider = MockSheetProvider::new();
        let service = MovieNightService::new(Arc::new(provider), PipelineConfig::default());

        let err = service.select(SelectionRequest::default()).await.unwrap_err();
        assert!(matches!(err, AppError::UnsupportedStrategy(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_is_fatal() {
        let mut provider = MockSheetProvider::new();
        provider
            .expect_fetch_csv()
            .returning(|_| Err(AppError::ExternalApi("status 503".to_string())));
        provider.expect_name().return_const("mock");
        let config = PipelineConfig {
            default_sheet_url: Some("http://sheet.local".to_string()),
            ..PipelineConfig::default()
        };
        let service = MovieNightService::new(Arc::new(provider), config);

        let err = service.select(SelectionRequest::default()).await.unwrap_err();
        assert!(matches!(err, AppError::ExternalApi(_)));
    }

    #[test]
    fn test_zero_movies_is_invalid() {
        let service = service_with(WIDER_SHEET);
        let (movies, people) = ingest(WIDER_SHEET);
        let request = SelectionRequest {
            num_movies: Some(0),
            ..SelectionRequest::default()
        };
        let mut rng = StdRng::seed_from_u64(0);

        assert!(matches!(
            service.select_from(movies, people, &request, &mut rng),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_default_pipeline_population() {
        let service = service_with(WIDER_SHEET);
        let (movies, people) = ingest(WIDER_SHEET);
        let request = SelectionRequest {
            num_movies: Some(3),
            ..SelectionRequest::default()
        };
        let mut rng = StdRng::seed_from_u64(3);

        let selection = service
            .select_from(movies, people, &request, &mut rng)
            .unwrap();

        // Up is seen, Alien is skipped, Matrix and Ran get two extra copies each
        assert_eq!(selection.population_size, 7);
        let mut chosen = names(&selection);
        chosen.sort();
        assert_eq!(chosen, vec!["Heat", "Matrix", "Ran"]);
    }

    #[test]
    fn test_lower_proba_keeps_skipped_movies() {
        let service = service_with(WIDER_SHEET);
        let (movies, people) = ingest(WIDER_SHEET);
        let request = SelectionRequest {
            num_movies: Some(4),
            filtering_strategy: FilteringStrategy::LowerProba,
            ignore_highpriority_pref: true,
            probability_assignment: ProbabilityAssignment::Constant,
            ..SelectionRequest::default()
        };
        let mut rng = StdRng::seed_from_u64(11);

        let selection = service
            .select_from(movies, people, &request, &mut rng)
            .unwrap();

        assert_eq!(selection.population_size, 4);
        let mut chosen = names(&selection);
        chosen.sort();
        assert_eq!(chosen, vec!["Alien", "Heat", "Matrix", "Ran"]);
    }

    #[test]
    fn test_participants_and_seen_flag() {
        let service = service_with(WIDER_SHEET);
        let (movies, people) = ingest(WIDER_SHEET);
        let request = SelectionRequest {
            num_movies: Some(5),
            participants: Some(vec!["Bob".to_string(), "Carol".to_string()]),
            filter_already_seen: false,
            ignore_highpriority_pref: true,
            probability_assignment: ProbabilityAssignment::ExponentialDecay,
            ..SelectionRequest::default()
        };
        let mut rng = StdRng::seed_from_u64(5);

        let selection = service
            .select_from(movies, people, &request, &mut rng)
            .unwrap();

        assert_eq!(selection.participants, vec!["Bob", "Carol"]);
        assert_eq!(selection.population_size, 5);
        assert_eq!(selection.movies.len(), 5);
    }

    #[test]
    fn test_everything_filtered_out() {
        let service = service_with(WIDER_SHEET);
        let (movies, people) = ingest("n,s,A\nUp,0,1\n");
        let request = SelectionRequest {
            num_movies: Some(1),
            ..SelectionRequest::default()
        };
        let mut rng = StdRng::seed_from_u64(0);

        assert!(matches!(
            service.select_from(movies, people, &request, &mut rng),
            Err(AppError::InsufficientPopulation {
                requested: 1,
                available: 0
            })
        ));
    }
}
