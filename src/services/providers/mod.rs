/// Sheet data provider abstraction
///
/// The selection pipeline only needs the raw CSV text of the preference sheet;
/// where it comes from is up to the provider. Today that is a remote
/// spreadsheet export fetched over HTTP.
use crate::error::AppResult;

pub mod remote_csv;

pub use remote_csv::RemoteCsvProvider;

/// Trait for sheet data providers
///
/// A fetch is all-or-nothing: a provider either returns the complete CSV body
/// or an error, never a partial sheet.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SheetProvider: Send + Sync {
    /// Fetch the CSV text behind `url`
    async fn fetch_csv(&self, url: &str) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
