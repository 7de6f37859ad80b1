/// Remote CSV provider
///
/// Downloads a spreadsheet export (e.g. a Google Sheets `gviz/tq?tqx=out:csv`
/// link) with a bounded timeout and decodes it as text.
use std::time::{Duration, Instant};

use reqwest::Client as HttpClient;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    services::providers::SheetProvider,
};

#[derive(Clone)]
pub struct RemoteCsvProvider {
    http_client: HttpClient,
    /// Used when the response does not declare a charset
    encoding: String,
}

impl RemoteCsvProvider {
    /// Creates a provider whose requests give up after `timeout`
    pub fn new(timeout: Duration, encoding: String) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            encoding,
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(config.fetch_timeout(), config.sheet_encoding.clone())
    }
}

#[async_trait::async_trait]
impl SheetProvider for RemoteCsvProvider {
    async fn fetch_csv(&self, url: &str) -> AppResult<String> {
        let start = Instant::now();

        let response = self.http_client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Sheet export returned status {}: {}",
                status, body
            )));
        }

        let text = response.text_with_charset(&self.encoding).await?;

        tracing::info!(
            url = %url,
            bytes = text.len(),
            elapsed_ms = start.elapsed().as_millis(),
            provider = self.name(),
            "Sheet fetched"
        );

        Ok(text)
    }

    fn name(&self) -> &'static str {
        "remote_csv"
    }
}
