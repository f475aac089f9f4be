// Remote CSV fetching.
//
// The four source files are fetched concurrently. Each fetch is retried a
// fixed number of times with a flat delay; there is no timeout and no
// cancellation. If any one file still fails, the whole load fails.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{FetchConfig, SourcesConfig};
use crate::stats::parser;
use crate::stats::GoalStatsData;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed reading body from {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

/// A failed load. Carries the file that failed; callers show it to the user
/// as a single error regardless of cause.
#[derive(Debug, Error)]
#[error("failed to load {dataset} statistics: {source}")]
pub struct LoadError {
    pub dataset: Dataset,
    pub source: FetchError,
}

// ---------------------------------------------------------------------------
// Datasets
// ---------------------------------------------------------------------------

/// One of the four source files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Home,
    Away,
    Overall,
    LeagueAverages,
}

impl Dataset {
    pub fn url<'a>(&self, sources: &'a SourcesConfig) -> &'a str {
        match self {
            Dataset::Home => &sources.home,
            Dataset::Away => &sources.away,
            Dataset::Overall => &sources.overall,
            Dataset::LeagueAverages => &sources.league_averages,
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dataset::Home => "home",
            Dataset::Away => "away",
            Dataset::Overall => "overall",
            Dataset::LeagueAverages => "league average",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Retry policy
// ---------------------------------------------------------------------------

/// Retries after the first failed attempt, separated by a flat delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            retries: 3,
            delay: Duration::from_millis(1000),
        }
    }
}

impl From<&FetchConfig> for RetryPolicy {
    fn from(config: &FetchConfig) -> Self {
        RetryPolicy {
            retries: config.retries,
            delay: config.retry_delay(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Something that can produce the text of a CSV file given its URL.
#[async_trait]
pub trait CsvSource: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

/// Plain unauthenticated HTTP(S) GET.
pub struct HttpSource {
    http: reqwest::Client,
}

impl HttpSource {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CsvSource for HttpSource {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.text().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            source: e,
        })
    }
}

// ---------------------------------------------------------------------------
// Fetching
// ---------------------------------------------------------------------------

/// Fetch `url`, retrying up to `policy.retries` more times on failure.
pub async fn fetch_with_retry<S: CsvSource + ?Sized>(
    source: &S,
    url: &str,
    policy: &RetryPolicy,
) -> Result<String, FetchError> {
    let mut attempt: u32 = 0;
    loop {
        match source.fetch_text(url).await {
            Ok(body) => {
                debug!(url, attempt, bytes = body.len(), "fetched CSV");
                return Ok(body);
            }
            Err(e) if attempt < policy.retries => {
                attempt += 1;
                warn!(url, attempt, "fetch failed, retrying: {}", e);
                tokio::time::sleep(policy.delay).await;
            }
            Err(e) => {
                warn!(url, attempts = attempt + 1, "fetch failed, giving up: {}", e);
                return Err(e);
            }
        }
    }
}

/// Fetch and parse all four files concurrently.
pub async fn load_all<S: CsvSource + ?Sized>(
    source: &S,
    sources: &SourcesConfig,
    policy: &RetryPolicy,
) -> Result<GoalStatsData, LoadError> {
    let fetch = |dataset: Dataset| async move {
        fetch_with_retry(source, dataset.url(sources), policy)
            .await
            .map_err(|e| LoadError { dataset, source: e })
    };

    let (home_text, away_text, overall_text, leagues_text) = tokio::try_join!(
        fetch(Dataset::Home),
        fetch(Dataset::Away),
        fetch(Dataset::Overall),
        fetch(Dataset::LeagueAverages),
    )?;

    let mut embedded_averages = parser::parse_embedded_averages(&home_text);
    embedded_averages.extend(parser::parse_embedded_averages(&away_text));

    let data = GoalStatsData {
        home: parser::parse_team_stats(&home_text),
        away: parser::parse_team_stats(&away_text),
        overall: parser::parse_team_stats(&overall_text),
        league_averages: parser::parse_league_averages(&leagues_text),
        embedded_averages,
    };

    for (dataset, count) in [
        (Dataset::Home, data.home.len()),
        (Dataset::Away, data.away.len()),
        (Dataset::Overall, data.overall.len()),
        (Dataset::LeagueAverages, data.league_averages.len()),
    ] {
        if count == 0 {
            warn!("{} file produced zero rows", dataset);
        }
    }

    info!(
        home = data.home.len(),
        away = data.away.len(),
        overall = data.overall.len(),
        leagues = data.league_averages.len(),
        embedded = data.embedded_averages.len(),
        "goal statistics loaded"
    );

    Ok(data)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
