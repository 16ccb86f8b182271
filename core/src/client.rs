use crate::{PoolTeamSummary, TeamAnalysis, TeamEntry};
use futures_util::future::join_all;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e, _) | ApiError::Api(e, _) | ApiError::Parsing(e, _) => Some(e),
            ApiError::NotFound(_) | ApiError::Other(_) => None,
        }
    }
}

/// Where team records come from. The records themselves are consumed as-is.
pub trait TeamSource {
    /// Every seeded team, by seed then name.
    fn roster(&self) -> impl Future<Output = ApiResult<Vec<TeamEntry>>> + Send;

    fn analysis(&self, name: &str) -> impl Future<Output = ApiResult<TeamAnalysis>> + Send;

    /// Summaries in request order. Unknown names are left out.
    fn pool_summaries(&self, names: &[String]) -> impl Future<Output = ApiResult<Vec<PoolTeamSummary>>> + Send;
}

/// Fetch several analyses at once. Results come back in request order.
pub async fn fetch_analyses<S: TeamSource>(source: &S, names: &[String]) -> Vec<(String, ApiResult<TeamAnalysis>)> {
    let results = join_all(names.iter().map(|name| source.analysis(name))).await;
    names.iter().cloned().zip(results).collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    pub message: String,
}

#[derive(Serialize)]
struct PoolRequest<'a> {
    teams: &'a [String],
}

#[derive(Deserialize)]
struct PoolResponse {
    #[serde(default)]
    teams: Vec<PoolTeamSummary>,
}

/// Client for the pool analytics service.
#[derive(Debug, Clone)]
pub struct AnalysisApi {
    client: Client,
    base: Url,
    timeout: Duration,
}

impl AnalysisApi {
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let base = Url::parse(base_url).map_err(|e| ApiError::Other(format!("invalid API URL {base_url:?}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::Other(format!("{base_url:?} cannot be used as a base URL")));
        }
        Ok(Self {
            client: Client::builder()
                .user_agent("mmpool/0.1 (bracket pool analytics)")
                .build()
                .unwrap_or_default(),
            base,
            timeout: Duration::from_secs(10),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `GET /`
    pub async fn health(&self) -> ApiResult<Health> {
        let url = self.base.clone();
        self.send(self.client.get(url.clone()), &url).await
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // Checked in `new`: the base can carry path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, url: &Url) -> ApiResult<T> {
        debug!("request {url}");
        let response = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(url.to_string()));
        }

        match response.error_for_status() {
            Ok(res) => res.json::<T>().await.map_err(|e| ApiError::Parsing(e, url.to_string())),
            Err(e) => Err(ApiError::Api(e, url.to_string())),
        }
    }
}

impl TeamSource for AnalysisApi {
    /// `GET /teams`
    async fn roster(&self) -> ApiResult<Vec<TeamEntry>> {
        let url = self.endpoint(&["teams"]);
        self.send(self.client.get(url.clone()), &url).await
    }

    /// `GET /analyze/{team}`
    async fn analysis(&self, name: &str) -> ApiResult<TeamAnalysis> {
        let url = self.endpoint(&["analyze", name]);
        self.send(self.client.get(url.clone()), &url)
            .await
            .map_err(|e| match e {
                ApiError::NotFound(_) => ApiError::NotFound(format!("no analysis for {name}")),
                other => other,
            })
    }

    /// `POST /create-a-team`
    async fn pool_summaries(&self, names: &[String]) -> ApiResult<Vec<PoolTeamSummary>> {
        let url = self.endpoint(&["create-a-team"]);
        let request = self.client.post(url.clone()).json(&PoolRequest { teams: names });
        let response: PoolResponse = self.send(request, &url).await?;
        if response.teams.len() < names.len() {
            warn!(
                "{} of {} requested teams have no summary",
                names.len() - response.teams.len(),
                names.len()
            );
        }
        Ok(response.teams)
    }
}
