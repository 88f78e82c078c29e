use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::{StarEventStream, StarSource};
use crate::domain::{DomainError, RepoIdentity, StarEvent, StatSnapshot};

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";
/// GitHub paginates stargazers at a fixed page size; 100 is the maximum.
const STARGAZER_PAGE_SIZE: usize = 100;
/// Media type that includes `starred_at` timestamps in stargazer listings.
const STAR_MEDIA_TYPE: &str = "application/vnd.github.star+json";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("starcast/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize)]
struct ApiRepo {
    full_name: String,
    stargazers_count: u64,
    forks_count: u64,
    watchers_count: u64,
    open_issues_count: u64,
    language: Option<String>,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct ApiStargazer {
    starred_at: DateTime<Utc>,
}

/// GitHub REST adapter implementing [`StarSource`].
///
/// Authentication is optional: without a token the same endpoints work under
/// a stricter rate ceiling, and callers see no behavioral difference. A
/// `RateLimited` error is surfaced as-is, never retried here; whether to wait
/// out the quota is the caller's decision.
pub struct GitHubStarSource {
    client: reqwest::Client,
    token: Option<String>,
    base_url: String,
}

impl GitHubStarSource {
    /// `token` is injected explicitly so the adapter stays testable with
    /// fake credentials; nothing deeper in the call path reads the
    /// environment.
    pub fn new(token: Option<String>, base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        Self {
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            token: token.filter(|t| !t.is_empty()),
            base_url: base.trim_end_matches('/').to_string(),
        }
    }

    /// Construct from `GITHUB_TOKEN` (optional) and `GITHUB_API_URL`
    /// (defaults to the public API).
    pub fn from_env() -> Self {
        let token = std::env::var("GITHUB_TOKEN").ok();
        let base =
            std::env::var("GITHUB_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(token, base)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn repo_url(&self, identity: &RepoIdentity) -> String {
        format!("{}/repos/{}/{}", self.base_url, identity.owner(), identity.name())
    }

    fn stargazers_url(&self, identity: &RepoIdentity, page: usize) -> String {
        format!(
            "{}/repos/{}/{}/stargazers?per_page={}&page={}",
            self.base_url,
            identity.owner(),
            identity.name(),
            STARGAZER_PAGE_SIZE,
            page
        )
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .get(url)
            .header("X-GitHub-Api-Version", API_VERSION);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn fail_from_response(
        response: reqwest::Response,
        context: &str,
    ) -> DomainError {
        let status = response.status();
        let quota_exhausted = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == "0")
            .unwrap_or(false);
        let body = response.text().await.unwrap_or_default();
        warn!("GitHub API returned {status} for {context}: {body}");
        classify_status(status, quota_exhausted, context)
    }

    async fn stargazer_page(
        &self,
        identity: &RepoIdentity,
        page: usize,
    ) -> Result<Vec<DateTime<Utc>>, DomainError> {
        let url = self.stargazers_url(identity, page);
        let response = self
            .get(&url)
            .header(ACCEPT, STAR_MEDIA_TYPE)
            .send()
            .await
            .map_err(|e| DomainError::network(format!("stargazers request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::fail_from_response(response, &identity.full_name()).await);
        }

        let stargazers: Vec<ApiStargazer> = response
            .json()
            .await
            .map_err(|e| DomainError::network(format!("failed to parse stargazer page: {e}")))?;
        debug!(
            "Fetched stargazer page {} for {} ({} entries)",
            page,
            identity,
            stargazers.len()
        );
        Ok(stargazers.into_iter().map(|s| s.starred_at).collect())
    }
}

#[async_trait]
impl StarSource for GitHubStarSource {
    async fn fetch_snapshot(&self, identity: &RepoIdentity) -> Result<StatSnapshot, DomainError> {
        let response = self
            .get(&self.repo_url(identity))
            .send()
            .await
            .map_err(|e| DomainError::network(format!("repository request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::fail_from_response(response, &identity.full_name()).await);
        }

        let repo: ApiRepo = response
            .json()
            .await
            .map_err(|e| DomainError::network(format!("failed to parse repository: {e}")))?;

        Ok(StatSnapshot {
            full_name: repo.full_name,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            watchers: repo.watchers_count,
            open_issues: repo.open_issues_count,
            language: repo.language,
            description: repo.description,
            created_at: repo.created_at,
            updated_at: repo.updated_at,
            collected_at: Utc::now(),
        })
    }

    fn star_events(&self, identity: &RepoIdentity, max_count: usize) -> StarEventStream<'_> {
        // Lazy producer: pages are fetched only as the consumer polls, so a
        // sampler that stops at its cap never touches the rest of a
        // potentially unbounded history.
        let state = PageWalk {
            identity: identity.clone(),
            page: 1,
            yielded: 0,
            max_count,
            buffer: VecDeque::new(),
            exhausted: false,
        };
        futures_util::stream::try_unfold(state, move |mut state| async move {
            loop {
                if state.yielded >= state.max_count {
                    return Ok(None);
                }
                if let Some(timestamp) = state.buffer.pop_front() {
                    state.yielded += 1;
                    return Ok(Some((
                        StarEvent::new(timestamp, state.yielded as u64),
                        state,
                    )));
                }
                if state.exhausted {
                    return Ok(None);
                }
                let page = self.stargazer_page(&state.identity, state.page).await?;
                if page.len() < STARGAZER_PAGE_SIZE {
                    state.exhausted = true;
                }
                state.page += 1;
                state.buffer.extend(page);
            }
        })
        .boxed()
    }
}

struct PageWalk {
    identity: RepoIdentity,
    page: usize,
    yielded: usize,
    max_count: usize,
    buffer: VecDeque<DateTime<Utc>>,
    exhausted: bool,
}

/// Map an HTTP failure status onto the domain taxonomy.
///
/// GitHub signals quota exhaustion as 403 (or 429) with
/// `x-ratelimit-remaining: 0`; a 403 with quota left is a genuine
/// authorization failure.
fn classify_status(status: StatusCode, quota_exhausted: bool, context: &str) -> DomainError {
    match status {
        StatusCode::NOT_FOUND => {
            DomainError::not_found(format!("repository {context} unknown to GitHub"))
        }
        StatusCode::UNAUTHORIZED => {
            DomainError::auth(format!("credential rejected for {context}"))
        }
        StatusCode::TOO_MANY_REQUESTS => {
            DomainError::rate_limited(format!("quota exhausted fetching {context}"))
        }
        StatusCode::FORBIDDEN if quota_exhausted => {
            DomainError::rate_limited(format!("quota exhausted fetching {context}"))
        }
        StatusCode::FORBIDDEN => DomainError::auth(format!("access forbidden for {context}")),
        other => DomainError::network(format!("GitHub returned {other} for {context}")),
    }
}
