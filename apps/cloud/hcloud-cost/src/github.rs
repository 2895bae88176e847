//! Pull-request commenter for the GitHub REST API.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::GithubConfig;

#[derive(Error, Debug)]
pub enum GithubError {
    #[error("GITHUB_TOKEN not set")]
    MissingToken,

    #[error("GITHUB_REPOSITORY not set")]
    MissingRepository,

    #[error("Invalid GITHUB_REPOSITORY format '{0}', expected owner/repo")]
    InvalidRepository(String),

    #[error("PR_NUMBER not set")]
    MissingPrNumber,

    #[error("Invalid PR number: {0}")]
    InvalidPrNumber(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("GitHub API returned status {status}: {message}")]
    ApiError { status: u16, message: String },
}

/// Pull request a comment goes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl PullRequest {
    fn from_config(config: &GithubConfig) -> Result<Self, GithubError> {
        let repository = config
            .repository
            .as_deref()
            .ok_or(GithubError::MissingRepository)?;
        let (owner, repo) = match repository.split('/').collect::<Vec<_>>()[..] {
            [owner, repo] if !owner.is_empty() && !repo.is_empty() => (owner, repo),
            _ => return Err(GithubError::InvalidRepository(repository.to_string())),
        };

        let raw_number = config
            .pr_number
            .as_deref()
            .ok_or(GithubError::MissingPrNumber)?;
        let number = raw_number
            .parse()
            .map_err(|_| GithubError::InvalidPrNumber(raw_number.to_string()))?;

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            number,
        })
    }
}

#[derive(Debug, Serialize)]
struct CreateCommentRequest<'a> {
    body: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateCommentResponse {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct GithubApiError {
    message: String,
}

/// Posts markdown reports as issue comments on a pull request
pub struct GithubCommenter {
    client: Client,
    api_url: String,
    token: String,
    pull_request: PullRequest,
}

impl GithubCommenter {
    /// Validate the configuration and build a commenter
    pub fn from_config(config: &GithubConfig) -> Result<Self, GithubError> {
        let token = config.token.clone().ok_or(GithubError::MissingToken)?;
        let pull_request = PullRequest::from_config(config)?;

        Ok(Self {
            client: Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token,
            pull_request,
        })
    }

    pub fn pull_request(&self) -> &PullRequest {
        &self.pull_request
    }

    /// Create a comment; returns its id
    pub async fn post_comment(&self, body: &str) -> Result<u64, GithubError> {
        let PullRequest { owner, repo, number } = &self.pull_request;
        let url = format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.api_url, owner, repo, number
        );
        debug!(url = %url, "Posting pull request comment");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .header("User-Agent", concat!("hcloud-cost/", env!("CARGO_PKG_VERSION")))
            .json(&CreateCommentRequest { body })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GithubApiError>(&text)
                .map(|e| e.message)
                .unwrap_or(text);
            return Err(GithubError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let created: CreateCommentResponse = response.json().await?;
        info!(
            comment_id = created.id,
            pr = number,
            repo = %format!("{owner}/{repo}"),
            "Pull request comment created"
        );

        Ok(created.id)
    }
}
