use crate::error::{Error, Result};
use crate::models::{CommentRequest, MergeRequest, MergeStrategy, PullRequest, Repository};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

pub const PAGE_SIZE: u32 = 100;

#[derive(Clone)]
pub struct GithubClient {
    client: Arc<reqwest::Client>,
    api_url: String,
}

impl GithubClient {
    pub fn new(token: &str, api_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("dependabot-merger"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static("2022-11-28"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client: Arc::new(client),
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        filters: &[(&str, &str)],
        page: u32,
    ) -> Result<Vec<T>> {
        let url = self.url(path);
        debug!("GET {} page {}", url, page);
        let response = self
            .client
            .get(&url)
            .query(filters)
            .query(&[("per_page", PAGE_SIZE), ("page", page)])
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(unexpected_status(url, response).await)
        }
    }

    /// One page of `GET /user/repos`, restricted to repositories the token owner owns.
    pub async fn list_owned_repos(&self, page: u32) -> Result<Vec<Repository>> {
        self.get_page("/user/repos", &[("affiliation", "owner")], page)
            .await
    }

    /// One page of open pull requests for `repo_full_name`.
    pub async fn list_open_pulls(&self, repo_full_name: &str, page: u32) -> Result<Vec<PullRequest>> {
        let path = format!("/repos/{}/pulls", repo_full_name);
        self.get_page(&path, &[("state", "open")], page).await
    }

    pub async fn get_pull_request(&self, repo_full_name: &str, number: u64) -> Result<PullRequest> {
        let url = self.url(&format!("/repos/{}/pulls/{}", repo_full_name, number));
        let response = self.client.get(&url).send().await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(unexpected_status(url, response).await)
        }
    }

    /// Succeeds only when GitHub answers `200 OK`.
    pub async fn merge_pull_request(
        &self,
        repo_full_name: &str,
        number: u64,
        strategy: MergeStrategy,
    ) -> Result<()> {
        let url = self.url(&format!("/repos/{}/pulls/{}/merge", repo_full_name, number));
        let response = self
            .client
            .put(&url)
            .json(&MergeRequest {
                merge_method: strategy,
            })
            .send()
            .await?;
        if response.status() == StatusCode::OK {
            Ok(())
        } else {
            Err(unexpected_status(url, response).await)
        }
    }

    /// Succeeds only when GitHub answers `201 Created`.
    pub async fn create_comment(&self, repo_full_name: &str, number: u64, body: &str) -> Result<()> {
        let url = self.url(&format!("/repos/{}/issues/{}/comments", repo_full_name, number));
        let response = self
            .client
            .post(&url)
            .json(&CommentRequest { body })
            .send()
            .await?;
        if response.status() == StatusCode::CREATED {
            Ok(())
        } else {
            Err(unexpected_status(url, response).await)
        }
    }
}

async fn unexpected_status(url: String, response: Response) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Error::UnexpectedStatus { url, status, body }
}
