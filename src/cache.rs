use crate::delay::Delay;
use crate::error::{Error, Result};
use crate::github_client::GithubClient;
use crate::models::Repository;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Snapshot of the owned repository list, persisted as a JSON array.
///
/// Once written the file is trusted for every later run; delete it to pick
/// up new repositories.
pub struct RepoCache<'a> {
    path: PathBuf,
    client: &'a GithubClient,
    delay: &'a dyn Delay,
    request_delay: Duration,
}

impl<'a> RepoCache<'a> {
    pub fn new(
        path: impl Into<PathBuf>,
        client: &'a GithubClient,
        delay: &'a dyn Delay,
        request_delay: Duration,
    ) -> Self {
        Self {
            path: path.into(),
            client,
            delay,
            request_delay,
        }
    }

    pub async fn load_or_fetch(&self) -> Result<Vec<Repository>> {
        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|source| self.io_error(source))?;
        if exists {
            info!("Loading cached repositories from {}", self.path.display());
            return self.load().await;
        }

        info!("Fetching repositories from GitHub...");
        let repos = self.fetch_all().await?;
        self.store(&repos).await?;
        info!("Cached {} repositories to {}", repos.len(), self.path.display());
        Ok(repos)
    }

    async fn load(&self) -> Result<Vec<Repository>> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| self.io_error(source))?;
        serde_json::from_str(&contents).map_err(|source| Error::CacheFormat {
            path: self.path.clone(),
            source,
        })
    }

    async fn fetch_all(&self) -> Result<Vec<Repository>> {
        let mut repos = Vec::new();
        let mut page = 1;
        loop {
            let batch = self.client.list_owned_repos(page).await?;
            if batch.is_empty() {
                break;
            }
            repos.extend(batch);
            page += 1;
            self.delay.wait(self.request_delay).await;
        }
        Ok(repos)
    }

    async fn store(&self, repos: &[Repository]) -> Result<()> {
        let contents = serde_json::to_string_pretty(repos).map_err(|source| Error::CacheFormat {
            path: self.path.clone(),
            source,
        })?;
        let staging = self.staging_path();
        tokio::fs::write(&staging, contents)
            .await
            .map_err(|source| self.io_error(source))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|source| self.io_error(source))
    }

    /// Sibling file the snapshot is written to before being renamed over
    /// the cache, so an interrupted run never leaves a truncated cache.
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn io_error(&self, source: std::io::Error) -> Error {
        Error::CacheIo {
            path: self.path.clone(),
            source,
        }
    }
}
