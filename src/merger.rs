use crate::cache::RepoCache;
use crate::config::Config;
use crate::delay::Delay;
use crate::github_client::GithubClient;
use crate::models::{Mergeable, PullRequest, Repository};
use anyhow::{bail, Context, Result};
use tracing::{info, warn};

/// What happened to a single bot pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Merged,
    MergeFailed,
    Commented,
    CommentFailed,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub repositories: usize,
    pub failed_repositories: usize,
    pub bot_pull_requests: usize,
    pub merged: usize,
    pub commented: usize,
    pub failed_actions: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Merged => self.merged += 1,
            Outcome::Commented => self.commented += 1,
            Outcome::MergeFailed | Outcome::CommentFailed => self.failed_actions += 1,
        }
    }
}

pub struct DependabotMerger<'a> {
    client: GithubClient,
    config: &'a Config,
    delay: Box<dyn Delay>,
}

impl<'a> DependabotMerger<'a> {
    pub fn new(config: &'a Config, delay: Box<dyn Delay>) -> Result<Self> {
        let client = GithubClient::new(&config.token, &config.api_url)
            .context("Failed to build GitHub client")?;
        Ok(Self {
            client,
            config,
            delay,
        })
    }

    /// Lists repositories (cached or fetched) and handles every one of them.
    ///
    /// Only a failure to obtain the repository list aborts the run.
    pub async fn run(&self) -> Result<RunSummary> {
        let cache = RepoCache::new(
            self.config.cache_path.clone(),
            &self.client,
            self.delay.as_ref(),
            self.config.request_delay(),
        );
        let repos = cache
            .load_or_fetch()
            .await
            .context("Failed to fetch repositories")?;
        info!("Total repositories to process: {}", repos.len());

        let mut summary = RunSummary::default();
        for repo in &repos {
            summary.repositories += 1;
            if let Err(e) = self.process_repository(repo, &mut summary).await {
                summary.failed_repositories += 1;
                warn!("Error processing {}: {:#}", repo.full_name, e);
            }
            self.delay.wait(self.config.repo_delay()).await;
        }

        info!(
            "Processed {} repositories: {} Dependabot PR(s), {} merged, {} commented, {} failed actions, {} failed repositories",
            summary.repositories,
            summary.bot_pull_requests,
            summary.merged,
            summary.commented,
            summary.failed_actions,
            summary.failed_repositories,
        );
        Ok(summary)
    }

    pub async fn process_repository(&self, repo: &Repository, summary: &mut RunSummary) -> Result<()> {
        if repo.owner_and_name().is_none() {
            bail!("'{}' is not an owner/name repository", repo.full_name);
        }
        let full_name = &repo.full_name;
        info!("Checking repository: {}", full_name);

        let prs = self.fetch_open_prs(full_name).await;
        let bot_prs = filter_by_author(prs, &self.config.bot_login);
        info!("Found {} Dependabot PR(s) in {}", bot_prs.len(), full_name);

        for pr in &bot_prs {
            summary.bot_pull_requests += 1;
            let outcome = self.handle_pull_request(full_name, pr).await;
            summary.record(outcome);
        }
        Ok(())
    }

    /// Merges the pull request when GitHub reports it mergeable, otherwise
    /// asks the bot to recreate it.
    pub async fn handle_pull_request(&self, repo_full_name: &str, pr: &PullRequest) -> Outcome {
        let mergeable = match pr.mergeable {
            Mergeable::Unknown => self.resolve_mergeable(repo_full_name, pr.number).await,
            known => known,
        };
        info!("PR #{}: {} -> mergeable: {}", pr.number, pr.title, mergeable);

        if mergeable == Mergeable::Yes {
            if self.merge(repo_full_name, pr.number).await {
                Outcome::Merged
            } else {
                Outcome::MergeFailed
            }
        } else if self
            .comment(repo_full_name, pr.number, &self.config.recreate_comment)
            .await
        {
            Outcome::Commented
        } else {
            Outcome::CommentFailed
        }
    }

    /// All open pull requests, or as many as could be read before the first
    /// failing page.
    pub async fn fetch_open_prs(&self, repo_full_name: &str) -> Vec<PullRequest> {
        let mut prs = Vec::new();
        let mut page = 1;
        loop {
            match self.client.list_open_pulls(repo_full_name, page).await {
                Ok(batch) if batch.is_empty() => break,
                Ok(batch) => {
                    prs.extend(batch);
                    page += 1;
                    self.delay.wait(self.config.request_delay()).await;
                }
                Err(e) => {
                    warn!("Failed to fetch PRs for {}: {}", repo_full_name, e);
                    break;
                }
            }
        }
        prs
    }

    /// Gives GitHub time to compute mergeability, then re-reads the pull
    /// request once. A failed read yields `Unknown`.
    pub async fn resolve_mergeable(&self, repo_full_name: &str, number: u64) -> Mergeable {
        self.delay.wait(self.config.mergeable_grace()).await;
        match self.client.get_pull_request(repo_full_name, number).await {
            Ok(details) => {
                self.delay.wait(self.config.request_delay()).await;
                details.mergeable
            }
            Err(e) => {
                warn!("Failed to fetch PR details #{}: {}", number, e);
                Mergeable::Unknown
            }
        }
    }

    pub async fn merge(&self, repo_full_name: &str, number: u64) -> bool {
        let result = self
            .client
            .merge_pull_request(repo_full_name, number, self.config.merge_strategy)
            .await;
        self.delay.wait(self.config.request_delay()).await;
        match result {
            Ok(()) => {
                info!("Merged PR #{} successfully in {}", number, repo_full_name);
                true
            }
            Err(e) => {
                warn!("Failed to merge PR #{} in {}: {}", number, repo_full_name, e);
                false
            }
        }
    }

    pub async fn comment(&self, repo_full_name: &str, number: u64, text: &str) -> bool {
        let result = self.client.create_comment(repo_full_name, number, text).await;
        self.delay.wait(self.config.request_delay()).await;
        match result {
            Ok(()) => {
                info!("Commented on PR #{} in {}", number, repo_full_name);
                true
            }
            Err(e) => {
                warn!("Failed to comment on PR #{} in {}: {}", number, repo_full_name, e);
                false
            }
        }
    }
}

/// Keeps pull requests whose author login is exactly `login`.
pub fn filter_by_author(prs: Vec<PullRequest>, login: &str) -> Vec<PullRequest> {
    prs.into_iter().filter(|pr| pr.user.login == login).collect()
}
