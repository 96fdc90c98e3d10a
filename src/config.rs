use crate::models::MergeStrategy;
use clap::Parser;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_BOT_LOGIN: &str = "dependabot[bot]";
pub const DEFAULT_RECREATE_COMMENT: &str = "@dependabot recreate";
pub const DEFAULT_CACHE_PATH: &str = "repos_cache.json";
pub const DEFAULT_REQUEST_DELAY_SECONDS: f64 = 2.0;
pub const DEFAULT_REPO_DELAY_SECONDS: f64 = 3.0;
pub const DEFAULT_MERGEABLE_GRACE_SECONDS: f64 = 5.0;

/// Runtime settings, read once at startup from flags or the environment.
#[derive(Parser, Clone)]
#[command(
    name = "dependabot-merger",
    version,
    about = "Merge mergeable Dependabot pull requests across your repositories and ask Dependabot to recreate the rest"
)]
pub struct Config {
    /// GitHub token used as the bearer credential
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: String,

    #[arg(long, env = "MERGE_STRATEGY", value_enum, default_value_t = MergeStrategy::Squash)]
    pub merge_strategy: MergeStrategy,

    /// Seconds to wait after each API call
    #[arg(long, env = "REQUEST_DELAY_SECONDS", default_value_t = DEFAULT_REQUEST_DELAY_SECONDS, value_parser = parse_seconds)]
    pub request_delay_seconds: f64,

    /// Seconds to wait between repositories
    #[arg(long, env = "REPO_DELAY_SECONDS", default_value_t = DEFAULT_REPO_DELAY_SECONDS, value_parser = parse_seconds)]
    pub repo_delay_seconds: f64,

    /// Seconds to give GitHub to compute mergeability before re-reading a pull request
    #[arg(long, env = "MERGEABLE_GRACE_SECONDS", default_value_t = DEFAULT_MERGEABLE_GRACE_SECONDS, value_parser = parse_seconds)]
    pub mergeable_grace_seconds: f64,

    /// Repository list snapshot; reused verbatim when present
    #[arg(long, env = "CACHE_PATH", default_value = DEFAULT_CACHE_PATH)]
    pub cache_path: PathBuf,

    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Author login whose pull requests are handled
    #[arg(long, env = "BOT_LOGIN", default_value = DEFAULT_BOT_LOGIN)]
    pub bot_login: String,

    /// Comment posted on pull requests that cannot be merged
    #[arg(long, env = "RECREATE_COMMENT", default_value = DEFAULT_RECREATE_COMMENT)]
    pub recreate_comment: String,
}

impl Config {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            merge_strategy: MergeStrategy::Squash,
            request_delay_seconds: DEFAULT_REQUEST_DELAY_SECONDS,
            repo_delay_seconds: DEFAULT_REPO_DELAY_SECONDS,
            mergeable_grace_seconds: DEFAULT_MERGEABLE_GRACE_SECONDS,
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            api_url: DEFAULT_API_URL.to_string(),
            bot_login: DEFAULT_BOT_LOGIN.to_string(),
            recreate_comment: DEFAULT_RECREATE_COMMENT.to_string(),
        }
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_secs_f64(self.request_delay_seconds)
    }

    pub fn repo_delay(&self) -> Duration {
        Duration::from_secs_f64(self.repo_delay_seconds)
    }

    pub fn mergeable_grace(&self) -> Duration {
        Duration::from_secs_f64(self.mergeable_grace_seconds)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("merge_strategy", &self.merge_strategy)
            .field("request_delay_seconds", &self.request_delay_seconds)
            .field("repo_delay_seconds", &self.repo_delay_seconds)
            .field("mergeable_grace_seconds", &self.mergeable_grace_seconds)
            .field("cache_path", &self.cache_path)
            .field("api_url", &self.api_url)
            .field("bot_login", &self.bot_login)
            .field("recreate_comment", &self.recreate_comment)
            .finish()
    }
}

fn parse_seconds(value: &str) -> Result<f64, String> {
    let seconds: f64 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("'{}' must be a non-negative number of seconds", value));
    }
    Ok(seconds)
}
