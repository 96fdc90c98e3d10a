use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A repository as returned by `GET /user/repos`.
///
/// Only `full_name` is interpreted; every other field is kept as-is so the
/// cache file mirrors what the API returned.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Repository {
    pub full_name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Repository {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Splits `owner/name`, rejecting anything that would not address a
    /// single repository.
    pub fn owner_and_name(&self) -> Option<(&str, &str)> {
        let (owner, name) = self.full_name.split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some((owner, name))
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub user: User,
    #[serde(default)]
    pub mergeable: Mergeable,
}

#[derive(Deserialize, Debug, Clone)]
pub struct User {
    pub login: String,
}

/// GitHub computes mergeability asynchronously, so the API reports it as a
/// nullable boolean. `Unknown` covers both `null` and a missing field.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(from = "Option<bool>")]
pub enum Mergeable {
    Yes,
    No,
    #[default]
    Unknown,
}

impl From<Option<bool>> for Mergeable {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Mergeable::Yes,
            Some(false) => Mergeable::No,
            None => Mergeable::Unknown,
        }
    }
}

impl fmt::Display for Mergeable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Mergeable::Yes => "true",
            Mergeable::No => "false",
            Mergeable::Unknown => "unknown",
        };
        f.write_str(value)
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    Merge,
    Squash,
    Rebase,
}

#[derive(Serialize, Debug)]
pub struct MergeRequest {
    pub merge_method: MergeStrategy,
}

#[derive(Serialize, Debug)]
pub struct CommentRequest<'a> {
    pub body: &'a str,
}
