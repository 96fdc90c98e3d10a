//! Merge open Dependabot pull requests across every repository owned by the
//! authenticated GitHub account, and ask Dependabot to recreate the ones
//! GitHub reports as unmergeable.

pub mod cache;
pub mod config;
pub mod delay;
pub mod error;
pub mod github_client;
pub mod merger;
pub mod models;

pub use config::Config;
pub use delay::{Delay, Sleep};
pub use error::{Error, Result};
pub use merger::{DependabotMerger, Outcome, RunSummary};
