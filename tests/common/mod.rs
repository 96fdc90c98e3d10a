//! Shared fixtures for the merger integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use dependabot_merger::{Config, Delay};
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Records every requested wait instead of sleeping.
#[derive(Clone, Default)]
pub struct RecordingDelay {
    waits: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingDelay {
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Delay for RecordingDelay {
    async fn wait(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}

pub fn test_config(server: &ServerGuard, dir: &Path) -> Config {
    let mut config = Config::new("test-token");
    config.api_url = server.url();
    config.cache_path = dir.join("repos_cache.json");
    config
}

/// Pre-populates the repository cache so the run skips `/user/repos`.
pub fn write_cache(config: &Config, full_names: &[&str]) {
    let repos: Vec<Value> = full_names
        .iter()
        .map(|name| json!({ "full_name": name }))
        .collect();
    std::fs::write(&config.cache_path, serde_json::to_string(&repos).unwrap()).unwrap();
}

pub fn pr_json(number: u64, login: &str, mergeable: Option<bool>) -> Value {
    json!({
        "number": number,
        "title": format!("Bump some-crate from 1.0.{} to 1.0.{}", number, number + 1),
        "user": { "login": login },
        "mergeable": mergeable,
    })
}

/// Serves `prs` as the single non-empty page of open pull requests for `repo`,
/// followed by an empty page.
pub async fn mock_open_pulls(server: &mut ServerGuard, repo: &str, prs: Vec<Value>) -> Vec<Mock> {
    let path = format!("/repos/{}/pulls", repo);
    let first = server
        .mock("GET", path.as_str())
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("state".into(), "open".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(Value::Array(prs).to_string())
        .create_async()
        .await;
    let last = server
        .mock("GET", path.as_str())
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;
    vec![first, last]
}

pub async fn mock_merge(server: &mut ServerGuard, repo: &str, number: u64, status: usize, hits: usize) -> Mock {
    server
        .mock("PUT", format!("/repos/{}/pulls/{}/merge", repo, number).as_str())
        .match_body(Matcher::Json(json!({ "merge_method": "squash" })))
        .with_status(status)
        .with_body(r#"{"merged": true}"#)
        .expect(hits)
        .create_async()
        .await
}

pub async fn mock_comment(server: &mut ServerGuard, repo: &str, number: u64, hits: usize) -> Mock {
    server
        .mock("POST", format!("/repos/{}/issues/{}/comments", repo, number).as_str())
        .match_body(Matcher::Json(json!({ "body": "@dependabot recreate" })))
        .with_status(201)
        .with_body(r#"{"id": 1}"#)
        .expect(hits)
        .create_async()
        .await
}
