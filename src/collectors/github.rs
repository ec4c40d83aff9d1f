//! Code-activity collector backed by the GitHub search API.
//!
//! Polls the top machine-learning repositories (a proxy for overall developer
//! ecosystem activity) and condenses them into a `CodeActivity` record. Works
//! unauthenticated; a token raises the rate limit.

use super::{Collector, CollectorError};
use crate::utils::types::{CodeActivity, Domain, LanguageShare, RepoEntry};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

const SEARCH_QUERY: &str = "topic:machine-learning";
const PAGE_SIZE: u32 = 30;
const TOP_REPOS: usize = 3;
const TOP_LANGUAGES: usize = 6;

pub struct GithubCollector {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    total_count: u64,
    #[serde(default)]
    items: Vec<SearchRepo>,
}

#[derive(Debug, Deserialize)]
struct SearchRepo {
    full_name: String,
    html_url: String,
    stargazers_count: u64,
    language: Option<String>,
}

impl GithubCollector {
    pub fn new(client: reqwest::Client, endpoint: String, token: Option<String>) -> Self {
        Self { client, endpoint, token }
    }
}

#[async_trait]
impl Collector for GithubCollector {
    type Record = CodeActivity;

    fn domain(&self) -> Domain {
        Domain::CodeActivity
    }

    async fn collect(&self) -> Result<CodeActivity, CollectorError> {
        let url = format!("{}/search/repositories", self.endpoint);
        let page_size = PAGE_SIZE.to_string();
        let mut request = self.client.get(&url).query(&[
            ("q", SEARCH_QUERY),
            ("sort", "stars"),
            ("order", "desc"),
            ("per_page", page_size.as_str()),
        ]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(CollectorError::SourceUnavailable(format!(
                "GitHub search returned {}",
                response.status()
            )));
        }

        let payload: SearchResponse = response.json().await?;
        Ok(map_search(payload))
    }

    fn fallback(&self) -> CodeActivity {
        CodeActivity::fallback()
    }
}

/// Condense a search page into the domain record. The list arrives ranked by
/// stars, so the first item drives the headline fields.
fn map_search(payload: SearchResponse) -> CodeActivity {
    let total_stars = payload.items.iter().map(|r| r.stargazers_count).sum();

    let (top_language, trending_repo) = match payload.items.first() {
        | Some(top) => (
            top.language.clone().unwrap_or_else(|| "Other".to_string()),
            top.full_name.clone(),
        ),
        | None => ("Unknown".to_string(), "N/A".to_string()),
    };

    let top_repos = payload
        .items
        .iter()
        .take(TOP_REPOS)
        .map(|r| RepoEntry {
            name: r.full_name.clone(),
            stars: r.stargazers_count,
            language: r.language.clone().unwrap_or_else(|| "Other".to_string()),
            url: r.html_url.clone(),
        })
        .collect();

    let mut counts: HashMap<String, u32> = HashMap::new();
    for repo in &payload.items {
        let language = repo.language.clone().unwrap_or_else(|| "Other".to_string());
        *counts.entry(language).or_insert(0) += 1;
    }
    let mut top_languages: Vec<LanguageShare> = counts
        .into_iter()
        .map(|(name, repo_count)| LanguageShare { name, repo_count })
        .collect();
    top_languages.sort_by(|a, b| b.repo_count.cmp(&a.repo_count).then(a.name.cmp(&b.name)));
    top_languages.truncate(TOP_LANGUAGES);

    CodeActivity {
        total_repos: payload.total_count,
        total_stars,
        top_language,
        trending_repo,
        top_repos,
        top_languages,
    }
}
