//! Tech-news sentiment collector backed by NewsAPI.
//!
//! Fetches a batch of developer-tooling headlines and runs the lexicon
//! analyzer over title + description of each article. Running without an API
//! key is a supported degraded mode, not a failure: the record explains the
//! missing configuration instead of pretending the source is down.

use super::{Collector, CollectorError};
use crate::score::sentiment;
use crate::utils::types::{Domain, Headline, NewsSignal};
use async_trait::async_trait;
use serde::Deserialize;

const QUERY: &str = "software development OR programming OR AI";
const PAGE_SIZE: u32 = 30;
const TOP_HEADLINES: usize = 3;

pub struct NewsCollector {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    source: Option<SourceRef>,
}

#[derive(Debug, Deserialize)]
struct SourceRef {
    name: Option<String>,
}

impl NewsCollector {
    pub fn new(client: reqwest::Client, endpoint: String, api_key: Option<String>) -> Self {
        Self { client, endpoint, api_key }
    }
}

#[async_trait]
impl Collector for NewsCollector {
    type Record = NewsSignal;

    fn domain(&self) -> Domain {
        Domain::News
    }

    async fn collect(&self) -> Result<NewsSignal, CollectorError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| CollectorError::ConfigurationMissing("NEWS_API_KEY".to_string()))?;

        let url = format!("{}/v2/everything", self.endpoint);
        let page_size = PAGE_SIZE.to_string();
        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", api_key)
            .query(&[
                ("q", QUERY),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
                ("language", "en"),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(CollectorError::SourceUnavailable(format!(
                "NewsAPI returned {}",
                response.status()
            )));
        }

        let payload: NewsResponse = response.json().await?;
        Ok(map_articles(payload.articles))
    }

    fn fallback(&self) -> NewsSignal {
        NewsSignal::fallback()
    }

    fn unconfigured(&self) -> NewsSignal {
        NewsSignal {
            top_headline: "News source not configured: set NEWS_API_KEY to enable headline sentiment"
                .to_string(),
            ..NewsSignal::fallback()
        }
    }
}

/// Run sentiment over the whole batch and keep the first few headlines.
fn map_articles(articles: Vec<Article>) -> NewsSignal {
    let texts: Vec<String> = articles
        .iter()
        .map(|a| {
            format!(
                "{} {}",
                a.title.clone().unwrap_or_default(),
                a.description.clone().unwrap_or_default()
            )
        })
        .collect();
    let sentiment = sentiment::analyze(&texts);

    let top_headlines: Vec<Headline> = articles
        .iter()
        .take(TOP_HEADLINES)
        .map(|a| Headline {
            title: a.title.clone().unwrap_or_else(|| "(untitled)".to_string()),
            source: a
                .source
                .as_ref()
                .and_then(|s| s.name.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            url: a.url.clone().unwrap_or_default(),
        })
        .collect();

    let top_headline = top_headlines
        .first()
        .map(|h| h.title.clone())
        .unwrap_or_else(|| "No headlines available".to_string());

    NewsSignal {
        sentiment_score: sentiment.score,
        label: sentiment.label,
        top_headline,
        top_headlines,
    }
}
