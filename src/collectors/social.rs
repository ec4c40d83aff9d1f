//! Community chatter collector backed by JSONPlaceholder comments.
//!
//! Stands in for Discord / Slack / forum discussion feeds: a bounded comment
//! sample approximates thread depth and engagement without touching a real
//! community API.

use super::{Collector, CollectorError};
use crate::utils::types::{Domain, SocialSignal};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeSet;

/// Comments fetched per cycle; kept small to stay polite to the mock API.
const SAMPLE_LIMIT: u32 = 80;

/// Sample size at which the engagement index saturates at 1.0.
const ENGAGEMENT_CEILING: f64 = 5000.0;

pub struct SocialCollector {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct CommentDto {
    #[serde(rename = "postId")]
    post_id: u64,
    body: String,
}

impl SocialCollector {
    pub fn new(client: reqwest::Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl Collector for SocialCollector {
    type Record = SocialSignal;

    fn domain(&self) -> Domain {
        Domain::Social
    }

    async fn collect(&self) -> Result<SocialSignal, CollectorError> {
        let url = format!("{}/comments", self.endpoint);
        let limit = SAMPLE_LIMIT.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[("_limit", limit.as_str())])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(CollectorError::SourceUnavailable(format!(
                "JSONPlaceholder returned {}",
                response.status()
            )));
        }

        let comments: Vec<CommentDto> = response.json().await?;
        Ok(map_comments(comments))
    }

    fn fallback(&self) -> SocialSignal {
        SocialSignal::fallback()
    }
}

fn map_comments(comments: Vec<CommentDto>) -> SocialSignal {
    let sample_size = comments.len() as u32;
    let engagement_index = (f64::from(sample_size) / ENGAGEMENT_CEILING).min(1.0);

    let average_comment_length = if comments.is_empty() {
        0
    } else {
        let total_chars: u64 = comments.iter().map(|c| c.body.chars().count() as u64).sum();
        (total_chars as f64 / comments.len() as f64).round() as u32
    };

    let thread_count = comments.iter().map(|c| c.post_id).collect::<BTreeSet<_>>().len() as u32;

    SocialSignal { sample_size, engagement_index, average_comment_length, thread_count }
}
