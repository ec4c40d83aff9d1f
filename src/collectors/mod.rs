//! Domain collectors – one per external data source.
//!
//! Each collector makes a single attempt per cycle against its source and
//! never fails outward: any error is absorbed into the domain's fixed
//! fallback record and logged as a non-fatal event. The next scheduled cycle
//! is the retry mechanism.

pub mod coingecko;
pub mod geo;
pub mod github;
pub mod newsapi;
pub mod social;

use crate::utils::types::Domain;
use async_trait::async_trait;
use thiserror::Error;

/// Why a collector degraded to its fallback record. Never crosses the
/// collector boundary except as a log line and the `degraded` flag.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// Network failure, timeout or non-success response
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// A required credential is absent – degraded, not broken
    #[error("missing configuration: {0}")]
    ConfigurationMissing(String),

    /// The source answered with an unexpected shape
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl From<reqwest::Error> for CollectorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CollectorError::MalformedPayload(err.to_string())
        } else {
            CollectorError::SourceUnavailable(err.to_string())
        }
    }
}

/// A fetched record plus whether it is the fallback substitute. The record is
/// always fully populated either way; `degraded` only feeds the status banner.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub record: T,
    pub degraded: bool,
}

/// Trait implemented by each domain collector.
///
/// `collect` does the fallible work; `fetch` is the public face and always
/// resolves to a usable record.
#[async_trait]
pub trait Collector: Send + Sync {
    type Record: Send;

    fn domain(&self) -> Domain;

    /// One attempt against the external source.
    async fn collect(&self) -> Result<Self::Record, CollectorError>;

    /// Fixed substitute record for this domain.
    fn fallback(&self) -> Self::Record;

    /// Substitute used when the source is unconfigured rather than
    /// unreachable. Defaults to the plain fallback; collectors that can
    /// explain the missing configuration override this.
    fn unconfigured(&self) -> Self::Record {
        self.fallback()
    }

    /// Fetch this domain's record, substituting the fallback on any failure.
    async fn fetch(&self) -> Fetched<Self::Record> {
        match self.collect().await {
            | Ok(record) => Fetched { record, degraded: false },
            | Err(CollectorError::ConfigurationMissing(what)) => {
                log::warn!("{} collector unconfigured ({what}), using degraded record", self.domain());
                Fetched { record: self.unconfigured(), degraded: true }
            }
            | Err(err) => {
                log::warn!("{} collector degraded to fallback: {err}", self.domain());
                Fetched { record: self.fallback(), degraded: true }
            }
        }
    }
}
