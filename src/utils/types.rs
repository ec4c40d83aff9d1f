//! Domain records shared between the collectors, the scorer and the HTTP
//! surface.
//!
//! Every field of every record is always populated – either from a successful
//! fetch or from the domain's fixed fallback – so downstream code never has to
//! ask whether a fetch succeeded. Wire names follow the frontend contract
//! (`githubStats`, `cryptoStats`, …), hence the camelCase serde renames.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The five independent data domains tracked by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Domain {
    CodeActivity,
    Market,
    News,
    Geo,
    Social,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            | Domain::CodeActivity => "code-activity",
            | Domain::Market => "market",
            | Domain::News => "news",
            | Domain::Geo => "geo",
            | Domain::Social => "social",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One repository in the code-activity ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoEntry {
    pub name: String,
    pub stars: u64,
    pub language: String,
    pub url: String,
}

/// Share of one language across the scanned repositories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageShare {
    pub name: String,
    pub repo_count: u32,
}

/// Code-hosting activity record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeActivity {
    pub total_repos: u64,
    pub total_stars: u64,
    pub top_language: String,
    pub trending_repo: String,
    pub top_repos: Vec<RepoEntry>,
    pub top_languages: Vec<LanguageShare>,
}

impl CodeActivity {
    /// Fixed substitute when the source is unreachable.
    pub fn fallback() -> Self {
        Self {
            total_repos: 0,
            total_stars: 0,
            top_language: "Unknown".to_string(),
            trending_repo: "N/A".to_string(),
            top_repos: Vec::new(),
            top_languages: Vec::new(),
        }
    }
}

/// Overall direction of the tracked market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketHealth {
    Bullish,
    Bearish,
    Unknown,
}

/// Short-term momentum bucket for the dominant asset's 24h change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendLabel {
    StrongUptrend,
    MildUptrend,
    Sideways,
    MildPullback,
    SharpSelloff,
    Unknown,
}

/// Latest quote for one watched asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairQuote {
    pub price: Option<f64>,
    pub change_24h: f64,
}

/// Cryptocurrency market record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSignal {
    pub dominant_asset: String,
    pub dominant_price: Option<f64>,
    pub dominant_change_24h: f64,
    pub market_health: MarketHealth,
    pub trend_label: TrendLabel,
    pub major_pairs: BTreeMap<String, PairQuote>,
}

impl MarketSignal {
    pub fn fallback() -> Self {
        Self {
            dominant_asset: "Unknown".to_string(),
            dominant_price: None,
            dominant_change_24h: 0.0,
            market_health: MarketHealth::Unknown,
            trend_label: TrendLabel::Unknown,
            major_pairs: BTreeMap::new(),
        }
    }
}

/// Qualitative sentiment bucket. Wire strings match the frontend contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    #[serde(rename = "Strongly Positive")]
    StronglyPositive,
    #[serde(rename = "Moderately Positive")]
    ModeratelyPositive,
    Neutral,
    #[serde(rename = "Moderately Negative")]
    ModeratelyNegative,
    #[serde(rename = "Strongly Negative")]
    StronglyNegative,
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            | SentimentLabel::StronglyPositive => "Strongly Positive",
            | SentimentLabel::ModeratelyPositive => "Moderately Positive",
            | SentimentLabel::Neutral => "Neutral",
            | SentimentLabel::ModeratelyNegative => "Moderately Negative",
            | SentimentLabel::StronglyNegative => "Strongly Negative",
        };
        f.write_str(s)
    }
}

/// One ranked headline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Headline {
    pub title: String,
    pub source: String,
    pub url: String,
}

/// Tech-news sentiment record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsSignal {
    /// Lexicon sentiment over the headline batch, in [-1, 1].
    pub sentiment_score: f64,
    pub label: SentimentLabel,
    pub top_headline: String,
    pub top_headlines: Vec<Headline>,
}

impl NewsSignal {
    pub fn fallback() -> Self {
        Self {
            sentiment_score: 0.0,
            label: SentimentLabel::Neutral,
            top_headline: "No headlines available".to_string(),
            top_headlines: Vec::new(),
        }
    }
}

/// Cloud coverage classification for the monitored regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloudCoverage {
    High,
    Unknown,
}

/// One monitored country/region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionInfo {
    pub code: String,
    pub name: String,
    pub population: u64,
}

/// Live weather at one tech-hub data center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubWeather {
    pub label: String,
    pub temp_c: f64,
    pub humidity: u32,
    pub condition: String,
}

/// Geographic / infrastructure record.
///
/// `latency_index` is a synthetic proxy (mean country area over a fixed
/// normalization constant), not a real network measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoSignal {
    pub top_region: String,
    pub latency_index: f64,
    pub cloud_coverage: CloudCoverage,
    pub sample_regions: Vec<RegionInfo>,
    pub hubs: Vec<HubWeather>,
}

impl GeoSignal {
    pub fn fallback() -> Self {
        Self {
            top_region: "Unknown".to_string(),
            latency_index: 0.5,
            cloud_coverage: CloudCoverage::Unknown,
            sample_regions: Vec::new(),
            hubs: Vec::new(),
        }
    }
}

/// Community chatter record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialSignal {
    pub sample_size: u32,
    /// `min(sample_size / 5000, 1)`.
    pub engagement_index: f64,
    pub average_comment_length: u32,
    pub thread_count: u32,
}

impl SocialSignal {
    pub fn fallback() -> Self {
        Self {
            sample_size: 0,
            engagement_index: 0.0,
            average_comment_length: 0,
            thread_count: 0,
        }
    }
}

/// The five domain records produced by one collection cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainSet {
    #[serde(rename = "githubStats")]
    pub code: CodeActivity,
    #[serde(rename = "cryptoStats")]
    pub market: MarketSignal,
    #[serde(rename = "newsSentiment")]
    pub news: NewsSignal,
    #[serde(rename = "infraStats")]
    pub geo: GeoSignal,
    #[serde(rename = "socialStats")]
    pub social: SocialSignal,
}

impl DomainSet {
    /// A set built entirely from fallback records – what a cycle publishes
    /// when every source is down.
    pub fn all_fallback() -> Self {
        Self {
            code: CodeActivity::fallback(),
            market: MarketSignal::fallback(),
            news: NewsSignal::fallback(),
            geo: GeoSignal::fallback(),
            social: SocialSignal::fallback(),
        }
    }
}

/// Qualitative bucket for the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreLabel {
    Thriving,
    Healthy,
    WatchClosely,
    Critical,
}

impl ScoreLabel {
    pub fn from_score(score: u8) -> Self {
        match score {
            | 80..=u8::MAX => ScoreLabel::Thriving,
            | 60..=79 => ScoreLabel::Healthy,
            | 40..=59 => ScoreLabel::WatchClosely,
            | _ => ScoreLabel::Critical,
        }
    }
}

impl fmt::Display for ScoreLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            | ScoreLabel::Thriving => "Thriving",
            | ScoreLabel::Healthy => "Healthy",
            | ScoreLabel::WatchClosely => "Watch Closely",
            | ScoreLabel::Critical => "Critical",
        };
        f.write_str(s)
    }
}

/// Immutable result of one completed scoring cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub score: u8,
    pub label: ScoreLabel,
    #[serde(flatten)]
    pub domains: DomainSet,
    /// Domains that fell back to their substitute record during this cycle.
    pub degraded: Vec<Domain>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_label_thresholds() {
        assert_eq!(ScoreLabel::from_score(100), ScoreLabel::Thriving);
        assert_eq!(ScoreLabel::from_score(80), ScoreLabel::Thriving);
        assert_eq!(ScoreLabel::from_score(79), ScoreLabel::Healthy);
        assert_eq!(ScoreLabel::from_score(60), ScoreLabel::Healthy);
        assert_eq!(ScoreLabel::from_score(59), ScoreLabel::WatchClosely);
        assert_eq!(ScoreLabel::from_score(40), ScoreLabel::WatchClosely);
        assert_eq!(ScoreLabel::from_score(39), ScoreLabel::Critical);
        assert_eq!(ScoreLabel::from_score(0), ScoreLabel::Critical);
    }

    #[test]
    fn snapshot_wire_shape_matches_frontend_contract() {
        let snapshot = Snapshot {
            timestamp: Utc::now(),
            score: 72,
            label: ScoreLabel::Healthy,
            domains: DomainSet::all_fallback(),
            degraded: vec![Domain::News],
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["score"], 72);
        assert!(json["githubStats"]["totalRepos"].is_number());
        assert_eq!(json["cryptoStats"]["marketHealth"], "Unknown");
        assert_eq!(json["newsSentiment"]["label"], "Neutral");
        assert_eq!(json["infraStats"]["topRegion"], "Unknown");
        assert!(json["socialStats"]["engagementIndex"].is_number());
        assert_eq!(json["degraded"][0], "news");
    }

    #[test]
    fn fallback_records_leave_no_field_unset() {
        // Round-trip through JSON: every field serializes and deserializes.
        let set = DomainSet::all_fallback();
        let json = serde_json::to_string(&set).unwrap();
        let back: DomainSet = serde_json::from_str(&json).unwrap();
        assert_eq!(set, back);
    }
}
