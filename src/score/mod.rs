//! Normalization and composite scoring.
//!
//! Everything here is pure arithmetic over the domain records – no I/O, no
//! retained state – so a given `DomainSet` always produces the same score.

pub mod sentiment;

use crate::utils::types::{CloudCoverage, DomainSet, ScoreLabel};

/// Canonical composite weights. The per-domain sub-scores are each in
/// [0, 100]; the weights sum to 1.0 so the composite stays there too.
const W_CODE: f64 = 0.30;
const W_MARKET: f64 = 0.20;
const W_NEWS: f64 = 0.20;
const W_GEO: f64 = 0.15;
const W_SOCIAL: f64 = 0.15;

/// Bound `value` to `[min, max]`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Linearly map `value` from `[min, max]` onto an integer in `[0, 100]`.
///
/// Values outside the range clamp to the nearest bound. A degenerate range
/// (`min == max`) maps everything to 50 rather than dividing by zero.
pub fn scale_to_100(value: f64, min: f64, max: f64) -> u8 {
    if min == max {
        return 50;
    }
    let scaled = (value - min) / (max - min) * 100.0;
    clamp(scaled.round(), 0.0, 100.0) as u8
}

/// The five normalized sub-scores feeding the composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubScores {
    pub code: u8,
    pub market: u8,
    pub news: u8,
    pub geo: u8,
    pub social: u8,
}

/// Derive the per-domain sub-scores from one cycle's records.
pub fn sub_scores(domains: &DomainSet) -> SubScores {
    let code = (0.4 * f64::from(scale_to_100(domains.code.total_repos as f64, 100.0, 5000.0))
        + 0.6 * f64::from(scale_to_100(domains.code.total_stars as f64, 1000.0, 200_000.0)))
    .round() as u8;

    let market = clamp(
        (50.0 + domains.market.dominant_change_24h / 10.0 * 50.0).round(),
        0.0,
        100.0,
    ) as u8;

    let news = clamp(((domains.news.sentiment_score + 1.0) * 50.0).round(), 0.0, 100.0) as u8;

    let coverage_bonus = match domains.geo.cloud_coverage {
        | CloudCoverage::High => 90.0,
        | CloudCoverage::Unknown => 60.0,
    };
    let geo = (0.6 * f64::from(scale_to_100(1.0 - domains.geo.latency_index, 0.0, 1.0))
        + 0.4 * coverage_bonus)
        .round() as u8;

    let social = scale_to_100(domains.social.engagement_index, 0.0, 1.0);

    SubScores { code, market, news, geo, social }
}

/// Blend the sub-scores into the composite ecosystem score and its label.
pub fn composite(domains: &DomainSet) -> (u8, ScoreLabel) {
    let s = sub_scores(domains);
    let weighted = W_CODE * f64::from(s.code)
        + W_MARKET * f64::from(s.market)
        + W_NEWS * f64::from(s.news)
        + W_GEO * f64::from(s.geo)
        + W_SOCIAL * f64::from(s.social);

    // The weights sum to 1.0, so this clamp is a guard, not a correction.
    let score = clamp(weighted.round(), 0.0, 100.0) as u8;
    (score, ScoreLabel::from_score(score))
}
