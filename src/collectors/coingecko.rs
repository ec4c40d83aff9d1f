//! Market collector backed by the CoinGecko markets endpoint.
//!
//! Watches a fixed list of chains and infra assets that developers commonly
//! build on and reduces them to the single dominant asset by 24-hour change.

use super::{Collector, CollectorError};
use crate::utils::types::{Domain, MarketHealth, MarketSignal, PairQuote, TrendLabel};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;

/// CoinGecko ids and display symbols of the watched assets.
const WATCHLIST: [(&str, &str); 8] = [
    ("bitcoin", "BTC"),
    ("ethereum", "ETH"),
    ("solana", "SOL"),
    ("cardano", "ADA"),
    ("polkadot", "DOT"),
    ("chainlink", "LINK"),
    ("arbitrum", "ARB"),
    ("optimism", "OP"),
];

/// Asset that wins a tie on 24h change.
const PRIORITY_ASSET: &str = "bitcoin";

pub struct CoingeckoCollector {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct MarketRow {
    id: String,
    symbol: String,
    current_price: Option<f64>,
    price_change_percentage_24h: Option<f64>,
}

impl MarketRow {
    fn change_24h(&self) -> f64 {
        self.price_change_percentage_24h.unwrap_or(0.0)
    }
}

impl CoingeckoCollector {
    pub fn new(client: reqwest::Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl Collector for CoingeckoCollector {
    type Record = MarketSignal;

    fn domain(&self) -> Domain {
        Domain::Market
    }

    async fn collect(&self) -> Result<MarketSignal, CollectorError> {
        let url = format!("{}/api/v3/coins/markets", self.endpoint);
        let ids: Vec<&str> = WATCHLIST.iter().map(|(id, _)| *id).collect();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("vs_currency", "usd"),
                ("ids", ids.join(",").as_str()),
                ("order", "market_cap_desc"),
                ("sparkline", "false"),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(CollectorError::SourceUnavailable(format!(
                "CoinGecko returned {}",
                response.status()
            )));
        }

        let rows: Vec<MarketRow> = response.json().await?;
        map_rows(rows)
    }

    fn fallback(&self) -> MarketSignal {
        MarketSignal::fallback()
    }
}

/// Pick the dominant asset and classify the market from the fetched rows.
///
/// The priority asset seeds the scan and challengers must strictly exceed the
/// incumbent's 24h change, so ties resolve towards the priority asset.
fn map_rows(rows: Vec<MarketRow>) -> Result<MarketSignal, CollectorError> {
    if rows.is_empty() {
        return Err(CollectorError::MalformedPayload("empty market payload".to_string()));
    }

    let seed = rows
        .iter()
        .position(|r| r.id == PRIORITY_ASSET)
        .unwrap_or(0);
    let mut dominant = &rows[seed];
    for row in &rows {
        if row.change_24h() > dominant.change_24h() {
            dominant = row;
        }
    }

    let change = dominant.change_24h();
    let market_health = if change >= 0.0 { MarketHealth::Bullish } else { MarketHealth::Bearish };
    let trend_label = trend_for(change);

    let major_pairs: BTreeMap<String, PairQuote> = rows
        .iter()
        .map(|r| {
            (
                r.symbol.to_uppercase(),
                PairQuote { price: r.current_price, change_24h: r.change_24h() },
            )
        })
        .collect();

    Ok(MarketSignal {
        dominant_asset: dominant.symbol.to_uppercase(),
        dominant_price: dominant.current_price,
        dominant_change_24h: change,
        market_health,
        trend_label,
        major_pairs,
    })
}

/// Momentum bucket for a 24h percentage change.
fn trend_for(change: f64) -> TrendLabel {
    if change > 3.0 {
        TrendLabel::StrongUptrend
    } else if change > 0.5 {
        TrendLabel::MildUptrend
    } else if change < -3.0 {
        TrendLabel::SharpSelloff
    } else if change < -0.5 {
        TrendLabel::MildPullback
    } else {
        TrendLabel::Sideways
    }
}
