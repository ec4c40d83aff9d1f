//! Integration tests for the refresh engine: fallback isolation, history
//! bounds, cycle notifications and single-flight coalescing. All collectors
//! are in-process stubs – no network.

use async_trait::async_trait;
use devflow::collectors::{Collector, CollectorError};
use devflow::engine::{Collectors, Engine, HISTORY_CAPACITY};
use devflow::utils::types::{
    CodeActivity, Domain, GeoSignal, MarketHealth, MarketSignal, NewsSignal, SentimentLabel,
    SocialSignal, TrendLabel,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Stub collector returning a canned record, optionally failing or stalling.
struct Stub<T> {
    domain: Domain,
    record: T,
    fallback: T,
    fail: bool,
    delay: Duration,
}

#[async_trait]
impl<T: Clone + Send + Sync> Collector for Stub<T> {
    type Record = T;

    fn domain(&self) -> Domain {
        self.domain
    }

    async fn collect(&self) -> Result<T, CollectorError> {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        if self.fail {
            Err(CollectorError::SourceUnavailable("simulated outage".to_string()))
        } else {
            Ok(self.record.clone())
        }
    }

    fn fallback(&self) -> T {
        self.fallback.clone()
    }
}

fn sample_code() -> CodeActivity {
    CodeActivity {
        total_repos: 1284,
        total_stars: 93_420,
        top_language: "Rust".to_string(),
        trending_repo: "devflow-hq/devflow".to_string(),
        top_repos: Vec::new(),
        top_languages: Vec::new(),
    }
}

fn sample_market() -> MarketSignal {
    MarketSignal {
        dominant_asset: "BTC".to_string(),
        dominant_price: Some(64_000.0),
        dominant_change_24h: 2.34,
        market_health: MarketHealth::Bullish,
        trend_label: TrendLabel::MildUptrend,
        major_pairs: BTreeMap::new(),
    }
}

fn sample_news() -> NewsSignal {
    NewsSignal {
        sentiment_score: 0.32,
        label: SentimentLabel::StronglyPositive,
        top_headline: "Developer tooling gains adoption".to_string(),
        top_headlines: Vec::new(),
    }
}

fn sample_geo() -> GeoSignal {
    GeoSignal { latency_index: 0.82, ..GeoSignal::fallback() }
}

fn sample_social() -> SocialSignal {
    SocialSignal {
        sample_size: 80,
        engagement_index: 0.016,
        average_comment_length: 182,
        thread_count: 17,
    }
}

/// Build a full collector set. `fail_market` simulates one unavailable
/// source; `delay` stalls every collector to keep a cycle in flight.
fn stub_collectors(fail_market: bool, delay: Duration) -> Collectors {
    Collectors {
        code: Arc::new(Stub {
            domain: Domain::CodeActivity,
            record: sample_code(),
            fallback: CodeActivity::fallback(),
            fail: false,
            delay,
        }),
        market: Arc::new(Stub {
            domain: Domain::Market,
            record: sample_market(),
            fallback: MarketSignal::fallback(),
            fail: fail_market,
            delay,
        }),
        news: Arc::new(Stub {
            domain: Domain::News,
            record: sample_news(),
            fallback: NewsSignal::fallback(),
            fail: false,
            delay,
        }),
        geo: Arc::new(Stub {
            domain: Domain::Geo,
            record: sample_geo(),
            fallback: GeoSignal::fallback(),
            fail: false,
            delay,
        }),
        social: Arc::new(Stub {
            domain: Domain::Social,
            record: sample_social(),
            fallback: SocialSignal::fallback(),
            fail: false,
            delay,
        }),
    }
}

#[tokio::test]
async fn cycle_with_one_failed_collector_still_publishes() {
    let engine = Engine::new(stub_collectors(true, Duration::ZERO), Duration::from_secs(3600));
    let handle = engine.handle();

    let snapshot = engine.run_cycle().await;

    // The failed domain carries its documented fallback, the others real data.
    assert_eq!(snapshot.domains.market, MarketSignal::fallback());
    assert_eq!(snapshot.domains.code, sample_code());
    assert_eq!(snapshot.domains.news, sample_news());
    assert_eq!(snapshot.degraded, vec![Domain::Market]);
    assert!(snapshot.score <= 100);

    // Published, not dropped.
    assert_eq!(handle.current_snapshot().await.unwrap(), snapshot);
    assert_eq!(handle.history().await.len(), 1);
}

#[tokio::test]
async fn healthy_cycle_reports_no_degradation() {
    let engine = Engine::new(stub_collectors(false, Duration::ZERO), Duration::from_secs(3600));
    let snapshot = engine.run_cycle().await;
    assert!(snapshot.degraded.is_empty());
}

#[tokio::test]
async fn history_is_bounded_and_time_ordered() {
    let engine = Engine::new(stub_collectors(false, Duration::ZERO), Duration::from_secs(3600));
    let handle = engine.handle();

    let mut published = Vec::new();
    for _ in 0..HISTORY_CAPACITY + 2 {
        published.push(engine.run_cycle().await);
    }

    let history = handle.history().await;
    assert_eq!(history.len(), HISTORY_CAPACITY);

    // The two oldest snapshots were evicted; the rest kept append order.
    assert_eq!(history, published[2..].to_vec());
    for pair in history.windows(2) {
        assert!(pair[0].timestamp <= pair[1].timestamp);
    }

    // The newest published snapshot is the current one.
    assert_eq!(handle.current_snapshot().await.unwrap(), *published.last().unwrap());
}

#[tokio::test]
async fn subscribers_observe_cycle_completions() {
    let engine = Engine::new(stub_collectors(false, Duration::ZERO), Duration::from_secs(3600));
    let handle = engine.handle();
    let mut rx = handle.subscribe();

    assert_eq!(handle.cycles_completed(), 0);
    engine.run_cycle().await;

    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), 1);
    assert_eq!(handle.cycles_completed(), 1);
}

#[tokio::test]
async fn manual_refresh_mid_cycle_is_coalesced() {
    // Slow collectors keep the first cycle in flight long enough to land
    // manual requests inside it.
    let engine = Engine::new(
        stub_collectors(false, Duration::from_millis(300)),
        Duration::from_secs(3600),
    );
    let handle = engine.handle();

    // The run loop fires its first cycle immediately.
    let runner = tokio::spawn(engine.run());
    sleep(Duration::from_millis(100)).await;

    // Both requests arrive while the first cycle is in flight – dropped.
    handle.request_refresh();
    handle.request_refresh();

    sleep(Duration::from_millis(600)).await;
    assert_eq!(handle.cycles_completed(), 1, "mid-cycle requests must not queue");
    assert_eq!(handle.history().await.len(), 1);

    // Once idle, a manual refresh starts exactly one new cycle.
    handle.request_refresh();
    sleep(Duration::from_millis(600)).await;
    assert_eq!(handle.cycles_completed(), 2);

    runner.abort();
}
