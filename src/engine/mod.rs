//! Refresh orchestration: the collect→score→publish cycle.
//!
//! One engine task owns the history and runs cycles sequentially, triggered
//! by a fixed interval or a manual request. The five collectors are fanned
//! out concurrently and rejoined before scoring, so a snapshot is only ever
//! published whole.

mod history;

pub use history::{History, HISTORY_CAPACITY};

use crate::collectors::coingecko::CoingeckoCollector;
use crate::collectors::geo::GeoCollector;
use crate::collectors::github::GithubCollector;
use crate::collectors::newsapi::NewsCollector;
use crate::collectors::social::SocialCollector;
use crate::collectors::Collector;
use crate::config::Config;
use crate::score;
use crate::utils::error::Result;
use crate::utils::types::{
    CodeActivity, Domain, DomainSet, GeoSignal, MarketSignal, NewsSignal, Snapshot, SocialSignal,
};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{watch, Notify, RwLock};
use tokio::time::MissedTickBehavior;

/// The five domain collectors, as trait objects so tests can substitute
/// stubs.
pub struct Collectors {
    pub code: Arc<dyn Collector<Record = CodeActivity>>,
    pub market: Arc<dyn Collector<Record = MarketSignal>>,
    pub news: Arc<dyn Collector<Record = NewsSignal>>,
    pub geo: Arc<dyn Collector<Record = GeoSignal>>,
    pub social: Arc<dyn Collector<Record = SocialSignal>>,
}

impl Collectors {
    /// Build the production collectors from configuration. All share one
    /// HTTP client carrying the request timeout that bounds each collector's
    /// single attempt per cycle.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("devflow/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.refresh.request_timeout_secs))
            .build()?;

        let sources = &config.sources;
        Ok(Self {
            code: Arc::new(GithubCollector::new(
                client.clone(),
                sources.github.endpoint.clone(),
                sources.github.token.clone(),
            )),
            market: Arc::new(CoingeckoCollector::new(
                client.clone(),
                sources.market.endpoint.clone(),
            )),
            news: Arc::new(NewsCollector::new(
                client.clone(),
                sources.news.endpoint.clone(),
                sources.news.api_key.clone(),
            )),
            geo: Arc::new(GeoCollector::new(
                client.clone(),
                sources.geo.countries_endpoint.clone(),
                sources.geo.weather_endpoint.clone(),
                sources.geo.country_codes.clone(),
                sources.geo.weather_api_key.clone(),
            )),
            social: Arc::new(SocialCollector::new(client, sources.social.endpoint.clone())),
        })
    }
}

/// State shared between the engine task and its handles. The engine is the
/// only writer; handles read immutable snapshots.
struct Shared {
    history: RwLock<History>,
    in_flight: AtomicBool,
    refresh: Notify,
    cycles: watch::Sender<u64>,
}

/// The refresh orchestrator. Owns the history and the current snapshot.
pub struct Engine {
    collectors: Collectors,
    shared: Arc<Shared>,
    interval: Duration,
    // Held so cycle notifications outlive short-lived subscribers.
    cycles_rx: watch::Receiver<u64>,
}

/// Cloneable read/trigger handle onto a running engine.
#[derive(Clone)]
pub struct EngineHandle {
    shared: Arc<Shared>,
    cycles_rx: watch::Receiver<u64>,
}

impl Engine {
    pub fn new(collectors: Collectors, interval: Duration) -> Self {
        let (cycles, cycles_rx) = watch::channel(0u64);
        let shared = Arc::new(Shared {
            history: RwLock::new(History::new()),
            in_flight: AtomicBool::new(false),
            refresh: Notify::new(),
            cycles,
        });
        Self { collectors, shared, interval, cycles_rx }
    }

    pub fn handle(&self) -> EngineHandle {
        EngineHandle { shared: Arc::clone(&self.shared), cycles_rx: self.cycles_rx.clone() }
    }

    /// Run cycles until cancelled: one immediately, then on every interval
    /// tick or accepted manual trigger. Cycles never overlap – the loop is
    /// sequential and mid-cycle manual requests are dropped by the handle.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        log::info!("refresh loop started (interval {:?})", self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = self.shared.refresh.notified() => {
                    log::debug!("manual refresh accepted");
                }
            }
            self.run_cycle().await;
        }
    }

    /// One full collect→score→publish cycle. Every collector resolves to a
    /// usable record, so this always publishes a complete snapshot.
    pub async fn run_cycle(&self) -> Snapshot {
        self.shared.in_flight.store(true, Ordering::SeqCst);
        let started = Instant::now();

        let (code, market, news, geo, social) = tokio::join!(
            self.collectors.code.fetch(),
            self.collectors.market.fetch(),
            self.collectors.news.fetch(),
            self.collectors.geo.fetch(),
            self.collectors.social.fetch(),
        );

        let mut degraded = Vec::new();
        for (hit, domain) in [
            (code.degraded, Domain::CodeActivity),
            (market.degraded, Domain::Market),
            (news.degraded, Domain::News),
            (geo.degraded, Domain::Geo),
            (social.degraded, Domain::Social),
        ] {
            if hit {
                degraded.push(domain);
            }
        }

        let domains = DomainSet {
            code: code.record,
            market: market.record,
            news: news.record,
            geo: geo.record,
            social: social.record,
        };
        let (score, label) = score::composite(&domains);
        let snapshot = Snapshot { timestamp: Utc::now(), score, label, domains, degraded };

        {
            let mut history = self.shared.history.write().await;
            history.append(snapshot.clone());
        }
        self.shared.cycles.send_modify(|count| *count += 1);
        self.shared.in_flight.store(false, Ordering::SeqCst);

        if snapshot.degraded.is_empty() {
            log::info!(
                "cycle complete in {:?}: score {} ({})",
                started.elapsed(),
                snapshot.score,
                snapshot.label
            );
        } else {
            let names: Vec<&str> = snapshot.degraded.iter().map(Domain::as_str).collect();
            log::info!(
                "cycle complete in {:?}: score {} ({}), degraded: {}",
                started.elapsed(),
                snapshot.score,
                snapshot.label,
                names.join(", ")
            );
        }

        snapshot
    }
}

impl EngineHandle {
    /// Latest published snapshot, if any cycle has completed yet.
    pub async fn current_snapshot(&self) -> Option<Snapshot> {
        self.shared.history.read().await.latest().cloned()
    }

    /// Retained snapshots, oldest first (at most `HISTORY_CAPACITY`).
    pub async fn history(&self) -> Vec<Snapshot> {
        self.shared.history.read().await.to_vec()
    }

    /// Fire-and-forget manual refresh. A request landing while a cycle is in
    /// flight is dropped, not queued.
    pub fn request_refresh(&self) {
        if self.shared.in_flight.load(Ordering::SeqCst) {
            log::debug!("manual refresh requested mid-cycle – coalesced");
            return;
        }
        self.shared.refresh.notify_one();
    }

    /// Subscribe to cycle completions. The value is the number of completed
    /// cycles since start.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.cycles_rx.clone()
    }

    /// Number of completed cycles since start.
    pub fn cycles_completed(&self) -> u64 {
        *self.cycles_rx.borrow()
    }
}
