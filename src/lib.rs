//! # DevFlow
//! Ecosystem intelligence aggregation and scoring engine.
//!
//! Five collectors pull from unrelated external sources (code hosting,
//! crypto markets, news, geo/weather, community chatter), each isolated in
//! its own failure domain. A pure scoring core normalizes the records into
//! 0–100 sub-scores and blends them into one composite ecosystem health
//! score, retained in a bounded trailing history for trend display. The
//! refresh engine runs the whole cycle on an interval or on manual trigger.

pub use crate::utils::error::{Error, Result};

pub mod collectors;
pub mod config;
pub mod dashboard;
pub mod engine;
pub mod score;
pub mod utils;
