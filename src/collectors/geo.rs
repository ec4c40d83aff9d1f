//! Geographic / infrastructure collector.
//!
//! Combines two sources: REST Countries for the monitored regions and
//! OpenWeatherMap for live conditions at a few tech-hub data centers. The
//! latency index derived here is a synthetic proxy (mean country area over a
//! fixed constant), not a real network measurement.

use super::{Collector, CollectorError};
use crate::utils::types::{CloudCoverage, Domain, GeoSignal, HubWeather, RegionInfo};
use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;

/// Tech-hub data centers monitored for weather: display label and
/// OpenWeatherMap query.
const HUBS: [(&str, &str); 3] = [
    ("New York, US", "New York,US"),
    ("Berlin, DE", "Berlin,DE"),
    ("Bengaluru, IN", "Bangalore,IN"),
];

/// Divisor turning mean country area (km²) into the unit-ish latency proxy.
const AREA_NORMALIZER: f64 = 10_000_000.0;

pub struct GeoCollector {
    client: reqwest::Client,
    countries_endpoint: String,
    weather_endpoint: String,
    country_codes: Vec<String>,
    weather_api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CountryDto {
    name: CountryName,
    cca2: String,
    region: Option<String>,
    #[serde(default)]
    population: u64,
    area: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CountryName {
    common: String,
}

#[derive(Debug, Deserialize)]
struct WeatherDto {
    main: WeatherMain,
    #[serde(default)]
    weather: Vec<WeatherCondition>,
}

#[derive(Debug, Deserialize)]
struct WeatherMain {
    temp: Option<f64>,
    humidity: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct WeatherCondition {
    main: String,
}

impl GeoCollector {
    pub fn new(
        client: reqwest::Client,
        countries_endpoint: String,
        weather_endpoint: String,
        country_codes: Vec<String>,
        weather_api_key: Option<String>,
    ) -> Self {
        Self { client, countries_endpoint, weather_endpoint, country_codes, weather_api_key }
    }

    /// Weather for every hub. Each hub falls back individually, so one flaky
    /// city never takes down the whole record.
    async fn hub_weather(&self) -> Vec<HubWeather> {
        let api_key = match &self.weather_api_key {
            | Some(key) => key,
            | None => {
                log::debug!("OPENWEATHER_API_KEY not set, hub weather degrades to defaults");
                return HUBS.iter().map(|(label, _)| fallback_hub(label)).collect();
            }
        };

        join_all(HUBS.iter().map(|(label, query)| self.one_hub(api_key, label, query))).await
    }

    async fn one_hub(&self, api_key: &str, label: &str, query: &str) -> HubWeather {
        match self.fetch_hub(api_key, label, query).await {
            | Ok(hub) => hub,
            | Err(err) => {
                log::warn!("weather fetch failed for {label}: {err}");
                fallback_hub(label)
            }
        }
    }

    async fn fetch_hub(
        &self,
        api_key: &str,
        label: &str,
        query: &str,
    ) -> Result<HubWeather, CollectorError> {
        let url = format!("{}/data/2.5/weather", self.weather_endpoint);
        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("appid", api_key), ("units", "metric")])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(CollectorError::SourceUnavailable(format!(
                "OpenWeatherMap returned {}",
                response.status()
            )));
        }

        let payload: WeatherDto = response.json().await?;
        Ok(HubWeather {
            label: label.to_string(),
            temp_c: payload.main.temp.unwrap_or(25.0),
            humidity: payload.main.humidity.unwrap_or(50),
            condition: payload
                .weather
                .first()
                .map(|w| w.main.clone())
                .unwrap_or_else(|| "Clear".to_string()),
        })
    }
}

#[async_trait]
impl Collector for GeoCollector {
    type Record = GeoSignal;

    fn domain(&self) -> Domain {
        Domain::Geo
    }

    async fn collect(&self) -> Result<GeoSignal, CollectorError> {
        let url = format!("{}/v3.1/alpha", self.countries_endpoint);
        let response = self
            .client
            .get(&url)
            .query(&[("codes", self.country_codes.join(",").as_str())])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(CollectorError::SourceUnavailable(format!(
                "REST Countries returned {}",
                response.status()
            )));
        }

        let countries: Vec<CountryDto> = response.json().await?;
        let mut signal = map_countries(countries)?;
        signal.hubs = self.hub_weather().await;
        Ok(signal)
    }

    fn fallback(&self) -> GeoSignal {
        GeoSignal::fallback()
    }
}

fn fallback_hub(label: &str) -> HubWeather {
    HubWeather {
        label: label.to_string(),
        temp_c: 25.0,
        humidity: 50,
        condition: "Unknown".to_string(),
    }
}

/// Region stats and the synthetic latency proxy from the fetched countries.
fn map_countries(countries: Vec<CountryDto>) -> Result<GeoSignal, CollectorError> {
    if countries.is_empty() {
        return Err(CollectorError::MalformedPayload("empty country payload".to_string()));
    }

    let mean_area = countries.iter().filter_map(|c| c.area).sum::<f64>() / countries.len() as f64;
    let latency_index = mean_area / AREA_NORMALIZER;

    let top_region = countries
        .iter()
        .max_by_key(|c| c.population)
        .and_then(|c| c.region.clone())
        .unwrap_or_else(|| "Unknown".to_string());

    let sample_regions = countries
        .iter()
        .map(|c| RegionInfo {
            code: c.cca2.clone(),
            name: c.name.common.clone(),
            population: c.population,
        })
        .collect();

    Ok(GeoSignal {
        top_region,
        latency_index,
        cloud_coverage: CloudCoverage::High,
        sample_regions,
        hubs: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn country(code: &str, name: &str, region: &str, population: u64, area: f64) -> CountryDto {
        CountryDto {
            name: CountryName { common: name.to_string() },
            cca2: code.to_string(),
            region: Some(region.to_string()),
            population,
            area: Some(area),
        }
    }

    #[test]
    fn latency_index_is_mean_area_over_constant() {
        let signal = map_countries(vec![
            country("US", "United States", "Americas", 331_000_000, 9_372_610.0),
            country("DE", "Germany", "Europe", 83_000_000, 357_114.0),
            country("IN", "India", "Asia", 1_380_000_000, 3_287_590.0),
        ])
        .unwrap();

        let expected = (9_372_610.0 + 357_114.0 + 3_287_590.0) / 3.0 / 10_000_000.0;
        assert!((signal.latency_index - expected).abs() < 1e-12);
        assert_eq!(signal.cloud_coverage, CloudCoverage::High);

        // Most populous country decides the headline region.
        assert_eq!(signal.top_region, "Asia");
        assert_eq!(signal.sample_regions.len(), 3);
        assert_eq!(signal.sample_regions[0].code, "US");
    }

    #[test]
    fn missing_area_counts_as_zero() {
        let mut partial = country("DE", "Germany", "Europe", 83_000_000, 0.0);
        partial.area = None;
        let signal =
            map_countries(vec![partial, country("IN", "India", "Asia", 1_380_000_000, 3_000_000.0)])
                .unwrap();
        assert!((signal.latency_index - 0.15).abs() < 1e-12);
    }

    #[test]
    fn empty_payload_is_an_error() {
        assert!(map_countries(Vec::new()).is_err());
    }

    #[test]
    fn hub_fallback_matches_documented_defaults() {
        let hub = fallback_hub("Berlin, DE");
        assert_eq!(hub.temp_c, 25.0);
        assert_eq!(hub.humidity, 50);
        assert_eq!(hub.condition, "Unknown");
    }
}
