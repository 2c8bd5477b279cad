//! High-frequency samples: car data, location, weather and team radio

use super::base::Endpoint;
use crate::api::models::{CarData, Location, TeamRadio, Weather, parse_timestamp};
use crate::api::query::{FilterBuilder, Filters, Scalar};
use crate::error::Result;
use std::cmp::Ordering;

/// Default threshold for [`Endpoint::<CarData>::high_speed_moments`], km/h
pub const DEFAULT_HIGH_SPEED: i32 = 300;

/// DRS values at or above this mean the flap is open
pub const DRS_OPEN: i32 = 10;

fn driver_filters(session_key: impl Into<Scalar>, driver_number: Option<i32>) -> FilterBuilder {
    FilterBuilder::new()
        .eq("session_key", session_key)
        .set("driver_number", driver_number)
}

impl Endpoint<CarData> {
    pub async fn high_speed_moments(
        &self,
        session_key: impl Into<Scalar>,
        driver_number: i32,
        min_speed: i32,
    ) -> Result<Vec<CarData>> {
        let filters = driver_filters(session_key, Some(driver_number))
            .gte("speed", min_speed)
            .build();
        self.list(&filters).await
    }

    pub async fn drs_activations(&self, session_key: impl Into<Scalar>, driver_number: i32) -> Result<Vec<CarData>> {
        let filters = driver_filters(session_key, Some(driver_number))
            .gte("drs", DRS_OPEN)
            .build();
        self.list(&filters).await
    }
}

impl Endpoint<Location> {
    /// Positions strictly inside a time window
    pub async fn track_positions(
        &self,
        session_key: impl Into<Scalar>,
        driver_number: i32,
        start_time: &str,
        end_time: &str,
    ) -> Result<Vec<Location>> {
        let filters = driver_filters(session_key, Some(driver_number))
            .between("date", start_time, end_time, false)
            .build();
        self.list(&filters).await
    }
}

/// Hottest and coldest samples by track temperature
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TemperatureExtremes {
    pub hottest: Option<Weather>,
    pub coldest: Option<Weather>,
}

impl Endpoint<Weather> {
    /// Most recent sample by timestamp
    pub async fn latest(&self, session_key: impl Into<Scalar>) -> Result<Option<Weather>> {
        let samples = self.list(&Filters::new().with("session_key", session_key.into())).await?;
        Ok(samples.into_iter().max_by(compare_dates))
    }

    pub async fn rain_periods(&self, session_key: impl Into<Scalar>) -> Result<Vec<Weather>> {
        let filters = Filters::new()
            .with("session_key", session_key.into())
            .with("rainfall", true);
        self.list(&filters).await
    }

    pub async fn temperature_extremes(&self, session_key: impl Into<Scalar>) -> Result<TemperatureExtremes> {
        let samples = self.list(&Filters::new().with("session_key", session_key.into())).await?;
        Ok(temperature_extremes(samples))
    }
}

fn compare_dates(a: &Weather, b: &Weather) -> Ordering {
    let parse = |w: &Weather| w.date.as_deref().and_then(parse_timestamp);
    parse(a).cmp(&parse(b))
}

fn temperature_extremes(samples: Vec<Weather>) -> TemperatureExtremes {
    let with_temp: Vec<(f64, Weather)> = samples
        .into_iter()
        .filter_map(|w| w.track_temperature.map(|t| (t, w)))
        .collect();

    let hottest = with_temp
        .iter()
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, w)| w.clone());
    let coldest = with_temp
        .iter()
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, w)| w.clone());

    TemperatureExtremes { hottest, coldest }
}

impl Endpoint<TeamRadio> {
    pub async fn driver_radio(&self, session_key: impl Into<Scalar>, driver_number: i32) -> Result<Vec<TeamRadio>> {
        self.list(&driver_filters(session_key, Some(driver_number)).build())
            .await
    }

    pub async fn radio_urls(&self, session_key: impl Into<Scalar>, driver_number: Option<i32>) -> Result<Vec<String>> {
        let radio = self.list(&driver_filters(session_key, driver_number).build()).await?;
        Ok(radio
            .into_iter()
            .filter_map(|r| r.recording_url)
            .filter(|url| !url.is_empty())
            .collect())
    }
}
