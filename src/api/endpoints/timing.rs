//! Timing data: laps, intervals, positions, pit stops, stints and overtakes

use super::base::Endpoint;
use crate::api::models::{Interval, Lap, Overtake, Pit, Position, Stint};
use crate::api::query::{FilterBuilder, Scalar};
use crate::error::Result;

fn session_filters(session_key: impl Into<Scalar>, driver_number: Option<i32>) -> FilterBuilder {
    FilterBuilder::new()
        .eq("session_key", session_key)
        .set("driver_number", driver_number)
}

fn min_by_f64<T>(items: Vec<T>, key: impl Fn(&T) -> Option<f64>) -> Option<T> {
    items
        .into_iter()
        .filter_map(|item| key(&item).map(|k| (k, item)))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, item)| item)
}

impl Endpoint<Lap> {
    /// Quickest timed lap, optionally for one driver
    pub async fn fastest_lap(&self, session_key: impl Into<Scalar>, driver_number: Option<i32>) -> Result<Option<Lap>> {
        let laps = self.list(&session_filters(session_key, driver_number).build()).await?;
        Ok(min_by_f64(laps, |lap| lap.lap_duration))
    }

    pub async fn lap(&self, session_key: impl Into<Scalar>, driver_number: i32, lap_number: i32) -> Result<Option<Lap>> {
        let filters = session_filters(session_key, Some(driver_number))
            .eq("lap_number", lap_number)
            .build();
        self.first(&filters).await
    }

    /// Laps `start_lap..=end_lap`
    pub async fn lap_range(
        &self,
        session_key: impl Into<Scalar>,
        driver_number: i32,
        start_lap: i32,
        end_lap: i32,
    ) -> Result<Vec<Lap>> {
        let filters = session_filters(session_key, Some(driver_number))
            .between("lap_number", start_lap, end_lap, true)
            .build();
        self.list(&filters).await
    }

    /// Laps that did not start from the pit lane
    pub async fn flying_laps(&self, session_key: impl Into<Scalar>, driver_number: Option<i32>) -> Result<Vec<Lap>> {
        let filters = session_filters(session_key, driver_number)
            .eq("is_pit_out_lap", false)
            .build();
        self.list(&filters).await
    }
}

impl Endpoint<Interval> {
    /// Samples where the gap to the car ahead is under `max_interval` seconds
    pub async fn close_battles(&self, session_key: impl Into<Scalar>, max_interval: f64) -> Result<Vec<Interval>> {
        let filters = session_filters(session_key, None)
            .lt("interval", max_interval)
            .build();
        self.list(&filters).await
    }
}

impl Endpoint<Position> {
    pub async fn driver_positions(&self, session_key: impl Into<Scalar>, driver_number: i32) -> Result<Vec<Position>> {
        self.list(&session_filters(session_key, Some(driver_number)).build())
            .await
    }

    /// Every change that put a driver into `position`
    pub async fn at_position(&self, session_key: impl Into<Scalar>, position: i32) -> Result<Vec<Position>> {
        let filters = session_filters(session_key, None).eq("position", position).build();
        self.list(&filters).await
    }

    pub async fn leaders(&self, session_key: impl Into<Scalar>) -> Result<Vec<Position>> {
        self.at_position(session_key, 1).await
    }
}

impl Endpoint<Pit> {
    pub async fn driver_pit_stops(&self, session_key: impl Into<Scalar>, driver_number: i32) -> Result<Vec<Pit>> {
        self.list(&session_filters(session_key, Some(driver_number)).build())
            .await
    }

    pub async fn fastest_pit_stop(&self, session_key: impl Into<Scalar>, driver_number: Option<i32>) -> Result<Option<Pit>> {
        let stops = self.list(&session_filters(session_key, driver_number).build()).await?;
        Ok(min_by_f64(stops, |pit| pit.pit_duration))
    }

    pub async fn count_pit_stops(&self, session_key: impl Into<Scalar>, driver_number: i32) -> Result<usize> {
        Ok(self.driver_pit_stops(session_key, driver_number).await?.len())
    }
}

impl Endpoint<Stint> {
    /// A driver's stints in running order
    pub async fn driver_stints(&self, session_key: impl Into<Scalar>, driver_number: i32) -> Result<Vec<Stint>> {
        let mut stints = self
            .list(&session_filters(session_key, Some(driver_number)).build())
            .await?;
        stints.sort_by_key(|s| s.stint_number.unwrap_or(0));
        Ok(stints)
    }

    pub async fn by_compound(&self, session_key: impl Into<Scalar>, compound: &str) -> Result<Vec<Stint>> {
        let filters = session_filters(session_key, None)
            .eq("compound", compound.to_uppercase())
            .build();
        self.list(&filters).await
    }

    /// Compounds used, in stint order
    pub async fn tyre_strategy(&self, session_key: impl Into<Scalar>, driver_number: i32) -> Result<Vec<String>> {
        let stints = self.driver_stints(session_key, driver_number).await?;
        Ok(stints.into_iter().filter_map(|s| s.compound).collect())
    }
}

impl Endpoint<Overtake> {
    pub async fn driver_overtakes(&self, session_key: impl Into<Scalar>, driver_number: i32) -> Result<Vec<Overtake>> {
        self.list(&session_filters(session_key, Some(driver_number)).build())
            .await
    }

    pub async fn count_overtakes(&self, session_key: impl Into<Scalar>, driver_number: Option<i32>) -> Result<usize> {
        self.count(&session_filters(session_key, driver_number).build())
            .await
    }
}
