//! Classification, starting grid and race control messages

use super::base::Endpoint;
use crate::api::models::{RaceControl, SessionResult, StartingGrid};
use crate::api::query::{FilterBuilder, Filters, Scalar};
use crate::error::Result;

// Unknown positions sort last
const UNPLACED: i32 = 999;

fn by_session(session_key: impl Into<Scalar>) -> FilterBuilder {
    FilterBuilder::new().eq("session_key", session_key)
}

impl Endpoint<SessionResult> {
    /// Top three, in finishing order
    pub async fn podium(&self, session_key: impl Into<Scalar>) -> Result<Vec<SessionResult>> {
        let mut results = self.list(&by_session(session_key).lte("position", 3).build()).await?;
        results.sort_by_key(|r| r.position.unwrap_or(UNPLACED));
        Ok(results)
    }

    pub async fn winner(&self, session_key: impl Into<Scalar>) -> Result<Option<SessionResult>> {
        self.first(&by_session(session_key).eq("position", 1).build())
            .await
    }

    pub async fn points_finishers(&self, session_key: impl Into<Scalar>) -> Result<Vec<SessionResult>> {
        self.list(&by_session(session_key).gt("points", 0).build())
            .await
    }
}

impl Endpoint<StartingGrid> {
    pub async fn pole_position(&self, session_key: impl Into<Scalar>) -> Result<Option<StartingGrid>> {
        self.first(&by_session(session_key).eq("position", 1).build())
            .await
    }

    pub async fn front_row(&self, session_key: impl Into<Scalar>) -> Result<Vec<StartingGrid>> {
        let mut grid = self.list(&by_session(session_key).lte("position", 2).build()).await?;
        grid.sort_by_key(|g| g.position.unwrap_or(UNPLACED));
        Ok(grid)
    }

    pub async fn driver_grid_position(&self, session_key: impl Into<Scalar>, driver_number: i32) -> Result<Option<i32>> {
        let entry = self
            .first(&by_session(session_key).eq("driver_number", driver_number).build())
            .await?;
        Ok(entry.and_then(|e| e.position))
    }

    /// Full grid sorted by position
    pub async fn full_grid(&self, session_key: impl Into<Scalar>) -> Result<Vec<StartingGrid>> {
        let mut grid = self.list(&by_session(session_key).build()).await?;
        grid.sort_by_key(|g| g.position.unwrap_or(UNPLACED));
        Ok(grid)
    }
}

impl Endpoint<RaceControl> {
    /// Flag messages, optionally narrowed to one flag (e.g. `YELLOW`)
    pub async fn flags(&self, session_key: impl Into<Scalar>, flag: Option<&str>) -> Result<Vec<RaceControl>> {
        let filters = Filters::new()
            .with("session_key", session_key.into())
            .with_opt("flag", flag);
        let messages = self.list(&filters).await?;
        Ok(messages.into_iter().filter(|m| m.flag.is_some()).collect())
    }

    /// Safety car and virtual safety car messages
    pub async fn safety_car_events(&self, session_key: impl Into<Scalar>) -> Result<Vec<RaceControl>> {
        let messages = self.list(&by_session(session_key).build()).await?;
        Ok(messages.into_iter().filter(is_safety_car).collect())
    }

    pub async fn driver_incidents(&self, session_key: impl Into<Scalar>, driver_number: i32) -> Result<Vec<RaceControl>> {
        self.list(&by_session(session_key).eq("driver_number", driver_number).build())
            .await
    }
}

fn is_safety_car(message: &RaceControl) -> bool {
    message.message.as_deref().is_some_and(|text| {
        let text = text.to_uppercase();
        text.contains("SAFETY CAR") || text.contains("VSC")
    })
}
