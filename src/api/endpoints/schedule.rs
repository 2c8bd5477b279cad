//! Meetings, sessions and drivers

use super::base::Endpoint;
use crate::api::constants::LATEST;
use crate::api::models::{Driver, Meeting, Session};
use crate::api::query::{Filters, Scalar};
use crate::error::Result;

impl Endpoint<Meeting> {
    pub async fn get(&self, meeting_key: impl Into<Scalar>) -> Result<Option<Meeting>> {
        self.first(&Filters::new().with("meeting_key", meeting_key.into())).await
    }

    pub async fn latest(&self) -> Result<Option<Meeting>> {
        self.get(LATEST).await
    }

    pub async fn by_year(&self, year: i32) -> Result<Vec<Meeting>> {
        self.list(&Filters::new().with("year", year)).await
    }

    pub async fn by_country(&self, country_name: &str) -> Result<Vec<Meeting>> {
        self.list(&Filters::new().with("country_name", country_name)).await
    }
}

impl Endpoint<Session> {
    pub async fn get(&self, session_key: impl Into<Scalar>) -> Result<Option<Session>> {
        self.first(&Filters::new().with("session_key", session_key.into())).await
    }

    pub async fn latest(&self) -> Result<Option<Session>> {
        self.get(LATEST).await
    }

    pub async fn for_meeting(&self, meeting_key: impl Into<Scalar>) -> Result<Vec<Session>> {
        self.list(&Filters::new().with("meeting_key", meeting_key.into())).await
    }

    pub async fn races(&self, year: Option<i32>) -> Result<Vec<Session>> {
        self.by_name("Race", year).await
    }

    pub async fn qualifying(&self, year: Option<i32>) -> Result<Vec<Session>> {
        self.by_name("Qualifying", year).await
    }

    /// Practice sessions; a number narrows to `Practice {n}`
    pub async fn practice(
        &self,
        meeting_key: Option<Scalar>,
        practice_number: Option<u32>,
    ) -> Result<Vec<Session>> {
        let filters = Filters::new().with_opt("meeting_key", meeting_key);

        match practice_number {
            Some(n) => {
                self.list(&filters.with("session_name", format!("Practice {}", n)))
                    .await
            }
            None => Ok(self
                .list(&filters)
                .await?
                .into_iter()
                .filter(|s| s.session_name.contains("Practice"))
                .collect()),
        }
    }

    async fn by_name(&self, session_name: &str, year: Option<i32>) -> Result<Vec<Session>> {
        let filters = Filters::new()
            .with("session_name", session_name)
            .with_opt("year", year);
        self.list(&filters).await
    }
}

impl Endpoint<Driver> {
    pub async fn by_number(&self, session_key: impl Into<Scalar>, driver_number: i32) -> Result<Option<Driver>> {
        let filters = Filters::new()
            .with("session_key", session_key.into())
            .with("driver_number", driver_number);
        self.first(&filters).await
    }

    /// Lookup by three-letter acronym, case-insensitive
    pub async fn by_acronym(&self, session_key: impl Into<Scalar>, acronym: &str) -> Result<Option<Driver>> {
        let filters = Filters::new()
            .with("session_key", session_key.into())
            .with("name_acronym", acronym.to_uppercase());
        self.first(&filters).await
    }

    pub async fn by_team(&self, session_key: impl Into<Scalar>, team_name: &str) -> Result<Vec<Driver>> {
        let filters = Filters::new()
            .with("session_key", session_key.into())
            .with("team_name", team_name);
        self.list(&filters).await
    }
}
