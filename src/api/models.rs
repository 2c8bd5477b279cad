//! Data models for the OpenF1 API
//!
//! Every record keeps fields it does not know about in `extra`, so newer
//! server-side fields survive a round trip. Timestamps stay as the ISO 8601
//! strings the API returns; [`parse_timestamp`] turns them into `chrono`
//! values when ordering matters.

use super::constants::endpoints;
use chrono::{DateTime, FixedOffset};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A record type served by one API endpoint
pub trait Resource: DeserializeOwned + Serialize + Send + Sync + 'static {
    /// Path relative to the base URL
    const ENDPOINT: &'static str;
    /// Type name used in validation messages
    const NAME: &'static str;
}

macro_rules! resource {
    ($ty:ident, $endpoint:expr) => {
        impl Resource for $ty {
            const ENDPOINT: &'static str = $endpoint;
            const NAME: &'static str = stringify!($ty);
        }
    };
}

/// Parse an API timestamp (RFC 3339, with or without offset)
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw).ok().or_else(|| {
        chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc().fixed_offset())
    })
}

/// Seconds, or a textual marker such as `+1 LAP`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Gap {
    Seconds(f64),
    Text(String),
}

impl Gap {
    pub fn as_seconds(&self) -> Option<f64> {
        match self {
            Gap::Seconds(s) => Some(*s),
            Gap::Text(_) => None,
        }
    }
}

impl fmt::Display for Gap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gap::Seconds(s) => write!(f, "{:.3}", s),
            Gap::Text(t) => f.write_str(t),
        }
    }
}

/// Numeric classification, or a status marker such as `DNF`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassifiedPosition {
    Number(i64),
    Text(String),
}

/// Rain indicator; the API has served both booleans and 0/1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rainfall {
    Flag(bool),
    Level(i64),
}

impl Rainfall {
    pub fn is_raining(&self) -> bool {
        match self {
            Rainfall::Flag(b) => *b,
            Rainfall::Level(n) => *n != 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub meeting_key: i64,
    pub meeting_name: String,
    pub meeting_official_name: Option<String>,
    pub location: Option<String>,
    pub country_key: Option<i64>,
    pub country_code: Option<String>,
    pub country_name: Option<String>,
    pub circuit_key: Option<i64>,
    pub circuit_short_name: Option<String>,
    pub date_start: Option<String>,
    pub gmt_offset: Option<String>,
    pub year: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
resource!(Meeting, endpoints::MEETINGS);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub session_key: i64,
    pub session_name: String,
    pub session_type: Option<String>,
    pub meeting_key: Option<i64>,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub gmt_offset: Option<String>,
    pub country_key: Option<i64>,
    pub country_code: Option<String>,
    pub country_name: Option<String>,
    pub circuit_key: Option<i64>,
    pub circuit_short_name: Option<String>,
    pub year: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
resource!(Session, endpoints::SESSIONS);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub driver_number: i32,
    pub session_key: Option<i64>,
    pub meeting_key: Option<i64>,
    pub broadcast_name: Option<String>,
    pub full_name: Option<String>,
    pub name_acronym: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub team_name: Option<String>,
    pub team_colour: Option<String>,
    pub headshot_url: Option<String>,
    pub country_code: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
resource!(Driver, endpoints::DRIVERS);

/// Telemetry sample (~3.7 Hz)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarData {
    pub session_key: Option<i64>,
    pub meeting_key: Option<i64>,
    pub driver_number: Option<i32>,
    pub date: Option<String>,
    pub speed: Option<i32>,
    pub rpm: Option<i32>,
    pub n_gear: Option<i32>,
    pub throttle: Option<i32>,
    pub brake: Option<i32>,
    /// 0-1 off, 8 eligible, 10-14 open
    pub drs: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
resource!(CarData, endpoints::CAR_DATA);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub session_key: Option<i64>,
    pub meeting_key: Option<i64>,
    pub driver_number: Option<i32>,
    pub date: Option<String>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub z: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
resource!(Location, endpoints::LOCATION);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lap {
    pub session_key: Option<i64>,
    pub meeting_key: Option<i64>,
    pub driver_number: Option<i32>,
    pub lap_number: Option<i32>,
    pub date_start: Option<String>,
    pub lap_duration: Option<f64>,
    pub duration_sector_1: Option<f64>,
    pub duration_sector_2: Option<f64>,
    pub duration_sector_3: Option<f64>,
    pub i1_speed: Option<i32>,
    pub i2_speed: Option<i32>,
    pub st_speed: Option<i32>,
    pub is_pit_out_lap: Option<bool>,
    pub segments_sector_1: Option<Vec<Option<i32>>>,
    pub segments_sector_2: Option<Vec<Option<i32>>>,
    pub segments_sector_3: Option<Vec<Option<i32>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
resource!(Lap, endpoints::LAPS);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub session_key: Option<i64>,
    pub meeting_key: Option<i64>,
    pub driver_number: Option<i32>,
    pub date: Option<String>,
    pub gap_to_leader: Option<Gap>,
    pub interval: Option<Gap>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
resource!(Interval, endpoints::INTERVALS);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub session_key: Option<i64>,
    pub meeting_key: Option<i64>,
    pub driver_number: Option<i32>,
    pub date: Option<String>,
    pub position: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
resource!(Position, endpoints::POSITION);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pit {
    pub session_key: Option<i64>,
    pub meeting_key: Option<i64>,
    pub driver_number: Option<i32>,
    pub date: Option<String>,
    pub lap_number: Option<i32>,
    pub pit_duration: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
resource!(Pit, endpoints::PIT);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stint {
    pub session_key: Option<i64>,
    pub meeting_key: Option<i64>,
    pub driver_number: Option<i32>,
    pub stint_number: Option<i32>,
    pub lap_start: Option<i32>,
    pub lap_end: Option<i32>,
    /// SOFT, MEDIUM, HARD, INTERMEDIATE or WET
    pub compound: Option<String>,
    pub tyre_age_at_start: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
resource!(Stint, endpoints::STINTS);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceControl {
    pub session_key: Option<i64>,
    pub meeting_key: Option<i64>,
    pub driver_number: Option<i32>,
    pub date: Option<String>,
    pub lap_number: Option<i32>,
    pub category: Option<String>,
    pub flag: Option<String>,
    pub scope: Option<String>,
    pub sector: Option<i32>,
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
resource!(RaceControl, endpoints::RACE_CONTROL);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overtake {
    pub session_key: Option<i64>,
    pub meeting_key: Option<i64>,
    pub driver_number: Option<i32>,
    pub date: Option<String>,
    pub lap_number: Option<i32>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
resource!(Overtake, endpoints::OVERTAKES);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub session_key: Option<i64>,
    pub meeting_key: Option<i64>,
    pub date: Option<String>,
    pub air_temperature: Option<f64>,
    pub track_temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<i32>,
    pub rainfall: Option<Rainfall>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
resource!(Weather, endpoints::WEATHER);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRadio {
    pub session_key: Option<i64>,
    pub meeting_key: Option<i64>,
    pub driver_number: Option<i32>,
    pub date: Option<String>,
    pub recording_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
resource!(TeamRadio, endpoints::TEAM_RADIO);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub session_key: Option<i64>,
    pub meeting_key: Option<i64>,
    pub driver_number: Option<i32>,
    pub position: Option<i32>,
    pub classified_position: Option<ClassifiedPosition>,
    pub status: Option<String>,
    pub points: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
resource!(SessionResult, endpoints::SESSION_RESULT);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartingGrid {
    pub session_key: Option<i64>,
    pub meeting_key: Option<i64>,
    pub driver_number: Option<i32>,
    pub position: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
resource!(StartingGrid, endpoints::STARTING_GRID);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extra_fields_are_kept() {
        let lap: Lap = serde_json::from_value(json!({
            "lap_number": 12,
            "lap_duration": 91.743,
            "is_pit_out_lap": false,
            "segments_sector_1": [2049, null, 2051],
            "future_field": "x"
        }))
        .unwrap();

        assert_eq!(lap.lap_number, Some(12));
        assert_eq!(lap.segments_sector_1, Some(vec![Some(2049), None, Some(2051)]));
        assert_eq!(lap.extra.get("future_field"), Some(&json!("x")));
    }

    #[test]
    fn test_required_fields() {
        let missing: Result<Meeting, _> = serde_json::from_value(json!({"meeting_name": "Monaco"}));
        assert!(missing.is_err());

        let session: Session =
            serde_json::from_value(json!({"session_key": 9161, "session_name": "Race"})).unwrap();
        assert_eq!(session.session_type, None);
    }

    #[test]
    fn test_flexible_shapes() {
        let interval: Interval =
            serde_json::from_value(json!({"gap_to_leader": "+1 LAP", "interval": 1.25})).unwrap();
        assert_eq!(interval.gap_to_leader, Some(Gap::Text("+1 LAP".into())));
        assert_eq!(interval.interval.and_then(|g| g.as_seconds()), Some(1.25));

        let result: SessionResult = serde_json::from_value(json!({"classified_position": "DNF"})).unwrap();
        assert_eq!(result.classified_position, Some(ClassifiedPosition::Text("DNF".into())));

        let wet: Weather = serde_json::from_value(json!({"rainfall": 1})).unwrap();
        let dry: Weather = serde_json::from_value(json!({"rainfall": false})).unwrap();
        assert!(wet.rainfall.is_some_and(|r| r.is_raining()));
        assert!(!dry.rainfall.is_some_and(|r| r.is_raining()));
    }

    #[test]
    fn test_parse_timestamp_variants() {
        assert!(parse_timestamp("2023-09-16T13:03:35.292000+00:00").is_some());
        assert!(parse_timestamp("2023-09-16T13:03:35").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_resource_metadata() {
        assert_eq!(CarData::ENDPOINT, "car_data");
        assert_eq!(StartingGrid::NAME, "StartingGrid");
    }
}
