//! API Constants for the OpenF1 REST API

/// Default data API root
pub const DEFAULT_BASE_URL: &str = "https://api.openf1.org/v1";

/// Default OAuth2 token endpoint (absolute, outside the data API root)
pub const DEFAULT_TOKEN_URL: &str = "https://api.openf1.org/token";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of automatic retries
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Statuses retried by default
pub const DEFAULT_RETRY_STATUSES: [u16; 4] = [500, 502, 503, 504];

/// Base factor for exponential backoff, in milliseconds
pub const DEFAULT_BACKOFF_FACTOR_MS: u64 = 500;

/// Upper bound for a single backoff sleep, in seconds
pub const MAX_BACKOFF_SECS: u64 = 120;

/// Tokens are treated as expired this many seconds before their real expiry
pub const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

/// Sentinel accepted by session/meeting keyed filters
pub const LATEST: &str = "latest";

/// Outbound user agent
pub fn default_user_agent() -> String {
    format!("openf1-rust-client/{}", env!("CARGO_PKG_VERSION"))
}

/// Query parameter switching responses to CSV
pub mod format {
    pub const CSV_PARAM: &str = "csv";
    pub const CSV_VALUE: &str = "true";
}

/// Standard headers
pub mod headers {
    pub const AUTHORIZATION: &str = "Authorization";
    pub const USER_AGENT: &str = "User-Agent";
    pub const RETRY_AFTER: &str = "Retry-After";
    pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";
}

/// HTTP methods eligible for automatic retries
pub mod methods {
    pub const GET: &str = "GET";
    pub const POST: &str = "POST";
}

/// Endpoint paths, relative to the base URL
pub mod endpoints {
    pub const CAR_DATA: &str = "car_data";
    pub const DRIVERS: &str = "drivers";
    pub const INTERVALS: &str = "intervals";
    pub const LAPS: &str = "laps";
    pub const LOCATION: &str = "location";
    pub const MEETINGS: &str = "meetings";
    pub const OVERTAKES: &str = "overtakes";
    pub const PIT: &str = "pit";
    pub const POSITION: &str = "position";
    pub const RACE_CONTROL: &str = "race_control";
    pub const SESSIONS: &str = "sessions";
    pub const SESSION_RESULT: &str = "session_result";
    pub const STARTING_GRID: &str = "starting_grid";
    pub const STINTS: &str = "stints";
    pub const TEAM_RADIO: &str = "team_radio";
    pub const WEATHER: &str = "weather";

    pub const ALL: [&str; 16] = [
        CAR_DATA, DRIVERS, INTERVALS, LAPS, LOCATION, MEETINGS, OVERTAKES, PIT,
        POSITION, RACE_CONTROL, SESSIONS, SESSION_RESULT, STARTING_GRID, STINTS,
        TEAM_RADIO, WEATHER,
    ];
}

/// Join a base URL and a relative path with exactly one slash between them
pub fn join_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}
