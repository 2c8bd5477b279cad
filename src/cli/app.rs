use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "openf1")]
#[command(version, about = "Query the OpenF1 motorsport data API")]
pub struct Cli {
    /// Endpoint to query (e.g. laps, car_data, sessions)
    pub endpoint: String,

    /// Filter expression, repeatable
    #[arg(short, long = "filter", value_name = "EXPR", help = "Filter (e.g. 'session_key=latest', 'speed>=315')")]
    pub filters: Vec<String>,

    /// Return raw CSV instead of JSON
    #[arg(long)]
    pub csv: bool,

    /// Print only the number of matching records
    #[arg(long, conflicts_with = "csv")]
    pub count: bool,

    /// Username for the password grant
    #[arg(short, long)]
    pub username: Option<String>,

    /// Password; prompted for when a username is given without one
    #[arg(short, long)]
    pub password: Option<String>,

    /// Pre-issued access token
    #[arg(short, long, conflicts_with_all = ["username", "password"])]
    pub token: Option<String>,

    /// Override the API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
