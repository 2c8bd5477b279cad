//! OpenF1 client facade
//!
//! Construction order: an unauthenticated transport first, then the auth
//! strategy (which may borrow that transport to reach the token endpoint),
//! then, once a token is in hand, a fresh config/transport pair carrying it.
//! The first transport is never modified after the fact.

use super::config::{ClientConfig, ClientConfigBuilder};
use super::endpoints::Endpoint;
use super::models::{
    CarData, Driver, Interval, Lap, Location, Meeting, Overtake, Pit, Position, RaceControl, Session,
    SessionResult, StartingGrid, Stint, TeamRadio, Weather,
};
use super::transport::Transport;
use crate::auth::{AuthManager, AuthProvider, NoAuthProvider, PasswordAuthProvider, TokenAuthProvider};
use crate::error::Result;
use log::{debug, info, warn};
use std::fmt;

/// Entry point for the OpenF1 API
#[derive(Debug)]
pub struct OpenF1Client {
    config: ClientConfig,
    transport: Transport,
    auth: AuthManager,
}

impl OpenF1Client {
    /// Build a client; with credentials and no token, authenticates eagerly.
    ///
    /// An eager authentication failure is logged and the client stays
    /// usable without a token. Configuration errors are returned.
    pub async fn new(config: ClientConfig) -> Result<Self> {
        let transport = Transport::new(config.clone())?;
        let auth = AuthManager::from_boxed(create_provider(&config, &transport)?);

        let mut client = Self {
            config,
            transport,
            auth,
        };

        if client.config.has_credentials() && !client.config.has_token() {
            if let Err(e) = client.setup_authenticated_client().await {
                warn!("Failed to authenticate: {}", e);
            }
        }

        info!("Created {}", client);
        Ok(client)
    }

    /// Builder for the underlying configuration
    pub fn builder() -> ClientConfigBuilder {
        ClientConfig::builder()
    }

    /// Client configured from `OPENF1_*` environment variables
    pub async fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?).await
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    /// Authenticate explicitly; failures propagate
    pub async fn authenticate(&mut self) -> Result<()> {
        self.setup_authenticated_client().await
    }

    async fn setup_authenticated_client(&mut self) -> Result<()> {
        let token = self.auth.authenticate().await?;

        let config = self.config.with_token(token.access_token);
        let transport = Transport::new(config.clone())?;

        let previous = std::mem::replace(&mut self.transport, transport);
        previous.close();
        self.config = config;

        debug!("Authentication successful, client updated with token");
        Ok(())
    }

    /// Drop the client and its transport; endpoint views already handed
    /// out keep their own handle to the connection pool
    pub fn close(self) {
        self.transport.close();
    }

    fn endpoint<T: super::models::Resource>(&self) -> Endpoint<T> {
        Endpoint::new(self.transport.clone())
    }

    pub fn car_data(&self) -> Endpoint<CarData> {
        self.endpoint()
    }

    pub fn drivers(&self) -> Endpoint<Driver> {
        self.endpoint()
    }

    pub fn intervals(&self) -> Endpoint<Interval> {
        self.endpoint()
    }

    pub fn laps(&self) -> Endpoint<Lap> {
        self.endpoint()
    }

    pub fn location(&self) -> Endpoint<Location> {
        self.endpoint()
    }

    pub fn meetings(&self) -> Endpoint<Meeting> {
        self.endpoint()
    }

    pub fn overtakes(&self) -> Endpoint<Overtake> {
        self.endpoint()
    }

    pub fn pit(&self) -> Endpoint<Pit> {
        self.endpoint()
    }

    pub fn position(&self) -> Endpoint<Position> {
        self.endpoint()
    }

    pub fn race_control(&self) -> Endpoint<RaceControl> {
        self.endpoint()
    }

    pub fn sessions(&self) -> Endpoint<Session> {
        self.endpoint()
    }

    pub fn session_result(&self) -> Endpoint<SessionResult> {
        self.endpoint()
    }

    pub fn starting_grid(&self) -> Endpoint<StartingGrid> {
        self.endpoint()
    }

    pub fn stints(&self) -> Endpoint<Stint> {
        self.endpoint()
    }

    pub fn team_radio(&self) -> Endpoint<TeamRadio> {
        self.endpoint()
    }

    pub fn weather(&self) -> Endpoint<Weather> {
        self.endpoint()
    }

    /// Raw transport, for endpoints without a typed accessor
    pub fn transport(&self) -> &Transport {
        &self.transport
    }
}

impl fmt::Display for OpenF1Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.is_authenticated() {
            "authenticated"
        } else {
            "unauthenticated"
        };
        write!(f, "OpenF1Client(base_url={}, {})", self.config.base_url(), status)
    }
}

impl ClientConfigBuilder {
    /// Validate the configuration and build a client from it
    pub async fn connect(self) -> Result<OpenF1Client> {
        OpenF1Client::new(self.build()?).await
    }
}

/// Token if configured, else password grant if credentials, else anonymous
fn create_provider(config: &ClientConfig, transport: &Transport) -> Result<Box<dyn AuthProvider>> {
    if let Some(token) = config.access_token() {
        return Ok(Box::new(TokenAuthProvider::new(token)?));
    }

    match (config.username(), config.password()) {
        (Some(username), Some(password)) => Ok(Box::new(PasswordAuthProvider::new(
            username,
            password,
            config.token_url(),
            transport.clone(),
        )?)),
        _ => Ok(Box::new(NoAuthProvider)),
    }
}
