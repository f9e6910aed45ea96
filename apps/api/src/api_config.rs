use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use fieldkit_core::AppError;
use tracing_subscriber::EnvFilter;

/// Runtime configuration of the API binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub database_max_connections: u32,
    pub api_host: String,
    pub api_port: u16,
    pub auth_user_header: String,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(env::args().nth(1).as_deref(), |name| env::var(name).ok())
    }

    fn from_lookup(
        first_argument: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let migrate_only = first_argument == Some("migrate");

        let database_url = lookup("DATABASE_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| AppError::Validation("DATABASE_URL is required".to_owned()))?;
        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .map(|value| {
                value.parse::<u32>().map_err(|error| {
                    AppError::Validation(format!("invalid DATABASE_MAX_CONNECTIONS: {error}"))
                })
            })
            .transpose()?
            .unwrap_or(10);

        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = lookup("API_PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let auth_user_header = lookup("AUTH_USER_HEADER")
            .map(|value| value.trim().to_ascii_lowercase())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "x-authenticated-user".to_owned());

        Ok(Self {
            migrate_only,
            database_url,
            database_max_connections,
            api_host,
            api_port,
            auth_user_header,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
