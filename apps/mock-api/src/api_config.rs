use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use formloom_core::AppError;
use tracing_subscriber::EnvFilter;

/// Runtime settings of the mock form backend.
#[derive(Debug, Clone)]
pub struct MockApiConfig {
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub latency: Duration,
}

impl MockApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:4200".to_owned());
        let api_host = env::var("MOCK_API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("MOCK_API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(7261);
        let latency_ms = match env::var("MOCK_API_LATENCY_MS") {
            Ok(value) if !value.trim().is_empty() => {
                value.trim().parse::<u64>().map_err(|error| {
                    AppError::Validation(format!("invalid MOCK_API_LATENCY_MS: {error}"))
                })?
            }
            _ => 0,
        };

        Ok(Self {
            frontend_url,
            api_host,
            api_port,
            latency: Duration::from_millis(latency_ms),
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid MOCK_API_HOST '{}': {error}", self.api_host))
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
