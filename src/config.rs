use dotenv::dotenv;
use std::{env, net::SocketAddr, time::Duration};

pub const DEFAULT_SERVICE_NAME: &str = "fastapi-echo";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a number, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("Invalid bind address {0:?}")]
    InvalidHost(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub service_name: String,
    pub worker_threads: usize,
    pub cors_max_age: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            worker_threads: num_cpus::get(),
            cors_max_age: Duration::from_secs(3600),
        }
    }
}

impl AppConfig {
    /// Reads the configuration from the process environment, after loading
    /// a `.env` file when one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let defaults = Self::default();

        Ok(Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port)?,
            service_name: env::var("SERVICE_NAME").unwrap_or(defaults.service_name),
            worker_threads: parse_var("WORKER_THREADS", defaults.worker_threads)?.max(1),
            cors_max_age: Duration::from_secs(parse_var(
                "CORS_MAX_AGE_SECS",
                defaults.cors_max_age.as_secs(),
            )?),
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidHost(self.host.clone()))
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
        Err(_) => Ok(default),
    }
}
