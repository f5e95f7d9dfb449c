use std::env;
use std::net::{SocketAddr, ToSocketAddrs};

use error::ConfigError;

const DEFAULT_HOST: &'static str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5002;

/// Where the server listens. Read from `POSTS_HOST` and `POSTS_PORT`.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Config::from_vars(env::var("POSTS_HOST").ok(), env::var("POSTS_PORT").ok())
    }

    fn from_vars(host: Option<String>, port: Option<String>) -> Result<Config, ConfigError> {
        let mut config = Config::default();
        if let Some(host) = host {
            config.host = host;
        }
        if let Some(port) = port {
            config.port = port.trim()
                .parse()
                .map_err(|e| {
                    ConfigError::InvalidPort {
                        value: port.clone(),
                        source: e,
                    }
                })?;
        }
        Ok(config)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let address = format!("{}:{}", self.host, self.port);
        address.to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or(ConfigError::InvalidAddress(address))
    }
}
