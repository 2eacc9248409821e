//! Service configuration.
//!
//! Settings come from CLI flags first, environment second, defaults last.

use thiserror::Error;

use crate::api::constants::{DEFAULT_CAPACITY, MAX_CAPACITY};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";

/// Command line arguments structure.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub port: Option<u16>,
    pub capacity: Option<usize>,
    pub log_level: String,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    /// Capacity of the stack created at startup.
    pub default_capacity: usize,
}

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid PORT value: {value}")]
    InvalidPort { value: String },

    #[error("Stack capacity must be between 1 and {max}, got {value}", max = MAX_CAPACITY)]
    CapacityOutOfRange { value: usize },
}

/// Loads and validates the complete service configuration.
pub fn load_configuration(args: &CliArgs) -> Result<ServerConfig, ConfigError> {
    let port = match args.port {
        Some(port) => port,
        None => port_from_env()?,
    };
    if port == 0 {
        return Err(ConfigError::InvalidPort {
            value: "0".to_string(),
        });
    }

    let default_capacity = args.capacity.unwrap_or(DEFAULT_CAPACITY);
    if default_capacity < 1 || default_capacity as i64 > MAX_CAPACITY {
        return Err(ConfigError::CapacityOutOfRange {
            value: default_capacity,
        });
    }

    let config = ServerConfig {
        bind_addr: DEFAULT_BIND_ADDR.to_string(),
        port,
        default_capacity,
    };

    tracing::info!(
        "Configuration validated: port {}, default capacity {}",
        config.port,
        config.default_capacity
    );
    Ok(config)
}

fn port_from_env() -> Result<u16, ConfigError> {
    match std::env::var("PORT") {
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidPort { value }),
        Err(_) => Ok(DEFAULT_PORT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_port_wins_over_default() {
        let args = CliArgs {
            port: Some(8080),
            ..Default::default()
        };
        let config = load_configuration(&args).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.default_capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn port_zero_is_rejected() {
        let args = CliArgs {
            port: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            load_configuration(&args),
            Err(ConfigError::InvalidPort { .. })
        ));
    }

    #[test]
    fn capacity_outside_policy_range_is_rejected() {
        for capacity in [0usize, 101] {
            let args = CliArgs {
                port: Some(8080),
                capacity: Some(capacity),
                ..Default::default()
            };
            assert!(matches!(
                load_configuration(&args),
                Err(ConfigError::CapacityOutOfRange { .. })
            ));
        }
    }

    #[test]
    fn capacity_bounds_are_inclusive() {
        for capacity in [1usize, 100] {
            let args = CliArgs {
                port: Some(8080),
                capacity: Some(capacity),
                ..Default::default()
            };
            assert_eq!(
                load_configuration(&args).unwrap().default_capacity,
                capacity
            );
        }
    }
}
