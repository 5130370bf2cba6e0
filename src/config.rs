use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use derive_more::Display;

#[derive(Debug, Display)]
#[display(fmt = "Failed to parse ${}: {}", variable, reason)]
pub struct ConfigError {
    variable: &'static str,
    reason: String,
}

impl std::error::Error for ConfigError {}

/// Runtime settings, read from the environment (and `.env`, when present).
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub database_url: String,
    pub pool_size: u32,
    pub seed_data: bool,
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Read the port on which to listen.
        let port: u16 = parse(&lookup, "PORT", 8080)?;

        // Read the IP address on which to listen
        let ip: IpAddr = parse(&lookup, "LISTEN_IP", IpAddr::from([127, 0, 0, 1]))?;

        let database_url = lookup("DATABASE_URL").ok_or(ConfigError {
            variable: "DATABASE_URL",
            reason: "must be set".into(),
        })?;

        let pool_size: u32 = parse(&lookup, "DB_POOL_SIZE", 10)?;
        if pool_size == 0 {
            return Err(ConfigError {
                variable: "DB_POOL_SIZE",
                reason: "must be at least 1".into(),
            });
        }

        let seed_data = match lookup("SEED_DATA") {
            None => true,
            Some(value) => !matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "false" | "0" | "no" | "off"
            ),
        };

        Ok(Config {
            listen_addr: SocketAddr::new(ip, port),
            database_url,
            pool_size,
            seed_data,
        })
    }
}

fn parse<T, F>(lookup: &F, variable: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(variable) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError {
            variable,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config = config(&[("DATABASE_URL", "postgres://localhost/beers")]).unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.pool_size, 10);
        assert!(config.seed_data);
    }

    #[test]
    fn database_url_is_required() {
        let err = config(&[]).unwrap_err();
        assert_eq!(err.to_string(), "Failed to parse $DATABASE_URL: must be set");
    }

    #[test]
    fn malformed_values_name_the_variable() {
        let err = config(&[("DATABASE_URL", "x"), ("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse $PORT"));

        let err = config(&[("DATABASE_URL", "x"), ("DB_POOL_SIZE", "0")]).unwrap_err();
        assert!(err.to_string().contains("DB_POOL_SIZE"));
    }

    #[test]
    fn seeding_can_be_disabled() {
        let config = config(&[
            ("DATABASE_URL", "x"),
            ("SEED_DATA", "false"),
            ("LISTEN_IP", "0.0.0.0"),
            ("PORT", "1234"),
        ])
        .unwrap();
        assert!(!config.seed_data);
        assert_eq!(config.listen_addr, "0.0.0.0:1234".parse::<SocketAddr>().unwrap());
    }
}
