/// Default pool size when `DB_MAX_CONNECTIONS` is unset.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 20;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Database configuration loaded from environment variables.
///
/// | Env Var              | Default    |
/// |----------------------|------------|
/// | `DATABASE_URL`       | (required) |
/// | `DB_MAX_CONNECTIONS` | `20`       |
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_url: String,
    pub max_connections: u32,
}

impl DbConfig {
    /// Load configuration from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            None => DEFAULT_MAX_CONNECTIONS,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "DB_MAX_CONNECTIONS",
                        expected: "a positive integer",
                        value: raw,
                    })
                }
            },
        };

        Ok(Self {
            database_url,
            max_connections,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_max_connections() {
        let cfg = DbConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/itam")]))
            .unwrap();
        assert_eq!(cfg.database_url, "postgres://localhost/itam");
        assert_eq!(cfg.max_connections, DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn missing_url_is_an_error() {
        assert_matches!(
            DbConfig::from_lookup(lookup(&[])),
            Err(ConfigError::Missing("DATABASE_URL"))
        );
    }

    #[test]
    fn zero_connections_is_invalid() {
        let result = DbConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/itam"),
            ("DB_MAX_CONNECTIONS", "0"),
        ]));
        assert_matches!(result, Err(ConfigError::Invalid { name: "DB_MAX_CONNECTIONS", .. }));
    }

    #[test]
    fn explicit_max_connections_is_used() {
        let cfg = DbConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/itam"),
            ("DB_MAX_CONNECTIONS", " 5 "),
        ]))
        .unwrap();
        assert_eq!(cfg.max_connections, 5);
    }
}
