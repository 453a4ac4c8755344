use anyhow::{Context, Result, bail};

const DEFAULT_SESSION_TTL_HOURS: i64 = 72;
const MAX_SESSION_TTL_HOURS: i64 = 24 * 365 * 10;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub api_keys: String,
    pub session_ttl: chrono::Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            database_max_connections: optional_number(
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            )?,
            api_keys: std::env::var("API_KEYS").unwrap_or_default(),
            session_ttl: session_ttl(optional_number(
                "SESSION_TTL_HOURS",
                DEFAULT_SESSION_TTL_HOURS,
            )?)?,
        })
    }
}

fn optional_number<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number", name)),
        Err(_) => Ok(default),
    }
}

fn session_ttl(hours: i64) -> Result<chrono::Duration> {
    if !(1..=MAX_SESSION_TTL_HOURS).contains(&hours) {
        bail!(
            "SESSION_TTL_HOURS must be between 1 and {}",
            MAX_SESSION_TTL_HOURS
        );
    }

    chrono::Duration::try_hours(hours).context("SESSION_TTL_HOURS is out of range")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ttl_accepts_positive_hours() {
        assert_eq!(session_ttl(72).unwrap(), chrono::Duration::hours(72));
        assert_eq!(
            session_ttl(MAX_SESSION_TTL_HOURS).unwrap(),
            chrono::Duration::hours(MAX_SESSION_TTL_HOURS)
        );
    }

    #[test]
    fn test_session_ttl_rejects_out_of_range_hours() {
        for hours in [0, -1, MAX_SESSION_TTL_HOURS + 1, 3_000_000_000, i64::MAX] {
            assert!(session_ttl(hours).is_err(), "hours = {}", hours);
        }
    }

    #[test]
    fn test_session_ttl_keeps_expiry_representable() {
        let ttl = session_ttl(MAX_SESSION_TTL_HOURS).unwrap();
        assert!(
            chrono::Utc::now()
                .naive_utc()
                .checked_add_signed(ttl)
                .is_some()
        );
    }
}
