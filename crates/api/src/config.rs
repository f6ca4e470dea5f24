use std::str::FromStr;

use evently_core::checkout::{FeeSchedule, DEFAULT_FEE_FIXED_CENTS, DEFAULT_FEE_PERCENT};

use crate::auth::jwt::JwtConfig;

/// Server settings read once at startup.
///
/// | Env Var                    | Default                                              |
/// |----------------------------|------------------------------------------------------|
/// | `HOST`                     | `0.0.0.0`                                            |
/// | `PORT`                     | `3000`                                               |
/// | `CORS_ORIGINS`             | `http://localhost:3000` (comma-separated)            |
/// | `REQUEST_TIMEOUT_SECS`     | `30`                                                 |
/// | `PUBLIC_BASE_URL`          | `NEXT_PUBLIC_BASE_URL`, then `http://localhost:3000` |
/// | `CHECKOUT_FEE_FIXED_CENTS` | `100`                                                |
/// | `CHECKOUT_FEE_PERCENT`     | `2.5`                                                |
///
/// JWT settings are described on [`JwtConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Origin used in QR links and emails, without a trailing slash.
    pub public_base_url: String,
    pub jwt: JwtConfig,
    /// Platform fee added to every paid checkout.
    pub fees: FeeSchedule,
}

/// Parse `key` or fall back to `default`. Panics on an unparsable value.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}

impl ServerConfig {
    /// # Panics
    ///
    /// Panics on unparsable values, a negative fee, or missing JWT settings.
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        let public_base_url = ["PUBLIC_BASE_URL", "NEXT_PUBLIC_BASE_URL"]
            .iter()
            .find_map(|key| std::env::var(key).ok())
            .unwrap_or_else(|| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();

        let fees = FeeSchedule {
            fixed_cents: env_or("CHECKOUT_FEE_FIXED_CENTS", DEFAULT_FEE_FIXED_CENTS),
            percent: env_or("CHECKOUT_FEE_PERCENT", DEFAULT_FEE_PERCENT),
        };
        assert!(
            fees.fixed_cents >= 0 && fees.percent >= 0.0,
            "Checkout fees must not be negative"
        );

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            public_base_url,
            jwt: JwtConfig::from_env(),
            fees,
        }
    }
}
