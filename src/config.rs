use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

const DEV_JWT_SECRET: &str = "storefront-development-secret";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    pub page_size: usize,
    pub max_page_size: usize,
    pub seed_catalog: bool,
    pub google_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl_days: 30,
            page_size: 3,
            max_page_size: 100,
            seed_catalog: true,
            google_api_key: None,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let defaults = Self::default();

        let jwt_secret = var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, using the development secret");
            defaults.jwt_secret.clone()
        });

        Self {
            port: try_load("PORT", defaults.port),
            jwt_secret,
            token_ttl_days: try_load("TOKEN_TTL_DAYS", defaults.token_ttl_days),
            page_size: try_load("PAGE_SIZE", defaults.page_size).max(1),
            max_page_size: try_load("MAX_PAGE_SIZE", defaults.max_page_size).max(1),
            seed_catalog: try_load("SEED_CATALOG", defaults.seed_catalog),
            google_api_key: var("GOOGLE_API_KEY").ok(),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        info!("Environment variable {key} not found");
    })
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Ok(raw) = var(key) else {
        info!("{key} not set, using default: {default}");
        return default;
    };

    raw.parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
        default
    })
}
