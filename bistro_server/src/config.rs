use std::{env, io::Write};

use bistro_common::{helpers::parse_boolean_flag, Secret};
use chrono::Duration;
use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use serde_json::json;
use stripe_tools::StripeConfig;
use tempfile::NamedTempFile;

use crate::errors::ServerError;

const DEFAULT_BISTRO_HOST: &str = "127.0.0.1";
const DEFAULT_BISTRO_PORT: u16 = 5000;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/bistro.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 25;
const DEFAULT_TOKEN_TTL: Duration = Duration::hours(3);
const GENERATED_SECRET_LENGTH: usize = 64;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    /// If true, the SQLite database file is created on start-up when it does not exist yet.
    pub create_database: bool,
    pub auth: AuthConfig,
    /// Payment gateway configuration
    pub stripe: StripeConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_BISTRO_HOST.to_string(),
            port: DEFAULT_BISTRO_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            create_database: true,
            auth: AuthConfig::default(),
            stripe: StripeConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("BISTRO_HOST").ok().unwrap_or_else(|| DEFAULT_BISTRO_HOST.into());
        let port = env::var("BISTRO_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for BISTRO_PORT. {e} Using the default, {DEFAULT_BISTRO_PORT}, \
                         instead."
                    );
                    DEFAULT_BISTRO_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_BISTRO_PORT);
        let database_url = env::var("BISTRO_DATABASE_URL").ok().unwrap_or_else(|| {
            info!("🪛️ BISTRO_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.into()
        });
        let max_connections = env::var("BISTRO_DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| {
                s.parse::<u32>()
                    .map_err(|e| warn!("🪛️ Invalid configuration value for BISTRO_DB_MAX_CONNECTIONS. {e}"))
                    .ok()
            })
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);
        let create_database = parse_boolean_flag(env::var("BISTRO_CREATE_DATABASE").ok(), true);
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        let stripe = StripeConfig::new_from_env_or_default();
        Self { host, port, database_url, max_connections, create_database, auth, stripe }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The shared secret used to sign and verify access tokens (HS256).
    pub access_token_secret: Secret<String>,
    /// How long an access token remains valid after it is issued.
    pub token_ttl: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        let mut tmpfile = NamedTempFile::new().ok().and_then(|f| f.keep().ok());
        warn!(
            "🚨️🚨️🚨️ The access token secret has not been set. I'm using a random value for this session. DO NOT \
             operate on production like this since every issued token becomes invalid on restart. 🚨️🚨️🚨️"
        );
        let secret: String =
            thread_rng().sample_iter(&Alphanumeric).take(GENERATED_SECRET_LENGTH).map(char::from).collect();
        match &mut tmpfile {
            Some((f, p)) => {
                let key_data = json!({ "access_token_secret": &secret }).to_string();
                match writeln!(f, "{key_data}") {
                    Ok(()) => warn!(
                        "🚨️🚨️🚨️ The access token secret for this session was written to {}. If this is a production \
                         instance, you are doing it wrong! Set the BISTRO_ACCESS_TOKEN_SECRET environment variable \
                         instead. 🚨️🚨️🚨️",
                        p.to_str().unwrap_or("???")
                    ),
                    Err(e) => warn!("🪛️ Could not write the access token secret to the temporary file. {e}"),
                }
            },
            None => {
                warn!("🪛️ Could not create a temporary file to store the access token secret.");
            },
        }
        Self { access_token_secret: Secret::new(secret), token_ttl: DEFAULT_TOKEN_TTL }
    }
}

impl AuthConfig {
    pub fn new<S: Into<String>>(secret: S, token_ttl: Duration) -> Self {
        Self { access_token_secret: Secret::new(secret.into()), token_ttl }
    }

    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret = env::var("BISTRO_ACCESS_TOKEN_SECRET")
            .map_err(|e| ServerError::ConfigurationError(format!("{e} [BISTRO_ACCESS_TOKEN_SECRET]")))?;
        let secret = Secret::new(secret);
        if !secret.is_set() {
            return Err(ServerError::ConfigurationError("BISTRO_ACCESS_TOKEN_SECRET is empty".to_string()));
        }
        let token_ttl = env::var("BISTRO_TOKEN_TTL_HOURS")
            .map_err(|_| {
                info!(
                    "🪛️ BISTRO_TOKEN_TTL_HOURS is not set. Using the default value of {} hrs.",
                    DEFAULT_TOKEN_TTL.num_hours()
                )
            })
            .and_then(|s| {
                s.parse::<i64>()
                    .ok()
                    .filter(|h| *h > 0)
                    .map(Duration::hours)
                    .ok_or_else(|| warn!("🪛️ Invalid configuration value for BISTRO_TOKEN_TTL_HOURS: {s}"))
            })
            .ok()
            .unwrap_or(DEFAULT_TOKEN_TTL);
        Ok(Self { access_token_secret: secret, token_ttl })
    }
}
