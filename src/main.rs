//! Backend entry-point: wires REST endpoints and OpenAPI docs.

mod server;

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use std::env;
use std::net::SocketAddr;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use collabdoc::inbound::http::health::HealthState;
use collabdoc::outbound::persistence::DbPool;
use server::{MailerConfig, ServerConfig};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_SIZE: u32 = 10;

fn load_session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

fn parse_env_url(name: &str) -> std::io::Result<Option<Url>> {
    match env::var(name) {
        Ok(raw) => Url::parse(&raw)
            .map(Some)
            .map_err(|e| std::io::Error::other(format!("invalid {name}: {e}"))),
        Err(_) => Ok(None),
    }
}

fn load_pool_size() -> std::io::Result<u32> {
    match env::var("DB_POOL_SIZE") {
        Ok(raw) => raw
            .parse()
            .map_err(|e| std::io::Error::other(format!("invalid DB_POOL_SIZE: {e}"))),
        Err(_) => Ok(DEFAULT_POOL_SIZE),
    }
}

fn load_mailer_config() -> std::io::Result<Option<MailerConfig>> {
    let Some(endpoint) = parse_env_url("MAILER_ENDPOINT")? else {
        return Ok(None);
    };
    let Some(public_base_url) = parse_env_url("PUBLIC_BASE_URL")? else {
        return Err(std::io::Error::other(
            "MAILER_ENDPOINT is set but PUBLIC_BASE_URL is missing",
        ));
    };
    Ok(Some(MailerConfig::new(endpoint, public_base_url)))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let key = load_session_key()?;
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);

    let bind_addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.into())
        .parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;

    let mut config = ServerConfig::new(key, cookie_secure, SameSite::Lax, bind_addr);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        let pool = DbPool::connect(&database_url, load_pool_size()?)
            .await
            .map_err(|e| std::io::Error::other(format!("database pool failed: {e}")))?;
        config = config.with_db_pool(pool);
    }

    if let Some(mailer) = load_mailer_config()? {
        config = config.with_mailer(mailer);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = server::create_server(health_state, config)?;
    server.await
}
