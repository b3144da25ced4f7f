//! Server Configuration
//!
//! Command-line flags with environment fallbacks. `.env` is loaded before
//! parsing, so any of these may live there.
//!
//! Environment:
//!   QUILL_BIND - Listen address (default: 0.0.0.0:3000)
//!   QUILL_DB_PATH - SQLite file (default: quill.db)
//!   JWT_SECRET - HS256 signing secret (dev fallback when unset)
//!   BCRYPT_COST - bcrypt work factor, 4..=31 (default: 12)
//!   TOKEN_TTL_HOURS - Session lifetime (default: 24)

use clap::Parser;
use tracing::warn;

const DEV_JWT_SECRET: &str = "dev-secret-change-in-production-minimum-32-characters";

#[derive(Parser, Debug, Clone)]
#[command(name = "quill")]
#[command(about = "Quill - social blogging API server")]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "QUILL_BIND", default_value = "0.0.0.0:3000")]
    pub bind: String,

    /// SQLite database file
    #[arg(long, env = "QUILL_DB_PATH", default_value = "quill.db")]
    pub db_path: String,

    /// Secret used to sign session tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// bcrypt work factor
    #[arg(
        long,
        env = "BCRYPT_COST",
        default_value_t = bcrypt::DEFAULT_COST,
        value_parser = clap::value_parser!(u32).range(4..=31)
    )]
    pub bcrypt_cost: u32,

    /// Session token lifetime in hours
    #[arg(
        long,
        env = "TOKEN_TTL_HOURS",
        default_value_t = crate::auth::jwt::DEFAULT_TTL_HOURS,
        value_parser = clap::value_parser!(i64).range(1..)
    )]
    pub token_ttl_hours: i64,
}

impl Config {
    /// Signing secret, falling back to a fixed development value
    pub fn jwt_secret(&self) -> String {
        match self.jwt_secret.as_deref().map(str::trim) {
            Some(secret) if !secret.is_empty() => secret.to_string(),
            _ => {
                warn!("JWT_SECRET not set; using the development secret");
                DEV_JWT_SECRET.to_string()
            }
        }
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.token_ttl_hours)
    }
}
