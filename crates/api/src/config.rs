//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;

use anyhow::{bail, Context};
use chrono::Duration;

/// Insecure signing key used when `JWT_SECRET` is unset (dev only).
const DEV_JWT_SECRET: &str = "hrms-insecure-development-signing-key-change-me";
/// HS256 keys shorter than the hash output are rejected.
const MIN_SECRET_LEN: usize = 32;
const DEFAULT_TOKEN_TTL_MS: i64 = 24 * 60 * 60 * 1000;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Bootstrap administrator credentials (`username:password`).
#[derive(Clone, PartialEq, Eq)]
pub struct SeedAdmin {
    pub username: String,
    pub password: String,
}

impl core::fmt::Debug for SeedAdmin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SeedAdmin")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
    pub bind_addr: SocketAddr,
    pub seed_admin: Option<SeedAdmin>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) => {
                if secret.len() < MIN_SECRET_LEN {
                    bail!("JWT_SECRET must be at least {MIN_SECRET_LEN} bytes");
                }
                secret
            }
            None => {
                tracing::warn!("JWT_SECRET not set; using insecure dev default");
                DEV_JWT_SECRET.to_string()
            }
        };

        let ttl_ms = match lookup("JWT_EXPIRATION_MS") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .with_context(|| format!("JWT_EXPIRATION_MS is not an integer: {raw:?}"))?,
            None => DEFAULT_TOKEN_TTL_MS,
        };
        if ttl_ms < 1000 {
            bail!("JWT_EXPIRATION_MS must be at least 1000");
        }

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .with_context(|| format!("BCRYPT_COST is not an integer: {raw:?}"))?,
            None => bcrypt_default_cost(),
        };
        if !(4..=31).contains(&bcrypt_cost) {
            bail!("BCRYPT_COST must be between 4 and 31");
        }

        let bind_addr = lookup("HRMS_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("HRMS_BIND_ADDR is not a socket address")?;

        let seed_admin = match lookup("HRMS_SEED_ADMIN") {
            Some(raw) => {
                let Some((username, password)) = raw.split_once(':') else {
                    bail!("HRMS_SEED_ADMIN must look like username:password");
                };
                if username.is_empty() || password.is_empty() {
                    bail!("HRMS_SEED_ADMIN must look like username:password");
                }
                Some(SeedAdmin {
                    username: username.to_string(),
                    password: password.to_string(),
                })
            }
            None => None,
        };

        Ok(Self {
            jwt_secret,
            token_ttl: Duration::milliseconds(ttl_ms),
            bcrypt_cost,
            bind_addr,
            seed_admin,
        })
    }
}

fn bcrypt_default_cost() -> u32 {
    hrms_auth::BcryptHasher::default().cost()
}

impl core::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppConfig")
            .field("token_ttl", &self.token_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("bind_addr", &self.bind_addr)
            .field("seed_admin", &self.seed_admin)
            .finish_non_exhaustive()
    }
}
