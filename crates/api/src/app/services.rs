use std::sync::Arc;

use anyhow::Context;

use hrms_auth::{
    AuthorizationPolicy, Authenticator, BcryptHasher, CredentialStore, IdentityResolver,
    InMemoryCredentialStore, PasswordHasher, RequestAuthenticator, TokenCodec,
};
use hrms_core::AdminRecord;

use crate::authz;
use crate::config::{AppConfig, SeedAdmin};

/// Everything request handlers and middleware share. Built once at startup.
pub struct AppServices {
    pub store: Arc<dyn CredentialStore>,
    pub authenticator: Authenticator,
    pub request_authenticator: Arc<RequestAuthenticator>,
    pub policy: Arc<AuthorizationPolicy>,
}

impl AppServices {
    /// Wire the auth components around an existing credential store.
    pub fn new(config: &AppConfig, store: Arc<dyn CredentialStore>) -> anyhow::Result<Self> {
        let codec = Arc::new(TokenCodec::new(config.jwt_secret.as_bytes(), config.token_ttl));
        let hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptHasher::new(config.bcrypt_cost));
        let resolver = IdentityResolver::new(store.clone());

        let authenticator = Authenticator::new(resolver.clone(), hasher, codec.clone())
            .context("preparing login authenticator")?;

        Ok(Self {
            authenticator,
            request_authenticator: Arc::new(RequestAuthenticator::new(codec, resolver)),
            policy: Arc::new(authz::hrms_policy()),
            store,
        })
    }
}

/// Production wiring: in-memory store, seeded with the bootstrap admin if configured.
pub fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let store = Arc::new(InMemoryCredentialStore::new());
    let hasher = BcryptHasher::new(config.bcrypt_cost);

    if let Some(seed) = &config.seed_admin {
        seed_admin(&store, &hasher, seed)?;
    }

    AppServices::new(config, store)
}

fn seed_admin(
    store: &InMemoryCredentialStore,
    hasher: &BcryptHasher,
    seed: &SeedAdmin,
) -> anyhow::Result<()> {
    let hash = hasher
        .hash(&seed.password)
        .context("hashing seed admin password")?;
    store
        .insert_admin(AdminRecord::new(1, seed.username.clone(), hash))
        .context("seeding admin account")?;
    tracing::info!(username = %seed.username, "seeded administrator account");
    Ok(())
}
