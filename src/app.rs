//! Wires configuration into the service graph.

use std::sync::Arc;

use tracing::info;

use socialhub_auth::jwt::TokenAuthenticator;
use socialhub_auth::password::PasswordValidator;
use socialhub_auth::rbac::RoleAuthorizer;
use socialhub_cache::{CacheManager, UserCache, UserCacheStore};
use socialhub_core::config::AppConfig;
use socialhub_core::result::AppResult;
use socialhub_core::traits::Notifier;
use socialhub_database::{DatabasePool, RoleRepository, UserDirectory, UserRepository};
use socialhub_service::{
    ConsoleNotifier, HttpNotifier, IdentityResolver, RegistrationSettings, RegistrationWorkflow,
    RetryingNotifier, UserService,
};

/// Fully constructed services for one command invocation.
#[derive(Debug)]
pub struct App {
    pub db: DatabasePool,
    pub authorizer: Arc<RoleAuthorizer>,
    pub resolver: IdentityResolver,
    pub registration: RegistrationWorkflow,
    pub users: UserService,
}

impl App {
    pub async fn build(config: &AppConfig) -> AppResult<Self> {
        // ── Step 1: Database ─────────────────────────────────────
        let db = DatabasePool::connect(&config.database).await?;
        let directory: Arc<dyn UserDirectory> = Arc::new(UserRepository::new(
            db.pool().clone(),
            db.query_timeout(),
        ));
        let roles = Arc::new(RoleRepository::new(db.pool().clone(), db.query_timeout()));

        // ── Step 2: Cache ────────────────────────────────────────
        let cache = build_cache(config).await?;

        // ── Step 3: Auth ─────────────────────────────────────────
        let authenticator = Arc::new(TokenAuthenticator::new(&config.auth));
        let authorizer = Arc::new(RoleAuthorizer::new(roles));

        // ── Step 4: Services ─────────────────────────────────────
        let mut resolver = IdentityResolver::new(authenticator.clone(), directory.clone());
        let mut users = UserService::new(directory.clone(), authenticator, authorizer.clone());
        if let Some(cache) = cache {
            resolver = resolver.with_cache(cache.clone());
            users = users.with_cache(cache);
        }

        let registration = RegistrationWorkflow::new(
            directory,
            PasswordValidator::new(&config.auth),
            build_notifier(config)?,
            RegistrationSettings::from_config(config),
        );

        Ok(Self {
            db,
            authorizer,
            resolver,
            registration,
            users,
        })
    }
}

async fn build_cache(config: &AppConfig) -> AppResult<Option<Arc<dyn UserCache>>> {
    if !config.cache.enabled {
        info!("User cache disabled");
        return Ok(None);
    }
    let manager = CacheManager::new(&config.cache).await?;
    info!(provider = %config.cache.provider, "User cache enabled");
    Ok(Some(Arc::new(UserCacheStore::from_config(
        manager.shared(),
        &config.cache,
    ))))
}

fn build_notifier(config: &AppConfig) -> AppResult<Arc<dyn Notifier>> {
    let transport: Arc<dyn Notifier> = if config.mail.endpoint.is_empty() && !config.is_production()
    {
        info!("No mail endpoint configured, printing invitations to stdout");
        Arc::new(ConsoleNotifier)
    } else {
        Arc::new(HttpNotifier::new(&config.mail)?)
    };
    Ok(Arc::new(RetryingNotifier::from_config(transport, &config.mail)))
}
