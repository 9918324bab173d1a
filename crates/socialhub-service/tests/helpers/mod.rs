//! Shared fixtures and test doubles.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use socialhub_auth::jwt::TokenAuthenticator;
use socialhub_auth::password::{PasswordHasher, PasswordValidator};
use socialhub_cache::UserCache;
use socialhub_core::config::AuthConfig;
use socialhub_core::error::AppError;
use socialhub_core::result::AppResult;
use socialhub_core::traits::Notifier;
use socialhub_database::{MemoryUserDirectory, UserDirectory, UserReader};
use socialhub_entity::invitation::InvitationToken;
use socialhub_entity::user::{NewUser, User};
use socialhub_service::{RegisterUser, RegistrationSettings, RegistrationWorkflow, RetryingNotifier};

pub const FRONTEND_URL: &str = "http://localhost:4000";

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        token_secret: "test-secret".to_string(),
        token_issuer: "socialhub-test".to_string(),
        ..AuthConfig::default()
    }
}

pub fn authenticator() -> Arc<TokenAuthenticator> {
    Arc::new(TokenAuthenticator::new(&auth_config()))
}

pub fn settings() -> RegistrationSettings {
    RegistrationSettings {
        invitation_ttl: Duration::from_secs(72 * 3600),
        frontend_url: FRONTEND_URL.to_string(),
        sandbox: true,
    }
}

pub fn workflow(
    directory: Arc<dyn UserDirectory>,
    notifier: Arc<dyn Notifier>,
) -> RegistrationWorkflow {
    RegistrationWorkflow::new(
        directory,
        PasswordValidator::new(&auth_config()),
        notifier,
        settings(),
    )
}

/// Three attempts, one second base backoff.
pub fn retrying(inner: Arc<dyn Notifier>) -> Arc<dyn Notifier> {
    Arc::new(RetryingNotifier::new(inner, 3, Duration::from_millis(1000)))
}

pub fn request(name: &str) -> RegisterUser {
    RegisterUser {
        username: name.to_string(),
        email: format!("{name}@example.com"),
        password: format!("{name}-password"),
    }
}

/// Create an active user directly in the directory.
pub async fn active_user(directory: &MemoryUserDirectory, name: &str, role: Option<&str>) -> User {
    seed_user(directory, name, role, "unused".to_string()).await
}

/// Create an active user whose password is `{name}-password`.
pub async fn active_user_with_password(directory: &MemoryUserDirectory, name: &str) -> User {
    let hash = PasswordHasher::new()
        .hash_password(&format!("{name}-password"))
        .unwrap();
    seed_user(directory, name, None, hash).await
}

async fn seed_user(
    directory: &MemoryUserDirectory,
    name: &str,
    role: Option<&str>,
    password_hash: String,
) -> User {
    let token = InvitationToken::generate();
    let new_user = NewUser {
        username: name.to_string(),
        email: format!("{name}@example.com"),
        password_hash,
        role_name: role.map(str::to_string),
    };
    directory
        .create_and_invite(&new_user, token.hash(), Duration::from_secs(3600))
        .await
        .unwrap();
    directory.activate(token.plaintext()).await.unwrap()
}

/// Pull the plaintext invitation back out of an activation URL.
pub fn token_from_url(url: &str) -> String {
    url.rsplit('/').next().unwrap().to_string()
}

// ── Notifiers ──────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub template_id: String,
    pub display_name: String,
    pub email: String,
    pub vars: serde_json::Value,
    pub sandbox: bool,
}

/// Accepts every message and remembers it.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<SentMessage>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(
        &self,
        template_id: &str,
        display_name: &str,
        email: &str,
        vars: &serde_json::Value,
        sandbox: bool,
    ) -> AppResult<u16> {
        self.sent.lock().unwrap().push(SentMessage {
            template_id: template_id.to_string(),
            display_name: display_name.to_string(),
            email: email.to_string(),
            vars: vars.clone(),
            sandbox,
        });
        Ok(202)
    }
}

/// Fails every attempt, either with an error or a given status.
#[derive(Debug, Default)]
pub struct FailingNotifier {
    pub attempts: AtomicU32,
    pub status: Option<u16>,
}

impl FailingNotifier {
    pub fn with_status(status: u16) -> Self {
        Self {
            attempts: AtomicU32::new(0),
            status: Some(status),
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(
        &self,
        _template_id: &str,
        _display_name: &str,
        _email: &str,
        _vars: &serde_json::Value,
        _sandbox: bool,
    ) -> AppResult<u16> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        match self.status {
            Some(status) => Ok(status),
            None => Err(AppError::external_service("connection refused")),
        }
    }
}

/// Fails the first `failures` attempts, then accepts.
#[derive(Debug)]
pub struct FlakyNotifier {
    pub failures: u32,
    pub attempts: AtomicU32,
    pub inner: RecordingNotifier,
}

impl FlakyNotifier {
    pub fn new(failures: u32) -> Self {
        Self {
            failures,
            attempts: AtomicU32::new(0),
            inner: RecordingNotifier::default(),
        }
    }
}

#[async_trait]
impl Notifier for FlakyNotifier {
    async fn send(
        &self,
        template_id: &str,
        display_name: &str,
        email: &str,
        vars: &serde_json::Value,
        sandbox: bool,
    ) -> AppResult<u16> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.failures {
            return Ok(503);
        }
        self.inner
            .send(template_id, display_name, email, vars, sandbox)
            .await
    }
}

// ── Directories ────────────────────────────────────────────

/// A directory whose deletes always fail.
#[derive(Debug, Default)]
pub struct UndeletableDirectory {
    pub inner: MemoryUserDirectory,
}

#[async_trait]
impl UserReader for UndeletableDirectory {
    async fn get_by_id(&self, id: i64) -> AppResult<User> {
        self.inner.get_by_id(id).await
    }

    async fn get_by_email(&self, email: &str) -> AppResult<User> {
        self.inner.get_by_email(email).await
    }
}

#[async_trait]
impl UserDirectory for UndeletableDirectory {
    async fn create(&self, new_user: &NewUser) -> AppResult<User> {
        self.inner.create(new_user).await
    }

    async fn create_and_invite(
        &self,
        new_user: &NewUser,
        invitation_hash: &str,
        ttl: Duration,
    ) -> AppResult<User> {
        self.inner.create_and_invite(new_user, invitation_hash, ttl).await
    }

    async fn activate(&self, plaintext_token: &str) -> AppResult<User> {
        self.inner.activate(plaintext_token).await
    }

    async fn delete(&self, _user_id: i64) -> AppResult<()> {
        Err(AppError::storage("database is read-only"))
    }
}

/// Counts `get_by_id` calls that reach the directory.
#[derive(Debug)]
pub struct CountingReader {
    pub inner: Arc<MemoryUserDirectory>,
    pub by_id: AtomicUsize,
}

impl CountingReader {
    pub fn new(inner: Arc<MemoryUserDirectory>) -> Self {
        Self {
            inner,
            by_id: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.by_id.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserReader for CountingReader {
    async fn get_by_id(&self, id: i64) -> AppResult<User> {
        self.by_id.fetch_add(1, Ordering::SeqCst);
        self.inner.get_by_id(id).await
    }

    async fn get_by_email(&self, email: &str) -> AppResult<User> {
        self.inner.get_by_email(email).await
    }
}

// ── Caches ─────────────────────────────────────────────────

/// A cache whose backend is down.
#[derive(Debug, Default)]
pub struct BrokenCache {
    pub calls: AtomicUsize,
}

#[async_trait]
impl UserCache for BrokenCache {
    async fn get(&self, _user_id: i64) -> AppResult<Option<User>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AppError::cache("connection reset"))
    }

    async fn set(&self, _user: &User) -> AppResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AppError::cache("connection reset"))
    }

    async fn delete(&self, _user_id: i64) -> AppResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AppError::cache("connection reset"))
    }
}
