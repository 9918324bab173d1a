//! Token to user resolution through the cache-aside read path.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use socialhub_cache::memory::MemoryCacheProvider;
use socialhub_cache::{UserCache, UserCacheStore};
use socialhub_core::config::cache::MemoryCacheConfig;
use socialhub_core::error::ErrorKind;
use socialhub_database::{MemoryUserDirectory, UserDirectory};
use socialhub_service::IdentityResolver;

use helpers::*;

fn user_cache(ttl: Duration) -> Arc<UserCacheStore> {
    let provider = Arc::new(MemoryCacheProvider::new(&MemoryCacheConfig::default()));
    Arc::new(UserCacheStore::new(provider, ttl, Duration::from_millis(500)))
}

#[tokio::test]
async fn resolves_token_to_active_user() {
    let directory = Arc::new(MemoryUserDirectory::new());
    let alice = active_user(&directory, "alice", None).await;
    let auth = authenticator();
    let resolver = IdentityResolver::new(auth.clone(), directory.clone());

    let token = auth.issue_for(alice.id).unwrap();
    let user = resolver.resolve(&token.token).await.unwrap();
    assert_eq!(user.id, alice.id);
    assert_eq!(user.username, "alice");

    let header = format!("Bearer {}", token.token);
    let ctx = resolver.resolve_context(&token.token).await.unwrap();
    assert_eq!(ctx.user_id(), alice.id);
    assert_eq!(resolver.resolve_bearer(&header).await.unwrap().id, alice.id);
}

#[tokio::test]
async fn second_resolution_is_served_from_cache() {
    let directory = Arc::new(MemoryUserDirectory::new());
    let alice = active_user(&directory, "alice", None).await;
    let reader = Arc::new(CountingReader::new(directory.clone()));
    let auth = authenticator();
    let resolver =
        IdentityResolver::new(auth.clone(), reader.clone()).with_cache(user_cache(Duration::from_secs(60)));

    let token = auth.issue_for(alice.id).unwrap().token;
    resolver.resolve(&token).await.unwrap();
    resolver.resolve(&token).await.unwrap();

    assert_eq!(reader.calls(), 1);
}

#[tokio::test]
async fn cached_entry_carries_no_credential() {
    let directory = Arc::new(MemoryUserDirectory::new());
    let alice = active_user(&directory, "alice", None).await;
    let cache = user_cache(Duration::from_secs(60));
    let auth = authenticator();
    let resolver = IdentityResolver::new(auth.clone(), directory.clone()).with_cache(cache.clone());

    let token = auth.issue_for(alice.id).unwrap().token;
    resolver.resolve(&token).await.unwrap();

    let cached = cache.get(alice.id).await.unwrap().unwrap();
    assert_eq!(cached.email, "alice@example.com");
    assert!(cached.password_hash.is_empty());
}

#[tokio::test]
async fn expired_cache_entry_is_refetched() {
    let directory = Arc::new(MemoryUserDirectory::new());
    let alice = active_user(&directory, "alice", None).await;
    let reader = Arc::new(CountingReader::new(directory.clone()));
    let auth = authenticator();
    let resolver =
        IdentityResolver::new(auth.clone(), reader.clone()).with_cache(user_cache(Duration::from_secs(1)));

    let token = auth.issue_for(alice.id).unwrap().token;
    resolver.resolve(&token).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    resolver.resolve(&token).await.unwrap();

    assert_eq!(reader.calls(), 2);
}

#[tokio::test]
async fn broken_cache_degrades_to_directory() {
    let directory = Arc::new(MemoryUserDirectory::new());
    let alice = active_user(&directory, "alice", None).await;
    let reader = Arc::new(CountingReader::new(directory.clone()));
    let cache = Arc::new(BrokenCache::default());
    let auth = authenticator();
    let resolver = IdentityResolver::new(auth.clone(), reader.clone()).with_cache(cache.clone());

    let token = auth.issue_for(alice.id).unwrap().token;
    let user = resolver.resolve(&token).await.unwrap();

    assert_eq!(user.id, alice.id);
    assert_eq!(reader.calls(), 1);
    assert_eq!(cache.calls.load(std::sync::atomic::Ordering::SeqCst), 2);
}

#[tokio::test]
async fn deleted_user_is_unauthorized() {
    let directory = Arc::new(MemoryUserDirectory::new());
    let alice = active_user(&directory, "alice", None).await;
    let auth = authenticator();
    let resolver = IdentityResolver::new(auth.clone(), directory.clone());

    let token = auth.issue_for(alice.id).unwrap().token;
    directory.delete(alice.id).await.unwrap();

    let err = resolver.resolve(&token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
}

#[tokio::test]
async fn unknown_subject_is_unauthorized() {
    let directory = Arc::new(MemoryUserDirectory::new());
    let auth = authenticator();
    let resolver = IdentityResolver::new(auth.clone(), directory);

    let token = auth.issue_for(4242).unwrap().token;
    let err = resolver.resolve(&token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
}

#[tokio::test]
async fn foreign_or_garbled_tokens_are_rejected() {
    let directory = Arc::new(MemoryUserDirectory::new());
    let alice = active_user(&directory, "alice", None).await;
    let resolver = IdentityResolver::new(authenticator(), directory.clone());

    let mut other = auth_config();
    other.token_secret = "another-secret".to_string();
    let foreign = socialhub_auth::jwt::TokenAuthenticator::new(&other)
        .issue_for(alice.id)
        .unwrap()
        .token;

    let err = resolver.resolve(&foreign).await.unwrap_err();
    assert!(err.token_fault().is_some());

    let err = resolver.resolve("not-a-token").await.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidToken(_)));

    let err = resolver.resolve_bearer("Basic abc").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
}
