//! Behaviour of the in-process directory that callers rely on.

use std::sync::Arc;
use std::time::Duration;

use socialhub_core::error::ErrorKind;
use socialhub_database::{MemoryUserDirectory, RoleStore, UserDirectory, UserReader};
use socialhub_entity::invitation::InvitationToken;
use socialhub_entity::user::NewUser;

const INVITE_TTL: Duration = Duration::from_secs(72 * 3600);

fn new_user(username: &str, email: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: email.to_string(),
        password_hash: "hash".to_string(),
        role_name: None,
    }
}

#[tokio::test]
async fn concurrent_duplicate_registration_admits_exactly_one() {
    let dir = Arc::new(MemoryUserDirectory::new());

    let mut handles = Vec::new();
    for i in 0..2 {
        let dir = Arc::clone(&dir);
        handles.push(tokio::spawn(async move {
            let token = InvitationToken::generate();
            dir.create_and_invite(
                &new_user(&format!("alice{i}"), "alice@example.com"),
                token.hash(),
                INVITE_TTL,
            )
            .await
        }));
    }

    let mut ok = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => ok += 1,
            Err(e) if e.kind == ErrorKind::DuplicateEmail => duplicates += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(ok, 1);
    assert_eq!(duplicates, 1);
    assert_eq!(dir.user_count().await, 1);
    assert_eq!(dir.invitation_count().await, 1);
}

#[tokio::test]
async fn duplicate_username_is_distinguished() {
    let dir = MemoryUserDirectory::new();
    dir.create(&new_user("alice", "alice@example.com")).await.unwrap();

    let err = dir
        .create(&new_user("alice", "other@example.com"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateUsername);
}

#[tokio::test]
async fn failed_invitation_leaves_no_user_behind() {
    let dir = MemoryUserDirectory::new();
    let token = InvitationToken::generate();
    dir.create_and_invite(&new_user("alice", "alice@example.com"), token.hash(), INVITE_TTL)
        .await
        .unwrap();

    let err = dir
        .create_and_invite(&new_user("bob", "bob@example.com"), token.hash(), INVITE_TTL)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(dir.user_count().await, 1);
    assert_eq!(dir.invitation_count().await, 1);
}

#[tokio::test]
async fn activate_marks_user_active_and_consumes_invitation() {
    let dir = MemoryUserDirectory::new();
    let token = InvitationToken::generate();
    let user = dir
        .create_and_invite(&new_user("bob", "bob@example.com"), token.hash(), INVITE_TTL)
        .await
        .unwrap();

    let activated = dir.activate(token.plaintext()).await.unwrap();
    assert_eq!(activated.id, user.id);
    assert!(activated.is_active);
    assert!(dir.get_by_id(user.id).await.unwrap().is_active);
    assert_eq!(dir.invitation_count().await, 0);

    let again = dir.activate(token.plaintext()).await.unwrap_err();
    assert!(again.is_not_found());
}

#[tokio::test]
async fn expired_invitation_is_not_found_and_user_stays_inactive() {
    let dir = MemoryUserDirectory::new();
    let token = InvitationToken::generate();
    let user = dir
        .create_and_invite(
            &new_user("carol", "carol@example.com"),
            token.hash(),
            Duration::ZERO,
        )
        .await
        .unwrap();

    let err = dir.activate(token.plaintext()).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(dir.get_by_id(user.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn activation_by_hash_is_rejected() {
    let dir = MemoryUserDirectory::new();
    let token = InvitationToken::generate();
    dir.create_and_invite(&new_user("dave", "dave@example.com"), token.hash(), INVITE_TTL)
        .await
        .unwrap();

    assert!(dir.activate(token.hash()).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn delete_removes_user_and_pending_invitation() {
    let dir = MemoryUserDirectory::new();
    let token = InvitationToken::generate();
    let user = dir
        .create_and_invite(&new_user("erin", "erin@example.com"), token.hash(), INVITE_TTL)
        .await
        .unwrap();

    dir.delete(user.id).await.unwrap();
    assert_eq!(dir.user_count().await, 0);
    assert_eq!(dir.invitation_count().await, 0);
    assert!(dir.activate(token.plaintext()).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn delete_without_invitation_is_safe() {
    let dir = MemoryUserDirectory::new();
    let user = dir.create(&new_user("frank", "frank@example.com")).await.unwrap();

    dir.delete(user.id).await.unwrap();
    assert!(dir.delete(user.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn get_by_email_hides_inactive_users() {
    let dir = MemoryUserDirectory::new();
    let token = InvitationToken::generate();
    dir.create_and_invite(&new_user("gina", "gina@example.com"), token.hash(), INVITE_TTL)
        .await
        .unwrap();

    assert!(dir.get_by_email("gina@example.com").await.unwrap_err().is_not_found());
    dir.activate(token.plaintext()).await.unwrap();
    let user = dir.get_by_email("gina@example.com").await.unwrap();
    assert_eq!(user.username, "gina");
    assert_eq!(user.role.level, 1);
}

#[tokio::test]
async fn seeded_roles_resolve_by_name() {
    let dir = MemoryUserDirectory::new();
    assert_eq!(dir.get_by_name("moderator").await.unwrap().level, 2);
    assert_eq!(dir.get_by_name("admin").await.unwrap().level, 3);
    assert!(dir.get_by_name("owner").await.unwrap_err().is_not_found());
}
