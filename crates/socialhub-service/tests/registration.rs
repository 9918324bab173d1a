//! Registration saga end to end against the in-process directory.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use socialhub_core::error::ErrorKind;
use socialhub_database::{MemoryUserDirectory, UserDirectory, UserReader};

use helpers::*;

#[tokio::test]
async fn bob_registers_activates_and_resolves() {
    let directory = Arc::new(MemoryUserDirectory::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let workflow = workflow(directory.clone(), notifier.clone());

    let bob = workflow.register(request("bob")).await.unwrap();
    assert!(!bob.is_active);
    assert_eq!(bob.role.name, "user");

    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    let message = &messages[0];
    assert_eq!(message.template_id, "user_invitation");
    assert_eq!(message.display_name, "bob");
    assert_eq!(message.email, "bob@example.com");
    assert!(message.sandbox);
    assert_eq!(message.vars["username"], "bob");

    let url = message.vars["activation_url"].as_str().unwrap();
    assert!(url.starts_with("http://localhost:4000/confirm/"));

    directory.activate(&token_from_url(url)).await.unwrap();
    let active = directory.get_by_id(bob.id).await.unwrap();
    assert!(active.is_active);
    assert_eq!(active.email, "bob@example.com");
}

#[tokio::test(start_paused = true)]
async fn alice_is_rolled_back_when_every_delivery_fails() {
    let directory = Arc::new(MemoryUserDirectory::new());
    let failing = Arc::new(FailingNotifier::default());
    let workflow = workflow(directory.clone(), retrying(failing.clone()));

    let started = tokio::time::Instant::now();
    let err = workflow.register(request("alice")).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::ExternalService);
    assert_eq!(failing.attempts(), 3);
    assert!(started.elapsed() >= Duration::from_millis(3000));

    let lookup = directory.get_by_email("alice@example.com").await.unwrap_err();
    assert!(lookup.is_not_found());
    assert_eq!(directory.user_count().await, 0);
    assert_eq!(directory.invitation_count().await, 0);
}

#[tokio::test(start_paused = true)]
async fn non_success_status_is_treated_as_failure() {
    let directory = Arc::new(MemoryUserDirectory::new());
    let failing = Arc::new(FailingNotifier::with_status(500));
    let workflow = workflow(directory.clone(), retrying(failing.clone()));

    let err = workflow.register(request("carol")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExternalService);
    assert_eq!(failing.attempts(), 3);
    assert_eq!(directory.user_count().await, 0);
}

#[tokio::test(start_paused = true)]
async fn transient_failure_recovers_within_attempts() {
    let directory = Arc::new(MemoryUserDirectory::new());
    let flaky = Arc::new(FlakyNotifier::new(2));
    let workflow = workflow(directory.clone(), retrying(flaky.clone()));

    let user = workflow.register(request("dave")).await.unwrap();
    assert_eq!(flaky.inner.messages().len(), 1);
    assert_eq!(directory.user_count().await, 1);
    assert_eq!(user.username, "dave");
}

#[tokio::test]
async fn duplicate_email_aborts_before_notifying() {
    let directory = Arc::new(MemoryUserDirectory::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let workflow = workflow(directory.clone(), notifier.clone());

    workflow.register(request("erin")).await.unwrap();

    let mut again = request("erin2");
    again.email = "erin@example.com".to_string();
    let err = workflow.register(again).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::DuplicateEmail);
    assert_eq!(notifier.messages().len(), 1);
    assert_eq!(directory.user_count().await, 1);
}

#[tokio::test]
async fn duplicate_username_is_reported_as_such() {
    let directory = Arc::new(MemoryUserDirectory::new());
    let workflow = workflow(directory.clone(), Arc::new(RecordingNotifier::default()));

    workflow.register(request("frank")).await.unwrap();

    let mut again = request("frank");
    again.email = "frank2@example.com".to_string();
    let err = workflow.register(again).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateUsername);
}

#[tokio::test]
async fn failed_compensation_is_not_retried_and_still_reports_failure() {
    let directory = Arc::new(UndeletableDirectory::default());
    let failing = Arc::new(FailingNotifier::default());
    let workflow = workflow(directory.clone(), failing.clone());

    let err = workflow.register(request("gina")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExternalService);
    assert_eq!(failing.attempts(), 1);
    assert_eq!(directory.inner.user_count().await, 1);
}

#[tokio::test]
async fn invalid_requests_touch_nothing() {
    let directory = Arc::new(MemoryUserDirectory::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let workflow = workflow(directory.clone(), notifier.clone());

    let mut bad_email = request("hank");
    bad_email.email = "hank-at-example".to_string();
    assert_eq!(
        workflow.register(bad_email).await.unwrap_err().kind,
        ErrorKind::Validation
    );

    let mut short_password = request("ivy");
    short_password.password = "pw".to_string();
    assert_eq!(
        workflow.register(short_password).await.unwrap_err().kind,
        ErrorKind::Validation
    );

    assert_eq!(directory.user_count().await, 0);
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn stored_credential_is_a_hash() {
    let directory = Arc::new(MemoryUserDirectory::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let workflow = workflow(directory.clone(), notifier.clone());

    workflow.register(request("jack")).await.unwrap();
    let url = notifier.messages()[0].vars["activation_url"]
        .as_str()
        .unwrap()
        .to_string();
    let user = directory.activate(&token_from_url(&url)).await.unwrap();

    assert!(user.password_hash.starts_with("$argon2id$"));
    assert!(!user.password_hash.contains("jack-password"));
}
