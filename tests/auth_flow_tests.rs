mod helpers;

use std::sync::atomic::Ordering;

use helpers::MockBackend;
use moodify::forms::{submit_login, submit_register};

#[tokio::test]
async fn valid_login_issues_exactly_one_sign_in_call() {
    let backend = MockBackend::new();

    let session = submit_login(&backend, "a@b.com", "abcdef").await.unwrap();

    assert_eq!(session.user_id, "user-1");
    assert_eq!(backend.sign_in_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn short_password_rejects_before_any_network_call() {
    let backend = MockBackend::new();

    let errors = submit_login(&backend, "a@b.com", "abc").await.unwrap_err();

    assert!(errors.password.is_some());
    assert_eq!(backend.sign_in_calls.load(Ordering::SeqCst), 0);

    let errors = submit_register(&backend, "jo", "a@b.com", "abc", None)
        .await
        .unwrap_err();
    assert!(errors.password.is_some());
    assert_eq!(backend.sign_up_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn register_password_without_special_char_rejects_locally() {
    let backend = MockBackend::new();

    let errors = submit_register(&backend, "jo", "a@b.com", "abcdef", None)
        .await
        .unwrap_err();

    assert_eq!(
        errors.password.as_deref(),
        Some("Password must contain a special character (?, !, @, *).")
    );
    assert_eq!(backend.sign_up_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn invalid_credentials_land_on_the_password_field() {
    let backend = MockBackend::with_sign_in_error("Invalid login credentials");

    let errors = submit_login(&backend, "a@b.com", "abcdef").await.unwrap_err();

    assert_eq!(
        errors.password.as_deref(),
        Some("Email or password do not match.")
    );
    assert!(errors.email.is_none());
    // No session was established.
    assert!(backend.session.lock().unwrap().is_none());
}

#[tokio::test]
async fn unconfirmed_email_lands_on_the_email_field() {
    let backend = MockBackend::with_sign_in_error("Email not confirmed");

    let errors = submit_login(&backend, "a@b.com", "abcdef").await.unwrap_err();

    assert_eq!(
        errors.email.as_deref(),
        Some("Please confirm your email address first.")
    );
    assert!(errors.password.is_none());
}

#[tokio::test]
async fn unknown_sign_in_failure_shows_the_raw_message() {
    let backend = MockBackend::with_sign_in_error("User banned");

    let errors = submit_login(&backend, "a@b.com", "abcdef").await.unwrap_err();

    assert_eq!(errors.password.as_deref(), Some("Login failed: User banned"));
}

#[tokio::test]
async fn existing_account_blocks_registration() {
    let mut backend = MockBackend::new();
    backend.signed_up_existing = true;

    let errors = submit_register(&backend, "jo", "a@b.com", "abcdef!", None)
        .await
        .unwrap_err();

    assert_eq!(
        errors.form.as_deref(),
        Some("This account is already registered.")
    );
    assert_eq!(backend.sign_up_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn successful_registration_returns_a_confirmation_message() {
    let backend = MockBackend::new();

    let message = submit_register(&backend, "jo", "a@b.com", "abcdef!", Some("https://app/login"))
        .await
        .unwrap();

    assert!(message.contains("Registration complete"));
    assert_eq!(backend.sign_up_calls.load(Ordering::SeqCst), 1);
}
