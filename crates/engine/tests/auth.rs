use sea_orm::Database;

use engine::{Engine, EngineError};
use migration::MigratorTrait;

const USER: &str = "alice@example.com";
const PASSWORD: &str = "password1";

async fn fresh_engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

async fn engine_with_user() -> Engine {
    let engine = fresh_engine().await;
    engine.sign_up(USER, PASSWORD).await.unwrap();
    engine
}

#[tokio::test]
async fn sign_up_provisions_default_rows() {
    let engine = engine_with_user().await;

    let balance = engine.balance(USER).await.unwrap();
    assert_eq!(balance.total_balance_minor, 0);
    assert_eq!(balance.last_earned_minor, 0);
    assert_eq!(balance.total_bonus_minor, 0);

    let profile = engine.profile(USER).await.unwrap();
    assert_eq!(profile.email, USER);
    assert_eq!(profile.first_name, None);

    let preferences = engine.preferences(USER).await.unwrap();
    assert_eq!(preferences.theme, "light");
    assert_eq!(preferences.currency, "TRY");
    assert!(preferences.notifications_email);

    let security = engine.security_settings(USER).await.unwrap();
    assert!(!security.two_factor_enabled);
    assert_eq!(security.last_password_change, None);
}

#[tokio::test]
async fn sign_up_normalizes_and_rejects_duplicates() {
    let engine = engine_with_user().await;

    let err = engine
        .sign_up("  Alice@Example.com ", PASSWORD)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
    assert_eq!(err.to_string(), "user already registered");
}

#[tokio::test]
async fn short_passwords_are_rejected() {
    let engine = fresh_engine().await;

    let err = engine.sign_up(USER, "short").await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidName(_)));
    assert_eq!(err.to_string(), "password should be at least 6 characters");
}

#[tokio::test]
async fn sign_in_checks_the_password() {
    let engine = engine_with_user().await;

    let err = engine.sign_in(USER, "wrong-password").await.unwrap_err();
    assert!(matches!(err, EngineError::Unauthorized(_)));
    assert_eq!(err.to_string(), "invalid login credentials");

    let session = engine.sign_in(USER, PASSWORD).await.unwrap();
    assert_eq!(session.user_id, USER);
    assert!(!session.token.is_empty());
}

#[tokio::test]
async fn sessions_resolve_until_signed_out() {
    let engine = engine_with_user().await;
    let session = engine.sign_in(USER, PASSWORD).await.unwrap();

    let resolved = engine.session(&session.token).await.unwrap();
    assert_eq!(resolved.user_id, USER);

    engine.sign_out(&session.token).await.unwrap();
    let err = engine.session(&session.token).await.unwrap_err();
    assert!(matches!(err, EngineError::Unauthorized(_)));

    // Unknown tokens sign out silently.
    engine.sign_out("no-such-token").await.unwrap();
}

#[tokio::test]
async fn password_reset_round_trip() {
    let engine = engine_with_user().await;

    let code = engine
        .request_password_reset(USER)
        .await
        .unwrap()
        .expect("known email must produce a code");

    let err = engine
        .redeem_password_reset(USER, "wrong-code", "new-password")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Unauthorized(_)));

    engine
        .redeem_password_reset(USER, &code, "new-password")
        .await
        .unwrap();
    engine.sign_in(USER, "new-password").await.unwrap();
    assert!(engine.sign_in(USER, PASSWORD).await.is_err());
}

#[tokio::test]
async fn password_reset_hides_unknown_emails() {
    let engine = fresh_engine().await;

    let code = engine
        .request_password_reset("nobody@example.com")
        .await
        .unwrap();
    assert_eq!(code, None);
}

#[tokio::test]
async fn update_password_replaces_the_credential() {
    let engine = engine_with_user().await;

    engine.update_password(USER, "rotated-pass").await.unwrap();
    engine.sign_in(USER, "rotated-pass").await.unwrap();
    assert!(engine.sign_in(USER, PASSWORD).await.is_err());
}
