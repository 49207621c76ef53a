mod common;

use anyhow::Result;
use pearmonie_client::api::ProductApi;
use pearmonie_client::models::{ForgotPasswordRequest, LoginRequest, OtpRequest, SignupForm};
use pearmonie_client::session::{Route, SessionGuard, SessionStore};
use pearmonie_client::validation::validate_signup;

fn login_request(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
        remember_me: true,
    }
}

#[tokio::test]
async fn login_stores_token_and_unlocks_protected_routes() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = server.client()?;

    let before = SessionGuard::new(client.session()).check(Route::Products);
    assert_eq!(before.redirect, Some(Route::Login));

    let session = client.login(&login_request(common::EMAIL, common::PASSWORD)).await?;
    assert!(!session.token.is_empty());
    assert_eq!(session.user.id, 1);
    assert_eq!(session.user.email.as_deref(), Some(common::EMAIL));
    assert_eq!(client.session().token().as_deref(), Some(session.token.as_str()));

    let after = SessionGuard::new(client.session()).check(Route::Products);
    assert!(after.is_authenticated);
    assert!(after.allows_render());
    Ok(())
}

#[tokio::test]
async fn wrong_password_surfaces_server_message_and_keeps_session_empty() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = server.client()?;

    let err = client
        .login(&login_request(common::EMAIL, "Wrong#1234"))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(401));
    assert_eq!(err.to_string(), "Incorrect password");
    assert!(!client.session().is_authenticated());

    let err = client
        .login(&login_request("nobody@example.com", "Wrong#1234"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "User not found");
    Ok(())
}

#[tokio::test]
async fn signup_does_not_log_in_and_duplicate_reports_field() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = server.client()?;

    let request = validate_signup(&SignupForm {
        name: "Grace Hopper".to_string(),
        email: "grace@example.com".to_string(),
        password: "Cobol#1959".to_string(),
        confirm_password: "Cobol#1959".to_string(),
    })?;
    client.signup(&request).await?;
    assert!(!client.session().is_authenticated());

    let err = client.signup(&request).await.unwrap_err();
    assert_eq!(err.status_code(), Some(400));
    let fields = err.field_errors().expect("field errors");
    assert_eq!(fields["email"], "user with this email already exists.");

    client.login(&login_request("grace@example.com", "Cobol#1959")).await?;
    assert!(client.session().is_authenticated());
    Ok(())
}

#[tokio::test]
async fn logout_revokes_token_and_clears_session() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = server.logged_in_client().await?;
    let token = client.session().token().expect("token after login");

    client.logout().await?;
    assert!(!client.session().is_authenticated());
    assert!(!server.state.lock().unwrap().tokens_contains(&token));

    let err = client.list_products().await.unwrap_err();
    assert_eq!(err.status_code(), Some(401));
    assert_eq!(err.to_string(), "Authentication credentials were not provided.");
    Ok(())
}

#[tokio::test]
async fn logout_without_reachable_server_still_clears_session() -> Result<()> {
    let session = SessionStore::in_memory(7);
    session.save("stale", pearmonie_client::models::SessionUser::new(3))?;
    let config = pearmonie_client::config::AppConfig::for_base_url(common::dead_base_url()?);
    let client = pearmonie_client::api::ApiClient::new(&config.api, session.clone())?;

    client.logout().await?;
    assert!(!session.is_authenticated());
    Ok(())
}

#[tokio::test]
async fn landing_route_follows_server_auth_check() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = server.client()?;
    assert_eq!(client.landing_route().await, Route::Login);

    client.login(&login_request(common::EMAIL, common::PASSWORD)).await?;
    assert_eq!(client.landing_route().await, Route::Dashboard);

    let home = client.home().await?;
    assert!(home.authenticated);
    assert_eq!(home.user.map(|u| u.id), Some(1));
    Ok(())
}

#[tokio::test]
async fn landing_route_falls_back_to_login_when_unreachable() -> Result<()> {
    let config = pearmonie_client::config::AppConfig::for_base_url(common::dead_base_url()?);
    let client = pearmonie_client::api::ApiClient::new(&config.api, SessionStore::in_memory(7))?;
    assert_eq!(client.landing_route().await, Route::Login);
    Ok(())
}

#[tokio::test]
async fn password_reset_flow_messages() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = server.client()?;

    let sent = client
        .forgot_password(&ForgotPasswordRequest {
            email: common::EMAIL.to_string(),
        })
        .await?;
    assert_eq!(sent.message.as_deref(), Some("Reset email sent"));

    let err = client
        .forgot_password(&ForgotPasswordRequest {
            email: "ghost@example.com".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(404));
    assert_eq!(err.to_string(), "User with provided email does not exist");

    let verified = client
        .verify_otp(&OtpRequest {
            otp: "123456".to_string(),
        })
        .await?;
    assert_eq!(verified.message.as_deref(), Some("OTP verified"));
    Ok(())
}

#[tokio::test]
async fn persisted_session_survives_a_new_store() -> Result<()> {
    let server = common::ensure_server().await?;
    let dir = std::env::temp_dir().join(format!("pear-test-{}", uuid::Uuid::new_v4()));
    let path = dir.join("session.json");

    let config = pearmonie_client::config::AppConfig::for_base_url(&server.base_url);
    let client = pearmonie_client::api::ApiClient::new(&config.api, SessionStore::persistent(&path, 7))?;
    let session = client.login(&login_request(common::EMAIL, common::PASSWORD)).await?;

    let reopened = SessionStore::persistent(&path, 7);
    assert_eq!(reopened.token(), Some(session.token.clone()));
    assert_eq!(reopened.user_id(), Some(1));

    client.logout().await?;
    assert!(!SessionStore::persistent(&path, 7).is_authenticated());

    let _ = std::fs::remove_dir_all(&dir);
    Ok(())
}
