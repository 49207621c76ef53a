use reqwest::Method;

use super::ApiClient;
use crate::error::ClientError;
use crate::models::{
    ForgotPasswordRequest, HomeResponse, LoginRequest, LoginResponse, MessageResponse, OtpRequest,
    SignupRequest,
};
use crate::session::{Route, Session};

impl ApiClient {
    pub async fn home(&self) -> Result<HomeResponse, ClientError> {
        self.get_json("/api/home/").await
    }

    /// Where the root route should send the user. Any failure lands on login.
    pub async fn landing_route(&self) -> Route {
        match self.home().await {
            Ok(home) if home.token.as_deref().is_some_and(|t| !t.is_empty()) => Route::Dashboard,
            Ok(_) => Route::Login,
            Err(e) => {
                tracing::warn!("home check failed, sending to login: {}", e);
                Route::Login
            }
        }
    }

    /// Authenticate and persist the returned token/user pair
    pub async fn login(&self, request: &LoginRequest) -> Result<Session, ClientError> {
        let response: LoginResponse = self.send_json(Method::POST, "/api/login/", request).await?;
        let session = self.session().save(response.token, response.user)?;
        tracing::info!(user_id = session.user.id, "logged in");
        Ok(session)
    }

    /// Create an account. Does not log the new user in.
    pub async fn signup(&self, request: &SignupRequest) -> Result<(), ClientError> {
        self.send_unit(Method::POST, "/api/signup/", Some(request)).await
    }

    pub async fn forgot_password(&self, request: &ForgotPasswordRequest) -> Result<MessageResponse, ClientError> {
        self.send_json(Method::POST, "/api/forgot-password/", request).await
    }

    pub async fn verify_otp(&self, request: &OtpRequest) -> Result<MessageResponse, ClientError> {
        self.send_json(Method::POST, "/api/verify-otp", request).await
    }

    /// Revoke the token server-side when possible, then clear the local session regardless
    pub async fn logout(&self) -> Result<(), ClientError> {
        if self.session().is_authenticated() {
            if let Err(e) = self.send_unit::<()>(Method::POST, "/api/logout/", None).await {
                tracing::warn!("server logout failed, clearing local session anyway: {}", e);
            }
        }
        self.session().clear()
    }
}
