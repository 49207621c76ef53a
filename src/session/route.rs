use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Client-side routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    Home,
    Login,
    Signup,
    Logout,
    ForgotPassword,
    VerifyOtp,
    Dashboard,
    Products,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::Logout => "/logout",
            Route::ForgotPassword => "/forgot-password",
            Route::VerifyOtp => "/verify-otp",
            Route::Dashboard => "/dashboard",
            Route::Products => "/products",
        }
    }

    /// Routes that require a session token
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Dashboard | Route::Products)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let path = if trimmed.len() > 1 { trimmed.trim_end_matches('/') } else { trimmed };
        match path {
            "/" | "" => Ok(Route::Home),
            "/login" => Ok(Route::Login),
            "/signup" => Ok(Route::Signup),
            "/logout" => Ok(Route::Logout),
            "/forgot-password" => Ok(Route::ForgotPassword),
            "/verify-otp" => Ok(Route::VerifyOtp),
            "/dashboard" => Ok(Route::Dashboard),
            "/products" | "/items" => Ok(Route::Products),
            other => Err(format!("Unknown route: {}", other)),
        }
    }
}
