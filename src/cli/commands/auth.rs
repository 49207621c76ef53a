use clap::Subcommand;
use serde_json::json;

use crate::api::ApiClient;
use crate::cli::utils::{output_success, prompt_line};
use crate::cli::OutputFormat;
use crate::models::SignupForm;
use crate::session::Route;
use crate::validation::{validate_forgot_password, validate_login, validate_otp, validate_signup};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Ask the server where to start (dashboard or login)")]
    Home,

    #[command(about = "Log in and store the session token")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
        #[arg(long, help = "Ask the server for a longer-lived session")]
        remember_me: bool,
    },

    #[command(about = "Create an account")]
    Signup {
        #[arg(help = "Full name (letters and spaces)")]
        name: String,
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
        #[arg(long, help = "Password confirmation (will prompt if not provided)")]
        confirm_password: Option<String>,
    },

    #[command(about = "Clear the stored session")]
    Logout,

    #[command(about = "Request a password reset code")]
    ForgotPassword {
        #[arg(help = "Email")]
        email: String,
    },

    #[command(about = "Submit a one-time password")]
    VerifyOtp {
        #[arg(help = "OTP code (up to 6 characters)")]
        otp: String,
    },
}

pub async fn handle(cmd: AuthCommands, api: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Home => {
            let route = api.landing_route().await;
            output_success(
                &output_format,
                &format!("Redirecting to {}", route),
                Some(json!({ "redirect": route })),
            )
        }
        AuthCommands::Login {
            email,
            password,
            remember_me,
        } => {
            let password = match password {
                Some(p) => p,
                None => prompt_line("Password: ")?,
            };
            let request = validate_login(&email, &password, remember_me)?;
            let session = api.login(&request).await?;
            output_success(
                &output_format,
                &format!("Logged in, redirecting to {}", Route::Dashboard),
                Some(json!({
                    "user": session.user,
                    "expires_at": session.expires_at,
                    "redirect": Route::Dashboard,
                })),
            )
        }
        AuthCommands::Signup {
            name,
            email,
            password,
            confirm_password,
        } => {
            let password = match password {
                Some(p) => p,
                None => prompt_line("Password: ")?,
            };
            let confirm_password = match confirm_password {
                Some(p) => p,
                None => prompt_line("Confirm password: ")?,
            };
            let request = validate_signup(&SignupForm {
                name,
                email,
                password,
                confirm_password,
            })?;
            api.signup(&request).await?;
            output_success(
                &output_format,
                "Account created, run `pear login` to sign in",
                Some(json!({ "redirect": Route::Login })),
            )
        }
        AuthCommands::Logout => {
            api.logout().await?;
            output_success(&output_format, "Logged out", Some(json!({ "redirect": Route::Login })))
        }
        AuthCommands::ForgotPassword { email } => {
            let request = validate_forgot_password(&email)?;
            let response = api.forgot_password(&request).await?;
            let message = response
                .message
                .unwrap_or_else(|| "Password reset code sent".to_string());
            output_success(&output_format, &message, None)
        }
        AuthCommands::VerifyOtp { otp } => {
            let request = validate_otp(&otp)?;
            let response = api.verify_otp(&request).await?;
            let message = response.message.unwrap_or_else(|| "Code verified".to_string());
            output_success(&output_format, &message, None)
        }
    }
}
