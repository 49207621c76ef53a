//! Wire and form records shared by the API client, session and catalog

pub mod auth;
pub mod dashboard;
pub mod product;

pub use auth::{
    ForgotPasswordRequest, HomeResponse, LoginRequest, LoginResponse, MessageResponse, OtpRequest,
    SessionUser, SignupForm, SignupRequest,
};
pub use dashboard::DashboardCard;
pub use product::{FilterCriteria, FilterField, Product, ProductForm, ProductId, ProductPayload};
