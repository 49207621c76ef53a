//! HTTP access to the Pearmonie REST API

pub mod auth;
pub mod client;
pub mod products;

pub use client::ApiClient;
pub use products::ProductApi;
