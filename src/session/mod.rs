//! Session token storage, client routes and the protected-route guard

pub mod guard;
pub mod route;
pub mod store;

pub use guard::{GuardState, SessionGuard};
pub use route::Route;
pub use store::{Session, SessionStore, SESSION_FILE};
