pub mod auth;

pub use auth::{AuthUser, maybe_auth_user};
