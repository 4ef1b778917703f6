//! Authentication against the remote API.
//!
//! # Module Structure
//!
//! - `api`: the `AuthApi` trait implemented by HTTP clients (and test mocks)
//! - `credentials`: request bodies
//! - `response`: response payload and its conversion into a `Session`
//! - `error`: `AuthError`

mod api;
mod credentials;
mod error;
mod response;

pub use api::AuthApi;
pub use credentials::{LoginCredentials, RegisterProfile};
pub use error::AuthError;
pub use response::AuthResponse;
