pub mod access;
pub mod auth;
pub mod context;
pub mod get;
