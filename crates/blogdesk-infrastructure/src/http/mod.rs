//! HTTP access to the blog API.

mod auth_api;
mod client;

pub use auth_api::HttpAuthApi;
pub use client::RestClient;
