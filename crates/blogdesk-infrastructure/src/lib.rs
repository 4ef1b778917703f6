pub mod config_service;
pub mod http;
pub mod paths;
pub mod session_store;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::http::{HttpAuthApi, RestClient};
pub use crate::paths::BlogdeskPaths;
pub use crate::session_store::KeyValueSessionStore;
