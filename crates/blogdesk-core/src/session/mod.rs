//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: the `Session` value and its identity/permission parts
//! - `store`: the `SessionStore` persistence trait

mod model;
mod store;

pub use model::{PermissionField, Session, UserIdentity};
pub use store::SessionStore;
