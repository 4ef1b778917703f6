//! Session store trait.
//!
//! Defines the interface for persisting the session across restarts.

use async_trait::async_trait;

use super::model::Session;
use crate::error::Result;

/// Durable persistence of the current session, scoped to this client device.
///
/// # Implementation Notes
///
/// - `save` writes its entries one after another. There is no atomicity
///   across entries; a process interrupted mid-save can leave a mix of old
///   and new entries, and `load` must cope with that.
/// - `load` never fails. Missing or unreadable data means "no session".
/// - No implementation may touch the network.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persists the session.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: every entry was written
    /// - `Err(_)`: an entry could not be written; earlier entries may already
    ///   be on disk
    async fn save(&self, session: &Session) -> Result<()>;

    /// Returns the previously saved session, or `Session::unauthenticated()`
    /// when nothing usable is stored.
    async fn load(&self) -> Session;

    /// Removes every persisted entry. Removing an absent entry is not an error.
    async fn clear(&self) -> Result<()>;
}
