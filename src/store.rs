use std::future::Future;
use std::sync::Mutex;

use crate::error::BoxError;

/// Consumer-provided persistence for the session token.
///
/// The backend issues one opaque token per session; the host platform
/// decides where it lives (keychain, encrypted preferences, a file).
/// Implementations hold at most one token — `set` overwrites.
///
/// # Example
///
/// ```rust,ignore
/// impl TokenStore for KeychainStore {
///     async fn get(&self) -> Result<Option<String>, BoxError> {
///         Ok(self.keychain.read("session-token")?)
///     }
///
///     async fn set(&self, token: &str) -> Result<(), BoxError> {
///         self.keychain.write("session-token", token)?;
///         Ok(())
///     }
///
///     async fn remove(&self) -> Result<(), BoxError> {
///         self.keychain.delete("session-token")?;
///         Ok(())
///     }
/// }
/// ```
pub trait TokenStore: Send + Sync + 'static {
    /// Read the stored token, if any.
    fn get(&self) -> impl Future<Output = Result<Option<String>, BoxError>> + Send;

    /// Store a token, replacing any previous one.
    fn set(&self, token: &str) -> impl Future<Output = Result<(), BoxError>> + Send;

    /// Delete the stored token (sign-out).
    fn remove(&self) -> impl Future<Output = Result<(), BoxError>> + Send;
}

/// In-memory [`TokenStore`] for tests and hosts without durable storage.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryTokenStore {
    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>, BoxError> {
        self.token.lock().map_err(|_| "token store poisoned".into())
    }
}

impl TokenStore for MemoryTokenStore {
    async fn get(&self) -> Result<Option<String>, BoxError> {
        Ok(self.slot()?.clone())
    }

    async fn set(&self, token: &str) -> Result<(), BoxError> {
        *self.slot()? = Some(token.to_owned());
        Ok(())
    }

    async fn remove(&self) -> Result<(), BoxError> {
        *self.slot()? = None;
        Ok(())
    }
}
