use anyhow::{Context, Result};
use wisp_types::SessionContext;

use crate::api::ApiClient;
use crate::session::SessionStore;

/// Manages the startup authentication path for the client.
///
/// This struct handles:
/// - Restoring a stored session from disk
/// - Persisting sessions after login
/// - Clearing sessions on logout
///
/// There is no validate endpoint; a restored token is trusted until the first
/// 401, which the app treats as session expiry.
pub struct AuthFlow {
    api_client: ApiClient,
    session_store: SessionStore,
}

impl AuthFlow {
    /// Creates a new AuthFlow instance.
    pub fn new(api_client: ApiClient) -> Result<Self> {
        let session_store = SessionStore::new().context("Failed to initialize session store")?;

        Ok(Self {
            api_client,
            session_store,
        })
    }

    /// Checks for a stored session and, if present, installs its token in the
    /// API client.
    ///
    /// Returns `Ok(None)` when no usable session exists.
    pub fn restore_session(&mut self) -> Result<Option<SessionContext>> {
        let session = match self.session_store.load()? {
            Some(session) => session,
            None => {
                log::debug!("No existing session found");
                return Ok(None);
            }
        };

        log::info!("Restored session for user: {}", session.user.username);
        self.api_client
            .set_bearer_token(Some(session.token.clone()));

        Ok(Some(session))
    }

    /// Saves a session after a successful login or signup.
    pub fn save_session(&self, session: &SessionContext) -> Result<()> {
        self.session_store
            .save(session)
            .context("Failed to save session")
    }

    /// Deletes the stored session.
    pub fn delete_session(&self) -> Result<()> {
        self.session_store
            .delete()
            .context("Failed to delete session")
    }

    /// Gets a reference to the API client.
    pub fn api_client(&self) -> &ApiClient {
        &self.api_client
    }

    /// Consumes the flow, returning the configured API client.
    pub fn into_api_client(self) -> ApiClient {
        self.api_client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_flow_creation() {
        let api_client = ApiClient::default();
        let auth_flow = AuthFlow::new(api_client);
        assert!(auth_flow.is_ok());
    }
}
