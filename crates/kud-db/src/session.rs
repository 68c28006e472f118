//! # Sessions and Profiles
//!
//! Login sessions are stored under `session:<token>` where the token is a
//! random UUID handed to the client as a bearer token. Profile settings
//! are stored under `profile:<email>`.

use kud_core::session::Session;
use kud_core::types::Profile;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DbResult;
use crate::store::{KeyValueStore, PROFILE_KEY_PREFIX, SESSION_KEY_PREFIX};

fn session_key(token: &str) -> String {
    format!("{SESSION_KEY_PREFIX}{token}")
}

fn profile_key(email: &str) -> String {
    format!("{PROFILE_KEY_PREFIX}{}", email.trim().to_lowercase())
}

// =============================================================================
// SessionStore
// =============================================================================

#[derive(Debug, Clone)]
pub struct SessionStore {
    store: KeyValueStore,
}

impl SessionStore {
    pub fn new(store: KeyValueStore) -> Self {
        SessionStore { store }
    }

    /// Stores `session` and returns its new token.
    pub async fn create(&self, session: &Session) -> DbResult<String> {
        let token = Uuid::new_v4().simple().to_string();
        self.store.set_json(&session_key(&token), session).await?;
        info!(role = ?session.role, "Session opened");
        Ok(token)
    }

    pub async fn get(&self, token: &str) -> DbResult<Option<Session>> {
        self.store.get_json(&session_key(token)).await
    }

    /// Overwrites the session behind `token`.
    pub async fn replace(&self, token: &str, session: &Session) -> DbResult<()> {
        debug!("Session updated");
        self.store.set_json(&session_key(token), session).await
    }

    /// Logs out. Returns whether a session existed.
    pub async fn remove(&self, token: &str) -> DbResult<bool> {
        let removed = self.store.remove(&session_key(token)).await?;
        if removed {
            info!("Session closed");
        }
        Ok(removed)
    }
}

// =============================================================================
// ProfileStore
// =============================================================================

#[derive(Debug, Clone)]
pub struct ProfileStore {
    store: KeyValueStore,
}

impl ProfileStore {
    pub fn new(store: KeyValueStore) -> Self {
        ProfileStore { store }
    }

    /// Saved profile for a login email.
    pub async fn get(&self, email: &str) -> DbResult<Option<Profile>> {
        self.store.get_json(&profile_key(email)).await
    }

    /// Saved profile, or one derived from the session name and email.
    pub async fn get_or_default(&self, session: &Session) -> DbResult<Profile> {
        Ok(self
            .get(&session.email)
            .await?
            .unwrap_or_else(|| Profile::from_display_name(&session.name, &session.email)))
    }

    pub async fn save(&self, email: &str, profile: &Profile) -> DbResult<()> {
        debug!("Profile saved");
        self.store.set_json(&profile_key(email), profile).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use kud_core::session::CREDENTIALS;

    async fn database() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let sessions = database().await.sessions();
        let session = CREDENTIALS[1].session();

        let token = sessions.create(&session).await.unwrap();
        assert_eq!(token.len(), 32);
        assert_eq!(sessions.get(&token).await.unwrap(), Some(session.clone()));

        let mut renamed = session.clone();
        renamed.name = "Maemunah Sari".to_string();
        sessions.replace(&token, &renamed).await.unwrap();
        assert_eq!(sessions.get(&token).await.unwrap().unwrap().name, "Maemunah Sari");

        assert!(sessions.remove(&token).await.unwrap());
        assert_eq!(sessions.get(&token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_tokens_are_distinct() {
        let sessions = database().await.sessions();
        let session = CREDENTIALS[0].session();
        let a = sessions.create(&session).await.unwrap();
        let b = sessions.create(&session).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_profile_defaults_from_session() {
        let profiles = database().await.profiles();
        let session = CREDENTIALS[0].session();

        let profile = profiles.get_or_default(&session).await.unwrap();
        assert_eq!(profile.first_name, "Saepul");
        assert_eq!(profile.email, "admin@example.com");

        let mut edited = profile.clone();
        edited.last_name = "Hidayat".to_string();
        profiles.save(&session.email, &edited).await.unwrap();

        let loaded = profiles.get(" Admin@Example.com ").await.unwrap().unwrap();
        assert_eq!(loaded.display_name(), "Saepul Hidayat");
    }
}
