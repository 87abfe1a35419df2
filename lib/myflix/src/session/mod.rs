//! The persisted login: a bearer token plus a snapshot of the user profile.

mod file;
mod storage;
#[cfg(target_arch = "wasm32")]
mod web;

pub use file::FileStorage;
pub use storage::{KeyValueStorage, MemoryStorage};
#[cfg(target_arch = "wasm32")]
pub use web::LocalStorage;

use shared::User;
use tracing::{info, warn};

use crate::error::{MyFlixError, Result};
use crate::traits::TokenProvider;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FavoriteDelta {
    Add(String),
    Remove(String),
}

pub struct SessionStore {
    storage: Box<dyn KeyValueStorage>,
}

impl SessionStore {
    pub fn new(storage: impl KeyValueStorage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Replaces both entries in one storage write.
    pub fn save(&self, token: &str, user: &User) -> Result<()> {
        let user_json = serde_json::to_string(user)?;
        self.storage
            .set_items(&[(USER_KEY, user_json.as_str()), (TOKEN_KEY, token)])?;
        info!("Session saved for {}", user.username);
        Ok(())
    }

    /// The current session, or `None` when either half is missing or the
    /// stored user cannot be parsed.
    pub fn load(&self) -> Option<Session> {
        let token = self.token()?;
        let user = self.user()?;
        Some(Session { token, user })
    }

    pub fn clear(&self) -> Result<()> {
        self.storage.remove_items(&[TOKEN_KEY, USER_KEY])?;
        info!("Session cleared");
        Ok(())
    }

    pub fn token(&self) -> Option<String> {
        self.read(TOKEN_KEY).filter(|token| !token.is_empty())
    }

    pub fn user(&self) -> Option<User> {
        let json = self.read(USER_KEY)?;
        match serde_json::from_str(&json) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Stored user is unreadable, ignoring it: {}", e);
                None
            }
        }
    }

    /// Overwrites the cached profile, keeping the token.
    pub fn update_user(&self, user: &User) -> Result<()> {
        let user_json = serde_json::to_string(user)?;
        self.storage.set_item(USER_KEY, &user_json)
    }

    /// Applies one favorite change to the cached profile and persists it.
    ///
    /// Adding a present id or removing an absent one leaves the list as is.
    pub fn update_favorites(&self, delta: FavoriteDelta) -> Result<User> {
        let mut user = self.user().ok_or(MyFlixError::NoSession)?;
        let changed = match &delta {
            FavoriteDelta::Add(id) => user.favorite_movies.insert(id),
            FavoriteDelta::Remove(id) => user.favorite_movies.remove(id),
        };
        if changed {
            self.update_user(&user)?;
            info!("Favorites updated for {}: {:?}", user.username, delta);
        }
        Ok(user)
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Could not read {} from session storage: {}", key, e);
                None
            }
        }
    }
}

impl TokenProvider for SessionStore {
    fn token(&self) -> Option<String> {
        SessionStore::token(self)
    }
}
