//! The user-facing flows of the myFlix client: signing in and out, editing
//! the profile and keeping favorites in step with the backend.
//!
//! Rendering is left to whatever front end drives [`MyFlix`].

use std::sync::Arc;

use myflix::{
    session::FileStorage, ClientConfig, MovieApi, MyFlixClient, Result, SessionStore,
};
use shared::User;

mod auth;
mod catalog;
mod profile;

pub use myflix::{FavoriteDelta, MyFlixError, Session};

/// Session context handed to every view: one API adapter plus the session
/// store it reads its token from.
#[derive(Clone)]
pub struct MyFlix {
    api: Arc<dyn MovieApi>,
    session: Arc<SessionStore>,
}

impl MyFlix {
    pub fn new(api: Arc<dyn MovieApi>, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    /// Wires a [`MyFlixClient`] to a session store chosen by `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let session = Arc::new(match config.session_file() {
            Some(path) => SessionStore::new(FileStorage::new(path)),
            None => SessionStore::in_memory(),
        });
        let client = MyFlixClient::builder()
            .base_url(config.api_url())
            .token_provider(session.clone())
            .build()?;
        Ok(Self::new(Arc::new(client), session))
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.load().map(|s| s.user)
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.load().is_some()
    }

    /// The signed-in user's name, or `NoSession`.
    fn username(&self) -> Result<String> {
        self.current_user()
            .map(|u| u.username)
            .ok_or(MyFlixError::NoSession)
    }
}
