use shared::{Credentials, Registration, User};
use tracing::{info, warn};

use crate::{MyFlix, Result, Session};

impl MyFlix {
    /// Creates the account. Does not sign in.
    pub async fn register(&self, registration: &Registration) -> Result<User> {
        let user = self.api.register(registration).await?;
        info!("Registered {}", user.username);
        Ok(user)
    }

    pub async fn register_and_login(&self, registration: &Registration) -> Result<Session> {
        self.register(registration).await?;
        self.login(&registration.credentials()).await
    }

    /// Signs in and persists the session before returning, so any call made
    /// afterwards carries the new token.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let response = self.api.login(credentials).await.inspect_err(|_| {
            warn!("Login failed for {}", credentials.username);
        })?;
        self.session.save(&response.token, &response.user)?;
        info!("Logged in as {}", response.user.username);
        Ok(Session {
            token: response.token,
            user: response.user,
        })
    }

    pub fn logout(&self) -> Result<()> {
        self.session.clear()
    }
}
