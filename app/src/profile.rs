use shared::{User, UserUpdate};
use tracing::info;

use crate::{MyFlix, MyFlixError, Result};

impl MyFlix {
    /// Re-reads the profile from the backend and caches it.
    pub async fn refresh_profile(&self) -> Result<User> {
        let username = self.username()?;
        let user = self.api.get_user(&username).await?;
        self.session.update_user(&user)?;
        Ok(user)
    }

    /// Saves profile changes. The username is never part of the request and
    /// the cached profile keeps the stored one whatever the backend echoes.
    /// An update with nothing in it sends no request.
    pub async fn update_profile(&self, update: UserUpdate) -> Result<User> {
        let cached = self.current_user().ok_or(MyFlixError::NoSession)?;
        let update = update.without_blank_password();
        if update.is_empty() {
            return Ok(cached);
        }

        let mut user = self.api.edit_user(&cached.username, &update).await?;
        user.username = cached.username;
        // an echo without favorites must not wipe the cached ones
        if user.favorite_movies.is_empty() {
            user.favorite_movies = cached.favorite_movies;
        }
        self.session.update_user(&user)?;
        info!("Profile updated for {}", user.username);
        Ok(user)
    }

    /// Deletes the account, then drops the local session. A failed call
    /// keeps the session.
    pub async fn delete_account(&self) -> Result<()> {
        let username = self.username()?;
        self.api.delete_user(&username).await?;
        self.session.clear()?;
        info!("Account {} deleted", username);
        Ok(())
    }
}
