use myflix::favorites;
use shared::{Director, Genre, Movie, User};
use tracing::{debug, info};

use crate::{FavoriteDelta, MyFlix, MyFlixError, Result};

impl MyFlix {
    pub async fn movies(&self) -> Result<Vec<Movie>> {
        self.api.list_movies().await
    }

    pub async fn movie(&self, title: &str) -> Result<Movie> {
        self.api.get_movie(title).await
    }

    pub async fn director(&self, name: &str) -> Result<Director> {
        self.api.get_director(name).await
    }

    pub async fn genre(&self, name: &str) -> Result<Genre> {
        self.api.get_genre(name).await
    }

    pub fn is_favorite(&self, movie_id: &str) -> bool {
        self.current_user()
            .is_some_and(|u| favorites::is_favorite(&u.favorite_movies, movie_id))
    }

    /// Marks a movie as favorite. Already-favorite movies are left alone
    /// without asking the backend.
    pub async fn add_favorite(&self, movie_id: &str) -> Result<User> {
        let user = self.current_user().ok_or(MyFlixError::NoSession)?;
        if user.favorite_movies.contains(movie_id) {
            debug!("{} is already a favorite", movie_id);
            return Ok(user);
        }

        self.api.add_favorite(&user.username, movie_id).await?;
        info!("Added {} to favorites", movie_id);
        self.session
            .update_favorites(FavoriteDelta::Add(movie_id.to_string()))
    }

    pub async fn remove_favorite(&self, movie_id: &str) -> Result<User> {
        let user = self.current_user().ok_or(MyFlixError::NoSession)?;
        if !user.favorite_movies.contains(movie_id) {
            debug!("{} is not a favorite", movie_id);
            return Ok(user);
        }

        self.api.remove_favorite(&user.username, movie_id).await?;
        info!("Removed {} from favorites", movie_id);
        self.session
            .update_favorites(FavoriteDelta::Remove(movie_id.to_string()))
    }

    /// The cached user's favorites resolved against a fresh catalog.
    pub async fn favorite_movies(&self) -> Result<Vec<Movie>> {
        let user = self.current_user().ok_or(MyFlixError::NoSession)?;
        if user.favorite_movies.is_empty() {
            return Ok(vec![]);
        }
        let catalog = self.api.list_movies().await?;
        Ok(favorites::resolve_favorites(&catalog, &user.favorite_movies))
    }
}
