use async_trait::async_trait;
use shared::{Credentials, Director, Genre, LoginResponse, Movie, Registration, User, UserUpdate};

use crate::error::Result;

/// Source of the bearer token for authenticated calls.
///
/// Consulted on every request, so a token saved between two calls is picked up
/// by the second one.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// One method per backend endpoint. Each call is a single request attempt.
#[async_trait]
pub trait MovieApi: Send + Sync {
    async fn register(&self, registration: &Registration) -> Result<User>;
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse>;

    async fn get_user(&self, username: &str) -> Result<User>;
    async fn edit_user(&self, username: &str, update: &UserUpdate) -> Result<User>;
    async fn delete_user(&self, username: &str) -> Result<()>;

    async fn list_movies(&self) -> Result<Vec<Movie>>;
    async fn get_movie(&self, title: &str) -> Result<Movie>;
    async fn get_director(&self, name: &str) -> Result<Director>;
    async fn get_genre(&self, name: &str) -> Result<Genre>;

    async fn add_favorite(&self, username: &str, movie_id: &str) -> Result<()>;
    async fn remove_favorite(&self, username: &str, movie_id: &str) -> Result<()>;
}
