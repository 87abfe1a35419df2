pub mod auth;
pub mod movie;
pub mod user;

pub use auth::{Credentials, LoginResponse};
pub use movie::{Director, Genre, Movie};
pub use user::{FavoriteRef, Favorites, Registration, User, UserUpdate};
