//! Client core for the myFlix movie API: the HTTP adapter, the persisted
//! session and favorites resolution.

pub mod api;
pub mod config;
pub mod error;
pub mod favorites;
pub mod session;
pub mod traits;

pub use api::{MyFlixClient, MyFlixClientBuilder};
pub use config::ClientConfig;
pub use error::{FieldError, MyFlixError, Result};
pub use session::{FavoriteDelta, Session, SessionStore};
pub use traits::{MovieApi, TokenProvider};
