use super::models::ErrorBody;
use crate::{
    config::DEFAULT_API_URL,
    error::{MyFlixError, Result},
    traits::{MovieApi, TokenProvider},
};
use async_trait::async_trait;
use reqwest::{Client, Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use shared::{Credentials, Director, Genre, LoginResponse, Movie, Registration, User, UserUpdate};
use std::{fmt, sync::Arc};
use tracing::{debug, error, info};
use url::Url;

const NO_BODY: Option<&()> = None;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Auth {
    Anonymous,
    Bearer,
}

/// HTTP adapter for the myFlix backend.
///
/// Stateless apart from the connection pool: the bearer token is pulled from
/// the configured [`TokenProvider`] on every authenticated call.
#[derive(Clone)]
pub struct MyFlixClient {
    base_url: Url,
    client: Client,
    tokens: Option<Arc<dyn TokenProvider>>,
}

impl fmt::Debug for MyFlixClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MyFlixClient")
            .field("base_url", &self.base_url.as_str())
            .field("has_token_provider", &self.tokens.is_some())
            .finish()
    }
}

#[derive(Default)]
pub struct MyFlixClientBuilder {
    base_url: Option<String>,
    tokens: Option<Arc<dyn TokenProvider>>,
    client: Option<Client>,
}

impl MyFlixClientBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.to_string());
        self
    }

    pub fn token_provider(mut self, tokens: Arc<dyn TokenProvider>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn http_client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> Result<MyFlixClient> {
        let base_url_str = self.base_url.as_deref().unwrap_or(DEFAULT_API_URL);
        let base_url = Url::parse(base_url_str)?;
        if base_url.cannot_be_a_base() {
            return Err(MyFlixError::InvalidBaseUrl(base_url_str.to_string()));
        }

        info!("myFlix API at {}", base_url);
        Ok(MyFlixClient {
            base_url,
            client: self.client.unwrap_or_default(),
            tokens: self.tokens,
        })
    }
}

impl MyFlixClient {
    pub fn builder() -> MyFlixClientBuilder {
        MyFlixClientBuilder::new()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends `segments` to the base URL, percent-escaping each one, so a
    /// title like `AC/DC: Live` stays a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| MyFlixError::InvalidBaseUrl(self.base_url.to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn bearer_token(&self) -> Result<String> {
        self.tokens
            .as_ref()
            .and_then(|tokens| tokens.token())
            .filter(|token| !token.is_empty())
            .ok_or(MyFlixError::NotAuthenticated)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        auth: Auth,
        body: Option<&B>,
    ) -> Result<String> {
        let mut request = self.client.request(method, url);
        if auth == Auth::Bearer {
            request = request.bearer_auth(self.bearer_token()?);
        }
        if let Some(b) = body {
            request = request.json(b);
        }
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Returns the body of a successful response, or the classified error.
    async fn handle_response(response: Response) -> Result<String> {
        let status = response.status();
        if status.is_success() {
            Ok(response.text().await?)
        } else {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error body".to_string());
            Err(Self::classify(status, &text))
        }
    }

    fn classify(status: StatusCode, text: &str) -> MyFlixError {
        let body = ErrorBody::parse(text);
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => MyFlixError::Unauthorized {
                message: body.message,
            },
            StatusCode::NOT_FOUND => MyFlixError::NotFound {
                message: body.message,
            },
            StatusCode::CONFLICT => MyFlixError::Conflict {
                message: body.message,
            },
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY
                if body.mentions_duplicate() =>
            {
                MyFlixError::Conflict {
                    message: body.message,
                }
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => MyFlixError::Validation {
                errors: body.errors,
                message: body.message,
            },
            _ => MyFlixError::Api {
                status: status.as_u16(),
                message: body.message,
            },
        }
    }

    fn decode<T: DeserializeOwned>(text: &str) -> Result<T> {
        let text = if text.trim().is_empty() { "null" } else { text };
        serde_json::from_str(text).map_err(|e| MyFlixError::Decode {
            status: StatusCode::OK.as_u16(),
            message: format!("JSON parse error: {e}"),
        })
    }

    /// Every call ends here: failures are logged once, then handed back
    /// untouched. Nothing is retried.
    async fn execute<T, B, F>(
        &self,
        method: Method,
        segments: &[&str],
        auth: Auth,
        body: Option<&B>,
        read: F,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        F: FnOnce(&str) -> Result<T>,
    {
        let url = self.endpoint(segments)?;
        debug!("Request: {} {}", method, url);
        let outcome = match self.send(method.clone(), url.clone(), auth, body).await {
            Ok(text) => read(&text),
            Err(e) => Err(e),
        };
        outcome.map_err(|e| {
            error!("API error: {} {} failed: {}", method, url, e);
            e
        })
    }

    async fn make_request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        auth: Auth,
        body: Option<&B>,
    ) -> Result<T> {
        self.execute(method, segments, auth, body, Self::decode::<T>)
            .await
    }

    async fn make_empty_request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<()> {
        self.execute(method, segments, Auth::Bearer, body, |_| Ok(()))
            .await
    }
}

#[async_trait]
impl MovieApi for MyFlixClient {
    async fn register(&self, registration: &Registration) -> Result<User> {
        info!("Registering user {}", registration.username);
        self.make_request(Method::POST, &["users"], Auth::Anonymous, Some(registration))
            .await
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        self.make_request(Method::POST, &["login"], Auth::Anonymous, Some(credentials))
            .await
            .map_err(|e| match e {
                MyFlixError::Unauthorized { .. }
                | MyFlixError::NotFound { .. }
                | MyFlixError::Validation { .. }
                | MyFlixError::Conflict { .. } => MyFlixError::AuthenticationFailed,
                MyFlixError::Api { status, .. } if (400..500).contains(&status) => {
                    MyFlixError::AuthenticationFailed
                }
                other => other,
            })
    }

    async fn get_user(&self, username: &str) -> Result<User> {
        self.make_request(Method::GET, &["users", username], Auth::Bearer, NO_BODY)
            .await
    }

    async fn edit_user(&self, username: &str, update: &UserUpdate) -> Result<User> {
        self.make_request(Method::PUT, &["users", username], Auth::Bearer, Some(update))
            .await
    }

    async fn delete_user(&self, username: &str) -> Result<()> {
        info!("Deleting user {}", username);
        self.make_empty_request(Method::DELETE, &["users", username], NO_BODY)
            .await
    }

    async fn list_movies(&self) -> Result<Vec<Movie>> {
        self.make_request(Method::GET, &["movies"], Auth::Bearer, NO_BODY)
            .await
    }

    async fn get_movie(&self, title: &str) -> Result<Movie> {
        self.make_request(Method::GET, &["movies", title], Auth::Bearer, NO_BODY)
            .await
    }

    async fn get_director(&self, name: &str) -> Result<Director> {
        self.make_request(
            Method::GET,
            &["movies", "directors", name],
            Auth::Bearer,
            NO_BODY,
        )
        .await
    }

    async fn get_genre(&self, name: &str) -> Result<Genre> {
        self.make_request(Method::GET, &["movies", "genres", name], Auth::Bearer, NO_BODY)
            .await
    }

    async fn add_favorite(&self, username: &str, movie_id: &str) -> Result<()> {
        self.make_empty_request(
            Method::POST,
            &["users", username, "movies", movie_id],
            Some(&serde_json::json!({})),
        )
        .await
    }

    async fn remove_favorite(&self, username: &str, movie_id: &str) -> Result<()> {
        self.make_empty_request(
            Method::DELETE,
            &["users", username, "movies", movie_id],
            NO_BODY,
        )
        .await
    }
}
