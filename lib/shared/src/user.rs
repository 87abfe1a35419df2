use std::fmt;

use chrono::NaiveDate;
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A user profile as returned by the backend and cached in the session.
///
/// Decoding accepts both the backend's capitalized field names and the
/// camelCase ones, even side by side in one record; encoding always produces
/// camelCase.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawUser")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(serialize_with = "birthday::serialize", skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
    pub favorite_movies: Favorites,
}

/// Wire shape of [`User`] with each casing in its own slot. A record the
/// profile screen re-saved carries `username` next to `Username`, so a plain
/// alias would reject it as a duplicate field.
#[derive(Deserialize)]
struct RawUser {
    #[serde(rename = "_id", default)]
    object_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(rename = "Username", default)]
    username_capitalized: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(rename = "Email", default)]
    email_capitalized: Option<String>,
    #[serde(default, deserialize_with = "birthday::deserialize_lenient")]
    birthday: Option<NaiveDate>,
    #[serde(rename = "Birthday", default, deserialize_with = "birthday::deserialize_lenient")]
    birthday_capitalized: Option<NaiveDate>,
    #[serde(rename = "favoriteMovies", default)]
    favorite_movies: Option<Favorites>,
    #[serde(rename = "FavoriteMovies", default)]
    favorite_movies_capitalized: Option<Favorites>,
}

impl TryFrom<RawUser> for User {
    type Error = String;

    /// camelCase wins when both casings are present.
    fn try_from(raw: RawUser) -> Result<Self, Self::Error> {
        let username = raw
            .username
            .or(raw.username_capitalized)
            .ok_or_else(|| "missing field `username`".to_string())?;
        Ok(User {
            id: raw.object_id.or(raw.id),
            username,
            email: raw.email.or(raw.email_capitalized),
            birthday: raw.birthday.or(raw.birthday_capitalized),
            favorite_movies: raw
                .favorite_movies
                .or(raw.favorite_movies_capitalized)
                .unwrap_or_default(),
        })
    }
}

/// Changes to a user profile.
///
/// There is intentionally no username field: decoding a form that carries one
/// drops it, so an edit can never rename the account.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(rename = "Email", alias = "email", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        rename = "Birthday",
        alias = "birthday",
        default,
        with = "birthday",
        skip_serializing_if = "Option::is_none"
    )]
    pub birthday: Option<NaiveDate>,
    #[serde(rename = "Password", alias = "password", default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UserUpdate {
    /// Drops a password that is empty or only whitespace.
    pub fn without_blank_password(mut self) -> Self {
        if self
            .password
            .as_deref()
            .is_some_and(|p| p.trim().is_empty())
        {
            self.password = None;
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.birthday.is_none() && self.password.is_none()
    }
}

/// Payload for `POST /users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    #[serde(rename = "Username", alias = "username")]
    pub username: String,
    #[serde(rename = "Password", alias = "password")]
    pub password: String,
    #[serde(rename = "Email", alias = "email")]
    pub email: String,
    #[serde(
        rename = "Birthday",
        alias = "birthday",
        default,
        with = "birthday",
        skip_serializing_if = "Option::is_none"
    )]
    pub birthday: Option<NaiveDate>,
}

impl Registration {
    pub fn credentials(&self) -> crate::auth::Credentials {
        crate::auth::Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

/// One entry of a raw favorites list: either a bare movie id or an embedded
/// movie object carrying its id.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FavoriteRef {
    Id(String),
    Movie {
        #[serde(rename = "_id", alias = "id")]
        id: String,
    },
    Other(serde_json::Value),
}

impl FavoriteRef {
    pub fn id(&self) -> Option<&str> {
        match self {
            FavoriteRef::Id(id) | FavoriteRef::Movie { id } => Some(id),
            FavoriteRef::Other(_) => None,
        }
    }
}

/// A user's favorite movie ids, normalized to a flat, duplicate-free list.
///
/// The backend sends either ids or movie objects; both collapse to ids here so
/// nothing downstream has to care which one it got.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Favorites(Vec<String>);

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_refs<'a>(refs: impl IntoIterator<Item = &'a FavoriteRef>) -> Self {
        let mut favorites = Self::new();
        for id in refs.into_iter().filter_map(FavoriteRef::id) {
            favorites.insert(id);
        }
        favorites
    }

    pub fn contains(&self, movie_id: &str) -> bool {
        self.0.iter().any(|id| id == movie_id)
    }

    /// Returns `false` if the id was already present.
    pub fn insert(&mut self, movie_id: &str) -> bool {
        if self.contains(movie_id) {
            return false;
        }
        self.0.push(movie_id.to_string());
        true
    }

    /// Returns `false` if the id was not present.
    pub fn remove(&mut self, movie_id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|id| id != movie_id);
        self.0.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Favorites {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut favorites = Self::new();
        for id in iter {
            favorites.insert(&id.into());
        }
        favorites
    }
}

impl Serialize for Favorites {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Favorites {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FavoritesVisitor;

        impl<'de> Visitor<'de> for FavoritesVisitor {
            type Value = Favorites;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a list of movie ids or movie objects, or null")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(Favorites::new())
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(Favorites::new())
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut favorites = Favorites::new();
                while let Some(entry) = seq.next_element::<FavoriteRef>()? {
                    if let Some(id) = entry.id() {
                        favorites.insert(id);
                    }
                }
                Ok(favorites)
            }
        }

        deserializer.deserialize_any(FavoritesVisitor)
    }
}

/// Birthdays come back either as plain dates or as full timestamps.
mod birthday {
    use chrono::{DateTime, NaiveDate};
    use serde::{de, Deserialize, Deserializer, Serializer};
    use tracing::warn;

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_str(&d.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    /// Rejects anything that is not a date, for form input.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        parse(raw).map_err(|raw| de::Error::custom(format!("invalid birthday: {raw}")))
    }

    /// Drops an unreadable birthday instead of failing the whole record.
    pub fn deserialize_lenient<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
        let raw = match raw {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s),
            Some(other) => Some(other.to_string()),
        };
        Ok(parse(raw).unwrap_or_else(|raw| {
            warn!("Ignoring unreadable birthday: {}", raw);
            None
        }))
    }

    fn parse(raw: Option<String>) -> Result<Option<NaiveDate>, String> {
        let Some(raw) = raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        if let Ok(date) = NaiveDate::parse_from_str(&raw, FORMAT) {
            return Ok(Some(date));
        }
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| Some(dt.date_naive()))
            .map_err(|_| raw)
    }
}
