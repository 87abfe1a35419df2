use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Genre {
    #[serde(alias = "Name", default)]
    pub name: String,
    #[serde(alias = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Director {
    #[serde(alias = "Name", default)]
    pub name: String,
    #[serde(alias = "Bio", default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(alias = "Birth", default, skip_serializing_if = "Option::is_none")]
    pub birth: Option<String>,
    #[serde(alias = "Death", default, skip_serializing_if = "Option::is_none")]
    pub death: Option<String>,
}

/// A catalog entry. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(alias = "Title")]
    pub title: String,
    #[serde(alias = "Description", default)]
    pub description: String,
    #[serde(alias = "Genre", default)]
    pub genre: Genre,
    #[serde(alias = "Director", default)]
    pub director: Director,
    #[serde(alias = "ImagePath", default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(alias = "Featured", default)]
    pub featured: bool,
}
