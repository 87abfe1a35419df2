//! Resolving a user's favorite ids against the movie catalog.
//!
//! Every call rescans the catalog; there is no index to keep in sync.

use shared::{FavoriteRef, Favorites, Movie};

/// Movies from `catalog` whose id is among `favorites`, in catalog order.
pub fn resolve_favorites(catalog: &[Movie], favorites: &Favorites) -> Vec<Movie> {
    if favorites.is_empty() {
        return vec![];
    }
    catalog
        .iter()
        .filter(|movie| favorites.contains(&movie.id))
        .cloned()
        .collect()
}

/// Same as [`resolve_favorites`] for a favorites list straight off the wire,
/// where entries may be bare ids or embedded movie objects.
pub fn resolve_raw(catalog: &[Movie], favorites: &[FavoriteRef]) -> Vec<Movie> {
    resolve_favorites(catalog, &Favorites::from_refs(favorites))
}

pub fn is_favorite(favorites: &Favorites, movie_id: &str) -> bool {
    favorites.contains(movie_id)
}
