//! End-to-end flows against a mock backend.

use httpmock::prelude::*;
use myflix::ClientConfig;
use serde_json::json;
use shared::{Credentials, Registration, UserUpdate};

use app::{MyFlix, MyFlixError};

fn app_for(server: &MockServer) -> MyFlix {
    let config = ClientConfig {
        api_url: server.base_url(),
        session_file: None,
    };
    MyFlix::from_config(&config).unwrap()
}

async fn logged_in(server: &MockServer, favorites: serde_json::Value) -> MyFlix {
    server
        .mock_async(|when, then| {
            when.method(POST).path("/login");
            then.status(200).json_body(json!({
                "token": "abc",
                "user": {"Username": "alice", "Email": "alice@example.com", "FavoriteMovies": favorites.clone()}
            }));
        })
        .await;
    let app = app_for(server);
    app.login(&Credentials::new("alice", "secret")).await.unwrap();
    app
}

fn catalog() -> serde_json::Value {
    json!([
        {"_id": "m1", "Title": "Heat", "Genre": {"Name": "Crime"}, "Director": {"Name": "Michael Mann"}},
        {"_id": "m2", "Title": "Alien", "Genre": {"Name": "Horror"}, "Director": {"Name": "Ridley Scott"}}
    ])
}

#[tokio::test]
async fn login_persists_token_and_user() {
    let server = MockServer::start_async().await;
    let login = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/login")
                .json_body(json!({"Username": "alice", "Password": "secret"}));
            then.status(200)
                .json_body(json!({"token": "abc", "user": {"username": "alice", "favorites": []}}));
        })
        .await;

    let app = app_for(&server);
    assert!(!app.is_logged_in());

    let session = app
        .login(&Credentials::new("alice", "secret"))
        .await
        .unwrap();
    login.assert_async().await;

    assert_eq!(session.token, "abc");
    let stored = app.session().load().unwrap();
    assert_eq!(stored.token, "abc");
    assert_eq!(stored.user.username, "alice");
    assert!(stored.user.favorite_movies.is_empty());
}

#[tokio::test]
async fn failed_login_leaves_no_session() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/login");
            then.status(400).json_body(json!({"message": "Something is not right"}));
        })
        .await;

    let app = app_for(&server);
    let err = app
        .login(&Credentials::new("alice", "nope"))
        .await
        .unwrap_err();
    assert!(matches!(err, MyFlixError::AuthenticationFailed));
    assert!(!app.is_logged_in());
}

#[tokio::test]
async fn register_then_login() {
    let server = MockServer::start_async().await;
    let register = server
        .mock_async(|when, then| {
            when.method(POST).path("/users");
            then.status(201)
                .json_body(json!({"Username": "bob", "Email": "bob@example.com"}));
        })
        .await;
    let login = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/login")
                .json_body(json!({"Username": "bob", "Password": "pw"}));
            then.status(200)
                .json_body(json!({"token": "t-bob", "user": {"Username": "bob"}}));
        })
        .await;

    let app = app_for(&server);
    let session = app
        .register_and_login(&Registration {
            username: "bob".into(),
            password: "pw".into(),
            email: "bob@example.com".into(),
            birthday: None,
        })
        .await
        .unwrap();

    register.assert_async().await;
    login.assert_async().await;
    assert_eq!(session.user.username, "bob");
    assert_eq!(app.session().token().as_deref(), Some("t-bob"));
}

#[tokio::test]
async fn added_favorite_shows_up_in_resolved_favorites() {
    let server = MockServer::start_async().await;
    let app = logged_in(&server, json!([])).await;

    let add = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/users/alice/movies/m1")
                .header("authorization", "Bearer abc");
            then.status(201)
                .json_body(json!({"Username": "alice", "FavoriteMovies": ["m1"]}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/movies");
            then.status(200).json_body(catalog());
        })
        .await;

    let user = app.add_favorite("m1").await.unwrap();
    add.assert_async().await;
    assert!(user.favorite_movies.contains("m1"));
    assert!(app.is_favorite("m1"));

    let favorites = app.favorite_movies().await.unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].id, "m1");
    assert_eq!(favorites[0].title, "Heat");

    // recomputed from scratch, same answer
    assert_eq!(app.favorite_movies().await.unwrap(), favorites);
}

#[tokio::test]
async fn favorite_toggles_are_idempotent_on_the_client() {
    let server = MockServer::start_async().await;
    // cached favorites arrive as embedded movie objects
    let app = logged_in(&server, json!([{"_id": "m1", "Title": "Heat"}])).await;

    // no favorite endpoints are mocked: a request would come back 404
    let user = app.add_favorite("m1").await.unwrap();
    assert_eq!(user.favorite_movies.len(), 1);

    let user = app.remove_favorite("m2").await.unwrap();
    assert_eq!(user.favorite_movies.iter().collect::<Vec<_>>(), vec!["m1"]);
    assert_eq!(app.current_user().unwrap().favorite_movies.len(), 1);
}

#[tokio::test]
async fn failed_favorite_call_leaves_cache_untouched() {
    let server = MockServer::start_async().await;
    let app = logged_in(&server, json!(["m1"])).await;

    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/users/alice/movies/m1");
            then.status(500).body("database unavailable");
        })
        .await;

    let err = app.remove_favorite("m1").await.unwrap_err();
    assert!(matches!(err, MyFlixError::Api { status: 500, .. }));
    assert!(app.is_favorite("m1"));
}

#[tokio::test]
async fn removed_favorite_drops_out_of_cache() {
    let server = MockServer::start_async().await;
    let app = logged_in(&server, json!(["m1", "m2"])).await;

    let remove = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/users/alice/movies/m2");
            then.status(200)
                .json_body(json!({"Username": "alice", "FavoriteMovies": ["m1"]}));
        })
        .await;

    let user = app.remove_favorite("m2").await.unwrap();
    remove.assert_async().await;
    assert!(!user.favorite_movies.contains("m2"));
    assert!(!app.is_favorite("m2"));
    assert!(app.is_favorite("m1"));
}

#[tokio::test]
async fn empty_favorites_skip_the_catalog() {
    let server = MockServer::start_async().await;
    let app = logged_in(&server, json!([])).await;

    // /movies is not mocked; fetching it would fail
    assert!(app.favorite_movies().await.unwrap().is_empty());
}

#[tokio::test]
async fn profile_edit_keeps_the_username() {
    let server = MockServer::start_async().await;
    let app = logged_in(&server, json!(["m1"])).await;

    let edit = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/users/alice")
                .json_body(json!({"Email": "new@example.com", "Birthday": "1990-04-02"}));
            then.status(200).json_body(json!({
                "Username": "mallory",
                "Email": "new@example.com",
                "Birthday": "1990-04-02T00:00:00.000Z",
                "FavoriteMovies": ["m1"]
            }));
        })
        .await;

    // a form that tries to rename the account and leaves the password blank
    let update: UserUpdate = serde_json::from_value(json!({
        "Username": "mallory",
        "email": "new@example.com",
        "birthday": "1990-04-02",
        "password": ""
    }))
    .unwrap();

    let user = app.update_profile(update).await.unwrap();
    edit.assert_async().await;

    assert_eq!(user.username, "alice");
    assert_eq!(user.email.as_deref(), Some("new@example.com"));
    let cached = app.current_user().unwrap();
    assert_eq!(cached.username, "alice");
    assert_eq!(cached.email.as_deref(), Some("new@example.com"));
}

#[tokio::test]
async fn profile_echo_without_favorites_keeps_cached_ones() {
    let server = MockServer::start_async().await;
    let app = logged_in(&server, json!(["m1", "m2"])).await;

    server
        .mock_async(|when, then| {
            when.method(PUT).path("/users/alice");
            then.status(200).json_body(json!({
                "Username": "alice",
                "Email": "new@example.com"
            }));
        })
        .await;

    let update = UserUpdate {
        email: Some("new@example.com".into()),
        ..Default::default()
    };
    let user = app.update_profile(update).await.unwrap();

    assert_eq!(user.favorite_movies.iter().collect::<Vec<_>>(), vec!["m1", "m2"]);
    assert!(app.is_favorite("m2"));
    assert_eq!(
        app.current_user().unwrap().email.as_deref(),
        Some("new@example.com")
    );
}

#[tokio::test]
async fn empty_profile_edit_sends_nothing() {
    let server = MockServer::start_async().await;
    let app = logged_in(&server, json!(["m1"])).await;

    // PUT /users/alice is not mocked; sending it would fail
    let update = UserUpdate {
        password: Some("  ".into()),
        ..Default::default()
    };
    let user = app.update_profile(update).await.unwrap();

    assert_eq!(user, app.current_user().unwrap());
    assert_eq!(user.email.as_deref(), Some("alice@example.com"));
}

#[tokio::test]
async fn rejected_profile_edit_keeps_cached_profile() {
    let server = MockServer::start_async().await;
    let app = logged_in(&server, json!([])).await;

    server
        .mock_async(|when, then| {
            when.method(PUT).path("/users/alice");
            then.status(422)
                .json_body(json!({"errors": [{"msg": "Email does not appear to be valid"}]}));
        })
        .await;

    let update = UserUpdate {
        email: Some("not-an-email".into()),
        ..Default::default()
    };
    let err = app.update_profile(update).await.unwrap_err();
    assert_eq!(err.user_message(), "Email does not appear to be valid");
    assert_eq!(
        app.current_user().unwrap().email.as_deref(),
        Some("alice@example.com")
    );
}

#[tokio::test]
async fn refresh_profile_replaces_cached_user() {
    let server = MockServer::start_async().await;
    let app = logged_in(&server, json!([])).await;

    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/users/alice")
                .header("authorization", "Bearer abc");
            then.status(200).json_body(json!({
                "Username": "alice",
                "Email": "alice@example.com",
                "FavoriteMovies": [{"_id": "m2"}]
            }));
        })
        .await;

    app.refresh_profile().await.unwrap();
    assert!(app.is_favorite("m2"));
    assert_eq!(app.session().token().as_deref(), Some("abc"));
}

#[tokio::test]
async fn delete_account_clears_session() {
    let server = MockServer::start_async().await;
    let app = logged_in(&server, json!([])).await;

    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/users/alice");
            then.status(200).body("alice was deleted.");
        })
        .await;

    app.delete_account().await.unwrap();
    delete.assert_async().await;
    assert!(!app.is_logged_in());
    assert_eq!(app.session().load(), None);
}

#[tokio::test]
async fn failed_delete_keeps_session() {
    let server = MockServer::start_async().await;
    let app = logged_in(&server, json!([])).await;

    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/users/alice");
            then.status(500).body("try again later");
        })
        .await;

    assert!(app.delete_account().await.is_err());
    assert!(app.is_logged_in());
}

#[tokio::test]
async fn logout_clears_session_and_blocks_authenticated_calls() {
    let server = MockServer::start_async().await;
    let app = logged_in(&server, json!(["m1"])).await;

    app.logout().unwrap();
    assert!(!app.is_logged_in());
    assert!(!app.is_favorite("m1"));

    assert!(matches!(
        app.movies().await.unwrap_err(),
        MyFlixError::NotAuthenticated
    ));
    assert!(matches!(
        app.add_favorite("m2").await.unwrap_err(),
        MyFlixError::NoSession
    ));
}

#[tokio::test]
async fn file_session_survives_restart() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/login");
            then.status(200)
                .json_body(json!({"token": "abc", "user": {"Username": "alice", "FavoriteMovies": ["m2"]}}));
        })
        .await;

    let dir = tempfile::TempDir::new().unwrap();
    let config = ClientConfig {
        api_url: server.base_url(),
        session_file: Some(dir.path().join("session.json")),
    };

    MyFlix::from_config(&config)
        .unwrap()
        .login(&Credentials::new("alice", "secret"))
        .await
        .unwrap();

    let restarted = MyFlix::from_config(&config).unwrap();
    assert!(restarted.is_logged_in());
    assert!(restarted.is_favorite("m2"));
}
