//! Per-test fixtures: every test gets its own database, app and users.

use std::sync::OnceLock;

use axum::{http::StatusCode, Router};
use axum_test::TestServer;
use rusqlite::{params, OptionalExtension};

use crate::{
    auth::LOGIN_URL,
    db::DB,
    notes::Note,
    tests::test_server,
    users::{
        auth::{create_user as insert_user, CreateUserParameters, User},
        password::hash_password,
    },
};

pub const PASSWORD: &str = "correct-horse-battery-staple";

/// Hashed once, Argon2 is slow in debug builds.
fn password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(PASSWORD).unwrap()).clone()
}

pub async fn create_user(db: &DB, username: &str) -> User {
    insert_user(
        db.clone(),
        CreateUserParameters {
            username: username.into(),
            password_hash: password_hash(),
        },
    )
    .await
    .unwrap()
}

/// Inserts a note directly, bypassing the views.
pub async fn create_note(db: &DB, author: &User, title: &str, slug: &str) -> Note {
    let (title, slug, author) = (title.to_owned(), slug.to_owned(), author.id);
    db.call(move |conn| {
        conn.query_row(
            r#"INSERT INTO notes (title, text, slug, author) VALUES (?, 'Просто текст.', ?, ?)
            RETURNING id, title, text, slug, author, created_at, updated_at"#,
            params![title, slug, author],
            |row| Note::try_from(row),
        )
        .map_err(|e| e.into())
    })
    .await
    .unwrap()
}

pub async fn find_note(db: &DB, slug: &str) -> Option<Note> {
    let slug = slug.to_owned();
    db.call(move |conn| {
        conn.query_row(
            "SELECT id, title, text, slug, author, created_at, updated_at FROM notes WHERE slug = ?",
            params![slug],
            |row| Note::try_from(row),
        )
        .optional()
        .map_err(|e| e.into())
    })
    .await
    .unwrap()
}

pub async fn all_notes(db: &DB) -> Vec<Note> {
    db.call(|conn| {
        let notes = conn
            .prepare("SELECT id, title, text, slug, author, created_at, updated_at FROM notes")?
            .query_map([], |row| Note::try_from(row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(notes)
    })
    .await
    .unwrap()
}

/// A client with its own cookie jar, logged in as `username`.
pub async fn logged_in(app: &Router, username: &str) -> TestServer {
    let server = test_server(app.clone());

    let response = server
        .post(LOGIN_URL)
        .form(&[("username", username), ("password", PASSWORD)])
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER, "login as {username} failed");

    server
}
