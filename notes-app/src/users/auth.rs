use crate::db::{self, DB};
use rusqlite::{named_params, Row};
use serde::Deserialize;

use super::*;

#[derive(Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl<'a> TryFrom<&Row<'a>> for User {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get(0)?,
            username: row.get(1)?,
            password: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CreateUserParameters {
    pub username: String,
    /// Argon2 PHC string, see [`super::password::hash_password`].
    pub password_hash: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GetUserByUsernameParameters {
    pub username: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GetUserByIdParameters {
    pub user_id: UserId,
}

pub type GetUserResponse = User;
pub type CreateUserResponse = User;

pub async fn create_user(db: DB, args: CreateUserParameters) -> db::Result<CreateUserResponse> {
    let user = db
        .call(move |conn| {
            conn.query_row(
                r#"INSERT INTO users (username, password) VALUES (:username, :password)
                    RETURNING id, username, password, created_at, updated_at"#,
                named_params! {
                    ":username": args.username,
                    ":password": args.password_hash
                },
                |r| User::try_from(r),
            )
            .map_err(|e| e.into())
        })
        .await?;

    Ok(user)
}

pub async fn find_one_by_id(db: DB, args: GetUserByIdParameters) -> db::Result<GetUserResponse> {
    let user_id = args.user_id;
    let user = db
        .call(move |conn| {
            conn.query_row_and_then(
                "SELECT id, username, password, created_at, updated_at FROM users WHERE id = ?",
                [args.user_id],
                |r| User::try_from(r),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(|e| e.not_found_message(format!("User '{}' not found", user_id)))?;

    Ok(user)
}

pub async fn find_one_by_username(db: DB, args: GetUserByUsernameParameters) -> db::Result<GetUserResponse> {
    let username = args.username.to_owned();
    let user = db
        .call(|conn| {
            conn.query_row(
                "SELECT id, username, password, created_at, updated_at FROM users WHERE username = ?",
                [args.username],
                |r| User::try_from(r),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(|e| e.not_found_message(format!("User '{}' not found", username)))?;

    Ok(user)
}

pub async fn username_exists(db: DB, username: String) -> db::Result<bool> {
    let exists = db
        .call(move |conn| {
            conn.query_row(
                "SELECT EXISTS (SELECT 1 FROM users WHERE username = ?)",
                [username],
                |r| r.get::<_, bool>(0),
            )
            .map_err(|e| e.into())
        })
        .await?;

    Ok(exists)
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use crate::db::{self, init_test_db};

    use super::*;

    fn params(username: &str) -> CreateUserParameters {
        CreateUserParameters {
            username: username.into(),
            password_hash: "$argon2id$stub".into(),
        }
    }

    #[tokio::test]
    async fn user_create() {
        let db = init_test_db().await.unwrap();
        let user = create_user(db, params("Лев Толстой")).await.unwrap();

        assert_eq!(user.username, "Лев Толстой");
        assert_eq!(user.password, "$argon2id$stub");
    }

    #[tokio::test]
    async fn user_create_duplicate() {
        let db = init_test_db().await.unwrap();
        create_user(db.clone(), params("reader")).await.unwrap();

        let user = create_user(db, params("reader")).await;

        assert!(matches!(user.err(), Some(db::Error::UniqueViolation(_))));
    }

    #[tokio::test]
    async fn user_get_by_id() {
        let db = init_test_db().await.unwrap();
        let user = create_user(db.clone(), params("reader")).await.unwrap();

        let user = find_one_by_id(db, GetUserByIdParameters { user_id: user.id })
            .await
            .unwrap();

        assert_eq!(user.username, "reader");
    }

    #[tokio::test]
    async fn user_get_by_username() {
        let db = init_test_db().await.unwrap();
        create_user(db.clone(), params("reader")).await.unwrap();

        let user = find_one_by_username(
            db.clone(),
            GetUserByUsernameParameters {
                username: "reader".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(user.username, "reader");
        assert!(username_exists(db.clone(), "reader".into()).await.unwrap());
        assert!(!username_exists(db, "author".into()).await.unwrap());
    }

    #[tokio::test]
    async fn user_not_found() {
        let db = init_test_db().await.unwrap();

        let user = find_one_by_username(
            db.clone(),
            GetUserByUsernameParameters {
                username: "reader".into(),
            },
        )
        .await;

        assert!(matches!(user.err(), Some(db::Error::NotFound(_))));

        let user = find_one_by_id(
            db,
            GetUserByIdParameters {
                user_id: Uuid::new_v4(),
            },
        )
        .await;

        assert!(matches!(user.err(), Some(db::Error::NotFound(_))));
    }
}
