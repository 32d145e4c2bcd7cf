use axum::{
    async_trait,
    extract::{Extension, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Response},
    RequestPartsExt,
};
use serde::Serialize;

use crate::{auth::AuthSession, db::DB, users::UserId, Error, Result};

#[derive(Clone, Debug, FromRequestParts)]
pub struct BaseParams {
    pub ctx: Ctx,
    #[from_request(via(Extension))]
    pub db: DB,
}

impl BaseParams {
    pub fn new(db: DB, ctx: Ctx) -> Self {
        Self { db, ctx }
    }
}

/// The requester as seen by views and templates.
#[derive(Debug, Serialize, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

#[derive(Clone, Debug)]
pub struct Ctx {
    pub user: Option<User>,
}

impl Ctx {
    pub fn new(user: Option<User>) -> Self {
        Self { user }
    }

    pub fn get_user_id(&self) -> Option<UserId> {
        self.user.as_ref().map(|u| u.id)
    }

    /// Views behind the login gate always have a user; anything else is a wiring bug.
    pub fn require_user_id(&self) -> Result<UserId> {
        self.get_user_id().ok_or(Error::Unauthorized)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Ctx
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let user = parts
            .extract::<AuthSession>()
            .await
            .map_err(|e| e.into_response())?
            .user
            .map(|u| User {
                id: u.id,
                username: u.username,
            });

        Ok(Self { user })
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn anonymous_ctx_is_unauthorized() {
        assert!(matches!(Ctx::new(None).require_user_id(), Err(Error::Unauthorized)));
    }

    #[test]
    fn user_ctx() {
        let id = Uuid::now_v7();
        let ctx = Ctx::new(Some(User {
            id,
            username: "author".into(),
        }));

        assert_eq!(ctx.require_user_id().unwrap(), id);
    }
}
