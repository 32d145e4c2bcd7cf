use serde::Serialize;
use uuid::Uuid;

use crate::users::UserId;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub author: UserId,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// A validated note ready to be stored. The author is never part of it.
#[derive(Debug, Clone)]
pub struct CreateNote {
    pub title: String,
    pub text: String,
    pub slug: String,
}

#[derive(Debug, Clone)]
pub struct UpdateNote {
    pub title: String,
    pub text: String,
    /// `None` keeps the current slug.
    pub slug: Option<String>,
}
