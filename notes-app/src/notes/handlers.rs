use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::{ctx::BaseParams, db, Error, Result};

use super::{CreateNote, Note, UpdateNote};

impl<'a> TryFrom<&Row<'a>> for Note {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            text: row.get(2)?,
            slug: row.get(3)?,
            author: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

/// Whether a note other than `exclude` already uses `slug`.
fn slug_taken(conn: &Connection, slug: &str, exclude: Option<Uuid>) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM notes WHERE slug = ?1 AND (?2 IS NULL OR id != ?2))",
        params![slug, exclude],
        |r| r.get(0),
    )
}

/// Unique constraint hits that slipped past [`slug_taken`] are still a duplicate slug.
fn duplicate_slug(slug: String) -> impl FnOnce(Error) -> Error {
    move |err| match err {
        Error::DB(db::Error::UniqueViolation(_)) => Error::DuplicateSlug(slug),
        err => err,
    }
}

/// Notes written by the requester, oldest first.
pub async fn find_notes(BaseParams { db, ctx }: BaseParams) -> Result<Vec<Note>> {
    let author = ctx.require_user_id()?;

    db.call(move |conn| {
        let notes = conn
            .prepare(
                r#"SELECT id, title, text, slug, author, created_at, updated_at FROM notes
                WHERE author = ?
                ORDER BY created_at, id"#,
            )?
            .query_map(params![author], |row| Note::try_from(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(notes)
    })
    .await
    .map_err(Error::from)
}

/// Any note by slug, whoever wrote it.
pub async fn get_note(slug: String, BaseParams { db, ctx }: BaseParams) -> Result<Note> {
    db.call(move |conn| {
        let note = conn.query_row(
            "SELECT id, title, text, slug, author, created_at, updated_at FROM notes WHERE slug = ?",
            params![slug],
            |row| Note::try_from(row),
        )?;
        Ok(note)
    })
    .await
    .map_err(Error::from)
    .map_err(|e| e.not_found_message("Note not found"))
}

/// A note by slug, only when the requester wrote it. Someone else's note is
/// reported exactly like a missing one.
pub async fn get_own_note(slug: String, BaseParams { db, ctx }: BaseParams) -> Result<Note> {
    let author = ctx.require_user_id()?;

    db.call(move |conn| {
        let note = conn.query_row(
            r#"SELECT id, title, text, slug, author, created_at, updated_at FROM notes
            WHERE slug = ? AND author = ?"#,
            params![slug, author],
            |row| Note::try_from(row),
        )?;
        Ok(note)
    })
    .await
    .map_err(Error::from)
    .map_err(|e| e.not_found_message("Note not found"))
}

pub async fn create_note(
    CreateNote { title, text, slug }: CreateNote,
    BaseParams { db, ctx }: BaseParams,
) -> Result<Note> {
    let author = ctx.require_user_id()?;
    let on_conflict = duplicate_slug(slug.clone());

    let note = db
        .call(move |conn| {
            if slug_taken(conn, &slug, None)? {
                return Err(Error::DuplicateSlug(slug).into());
            }

            conn.query_row(
                r#"INSERT INTO notes (title, text, slug, author) VALUES (?, ?, ?, ?)
                RETURNING id, title, text, slug, author, created_at, updated_at"#,
                params![title, text, slug, author],
                |row| Note::try_from(row),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(Error::from)
        .map_err(on_conflict)?;

    tracing::info!("note '{}' created", note.slug);

    Ok(note)
}

pub async fn update_note(
    slug: String,
    UpdateNote {
        title,
        text,
        slug: new_slug,
    }: UpdateNote,
    BaseParams { db, ctx }: BaseParams,
) -> Result<Note> {
    let author = ctx.require_user_id()?;
    let on_conflict = duplicate_slug(new_slug.clone().unwrap_or_else(|| slug.clone()));

    let note = db
        .call(move |conn| {
            let note_id = conn
                .query_row(
                    "SELECT id FROM notes WHERE slug = ? AND author = ?",
                    params![slug, author],
                    |r| r.get::<_, Uuid>(0),
                )
                .optional()?
                .ok_or(Error::NotFound("Note not found".into()))?;

            let new_slug = new_slug.unwrap_or(slug);
            if slug_taken(conn, &new_slug, Some(note_id))? {
                return Err(Error::DuplicateSlug(new_slug).into());
            }

            conn.query_row(
                r#"UPDATE notes SET title = ?, text = ?, slug = ?, updated_at = ?
                WHERE id = ? AND author = ?
                RETURNING id, title, text, slug, author, created_at, updated_at"#,
                params![title, text, new_slug, chrono::Utc::now(), note_id, author],
                |row| Note::try_from(row),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(Error::from)
        .map_err(|e| e.not_found_message("Note not found"))
        .map_err(on_conflict)?;

    tracing::info!("note '{}' updated", note.slug);

    Ok(note)
}

pub async fn delete_note(slug: String, BaseParams { db, ctx }: BaseParams) -> Result<Note> {
    let author = ctx.require_user_id()?;

    let note = db
        .call(move |conn| {
            conn.query_row(
                r#"DELETE FROM notes
                WHERE slug = ? AND author = ?
                RETURNING id, title, text, slug, author, created_at, updated_at"#,
                params![slug, author],
                |row| Note::try_from(row),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(Error::from)
        .map_err(|e| e.not_found_message("Note not found"))?;

    tracing::info!("note '{}' deleted", note.slug);

    Ok(note)
}
