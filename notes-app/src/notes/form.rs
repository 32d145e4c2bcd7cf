use serde::{Deserialize, Serialize};

use crate::shared::forms::{self, FormErrors};

use super::{
    slugs::{assign_slug, is_valid_slug, non_blank, SLUG_MAX_LENGTH},
    CreateNote, Note, UpdateNote,
};

/// Appended to a slug that already belongs to another note.
pub const WARNING: &str = " - this slug is already taken, please choose a unique one!";

pub const TITLE_MAX_LENGTH: usize = 100;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NoteForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub slug: Option<String>,
}

impl NoteForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();

        if forms::require(&mut errors, "title", &self.title) {
            forms::max_length(&mut errors, "title", &self.title, TITLE_MAX_LENGTH);
        }
        forms::require(&mut errors, "text", &self.text);

        if let Some(slug) = non_blank(self.slug.as_deref()) {
            if slug.chars().count() > SLUG_MAX_LENGTH {
                forms::max_length(&mut errors, "slug", slug, SLUG_MAX_LENGTH);
            } else if !is_valid_slug(slug) {
                errors.add(
                    "slug",
                    "Enter a valid slug consisting of letters, numbers, underscores or hyphens.",
                );
            }
        }

        errors.into_result()
    }

    pub fn into_create(self) -> CreateNote {
        let slug = assign_slug(&self.title, self.slug.as_deref());
        CreateNote {
            title: self.title,
            text: self.text,
            slug,
        }
    }

    pub fn into_update(self) -> UpdateNote {
        let slug = non_blank(self.slug.as_deref()).map(str::to_owned);
        UpdateNote {
            title: self.title,
            text: self.text,
            slug,
        }
    }
}

impl From<&Note> for NoteForm {
    fn from(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            text: note.text.clone(),
            slug: Some(note.slug.clone()),
        }
    }
}
