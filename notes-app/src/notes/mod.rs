mod form;
mod handlers;
mod model;
mod routes;
pub mod slugs;

pub use form::{NoteForm, WARNING};
pub use model::*;
pub use routes::{paths, router};
