use axum::{
    extract::Path,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Form, Router,
};
use minijinja::context;

use crate::{
    auth,
    ctx::{BaseParams, Ctx},
    errors::Error,
    shared::forms::FormErrors,
    views::{found, Views},
    AppState, Result,
};

use super::{handlers, Note, NoteForm};

pub mod paths {
    pub const HOME: &str = "/";
    pub const LIST: &str = "/notes/";
    pub const ADD: &str = "/add/";
    pub const SUCCESS: &str = "/done/";

    pub fn detail(slug: &str) -> String {
        format!("/note/{slug}/")
    }

    pub fn edit(slug: &str) -> String {
        format!("/edit/{slug}/")
    }

    pub fn delete(slug: &str) -> String {
        format!("/delete/{slug}/")
    }
}

async fn home_view(view: Views, ctx: Ctx) -> impl IntoResponse {
    view.response("home.html", context! { user => ctx.user })
}

async fn notes_view(view: Views, base: BaseParams) -> Result<Response> {
    let user = base.ctx.user.clone();
    let notes = handlers::find_notes(base).await?;

    Ok(view.response("notes.html", context! { notes => notes, user => user }))
}

async fn note_view(Path(slug): Path<String>, view: Views, base: BaseParams) -> Result<Response> {
    let user = base.ctx.user.clone();
    let note = handlers::get_note(slug, base).await?;

    Ok(view.response("note.html", context! { note => note, user => user }))
}

fn render_form(view: &Views, ctx: &Ctx, note: Option<&Note>, form: &NoteForm, errors: FormErrors) -> Response {
    let action = note.map_or_else(|| paths::ADD.to_string(), |note| paths::edit(&note.slug));

    view.response(
        "note-form.html",
        context! { note => note, form => form, errors => errors, action => action, user => ctx.user },
    )
}

async fn add_note_view(view: Views, ctx: Ctx) -> impl IntoResponse {
    render_form(&view, &ctx, None, &NoteForm::default(), FormErrors::new())
}

async fn create_note(view: Views, base: BaseParams, Form(form): Form<NoteForm>) -> Result<Response> {
    let ctx = base.ctx.clone();

    if let Err(errors) = form.validate() {
        return Ok(render_form(&view, &ctx, None, &form, errors));
    }

    match handlers::create_note(form.clone().into_create(), base).await {
        Ok(_) => Ok(found(paths::SUCCESS)),
        Err(Error::DuplicateSlug(slug)) => Ok(render_form(&view, &ctx, None, &form, FormErrors::duplicate_slug(&slug))),
        Err(err) => Err(err),
    }
}

async fn edit_note_view(Path(slug): Path<String>, view: Views, base: BaseParams) -> Result<Response> {
    let ctx = base.ctx.clone();
    let note = handlers::get_own_note(slug, base).await?;

    Ok(render_form(&view, &ctx, Some(&note), &NoteForm::from(&note), FormErrors::new()))
}

async fn update_note(
    Path(slug): Path<String>,
    view: Views,
    base: BaseParams,
    Form(form): Form<NoteForm>,
) -> Result<Response> {
    let ctx = base.ctx.clone();
    let note = handlers::get_own_note(slug.clone(), base.clone()).await?;

    if let Err(errors) = form.validate() {
        return Ok(render_form(&view, &ctx, Some(&note), &form, errors));
    }

    match handlers::update_note(slug, form.clone().into_update(), base).await {
        Ok(_) => Ok(found(paths::SUCCESS)),
        Err(Error::DuplicateSlug(slug)) => Ok(render_form(
            &view,
            &ctx,
            Some(&note),
            &form,
            FormErrors::duplicate_slug(&slug),
        )),
        Err(err) => Err(err),
    }
}

async fn delete_note_view(Path(slug): Path<String>, view: Views, base: BaseParams) -> Result<Response> {
    let user = base.ctx.user.clone();
    let note = handlers::get_own_note(slug, base).await?;

    Ok(view.response("note-delete.html", context! { note => note, user => user }))
}

async fn delete_note(Path(slug): Path<String>, base: BaseParams) -> Result<Response> {
    handlers::delete_note(slug, base).await?;

    Ok(found(paths::SUCCESS))
}

async fn success_view(view: Views, ctx: Ctx) -> impl IntoResponse {
    view.response("success.html", context! { user => ctx.user })
}

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route(paths::LIST, get(notes_view))
        .route(paths::ADD, get(add_note_view).post(create_note))
        .route("/note/:slug/", get(note_view))
        .route("/edit/:slug/", get(edit_note_view).post(update_note))
        .route("/delete/:slug/", get(delete_note_view).post(delete_note))
        .route(paths::SUCCESS, get(success_view))
        .with_state(state.clone())
        .route_layer(middleware::from_fn(auth::middleware::protected_view));

    Router::new()
        .route(paths::HOME, get(home_view))
        .with_state(state)
        .merge(protected)
}
