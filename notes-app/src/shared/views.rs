use std::{convert::Infallible, sync::Arc};

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, StatusCode},
    response::{Html, IntoResponse, Response},
};
use minijinja::{Environment, Error, UndefinedBehavior};

#[derive(Debug, Clone)]
pub struct Views {
    pub env: Arc<Environment<'static>>,
}

impl Views {
    pub fn new(env: Environment<'static>) -> Self {
        let engine = Arc::new(env);
        Self { env: engine }
    }
}

impl Views {
    pub fn response<D: serde::Serialize>(&self, key: &str, data: D) -> Response {
        match self.render(key, data) {
            Ok(x) => Html(x).into_response(),
            Err(err) => {
                tracing::error!("{err:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
            }
        }
    }

    fn render<D: serde::Serialize>(&self, key: &str, data: D) -> Result<String, Error> {
        let template = self.env.get_template(key)?;
        let rendered = template.render(&data)?;

        Ok(rendered)
    }
}

/// `302 Found`, the status browsers and form posts expect after a redirect.
pub fn found(location: impl Into<String>) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.into())]).into_response()
}

pub fn create_environment() -> Result<Environment<'static>, Error> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Chainable);
    env.add_template("base.html", include_str!("../views/base.html"))?;
    env.add_template("home.html", include_str!("../views/home.html"))?;
    env.add_template("login.html", include_str!("../views/login.html"))?;
    env.add_template("logout.html", include_str!("../views/logout.html"))?;
    env.add_template("signup.html", include_str!("../views/signup.html"))?;
    env.add_template("notes.html", include_str!("../views/notes.html"))?;
    env.add_template("note.html", include_str!("../views/note.html"))?;
    env.add_template("note-form.html", include_str!("../views/note-form.html"))?;
    env.add_template("note-delete.html", include_str!("../views/note-delete.html"))?;
    env.add_template("success.html", include_str!("../views/success.html"))?;

    Ok(env)
}

#[async_trait]
impl<ApplicationState> FromRequestParts<ApplicationState> for Views
where
    Self: FromRef<ApplicationState>,
    ApplicationState: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(_: &mut Parts, state: &ApplicationState) -> Result<Self, Self::Rejection> {
        Ok(Self::from_ref(state))
    }
}
