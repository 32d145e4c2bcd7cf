use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use minijinja::context;
use serde::{Deserialize, Serialize};

use crate::{
    ctx::Ctx,
    db::{self, DB},
    shared::forms::{self, FormErrors},
    state::AppState,
    users::{
        self,
        auth::{create_user, username_exists, CreateUserParameters},
        password::hash_password_blocking,
    },
    views::Views,
};

use super::{
    backend::{AuthSession, Credentials},
    safe_next, Result, LOGIN_URL, LOGOUT_URL, SIGNUP_URL,
};

const INVALID_CREDENTIALS: &str = "Please enter a correct username and password.";
const USERNAME_TAKEN: &str = "A user with that username already exists.";

#[derive(Deserialize)]
pub struct Next {
    pub next: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password1: String,
    #[serde(default, skip_serializing)]
    pub password2: String,
}

impl SignupForm {
    pub fn validate(&self) -> std::result::Result<(), FormErrors> {
        let mut errors = FormErrors::new();

        if forms::require(&mut errors, "username", &self.username) && !users::is_valid_username(&self.username) {
            errors.add(
                "username",
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            );
        }
        forms::require(&mut errors, "password1", &self.password1);
        if forms::require(&mut errors, "password2", &self.password2) && self.password1 != self.password2 {
            errors.add("password2", "The two password fields didn't match.");
        }

        errors.into_result()
    }
}

pub fn router(state: AppState) -> Router<()> {
    Router::new()
        .route(LOGIN_URL, get(login_view).post(login))
        .route(LOGOUT_URL, get(logout).post(logout))
        .route(SIGNUP_URL, get(signup_view).post(signup))
        .with_state(state)
}

pub async fn login_view(view: Views, ctx: Ctx, Query(Next { next }): Query<Next>) -> impl IntoResponse {
    view.response("login.html", context! { next => safe_next(next), user => ctx.user })
}

pub async fn login(view: Views, mut auth_session: AuthSession, Form(creds): Form<Credentials>) -> Result<Response> {
    let next = safe_next(creds.next.clone());
    let username = creds.username.clone();

    let Some(user) = auth_session.authenticate(creds).await? else {
        return Ok(view.response(
            "login.html",
            context! { error => INVALID_CREDENTIALS, username => username, next => next },
        ));
    };

    auth_session.login(&user).await?;

    Ok(Redirect::to(next.as_deref().unwrap_or("/")).into_response())
}

pub async fn logout(view: Views, mut auth_session: AuthSession) -> Result<Response> {
    if let Some(user) = auth_session.logout().await? {
        tracing::info!("{} logged out", user.username);
    }

    Ok(view.response("logout.html", context! {}))
}

pub async fn signup_view(view: Views, ctx: Ctx) -> impl IntoResponse {
    view.response("signup.html", context! { form => SignupForm::default(), user => ctx.user })
}

pub async fn signup(view: Views, State(db): State<DB>, Form(form): Form<SignupForm>) -> Result<Response> {
    let render = |form: &SignupForm, errors: FormErrors| {
        view.response("signup.html", context! { form => form, errors => errors })
    };

    if let Err(errors) = form.validate() {
        return Ok(render(&form, errors));
    }

    let taken = |form: &SignupForm| {
        let mut errors = FormErrors::new();
        errors.add("username", USERNAME_TAKEN);
        render(form, errors)
    };

    if username_exists(db.clone(), form.username.clone()).await? {
        return Ok(taken(&form));
    }

    let password_hash = hash_password_blocking(form.password1.clone()).await?;
    let user = create_user(
        db,
        CreateUserParameters {
            username: form.username.clone(),
            password_hash,
        },
    )
    .await;

    match user {
        Ok(user) => {
            tracing::info!("{} signed up", user.username);
            Ok(Redirect::to(LOGIN_URL).into_response())
        }
        Err(db::Error::UniqueViolation(_)) => Ok(taken(&form)),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::{
        db::init_test_db,
        test_fixtures,
        tests::{test_app, test_server},
        users::auth::{find_one_by_username, GetUserByUsernameParameters},
    };

    fn signup_form(username: &str, password1: &str, password2: &str) -> SignupForm {
        SignupForm {
            username: username.into(),
            password1: password1.into(),
            password2: password2.into(),
        }
    }

    #[test]
    fn signup_form_validation() {
        assert!(signup_form("reader", "secret", "secret").validate().is_ok());

        let errors = signup_form("", "", "").validate().unwrap_err();
        assert_eq!(errors.get("username"), ["This field is required."]);
        assert_eq!(errors.get("password1"), ["This field is required."]);
        assert_eq!(errors.get("password2"), ["This field is required."]);

        let errors = signup_form("two words", "a", "b").validate().unwrap_err();
        assert_eq!(errors.get("username").len(), 1);
        assert_eq!(errors.get("password2"), ["The two password fields didn't match."]);
    }

    #[tokio::test]
    async fn public_pages_are_available() {
        let db = init_test_db().await.unwrap();
        let server = test_server(test_app(db).await);

        for url in [LOGIN_URL, LOGOUT_URL, SIGNUP_URL] {
            let response = server.get(url).await;
            assert_eq!(response.status_code(), StatusCode::OK, "{url}");
        }
    }

    #[tokio::test]
    async fn signup_then_login() {
        let db = init_test_db().await.unwrap();
        let server = test_server(test_app(db.clone()).await);

        let response = server
            .post(SIGNUP_URL)
            .form(&[
                ("username", "Лев_Толстой"),
                ("password1", "war-and-peace"),
                ("password2", "war-and-peace"),
            ])
            .await;
        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), LOGIN_URL);

        let user = find_one_by_username(
            db,
            GetUserByUsernameParameters {
                username: "Лев_Толстой".into(),
            },
        )
        .await
        .unwrap();
        assert!(user.password.starts_with("$argon2"));

        let response = server
            .post(LOGIN_URL)
            .form(&[
                ("username", "Лев_Толстой"),
                ("password", "war-and-peace"),
                ("next", "/notes/"),
            ])
            .await;
        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/notes/");

        let response = server.get("/notes/").await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    #[tokio::test]
    async fn signup_rejects_taken_username() {
        let db = init_test_db().await.unwrap();
        test_fixtures::create_user(&db, "reader").await;
        let server = test_server(test_app(db).await);

        let response = server
            .post(SIGNUP_URL)
            .form(&[("username", "reader"), ("password1", "x"), ("password2", "x")])
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.text().contains(USERNAME_TAKEN));
    }

    #[tokio::test]
    async fn login_with_wrong_password() {
        let db = init_test_db().await.unwrap();
        test_fixtures::create_user(&db, "reader").await;
        let server = test_server(test_app(db).await);

        let response = server
            .post(LOGIN_URL)
            .form(&[("username", "reader"), ("password", "wrong")])
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.text().contains(INVALID_CREDENTIALS));

        let response = server.get("/notes/").await;
        assert_eq!(response.status_code(), StatusCode::FOUND);
    }

    #[tokio::test]
    async fn logout_ends_session() {
        let db = init_test_db().await.unwrap();
        test_fixtures::create_user(&db, "reader").await;
        let app = test_app(db).await;
        let server = test_fixtures::logged_in(&app, "reader").await;

        assert_eq!(server.get("/notes/").await.status_code(), StatusCode::OK);

        let response = server.post(LOGOUT_URL).await;
        assert_eq!(response.status_code(), StatusCode::OK);

        assert_eq!(server.get("/notes/").await.status_code(), StatusCode::FOUND);
    }
}
