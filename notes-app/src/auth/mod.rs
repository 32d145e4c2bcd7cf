mod backend;
mod errors;
mod routes;

use axum::Router;
use axum_login::AuthManagerLayerBuilder;

use tower_sessions::SessionStore;

pub use backend::{AuthBackend, AuthSession, Credentials};
pub use errors::{Error, Result};
pub use routes::router;

use crate::db::DB;

pub const LOGIN_URL: &str = "/auth/login/";
pub const LOGOUT_URL: &str = "/auth/logout/";
pub const SIGNUP_URL: &str = "/auth/signup/";

pub fn add_auth_layer(
    app: Router,
    session_layer: tower_sessions::SessionManagerLayer<impl SessionStore + Clone>,
    db: DB,
) -> Router {
    let auth_backend = AuthBackend::new(db);
    let auth_layer = AuthManagerLayerBuilder::new(auth_backend, session_layer).build();

    app.layer(auth_layer)
}

/// Only local paths are followed after login.
pub fn safe_next(next: Option<String>) -> Option<String> {
    next.filter(|next| next.starts_with('/') && !next.starts_with("//") && !next.contains('\\'))
}

/// The login page, returning to `next` afterwards. Slashes stay readable.
pub fn login_url(next: &str) -> String {
    let next = urlencoding::encode(next).replace("%2F", "/");
    format!("{LOGIN_URL}?next={next}")
}

pub mod middleware {
    use axum::{
        extract::Request,
        http::Uri,
        middleware::Next,
        response::Response,
    };

    use super::*;
    use crate::views::found;

    /// Sends anonymous visitors to the login page, remembering where they were going.
    pub async fn protected_view(auth_session: AuthSession, url: Uri, request: Request, next: Next) -> Response {
        if auth_session.user.is_some() {
            return next.run(request).await;
        }

        let path = url.path_and_query().map_or_else(|| url.path(), |pq| pq.as_str());
        tracing::debug!("anonymous request to {path}, redirecting to login");

        found(login_url(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_must_be_local() {
        assert_eq!(safe_next(Some("/notes/".into())), Some("/notes/".into()));
        assert_eq!(safe_next(Some("https://evil.example".into())), None);
        assert_eq!(safe_next(Some("//evil.example".into())), None);
        assert_eq!(safe_next(Some("/\\evil.example".into())), None);
        assert_eq!(safe_next(None), None);
    }

    #[test]
    fn login_url_encodes_next() {
        assert_eq!(login_url("/notes/"), "/auth/login/?next=/notes/");
        assert_eq!(
            login_url("/note/zagolovok/?a=1&b=2"),
            "/auth/login/?next=/note/zagolovok/%3Fa%3D1%26b%3D2"
        );
    }
}
