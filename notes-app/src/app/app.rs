use axum::{Extension, Router};
use tower_sessions::{
    cookie::{time::Duration, SameSite},
    Expiry, MemoryStore, SessionManagerLayer,
};

use crate::{auth, db::DB, notes, views};

use super::{config::config, errors, state::AppState};

pub async fn create_app(db: DB) -> errors::Result<Router> {
    let config = config();

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(config.session_secure)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::days(config.session_expiry_days)));

    let env = views::create_environment().map_err(|e| errors::Error::Unexpected(e.to_string()))?;

    let views = views::Views::new(env);
    let state = AppState {
        conn: db.clone(),
        views,
    };

    let app = Router::new()
        .merge(auth::router(state.clone()))
        .merge(notes::router(state.clone()))
        .layer(Extension(db));

    let app = auth::add_auth_layer(app, session_layer, state.conn.clone());

    Ok(app)
}
