mod app;
mod auth;
mod db;
mod notes;
mod shared;
mod users;

#[cfg(test)]
mod test_fixtures;

use db::init_db;

pub use app::{
    config, create_app, ctx,
    errors::{self, Error, Result},
    state,
};
pub use shared::views;

use state::AppState;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> errors::Result<()> {
    let config = config::init()?;

    shared::tracing::setup_tracing(config);

    let conn = init_db(&config.database_url).await?;

    let app = create_app(conn).await?;

    let app = shared::tracing::add_tracing_layer(app);

    let listener = TcpListener::bind(format!("127.0.0.1:{}", config.port)).await?;

    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
