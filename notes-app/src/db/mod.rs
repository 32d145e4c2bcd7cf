mod db;
mod migrations;

pub use db::*;
pub use migrations::MIGRATIONS;

pub use rusqlite;
pub use tokio_rusqlite;
