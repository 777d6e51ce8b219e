//! Application state shared across axum route handlers.

use sea_orm::DatabaseConnection;

/// Central application state. Holds the (cheaply cloneable) SeaORM
/// connection; handlers receive it via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Shared reference to the database connection.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Owned clone, for spawned tasks.
    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }
}
