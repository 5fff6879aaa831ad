pub mod actors;
pub mod films;
pub mod query;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("film not found: {0}")]
    FilmNotFound(i32),
    #[error("actor not found: {0}")]
    ActorNotFound(i32),
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
}
