use std::sync::Arc;

use crate::database::Database;
use crate::store::actors::ActorStore;
use crate::store::films::FilmStore;

pub struct AppState {
    pub db: Arc<Database>,
    pub films: FilmStore,
    pub actors: ActorStore,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            films: FilmStore::new(db.clone()),
            actors: ActorStore::new(db.clone()),
            db,
        }
    }
}
