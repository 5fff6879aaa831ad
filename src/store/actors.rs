use std::sync::Arc;

use sea_orm::entity::prelude::Date;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, LoaderTrait, ModelTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

use crate::database::Database;
use crate::entities::actor::Sex;
use crate::entities::{actor, film, film_actor};

use super::StoreError;

pub struct ActorWithFilms {
    pub actor: actor::Model,
    pub films: Vec<film::Model>,
}

pub struct NewActor {
    pub name: String,
    pub sex: Sex,
    pub birth: Date,
}

/// A partial actor update; `None` fields keep their stored values.
#[derive(Debug, Default)]
pub struct ActorChanges {
    pub name: Option<String>,
    pub sex: Option<Sex>,
    pub birth: Option<Date>,
}

impl ActorChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.sex.is_none() && self.birth.is_none()
    }
}

pub struct ActorStore {
    db: Arc<Database>,
}

impl ActorStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// List all actors with the films they appear in.
    pub async fn list(&self) -> Result<Vec<ActorWithFilms>, StoreError> {
        let actors = actor::Entity::find()
            .order_by_asc(actor::Column::Id)
            .all(&self.db.conn)
            .await?;

        let films = actors
            .load_many_to_many(film::Entity, film_actor::Entity, &self.db.conn)
            .await?;

        Ok(actors
            .into_iter()
            .zip(films)
            .map(|(actor, films)| ActorWithFilms { actor, films })
            .collect())
    }

    /// Fetch a single actor with their films.
    pub async fn get(&self, id: i32) -> Result<ActorWithFilms, StoreError> {
        let actor = actor::Entity::find_by_id(id)
            .one(&self.db.conn)
            .await?
            .ok_or(StoreError::ActorNotFound(id))?;

        let films = actor.find_related(film::Entity).all(&self.db.conn).await?;

        Ok(ActorWithFilms { actor, films })
    }

    /// Insert a new actor.
    pub async fn create(&self, new: NewActor) -> Result<ActorWithFilms, StoreError> {
        let actor = actor::ActiveModel {
            name: Set(new.name),
            sex: Set(new.sex),
            birth: Set(new.birth),
            ..Default::default()
        }
        .insert(&self.db.conn)
        .await?;

        self.get(actor.id).await
    }

    /// Apply the provided changes to an actor.
    pub async fn update(
        &self,
        id: i32,
        changes: ActorChanges,
    ) -> Result<ActorWithFilms, StoreError> {
        if changes.is_empty() {
            return self.get(id).await;
        }

        let actor = actor::Entity::find_by_id(id)
            .one(&self.db.conn)
            .await?
            .ok_or(StoreError::ActorNotFound(id))?;

        let mut active: actor::ActiveModel = actor.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(sex) = changes.sex {
            active.sex = Set(sex);
        }
        if let Some(birth) = changes.birth {
            active.birth = Set(birth);
        }
        active.update(&self.db.conn).await?;

        self.get(id).await
    }

    /// Delete an actor and their film links in one transaction.
    pub async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let txn = self.db.conn.begin().await?;

        actor::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(StoreError::ActorNotFound(id))?;

        film_actor::Entity::delete_many()
            .filter(film_actor::Column::ActorId.eq(id))
            .exec(&txn)
            .await?;
        actor::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }
}
