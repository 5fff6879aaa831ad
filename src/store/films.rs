use std::collections::HashSet;
use std::sync::Arc;

use sea_orm::entity::prelude::Date;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, LoaderTrait, ModelTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

use crate::database::Database;
use crate::entities::{actor, film, film_actor};

use super::StoreError;
use super::query::{FilterSpec, SortSpec};

pub struct FilmWithActors {
    pub film: film::Model,
    pub actors: Vec<actor::Model>,
}

pub struct NewFilm {
    pub name: String,
    pub description: String,
    pub date: Date,
    pub rate: i32,
    pub actors: Vec<i32>,
}

/// A partial film update; `None` fields keep their stored values.
#[derive(Debug, Default)]
pub struct FilmChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<Date>,
    pub rate: Option<i32>,
}

impl FilmChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.rate.is_none()
    }
}

pub struct FilmStore {
    db: Arc<Database>,
}

impl FilmStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// List films with their actors, sorted and optionally filtered.
    pub async fn list(
        &self,
        sort: &SortSpec,
        filter: Option<&FilterSpec>,
    ) -> Result<Vec<FilmWithActors>, StoreError> {
        let mut query = film::Entity::find();
        if let Some(filter) = filter {
            query = query.filter(filter.field.to_column().contains(&filter.value));
        }

        let films = query
            .order_by(sort.field.to_column(), sort.order.clone())
            .all(&self.db.conn)
            .await?;

        let actors = films
            .load_many_to_many(actor::Entity, film_actor::Entity, &self.db.conn)
            .await?;

        Ok(films
            .into_iter()
            .zip(actors)
            .map(|(film, actors)| FilmWithActors { film, actors })
            .collect())
    }

    /// Fetch a single film with its actors.
    pub async fn get(&self, id: i32) -> Result<FilmWithActors, StoreError> {
        let film = film::Entity::find_by_id(id)
            .one(&self.db.conn)
            .await?
            .ok_or(StoreError::FilmNotFound(id))?;

        let actors = film.find_related(actor::Entity).all(&self.db.conn).await?;

        Ok(FilmWithActors { film, actors })
    }

    /// Insert a film and link the given actors in one transaction.
    /// Duplicate actor ids are collapsed; unknown ones abort the whole
    /// insert.
    pub async fn create(&self, new: NewFilm) -> Result<FilmWithActors, StoreError> {
        let txn = self.db.conn.begin().await?;

        let film = film::ActiveModel {
            name: Set(new.name),
            description: Set(new.description),
            date: Set(new.date),
            rate: Set(new.rate),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut actor_ids = new.actors;
        actor_ids.sort_unstable();
        actor_ids.dedup();

        if !actor_ids.is_empty() {
            let known: HashSet<i32> = actor::Entity::find()
                .filter(actor::Column::Id.is_in(actor_ids.iter().copied()))
                .all(&txn)
                .await?
                .into_iter()
                .map(|a| a.id)
                .collect();
            if let Some(missing) = actor_ids.iter().find(|id| !known.contains(id)) {
                return Err(StoreError::ActorNotFound(*missing));
            }

            let links = actor_ids.iter().map(|actor_id| film_actor::ActiveModel {
                film_id: Set(film.id),
                actor_id: Set(*actor_id),
            });
            film_actor::Entity::insert_many(links).exec(&txn).await?;
        }

        txn.commit().await?;

        self.get(film.id).await
    }

    /// Apply the provided changes to a film. The linked actors are not
    /// touched here.
    pub async fn update(&self, id: i32, changes: FilmChanges) -> Result<FilmWithActors, StoreError> {
        if changes.is_empty() {
            return self.get(id).await;
        }

        let film = film::Entity::find_by_id(id)
            .one(&self.db.conn)
            .await?
            .ok_or(StoreError::FilmNotFound(id))?;

        let mut active: film::ActiveModel = film.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(date) = changes.date {
            active.date = Set(date);
        }
        if let Some(rate) = changes.rate {
            active.rate = Set(rate);
        }
        active.update(&self.db.conn).await?;

        self.get(id).await
    }

    /// Delete a film and its actor links in one transaction.
    pub async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let txn = self.db.conn.begin().await?;

        film::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(StoreError::FilmNotFound(id))?;

        film_actor::Entity::delete_many()
            .filter(film_actor::Column::FilmId.eq(id))
            .exec(&txn)
            .await?;
        film::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::actor::Sex;
    use crate::store::actors::{ActorStore, NewActor};
    use crate::store::query::FilmField;
    use crate::test_utils::test_db;
    use sea_orm::PaginatorTrait;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_film(name: &str, rate: i32, actors: Vec<i32>) -> NewFilm {
        NewFilm {
            name: name.to_owned(),
            description: format!("about {name}"),
            date: date(2001, 2, 2),
            rate,
            actors,
        }
    }

    async fn seed_actor(store: &ActorStore, name: &str) -> i32 {
        store
            .create(NewActor {
                name: name.to_owned(),
                sex: Sex::Female,
                birth: date(1990, 1, 1),
            })
            .await
            .unwrap()
            .actor
            .id
    }

    #[tokio::test]
    async fn list_sorts_by_rate_desc_by_default() {
        let db = test_db().await;
        let films = FilmStore::new(db);

        films.create(new_film("middle", 5, vec![])).await.unwrap();
        films.create(new_film("best", 9, vec![])).await.unwrap();
        films.create(new_film("worst", 2, vec![])).await.unwrap();

        let sort = SortSpec::parse(None).unwrap();
        let listed = films.list(&sort, None).await.unwrap();
        let rates: Vec<i32> = listed.iter().map(|f| f.film.rate).collect();
        assert_eq!(rates, vec![9, 5, 2]);
    }

    #[tokio::test]
    async fn list_honors_sort_and_filter() {
        let db = test_db().await;
        let films = FilmStore::new(db);

        films.create(new_film("Alien", 8, vec![])).await.unwrap();
        films.create(new_film("Aliens", 9, vec![])).await.unwrap();
        films
            .create(new_film("Blade Runner", 7, vec![]))
            .await
            .unwrap();

        let sort = SortSpec::parse(Some("name")).unwrap();
        let filter = FilterSpec {
            field: FilmField::Name,
            value: "Alien".to_owned(),
        };
        let listed = films.list(&sort, Some(&filter)).await.unwrap();
        let names: Vec<&str> = listed.iter().map(|f| f.film.name.as_str()).collect();
        assert_eq!(names, vec!["Alien", "Aliens"]);
    }

    #[tokio::test]
    async fn create_links_actors_and_collapses_duplicates() {
        let db = test_db().await;
        let films = FilmStore::new(db.clone());
        let actors = ActorStore::new(db.clone());

        let a1 = seed_actor(&actors, "Sigourney Weaver").await;
        let a2 = seed_actor(&actors, "John Hurt").await;

        let created = films
            .create(new_film("Alien", 8, vec![a1, a2, a1]))
            .await
            .unwrap();

        let mut linked: Vec<i32> = created.actors.iter().map(|a| a.id).collect();
        linked.sort_unstable();
        assert_eq!(linked, vec![a1, a2]);

        let link_rows = film_actor::Entity::find()
            .filter(film_actor::Column::FilmId.eq(created.film.id))
            .count(&db.conn)
            .await
            .unwrap();
        assert_eq!(link_rows, 2);
    }

    #[tokio::test]
    async fn create_rolls_back_on_unknown_actor() {
        let db = test_db().await;
        let films = FilmStore::new(db.clone());
        let actors = ActorStore::new(db.clone());

        let a1 = seed_actor(&actors, "Sigourney Weaver").await;

        let err = films
            .create(new_film("Alien", 8, vec![a1, 999]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ActorNotFound(999)));

        let sort = SortSpec::parse(None).unwrap();
        assert!(films.list(&sort, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_changes_only_provided_fields() {
        let db = test_db().await;
        let films = FilmStore::new(db);

        let created = films.create(new_film("Alien", 5, vec![])).await.unwrap();

        // Zero is a real value here, not "field absent".
        let updated = films
            .update(
                created.film.id,
                FilmChanges {
                    rate: Some(0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.film.rate, 0);
        assert_eq!(updated.film.name, "Alien");
        assert_eq!(updated.film.date, created.film.date);
    }

    #[tokio::test]
    async fn empty_update_returns_current_record() {
        let db = test_db().await;
        let films = FilmStore::new(db);

        let created = films.create(new_film("Alien", 5, vec![])).await.unwrap();
        let updated = films
            .update(created.film.id, FilmChanges::default())
            .await
            .unwrap();
        assert_eq!(updated.film, created.film);
    }

    #[tokio::test]
    async fn update_unknown_film_fails() {
        let db = test_db().await;
        let films = FilmStore::new(db);

        let err = films
            .update(
                123,
                FilmChanges {
                    rate: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::FilmNotFound(123)));
    }

    #[tokio::test]
    async fn delete_removes_film_and_its_links() {
        let db = test_db().await;
        let films = FilmStore::new(db.clone());
        let actors = ActorStore::new(db.clone());

        let a1 = seed_actor(&actors, "Sigourney Weaver").await;
        let first = films.create(new_film("Alien", 8, vec![a1])).await.unwrap();
        let second = films.create(new_film("Aliens", 9, vec![a1])).await.unwrap();

        films.delete(first.film.id).await.unwrap();

        let err = films.get(first.film.id).await.unwrap_err();
        assert!(matches!(err, StoreError::FilmNotFound(_)));

        let orphaned = film_actor::Entity::find()
            .filter(film_actor::Column::FilmId.eq(first.film.id))
            .count(&db.conn)
            .await
            .unwrap();
        assert_eq!(orphaned, 0);

        // The shared actor stays linked to the surviving film.
        let survivor = films.get(second.film.id).await.unwrap();
        assert_eq!(survivor.actors.len(), 1);
    }

    #[tokio::test]
    async fn delete_unknown_film_fails() {
        let db = test_db().await;
        let films = FilmStore::new(db);

        let err = films.delete(123).await.unwrap_err();
        assert!(matches!(err, StoreError::FilmNotFound(123)));
    }
}
