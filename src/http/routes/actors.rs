use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entities::actor::Sex;
use crate::http::error::ApiError;
use crate::http::extract::{AdminUser, ApiJson, ApiPath, AuthedUser};
use crate::http::routes::StatusResponse;
use crate::http::state::AppState;
use crate::store::actors::{ActorChanges, ActorWithFilms, NewActor};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_actors).post(create_actor))
        .route("/{actor_id}", put(update_actor).delete(delete_actor))
}

#[derive(Debug, Deserialize)]
pub struct CreateActorRequest {
    name: String,
    sex: Sex,
    birth: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct UpdateActorRequest {
    name: Option<String>,
    sex: Option<Sex>,
    birth: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct FilmSummary {
    id: i32,
    name: String,
    description: String,
    date: NaiveDate,
    rate: i32,
}

/// Requests spell the date `birth` but responses have always answered
/// with `birthday`.
#[derive(Debug, Serialize)]
pub struct ActorPayload {
    id: i32,
    name: String,
    sex: Sex,
    #[serde(rename = "birthday")]
    birth: NaiveDate,
    films: Vec<FilmSummary>,
}

impl From<ActorWithFilms> for ActorPayload {
    fn from(record: ActorWithFilms) -> Self {
        ActorPayload {
            id: record.actor.id,
            name: record.actor.name,
            sex: record.actor.sex,
            birth: record.actor.birth,
            films: record
                .films
                .into_iter()
                .map(|film| FilmSummary {
                    id: film.id,
                    name: film.name,
                    description: film.description,
                    date: film.date,
                    rate: film.rate,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ActorsResponse {
    success: bool,
    error: String,
    actors: Vec<ActorPayload>,
}

impl ActorsResponse {
    fn ok(actors: Vec<ActorPayload>) -> Self {
        ActorsResponse {
            success: true,
            error: String::new(),
            actors,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ActorResponse {
    success: bool,
    error: String,
    actor: ActorPayload,
}

impl ActorResponse {
    fn ok(actor: ActorPayload) -> Self {
        ActorResponse {
            success: true,
            error: String::new(),
            actor,
        }
    }
}

fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.is_empty() {
        return Err(ApiError::Validation("name must not be empty".to_owned()));
    }
    Ok(())
}

async fn list_actors(
    _user: AuthedUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ActorsResponse>, ApiError> {
    let actors = state.actors.list().await?;
    Ok(Json(ActorsResponse::ok(
        actors.into_iter().map(ActorPayload::from).collect(),
    )))
}

async fn create_actor(
    _user: AdminUser,
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<CreateActorRequest>,
) -> Result<Json<ActorResponse>, ApiError> {
    validate_name(&request.name)?;

    let actor = state
        .actors
        .create(NewActor {
            name: request.name,
            sex: request.sex,
            birth: request.birth,
        })
        .await?;

    Ok(Json(ActorResponse::ok(actor.into())))
}

async fn update_actor(
    _user: AdminUser,
    State(state): State<Arc<AppState>>,
    ApiPath(actor_id): ApiPath<i32>,
    ApiJson(request): ApiJson<UpdateActorRequest>,
) -> Result<Json<ActorResponse>, ApiError> {
    if let Some(name) = &request.name {
        validate_name(name)?;
    }

    let actor = state
        .actors
        .update(
            actor_id,
            ActorChanges {
                name: request.name,
                sex: request.sex,
                birth: request.birth,
            },
        )
        .await?;

    Ok(Json(ActorResponse::ok(actor.into())))
}

async fn delete_actor(
    _user: AdminUser,
    State(state): State<Arc<AppState>>,
    ApiPath(actor_id): ApiPath<i32>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.actors.delete(actor_id).await?;
    Ok(Json(StatusResponse::ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sex_rejects_unknown_values() {
        let err = serde_json::from_str::<CreateActorRequest>(
            r#"{"name": "Actor1", "sex": "other", "birth": "2001-01-01"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown variant"));
    }

    #[test]
    fn create_request_reads_the_birth_key() {
        let request: CreateActorRequest = serde_json::from_str(
            r#"{"name": "Actor1", "sex": "male", "birth": "2001-01-01"}"#,
        )
        .unwrap();
        assert_eq!(request.name, "Actor1");
        assert_eq!(request.sex, Sex::Male);
        assert_eq!(request.birth, NaiveDate::from_ymd_opt(2001, 1, 1).unwrap());
    }

    #[test]
    fn payload_answers_with_the_birthday_key() {
        let payload = ActorPayload {
            id: 1,
            name: "name1".into(),
            sex: Sex::Female,
            birth: NaiveDate::from_ymd_opt(2001, 2, 2).unwrap(),
            films: vec![],
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["birthday"], "2001-02-02");
        assert!(value.get("birth").is_none());
        assert!(value["films"].is_array());
    }
}
