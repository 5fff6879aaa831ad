use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entities::actor::Sex;
use crate::http::error::ApiError;
use crate::http::extract::{AdminUser, ApiJson, ApiPath, AuthedUser};
use crate::http::routes::StatusResponse;
use crate::http::state::AppState;
use crate::store::films::{FilmChanges, FilmWithActors, NewFilm};
use crate::store::query::{FilterSpec, SortSpec};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_films).post(create_film))
        .route("/{film_id}", put(update_film).delete(delete_film))
}

#[derive(Debug, Deserialize)]
pub struct ListFilmsParams {
    #[serde(rename = "sortBy")]
    sort_by: Option<String>,
    filter: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateFilmRequest {
    name: String,
    #[serde(default)]
    description: String,
    date: NaiveDate,
    #[serde(default)]
    rate: i32,
    #[serde(default)]
    actors: Vec<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFilmRequest {
    name: Option<String>,
    description: Option<String>,
    date: Option<NaiveDate>,
    rate: Option<i32>,
}

/// Actor as it appears nested under a film. The response key for the
/// birth date has always been `birthday` even though requests say
/// `birth`.
#[derive(Debug, Serialize)]
pub struct ActorSummary {
    id: i32,
    name: String,
    sex: Sex,
    #[serde(rename = "birthday")]
    birth: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct FilmPayload {
    id: i32,
    name: String,
    description: String,
    date: NaiveDate,
    rate: i32,
    actors: Vec<ActorSummary>,
}

impl From<FilmWithActors> for FilmPayload {
    fn from(record: FilmWithActors) -> Self {
        FilmPayload {
            id: record.film.id,
            name: record.film.name,
            description: record.film.description,
            date: record.film.date,
            rate: record.film.rate,
            actors: record
                .actors
                .into_iter()
                .map(|actor| ActorSummary {
                    id: actor.id,
                    name: actor.name,
                    sex: actor.sex,
                    birth: actor.birth,
                })
                .collect(),
        }
    }
}

/// The list key is the singular `film`; existing clients parse it that
/// way, so it stays.
#[derive(Debug, Serialize)]
pub struct FilmsResponse {
    success: bool,
    error: String,
    #[serde(rename = "film")]
    films: Vec<FilmPayload>,
}

impl FilmsResponse {
    fn ok(films: Vec<FilmPayload>) -> Self {
        FilmsResponse {
            success: true,
            error: String::new(),
            films,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FilmResponse {
    success: bool,
    error: String,
    film: FilmPayload,
}

impl FilmResponse {
    fn ok(film: FilmPayload) -> Self {
        FilmResponse {
            success: true,
            error: String::new(),
            film,
        }
    }
}

fn validate_name(name: &str) -> Result<(), ApiError> {
    let length = name.chars().count();
    if length == 0 || length > 150 {
        return Err(ApiError::Validation(
            "name must be between 1 and 150 characters".to_owned(),
        ));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), ApiError> {
    if description.chars().count() > 1000 {
        return Err(ApiError::Validation(
            "description must be at most 1000 characters".to_owned(),
        ));
    }
    Ok(())
}

fn validate_rate(rate: i32) -> Result<(), ApiError> {
    if !(0..=10).contains(&rate) {
        return Err(ApiError::Validation(
            "rate must be between 0 and 10".to_owned(),
        ));
    }
    Ok(())
}

async fn list_films(
    _user: AuthedUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListFilmsParams>,
) -> Result<Json<FilmsResponse>, ApiError> {
    let sort = SortSpec::parse(params.sort_by.as_deref())?;
    let filter = FilterSpec::parse(params.filter.as_deref())?;

    let films = state.films.list(&sort, filter.as_ref()).await?;
    Ok(Json(FilmsResponse::ok(
        films.into_iter().map(FilmPayload::from).collect(),
    )))
}

#[axum::debug_handler]
async fn create_film(
    _user: AdminUser,
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<CreateFilmRequest>,
) -> Result<Json<FilmResponse>, ApiError> {
    validate_name(&request.name)?;
    validate_description(&request.description)?;
    validate_rate(request.rate)?;

    let film = state
        .films
        .create(NewFilm {
            name: request.name,
            description: request.description,
            date: request.date,
            rate: request.rate,
            actors: request.actors,
        })
        .await?;

    Ok(Json(FilmResponse::ok(film.into())))
}

async fn update_film(
    _user: AdminUser,
    State(state): State<Arc<AppState>>,
    ApiPath(film_id): ApiPath<i32>,
    ApiJson(request): ApiJson<UpdateFilmRequest>,
) -> Result<Json<FilmResponse>, ApiError> {
    if let Some(name) = &request.name {
        validate_name(name)?;
    }
    if let Some(description) = &request.description {
        validate_description(description)?;
    }
    if let Some(rate) = request.rate {
        validate_rate(rate)?;
    }

    let film = state
        .films
        .update(
            film_id,
            FilmChanges {
                name: request.name,
                description: request.description,
                date: request.date,
                rate: request.rate,
            },
        )
        .await?;

    Ok(Json(FilmResponse::ok(film.into())))
}

async fn delete_film(
    _user: AdminUser,
    State(state): State<Arc<AppState>>,
    ApiPath(film_id): ApiPath<i32>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.films.delete(film_id).await?;
    Ok(Json(StatusResponse::ok()))
}
