use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use db::{JobFilter, JobRow, JobUpdate, NewJob};
use serde::Serialize;

use crate::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub struct JobBody {
    pub job: JobRow,
}

#[derive(Debug, Serialize)]
pub struct JobsBody {
    pub jobs: Vec<JobRow>,
}

#[derive(Debug, Serialize)]
pub struct DeletedBody {
    pub deleted: String,
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewJob>, JsonRejection>,
) -> Result<(StatusCode, Json<JobBody>), ApiError> {
    let Json(job) = payload?;
    let job = state.jobs.create(job).await?;
    Ok((StatusCode::CREATED, Json(JobBody { job })))
}

pub async fn list(
    State(state): State<AppState>,
    filter: Result<Query<JobFilter>, QueryRejection>,
) -> Result<Json<JobsBody>, ApiError> {
    let Query(filter) = filter?;
    let jobs = state.jobs.list(&filter).await?;
    Ok(Json(JobsBody { jobs }))
}

pub async fn get(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<JobBody>, ApiError> {
    let job = state.jobs.get(&id).await?;
    Ok(Json(JobBody { job }))
}

/// Partial update: only the fields present in the body are changed.
pub async fn update(
    Path(id): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<JobUpdate>, JsonRejection>,
) -> Result<Json<JobBody>, ApiError> {
    let Json(update) = payload?;
    let job = state.jobs.update(&id, update).await?;
    Ok(Json(JobBody { job }))
}

pub async fn delete(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DeletedBody>, ApiError> {
    state.jobs.delete(&id).await?;
    Ok(Json(DeletedBody { deleted: id }))
}
