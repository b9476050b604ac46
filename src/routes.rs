//! Generic Axum handlers and router wiring.
//!
//! Thin transport layer: each handler parses the request surface, invokes
//! the corresponding [`CrudResource`] operation, and wraps the outcome in
//! the response envelope.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::Response,
    routing::get,
};
use sea_orm::DatabaseConnection;
use serde_json::Value as JsonValue;

use crate::errors::ApiError;
use crate::models::{ListParams, QueryRequest, QuerySpec};
use crate::query::ListOutcome;
use crate::response::{envelope, message_only};
use crate::traits::CrudResource;

/// List the collection, honoring raw mode and the query mini-language.
///
/// # Errors
///
/// Returns `ApiError` for malformed parameters or store failures.
pub async fn list_handler<T: CrudResource>(
    State(db): State<DatabaseConnection>,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    let request = QueryRequest::parse(&params, T::DEFAULT_PAGE_SIZE)?;
    match T::list(&db, &request).await? {
        ListOutcome::Raw(records) => envelope(&T::list_message(), T::SLUG_PLURAL, records),
        ListOutcome::Paginated(page) => envelope(&T::list_message(), T::SLUG_PLURAL, page),
    }
}

/// Fetch a single record, 404 when absent.
///
/// Accepts the same query parameters as the list so filters and projection
/// behave identically.
///
/// # Errors
///
/// Returns `ApiError::NotFound` when no record matches.
pub async fn get_one_handler<T: CrudResource>(
    State(db): State<DatabaseConnection>,
    Path(id): Path<T::Id>,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    let spec = match QueryRequest::parse(&params, T::DEFAULT_PAGE_SIZE)? {
        QueryRequest::Raw => QuerySpec::lookup(),
        QueryRequest::Query(spec) => spec,
    };
    let record = T::get_one(&db, &id, &spec).await?;
    envelope(&T::retrieved_message(), T::SLUG_SINGULAR, record)
}

/// Create a record from a JSON payload.
///
/// # Errors
///
/// Returns `ApiError::ValidationFailed` when the payload fails its rule set.
pub async fn create_handler<T: CrudResource>(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<JsonValue>,
) -> Result<Response, ApiError> {
    let model = T::create(&db, payload).await?;
    envelope(&T::created_message(), T::SLUG_SINGULAR, model)
}

/// Update a record by id from a JSON payload.
///
/// # Errors
///
/// Returns `ApiError::NotFound` for a missing record and
/// `ApiError::ValidationFailed` for a rule-set failure.
pub async fn update_handler<T: CrudResource>(
    State(db): State<DatabaseConnection>,
    Path(id): Path<T::Id>,
    Json(payload): Json<JsonValue>,
) -> Result<Response, ApiError> {
    let model = T::update(&db, &id, payload).await?;
    envelope(&T::updated_message(), T::SLUG_SINGULAR, model)
}

/// Delete a record by id.
///
/// # Errors
///
/// Returns `ApiError::NotFound` when the record does not exist.
pub async fn delete_handler<T: CrudResource>(
    State(db): State<DatabaseConnection>,
    Path(id): Path<T::Id>,
) -> Result<Response, ApiError> {
    T::destroy(&db, &id).await?;
    Ok(message_only(&T::deleted_message()))
}

/// Build a router exposing the five CRUD routes for a resource:
/// `GET`/`POST /{plural}` and `GET`/`PUT`/`DELETE /{plural}/{id}`.
pub fn crud_router<T: CrudResource>(db: DatabaseConnection) -> Router {
    Router::new()
        .route(
            &format!("/{}", T::SLUG_PLURAL),
            get(list_handler::<T>).post(create_handler::<T>),
        )
        .route(
            &format!("/{}/{{id}}", T::SLUG_PLURAL),
            get(get_one_handler::<T>)
                .put(update_handler::<T>)
                .delete(delete_handler::<T>),
        )
        .with_state(db)
}
