//! Query compilation and execution against the store.
//!
//! Takes an immutable [`QuerySpec`], compiles its clauses into a Sea-ORM
//! select, and executes it read-only. Pagination counts reflect store state
//! at execution time; no snapshot isolation is provided.

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, sea_query::Order,
};
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::errors::ApiError;
use crate::filter::build_condition;
use crate::models::{Page, QuerySpec};
use crate::sort::resolve_order;
use crate::traits::CrudResource;

/// Outcome of a list operation: the raw full collection or one page.
#[derive(Debug)]
pub enum ListOutcome {
    /// Raw mode: every record, no pagination wrapper.
    Raw(Vec<JsonValue>),
    /// Standard path: one page plus count metadata.
    Paginated(Page),
}

/// Compile and execute a query spec, returning one page of records.
///
/// Filters compose conjunctively, order clauses apply left to right (id
/// ascending when none are given), projection is applied per record, and
/// the page is cut with offset/limit. A separate count over the same
/// condition yields `total`/`total_pages`.
///
/// # Errors
///
/// Returns `ApiError::BadRequest` for fields outside the queryable set and
/// `ApiError::Database` for store failures.
pub async fn execute<T: CrudResource>(
    db: &DatabaseConnection,
    spec: &QuerySpec,
) -> Result<Page, ApiError> {
    let condition = build_condition::<T>(&spec.filters)?;
    let order = resolve_order::<T>(&spec.order)?;

    let mut select = T::EntityType::find().filter(condition.clone());
    if order.is_empty() {
        select = select.order_by(T::ID_COLUMN, Order::Asc);
    } else {
        for (column, direction) in order {
            select = select.order_by(column, direction);
        }
    }

    let total = T::EntityType::find()
        .filter(condition)
        .count(db)
        .await
        .map_err(ApiError::database)?;

    // The offset can overflow u64 for absurd page numbers; such a page is
    // past the end of any collection, so serve it empty.
    let models = match spec.page.saturating_sub(1).checked_mul(spec.page_size) {
        Some(offset) => select
            .offset(offset)
            .limit(spec.page_size)
            .all(db)
            .await
            .map_err(ApiError::database)?,
        None => Vec::new(),
    };

    let mut data = Vec::with_capacity(models.len());
    for model in &models {
        let mut value = to_json(model)?;
        if let Some(fields) = &spec.fields {
            value = project(value, T::ID_FIELD, fields);
        }
        data.push(value);
    }

    Ok(Page {
        data,
        total,
        page: spec.page,
        page_size: spec.page_size,
        total_pages: total.div_ceil(spec.page_size),
    })
}

/// Fetch the entire collection for raw mode, unfiltered and unpaginated.
///
/// # Errors
///
/// Returns `ApiError::Database` for store failures.
pub async fn fetch_all_raw<T: CrudResource>(
    db: &DatabaseConnection,
) -> Result<Vec<JsonValue>, ApiError> {
    let models = T::EntityType::find()
        .all(db)
        .await
        .map_err(ApiError::database)?;
    models.iter().map(to_json).collect()
}

/// Fetch one record by identifier through the shared pipeline.
///
/// Caller filters and order clauses apply first; the equality filter on the
/// identifier is appended last and the first result is taken.
///
/// # Errors
///
/// Returns `ApiError::NotFound` when no row matches.
pub async fn fetch_by_id<T: CrudResource>(
    db: &DatabaseConnection,
    id: &T::Id,
    spec: &QuerySpec,
) -> Result<<T::EntityType as EntityTrait>::Model, ApiError> {
    let condition = build_condition::<T>(&spec.filters)?.add(T::ID_COLUMN.eq(id.clone()));
    let order = resolve_order::<T>(&spec.order)?;

    let mut select = T::EntityType::find().filter(condition);
    for (column, direction) in order {
        select = select.order_by(column, direction);
    }

    select
        .one(db)
        .await
        .map_err(ApiError::database)?
        .ok_or_else(|| ApiError::not_found(T::SLUG_SINGULAR, Some(id.to_string())))
}

/// Restrict a serialized record to the projected fields.
///
/// The resource's identifier key is always retained.
#[must_use]
pub fn project(mut value: JsonValue, id_field: &str, fields: &[String]) -> JsonValue {
    if let JsonValue::Object(map) = &mut value {
        map.retain(|key, _| key == id_field || fields.iter().any(|field| field == key));
    }
    value
}

fn to_json<M: Serialize>(model: &M) -> Result<JsonValue, ApiError> {
    serde_json::to_value(model)
        .map_err(|err| ApiError::internal("Failed to serialize record", Some(err.to_string())))
}
