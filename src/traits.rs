//! The resource descriptor trait and its CRUD operations.
//!
//! A resource implements [`CrudResource`] to describe its entity, columns,
//! identifier, slugs, and payload models. The trait's default methods are
//! the operation dispatcher: list, lookup, create, update, and destroy, all
//! funnelling failures into [`ApiError`].

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter,
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value as JsonValue;
use std::fmt::Display;

use crate::errors::ApiError;
use crate::models::{QueryRequest, QuerySpec};
use crate::query::{self, ListOutcome};
use crate::validation::Validatable;

/// Merge an update payload into an existing active model.
///
/// Absent payload fields leave the stored value untouched; the merge
/// produces a single active model so persistence is all-or-nothing.
pub trait MergeIntoActiveModel<ActiveModelType> {
    /// # Errors
    ///
    /// Returns a `DbErr` if the merge fails due to data conversion issues.
    fn merge_into_activemodel(self, existing: ActiveModelType) -> Result<ActiveModelType, DbErr>;
}

/// Static per-resource configuration plus the CRUD operation dispatcher.
///
/// Implementations provide the entity wiring and column table; the default
/// methods implement the operations against any Sea-ORM store.
#[async_trait]
pub trait CrudResource: Sized + Send + Sync + 'static
where
    Self::EntityType: EntityTrait + Sync,
    <Self::EntityType as EntityTrait>::Model:
        Serialize + Send + Sync + IntoActiveModel<Self::ActiveModelType>,
    Self::ActiveModelType: ActiveModelTrait<Entity = Self::EntityType> + ActiveModelBehavior + Send,
{
    type EntityType: EntityTrait + Sync;
    type ColumnType: ColumnTrait;
    type ActiveModelType: ActiveModelTrait<Entity = Self::EntityType>;
    type CreateModel: DeserializeOwned + Validatable + Into<Self::ActiveModelType> + Send;
    type UpdateModel: DeserializeOwned + Validatable + MergeIntoActiveModel<Self::ActiveModelType> + Send;
    type Id: Clone + Display + Serialize + DeserializeOwned + Into<sea_orm::Value> + Send + Sync + 'static;

    const ID_COLUMN: Self::ColumnType;
    /// Key the identifier serializes under, retained by every projection.
    const ID_FIELD: &'static str = "id";
    const SLUG_SINGULAR: &'static str;
    const SLUG_PLURAL: &'static str;
    /// Page size used when the request does not override it.
    const DEFAULT_PAGE_SIZE: u64 = 50;

    /// Fields addressable from `filters` and `order_by`, with their typed
    /// columns. Anything outside this table is rejected before execution.
    fn queryable_columns() -> Vec<(&'static str, Self::ColumnType)>;

    fn list_message() -> String {
        format!("{} retrieved", Self::SLUG_PLURAL)
    }

    fn retrieved_message() -> String {
        format!("{} retrieved", Self::SLUG_SINGULAR)
    }

    fn created_message() -> String {
        format!("{} created", Self::SLUG_SINGULAR)
    }

    fn updated_message() -> String {
        format!("{} updated", Self::SLUG_SINGULAR)
    }

    fn deleted_message() -> String {
        format!("{} deleted", Self::SLUG_SINGULAR)
    }

    /// List the collection: raw-mode short-circuit or compile-and-execute.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BadRequest` for unknown fields and
    /// `ApiError::Database` for store failures.
    async fn list(db: &DatabaseConnection, request: &QueryRequest) -> Result<ListOutcome, ApiError> {
        match request {
            QueryRequest::Raw => Ok(ListOutcome::Raw(query::fetch_all_raw::<Self>(db).await?)),
            QueryRequest::Query(spec) => {
                Ok(ListOutcome::Paginated(query::execute::<Self>(db, spec).await?))
            }
        }
    }

    /// Fetch a single record through the shared query pipeline.
    ///
    /// The lookup re-runs the full filter/order/projection pipeline with an
    /// implicit equality filter on the identifier appended last, so coercion
    /// and projection behave identically to `list`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` when no record matches.
    async fn get_one(
        db: &DatabaseConnection,
        id: &Self::Id,
        spec: &QuerySpec,
    ) -> Result<JsonValue, ApiError> {
        let model = query::fetch_by_id::<Self>(db, id, spec).await?;
        let mut payload = serde_json::to_value(&model)
            .map_err(|err| ApiError::internal("Failed to serialize record", Some(err.to_string())))?;
        if let Some(fields) = &spec.fields {
            payload = query::project(payload, Self::ID_FIELD, fields);
        }
        Ok(payload)
    }

    /// Validate and persist a new record.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::ValidationFailed` (422) before any store mutation
    /// when the payload does not deserialize or fails its rule set.
    async fn create(
        db: &DatabaseConnection,
        payload: JsonValue,
    ) -> Result<<Self::EntityType as EntityTrait>::Model, ApiError> {
        let data: Self::CreateModel = serde_json::from_value(payload)
            .map_err(|err| ApiError::validation_failed(vec![err.to_string()]))?;
        data.validate()
            .map_err(|err| ApiError::validation_failed(vec![err.to_string()]))?;

        let active_model: Self::ActiveModelType = data.into();
        active_model.insert(db).await.map_err(ApiError::database)
    }

    /// Look up, validate, then merge and persist an update.
    ///
    /// The lookup happens before validation so a missing record is a 404
    /// even when the payload is also invalid; both checks precede any
    /// mutation.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for a missing record and
    /// `ApiError::ValidationFailed` for a rule-set failure.
    async fn update(
        db: &DatabaseConnection,
        id: &Self::Id,
        payload: JsonValue,
    ) -> Result<<Self::EntityType as EntityTrait>::Model, ApiError> {
        let existing = query::fetch_by_id::<Self>(db, id, &QuerySpec::lookup()).await?;

        let data: Self::UpdateModel = serde_json::from_value(payload)
            .map_err(|err| ApiError::validation_failed(vec![err.to_string()]))?;
        data.validate()
            .map_err(|err| ApiError::validation_failed(vec![err.to_string()]))?;

        let merged = data
            .merge_into_activemodel(existing.into_active_model())
            .map_err(ApiError::database)?;
        merged.update(db).await.map_err(ApiError::database)
    }

    /// Look up then delete a record.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` when the record does not exist; the
    /// store is left unchanged in that case.
    async fn destroy(db: &DatabaseConnection, id: &Self::Id) -> Result<(), ApiError> {
        query::fetch_by_id::<Self>(db, id, &QuerySpec::lookup()).await?;

        Self::EntityType::delete_many()
            .filter(Self::ID_COLUMN.eq(id.clone()))
            .exec(db)
            .await
            .map_err(ApiError::database)?;
        Ok(())
    }
}
