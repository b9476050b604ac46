use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use crudbase::traits::{CrudResource, MergeIntoActiveModel};
use crudbase::validation::{Validatable, ValidationError, validators::validate_required};
use sea_orm::{ActiveValue, DbErr, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    pub quantity: i32,
    pub due_at: Option<NaiveDateTime>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Deserialize)]
pub struct ItemCreate {
    pub name: String,
    #[serde(default)]
    pub quantity: i32,
    pub due_at: Option<NaiveDateTime>,
}

impl Validatable for ItemCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_required("name", &self.name)
    }
}

impl From<ItemCreate> for ActiveModel {
    fn from(data: ItemCreate) -> Self {
        let now = Utc::now();
        ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(data.name),
            quantity: ActiveValue::Set(data.quantity),
            due_at: ActiveValue::Set(data.due_at),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub quantity: Option<i32>,
    pub due_at: Option<NaiveDateTime>,
}

impl Validatable for ItemUpdate {
    // The item rule set requires a name on update as well as create.
    fn validate(&self) -> Result<(), ValidationError> {
        match &self.name {
            Some(name) => validate_required("name", name),
            None => Err(ValidationError::new("name", "This field is required")),
        }
    }
}

impl MergeIntoActiveModel<ActiveModel> for ItemUpdate {
    fn merge_into_activemodel(self, mut existing: ActiveModel) -> Result<ActiveModel, DbErr> {
        if let Some(name) = self.name {
            existing.name = ActiveValue::Set(name);
        }
        if let Some(quantity) = self.quantity {
            existing.quantity = ActiveValue::Set(quantity);
        }
        if let Some(due_at) = self.due_at {
            existing.due_at = ActiveValue::Set(Some(due_at));
        }
        existing.updated_at = ActiveValue::Set(Utc::now());
        Ok(existing)
    }
}

/// Resource descriptor for items.
pub struct ItemResource;

#[async_trait]
impl CrudResource for ItemResource {
    type EntityType = Entity;
    type ColumnType = Column;
    type ActiveModelType = ActiveModel;
    type CreateModel = ItemCreate;
    type UpdateModel = ItemUpdate;
    type Id = i32;

    const ID_COLUMN: Column = Column::Id;
    const SLUG_SINGULAR: &'static str = "item";
    const SLUG_PLURAL: &'static str = "items";

    fn queryable_columns() -> Vec<(&'static str, Column)> {
        vec![
            ("id", Column::Id),
            ("name", Column::Name),
            ("quantity", Column::Quantity),
            ("due_at", Column::DueAt),
            ("created_at", Column::CreatedAt),
            ("updated_at", Column::UpdatedAt),
        ]
    }
}
