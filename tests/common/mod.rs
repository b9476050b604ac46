#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::prelude::*;
use serde_json::Value;
use tower::ServiceExt;

pub mod item_entity;

use crudbase::crud_router;
use item_entity::ItemResource;

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;

    Ok(db)
}

pub fn setup_app(db: DatabaseConnection) -> Router {
    Router::new().nest("/api", crud_router::<ItemResource>(db))
}

pub async fn setup_test_app() -> Router {
    let db = setup_test_db().await.expect("Failed to setup test database");
    setup_app(db)
}

/// Drive one request through the router and decode the JSON body.
pub async fn request_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Create an item and return its serialized record from the envelope.
pub async fn create_item(app: &Router, payload: Value) -> Value {
    let (status, body) = request_json(app, "POST", "/api/items", Some(payload)).await;
    assert_eq!(status, StatusCode::OK, "failed to create test item: {body}");
    body["data"]["item"].clone()
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateItemTable)]
    }
}

pub struct CreateItemTable;

impl MigrationName for CreateItemTable {
    fn name(&self) -> &'static str {
        "m20260101_000001_create_item_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateItemTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(ItemTable)
            .if_not_exists()
            .col(
                ColumnDef::new(ItemColumn::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(ItemColumn::Name).text().not_null())
            .col(
                ColumnDef::new(ItemColumn::Quantity)
                    .integer()
                    .not_null()
                    .default(0),
            )
            .col(ColumnDef::new(ItemColumn::DueAt).timestamp().null())
            .col(
                ColumnDef::new(ItemColumn::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(
                ColumnDef::new(ItemColumn::UpdatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .to_owned();

        manager.create_table(table).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ItemTable).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Debug)]
pub enum ItemColumn {
    Id,
    Name,
    Quantity,
    DueAt,
    CreatedAt,
    UpdatedAt,
}

impl Iden for ItemColumn {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Id => "id",
                Self::Name => "name",
                Self::Quantity => "quantity",
                Self::DueAt => "due_at",
                Self::CreatedAt => "created_at",
                Self::UpdatedAt => "updated_at",
            }
        )
        .unwrap();
    }
}

#[derive(Debug)]
pub struct ItemTable;

impl Iden for ItemTable {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "items").unwrap();
    }
}
