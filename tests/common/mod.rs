use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use elepy::core::{InMemoryStore, SeaOrmStore};
use elepy::registry::ModelRegistry;
use elepy::schema::{PropertyBuilder, PropertyType, Schema};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue::Set, Database, DatabaseConnection, DbErr, EntityTrait};
use sea_orm_migration::prelude::*;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

pub mod resource_entity;

/// `(id, unique, numberMax40, active, created, tags)`
pub const RESOURCES: [(i32, &str, Option<i32>, bool, &str, &[&str]); 5] = [
    (1, "alpha", Some(10), true, "2024-01-15T00:00:00Z", &["hot"]),
    (2, "beta", Some(25), false, "2024-02-01T00:00:00Z", &["cold", "dry"]),
    (3, "filterUnique", Some(40), true, "2024-03-10T08:30:00Z", &[]),
    (4, "gamma", None, false, "2024-02-01T12:00:00Z", &["dry"]),
    (5, "filter_delta", Some(25), true, "2023-12-31T23:59:59Z", &["hot", "wind"]),
];

pub fn resource_schema(name: &str) -> Schema {
    Schema::builder(name)
        .property("id", PropertyType::Number, PropertyBuilder::sortable)
        .property("unique", PropertyType::String, |p| {
            p.pretty_name("Unique").searchable().sortable()
        })
        .property("numberMax40", PropertyType::Number, |p| {
            p.pretty_name("Number Max 40").sortable()
        })
        .property("active", PropertyType::Boolean, |p| p)
        .property("created", PropertyType::Date, PropertyBuilder::sortable)
        .property("tags", PropertyType::Collection, PropertyBuilder::searchable)
        .build()
        .unwrap()
}

pub fn resource_records() -> Vec<Value> {
    RESOURCES
        .iter()
        .map(|(id, unique, number_max40, active, created, tags)| {
            json!({
                "id": id,
                "unique": unique,
                "numberMax40": number_max40,
                "active": active,
                "created": created,
                "tags": tags,
            })
        })
        .collect()
}

/// Install a test-friendly subscriber; `RUST_LOG=elepy=debug` shows parsed queries.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;

    let models = RESOURCES
        .iter()
        .map(|(id, unique, number_max40, active, created, tags)| resource_entity::ActiveModel {
            id: Set(*id),
            unique: Set((*unique).to_string()),
            number_max40: Set(*number_max40),
            active: Set(*active),
            created: Set(DateTime::parse_from_rfc3339(created).unwrap().with_timezone(&Utc)),
            // Stored as the same JSON text the in-memory store searches
            tags: Set(serde_json::to_string(tags).unwrap()),
        });
    resource_entity::Entity::insert_many(models).exec(&db).await?;

    Ok(db)
}

/// App serving the same records from SQLite under `/resources` and from memory under `/memory`.
pub fn setup_test_app(db: DatabaseConnection) -> Router {
    let registry = ModelRegistry::new()
        .register(
            resource_schema("resources"),
            SeaOrmStore::<resource_entity::Entity>::new(db),
        )
        .register(
            resource_schema("memory"),
            InMemoryStore::with_records(resource_records()),
        );

    elepy::routes::router(Arc::new(registry))
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub fn ids(page: &Value) -> Vec<i64> {
    page["values"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_i64().unwrap())
        .collect()
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateResourceTable)]
    }
}

pub struct CreateResourceTable;

#[async_trait::async_trait]
impl MigrationName for CreateResourceTable {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_resource_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateResourceTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(ResourceEntity)
            .if_not_exists()
            .col(
                ColumnDef::new(ResourceColumn::Id)
                    .integer()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(ResourceColumn::Unique).string().not_null())
            .col(ColumnDef::new(ResourceColumn::NumberMax40).integer().null())
            .col(
                ColumnDef::new(ResourceColumn::Active)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(ColumnDef::new(ResourceColumn::Created).string().not_null())
            .col(ColumnDef::new(ResourceColumn::Tags).text().not_null())
            .to_owned();

        manager.create_table(table).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ResourceEntity).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Debug)]
pub enum ResourceColumn {
    Id,
    Unique,
    NumberMax40,
    Active,
    Created,
    Tags,
}

impl Iden for ResourceColumn {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Id => "id",
                Self::Unique => "unique",
                Self::NumberMax40 => "numberMax40",
                Self::Active => "active",
                Self::Created => "created",
                Self::Tags => "tags",
            }
        )
        .unwrap();
    }
}

#[derive(Debug)]
pub struct ResourceEntity;

impl Iden for ResourceEntity {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "resources").unwrap();
    }
}
