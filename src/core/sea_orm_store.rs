use async_trait::async_trait;
use sea_orm::{
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Alias, Expr},
};
use serde_json::Value;
use std::marker::PhantomData;

use super::traits::ResourceStore;
use crate::errors::ApiError;
use crate::filtering::build_condition;
use crate::models::Page;
use crate::query::{Query, parse_id};
use crate::schema::Schema;

/// [`ResourceStore`] backed by a Sea-ORM entity.
///
/// Schema property names must match the entity's column names. Rows are returned
/// as JSON objects keyed by column name.
pub struct SeaOrmStore<E> {
    db: DatabaseConnection,
    entity: PhantomData<fn() -> E>,
}

impl<E> SeaOrmStore<E> {
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            entity: PhantomData,
        }
    }

    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl<E> Clone for SeaOrmStore<E> {
    fn clone(&self) -> Self {
        Self::new(self.db.clone())
    }
}

#[async_trait]
impl<E> ResourceStore for SeaOrmStore<E>
where
    E: EntityTrait + Send + Sync,
    E::Model: Sync,
{
    async fn find(&self, schema: &Schema, query: &Query) -> Result<Page<Value>, ApiError> {
        let condition = build_condition(query.expression(), schema)?;
        let select = E::find().filter(condition);

        let total_count = PaginatorTrait::count(select.clone(), &self.db)
            .await
            .map_err(ApiError::database)?;

        let pagination = query.pagination();
        if pagination.is_out_of_range() {
            return Ok(Page::new(Vec::new(), total_count, query.page_number(), query.page_size()));
        }

        let mut select = query
            .sort()
            .entries()
            .iter()
            .fold(select, |select, entry| {
                select.order_by(Expr::col(Alias::new(&entry.property)), entry.direction.into())
            });
        if let Some(limit) = pagination.limit() {
            select = select.offset(pagination.offset()).limit(limit);
        }

        let values = select
            .into_json()
            .all(&self.db)
            .await
            .map_err(ApiError::database)?;

        tracing::debug!(
            model = schema.name(),
            total_count,
            returned = values.len(),
            "Executed query"
        );

        Ok(Page::new(values, total_count, query.page_number(), query.page_size()))
    }

    async fn find_by_id(&self, schema: &Schema, id: &str) -> Result<Value, ApiError> {
        let expression = parse_id(schema, id)?;
        let condition = build_condition(Some(&expression), schema)?;

        E::find()
            .filter(condition)
            .into_json()
            .one(&self.db)
            .await
            .map_err(ApiError::database)?
            .ok_or_else(|| ApiError::not_found(schema.name(), Some(id.to_string())))
    }
}
