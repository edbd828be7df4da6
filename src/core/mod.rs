//! Storage backends that execute a [`Query`](crate::query::Query).
//!
//! - [`InMemoryStore`]: JSON records behind a lock, evaluated in process
//! - [`SeaOrmStore`]: any Sea-ORM entity, executed as SQL

pub mod in_memory;
pub mod sea_orm_store;
pub mod traits;

pub use in_memory::InMemoryStore;
pub use sea_orm_store::SeaOrmStore;
pub use traits::ResourceStore;
