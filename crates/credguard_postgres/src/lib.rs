//! PostgreSQL adapter for the CredGuard `RecordStore` port.
//!
//! `PgRecordStore` is a newtype wrapping `PgPool`. All SQL is runtime-checked
//! (`sqlx::query`, not `sqlx::query!`) to avoid a compile-time database
//! requirement.

mod rows;
mod store;

pub use store::PgRecordStore;
