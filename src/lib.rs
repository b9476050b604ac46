//! Generic CRUD request handling for Axum and Sea-ORM.
//!
//! A resource implements [`CrudResource`] to describe its entity, columns,
//! and payload models; the crate supplies the query-parameter mini-language
//! (`filters`, `order_by`, `fields`, `page`, `page_size`), compiles it into
//! typed Sea-ORM queries, and wraps results and failures in a uniform
//! `{message, data}` envelope.

pub mod coerce;
pub mod errors;
pub mod filter;
pub mod models;
pub mod query;
pub mod response;
pub mod routes;
pub mod sort;
pub mod traits;
pub mod validation;

pub use errors::ApiError;
pub use models::{ListParams, Page, QueryRequest, QuerySpec};
pub use query::ListOutcome;
pub use routes::crud_router;
pub use traits::{CrudResource, MergeIntoActiveModel};
pub use validation::{Validatable, ValidationError};
