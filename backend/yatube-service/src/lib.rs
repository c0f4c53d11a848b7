/// Yatube Service Library
///
/// A blog service: authors write posts, optionally file them under topical
/// groups, comment on posts and follow other authors. Feeds are ordered
/// newest first and paginated with a configured page size.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and shared `AppState`
/// - `routes`: URL table
/// - `models`: Authors, groups, posts, comments and follow edges
/// - `services`: Business logic layer
/// - `db`: `ContentStore` trait with PostgreSQL and in-memory stores
/// - `forms`: Form input cleaning and form descriptions
/// - `pagination`: Page arithmetic
/// - `views`: Page contexts and template names
/// - `session`: Session token verification
/// - `middleware`: Caller identity, permissions and request metrics
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Observability and metrics collection
pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod services;
pub mod session;
pub mod views;

pub use config::Config;
pub use error::{AppError, Result};
pub use handlers::AppState;
