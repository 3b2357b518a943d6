//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories only translate between Diesel rows and domain types. Row
//! structs (`models.rs`) and table definitions (`schema.rs`) stay private to
//! this module; connections come from a `bb8` pool of `diesel-async`
//! connections.
//!
//! # Example
//!
//! ```ignore
//! use murmur::outbound::persistence::{DbPool, DieselPostRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/murmur")).await?;
//! let posts = DieselPostRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_follower_repository;
mod diesel_post_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_follower_repository::DieselFollowerRepository;
pub use diesel_post_repository::DieselPostRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
