//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **identity**: HTTP identity provider client (reqwest)
//! - **rate_limit**: Redis and in-memory sliding-log limiters
//! - **memory**: in-memory repositories for tests and local development
//!
//! Adapters translate between domain types and infrastructure
//! representations and contain no business logic.

pub mod identity;
pub mod memory;
pub mod persistence;
pub mod rate_limit;
