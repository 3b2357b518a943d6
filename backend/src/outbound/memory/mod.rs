//! In-memory repositories for tests and database-less development.
//!
//! State lives behind a `std::sync::Mutex` that is never held across an
//! `.await`.

mod followers;
mod posts;

pub use followers::InMemoryFollowerRepository;
pub use posts::InMemoryPostRepository;
