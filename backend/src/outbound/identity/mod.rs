//! Identity provider outbound adapters.
//!
//! A thin HTTP implementation of the `IdentityProvider` port. The fixture
//! implementation used for local development lives next to the port.

mod dto;
mod http_provider;

pub use http_provider::HttpIdentityProvider;
