//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and only see driving ports, so they
//! can be exercised against mocks or in-memory services without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    FeedQuery, LoginService, PostCommand, ProfileQuery, SocialGraphCommand, SocialGraphQuery,
};

/// Port implementations used by the handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub feed: Arc<dyn FeedQuery>,
    pub posts: Arc<dyn PostCommand>,
    pub profiles: Arc<dyn ProfileQuery>,
    pub graph: Arc<dyn SocialGraphQuery>,
    pub follows: Arc<dyn SocialGraphCommand>,
}

/// Parameter object for [`HttpState::new`].
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub feed: Arc<dyn FeedQuery>,
    pub posts: Arc<dyn PostCommand>,
    pub profiles: Arc<dyn ProfileQuery>,
    pub graph: Arc<dyn SocialGraphQuery>,
    pub follows: Arc<dyn SocialGraphCommand>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// The social graph service implements three ports, so the same `Arc`
    /// is usually passed for `profiles`, `graph`, and `follows`.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            feed,
            posts,
            profiles,
            graph,
            follows,
        } = ports;
        Self {
            login,
            feed,
            posts,
            profiles,
            graph,
            follows,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
