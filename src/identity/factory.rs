use std::sync::Arc;
use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;
use crate::identity::{FixedIdentityClient, IdentityClient, IdentityVia};
use crate::identity::http_identity_client::HttpIdentityClient;

pub(crate) fn create_identity_client(config: &Configuration, via: IdentityVia) -> LibraryResult<Arc<dyn IdentityClient>> {
    match via {
        IdentityVia::Http => {
            Ok(Arc::new(HttpIdentityClient::new(config.identity_url.as_str())?))
        }
        IdentityVia::Fixed => {
            Ok(Arc::new(FixedIdentityClient::new(config.dev_owner_id)))
        }
    }
}
