use std::time::Duration;
use async_trait::async_trait;
use tracing::debug;
use crate::core::library::{LibraryError, LibraryResult};
use crate::identity::IdentityClient;

pub const USER_AGENT: &str = "book-catalog/0.1.0";
const CURRENT_USER_PATH: &str = "/external/user/current-user";

// HttpIdentityClient asks the user service who the caller is, forwarding the caller's own
// bearer token.
#[derive(Debug, Clone)]
pub(crate) struct HttpIdentityClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpIdentityClient {
    pub(crate) fn new(base_url: &str) -> LibraryResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl IdentityClient for HttpIdentityClient {
    async fn current_user_id(&self, token: Option<&str>) -> LibraryResult<i64> {
        let token = token.ok_or_else(|| LibraryError::access_denied(
            "missing bearer token", Some("401".to_string())))?;
        let url = format!("{}{}", self.base_url, CURRENT_USER_PATH);
        debug!(url = url.as_str(), "resolving current user");
        let user_id = self.client
            .get(url)
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?
            .json::<i64>()
            .await?;
        Ok(user_id)
    }
}
