use async_trait::async_trait;
use crate::core::library::LibraryResult;

pub mod factory;
pub mod http_identity_client;

// How the caller's user id is resolved
#[derive(Debug, PartialEq, Clone, Copy)]
pub(crate) enum IdentityVia {
    Http,
    Fixed,
}

// IdentityClient resolves the numeric id of the user behind the request's bearer token.
// The catalog stamps this id on books it creates or updates.
#[async_trait]
pub(crate) trait IdentityClient: Sync + Send {
    async fn current_user_id(&self, token: Option<&str>) -> LibraryResult<i64>;
}

// FixedIdentityClient answers with one configured id, for local runs without the user service.
pub(crate) struct FixedIdentityClient {
    user_id: i64,
}

impl FixedIdentityClient {
    pub(crate) fn new(user_id: i64) -> Self {
        Self {
            user_id,
        }
    }
}

#[async_trait]
impl IdentityClient for FixedIdentityClient {
    async fn current_user_id(&self, _token: Option<&str>) -> LibraryResult<i64> {
        Ok(self.user_id)
    }
}

// pulls the token out of an `Authorization: Bearer <token>` header value
pub(crate) fn bearer_token(header: Option<&str>) -> Option<&str> {
    header
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use crate::identity::{bearer_token, FixedIdentityClient, IdentityClient};

    #[tokio::test]
    async fn test_should_return_fixed_id() {
        let client = FixedIdentityClient::new(7);
        assert_eq!(7, client.current_user_id(None).await.expect("should return id"));
        assert_eq!(7, client.current_user_id(Some("token")).await.expect("should return id"));
    }

    #[tokio::test]
    async fn test_should_extract_bearer_token() {
        assert_eq!(Some("abc.def"), bearer_token(Some("Bearer abc.def")));
        assert_eq!(None, bearer_token(Some("Basic dXNlcjpwYXNz")));
        assert_eq!(None, bearer_token(Some("Bearer   ")));
        assert_eq!(None, bearer_token(None));
    }
}
