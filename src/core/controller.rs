use std::sync::Arc;
use axum::http::StatusCode;
use crate::catalog::domain::CatalogService;
use crate::core::command::CommandError;
use crate::identity::IdentityClient;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) catalog: Arc<dyn CatalogService>,
    pub(crate) identity: Arc<dyn IdentityClient>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogService>, identity: Arc<dyn IdentityClient>) -> AppState {
        AppState {
            catalog,
            identity,
        }
    }
}

pub(crate) type ServerError = (StatusCode, String);

pub fn json_to_server_error(err: serde_json::Error) -> ServerError {
    (StatusCode::BAD_REQUEST, format!("{}", err))
}

impl From<CommandError> for ServerError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Access { .. } => {
                (StatusCode::BAD_REQUEST, err.message().to_string())
            }
            CommandError::AlreadyExists { .. } => {
                (StatusCode::BAD_REQUEST, err.message().to_string())
            }
            CommandError::Database { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{:?}", err))
            }
            CommandError::DuplicateKey { .. } => {
                (StatusCode::CONFLICT, err.message().to_string())
            }
            CommandError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, err.message().to_string())
            }
            CommandError::Runtime { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{:?}", err))
            }
            CommandError::Serialization { .. } => {
                (StatusCode::BAD_REQUEST, err.message().to_string())
            }
            CommandError::Validation { .. } => {
                (StatusCode::BAD_REQUEST, err.message().to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use crate::core::command::CommandError;
    use crate::core::controller::ServerError;

    #[tokio::test]
    async fn test_should_map_command_errors() {
        let (status, body) = ServerError::from(CommandError::NotFound { message: "Book not found.".to_string() });
        assert_eq!(StatusCode::NOT_FOUND, status);
        assert_eq!("Book not found.", body.as_str());

        let (status, _) = ServerError::from(CommandError::AlreadyExists { message: "dup".to_string() });
        assert_eq!(StatusCode::BAD_REQUEST, status);

        let (status, _) = ServerError::from(CommandError::Database { message: "down".to_string(), reason_code: None, retryable: false });
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status);
    }
}
