use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use crate::books::dto::BookResponse;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub(crate) struct GetBookCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl GetBookCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

// lookup by id, or by isbn when `isbn` is set
#[derive(Debug)]
pub(crate) struct GetBookCommandRequest {
    pub(crate) book_id: Option<i64>,
    pub(crate) isbn: Option<String>,
}

impl GetBookCommandRequest {
    pub fn by_id(book_id: i64) -> Self {
        Self {
            book_id: Some(book_id),
            isbn: None,
        }
    }

    pub fn by_isbn(isbn: &str) -> Self {
        Self {
            book_id: None,
            isbn: Some(isbn.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GetBookCommandResponse {
    #[serde(flatten)]
    pub book: BookResponse,
}

impl GetBookCommandResponse {
    pub fn new(book: BookResponse) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<GetBookCommandRequest, GetBookCommandResponse> for GetBookCommand {
    async fn execute(&self, req: GetBookCommandRequest) -> Result<GetBookCommandResponse, CommandError> {
        let res = match (req.isbn, req.book_id) {
            (Some(isbn), _) => self.catalog_service.find_by_isbn(isbn.as_str()).await,
            (None, Some(book_id)) => self.catalog_service.find_by_id(book_id).await,
            (None, None) => {
                return Err(CommandError::Validation {
                    message: "book id or isbn is required".to_string(),
                    reason_code: None,
                });
            }
        };
        res.map_err(CommandError::from).map(GetBookCommandResponse::new)
    }
}
