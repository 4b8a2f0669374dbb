use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use crate::books::dto::{BookRequest, BookResponse};
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub(crate) struct UpdateBookCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl UpdateBookCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct UpdateBookCommandRequest {
    // code of the book being replaced
    pub(crate) isbn: String,
    pub(crate) book: BookRequest,
    pub(crate) owner_id: i64,
}

impl UpdateBookCommandRequest {
    pub fn new(isbn: &str, book: BookRequest, owner_id: i64) -> Self {
        Self {
            isbn: isbn.to_string(),
            book,
            owner_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateBookCommandResponse {
    #[serde(flatten)]
    pub book: BookResponse,
}

impl UpdateBookCommandResponse {
    pub fn new(book: BookResponse) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<UpdateBookCommandRequest, UpdateBookCommandResponse> for UpdateBookCommand {
    async fn execute(&self, req: UpdateBookCommandRequest) -> Result<UpdateBookCommandResponse, CommandError> {
        req.book.validate()?;
        self.catalog_service.update_by_isbn(req.isbn.as_str(), &req.book, req.owner_id).await
            .map_err(CommandError::from).map(UpdateBookCommandResponse::new)
    }
}
