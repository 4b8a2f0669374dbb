use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use crate::books::dto::{BookRequest, BookResponse};
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub(crate) struct AddBookCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl AddBookCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct AddBookCommandRequest {
    pub(crate) book: BookRequest,
    pub(crate) owner_id: i64,
}

impl AddBookCommandRequest {
    pub fn new(book: BookRequest, owner_id: i64) -> Self {
        Self {
            book,
            owner_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AddBookCommandResponse {
    #[serde(flatten)]
    pub book: BookResponse,
}

impl AddBookCommandResponse {
    pub fn new(book: BookResponse) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<AddBookCommandRequest, AddBookCommandResponse> for AddBookCommand {
    async fn execute(&self, req: AddBookCommandRequest) -> Result<AddBookCommandResponse, CommandError> {
        req.book.validate()?;
        self.catalog_service.create_book(&req.book, req.owner_id).await
            .map_err(CommandError::from).map(AddBookCommandResponse::new)
    }
}
