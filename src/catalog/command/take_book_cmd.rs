use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use crate::books::dto::BookLoanInfo;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

// read-only view of a book for the borrowing workflow
pub(crate) struct TakeBookCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl TakeBookCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct TakeBookCommandRequest {
    pub(crate) book_id: i64,
}

impl TakeBookCommandRequest {
    pub fn new(book_id: i64) -> Self {
        Self {
            book_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TakeBookCommandResponse {
    #[serde(flatten)]
    pub info: BookLoanInfo,
}

#[async_trait]
impl Command<TakeBookCommandRequest, TakeBookCommandResponse> for TakeBookCommand {
    async fn execute(&self, req: TakeBookCommandRequest) -> Result<TakeBookCommandResponse, CommandError> {
        self.catalog_service.take_the_book(req.book_id).await
            .map_err(CommandError::from).map(|info| TakeBookCommandResponse { info })
    }
}
