use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use crate::books::dto::BookListResponse;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub(crate) struct ListBooksCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl ListBooksCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct ListBooksCommandRequest {
    pub(crate) available_only: bool,
}

impl ListBooksCommandRequest {
    pub fn new(available_only: bool) -> Self {
        Self {
            available_only,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ListBooksCommandResponse {
    #[serde(flatten)]
    pub list: BookListResponse,
}

#[async_trait]
impl Command<ListBooksCommandRequest, ListBooksCommandResponse> for ListBooksCommand {
    async fn execute(&self, req: ListBooksCommandRequest) -> Result<ListBooksCommandResponse, CommandError> {
        let books = if req.available_only {
            self.catalog_service.available_books().await?
        } else {
            self.catalog_service.find_all().await?
        };
        Ok(ListBooksCommandResponse { list: BookListResponse::new(books) })
    }
}
