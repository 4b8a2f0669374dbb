use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use crate::books::dto::BookResponse;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub(crate) struct ToggleStatusCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl ToggleStatusCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct ToggleStatusCommandRequest {
    pub(crate) book_id: i64,
}

impl ToggleStatusCommandRequest {
    pub fn new(book_id: i64) -> Self {
        Self {
            book_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ToggleStatusCommandResponse {
    #[serde(flatten)]
    pub book: BookResponse,
}

impl ToggleStatusCommandResponse {
    pub fn new(book: BookResponse) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<ToggleStatusCommandRequest, ToggleStatusCommandResponse> for ToggleStatusCommand {
    async fn execute(&self, req: ToggleStatusCommandRequest) -> Result<ToggleStatusCommandResponse, CommandError> {
        self.catalog_service.update_status(req.book_id).await
            .map_err(CommandError::from).map(ToggleStatusCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;
    use async_once::AsyncOnce;
    use lazy_static::lazy_static;
    use crate::books::dto::BookRequest;
    use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest};
    use crate::catalog::command::toggle_status_cmd::{ToggleStatusCommand, ToggleStatusCommandRequest};
    use crate::catalog::domain::{BOOK_BY_ID, CatalogService};
    use crate::catalog::factory;
    use crate::core::command::Command;
    use crate::core::library::{BookStatus, Genre};
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;

    lazy_static! {
        static ref SVC : AsyncOnce<Arc<dyn CatalogService>> = AsyncOnce::new(async {
                factory::create_catalog_service(&Configuration::new("test"), RepositoryStore::InMemory).await
            });
    }

    #[tokio::test]
    async fn test_should_run_toggle_status() {
        let add_cmd = AddBookCommand::new(SVC.get().await.clone());
        let toggle_cmd = ToggleStatusCommand::new(SVC.get().await.clone());

        let book = BookRequest::new("4000000000001", "Treasure Island", "Robert Louis Stevenson", "Pirates",
                                    &[Genre::Adventure], BookStatus::Available);
        let added = add_cmd.execute(AddBookCommandRequest::new(book, 1)).await.expect("should add book");
        let toggled = toggle_cmd.execute(ToggleStatusCommandRequest::new(added.book.id)).await.expect("should toggle");
        assert_eq!(BTreeSet::from([BookStatus::Unavailable]), toggled.book.status);
        let toggled = toggle_cmd.execute(ToggleStatusCommandRequest::new(added.book.id)).await.expect("should toggle");
        assert_eq!(BTreeSet::from([BookStatus::Available]), toggled.book.status);
    }

    #[tokio::test]
    async fn test_should_fail_toggle_missing_book() {
        let toggle_cmd = ToggleStatusCommand::new(SVC.get().await.clone());
        let err = toggle_cmd.execute(ToggleStatusCommandRequest::new(i64::MAX)).await.expect_err("should not find book");
        assert_eq!(BOOK_BY_ID, err.message());
    }
}
