use std::sync::Arc;
use crate::books::factory;
use crate::books::repository::BookRepository;
use crate::catalog::domain::CatalogService;
use crate::catalog::domain::service::CatalogServiceImpl;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;

pub(crate) async fn create_catalog_service(config: &Configuration, store: RepositoryStore) -> Arc<dyn CatalogService> {
    let book_repo = factory::create_book_repository(config, store).await;
    with_book_repository(config, book_repo)
}

pub(crate) fn with_book_repository(config: &Configuration, book_repo: Box<dyn BookRepository>) -> Arc<dyn CatalogService> {
    Arc::new(CatalogServiceImpl::new(config, book_repo))
}
