use crate::books::repository::BookRepository;
use crate::books::repository::ddb_book_repository::DDBBookRepository;
use crate::books::repository::memory_book_repository::MemoryBookRepository;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::utils::ddb::build_db_client;

pub(crate) async fn create_book_repository(config: &Configuration, store: RepositoryStore) -> Box<dyn BookRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Box::new(DDBBookRepository::new(client, config.books_table.as_str(),
                                            config.isbn_table.as_str(), config.sequence_table.as_str()))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            DDBBookRepository::create_tables(&client, config).await;
            Box::new(DDBBookRepository::new(client, config.books_table.as_str(),
                                            config.isbn_table.as_str(), config.sequence_table.as_str()))
        }
        RepositoryStore::InMemory => {
            Box::new(MemoryBookRepository::new())
        }
    }
}
