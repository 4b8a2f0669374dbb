include!("../../lib.rs");
use axum::{
    routing::{get, post, put, delete},
    Router,
};
use lambda_http::{run, Error};
use crate::utils::ddb::setup_tracing;
use crate::catalog::controller::{add_book, available_books, find_book_by_id, find_book_by_isbn, list_books, remove_book, take_book, toggle_status, update_book};
use crate::catalog::factory::create_catalog_service;
use crate::core::controller::AppState;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::identity::factory::create_identity_client;

// See https://docs.aws.amazon.com/lambda/latest/dg/lambda-rust.html
// https://docs.aws.amazon.com/lambda/latest/dg/images-test.html
// https://docs.aws.amazon.com/lambda/latest/dg/rust-http-events.html

const DEV_MODE: bool = true;

#[tokio::main]
async fn main() -> Result<(), Error> {
    setup_tracing();

    let (config, store) = if DEV_MODE {
        std::env::set_var("AWS_LAMBDA_FUNCTION_NAME", "_");
        std::env::set_var("AWS_LAMBDA_FUNCTION_MEMORY_SIZE", "4096");
        std::env::set_var("AWS_LAMBDA_FUNCTION_VERSION", "1");
        std::env::set_var("AWS_LAMBDA_RUNTIME_API", "http://[::]:9000/.rt");
        (Configuration::from_env("dev"), RepositoryStore::LocalDynamoDB)
    } else {
        (Configuration::from_env("prod"), RepositoryStore::DynamoDB)
    };

    let catalog = create_catalog_service(&config, store).await;
    let identity = create_identity_client(&config, store.identity_via())?;
    tracing::info!(env = config.env.as_str(), store = ?store, "starting book catalog");
    let state = AppState::new(catalog, identity);

    let app = Router::new()
        .route("/book/create", post(add_book))
        .route("/book/books", get(list_books))
        .route("/book/available", get(available_books))
        .route("/book/:id", get(find_book_by_id))
        .route("/book/admin/isbn/:isbn", get(find_book_by_isbn))
        .route("/book/admin/update/:isbn", put(update_book))
        .route("/book/admin/delete/:isbn", delete(remove_book))
        .route("/external/book/:id", get(take_book))
        .route("/external/book/:id/status", put(toggle_status))
        .with_state(state);

    run(app).await
}
