use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::Json,
};
use serde_json::{Value};
use crate::books::dto::BookRequest;
use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest, AddBookCommandResponse};
use crate::catalog::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest, GetBookCommandResponse};
use crate::catalog::command::list_books_cmd::{ListBooksCommand, ListBooksCommandRequest, ListBooksCommandResponse};
use crate::catalog::command::remove_book_cmd::{RemoveBookCommand, RemoveBookCommandRequest};
use crate::catalog::command::take_book_cmd::{TakeBookCommand, TakeBookCommandRequest, TakeBookCommandResponse};
use crate::catalog::command::toggle_status_cmd::{ToggleStatusCommand, ToggleStatusCommandRequest};
use crate::catalog::command::update_book_cmd::{UpdateBookCommand, UpdateBookCommandRequest, UpdateBookCommandResponse};
use crate::core::command::{Command, CommandError};
use crate::core::controller::{AppState, json_to_server_error, ServerError};
use crate::identity::bearer_token;

// owner of a created or updated book is whoever the identity service says the caller is
async fn current_owner(state: &AppState, headers: &HeaderMap) -> Result<i64, ServerError> {
    let header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    state.identity.current_user_id(bearer_token(header)).await
        .map_err(|err| ServerError::from(CommandError::from(err)))
}

pub(crate) async fn add_book(
    State(state): State<AppState>,
    headers: HeaderMap,
    json: Json<Value>) -> Result<(StatusCode, Json<AddBookCommandResponse>), ServerError> {
    let book: BookRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let owner_id = current_owner(&state, &headers).await?;
    let res = AddBookCommand::new(state.catalog).execute(AddBookCommandRequest::new(book, owner_id)).await?;
    Ok((StatusCode::CREATED, Json(res)))
}

pub(crate) async fn list_books(
    State(state): State<AppState>) -> Result<Json<ListBooksCommandResponse>, ServerError> {
    let res = ListBooksCommand::new(state.catalog).execute(ListBooksCommandRequest::new(false)).await?;
    Ok(Json(res))
}

pub(crate) async fn available_books(
    State(state): State<AppState>) -> Result<Json<ListBooksCommandResponse>, ServerError> {
    let res = ListBooksCommand::new(state.catalog).execute(ListBooksCommandRequest::new(true)).await?;
    Ok(Json(res))
}

pub(crate) async fn find_book_by_id(
    State(state): State<AppState>,
    Path(book_id): Path<i64>) -> Result<Json<GetBookCommandResponse>, ServerError> {
    let res = GetBookCommand::new(state.catalog).execute(GetBookCommandRequest::by_id(book_id)).await?;
    Ok(Json(res))
}

pub(crate) async fn find_book_by_isbn(
    State(state): State<AppState>,
    Path(isbn): Path<String>) -> Result<Json<GetBookCommandResponse>, ServerError> {
    let res = GetBookCommand::new(state.catalog).execute(GetBookCommandRequest::by_isbn(isbn.as_str())).await?;
    Ok(Json(res))
}

pub(crate) async fn update_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
    headers: HeaderMap,
    json: Json<Value>) -> Result<Json<UpdateBookCommandResponse>, ServerError> {
    let book: BookRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let owner_id = current_owner(&state, &headers).await?;
    let req = UpdateBookCommandRequest::new(isbn.as_str(), book, owner_id);
    let res = UpdateBookCommand::new(state.catalog).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn remove_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>) -> Result<String, ServerError> {
    let res = RemoveBookCommand::new(state.catalog).execute(RemoveBookCommandRequest::new(isbn.as_str())).await?;
    Ok(res.message)
}

pub(crate) async fn take_book(
    State(state): State<AppState>,
    Path(book_id): Path<i64>) -> Result<Json<TakeBookCommandResponse>, ServerError> {
    let res = TakeBookCommand::new(state.catalog).execute(TakeBookCommandRequest::new(book_id)).await?;
    Ok(Json(res))
}

pub(crate) async fn toggle_status(
    State(state): State<AppState>,
    Path(book_id): Path<i64>) -> Result<StatusCode, ServerError> {
    let _ = ToggleStatusCommand::new(state.catalog).execute(ToggleStatusCommandRequest::new(book_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
