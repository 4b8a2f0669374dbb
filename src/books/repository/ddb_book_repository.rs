use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsError;
use aws_sdk_dynamodb::types::{AttributeValue, Delete, Put, ReturnValue, ScalarAttributeType, TransactWriteItem};
use chrono::Utc;
use tracing::debug;

use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::core::domain::Configuration;
use crate::core::library::{BookStatus, Genre, LibraryError, LibraryResult};
use crate::core::repository::Repository;
use crate::utils::ddb::{create_table, number, parse_date_attribute, parse_number_attribute, parse_string_attribute, parse_string_set_attribute, string_date};

const SCAN_PAGE_SIZE: i32 = 500;
const CONDITIONAL_CHECK_FAILED: &str = "ConditionalCheckFailed";

// DDBBookRepository keeps books in one table keyed by a numeric book_id. Code uniqueness is held
// by a second table keyed by isbn whose rows are written in the same transaction as the book, and
// ids come from an atomic counter in the sequences table.
#[derive(Debug)]
pub struct DDBBookRepository {
    client: Client,
    table_name: String,
    isbn_table_name: String,
    sequence_table_name: String,
}

impl DDBBookRepository {
    pub(crate) fn new(client: Client, table_name: &str, isbn_table_name: &str, sequence_table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            isbn_table_name: isbn_table_name.to_string(),
            sequence_table_name: sequence_table_name.to_string(),
        }
    }

    pub(crate) async fn create_tables(client: &Client, config: &Configuration) {
        let _ = create_table(client, config.books_table.as_str(), "book_id", ScalarAttributeType::N).await;
        let _ = create_table(client, config.isbn_table.as_str(), "isbn", ScalarAttributeType::S).await;
        let _ = create_table(client, config.sequence_table.as_str(), "name", ScalarAttributeType::S).await;
    }

    async fn next_id(&self) -> LibraryResult<i64> {
        let table_name: &str = self.sequence_table_name.as_ref();
        self.client
            .update_item()
            .table_name(table_name)
            .key("name", AttributeValue::S(self.table_name.to_string()))
            .update_expression("ADD next_value :incr")
            .expression_attribute_values(":incr", number(1))
            .return_values(ReturnValue::UpdatedNew)
            .send()
            .await.map_err(LibraryError::from).and_then(|out| {
            out.attributes()
                .and_then(|map| parse_number_attribute("next_value", map))
                .ok_or_else(|| LibraryError::database(
                    format!("no next_value returned by {}", table_name).as_str(), None, false))
        })
    }

    async fn isbn_owner(&self, isbn: &str) -> LibraryResult<Option<i64>> {
        let table_name: &str = self.isbn_table_name.as_ref();
        self.client
            .get_item()
            .table_name(table_name)
            .key("isbn", AttributeValue::S(isbn.to_string()))
            .consistent_read(true)
            .send()
            .await.map_err(LibraryError::from)
            .map(|out| out.item().and_then(|map| parse_number_attribute("book_id", map)))
    }

    async fn scan(&self, status: Option<BookStatus>) -> LibraryResult<Vec<BookEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let mut books = vec![];
        let mut exclusive_start_key: Option<HashMap<String, AttributeValue>> = None;
        loop {
            let mut request = self.client
                .scan()
                .table_name(table_name)
                .consistent_read(false)
                .set_exclusive_start_key(exclusive_start_key.take())
                .limit(SCAN_PAGE_SIZE);
            if let Some(status) = status {
                request = request
                    .filter_expression("contains(book_status, :status)")
                    .expression_attribute_values(":status", AttributeValue::S(status.to_string()));
            }
            let out = request.send().await.map_err(LibraryError::from)?;
            for item in out.items().unwrap_or_default() {
                books.push(map_to_book(item)?);
            }
            match out.last_evaluated_key() {
                Some(key) if !key.is_empty() => exclusive_start_key = Some(key.clone()),
                _ => break,
            }
        }
        books.sort_by_key(|b| b.book_id);
        Ok(books)
    }

    fn isbn_guard(&self, isbn: &str, book_id: i64) -> TransactWriteItem {
        TransactWriteItem::builder()
            .put(Put::builder()
                .table_name(self.isbn_table_name.as_str())
                .item("isbn", AttributeValue::S(isbn.to_string()))
                .item("book_id", number(book_id))
                .condition_expression("attribute_not_exists(isbn)")
                .build())
            .build()
    }

    fn release_isbn(&self, isbn: &str, book_id: i64) -> TransactWriteItem {
        TransactWriteItem::builder()
            .delete(Delete::builder()
                .table_name(self.isbn_table_name.as_str())
                .key("isbn", AttributeValue::S(isbn.to_string()))
                .condition_expression("book_id = :book_id")
                .expression_attribute_values(":book_id", number(book_id))
                .build())
            .build()
    }

    async fn insert(&self, entity: &BookEntity) -> LibraryResult<BookEntity> {
        let id = self.next_id().await?;
        let now = Utc::now().naive_utc();
        let mut saved = entity.clone();
        saved.book_id = Some(id);
        saved.version = 0;
        saved.created_at = now;
        saved.updated_at = now;

        let put_book = TransactWriteItem::builder()
            .put(Put::builder()
                .table_name(self.table_name.as_str())
                .set_item(Some(to_item(&saved, id)))
                .condition_expression("attribute_not_exists(book_id)")
                .build())
            .build();
        self.client
            .transact_write_items()
            .transact_items(put_book)
            .transact_items(self.isbn_guard(saved.isbn.as_str(), id))
            .send()
            .await.map_err(|err| transaction_error(err, |index| match index {
            0 => LibraryError::database(format!("book id {} already in use", id).as_str(), None, false),
            _ => LibraryError::duplicate_key(format!("isbn {} is already taken", saved.isbn).as_str()),
        }))?;
        Ok(saved)
    }

    async fn replace(&self, id: i64, entity: &BookEntity) -> LibraryResult<BookEntity> {
        let current = self.find_by_id(id).await?
            .ok_or_else(|| LibraryError::not_found(format!("book not found for {}", id).as_str()))?;
        if current.version != entity.version {
            return Err(LibraryError::unavailable(
                format!("book {} was modified concurrently", id).as_str(),
                Some("version_mismatch".to_string()), true));
        }
        let mut saved = entity.clone();
        saved.version = current.version + 1;
        saved.created_at = current.created_at;
        saved.updated_at = Utc::now().naive_utc();

        let put_book = TransactWriteItem::builder()
            .put(Put::builder()
                .table_name(self.table_name.as_str())
                .set_item(Some(to_item(&saved, id)))
                .condition_expression("attribute_exists(book_id) AND version = :old_version")
                .expression_attribute_values(":old_version", number(current.version))
                .build())
            .build();
        let mut request = self.client
            .transact_write_items()
            .transact_items(put_book);
        if current.isbn != saved.isbn {
            request = request
                .transact_items(self.release_isbn(current.isbn.as_str(), id))
                .transact_items(self.isbn_guard(saved.isbn.as_str(), id));
        }
        request
            .send()
            .await.map_err(|err| transaction_error(err, |index| match index {
            2 => LibraryError::duplicate_key(format!("isbn {} is already taken", saved.isbn).as_str()),
            _ => LibraryError::unavailable(format!("book {} was modified concurrently", id).as_str(),
                                           Some(CONDITIONAL_CHECK_FAILED.to_string()), true),
        }))?;
        Ok(saved)
    }
}

#[async_trait]
impl Repository<BookEntity> for DDBBookRepository {
    async fn save(&self, entity: &BookEntity) -> LibraryResult<BookEntity> {
        match entity.book_id {
            None => self.insert(entity).await,
            Some(id) => self.replace(id, entity).await,
        }
    }

    async fn find_by_id(&self, id: i64) -> LibraryResult<Option<BookEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let out = self.client
            .get_item()
            .table_name(table_name)
            .key("book_id", number(id))
            .consistent_read(true)
            .send()
            .await.map_err(LibraryError::from)?;
        out.item().map(map_to_book).transpose()
    }

    async fn find_all(&self) -> LibraryResult<Vec<BookEntity>> {
        self.scan(None).await
    }
}

#[async_trait]
impl BookRepository for DDBBookRepository {
    async fn find_by_isbn(&self, isbn: &str) -> LibraryResult<Option<BookEntity>> {
        match self.isbn_owner(isbn).await? {
            Some(id) => {
                let book = self.find_by_id(id).await?;
                if book.is_none() {
                    debug!(isbn, book_id = id, "isbn guard points at a missing book");
                }
                Ok(book)
            }
            None => Ok(None),
        }
    }

    async fn find_by_status_containing(&self, status: BookStatus) -> LibraryResult<Vec<BookEntity>> {
        self.scan(Some(status)).await
    }

    async fn delete_by_isbn(&self, isbn: &str) -> LibraryResult<usize> {
        let id = match self.isbn_owner(isbn).await? {
            Some(id) => id,
            None => return Ok(0),
        };
        let delete_book = TransactWriteItem::builder()
            .delete(Delete::builder()
                .table_name(self.table_name.as_str())
                .key("book_id", number(id))
                .build())
            .build();
        self.client
            .transact_write_items()
            .transact_items(delete_book)
            .transact_items(self.release_isbn(isbn, id))
            .send()
            .await.map(|_| 1).map_err(|err| transaction_error(err, |_| LibraryError::unavailable(
            format!("isbn {} was reassigned concurrently", isbn).as_str(),
            Some(CONDITIONAL_CHECK_FAILED.to_string()), true)))
    }
}

// Maps a cancelled transaction to the error of the first item whose condition failed.
fn transaction_error<F>(err: SdkError<TransactWriteItemsError>, on_condition_failed: F) -> LibraryError
    where F: Fn(usize) -> LibraryError {
    if let SdkError::ServiceError(ctx) = &err {
        if let TransactWriteItemsError::TransactionCanceledException(cancelled) = ctx.err() {
            let failed = cancelled.cancellation_reasons().unwrap_or_default().iter()
                .position(|reason| reason.code() == Some(CONDITIONAL_CHECK_FAILED));
            if let Some(index) = failed {
                return on_condition_failed(index);
            }
            return LibraryError::unavailable(
                format!("book transaction cancelled {:?}", cancelled).as_str(),
                Some("TransactionCanceled".to_string()), true);
        }
    }
    LibraryError::from(err)
}

fn to_item(book: &BookEntity, id: i64) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::from([
        ("book_id".to_string(), number(id)),
        ("version".to_string(), number(book.version)),
        ("title".to_string(), AttributeValue::S(book.title.to_string())),
        ("author".to_string(), AttributeValue::S(book.author.to_string())),
        ("isbn".to_string(), AttributeValue::S(book.isbn.to_string())),
        ("description".to_string(), AttributeValue::S(book.description.to_string())),
        ("created_at".to_string(), string_date(book.created_at)),
        ("updated_at".to_string(), string_date(book.updated_at)),
    ]);
    // DynamoDB rejects empty string sets
    if !book.genre.is_empty() {
        item.insert("genre".to_string(), AttributeValue::Ss(book.genre.iter().map(Genre::to_string).collect()));
    }
    if !book.status.is_empty() {
        item.insert("book_status".to_string(), AttributeValue::Ss(book.status.iter().map(BookStatus::to_string).collect()));
    }
    if let Some(owner_id) = book.owner_id {
        item.insert("owner_id".to_string(), number(owner_id));
    }
    item
}

fn map_to_book(map: &HashMap<String, AttributeValue>) -> LibraryResult<BookEntity> {
    let genre = parse_string_set_attribute("genre", map).iter()
        .map(|g| Genre::try_from(g.as_str()))
        .collect::<LibraryResult<BTreeSet<Genre>>>()?;
    let status = parse_string_set_attribute("book_status", map).iter()
        .map(|s| BookStatus::try_from(s.as_str()))
        .collect::<LibraryResult<BTreeSet<BookStatus>>>()?;
    Ok(BookEntity {
        book_id: parse_number_attribute("book_id", map),
        version: parse_number_attribute("version", map).unwrap_or(0),
        title: parse_string_attribute("title", map).unwrap_or(String::from("")),
        author: parse_string_attribute("author", map).unwrap_or(String::from("")),
        isbn: parse_string_attribute("isbn", map).unwrap_or(String::from("")),
        description: parse_string_attribute("description", map).unwrap_or(String::from("")),
        genre,
        status,
        owner_id: parse_number_attribute("owner_id", map),
        created_at: parse_date_attribute("created_at", map).unwrap_or(Utc::now().naive_utc()),
        updated_at: parse_date_attribute("updated_at", map).unwrap_or(Utc::now().naive_utc()),
    })
}
