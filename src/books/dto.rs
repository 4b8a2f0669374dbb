use std::collections::{BTreeMap, BTreeSet};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use crate::books::domain::model::BookEntity;
use crate::core::library::{BookStatus, Genre, LibraryError, LibraryResult};

const MAX_TEXT_LEN: usize = 255;
const ISBN_LEN: usize = 13;

// BookRequest is the client-supplied shape for create and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookRequest {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub description: String,
    pub genre: BTreeSet<Genre>,
    pub status: BTreeSet<BookStatus>,
}

impl BookRequest {
    pub fn new(isbn: &str, title: &str, author: &str, description: &str,
               genre: &[Genre], status: BookStatus) -> Self {
        Self {
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.to_string(),
            description: description.to_string(),
            genre: genre.iter().copied().collect(),
            status: BTreeSet::from([status]),
        }
    }

    // Field-level shape checks. All failures are reported together as a field -> message map.
    pub fn validate(&self) -> LibraryResult<()> {
        let mut errors = BTreeMap::new();
        check_text("title", "Title", &self.title, &mut errors);
        check_text("author", "Author", &self.author, &mut errors);
        check_text("description", "Description", &self.description, &mut errors);
        if self.isbn.len() != ISBN_LEN || !self.isbn.chars().all(|c| c.is_ascii_digit()) {
            errors.insert("isbn", "ISBN must consist of 13 digits!!!".to_string());
        }
        if self.genre.is_empty() {
            errors.insert("genre", "Genre cannot be empty".to_string());
        }
        if self.status.is_empty() {
            errors.insert("status", "Status cannot be empty".to_string());
        }
        if errors.is_empty() {
            return Ok(());
        }
        let message = serde_json::to_string(&errors)?;
        Err(LibraryError::validation(message.as_str(), Some("invalid_book_request".to_string())))
    }

    // builds the stored record; `book_id` is None for a new book
    pub fn to_entity(&self, book_id: Option<i64>, owner_id: i64) -> BookEntity {
        let now = Utc::now().naive_utc();
        BookEntity {
            book_id,
            version: 0,
            title: self.title.to_string(),
            author: self.author.to_string(),
            isbn: self.isbn.to_string(),
            description: self.description.to_string(),
            genre: self.genre.clone(),
            status: self.status.clone(),
            owner_id: Some(owner_id),
            created_at: now,
            updated_at: now,
        }
    }
}

fn check_text(field: &'static str, label: &str, value: &str, errors: &mut BTreeMap<&'static str, String>) {
    if value.trim().is_empty() {
        errors.insert(field, format!("{} cannot be blank", label));
    } else if value.chars().count() > MAX_TEXT_LEN {
        errors.insert(field, format!("{} must be between 1 and {} characters", label, MAX_TEXT_LEN));
    }
}

// BookResponse is the projection returned by the catalog reads and writes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookResponse {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub description: String,
    pub genre: BTreeSet<Genre>,
    pub status: BTreeSet<BookStatus>,
}

impl From<&BookEntity> for BookResponse {
    fn from(other: &BookEntity) -> Self {
        Self {
            id: other.book_id.unwrap_or_default(),
            title: other.title.to_string(),
            author: other.author.to_string(),
            isbn: other.isbn.to_string(),
            description: other.description.to_string(),
            genre: other.genre.clone(),
            status: other.status.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookListResponse {
    pub books: Vec<BookResponse>,
}

impl BookListResponse {
    pub fn new(books: Vec<BookResponse>) -> Self {
        Self {
            books,
        }
    }
}

// BookLoanInfo is the reduced view handed to the borrowing workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookLoanInfo {
    pub book_id: i64,
    pub title: String,
    pub status: BTreeSet<BookStatus>,
}

impl From<&BookEntity> for BookLoanInfo {
    fn from(other: &BookEntity) -> Self {
        Self {
            book_id: other.book_id.unwrap_or_default(),
            title: other.title.to_string(),
            status: other.status.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};
    use crate::books::dto::{BookLoanInfo, BookRequest, BookResponse};
    use crate::core::library::{BookStatus, Genre, LibraryError};

    fn little_prince() -> BookRequest {
        BookRequest::new("1234567890123", "The Little Prince", "Antoine de Saint-Exupery",
                         "The fairy tale tells about a Little Prince who visit various planets",
                         &[Genre::Fantasy, Genre::Tale], BookStatus::Available)
    }

    fn validation_errors(req: &BookRequest) -> BTreeMap<String, String> {
        match req.validate() {
            Err(LibraryError::Validation { message, .. }) => serde_json::from_str(message.as_str()).expect("should parse errors"),
            other => panic!("unexpected validation result {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_should_accept_valid_request() {
        assert!(little_prince().validate().is_ok());
    }

    #[tokio::test]
    async fn test_should_reject_blank_and_long_text() {
        let mut req = little_prince();
        req.title = "   ".to_string();
        req.author = "a".repeat(256);
        let errors = validation_errors(&req);
        assert_eq!("Title cannot be blank", errors["title"].as_str());
        assert_eq!("Author must be between 1 and 255 characters", errors["author"].as_str());
        assert!(!errors.contains_key("description"));

        req.title = "t".repeat(255);
        req.author = "Saint-Exupery".to_string();
        assert!(req.validate().is_ok());
    }

    #[tokio::test]
    async fn test_should_reject_bad_isbn() {
        for isbn in ["123456789012", "12345678901234", "12345678901a3", "", "１２３４５６７８９０１２３"] {
            let mut req = little_prince();
            req.isbn = isbn.to_string();
            let errors = validation_errors(&req);
            assert_eq!("ISBN must consist of 13 digits!!!", errors["isbn"].as_str());
        }
    }

    #[tokio::test]
    async fn test_should_reject_empty_sets() {
        let mut req = little_prince();
        req.genre = BTreeSet::new();
        req.status = BTreeSet::new();
        let errors = validation_errors(&req);
        assert_eq!(2, errors.len());
        assert!(errors.contains_key("genre"));
        assert!(errors.contains_key("status"));
    }

    #[tokio::test]
    async fn test_should_collapse_duplicate_genres() {
        let req: BookRequest = serde_json::from_str(r#"{
            "title": "t", "author": "a", "isbn": "1234567890123", "description": "d",
            "genre": ["TALE", "FANTASY", "TALE"], "status": ["AVAILABLE"]
        }"#).expect("should parse request");
        assert_eq!(BTreeSet::from([Genre::Fantasy, Genre::Tale]), req.genre);
    }

    #[tokio::test]
    async fn test_should_project_entity() {
        let mut entity = little_prince().to_entity(Some(7), 42);
        entity.version = 3;
        let res = BookResponse::from(&entity);
        assert_eq!(7, res.id);
        assert_eq!("The Little Prince", res.title.as_str());
        assert_eq!(BTreeSet::from([Genre::Fantasy, Genre::Tale]), res.genre);

        let info = BookLoanInfo::from(&entity);
        assert_eq!(7, info.book_id);
        assert_eq!(BTreeSet::from([BookStatus::Available]), info.status);
        assert_eq!(Some(42), entity.owner_id);
    }
}
