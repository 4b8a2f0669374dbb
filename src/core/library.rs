use std::fmt;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum LibraryError {
    Database {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    AccessDenied {
        message: String,
        reason_code: Option<String>,
    },
    // Raised by a store when a write would break its unique index on the book code.
    DuplicateKey {
        message: String,
    },
    // Raised by the catalog when a create or update would produce a second book with the same code.
    AlreadyExists {
        message: String,
    },
    NotFound {
        message: String,
    },
    // This is a retry-able error, which indicates that the record being written was changed
    // by another writer since it was read (its version moved on).
    // The caller can retry the whole operation with or without a backoff.
    CurrentlyUnavailable {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
    Serialization {
        message: String,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
}

impl LibraryError {
    pub fn database(message: &str, reason_code: Option<String>, retryable: bool) -> LibraryError {
        LibraryError::Database { message: message.to_string(), reason_code, retryable }
    }

    pub fn access_denied(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::AccessDenied { message: message.to_string(), reason_code }
    }

    pub fn duplicate_key(message: &str) -> LibraryError {
        LibraryError::DuplicateKey { message: message.to_string() }
    }

    pub fn already_exists(message: &str) -> LibraryError {
        LibraryError::AlreadyExists { message: message.to_string() }
    }

    pub fn not_found(message: &str) -> LibraryError {
        LibraryError::NotFound { message: message.to_string() }
    }

    pub fn unavailable(message: &str, reason_code: Option<String>, retryable: bool) -> LibraryError {
        LibraryError::CurrentlyUnavailable { message: message.to_string(), reason_code, retryable }
    }

    pub fn database_or_unavailable(message: &str, reason: Option<String>, retryable: bool) -> LibraryError {
        if retryable {
            LibraryError::unavailable(
                format!("ddb database unavailable error {:?} {:?}", message, reason).as_str(), reason, true)
        } else if let Some(ref reason_val) = reason {
            if reason_val.as_str().contains("404") {
                LibraryError::not_found(
                    format!("not found error {:?} {:?}", message, reason).as_str())
            } else if reason_val.as_str().contains("403") {
                LibraryError::access_denied(
                    format!("access-denied error {:?} {:?}", message, reason).as_str(), reason)
            } else {
                LibraryError::database(
                    format!("ddb database error {:?} {:?}", message, reason).as_str(), reason, false)
            }
        } else {
            LibraryError::database(
                format!("ddb database error {:?} {:?}", message, reason).as_str(), reason, false)
        }
    }

    pub fn validation(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Validation { message: message.to_string(), reason_code }
    }

    pub fn serialization(message: &str) -> LibraryError {
        LibraryError::Serialization { message: message.to_string() }
    }

    pub fn runtime(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Runtime { message: message.to_string(), reason_code }
    }

    pub fn retryable(&self) -> bool {
        match self {
            LibraryError::Database { retryable, .. } |
            LibraryError::CurrentlyUnavailable { retryable, .. } => { *retryable }
            _ => { false }
        }
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::serialization(
            format!("serde json parsing {:?}", err).as_str())
    }
}

impl From<reqwest::Error> for LibraryError {
    fn from(err: reqwest::Error) -> Self {
        let reason = err.status().map(|s| s.as_u16().to_string());
        if err.is_timeout() || err.is_connect() {
            LibraryError::unavailable(format!("identity service unreachable {:?}", err).as_str(), reason, true)
        } else if err.is_decode() {
            LibraryError::serialization(format!("identity response parsing {:?}", err).as_str())
        } else {
            LibraryError::access_denied(format!("identity lookup failed {:?}", err).as_str(), reason)
        }
    }
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::Database { message, reason_code, retryable } |
            LibraryError::CurrentlyUnavailable { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            LibraryError::AccessDenied { message, reason_code } |
            LibraryError::Validation { message, reason_code } |
            LibraryError::Runtime { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            LibraryError::DuplicateKey { message } |
            LibraryError::AlreadyExists { message } |
            LibraryError::NotFound { message } |
            LibraryError::Serialization { message } => {
                write!(f, "{}", message)
            }
        }
    }
}

impl std::error::Error for LibraryError {}

/// A specialized Result type for the catalog.
pub type LibraryResult<T> = Result<T, LibraryError>;

// Availability marker of a book. A book's status set normally holds exactly one of these.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum BookStatus {
    Available,
    Unavailable,
}

impl TryFrom<&str> for BookStatus {
    type Error = LibraryError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "AVAILABLE" => Ok(BookStatus::Available),
            "UNAVAILABLE" => Ok(BookStatus::Unavailable),
            _ => Err(LibraryError::serialization(format!("unknown book status {}", s).as_str())),
        }
    }
}

impl Display for BookStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            BookStatus::Available => write!(f, "AVAILABLE"),
            BookStatus::Unavailable => write!(f, "UNAVAILABLE"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum Genre {
    Fantasy,
    Tale,
    Novel,
    Detective,
    Adventure,
    Horror,
    Romance,
    ScienceFiction,
    Poetry,
    Drama,
    Biography,
    History,
}

impl Genre {
    pub const ALL: [Genre; 12] = [
        Genre::Fantasy,
        Genre::Tale,
        Genre::Novel,
        Genre::Detective,
        Genre::Adventure,
        Genre::Horror,
        Genre::Romance,
        Genre::ScienceFiction,
        Genre::Poetry,
        Genre::Drama,
        Genre::Biography,
        Genre::History,
    ];
}

impl TryFrom<&str> for Genre {
    type Error = LibraryError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Genre::ALL.iter()
            .find(|g| g.to_string() == s)
            .copied()
            .ok_or_else(|| LibraryError::serialization(format!("unknown genre {}", s).as_str()))
    }
}

impl Display for Genre {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Genre::Fantasy => write!(f, "FANTASY"),
            Genre::Tale => write!(f, "TALE"),
            Genre::Novel => write!(f, "NOVEL"),
            Genre::Detective => write!(f, "DETECTIVE"),
            Genre::Adventure => write!(f, "ADVENTURE"),
            Genre::Horror => write!(f, "HORROR"),
            Genre::Romance => write!(f, "ROMANCE"),
            Genre::ScienceFiction => write!(f, "SCIENCE_FICTION"),
            Genre::Poetry => write!(f, "POETRY"),
            Genre::Drama => write!(f, "DRAMA"),
            Genre::Biography => write!(f, "BIOGRAPHY"),
            Genre::History => write!(f, "HISTORY"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::library::{BookStatus, Genre, LibraryError};

    #[tokio::test]
    async fn test_should_create_database_error() {
        assert!(matches!(LibraryError::database("test", None, false), LibraryError::Database{ message: _, reason_code: _, retryable: _ }));
    }

    #[tokio::test]
    async fn test_should_create_already_exists_error() {
        assert!(matches!(LibraryError::already_exists("test"), LibraryError::AlreadyExists{ message: _ }));
        assert_eq!("test", LibraryError::already_exists("test").to_string());
    }

    #[tokio::test]
    async fn test_should_create_duplicate_key_error() {
        assert!(matches!(LibraryError::duplicate_key("test"), LibraryError::DuplicateKey{ message: _ }));
    }

    #[tokio::test]
    async fn test_should_create_not_found_error() {
        assert!(matches!(LibraryError::not_found("test"), LibraryError::NotFound{ message: _ }));
        assert_eq!("Book not found.", LibraryError::not_found("Book not found.").to_string());
    }

    #[tokio::test]
    async fn test_should_create_database_or_unavailable_error() {
        assert!(matches!(LibraryError::database_or_unavailable("test", None, true), LibraryError::CurrentlyUnavailable{ message: _, reason_code: _, retryable: _ }));
        assert!(matches!(LibraryError::database_or_unavailable("test", Some("404".to_string()), false), LibraryError::NotFound{ message: _ }));
        assert!(matches!(LibraryError::database_or_unavailable("test", Some("403".to_string()), false), LibraryError::AccessDenied{ message: _, reason_code: _ }));
        assert!(matches!(LibraryError::database_or_unavailable("test", Some("500".to_string()), false), LibraryError::Database{ message: _, reason_code: _, retryable: _ }));
        assert!(matches!(LibraryError::database_or_unavailable("test", None, false), LibraryError::Database{ message: _, reason_code: _, retryable: _ }));
    }

    #[tokio::test]
    async fn test_should_create_retryable_error() {
        assert_eq!(false, LibraryError::database("test", None, false).retryable());
        assert_eq!(false, LibraryError::access_denied("test", None).retryable());
        assert_eq!(false, LibraryError::duplicate_key("test").retryable());
        assert_eq!(false, LibraryError::already_exists("test").retryable());
        assert_eq!(false, LibraryError::not_found("test").retryable());
        assert_eq!(false, LibraryError::unavailable("test", None, false).retryable());
        assert_eq!(true, LibraryError::unavailable("test", None, true).retryable());
        assert_eq!(false, LibraryError::validation("test", None).retryable());
        assert_eq!(false, LibraryError::serialization("test").retryable());
        assert_eq!(false, LibraryError::runtime("test", None).retryable());
    }

    #[tokio::test]
    async fn test_should_format_book_status() {
        for status in [BookStatus::Available, BookStatus::Unavailable] {
            let str = status.to_string();
            let str_status = BookStatus::try_from(str.as_str()).expect("should parse status");
            assert_eq!(status, str_status);
        }
        assert!(BookStatus::try_from("Lost").is_err());
    }

    #[tokio::test]
    async fn test_should_match_serde_and_display_names() {
        for genre in Genre::ALL {
            let json = serde_json::to_string(&genre).expect("should serialize genre");
            assert_eq!(format!("\"{}\"", genre), json);
            assert_eq!(genre, Genre::try_from(genre.to_string().as_str()).expect("should parse genre"));
        }
        let status: BookStatus = serde_json::from_str("\"UNAVAILABLE\"").expect("should parse status");
        assert_eq!(BookStatus::Unavailable, status);
        assert!(serde_json::from_str::<Genre>("\"COOKING\"").is_err());
    }
}
