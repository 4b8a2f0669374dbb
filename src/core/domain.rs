use serde::{Deserialize, Serialize};

// Identifiable defines common traits that can be shared by persistent objects
pub trait Identifiable : Sync + Send {
    // store-assigned identity, None until the first save
    fn id(&self) -> Option<i64>;
    fn version(&self) -> i64;
}

pub const BOOKS_TABLE: &str = "books";
pub const ISBN_TABLE: &str = "book_isbns";
pub const SEQUENCE_TABLE: &str = "sequences";

// Configuration abstracts config options for the catalog service
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub(crate) struct Configuration {
    pub env: String,
    pub books_table: String,
    pub isbn_table: String,
    pub sequence_table: String,
    pub identity_url: String,
    // owner id stamped on writes when no identity service is wired in
    pub dev_owner_id: i64,
}

impl Configuration {
    pub fn new(env: &str) -> Self {
        Configuration {
            env: env.to_string(),
            books_table: BOOKS_TABLE.to_string(),
            isbn_table: ISBN_TABLE.to_string(),
            sequence_table: SEQUENCE_TABLE.to_string(),
            identity_url: "http://localhost:8081".to_string(),
            dev_owner_id: 1,
        }
    }

    // defaults overridden by CATALOG_* environment variables
    pub fn from_env(env: &str) -> Self {
        Self::from_lookup(env, |key| std::env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(env: &str, lookup: F) -> Self {
        let mut config = Configuration::new(env);
        if let Some(table) = lookup("CATALOG_BOOKS_TABLE") {
            config.books_table = table;
        }
        if let Some(table) = lookup("CATALOG_ISBN_TABLE") {
            config.isbn_table = table;
        }
        if let Some(table) = lookup("CATALOG_SEQUENCE_TABLE") {
            config.sequence_table = table;
        }
        if let Some(url) = lookup("CATALOG_IDENTITY_URL") {
            config.identity_url = url.trim_end_matches('/').to_string();
        }
        if let Some(owner_id) = lookup("CATALOG_DEV_OWNER_ID").and_then(|s| s.parse::<i64>().ok()) {
            config.dev_owner_id = owner_id;
        }
        config
    }
}
