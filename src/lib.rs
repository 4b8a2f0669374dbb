pub mod core;
pub mod books;
pub mod catalog;
pub mod identity;
pub mod utils;
