pub mod ddb;
