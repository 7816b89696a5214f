pub mod journal_backend;
pub mod token_store;
