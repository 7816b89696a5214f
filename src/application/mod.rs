pub mod forms;
pub mod journal_app;
pub mod services;
pub mod ui;
