pub mod alert;
pub mod format;
pub mod modal;
