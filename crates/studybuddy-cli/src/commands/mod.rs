pub mod extract;
pub mod init;
pub mod list_models;
pub mod study;
