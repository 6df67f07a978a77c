pub mod config;
pub mod create;
pub mod delete;
pub mod list;
