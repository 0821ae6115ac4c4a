pub mod api;
pub mod app;
pub mod catalog;
pub mod categories;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod player;
pub mod query;
pub mod sync;
