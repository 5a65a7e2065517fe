pub mod api;
pub mod collector;
pub mod export;
pub mod models;
