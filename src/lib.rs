pub mod api;
pub mod config;
pub mod db;
pub mod fill_level;
pub mod store;
