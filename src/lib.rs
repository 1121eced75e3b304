pub mod client;
pub mod config;
pub mod list;
pub mod logging;
pub mod paginate;
pub mod query;
pub mod resource;
pub mod server;
pub mod ui;
