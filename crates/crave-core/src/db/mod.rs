//! Database layer for CRAVE

mod connection;
mod migrations;
mod repository;

pub use connection::Database;
pub use repository::{CravingRepository, SqliteCravingRepository};
