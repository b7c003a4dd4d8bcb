//! crave-core - Core library for CRAVE
//!
//! This crate contains the shared models, the craving list query engine,
//! and the database layer used by the CRAVE app shells.

pub mod db;
pub mod error;
pub mod models;
pub mod query;

pub use error::{Error, Result};
pub use models::{Craving, CravingId};
pub use query::{select_cravings, CravingFilter};
