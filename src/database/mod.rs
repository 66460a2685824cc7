pub mod manager;
pub mod models;
pub mod movies;
pub mod ratings;
pub mod users;

pub use manager::{Database, DatabaseError};
