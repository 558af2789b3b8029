pub mod connection;
pub mod favorites;
pub mod magic_links;
pub mod programs;
pub mod suggestions;
pub mod users;

pub use connection::{init_db, Database};
