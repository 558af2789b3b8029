pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod exports;
pub mod repository;
pub mod responses;
pub mod router;
pub mod templates;

#[cfg(test)]
mod tests;
