pub mod auth;
pub mod config;
pub mod database;
pub mod entities;
pub mod http;
pub mod logging;
pub mod store;

#[cfg(test)]
pub mod test_utils;
