pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod table;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod testing;

pub use app::{app, AppState};
