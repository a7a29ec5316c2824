/*
 * Responsibility
 * - crate のモジュール構成 (bin / integration test から参照する)
 */
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod logger;
pub mod middleware;
pub mod server;
pub mod services;
pub mod shutdown;
pub mod state;
pub mod store;
pub mod types;
