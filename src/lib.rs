/*
 * Responsibility
 * - crate の module 構成 (bin と integration test の両方から使う)
 */
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
