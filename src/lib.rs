//! Tabdesk: the workspace session engine of a CRM shell.
//!
//! Tracks which business tasks a user has open as tabs, enforces capacity and
//! exclusivity rules, and persists the open tab set across reloads.
//!
//! This library crate exposes all modules for use by the RPC binary and integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod storage;
pub mod types;
