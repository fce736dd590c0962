// Tabdesk shared type definitions
// Each submodule defines plain data used across the engine.

pub mod errors;
pub mod event;
pub mod session;
pub mod settings;
pub mod tab;
pub mod task;
pub mod workspace;
