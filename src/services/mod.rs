// Tabdesk services
// Collaborators around the workspace engine: audit logging, session identity,
// value encryption and settings.

pub mod crypto_service;
pub mod identity;
pub mod settings_engine;
pub mod task_logger;
