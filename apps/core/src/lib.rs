pub mod action_registry;
pub mod activation;
pub mod collation;
pub mod config;
pub mod directory;
pub mod hotkey;
pub mod hotkey_runtime;
pub mod index;
pub mod launcher;
pub mod logging;
pub mod model;
pub mod presentation;
pub mod query;
pub mod runtime;
pub mod search;
pub mod session;
pub mod snapshot;
