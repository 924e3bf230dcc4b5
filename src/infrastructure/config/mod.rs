//! Configuration loading
//!
//! Defaults are layered under `fieldloop.yaml`, `fieldloop.local.yaml` and
//! `FIELDLOOP_*` environment variables, then validated before any command
//! touches the store.

pub mod loader;

pub use loader::{ConfigError, ConfigLoader};
