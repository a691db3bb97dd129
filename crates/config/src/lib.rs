//! Configuration management for the Verkada poller.
//!
//! This crate provides types and loaders for building poller configuration
//! from environment variables, `.env` files, and explicit overrides.

pub mod constants;
mod loader;

pub use loader::{Config, ConfigError, ConfigLoader, default_credential_path, env_var_or_none};
