#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

//! # Barracks CLI
//!
//! Command-line client for the Barracks IoT fleet-management service.
//!
//! ## Architecture
//!
//! This library is organized into several key modules:
//!
//! - **[`endpoints`]** - Registry of named API endpoints
//! - **[`client`]** - HTTP endpoint client, URL templating and HAL pagination
//! - **[`stream`]** - Incremental delivery of paged results
//! - **[`api`]** - Resource-oriented facade over the endpoint client
//! - **[`commands`]** - Command implementations (login, updates, devices, etc.)
//! - **[`config`]** - Configuration management and session storage
//! - **[`error`]** - Error types and error handling
//!
//! ## Quick Start
//!
//! ```bash
//! barracks login                 # Authenticate
//! barracks update list           # Browse updates page by page
//! barracks device list --json    # Machine-readable output
//! ```

pub mod api;
pub mod auth;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod logging;
pub mod output;
pub mod stream;

/// Error type alias for convenience
pub use error::{CliError, Result};

/// Configuration type alias for convenience
pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = "barracks";
