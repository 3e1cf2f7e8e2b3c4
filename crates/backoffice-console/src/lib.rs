//! Back-office console list screens on top of [`backoffice_view`].
//!
//! The view engine only knows records, paths and configurations. This crate
//! supplies the rest of a list screen:
//!
//! - [`screens`]: per-screen presets (search fields, facets, columns, sort, export)
//! - [`collection`]: normalising API payloads into record lists
//! - [`refresh`]: latest-wins handling of overlapping fetches
//! - [`session`]: a screen bound to its collection
//! - [`csv_export`] and [`output`]: getting rows out
//! - [`config`]: YAML configuration
//! - [`cli`]: the `backoffice` binary's commands

pub mod cli;
pub mod collection;
pub mod config;
pub mod csv_export;
pub mod error;
pub mod output;
pub mod refresh;
pub mod screens;
pub mod session;

pub use collection::records_from_payload;
pub use config::{ConsoleConfig, ScreenSettings};
pub use error::{ConsoleError, Result};
pub use output::OutputFormat;
pub use refresh::{RefreshGate, Ticket};
pub use screens::{Column, Screen, ScreenPreset};
pub use session::{RefreshOutcome, ScreenView};
