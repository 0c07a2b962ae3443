//! # Sealdrop CLI
//!
//! Command implementations behind the `sealdrop` binary.
//!
//! ```text
//! sealdrop upload photo.png --out photo.json     # encrypt + upload, write descriptor
//! sealdrop download photo.json --out ./inbox     # fetch + verify + decrypt
//! sealdrop inspect photo.json                    # print non-secret fields
//! ```

pub mod commands;
pub mod config;

pub use commands::{download, inspect, read_descriptor, upload, verification_policy};
pub use config::CliConfig;
