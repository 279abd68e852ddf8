//! Layered configuration loading for Komawari.
//!
//! Sources, lowest precedence first:
//!
//! 1. Bundled defaults (`komawari.toml` shipped with the crate)
//! 2. `~/.config/komawari/komawari.toml`
//! 3. `./komawari.toml`
//! 4. An explicit file, when given
//!
//! Missing user files are skipped.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod loader;
mod oracle;

pub use loader::{DEFAULT_CONFIG, KomawariConfig};
pub use oracle::OracleConfig;
