//! # taskmaster-settings
//!
//! Configuration management with layered sources for the taskmaster CLI.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults** — [`Settings::default()`]
//! 2. **User file** — `~/.taskmaster/settings.json` (deep-merged over defaults)
//! 3. **Environment variables** — `TASKMASTER_*` overrides (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use taskmaster_settings::load_settings;
//!
//! let settings = load_settings().unwrap();
//! println!("backend: {}", settings.backend);
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;
