//! Run configuration for gh-branch-warden
//!
//! This crate provides:
//! - Action input reading (`INPUT_*` environment variables)
//! - Token resolution (input, then GITHUB_TOKEN/GH_TOKEN)
//! - Optional local config file fallback (TOML) for runs outside Actions

pub mod config_file;
pub mod settings;

pub use config_file::load_config_file;
pub use settings::{AssignmentMode, NamingRule, Settings, DEFAULT_FLAGS, DEFAULT_MAX_SCAN_PAGES};
