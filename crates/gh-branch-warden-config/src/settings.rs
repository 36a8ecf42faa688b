//! Run settings
//!
//! Settings are resolved once at startup and passed by value into the
//! components that need them; nothing reads configuration ambiently
//! after that. Action inputs win over config-file values.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::env;

/// Default matching flags when the input is unset
pub const DEFAULT_FLAGS: &str = "i";

/// Default upper bound on reconciliation scan pages (100 pages = 10k issues)
pub const DEFAULT_MAX_SCAN_PAGES: u32 = 100;

/// A branch naming rule: pattern plus matching flags
///
/// Immutable once loaded. Compilation into a matcher happens in the
/// binary crate; an uncompilable rule is a fatal configuration error.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamingRule {
    /// Regular expression a conforming branch name must match
    pub pattern: String,

    /// JavaScript-style matching flags (e.g. "i")
    pub flags: String,
}

/// How to treat a tracking-issue create failure caused by assignment
///
/// Assigning a bot or outside collaborator can be rejected by the
/// store. Soft records it as a warning; strict fails the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentMode {
    #[default]
    Soft,
    Strict,
}

impl AssignmentMode {
    fn parse(value: &str) -> anyhow::Result<Self> {
        match value.to_lowercase().as_str() {
            "soft" => Ok(AssignmentMode::Soft),
            "strict" => Ok(AssignmentMode::Strict),
            other => bail!("Invalid assignment mode '{}', expected 'soft' or 'strict'", other),
        }
    }
}

/// Everything a run needs, resolved once at startup
#[derive(Debug, Clone)]
pub struct Settings {
    /// API token for the issue tracker
    pub token: String,

    /// The branch naming rule to enforce
    pub rule: NamingRule,

    /// Assignment failure handling (see [`AssignmentMode`])
    pub assignment: AssignmentMode,

    /// Upper bound on pages fetched by one reconciliation scan
    pub max_scan_pages: u32,
}

/// Optional values from the local config file
///
/// The token deliberately has no file field; it comes from inputs or
/// the environment only.
#[derive(Debug, Clone, Default, Deserialize)]
struct FileConfig {
    pattern: Option<String>,
    flags: Option<String>,
    assignment: Option<AssignmentMode>,
    max_scan_pages: Option<u32>,
}

impl Settings {
    /// Resolve settings from action inputs, the environment, and the
    /// optional local config file
    ///
    /// Missing token or pattern is a fatal configuration error.
    pub fn load() -> anyhow::Result<Self> {
        let file = match crate::load_config_file() {
            Some(content) => match toml::from_str::<FileConfig>(&content) {
                Ok(file) => {
                    log::info!("Loaded local config file");
                    file
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                    FileConfig::default()
                }
            },
            None => FileConfig::default(),
        };

        Self::resolve(|name| action_input(name), file)
    }

    fn resolve(
        input: impl Fn(&str) -> Option<String>,
        file: FileConfig,
    ) -> anyhow::Result<Self> {
        let token = input("token")
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .or_else(|| env::var("GH_TOKEN").ok())
            .context("No token: set the 'token' input or GITHUB_TOKEN")?;

        let pattern = input("regex")
            .or(file.pattern)
            .context("No naming rule: set the 'regex' input")?;

        let flags = input("flags")
            .or(file.flags)
            .unwrap_or_else(|| DEFAULT_FLAGS.to_string());

        let assignment = match input("assignment") {
            Some(value) => AssignmentMode::parse(&value)?,
            None => file.assignment.unwrap_or_default(),
        };

        let max_scan_pages = match input("max_scan_pages") {
            Some(value) => value
                .parse()
                .with_context(|| format!("Invalid max_scan_pages input '{}'", value))?,
            None => file.max_scan_pages.unwrap_or(DEFAULT_MAX_SCAN_PAGES),
        };
        if max_scan_pages == 0 {
            bail!("max_scan_pages must be at least 1");
        }

        Ok(Settings {
            token,
            rule: NamingRule { pattern, flags },
            assignment,
            max_scan_pages,
        })
    }
}

/// Read a GitHub Actions input
///
/// Actions expose inputs as `INPUT_<NAME>` with the name uppercased and
/// spaces replaced by underscores. Unset inputs arrive as empty strings,
/// which we treat as absent.
fn action_input(name: &str) -> Option<String> {
    let key = format!("INPUT_{}", name.replace(' ', "_").to_uppercase());
    let value = env::var(key).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn inputs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn resolve(
        map: HashMap<String, String>,
        file: FileConfig,
    ) -> anyhow::Result<Settings> {
        Settings::resolve(move |name| map.get(name).cloned(), file)
    }

    #[test]
    fn test_minimal_inputs_use_defaults() {
        let settings = resolve(
            inputs(&[("token", "t0ken"), ("regex", "^feature/")]),
            FileConfig::default(),
        )
        .unwrap();

        assert_eq!(settings.token, "t0ken");
        assert_eq!(settings.rule.pattern, "^feature/");
        assert_eq!(settings.rule.flags, DEFAULT_FLAGS);
        assert_eq!(settings.assignment, AssignmentMode::Soft);
        assert_eq!(settings.max_scan_pages, DEFAULT_MAX_SCAN_PAGES);
    }

    #[test]
    fn test_missing_rule_is_fatal() {
        let result = resolve(inputs(&[("token", "t")]), FileConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_inputs_win_over_file() {
        let file = FileConfig {
            pattern: Some("^from-file/".to_string()),
            flags: Some("m".to_string()),
            assignment: Some(AssignmentMode::Strict),
            max_scan_pages: Some(5),
        };
        let settings = resolve(
            inputs(&[("token", "t"), ("regex", "^from-input/"), ("flags", "i")]),
            file,
        )
        .unwrap();

        assert_eq!(settings.rule.pattern, "^from-input/");
        assert_eq!(settings.rule.flags, "i");
        // No input given for these, file values apply
        assert_eq!(settings.assignment, AssignmentMode::Strict);
        assert_eq!(settings.max_scan_pages, 5);
    }

    #[test]
    fn test_invalid_assignment_mode_rejected() {
        let result = resolve(
            inputs(&[("token", "t"), ("regex", "^x"), ("assignment", "loud")]),
            FileConfig::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_max_scan_pages_rejected() {
        let result = resolve(
            inputs(&[("token", "t"), ("regex", "^x"), ("max_scan_pages", "0")]),
            FileConfig::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_file_config_parses_from_toml() {
        let file: FileConfig = toml::from_str(
            r#"
            pattern = "^(feature|bugfix)/"
            flags = "i"
            assignment = "strict"
            max_scan_pages = 10
            "#,
        )
        .unwrap();
        assert_eq!(file.pattern.as_deref(), Some("^(feature|bugfix)/"));
        assert_eq!(file.assignment, Some(AssignmentMode::Strict));
        assert_eq!(file.max_scan_pages, Some(10));
    }
}
