//! Naming rule compilation and matching
//!
//! Rules arrive as a JavaScript-style pattern + flags pair. Flags are
//! mapped onto Rust inline regex flags; the compiled matcher is a pure
//! function of the rule.

use anyhow::{bail, Context};
use gh_branch_warden_config::NamingRule;
use regex::Regex;

/// A naming rule compiled into a ready-to-use matcher
///
/// Compilation happens once per invocation. The original pattern and
/// flags are kept for reporting, since violation messages cite them.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    regex: Regex,
    pattern: String,
    flags: String,
}

impl CompiledRule {
    /// Compile a rule, failing on an invalid pattern or unknown flag
    pub fn compile(rule: &NamingRule) -> anyhow::Result<Self> {
        let inline = inline_flags(&rule.flags)?;
        let source = if inline.is_empty() {
            rule.pattern.clone()
        } else {
            format!("(?{}){}", inline, rule.pattern)
        };
        let regex = Regex::new(&source)
            .with_context(|| format!("Invalid naming rule pattern '{}'", rule.pattern))?;

        Ok(Self {
            regex,
            pattern: rule.pattern.clone(),
            flags: rule.flags.clone(),
        })
    }

    /// Whether a branch name conforms to the rule
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }
}

/// Map JavaScript regex flags to Rust inline flags
///
/// `i`, `m`, `s` and `x` carry over directly. `u` is a no-op because
/// the regex crate is Unicode-aware by default; `g` and `y` only affect
/// repeated matching, which `is_match` never does. Anything else is a
/// configuration error.
fn inline_flags(flags: &str) -> anyhow::Result<String> {
    let mut inline = String::new();
    for flag in flags.chars() {
        match flag {
            'i' | 'm' | 's' | 'x' => {
                if !inline.contains(flag) {
                    inline.push(flag);
                }
            }
            'g' | 'y' | 'u' => {}
            other => bail!("Unsupported matching flag '{}'", other),
        }
    }
    Ok(inline)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(pattern: &str, flags: &str) -> NamingRule {
        NamingRule {
            pattern: pattern.to_string(),
            flags: flags.to_string(),
        }
    }

    #[test]
    fn test_case_insensitive_flag() {
        let compiled = CompiledRule::compile(&rule("^(feature|bugfix)/", "i")).unwrap();
        assert!(compiled.matches("feature/login"));
        assert!(compiled.matches("FEATURE/login"));
        assert!(compiled.matches("Bugfix/typo"));
        assert!(!compiled.matches("wip-thing"));
    }

    #[test]
    fn test_no_flags_is_case_sensitive() {
        let compiled = CompiledRule::compile(&rule("^feature/", "")).unwrap();
        assert!(compiled.matches("feature/login"));
        assert!(!compiled.matches("Feature/login"));
    }

    #[test]
    fn test_empty_branch_name_delegates_to_pattern() {
        let anchored = CompiledRule::compile(&rule("^feature/", "i")).unwrap();
        assert!(!anchored.matches(""));

        let permissive = CompiledRule::compile(&rule(".*", "i")).unwrap();
        assert!(permissive.matches(""));
    }

    #[test]
    fn test_metacharacters_not_escaped() {
        // The dot is a regex dot, not a literal
        let compiled = CompiledRule::compile(&rule("^v1.0$", "")).unwrap();
        assert!(compiled.matches("v1.0"));
        assert!(compiled.matches("v1x0"));
    }

    #[test]
    fn test_js_only_flags_are_ignored() {
        let compiled = CompiledRule::compile(&rule("^feature/", "giu")).unwrap();
        assert!(compiled.matches("FEATURE/login"));
    }

    #[test]
    fn test_unknown_flag_is_fatal() {
        assert!(CompiledRule::compile(&rule("^feature/", "z")).is_err());
    }

    #[test]
    fn test_invalid_pattern_is_fatal() {
        assert!(CompiledRule::compile(&rule("^(feature", "i")).is_err());
    }

    #[test]
    fn test_pattern_and_flags_preserved_for_reporting() {
        let compiled = CompiledRule::compile(&rule("^(feature|bugfix)/", "i")).unwrap();
        assert_eq!(compiled.pattern(), "^(feature|bugfix)/");
        assert_eq!(compiled.flags(), "i");
    }
}
