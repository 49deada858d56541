//! Terminal color policy.

use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Color when stdout is a terminal
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn should_use_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::stdout().is_terminal(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormattingConfig {
    pub color: ColorMode,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
        }
    }
}

impl FormattingConfig {
    /// Honor `NO_COLOR`, `CLICOLOR=0` and `CLICOLOR_FORCE=1`.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let color = if var("CLICOLOR_FORCE").as_deref() == Some("1") {
            ColorMode::Always
        } else if var("NO_COLOR").is_some() || var("CLICOLOR").as_deref() == Some("0") {
            ColorMode::Never
        } else {
            ColorMode::Auto
        };
        Self { color }
    }

    /// No colors at all (`--plain`).
    pub fn plain() -> Self {
        Self {
            color: ColorMode::Never,
        }
    }

    /// Apply the policy to the `colored` crate's global switch.
    pub fn apply(self) {
        colored::control::set_override(self.color.should_use_color());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn with(vars: &[(&str, &str)]) -> FormattingConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        FormattingConfig::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_env_policy() {
        assert_eq!(with(&[]).color, ColorMode::Auto);
        assert_eq!(with(&[("NO_COLOR", "")]).color, ColorMode::Never);
        assert_eq!(with(&[("CLICOLOR", "0")]).color, ColorMode::Never);
        assert_eq!(
            with(&[("NO_COLOR", "1"), ("CLICOLOR_FORCE", "1")]).color,
            ColorMode::Always
        );
    }

    #[test]
    fn test_plain_never_colors() {
        assert!(!FormattingConfig::plain().color.should_use_color());
    }
}
