//! Theme mode: light, dark, or follow the host.
//!
//! Theming is a display concern only — switching modes never touches the
//! value tree, validation state, or collapse state.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The closed set of theme modes the editor accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ThemeMode {
    /// Light palette.
    Light,
    /// Dark palette.
    Dark,
    /// Follow whatever the host is currently using.
    #[default]
    Auto,
}

/// Error produced when a theme name is not in the closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown theme mode `{0}` (expected light, dark, or auto)")]
pub struct UnknownThemeMode(String);

impl FromStr for ThemeMode {
    type Err = UnknownThemeMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            "auto" => Ok(ThemeMode::Auto),
            other => Err(UnknownThemeMode(other.to_owned())),
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::Auto => "auto",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_follows_host() {
        assert_eq!(ThemeMode::default(), ThemeMode::Auto);
    }

    #[test]
    fn parse_known_names() {
        assert_eq!("light".parse::<ThemeMode>(), Ok(ThemeMode::Light));
        assert_eq!("dark".parse::<ThemeMode>(), Ok(ThemeMode::Dark));
        assert_eq!("auto".parse::<ThemeMode>(), Ok(ThemeMode::Auto));
    }

    #[test]
    fn parse_unknown_name_errors() {
        let err = "sepia".parse::<ThemeMode>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown theme mode `sepia` (expected light, dark, or auto)"
        );
    }

    #[test]
    fn display_round_trips() {
        for mode in [ThemeMode::Light, ThemeMode::Dark, ThemeMode::Auto] {
            assert_eq!(mode.to_string().parse::<ThemeMode>(), Ok(mode));
        }
    }
}
